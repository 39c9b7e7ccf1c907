use super::helpers::{self, HDR_FORMAT};

/// Offscreen color targets for the render pipeline.
///
/// - `hdr` holds every piece of scene geometry.
/// - `glow` holds only the bloom-tagged geometry and feeds the bright pass.
/// - `bloom_a`/`bloom_b` are half-res ping-pong buffers for the blur.
pub(crate) struct RenderTargets {
    #[allow(dead_code)]
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) glow_tex: wgpu::Texture,
    pub(crate) glow_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

#[inline]
pub(crate) fn bloom_extent(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) =
            helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT);
        let (glow_tex, glow_view) =
            helpers::create_color_texture(device, "glow_tex", width, height, HDR_FORMAT);
        let (bw, bh) = bloom_extent(width, height);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT);
        Self {
            hdr_tex,
            hdr_view,
            glow_tex,
            glow_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }

    pub(crate) fn bloom_size(&self) -> (u32, u32) {
        (self.bloom_a.width(), self.bloom_a.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_targets_are_half_res_and_never_empty() {
        assert_eq!(bloom_extent(1920, 1080), (960, 540));
        assert_eq!(bloom_extent(1, 1), (1, 1));
        assert_eq!(bloom_extent(0, 0), (1, 1));
        assert_eq!(bloom_extent(801, 3), (400, 1));
    }
}
