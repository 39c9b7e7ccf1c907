use super::helpers;
use super::targets::RenderTargets;
use cellnet_core::BloomParams;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    blur_dir: [f32; 2],
    threshold: f32,
    smoothing: f32,
    intensity: f32,
    spread: f32,
}

impl PostUniforms {
    pub(crate) fn new(bloom: &BloomParams, bloom_size: (u32, u32), blur_dir: [f32; 2]) -> Self {
        Self {
            resolution: [bloom_size.0 as f32, bloom_size.1 as f32],
            blur_dir,
            threshold: bloom.threshold,
            smoothing: bloom.smoothing,
            intensity: bloom.intensity,
            spread: bloom.blur_spread,
        }
    }
}

pub(crate) const BLUR_H: [f32; 2] = [1.0, 0.0];
pub(crate) const BLUR_V: [f32; 2] = [0.0, 1.0];

/// Layouts, pipelines and the three uniform slots of the post chain. Each pass
/// reads its own uniform buffer since all writes land before the submit.
pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    pub(crate) base_uniforms: wgpu::Buffer,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let [tex0, samp0] = helpers::texture_layout_entries(0);
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            tex0,
            samp0,
            helpers::uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &helpers::texture_layout_entries(0),
    });
    let size = std::mem::size_of::<PostUniforms>();
    let base_uniforms = helpers::create_uniform_buffer(device, "post_uniforms", size);
    let blur_h_uniforms = helpers::create_uniform_buffer(device, "blur_h_uniforms", size);
    let blur_v_uniforms = helpers::create_uniform_buffer(device, "blur_v_uniforms", size);
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("linear_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_bright",
        helpers::HDR_FORMAT,
        None,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        post_shader,
        "fs_blur",
        helpers::HDR_FORMAT,
        None,
    );
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        base_uniforms,
        blur_h_uniforms,
        blur_v_uniforms,
        sampler,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

/// Bind groups that reference the size-dependent targets; rebuilt on resize.
pub(crate) struct PostBindGroups {
    pub(crate) from_glow: wgpu::BindGroup,
    pub(crate) from_bloom_a: wgpu::BindGroup,
    pub(crate) from_bloom_b: wgpu::BindGroup,
    pub(crate) from_hdr: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

fn source_group(
    device: &wgpu::Device,
    post: &PostResources,
    label: &str,
    view: &wgpu::TextureView,
    uniforms: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &post.bgl0,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&post.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniforms.as_entire_binding(),
            },
        ],
    })
}

impl PostBindGroups {
    pub(crate) fn new(device: &wgpu::Device, post: &PostResources, targets: &RenderTargets) -> Self {
        let bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &post.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&post.sampler),
                },
            ],
        });
        Self {
            from_glow: source_group(
                device,
                post,
                "bg_from_glow",
                &targets.glow_view,
                &post.base_uniforms,
            ),
            from_bloom_a: source_group(
                device,
                post,
                "bg_from_bloom_a",
                &targets.bloom_a_view,
                &post.blur_h_uniforms,
            ),
            from_bloom_b: source_group(
                device,
                post,
                "bg_from_bloom_b",
                &targets.bloom_b_view,
                &post.blur_v_uniforms,
            ),
            from_hdr: source_group(
                device,
                post,
                "bg_hdr",
                &targets.hdr_view,
                &post.base_uniforms,
            ),
            bloom_a_only,
        }
    }
}

pub(crate) fn write_uniforms(
    queue: &wgpu::Queue,
    post: &PostResources,
    bloom: &BloomParams,
    bloom_size: (u32, u32),
) {
    let base = PostUniforms::new(bloom, bloom_size, [0.0, 0.0]);
    let h = PostUniforms::new(bloom, bloom_size, BLUR_H);
    let v = PostUniforms::new(bloom, bloom_size, BLUR_V);
    queue.write_buffer(&post.base_uniforms, 0, bytemuck::bytes_of(&base));
    queue.write_buffer(&post.blur_h_uniforms, 0, bytemuck::bytes_of(&h));
    queue.write_buffer(&post.blur_v_uniforms, 0, bytemuck::bytes_of(&v));
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}

/// Bright pass from the glow target, then `passes` rounds of horizontal and
/// vertical blur. The result always ends up in `bloom_a`.
pub(crate) fn run_bloom_chain(
    encoder: &mut wgpu::CommandEncoder,
    post: &PostResources,
    groups: &PostBindGroups,
    targets: &RenderTargets,
    passes: u32,
) {
    blit(
        encoder,
        "bright_pass",
        &targets.bloom_a_view,
        wgpu::Color::BLACK,
        &post.bright_pipeline,
        &groups.from_glow,
        None,
    );
    for _ in 0..passes {
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            wgpu::Color::BLACK,
            &post.blur_pipeline,
            &groups.from_bloom_a,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            wgpu::Color::BLACK,
            &post.blur_pipeline,
            &groups.from_bloom_b,
            None,
        );
    }
}
