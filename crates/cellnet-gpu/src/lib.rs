//! wgpu renderer shared by the web and native front-ends.
//!
//! Frame structure: every batch is drawn into the HDR target, bloom-tagged
//! batches are drawn again into the glow target, the glow target goes through
//! bright pass and blur, and the composite pass adds the blurred glow on top of
//! the HDR scene before tonemapping to the swapchain.

mod geometry;
mod helpers;
mod post;
mod targets;

use cellnet_core::{BloomParams, BloomPass, FrameOutput, Session, CLEAR_COLOR};
use geometry::{BatchKind, CircleBatch, CircleMesh, LineBatch, ScenePipelines};
use post::{PostBindGroups, PostResources};
use targets::RenderTargets;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

/// Buffers derived from one generated scene. Replaced wholesale on regenerate.
struct SceneResources {
    segment_count: u32,
    mesh: CircleMesh,
    rings: CircleBatch,
    bloom_circles: CircleBatch,
    lines: LineBatch,
    bloom_lines: LineBatch,
    bloom: BloomParams,
}

impl SceneResources {
    fn new(device: &wgpu::Device, session: &Session) -> Self {
        let segment_count = session.settings().ring_segment_count;
        Self {
            segment_count,
            mesh: CircleMesh::new(device, segment_count),
            rings: CircleBatch::new(device, "ring_instances", session.ring_instances()),
            bloom_circles: CircleBatch::new(
                device,
                "bloom_circle_instances",
                session.bloom_circle_instances(),
            ),
            lines: LineBatch::new(device, "line_vb", session.line_buffers()),
            bloom_lines: LineBatch::new(device, "bloom_line_vb", session.bloom_line_buffers()),
            bloom: *session.bloom(),
        }
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: ScenePipelines,
    post: PostResources,
    targets: RenderTargets,
    groups: PostBindGroups,
    scene: SceneResources,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

fn scene_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    clear: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

impl<'a> GpuState<'a> {
    /// Set up device, pipelines and targets for `surface`, and upload the
    /// session's static geometry.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'a>,
        width: u32,
        height: u32,
        session: &Session,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let info = adapter.get_info();
        log::info!("[gpu] adapter: {} ({:?})", info.name, info.backend);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });

        let pipelines = geometry::create_scene_pipelines(&device, &scene_shader);
        let post = post::create_post_resources(&device, &post_shader, format);
        let targets = RenderTargets::new(&device, width, height);
        let groups = PostBindGroups::new(&device, &post, &targets);
        let scene = SceneResources::new(&device, session);
        post::write_uniforms(&queue, &post, &scene.bloom, targets.bloom_size());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            post,
            targets,
            groups,
            scene,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0] as f64,
                g: CLEAR_COLOR[1] as f64,
                b: CLEAR_COLOR[2] as f64,
                a: 1.0,
            },
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rebuild every scene-derived buffer after the session regenerated.
    pub fn upload_scene(&mut self, session: &Session) {
        self.scene = SceneResources::new(&self.device, session);
        post::write_uniforms(
            &self.queue,
            &self.post,
            &self.scene.bloom,
            self.targets.bloom_size(),
        );
        log::info!(
            "[gpu] scene uploaded: circle mesh {} segments, tier {}",
            self.scene.segment_count,
            session.tier()
        );
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.targets.recreate(&self.device, width, height);
        self.groups = PostBindGroups::new(&self.device, &self.post, &self.targets);
        post::write_uniforms(
            &self.queue,
            &self.post,
            &self.scene.bloom,
            self.targets.bloom_size(),
        );
        log::debug!("[gpu] resized to {}x{}", width, height);
    }

    /// Reconfigure with the current size, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn draw_batch(&self, pass: &mut wgpu::RenderPass<'_>, kind: BatchKind) {
        let s = &self.scene;
        pass.set_bind_group(0, &self.pipelines.slot(kind).bind_group, &[]);
        match kind {
            BatchKind::Rings => s.rings.draw(pass, &s.mesh),
            BatchKind::BloomCircles => s.bloom_circles.draw(pass, &s.mesh),
            BatchKind::Lines => s.lines.draw(pass),
            BatchKind::BloomLines => s.bloom_lines.draw(pass),
        }
    }

    /// The normal pass draws everything; the bloom pass only the tagged batches.
    fn draw_batches(&self, pass: &mut wgpu::RenderPass<'_>, which: BloomPass) {
        pass.set_pipeline(&self.pipelines.circle_pipeline);
        if which == BloomPass::Normal {
            self.draw_batch(pass, BatchKind::Rings);
        }
        self.draw_batch(pass, BatchKind::BloomCircles);

        pass.set_pipeline(&self.pipelines.line_pipeline);
        if which == BloomPass::Normal {
            self.draw_batch(pass, BatchKind::Lines);
        }
        self.draw_batch(pass, BatchKind::BloomLines);
    }

    pub fn render(&mut self, frame: &FrameOutput<'_>) -> Result<(), wgpu::SurfaceError> {
        let surface_tex = self.surface.get_current_texture()?;
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.pipelines
            .write_uniforms(&self.queue, frame.view_projection, frame.scene_transform);
        self.scene.lines.upload(&self.queue, frame.lines);
        self.scene.bloom_lines.upload(&self.queue, frame.bloom_lines);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: whole scene -> HDR
        {
            let mut pass = scene_pass(
                &mut encoder,
                "scene_pass",
                &self.targets.hdr_view,
                self.clear_color,
            );
            self.draw_batches(&mut pass, BloomPass::Normal);
        }
        // Pass 2: bloom-tagged geometry only -> glow
        {
            let mut pass = scene_pass(
                &mut encoder,
                "glow_pass",
                &self.targets.glow_view,
                wgpu::Color::BLACK,
            );
            self.draw_batches(&mut pass, BloomPass::Bloom);
        }
        // Pass 3: bright + blur ping-pong, result in bloom_a
        post::run_bloom_chain(
            &mut encoder,
            &self.post,
            &self.groups,
            &self.targets,
            self.scene.bloom.blur_passes,
        );
        // Pass 4: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            wgpu::Color::BLACK,
            &self.post.composite_pipeline,
            &self.groups.from_hdr,
            Some(&self.groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }
}
