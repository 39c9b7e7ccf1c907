//! Scene-pass pipelines and the vertex/instance buffers behind them.
//!
//! Line buffers are sized once per scene from the pulse buffers and rewritten
//! with `write_buffer` every frame. Circle instances are uploaded once when the
//! scene is built; only the per-batch uniforms change per frame.

use super::helpers::{self, HDR_FORMAT};
use cellnet_core::{
    unit_circle, AnimationBuffers, CircleInstance, InstanceSet, BLOOM_LINE_COLOR,
    BLOOM_RING_COLOR, LINE_COLOR, RING_COLOR,
};
use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct BatchUniforms {
    view_proj: [[f32; 4]; 4],
    scene: [[f32; 4]; 4],
    color: [f32; 4],
}

impl BatchUniforms {
    pub(crate) fn new(view_proj: Mat4, scene: Mat4, rgb: [f32; 3]) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            scene: scene.to_cols_array_2d(),
            color: [rgb[0], rgb[1], rgb[2], 1.0],
        }
    }
}

/// Which of the four draw batches a uniform slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BatchKind {
    Rings,
    BloomCircles,
    Lines,
    BloomLines,
}

impl BatchKind {
    pub(crate) const ALL: [BatchKind; 4] = [
        BatchKind::Rings,
        BatchKind::BloomCircles,
        BatchKind::Lines,
        BatchKind::BloomLines,
    ];

    pub(crate) fn color(self) -> [f32; 3] {
        match self {
            BatchKind::Rings => RING_COLOR,
            BatchKind::BloomCircles => BLOOM_RING_COLOR,
            BatchKind::Lines => LINE_COLOR,
            BatchKind::BloomLines => BLOOM_LINE_COLOR,
        }
    }
}

// src * alpha + dst; overlapping strokes brighten instead of occluding.
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub(crate) struct BatchSlot {
    pub(crate) uniforms: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) struct ScenePipelines {
    pub(crate) line_pipeline: wgpu::RenderPipeline,
    pub(crate) circle_pipeline: wgpu::RenderPipeline,
    pub(crate) slots: [BatchSlot; 4],
}

fn scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    vs_entry: &str,
    buffers: &[wgpu::VertexBufferLayout],
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_scene"),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(ADDITIVE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

const CIRCLE_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32,
];

pub(crate) fn create_scene_pipelines(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
) -> ScenePipelines {
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("batch_bgl"),
        entries: &[helpers::uniform_layout_entry(
            0,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )],
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_scene"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let position_layout = wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 3) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        }],
    };
    let opacity_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32,
            offset: 0,
            shader_location: 1,
        }],
    };
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<CircleInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &CIRCLE_INSTANCE_ATTRIBUTES,
    };

    let line_pipeline = scene_pipeline(
        device,
        &layout,
        shader,
        "line_pipeline",
        "vs_line",
        &[position_layout.clone(), opacity_layout],
    );
    let circle_pipeline = scene_pipeline(
        device,
        &layout,
        shader,
        "circle_pipeline",
        "vs_circle",
        &[position_layout, instance_layout],
    );

    let slots = BatchKind::ALL.map(|kind| {
        let uniforms = helpers::create_uniform_buffer(
            device,
            "batch_uniforms",
            std::mem::size_of::<BatchUniforms>(),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(match kind {
                BatchKind::Rings => "bg_rings",
                BatchKind::BloomCircles => "bg_bloom_circles",
                BatchKind::Lines => "bg_lines",
                BatchKind::BloomLines => "bg_bloom_lines",
            }),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        BatchSlot {
            uniforms,
            bind_group,
        }
    });

    ScenePipelines {
        line_pipeline,
        circle_pipeline,
        slots,
    }
}

impl ScenePipelines {
    pub(crate) fn slot(&self, kind: BatchKind) -> &BatchSlot {
        &self.slots[kind as usize]
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, view_proj: Mat4, scene: Mat4) {
        for kind in BatchKind::ALL {
            let u = BatchUniforms::new(view_proj, scene, kind.color());
            queue.write_buffer(&self.slot(kind).uniforms, 0, bytemuck::bytes_of(&u));
        }
    }
}

/// GPU side of one pulse buffer pair. The vertex count is fixed at creation.
pub(crate) struct LineBatch {
    positions: wgpu::Buffer,
    opacities: wgpu::Buffer,
    vertex_count: u32,
}

impl LineBatch {
    pub(crate) fn new(device: &wgpu::Device, label: &str, buffers: &AnimationBuffers) -> Self {
        let positions = helpers::create_vertex_buffer(
            device,
            label,
            std::mem::size_of_val(buffers.positions()),
        );
        let opacities = helpers::create_vertex_buffer(
            device,
            label,
            std::mem::size_of_val(buffers.opacities()),
        );
        Self {
            positions,
            opacities,
            vertex_count: (buffers.segment_count() * 2) as u32,
        }
    }

    /// Copy this frame's pulse state. A buffer pair of a different size is
    /// skipped rather than overrunning the GPU allocation.
    pub(crate) fn upload(&self, queue: &wgpu::Queue, buffers: &AnimationBuffers) {
        if self.vertex_count == 0 {
            return;
        }
        if (buffers.segment_count() * 2) as u32 != self.vertex_count {
            log::warn!(
                "[gpu] line upload skipped: {} vertices, expected {}",
                buffers.segment_count() * 2,
                self.vertex_count
            );
            return;
        }
        queue.write_buffer(&self.positions, 0, bytemuck::cast_slice(buffers.positions()));
        queue.write_buffer(&self.opacities, 0, bytemuck::cast_slice(buffers.opacities()));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.opacities.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Instanced circle outlines: one shared unit-circle mesh per tier, one
/// instance buffer uploaded when the scene is built.
pub(crate) struct CircleBatch {
    instances: wgpu::Buffer,
    instance_count: u32,
}

impl CircleBatch {
    pub(crate) fn new(device: &wgpu::Device, label: &str, set: &InstanceSet) -> Self {
        let data: &[CircleInstance] = set.active();
        let instances = if data.is_empty() {
            helpers::create_vertex_buffer(device, label, 0)
        } else {
            helpers::create_static_vertex_buffer(device, label, bytemuck::cast_slice(data))
        };
        Self {
            instances,
            instance_count: set.active_count() as u32,
        }
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, mesh: &CircleMesh) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, mesh.vertices.slice(..));
        pass.set_vertex_buffer(1, self.instances.slice(..));
        pass.draw(0..mesh.vertex_count, 0..self.instance_count);
    }
}

pub(crate) struct CircleMesh {
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

impl CircleMesh {
    pub(crate) fn new(device: &wgpu::Device, segment_count: u32) -> Self {
        let verts = unit_circle(segment_count);
        Self {
            vertices: helpers::create_static_vertex_buffer(
                device,
                "unit_circle",
                bytemuck::cast_slice(&verts),
            ),
            vertex_count: verts.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_uniforms_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<BatchUniforms>(), 144);
    }

    #[test]
    fn instance_attributes_cover_the_instance_struct() {
        let last = CIRCLE_INSTANCE_ATTRIBUTES[4];
        assert_eq!(last.offset, 64);
        assert!(std::mem::size_of::<CircleInstance>() as u64 >= last.offset + 4);
    }

    #[test]
    fn bloom_batches_are_brighter_than_normal_ones() {
        let sum = |c: [f32; 3]| c.iter().sum::<f32>();
        assert!(sum(BatchKind::BloomLines.color()) > sum(BatchKind::Lines.color()));
        assert!(sum(BatchKind::BloomCircles.color()) > sum(BatchKind::Rings.color()));
    }

    #[test]
    fn uniform_color_is_opaque() {
        let u = BatchUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, LINE_COLOR);
        assert_eq!(u.color[3], 1.0);
        assert_eq!(&u.color[..3], &LINE_COLOR);
    }
}
