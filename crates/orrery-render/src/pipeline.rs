//! Render pipeline setup for unlit textured meshes and colored lines

use crate::primitives::Vertex;
use bytemuck::{Pod, Zeroable};
use orrery_core::math::{self, Mat4};

/// Per-draw transform for the unlit shader (bind group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct UnlitUniforms {
    pub mvp: Mat4,
}

impl UnlitUniforms {
    pub fn new(proj: &Mat4, view: &Mat4, model: &Mat4) -> Self {
        Self {
            mvp: math::mul(proj, &math::mul(view, model)),
        }
    }
}

impl Default for UnlitUniforms {
    fn default() -> Self {
        Self { mvp: math::IDENTITY }
    }
}

/// Layout with a single uniform buffer at binding 0
pub(crate) fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

/// Layout for a filterable color texture at binding 0 and its sampler at binding 1
pub(crate) fn texture_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some(label),
    })
}

/// Counter-clockwise triangles with back faces culled, or unculled lines
pub(crate) fn primitive_state(topology: wgpu::PrimitiveTopology) -> wgpu::PrimitiveState {
    let cull_mode = match topology {
        wgpu::PrimitiveTopology::TriangleList | wgpu::PrimitiveTopology::TriangleStrip => {
            Some(wgpu::Face::Back)
        }
        _ => None,
    };
    wgpu::PrimitiveState {
        topology,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

pub(crate) fn depth_state(
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: crate::DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Textured unlit triangles plus vertex-colored lines, sharing one shader module
pub struct UnlitPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub transform_bind_group_layout: wgpu::BindGroupLayout,
    pub texture_bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) shader: wgpu::ShaderModule,
}

impl UnlitPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Unlit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("unlit_shader.wgsl").into()),
        });

        let transform_bind_group_layout =
            uniform_layout(device, "Unlit Transform Bind Group Layout", wgpu::ShaderStages::VERTEX);
        let texture_bind_group_layout = texture_layout(device, "Unlit Texture Bind Group Layout");

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Unlit Pipeline Layout"),
            bind_group_layouts: &[&transform_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Unlit Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_textured"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Lines only use the transform group
        let line_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&transform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Render Pipeline"),
            layout: Some(&line_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_vertex_color"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::LineList),
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::Less)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            line_pipeline,
            transform_bind_group_layout,
            texture_bind_group_layout,
            shader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::Vec3;

    #[test]
    fn test_unlit_uniforms_layout() {
        assert_eq!(std::mem::size_of::<UnlitUniforms>(), 64);
    }

    #[test]
    fn test_mvp_composition_order() {
        let proj = math::scaling(Vec3::new(2.0, 2.0, 2.0));
        let view = math::translation(Vec3::new(0.0, 0.0, -5.0));
        let model = math::translation(Vec3::X);
        let u = UnlitUniforms::new(&proj, &view, &model);
        // Model first, then view, then projection
        let p = math::transform_point(&u.mvp, Vec3::ZERO);
        assert!((p - Vec3::new(2.0, 0.0, -10.0)).length() < 1e-5);
    }

    #[test]
    fn test_lines_are_not_culled() {
        assert_eq!(
            primitive_state(wgpu::PrimitiveTopology::LineList).cull_mode,
            None
        );
        assert_eq!(
            primitive_state(wgpu::PrimitiveTopology::TriangleList).cull_mode,
            Some(wgpu::Face::Back)
        );
    }
}
