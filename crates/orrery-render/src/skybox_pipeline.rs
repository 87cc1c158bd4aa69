//! Skybox render pipeline: an inward-facing cube textured with a cross-layout
//! atlas
//!
//! Uses the unlit shader. Depth testing and depth writes are both off, so the
//! box is drawn first and everything else lands in front of it.

use crate::pipeline::{depth_state, primitive_state, UnlitPipeline};
use crate::primitives::Vertex;
use orrery_core::math::{self, Mat4};
use orrery_core::Vec3;

/// Model matrix for a skybox of the given half-extent centred at the origin
pub fn skybox_model(scale: f32) -> Mat4 {
    math::scaling(Vec3::new(scale, scale, scale))
}

pub struct SkyboxPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl SkyboxPipeline {
    /// Shares the unlit pipeline's shader and bind group layouts
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, unlit: &UnlitPipeline) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[
                &unlit.transform_bind_group_layout,
                &unlit.texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &unlit.shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &unlit.shader,
                entry_point: Some("fs_textured"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Always)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skybox_model_scales_unit_cube() {
        let m = skybox_model(250.0);
        let corner = math::transform_point(&m, Vec3::ONE);
        assert_eq!(corner, Vec3::new(250.0, 250.0, 250.0));
    }
}
