//! Shadow mapping
//!
//! Renders every shadow caster from the light's point of view into a single
//! depth texture. The lit shader then projects each fragment into that
//! texture and compares depths to decide whether the light reaches it.

use crate::pipeline::{primitive_state, uniform_layout};
use crate::primitives::Vertex;
use bytemuck::{Pod, Zeroable};
use orrery_core::math::{self, Mat4};
use orrery_core::{ShadowSceneConfig, Vec3};

/// Vertical field of view of the light's projection
pub const LIGHT_FOV_DEGREES: f32 = 60.0;
pub const LIGHT_NEAR: f32 = 0.1;
pub const LIGHT_FAR: f32 = 1000.0;

/// Uniform data for a single shadow draw call
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowDrawUniforms {
    pub light_mvp: Mat4,
}

/// View and projection matrices of a light aimed at the origin
pub fn light_matrices(light_pos: Vec3, aspect: f32) -> (Mat4, Mat4) {
    let view = math::look_at(light_pos, Vec3::ZERO, Vec3::UP);
    let proj = math::perspective(LIGHT_FOV_DEGREES, aspect, LIGHT_NEAR, LIGHT_FAR);
    (view, proj)
}

/// Shadow map edge lengths: the configured square size, or the window size when 0
pub fn shadow_map_extent(configured: u32, width: u32, height: u32) -> (u32, u32) {
    if configured > 0 {
        (configured, configured)
    } else {
        (width.max(1), height.max(1))
    }
}

/// The shadow mapping system
pub struct ShadowPass {
    pub shadow_pipeline: wgpu::RenderPipeline,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_texture: wgpu::Texture,
    pub shadow_view: wgpu::TextureView,
    pub shadow_sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
    /// Configured map size; 0 follows the window
    configured_size: u32,
}

impl ShadowPass {
    pub fn new(device: &wgpu::Device, config: &ShadowSceneConfig, width: u32, height: u32) -> Self {
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shadow_shader.wgsl").into()),
        });

        let shadow_bind_group_layout =
            uniform_layout(device, "Shadow Draw Bind Group Layout", wgpu::ShaderStages::VERTEX);

        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Shadow Pipeline Layout"),
                bind_group_layouts: &[&shadow_bind_group_layout],
                push_constant_ranges: &[],
            });

        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Depth Pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_shadow"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: None, // Depth only
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: config.depth_bias_constant,
                    slope_scale: config.depth_bias_slope,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let (map_width, map_height) = shadow_map_extent(config.shadow_map_size, width, height);
        let (shadow_texture, shadow_view) = Self::create_map(device, map_width, map_height);

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Comparison Sampler"),
            compare: Some(wgpu::CompareFunction::LessEqual),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        tracing::debug!("Shadow map {}x{}", map_width, map_height);

        Self {
            shadow_pipeline,
            shadow_bind_group_layout,
            shadow_texture,
            shadow_view,
            shadow_sampler,
            width: map_width,
            height: map_height,
            configured_size: config.shadow_map_size,
        }
    }

    fn create_map(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: crate::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Follow a window resize. Only window-sized maps are recreated.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (w, h) = shadow_map_extent(self.configured_size, width, height);
        if (w, h) == (self.width, self.height) {
            return;
        }
        let (texture, view) = Self::create_map(device, w, h);
        self.shadow_texture = texture;
        self.shadow_view = view;
        self.width = w;
        self.height = h;
        tracing::debug!("Shadow map resized to {}x{}", w, h);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Combined light view-projection for the current map
    pub fn light_view_proj(&self, light_pos: Vec3) -> Mat4 {
        let (view, proj) = light_matrices(light_pos, self.aspect_ratio());
        math::mul(&proj, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_extent_follows_window_when_unset() {
        assert_eq!(shadow_map_extent(0, 1000, 800), (1000, 800));
        assert_eq!(shadow_map_extent(0, 0, 0), (1, 1));
        assert_eq!(shadow_map_extent(2048, 1000, 800), (2048, 2048));
    }

    #[test]
    fn test_light_above_origin_sees_origin_at_centre() {
        let (view, proj) = light_matrices(Vec3::new(0.0, 5.0, 0.0), 1.0);
        let vp = math::mul(&proj, &view);
        let p = math::transform_point(&vp, Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let (view, proj) = light_matrices(Vec3::new(0.0, 5.0, 0.0), 1.0);
        let vp = math::mul(&proj, &view);
        let near = math::transform_point(&vp, Vec3::new(0.0, 1.0, 0.0));
        let far = math::transform_point(&vp, Vec3::new(0.0, -1.0, 0.0));
        assert!(near.z < far.z);
    }
}
