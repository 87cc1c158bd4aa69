//! Lit pipeline: ambient, diffuse and specular shading in view space, with a
//! shadow-map lookup per fragment

use crate::pipeline::{depth_state, primitive_state, uniform_layout};
use crate::primitives::Vertex;
use bytemuck::{Pod, Zeroable};
use orrery_core::math::{self, Mat4};
use orrery_core::Color;
use orrery_scene::{LightingDesc, Material};

/// Per-draw transforms and material (bind group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub mv: Mat4,
    pub proj: Mat4,
    /// Inverse-transpose of `mv`
    pub norm: Mat4,
    /// Model to shadow-map texture space
    pub shadow_mvp: Mat4,
    pub mat_ambient: [f32; 4],
    pub mat_diffuse: [f32; 4],
    pub mat_specular: [f32; 4],
    /// x = shininess
    pub mat_params: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(
        view: &Mat4,
        proj: &Mat4,
        model: &Mat4,
        light_view_proj: &Mat4,
        material: &Material,
    ) -> Self {
        let mv = math::mul(view, model);
        let shadow_mvp = math::mul(&math::shadow_bias(), &math::mul(light_view_proj, model));
        Self {
            mv,
            proj: *proj,
            norm: math::normal_matrix(&mv),
            shadow_mvp,
            mat_ambient: material.ambient.to_array(),
            mat_diffuse: material.diffuse.to_array(),
            mat_specular: material.specular.to_array(),
            mat_params: [material.shininess, 0.0, 0.0, 0.0],
        }
    }
}

/// Light and global ambient for the frame (bind group 2, binding 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub global_ambient: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// View-space position, w unused
    pub position: [f32; 4],
}

impl LightUniforms {
    /// The light position is transformed into view space here
    pub fn new(lighting: &LightingDesc, view: &Mat4) -> Self {
        let p = math::transform_point(view, lighting.light.position);
        Self {
            global_ambient: lighting.global_ambient.to_array(),
            ambient: lighting.light.ambient.to_array(),
            diffuse: lighting.light.diffuse.to_array(),
            specular: lighting.light.specular.to_array(),
            position: [p.x, p.y, p.z, 1.0],
        }
    }
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            global_ambient: Color::BLACK.to_array(),
            ambient: Color::BLACK.to_array(),
            diffuse: Color::BLACK.to_array(),
            specular: Color::BLACK.to_array(),
            position: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub struct LitPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    pub object_bind_group_layout: wgpu::BindGroupLayout,
    /// Light uniforms, shadow depth texture and comparison sampler
    pub light_bind_group_layout: wgpu::BindGroupLayout,
}

impl LitPipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("lit_shader.wgsl").into()),
        });

        let object_bind_group_layout = uniform_layout(
            device,
            "Lit Object Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
                label: Some("Lit Light Bind Group Layout"),
            });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[
                &object_bind_group_layout,
                texture_bind_group_layout,
                &light_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::LessEqual)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            object_bind_group_layout,
            light_bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::Vec3;
    use orrery_scene::PositionalLight;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 4 * 64 + 4 * 16);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 5 * 16);
    }

    #[test]
    fn test_light_position_moves_to_view_space() {
        let lighting = LightingDesc {
            light: PositionalLight::at(Vec3::new(0.0, 5.0, 0.0)),
            global_ambient: Color::gray(0.7),
            shadows: true,
        };
        let view = math::translation(Vec3::new(0.0, 0.0, -10.0));
        let u = LightUniforms::new(&lighting, &view);
        assert_eq!(u.position, [0.0, 5.0, -10.0, 1.0]);
        assert_eq!(u.global_ambient, [0.7, 0.7, 0.7, 1.0]);
        assert_eq!(u.diffuse, [1.0; 4]);
    }

    #[test]
    fn test_object_uniforms_shadow_coord() {
        // With identity light matrices the bias maps the origin to the map centre
        let u = ObjectUniforms::new(
            &math::IDENTITY,
            &math::IDENTITY,
            &math::IDENTITY,
            &math::IDENTITY,
            &Material::SILVER,
        );
        let c = math::transform_point(&u.shadow_mvp, Vec3::ZERO);
        assert!((c - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-6);
        let corner = math::transform_point(&u.shadow_mvp, Vec3::new(1.0, 1.0, 0.5));
        assert!((corner - Vec3::new(1.0, 0.0, 0.5)).length() < 1e-6);
        assert_eq!(u.mat_params[0], 51.2);
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let model = math::scaling(Vec3::new(2.0, 1.0, 1.0));
        let u = ObjectUniforms::new(
            &math::IDENTITY,
            &math::IDENTITY,
            &model,
            &math::IDENTITY,
            &Material::default(),
        );
        let n = math::transform_vector(&u.norm, Vec3::new(1.0, 1.0, 0.0));
        assert!((n - Vec3::new(0.5, 1.0, 0.0)).length() < 1e-5);
    }
}
