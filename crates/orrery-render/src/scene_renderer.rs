//! Scene renderer: turns a `FrameDesc` into a shadow pass and a main pass

use crate::camera::Projection;
use crate::gpu_mesh::{GpuMesh, MeshCache};
use crate::lit_pipeline::{LightUniforms, LitPipeline, ObjectUniforms};
use crate::pipeline::{UnlitPipeline, UnlitUniforms};
use crate::primitives::{
    create_cube_mesh, create_pentagonal_prism_mesh, create_skybox_mesh, create_sphere_mesh,
    line_vertices, mesh_from_imported, Vertex,
};
use crate::shadow::{ShadowDrawUniforms, ShadowPass};
use crate::skybox_pipeline::{skybox_model, SkyboxPipeline};
use crate::texture_cache::{GpuTexture, TextureCache};
use orrery_core::math::{self, Mat4};
use orrery_core::{Color, OrreryConfig};
use orrery_import::import_obj;
use orrery_scene::{DemoState, DrawItem, FrameDesc, MeshKey, Shading};
use std::collections::HashMap;

/// Cache key of the inward-facing skybox cube
const SKYBOX_MESH: &str = "skybox";

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

/// Grow-only set of uniform buffers with one bind group each. Every draw in
/// a frame gets its own slot, rewritten with `queue.write_buffer`.
struct UniformPool {
    label: &'static str,
    slots: Vec<(wgpu::Buffer, wgpu::BindGroup)>,
}

impl UniformPool {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: Vec::new(),
        }
    }

    fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        blocks: &[T],
    ) {
        while self.slots.len() < blocks.len() {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} Uniform Buffer {}", self.label, self.slots.len())),
                size: std::mem::size_of::<T>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
                label: Some(&format!("{} Bind Group {}", self.label, self.slots.len())),
            });
            self.slots.push((buffer, bind_group));
        }
        for ((buffer, _), block) in self.slots.iter().zip(blocks) {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(std::slice::from_ref(block)));
        }
    }

    fn bind_group(&self, slot: usize) -> &wgpu::BindGroup {
        &self.slots[slot].1
    }
}

/// Where an object's uniforms live for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectSlot {
    Lit(usize),
    Unlit(usize),
}

/// Uniform blocks for every draw of one frame, in draw order
#[derive(Debug, Default)]
struct FrameUniforms {
    shadow: Vec<ShadowDrawUniforms>,
    lit: Vec<ObjectUniforms>,
    unlit: Vec<UnlitUniforms>,
    /// One entry per `FrameDesc::objects` item
    objects: Vec<ObjectSlot>,
    skybox: Option<usize>,
    lines: Option<usize>,
}

impl FrameUniforms {
    fn build(frame: &FrameDesc, view: &Mat4, proj: &Mat4, light_view_proj: &Mat4) -> Self {
        let mut uniforms = Self::default();

        if frame.wants_shadow_pass() {
            uniforms.shadow = frame
                .shadow_casters()
                .map(|item| ShadowDrawUniforms {
                    light_mvp: math::mul(light_view_proj, &item.model),
                })
                .collect();
        }

        if let Some(skybox) = &frame.skybox {
            let block = UnlitUniforms::new(proj, view, &skybox_model(skybox.scale));
            uniforms.skybox = Some(uniforms.push_unlit(block));
        }

        // Lit items fall back to unlit when the frame has no light
        for item in &frame.objects {
            let slot = match (item.shading, frame.lighting.is_some()) {
                (Shading::Lit, true) => {
                    uniforms.lit.push(ObjectUniforms::new(
                        view,
                        proj,
                        &item.model,
                        light_view_proj,
                        &item.material,
                    ));
                    ObjectSlot::Lit(uniforms.lit.len() - 1)
                }
                _ => ObjectSlot::Unlit(
                    uniforms.push_unlit(UnlitUniforms::new(proj, view, &item.model)),
                ),
            };
            uniforms.objects.push(slot);
        }

        if !frame.lines.is_empty() {
            let block = UnlitUniforms::new(proj, view, &math::IDENTITY);
            uniforms.lines = Some(uniforms.push_unlit(block));
        }

        uniforms
    }

    fn push_unlit(&mut self, block: UnlitUniforms) -> usize {
        self.unlit.push(block);
        self.unlit.len() - 1
    }
}

pub struct SceneRenderer {
    unlit: UnlitPipeline,
    lit: LitPipeline,
    skybox: SkyboxPipeline,
    shadow: ShadowPass,
    textures: TextureCache,
    texture_bind_groups: HashMap<String, wgpu::BindGroup>,
    default_texture_bind_group: wgpu::BindGroup,
    meshes: MeshCache,
    sphere_precision: u32,

    // Per-frame buffers, reused across frames
    shadow_uniforms: UniformPool,
    lit_uniforms: UniformPool,
    unlit_uniforms: UniformPool,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    line_buffer: Option<(wgpu::Buffer, usize)>,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &OrreryConfig,
    ) -> Self {
        let unlit = UnlitPipeline::new(device, format);
        let lit = LitPipeline::new(device, format, &unlit.texture_bind_group_layout);
        let skybox = SkyboxPipeline::new(device, format, &unlit);
        let shadow = ShadowPass::new(device, &config.shadows, width, height);

        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Uniform Buffer"),
            size: std::mem::size_of::<LightUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_bind_group = Self::create_light_bind_group(device, &lit, &shadow, &light_buffer);

        let textures = TextureCache::new(device, queue);
        let default_texture_bind_group = Self::create_texture_bind_group(
            device,
            &unlit.texture_bind_group_layout,
            "Default White",
            &textures.default_white,
        );

        Self {
            unlit,
            lit,
            skybox,
            shadow,
            textures,
            texture_bind_groups: HashMap::new(),
            default_texture_bind_group,
            meshes: MeshCache::new(),
            sphere_precision: config.solar.sphere_precision,
            shadow_uniforms: UniformPool::new("Shadow Draw"),
            lit_uniforms: UniformPool::new("Lit Object"),
            unlit_uniforms: UniformPool::new("Unlit Transform"),
            light_buffer,
            light_bind_group,
            line_buffer: None,
        }
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        name: &str,
        texture: &GpuTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(&format!("{} Texture Bind Group", name)),
        })
    }

    /// Light uniforms plus the shadow map. Rebuilt whenever the map is.
    fn create_light_bind_group(
        device: &wgpu::Device,
        lit: &LitPipeline,
        shadow: &ShadowPass,
        light_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &lit.light_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.shadow_sampler),
                },
            ],
            label: Some("Light Bind Group"),
        })
    }

    /// Upload line vertices, growing the buffer when a frame needs more room
    fn write_lines(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        let fits = matches!(&self.line_buffer, Some((_, capacity)) if *capacity >= vertices.len());
        if !fits {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Line Vertex Buffer"),
                size: std::mem::size_of_val(vertices) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.line_buffer = Some((buffer, vertices.len()));
        }
        if let Some((buffer, _)) = &self.line_buffer {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Load the demo's textures and upload every mesh it can draw.
    ///
    /// Missing textures become solid colors and a missing model is skipped,
    /// both with a warning, so a bare checkout still renders.
    pub fn load_assets(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        state: &DemoState,
        config: &OrreryConfig,
    ) {
        for texture in state.demo().textures() {
            let path = config.assets.texture_path(texture.file);
            self.textures
                .load_or_fallback(device, queue, texture.name, &path, texture.fallback);
            let bind_group = Self::create_texture_bind_group(
                device,
                &self.unlit.texture_bind_group_layout,
                texture.name,
                self.textures.get(texture.name),
            );
            self.texture_bind_groups
                .insert(texture.name.to_string(), bind_group);
        }

        self.meshes.upload(
            device,
            &MeshKey::Sphere.to_string(),
            &create_sphere_mesh(self.sphere_precision),
        );
        self.meshes.upload(
            device,
            &MeshKey::PentagonalPrism.to_string(),
            &create_pentagonal_prism_mesh(),
        );
        self.meshes
            .upload(device, &MeshKey::Cube.to_string(), &create_cube_mesh());
        self.meshes
            .upload(device, SKYBOX_MESH, &create_skybox_mesh());

        for file in state.model_files() {
            let path = config.assets.model_path(&file);
            match import_obj(&path) {
                Ok(model) => {
                    tracing::info!(
                        "Loaded model '{}' ({} vertices, {} triangles)",
                        file,
                        model.vertex_count(),
                        model.triangle_count()
                    );
                    self.meshes.upload(
                        device,
                        &MeshKey::Model(file).to_string(),
                        &mesh_from_imported(&model),
                    );
                }
                Err(e) => {
                    tracing::warn!("Model '{}' not loaded, it will not be drawn: {}", file, e);
                }
            }
        }

        tracing::info!(
            "Loaded {} textures for the {} demo",
            self.textures.len(),
            state.demo()
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.shadow.resize(device, width, height);
        self.light_bind_group =
            Self::create_light_bind_group(device, &self.lit, &self.shadow, &self.light_buffer);
    }

    fn mesh_for(&self, item: &DrawItem) -> Option<&GpuMesh> {
        let mesh = self.meshes.get(&item.mesh.to_string());
        if mesh.is_none() {
            tracing::trace!("No mesh uploaded for {}", item.mesh);
        }
        mesh
    }

    fn texture_bind_group(&self, name: &str) -> &wgpu::BindGroup {
        self.texture_bind_groups
            .get(name)
            .unwrap_or(&self.default_texture_bind_group)
    }

    /// Render one frame into `color_view`
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        view: &Mat4,
        projection: &Projection,
        frame: &FrameDesc,
    ) {
        let proj = projection.matrix();
        let light_view_proj = frame
            .lighting
            .map(|l| self.shadow.light_view_proj(l.light.position))
            .unwrap_or(math::IDENTITY);

        let uniforms = FrameUniforms::build(frame, view, &proj, &light_view_proj);
        self.shadow_uniforms.write(
            device,
            queue,
            &self.shadow.shadow_bind_group_layout,
            &uniforms.shadow,
        );
        self.lit_uniforms.write(
            device,
            queue,
            &self.lit.object_bind_group_layout,
            &uniforms.lit,
        );
        self.unlit_uniforms.write(
            device,
            queue,
            &self.unlit.transform_bind_group_layout,
            &uniforms.unlit,
        );
        if let Some(lighting) = &frame.lighting {
            let block = LightUniforms::new(lighting, view);
            queue.write_buffer(&self.light_buffer, 0, bytemuck::cast_slice(&[block]));
        }
        let lines = line_vertices(&frame.lines);
        if !lines.is_empty() {
            self.write_lines(device, queue, &lines);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        // Shadow pass: the map is cleared to the far plane even without
        // casters so lit fragments never read stale depth
        if frame.lighting.is_some() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !uniforms.shadow.is_empty() {
                pass.set_pipeline(&self.shadow.shadow_pipeline);
                for (slot, item) in frame.shadow_casters().enumerate() {
                    let Some(mesh) = self.mesh_for(item) else {
                        continue;
                    };
                    pass.set_bind_group(0, self.shadow_uniforms.bind_group(slot), &[]);
                    mesh.draw(&mut pass);
                }
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_wgpu_color(frame.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(skybox), Some(slot)) = (&frame.skybox, uniforms.skybox) {
                if let Some(mesh) = self.meshes.get(SKYBOX_MESH) {
                    pass.set_pipeline(&self.skybox.pipeline);
                    pass.set_bind_group(0, self.unlit_uniforms.bind_group(slot), &[]);
                    pass.set_bind_group(1, self.texture_bind_group(&skybox.texture), &[]);
                    mesh.draw(&mut pass);
                }
            }

            for (item, slot) in frame.objects.iter().zip(&uniforms.objects) {
                let Some(mesh) = self.mesh_for(item) else {
                    continue;
                };
                let texture = self.texture_bind_group(&item.texture);

                match *slot {
                    ObjectSlot::Lit(slot) => {
                        pass.set_pipeline(&self.lit.render_pipeline);
                        pass.set_bind_group(0, self.lit_uniforms.bind_group(slot), &[]);
                        pass.set_bind_group(1, texture, &[]);
                        pass.set_bind_group(2, &self.light_bind_group, &[]);
                    }
                    ObjectSlot::Unlit(slot) => {
                        pass.set_pipeline(&self.unlit.render_pipeline);
                        pass.set_bind_group(0, self.unlit_uniforms.bind_group(slot), &[]);
                        pass.set_bind_group(1, texture, &[]);
                    }
                }
                mesh.draw(&mut pass);
            }

            if let (Some(slot), Some((buffer, _))) = (uniforms.lines, &self.line_buffer) {
                pass.set_pipeline(&self.unlit.line_pipeline);
                pass.set_bind_group(0, self.unlit_uniforms.bind_group(slot), &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..lines.len() as u32, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_color_conversion() {
        let c = to_wgpu_color(Color::new(0.25, 0.5, 1.0, 1.0));
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 1.0, 1.0));
    }

    #[test]
    fn test_skybox_key_is_not_a_scene_mesh_key() {
        let keys = [
            MeshKey::Sphere,
            MeshKey::PentagonalPrism,
            MeshKey::Cube,
            MeshKey::Model("skybox".into()),
        ];
        assert!(keys.iter().all(|k| k.to_string() != SKYBOX_MESH));
    }

    fn lit_frame() -> FrameDesc {
        use orrery_core::Vec3;
        use orrery_scene::{LightingDesc, LineItem, Material, PositionalLight, SkyboxItem};

        FrameDesc {
            objects: vec![
                DrawItem::lit(MeshKey::Sphere, "earth", math::IDENTITY, Material::default()),
                DrawItem::unlit(MeshKey::Cube, "light", math::IDENTITY),
                DrawItem::lit(
                    MeshKey::Model("shuttle.obj".into()),
                    "shuttle",
                    math::translation(Vec3::new(2.0, 0.0, 0.0)),
                    Material::SILVER,
                ),
            ],
            lines: vec![LineItem {
                from: Vec3::ZERO,
                to: Vec3::X,
                color: Color::RED,
            }],
            skybox: Some(SkyboxItem {
                texture: "sky".into(),
                scale: 50.0,
            }),
            lighting: Some(LightingDesc {
                light: PositionalLight::default(),
                global_ambient: Color::gray(0.7),
                shadows: true,
            }),
            ..FrameDesc::default()
        }
    }

    #[test]
    fn test_frame_uniforms_give_each_draw_a_slot() {
        let frame = lit_frame();
        let view = math::IDENTITY;
        let proj = math::IDENTITY;
        let light_vp = math::scaling(orrery_core::Vec3::new(0.5, 0.5, 0.5));
        let uniforms = FrameUniforms::build(&frame, &view, &proj, &light_vp);

        assert_eq!(uniforms.shadow.len(), 2);
        assert_eq!(uniforms.lit.len(), 2);
        // Skybox, the unlit cube, then the lines
        assert_eq!(uniforms.unlit.len(), 3);
        assert_eq!(uniforms.skybox, Some(0));
        assert_eq!(
            uniforms.objects,
            vec![ObjectSlot::Lit(0), ObjectSlot::Unlit(1), ObjectSlot::Lit(1)]
        );
        assert_eq!(uniforms.lines, Some(2));

        let expected = math::mul(&light_vp, &frame.objects[2].model);
        assert_eq!(uniforms.shadow[1].light_mvp, expected);
    }

    #[test]
    fn test_frame_uniforms_fall_back_to_unlit_without_light() {
        let mut frame = lit_frame();
        frame.lighting = None;
        frame.skybox = None;
        frame.lines.clear();
        let uniforms =
            FrameUniforms::build(&frame, &math::IDENTITY, &math::IDENTITY, &math::IDENTITY);

        assert!(uniforms.shadow.is_empty());
        assert!(uniforms.lit.is_empty());
        assert_eq!(
            uniforms.objects,
            vec![ObjectSlot::Unlit(0), ObjectSlot::Unlit(1), ObjectSlot::Unlit(2)]
        );
        assert_eq!(uniforms.skybox, None);
        assert_eq!(uniforms.lines, None);
    }
}
