//! Orrery Render - wgpu renderer for the Orrery demos
//!
//! Draws a `FrameDesc` produced by the scene crate: unlit textured meshes,
//! colored lines, a skybox, and lit meshes shaded with a single positional
//! light and a shadow map. Works against a window surface or an offscreen
//! texture for screenshots.

mod camera;
mod context;
mod gpu_mesh;
mod headless;
pub mod lit_pipeline;
mod pipeline;
mod primitives;
mod scene_renderer;
pub mod shadow;
pub mod skybox_pipeline;
mod texture_cache;

/// Depth buffer format shared by the main and shadow passes
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub use camera::Projection;
pub use context::{RenderContext, RenderError};
pub use gpu_mesh::{GpuMesh, MeshCache};
pub use headless::HeadlessContext;
pub use lit_pipeline::{LightUniforms, LitPipeline, ObjectUniforms};
pub use pipeline::{UnlitPipeline, UnlitUniforms};
pub use primitives::{
    create_cube_mesh, create_pentagonal_prism_mesh, create_skybox_mesh, create_sphere_mesh,
    line_vertices, mesh_from_imported, Mesh, Vertex,
};
pub use scene_renderer::SceneRenderer;
pub use shadow::ShadowPass;
pub use skybox_pipeline::SkyboxPipeline;
pub use texture_cache::{decode_image, GpuTexture, TextureCache};

#[cfg(test)]
mod tests {
    fn parse_and_validate(name: &str, source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{} failed to parse: {}", name, e.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{} failed validation: {:?}", name, e));
    }

    #[test]
    fn unlit_shader_wgsl_parses() {
        parse_and_validate("unlit_shader.wgsl", include_str!("unlit_shader.wgsl"));
    }

    #[test]
    fn lit_shader_wgsl_parses() {
        parse_and_validate("lit_shader.wgsl", include_str!("lit_shader.wgsl"));
    }

    #[test]
    fn shadow_shader_wgsl_parses() {
        parse_and_validate("shadow_shader.wgsl", include_str!("shadow_shader.wgsl"));
    }
}
