//! GPU mesh cache: uploads CPU meshes to vertex and index buffers

use crate::primitives::Mesh;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// A GPU-resident indexed triangle mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Uploaded meshes keyed by name
#[derive(Default)]
pub struct MeshCache {
    meshes: HashMap<String, GpuMesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `mesh` under `name`, replacing any previous upload
    pub fn upload(&mut self, device: &wgpu::Device, name: &str, mesh: &Mesh) {
        if mesh.indices.is_empty() {
            tracing::warn!("Skipping empty mesh '{}'", name);
            return;
        }
        self.meshes
            .insert(name.to_string(), GpuMesh::upload(device, name, mesh));
    }

    pub fn get(&self, name: &str) -> Option<&GpuMesh> {
        self.meshes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }
}
