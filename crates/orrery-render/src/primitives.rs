//! Mesh primitives (sphere, pentagonal prism, cube, skybox) and line vertices
//!
//! Texture coordinates are given with v pointing down the image, so atlas
//! layouts authored with v pointing up are flipped on the way in.

use bytemuck::{Pod, Zeroable};
use orrery_core::Vec3;
use orrery_import::ImportedModel;
use orrery_scene::LineItem;
use std::f32::consts::PI;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A vertex with position, normal, color, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn textured(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            color: WHITE,
            uv,
        }
    }
}

/// A mesh with vertices and indices
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn sequential(vertices: Vec<Vertex>) -> Self {
        let indices = (0..vertices.len() as u32).collect();
        Self { vertices, indices }
    }
}

fn flip_v(uv: [f32; 2]) -> [f32; 2] {
    [uv[0], 1.0 - uv[1]]
}

/// Unit sphere with `(precision + 1)^2` vertices. Rows run from the south
/// pole (row 0) to the north pole; the seam column is duplicated so the
/// texture wraps once around.
pub fn create_sphere_mesh(precision: u32) -> Mesh {
    let prec = precision.max(3);
    let stride = prec + 1;

    let mut vertices = Vec::with_capacity((stride * stride) as usize);
    for i in 0..=prec {
        for j in 0..=prec {
            let y = (PI - PI * i as f32 / prec as f32).cos();
            let ring = y.asin().cos().abs();
            let angle = 2.0 * PI * j as f32 / prec as f32;
            let x = -angle.cos() * ring;
            let z = angle.sin() * ring;

            let s = j as f32 / prec as f32;
            let t = i as f32 / prec as f32;
            vertices.push(Vertex::textured([x, y, z], [x, y, z], flip_v([s, t])));
        }
    }

    let mut indices = Vec::with_capacity((6 * prec * prec) as usize);
    for i in 0..prec {
        for j in 0..prec {
            let row = i * stride + j;
            let next_row = (i + 1) * stride + j;
            indices.extend_from_slice(&[row, row + 1, next_row, row + 1, next_row + 1, next_row]);
        }
    }

    Mesh { vertices, indices }
}

/// Pentagonal prism of height 1 along z, circumradius 1, with the top cap at
/// z = +0.5. Twelve shared vertices: a cap center followed by five rim points
/// for each cap.
pub fn create_pentagonal_prism_mesh() -> Mesh {
    let c1 = (2.0 * PI / 5.0).cos();
    let c2 = (PI / 5.0).cos();
    let s1 = (2.0 * PI / 5.0).sin();
    let s2 = (4.0 * PI / 5.0).sin();

    let outline = [
        [0.0, 0.0],
        [0.0, 1.0],
        [s1, c1],
        [s2, -c2],
        [-s2, -c2],
        [-s1, c1],
    ];
    let cap_uvs = [
        [0.5, 0.5],
        [0.5, 1.0],
        [1.0, 0.6],
        [0.8, 0.0],
        [0.2, 0.0],
        [0.0, 0.6],
    ];

    let mut vertices = Vec::with_capacity(12);
    for z in [0.5f32, -0.5] {
        for (xy, uv) in outline.iter().zip(cap_uvs) {
            let position = [xy[0], xy[1], z];
            let normal = Vec3::from_array(position).normalized().to_array();
            vertices.push(Vertex::textured(position, normal, flip_v(uv)));
        }
    }

    // Counter-clockwise seen from outside
    #[rustfmt::skip]
    let indices = vec![
        // top cap
        0, 2, 1,  0, 3, 2,  0, 4, 3,  0, 5, 4,  0, 1, 5,
        // bottom cap
        6, 11, 7,  6, 10, 11,  6, 9, 10,  6, 8, 9,  6, 7, 8,
        // sides
        1, 2, 7,  7, 2, 8,
        2, 3, 8,  8, 3, 9,
        3, 4, 9,  9, 4, 10,
        4, 5, 10,  10, 5, 11,
        5, 1, 11,  11, 1, 7,
    ];

    Mesh { vertices, indices }
}

/// Cube corners for 12 triangles, wound counter-clockwise seen from inside,
/// in face order back, right, front, left, bottom, top
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0, -1.0],
    [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
    [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0,  1.0],
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0],
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0],
    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
];

const THIRD: f32 = 1.0 / 3.0;
const TWO_THIRDS: f32 = 2.0 / 3.0;

/// Cross-layout atlas coordinates (v up) matching `CUBE_POSITIONS`
#[rustfmt::skip]
const CUBE_ATLAS_UVS: [[f32; 2]; 36] = [
    [0.25, TWO_THIRDS], [0.25, THIRD], [0.5, THIRD],
    [0.5, THIRD], [0.5, TWO_THIRDS], [0.25, TWO_THIRDS],
    [0.5, THIRD], [0.75, THIRD], [0.5, TWO_THIRDS],
    [0.75, THIRD], [0.75, TWO_THIRDS], [0.5, TWO_THIRDS],
    [0.75, THIRD], [1.0, THIRD], [0.75, TWO_THIRDS],
    [1.0, THIRD], [1.0, TWO_THIRDS], [0.75, TWO_THIRDS],
    [0.0, THIRD], [0.25, THIRD], [0.0, TWO_THIRDS],
    [0.25, THIRD], [0.25, TWO_THIRDS], [0.0, TWO_THIRDS],
    [0.25, 0.0], [0.5, 0.0], [0.5, THIRD],
    [0.5, THIRD], [0.25, THIRD], [0.25, 0.0],
    [0.25, TWO_THIRDS], [0.5, TWO_THIRDS], [0.5, 1.0],
    [0.5, 1.0], [0.25, 1.0], [0.25, TWO_THIRDS],
];

fn cube_triangles(outward: bool) -> Mesh {
    let mut vertices = Vec::with_capacity(36);
    for tri in 0..12 {
        let base = tri * 3;
        let order = if outward {
            [base, base + 2, base + 1]
        } else {
            [base, base + 1, base + 2]
        };
        let [a, b, c] = order.map(|i| Vec3::from_array(CUBE_POSITIONS[i]));
        let normal = (b - a).cross(&(c - a)).normalized().to_array();
        for i in order {
            vertices.push(Vertex::textured(
                CUBE_POSITIONS[i],
                normal,
                flip_v(CUBE_ATLAS_UVS[i]),
            ));
        }
    }
    Mesh::sequential(vertices)
}

/// Cube spanning [-1, 1] with outward faces and cross-layout UVs
pub fn create_cube_mesh() -> Mesh {
    cube_triangles(true)
}

/// The cube wound to be seen from inside, for skyboxes
pub fn create_skybox_mesh() -> Mesh {
    cube_triangles(false)
}

/// De-indexed mesh from an imported model
pub fn mesh_from_imported(model: &ImportedModel) -> Mesh {
    let vertices = model
        .positions
        .iter()
        .zip(&model.normals)
        .zip(&model.tex_coords)
        .map(|((p, n), uv)| Vertex::textured(*p, *n, flip_v(*uv)))
        .collect();
    Mesh::sequential(vertices)
}

/// Two vertices per segment, for a line-list pipeline
pub fn line_vertices(lines: &[LineItem]) -> Vec<Vertex> {
    lines
        .iter()
        .flat_map(|line| {
            let color = line.color.to_array();
            [line.from, line.to].map(|p| Vertex {
                position: p.to_array(),
                normal: [0.0, 0.0, 0.0],
                color,
                uv: [0.0, 0.0],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::Color;

    /// Every non-degenerate triangle's winding normal points away from the origin
    fn assert_wound_outward(mesh: &Mesh, sign: f32) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let n = (b - a).cross(&(c - a));
            if n.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(
                n.dot(&centroid) * sign > 0.0,
                "triangle {:?} is wound the wrong way",
                tri
            );
        }
    }

    #[test]
    fn test_sphere_counts() {
        let sphere = create_sphere_mesh(24);
        assert_eq!(sphere.vertex_count(), 25 * 25);
        assert_eq!(sphere.index_count(), 6 * 24 * 24);
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertex_count()));
    }

    #[test]
    fn test_sphere_is_unit_and_outward() {
        let sphere = create_sphere_mesh(24);
        for v in &sphere.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.0).abs() < 1e-4);
            assert_eq!(v.position, v.normal);
            assert!((0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]));
        }
        assert_wound_outward(&sphere, 1.0);
    }

    #[test]
    fn test_sphere_poles() {
        let sphere = create_sphere_mesh(8);
        assert!((sphere.vertices[0].position[1] + 1.0).abs() < 1e-5);
        assert!((sphere.vertices.last().unwrap().position[1] - 1.0).abs() < 1e-5);
        // South pole samples the bottom row of the image
        assert_eq!(sphere.vertices[0].uv[1], 1.0);
    }

    #[test]
    fn test_sphere_precision_floor() {
        assert_eq!(create_sphere_mesh(1).vertex_count(), 16);
    }

    #[test]
    fn test_prism_shape() {
        let prism = create_pentagonal_prism_mesh();
        assert_eq!(prism.vertex_count(), 12);
        assert_eq!(prism.index_count(), 60);
        assert_eq!(prism.vertices[1].position, [0.0, 1.0, 0.5]);
        assert_eq!(prism.vertices[7].position, [0.0, 1.0, -0.5]);
        assert_eq!(prism.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(prism.vertices[6].normal, [0.0, 0.0, -1.0]);
        // Rim points lie on the unit circle
        for v in prism.vertices.iter().filter(|v| v.position[0] != 0.0 || v.position[1] != 0.0) {
            let r = (v.position[0].powi(2) + v.position[1].powi(2)).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
        assert_wound_outward(&prism, 1.0);
    }

    #[test]
    fn test_cube_faces_outward() {
        let cube = create_cube_mesh();
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.index_count(), 36);
        assert_wound_outward(&cube, 1.0);
        for v in &cube.vertices {
            let p = Vec3::from_array(v.position);
            assert!(Vec3::from_array(v.normal).dot(&p) > 0.0);
        }
    }

    #[test]
    fn test_skybox_faces_inward() {
        let sky = create_skybox_mesh();
        assert_wound_outward(&sky, -1.0);
        assert!(sky
            .vertices
            .iter()
            .all(|v| (0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1])));
        // First atlas coordinate (0.25, 2/3) flips to (0.25, 1/3)
        assert!((sky.vertices[0].uv[1] - THIRD).abs() < 1e-6);
    }

    #[test]
    fn test_mesh_from_imported() {
        let model = ImportedModel {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
        };
        let mesh = mesh_from_imported(&model);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_line_vertices() {
        let lines = [LineItem {
            from: Vec3::ZERO,
            to: Vec3::new(5.0, 0.0, 0.0),
            color: Color::RED,
        }];
        let verts = line_vertices(&lines);
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[1].position, [5.0, 0.0, 0.0]);
        assert_eq!(verts[0].color, [1.0, 0.0, 0.0, 1.0]);
    }
}
