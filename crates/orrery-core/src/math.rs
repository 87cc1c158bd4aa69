//! Column-major 4x4 matrix helpers
//!
//! Matrices are stored as `m[column][row]`, which is the layout WGSL expects
//! for `mat4x4<f32>` uniforms. Angles are in degrees unless a name says
//! otherwise. Clip-space depth follows the wgpu convention of `[0, 1]`.

use crate::Vec3;

/// A column-major 4x4 matrix
pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn identity() -> Mat4 {
    IDENTITY
}

/// Multiply two matrices: `a * b`
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for (col, out) in result.iter_mut().enumerate() {
        for (row, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    result
}

fn mul_vec4(m: &Mat4, v: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = (0..4).map(|c| m[c][row] * v[c]).sum();
    }
    out
}

/// Transform a point (w = 1), applying the perspective divide when needed
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let [x, y, z, w] = mul_vec4(m, [p.x, p.y, p.z, 1.0]);
    if w != 0.0 && w != 1.0 {
        Vec3::new(x / w, y / w, z / w)
    } else {
        Vec3::new(x, y, z)
    }
}

/// Transform a direction (w = 0)
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    let [x, y, z, _] = mul_vec4(m, [v.x, v.y, v.z, 0.0]);
    Vec3::new(x, y, z)
}

pub fn transpose(m: &Mat4) -> Mat4 {
    let mut t = [[0.0; 4]; 4];
    for (c, col) in m.iter().enumerate() {
        for (r, value) in col.iter().enumerate() {
            t[r][c] = *value;
        }
    }
    t
}

/// Inverse by cofactor expansion. Returns `None` for singular matrices.
pub fn inverse(m: &Mat4) -> Option<Mat4> {
    let a: [f32; 16] = [
        m[0][0], m[0][1], m[0][2], m[0][3], m[1][0], m[1][1], m[1][2], m[1][3], m[2][0], m[2][1],
        m[2][2], m[2][3], m[3][0], m[3][1], m[3][2], m[3][3],
    ];
    let mut inv = [0.0f32; 16];

    inv[0] = a[5] * a[10] * a[15] - a[5] * a[11] * a[14] - a[9] * a[6] * a[15]
        + a[9] * a[7] * a[14]
        + a[13] * a[6] * a[11]
        - a[13] * a[7] * a[10];
    inv[4] = -a[4] * a[10] * a[15] + a[4] * a[11] * a[14] + a[8] * a[6] * a[15]
        - a[8] * a[7] * a[14]
        - a[12] * a[6] * a[11]
        + a[12] * a[7] * a[10];
    inv[8] = a[4] * a[9] * a[15] - a[4] * a[11] * a[13] - a[8] * a[5] * a[15]
        + a[8] * a[7] * a[13]
        + a[12] * a[5] * a[11]
        - a[12] * a[7] * a[9];
    inv[12] = -a[4] * a[9] * a[14] + a[4] * a[10] * a[13] + a[8] * a[5] * a[14]
        - a[8] * a[6] * a[13]
        - a[12] * a[5] * a[10]
        + a[12] * a[6] * a[9];
    inv[1] = -a[1] * a[10] * a[15] + a[1] * a[11] * a[14] + a[9] * a[2] * a[15]
        - a[9] * a[3] * a[14]
        - a[13] * a[2] * a[11]
        + a[13] * a[3] * a[10];
    inv[5] = a[0] * a[10] * a[15] - a[0] * a[11] * a[14] - a[8] * a[2] * a[15]
        + a[8] * a[3] * a[14]
        + a[12] * a[2] * a[11]
        - a[12] * a[3] * a[10];
    inv[9] = -a[0] * a[9] * a[15] + a[0] * a[11] * a[13] + a[8] * a[1] * a[15]
        - a[8] * a[3] * a[13]
        - a[12] * a[1] * a[11]
        + a[12] * a[3] * a[9];
    inv[13] = a[0] * a[9] * a[14] - a[0] * a[10] * a[13] - a[8] * a[1] * a[14]
        + a[8] * a[2] * a[13]
        + a[12] * a[1] * a[10]
        - a[12] * a[2] * a[9];
    inv[2] = a[1] * a[6] * a[15] - a[1] * a[7] * a[14] - a[5] * a[2] * a[15]
        + a[5] * a[3] * a[14]
        + a[13] * a[2] * a[7]
        - a[13] * a[3] * a[6];
    inv[6] = -a[0] * a[6] * a[15] + a[0] * a[7] * a[14] + a[4] * a[2] * a[15]
        - a[4] * a[3] * a[14]
        - a[12] * a[2] * a[7]
        + a[12] * a[3] * a[6];
    inv[10] = a[0] * a[5] * a[15] - a[0] * a[7] * a[13] - a[4] * a[1] * a[15]
        + a[4] * a[3] * a[13]
        + a[12] * a[1] * a[7]
        - a[12] * a[3] * a[5];
    inv[14] = -a[0] * a[5] * a[14] + a[0] * a[6] * a[13] + a[4] * a[1] * a[14]
        - a[4] * a[2] * a[13]
        - a[12] * a[1] * a[6]
        + a[12] * a[2] * a[5];
    inv[3] = -a[1] * a[6] * a[11] + a[1] * a[7] * a[10] + a[5] * a[2] * a[11]
        - a[5] * a[3] * a[10]
        - a[9] * a[2] * a[7]
        + a[9] * a[3] * a[6];
    inv[7] = a[0] * a[6] * a[11] - a[0] * a[7] * a[10] - a[4] * a[2] * a[11]
        + a[4] * a[3] * a[10]
        + a[8] * a[2] * a[7]
        - a[8] * a[3] * a[6];
    inv[11] = -a[0] * a[5] * a[11] + a[0] * a[7] * a[9] + a[4] * a[1] * a[11]
        - a[4] * a[3] * a[9]
        - a[8] * a[1] * a[7]
        + a[8] * a[3] * a[5];
    inv[15] = a[0] * a[5] * a[10] - a[0] * a[6] * a[9] - a[4] * a[1] * a[10]
        + a[4] * a[2] * a[9]
        + a[8] * a[1] * a[6]
        - a[8] * a[2] * a[5];

    let det = a[0] * inv[0] + a[1] * inv[4] + a[2] * inv[8] + a[3] * inv[12];
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;

    let mut out = [[0.0; 4]; 4];
    for (i, value) in inv.iter().enumerate() {
        out[i / 4][i % 4] = value * inv_det;
    }
    Some(out)
}

/// Inverse-transpose of a model-view matrix, for transforming normals
pub fn normal_matrix(mv: &Mat4) -> Mat4 {
    inverse(mv).map(|inv| transpose(&inv)).unwrap_or(IDENTITY)
}

pub fn translation(v: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3] = [v.x, v.y, v.z, 1.0];
    m
}

pub fn scaling(v: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = v.x;
    m[1][1] = v.y;
    m[2][2] = v.z;
    m
}

pub fn rotation_x(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, s, 0.0],
        [0.0, -s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn rotation_y(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [c, 0.0, -s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

pub fn rotation_z(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    [
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation about an arbitrary axis. A zero axis yields the identity.
pub fn rotation_axis(degrees: f32, axis: Vec3) -> Mat4 {
    let n = axis.normalized();
    if n == Vec3::ZERO {
        return IDENTITY;
    }
    let (s, c) = degrees.to_radians().sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (n.x, n.y, n.z);
    [
        [t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0],
        [t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0],
        [t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Right-handed perspective projection with `[0, 1]` clip depth
pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let q = 1.0 / (fovy_degrees.to_radians() * 0.5).tan();
    let range = near - far;
    [
        [q / aspect, 0.0, 0.0, 0.0],
        [0.0, q, 0.0, 0.0],
        [0.0, 0.0, far / range, -1.0],
        [0.0, 0.0, near * far / range, 0.0],
    ]
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// When the view direction is parallel to `up` a substitute up axis is
/// chosen so the result stays finite. Looking straight down at the origin
/// from above is the common case for the shadow light.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    if f == Vec3::ZERO {
        return translation(-eye);
    }

    let mut s = f.cross(&up);
    if s.length() < 1e-6 {
        let fallback = if f.z.abs() < 0.9 { -Vec3::Z } else { Vec3::X };
        s = f.cross(&fallback);
    }
    let s = s.normalized();
    let u = s.cross(&f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0],
    ]
}

/// Maps light clip space into shadow-map texture space.
///
/// x and y go from `[-1, 1]` to `[0, 1]` with v pointing down; depth is
/// already `[0, 1]` and passes through.
pub fn shadow_bias() -> Mat4 {
    [
        [0.5, 0.0, 0.0, 0.0],
        [0.0, -0.5, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.5, 0.5, 0.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn approx_mat(a: &Mat4, b: &Mat4) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_translate_then_scale_order() {
        let m = mul(&translation(Vec3::new(1.0, 0.0, 0.0)), &scaling(Vec3::ONE * 2.0));
        let p = transform_point(&m, Vec3::new(1.0, 1.0, 1.0));
        assert!(approx(p, Vec3::new(3.0, 2.0, 2.0)));
    }

    #[test]
    fn test_rotations_are_counter_clockwise() {
        let x = transform_vector(&rotation_z(90.0), Vec3::X);
        assert!(approx(x, Vec3::UP));

        let z = transform_vector(&rotation_y(90.0), Vec3::X);
        assert!(approx(z, -Vec3::Z));

        let y = transform_vector(&rotation_x(90.0), Vec3::UP);
        assert!(approx(y, Vec3::Z));
    }

    #[test]
    fn test_rotation_axis_matches_principal_axes() {
        assert!(approx_mat(&rotation_axis(37.0, Vec3::UP), &rotation_y(37.0)));
        assert!(approx_mat(&rotation_axis(-80.0, Vec3::X * 3.0), &rotation_x(-80.0)));
        assert_eq!(rotation_axis(45.0, Vec3::ZERO), IDENTITY);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = mul(
            &mul(&translation(Vec3::new(3.0, -2.0, 5.0)), &rotation_axis(33.0, Vec3::new(0.0, 1.0, 1.0))),
            &scaling(Vec3::new(0.5, 2.0, 0.75)),
        );
        let inv = inverse(&m).expect("invertible");
        assert!(approx_mat(&mul(&m, &inv), &IDENTITY));
    }

    #[test]
    fn test_inverse_singular() {
        assert!(inverse(&scaling(Vec3::new(1.0, 0.0, 1.0))).is_none());
    }

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let mv = scaling(Vec3::new(2.0, 1.0, 1.0));
        let n = transform_vector(&normal_matrix(&mv), Vec3::new(1.0, 1.0, 0.0));
        assert!(approx(n, Vec3::new(0.5, 1.0, 0.0)));
    }

    #[test]
    fn test_perspective_depth_range() {
        let p = perspective(60.0, 1.0, 0.1, 1000.0);
        let near = transform_point(&p, Vec3::new(0.0, 0.0, -0.1));
        let far = transform_point(&p, Vec3::new(0.0, 0.0, -1000.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-3);
        assert_eq!(p[2][3], -1.0);
    }

    #[test]
    fn test_look_at_maps_target_to_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 15.0);
        let v = look_at(eye, Vec3::ZERO, Vec3::UP);
        let p = transform_point(&v, Vec3::ZERO);
        assert!(approx(p, Vec3::new(0.0, 0.0, -15.0)));
    }

    #[test]
    fn test_look_at_straight_down_is_finite() {
        let v = look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::UP);
        assert!(v.iter().flatten().all(|x| x.is_finite()));
        let p = transform_point(&v, Vec3::ZERO);
        assert!(approx(p, Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_shadow_bias_maps_clip_corners() {
        let b = shadow_bias();
        let top_left = transform_point(&b, Vec3::new(-1.0, 1.0, 0.25));
        assert!(approx(top_left, Vec3::new(0.0, 0.0, 0.25)));
        let bottom_right = transform_point(&b, Vec3::new(1.0, -1.0, 0.75));
        assert!(approx(bottom_right, Vec3::new(1.0, 1.0, 0.75)));
    }
}
