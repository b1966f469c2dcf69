//! Scalar/vector/quaternion helpers:
//! - component-wise lerps
//! - quaternion NLERP with shortest-arc normalization
//! - quaternion products and vector rotation for transform composition

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion (x,y,z,w); zero-length inputs fall back to identity.
#[inline]
pub fn normalize4(q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        [q[0] * inv_len, q[1] * inv_len, q[2] * inv_len, q[3] * inv_len]
    } else {
        [0.0, 0.0, 0.0, 1.0]
    }
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4([
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ])
}

/// Hamilton product a * b (both x,y,z,w).
#[inline]
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

/// Rotate a vector by a unit quaternion: v' = q v q^-1, expanded to avoid
/// building intermediate quaternions.
#[inline]
pub fn quat_rotate_vec3(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    // t = 2 * cross(q.xyz, v); v' = v + q.w * t + cross(q.xyz, t)
    let tx = 2.0 * (q[1] * v[2] - q[2] * v[1]);
    let ty = 2.0 * (q[2] * v[0] - q[0] * v[2]);
    let tz = 2.0 * (q[0] * v[1] - q[1] * v[0]);
    [
        v[0] + q[3] * tx + (q[1] * tz - q[2] * ty),
        v[1] + q[3] * ty + (q[2] * tx - q[0] * tz),
        v[2] + q[3] * tz + (q[0] * ty - q[1] * tx),
    ]
}

/// Build a quaternion from intrinsic XYZ Euler angles (radians).
pub fn quat_from_euler(e: [f32; 3]) -> [f32; 4] {
    let (sx, cx) = (0.5 * e[0]).sin_cos();
    let (sy, cy) = (0.5 * e[1]).sin_cos();
    let (sz, cz) = (0.5 * e[2]).sin_cos();
    [
        sx * cy * cz + cx * sy * sz,
        cx * sy * cz - sx * cy * sz,
        cx * cy * sz + sx * sy * cz,
        cx * cy * cz - sx * sy * sz,
    ]
}
