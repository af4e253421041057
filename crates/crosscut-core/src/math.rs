//! Small layer of domain math over glam.
//!
//! Everything glam already provides (translation, axis rotations, multiply,
//! inverse, transpose, look-at, orthographic/perspective projection) is used
//! directly; only the operations it does not ship live here.

use glam::{Mat3, Mat4, Vec3, Vec4};

/// Inverse-transpose of the upper 3x3 of `m`, for transforming normals.
///
/// `m` must be invertible; a singular matrix here is a caller bug.
#[inline]
pub fn normal_matrix(m: Mat4) -> Mat3 {
    Mat3::from_mat4(m).inverse().transpose()
}

/// Transform a plane equation `(nx, ny, nz, d)` by `m`.
///
/// Planes transform by the inverse-transpose of the matrix that transforms
/// points, so this is `(m^-1)^T * plane`. `m` must be invertible.
#[inline]
pub fn transform_plane(m: Mat4, plane: Vec4) -> Vec4 {
    m.inverse().transpose() * plane
}

/// Unit vector for polar angles: `theta` measured from +Y, `phi` the azimuth
/// measured x-over-z (so `phi = 0` points toward +Z).
#[inline]
pub fn angle_to_vector(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        theta.sin() * phi.sin(),
        theta.cos(),
        theta.sin() * phi.cos(),
    )
}

/// Polar angles `(theta, phi)` for a unit vector. Inverse of
/// [`angle_to_vector`] away from the poles; at the poles the azimuth
/// degenerates and `atan2(0, 0) = 0` is returned.
#[inline]
pub fn vector_to_angles(v: Vec3) -> (f32, f32) {
    (v.y.clamp(-1.0, 1.0).acos(), v.x.atan2(v.z))
}
