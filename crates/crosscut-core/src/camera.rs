//! Orbit camera on a unit sphere around the origin.

use glam::{Mat4, Vec3};

use crate::constants::{
    default_camera_normal, CAMERA_DISTANCE, DRAG_RADIANS_PER_PIXEL, POLAR_CLAMP_EPSILON, POLE_NUDGE,
};
use crate::math::{angle_to_vector, vector_to_angles};
use crate::plane::PlaneParams;

/// Which side of the scene the camera is parked on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraStatus {
    /// Free orbit from the default vantage point.
    #[default]
    Free,
    /// Looking straight down the plane normal at the cut face.
    Above,
    /// Looking up at the cut face from the reverse normal.
    Below,
}

impl CameraStatus {
    pub fn next(self) -> CameraStatus {
        match self {
            CameraStatus::Free => CameraStatus::Above,
            CameraStatus::Above => CameraStatus::Below,
            CameraStatus::Below => CameraStatus::Free,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            CameraStatus::Free => 0,
            CameraStatus::Above => 1,
            CameraStatus::Below => 2,
        }
    }
}

/// Polar angles of a camera direction; `theta` from +Y, `phi` azimuth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphericalAngles {
    pub theta: f32,
    pub phi: f32,
}

/// Nudge a direction off the y axis so its azimuth stays well-defined.
///
/// With the direction exactly on the vertical axis the up vector and the view
/// direction coincide and the look-at basis collapses.
#[inline]
pub fn nudge_pole(v: Vec3) -> Vec3 {
    if v.y.abs() >= 1.0 - f32::EPSILON {
        Vec3::new(v.x, v.y, POLE_NUDGE).normalize()
    } else {
        v
    }
}

/// From→to polar-angle pair for tweening the camera normal between two
/// directions.
///
/// Tweening happens in polar space so the camera slides along the sphere
/// instead of cutting through it. If the two azimuths differ by more than pi
/// the source azimuth is shifted a full turn so the interpolation takes the
/// shorter way around. If both directions sit on a pole the azimuth is
/// arbitrary and collapses to 0.
pub fn normal_animation(from: Vec3, to: Vec3) -> (SphericalAngles, SphericalAngles) {
    let src_theta = from.y.clamp(-1.0, 1.0).acos();
    let dst_theta = to.y.clamp(-1.0, 1.0).acos();
    let (mut phi_from, phi_to) = if src_theta.sin() == 0.0 && dst_theta.sin() == 0.0 {
        (0.0, 0.0)
    } else {
        (from.x.atan2(from.z), to.x.atan2(to.z))
    };
    if phi_to - phi_from > std::f32::consts::PI {
        phi_from += std::f32::consts::TAU;
    } else if phi_to - phi_from < -std::f32::consts::PI {
        phi_from -= std::f32::consts::TAU;
    }
    (
        SphericalAngles {
            theta: src_theta,
            phi: phi_from,
        },
        SphericalAngles {
            theta: dst_theta,
            phi: phi_to,
        },
    )
}

/// Camera state: a unit direction from the target to the eye plus the parked
/// status.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub normal: Vec3,
    pub status: CameraStatus,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            normal: default_camera_normal(),
            status: CameraStatus::Free,
        }
    }
}

impl CameraRig {
    /// Apply a mouse drag in pixels. The polar angle is clamped just short of
    /// the poles; the azimuth wraps naturally.
    pub fn rotate(&mut self, dx_px: f32, dy_px: f32) {
        let (theta, phi) = vector_to_angles(self.normal);
        let theta = (theta - dy_px * DRAG_RADIANS_PER_PIXEL).clamp(
            POLAR_CLAMP_EPSILON,
            std::f32::consts::PI - POLAR_CLAMP_EPSILON,
        );
        self.normal = angle_to_vector(theta, phi - dx_px * DRAG_RADIANS_PER_PIXEL);
    }

    /// Set the normal from tweened polar angles, keeping it off the pole.
    pub fn apply_angles(&mut self, angles: SphericalAngles) {
        self.normal = nudge_pole(angle_to_vector(angles.theta, angles.phi));
    }

    pub fn eye(&self) -> Vec3 {
        self.normal * CAMERA_DISTANCE
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// The direction the camera should point at for `status`: the plane's
    /// world normal (Above), its reverse (Below), or the default vantage
    /// point (Free), always nudged off the pole.
    pub fn snap_target(&self, plane: &PlaneParams, status: CameraStatus) -> Vec3 {
        let target = match status {
            CameraStatus::Free => default_camera_normal(),
            CameraStatus::Above => plane.world_plane().truncate().normalize(),
            CameraStatus::Below => (-plane.world_plane().truncate()).normalize(),
        };
        nudge_pole(target)
    }
}
