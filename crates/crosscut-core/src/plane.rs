//! Cutting-plane parameter model.
//!
//! The plane starts as the XZ plane through the origin (normal +Y) and is
//! positioned by three translations and two rotations. The transform is
//! derived from the parameter fields on every call so a half-updated cache
//! can never leak into a frame.

use glam::{Mat4, Vec4};
use std::str::FromStr;

use crate::math;

/// Slider-addressable parameters of the cutting plane. Rotations are in
/// degrees, matching the UI range inputs; values outside the slider range are
/// accepted and simply rotate further.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaneParams {
    pub x_translation: f32,
    pub y_translation: f32,
    pub z_translation: f32,
    pub x_rotation: f32,
    pub z_rotation: f32,
}

/// One addressable field of [`PlaneParams`], parsed from the UI input ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneField {
    XTranslation,
    YTranslation,
    ZTranslation,
    XRotation,
    ZRotation,
}

impl PlaneField {
    pub const ALL: [PlaneField; 5] = [
        PlaneField::XTranslation,
        PlaneField::YTranslation,
        PlaneField::ZTranslation,
        PlaneField::XRotation,
        PlaneField::ZRotation,
    ];

    /// The DOM input id this field is bound to.
    pub fn id(self) -> &'static str {
        match self {
            PlaneField::XTranslation => "xTranslation",
            PlaneField::YTranslation => "yTranslation",
            PlaneField::ZTranslation => "zTranslation",
            PlaneField::XRotation => "xRotation",
            PlaneField::ZRotation => "zRotation",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown plane field: {0}")]
pub struct UnknownPlaneField(pub String);

impl FromStr for PlaneField {
    type Err = UnknownPlaneField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaneField::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownPlaneField(s.to_owned()))
    }
}

impl PlaneParams {
    pub fn set(&mut self, field: PlaneField, value: f32) {
        match field {
            PlaneField::XTranslation => self.x_translation = value,
            PlaneField::YTranslation => self.y_translation = value,
            PlaneField::ZTranslation => self.z_translation = value,
            PlaneField::XRotation => self.x_rotation = value,
            PlaneField::ZRotation => self.z_rotation = value,
        }
    }

    pub fn get(&self, field: PlaneField) -> f32 {
        match field {
            PlaneField::XTranslation => self.x_translation,
            PlaneField::YTranslation => self.y_translation,
            PlaneField::ZTranslation => self.z_translation,
            PlaneField::XRotation => self.x_rotation,
            PlaneField::ZRotation => self.z_rotation,
        }
    }

    /// World transform of the plane: translate, then rotate about X, then
    /// rotate about Z.
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_translation(glam::Vec3::new(
            self.x_translation,
            self.y_translation,
            self.z_translation,
        )) * Mat4::from_rotation_x(self.x_rotation.to_radians())
            * Mat4::from_rotation_z(self.z_rotation.to_radians())
    }

    /// World-space plane equation `(nx, ny, nz, d)`: the canonical plane
    /// `(0, 1, 0, 0)` pushed through the transform.
    pub fn world_plane(&self) -> Vec4 {
        math::transform_plane(self.transform_matrix(), Vec4::new(0.0, 1.0, 0.0, 0.0))
    }
}
