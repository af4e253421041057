//! Object kinds and the preset cutting-plane table.
//!
//! Every preset positions the plane so the section through the solid is the
//! named shape. The angles come from closed-form solutions for each target
//! shape; `length` is the characteristic object size the offsets scale with.

use std::f32::consts::PI;
use std::str::FromStr;

use crate::plane::PlaneParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Cube,
    Cuboid,
    Cylinder,
    Cone,
    TruncatedCone,
    Prism,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Cube,
        ObjectKind::Cuboid,
        ObjectKind::Cylinder,
        ObjectKind::Cone,
        ObjectKind::TruncatedCone,
        ObjectKind::Prism,
    ];

    /// The UI identifier (radio-button id) for this kind.
    pub fn id(self) -> &'static str {
        match self {
            ObjectKind::Cube => "cube",
            ObjectKind::Cuboid => "cuboid",
            ObjectKind::Cylinder => "cylinder",
            ObjectKind::Cone => "cone",
            ObjectKind::TruncatedCone => "trun-cone",
            ObjectKind::Prism => "prism",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Cube => "Cube",
            ObjectKind::Cuboid => "Cuboid",
            ObjectKind::Cylinder => "Cylinder",
            ObjectKind::Cone => "Cone",
            ObjectKind::TruncatedCone => "Truncated cone",
            ObjectKind::Prism => "Triangular prism",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown object kind: {0}")]
pub struct UnknownObjectKind(pub String);

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| UnknownObjectKind(s.to_owned()))
    }
}

pub const DEFAULT_PRESET: &str = "default";

#[inline]
fn preset(tx: f32, ty: f32, tz: f32, rx_rad: f32, rz_rad: f32) -> PlaneParams {
    PlaneParams {
        x_translation: tx,
        y_translation: ty,
        z_translation: tz,
        x_rotation: rx_rad.to_degrees(),
        z_rotation: rz_rad.to_degrees(),
    }
}

#[inline]
fn uniform(offset: f32, rx_rad: f32, rz_rad: f32) -> PlaneParams {
    preset(offset, offset, offset, rx_rad, rz_rad)
}

/// Preset names selectable for `kind`, in UI order. `default` is always
/// available but not listed.
pub fn preset_names(kind: ObjectKind) -> &'static [&'static str] {
    match kind {
        ObjectKind::Cube => &[
            "isoscelesTriangle",
            "equilateralTriangle",
            "acuteTriangle",
            "prismatic",
            "isoscelesTrapezoid",
            "ordinaryTrapezoid",
            "square1",
            "square2",
            "rectangle1",
            "rectangle2",
            "rectangle3",
            "parallelogram",
            "ordinaryPentagon",
            "ordinaryHexagon",
            "regularHexagon",
        ],
        ObjectKind::Cuboid => &[
            "isoscelesTriangle",
            "equilateralTriangle",
            "prismatic",
            "isoscelesTrapezoid",
            "ordinaryTrapezoid",
            "square",
            "rectangle1",
            "rectangle2",
            "rectangle3",
            "rectangle4",
            "parallelogram",
            "ordinaryPentagon",
            "ordinaryHexagon",
        ],
        ObjectKind::Cylinder => &[
            "circle",
            "ellipse",
            "curveStraight1",
            "curveStraight2",
            "rectangle1",
            "rectangle2",
            "drumShape",
        ],
        ObjectKind::Cone => &["circle", "ellipse", "curveStraight", "isoscelesTriangle"],
        ObjectKind::TruncatedCone => &["circle", "ellipse", "curveStraight", "isoscelesTrapezoid"],
        ObjectKind::Prism => &[
            "triangle1",
            "triangle2",
            "rectangle1",
            "rectangle2",
            "trapezoid",
            "ordinaryPentagon",
        ],
    }
}

/// Plane parameters for `(kind, name)`. Unknown names fall back to the
/// identity plane for the kind with a warning; that is a recoverable UI
/// condition, unlike an unknown kind which fails parsing outright.
pub fn preset_plane(kind: ObjectKind, name: &str, length: f32) -> PlaneParams {
    if name == DEFAULT_PRESET {
        return PlaneParams::default();
    }
    let l = length;
    let known = match kind {
        ObjectKind::Cube => match name {
            "isoscelesTriangle" => Some(uniform(l * (3.0 / 10.0), PI / 4.0, -(1.0f32 / 3.0).sqrt().asin())),
            "equilateralTriangle" => Some(uniform(
                l * (5.0 / 30.0),
                (1.0f32 / 5.0).sqrt().acos(),
                -(2.0f32 / 3.0).asin(),
            )),
            "acuteTriangle" => Some(uniform(
                l * (115.0 / 470.0),
                (9.0f32 / 34.0).sqrt().asin(),
                -(225.0f32 / 769.0).sqrt().asin(),
            )),
            "prismatic" => Some(uniform(0.0, PI / 4.0, -(1.0f32 / 3.0).sqrt().acos())),
            "isoscelesTrapezoid" => Some(uniform(
                l * (5.0 / 30.0),
                PI - (1.0f32 / 5.0).sqrt().acos(),
                -(2.0f32 / 3.0).asin(),
            )),
            "ordinaryTrapezoid" => Some(uniform(
                l * (65.0 / 330.0),
                PI - (1.0f32 / 101.0).sqrt().acos(),
                -(225.0f32 / 629.0).sqrt().asin(),
            )),
            "square1" => Some(uniform(0.0, 0.0, -PI / 2.0)),
            "square2" => Some(uniform(0.0, 0.0, 0.0)),
            "rectangle1" => Some(uniform(0.0, 0.0, -PI / 3.0)),
            "rectangle2" => Some(uniform(0.0, 0.0, -PI / 4.0)),
            "rectangle3" => {
                let offset = -l * (25.0 / 130.0);
                Some(preset(offset, offset, 0.0, 0.0, -(25.0f32 / 89.0).sqrt().acos()))
            }
            "parallelogram" => Some(uniform(
                0.0,
                (1.0f32 / 17.0).sqrt().acos(),
                -(17.0f32 / 42.0).sqrt().acos(),
            )),
            "ordinaryPentagon" => Some(uniform(
                -l * (5.0 / 60.0),
                (16.0f32 / 41.0).sqrt().asin(),
                -(18.0f32 / 100.0).sqrt().asin(),
            )),
            "ordinaryHexagon" => Some(uniform(
                -l * (25.0 / 330.0),
                (100.0f32 / 269.0).sqrt().asin(),
                -(100.0f32 / 369.0).sqrt().asin(),
            )),
            "regularHexagon" => Some(uniform(0.0, PI / 4.0, -(1.0f32 / 3.0).sqrt().asin())),
            _ => None,
        },
        ObjectKind::Cuboid => match name {
            "isoscelesTriangle" => Some(uniform(l * (21.0 / 50.0), PI / 4.0, -(1.0f32 / 3.0).sqrt().asin())),
            "equilateralTriangle" => Some(uniform(
                l * (8.0 / 30.0),
                (1.0f32 / 5.0).sqrt().acos(),
                -(2.0f32 / 3.0).asin(),
            )),
            "prismatic" => Some(uniform(0.0, PI / 4.0, -(25.0f32 / 57.0).sqrt().asin())),
            "isoscelesTrapezoid" => Some(uniform(
                l * (40.0 / 70.0),
                PI - (9.0f32 / 34.0).sqrt().acos(),
                -(25.0f32 / 59.0).sqrt().asin(),
            )),
            "ordinaryTrapezoid" => Some(uniform(
                l * (65.0 / 330.0),
                PI - (1.0f32 / 101.0).sqrt().acos(),
                -(225.0f32 / 629.0).sqrt().asin(),
            )),
            "square" => Some(uniform(0.0, 0.0, -PI / 2.0)),
            "rectangle1" => Some(uniform(0.0, 0.0, 0.0)),
            "rectangle2" => Some(uniform(0.0, 0.0, -PI / 3.0)),
            "rectangle3" => Some(uniform(0.0, 0.0, -(10.0f32 / 16.0).atan())),
            "rectangle4" => {
                let offset = -l * (2.0 / 5.0);
                Some(preset(offset, offset, 0.0, 0.0, -PI / 3.0))
            }
            "parallelogram" => Some(uniform(
                0.0,
                (1.0f32 / 17.0).sqrt().acos(),
                -(17.0f32 / 42.0).sqrt().acos(),
            )),
            "ordinaryPentagon" => Some(uniform(
                -l * (40.0 / 1530.0),
                (9.0f32 / 34.0).sqrt().asin(),
                -(625.0f32 / 9329.0).sqrt().asin(),
            )),
            "ordinaryHexagon" => Some(uniform(
                -l * (5.0 / 60.0),
                (16.0f32 / 41.0).sqrt().asin(),
                -(18.0f32 / 100.0).sqrt().asin(),
            )),
            _ => None,
        },
        ObjectKind::Cylinder => match name {
            "circle" => Some(uniform(0.0, 0.0, 0.0)),
            "ellipse" => Some(uniform(0.0, 0.0, -PI / 12.0)),
            "curveStraight1" => Some(preset(0.0, -l * 0.5, 0.0, PI / 6.0, -PI / 6.0)),
            "curveStraight2" => Some(preset(
                0.0,
                l * (5.0 * (1.0 - (13.0f32 / 3.0).sqrt()) / 10.0),
                0.0,
                PI / 3.0,
                -PI / 6.0,
            )),
            "rectangle1" => {
                let offset = l * (2.0 / 10.0);
                Some(preset(offset, 0.0, offset, PI / 2.0, -PI / 4.0))
            }
            "rectangle2" => Some(uniform(0.0, PI / 2.0, -PI / 4.0)),
            "drumShape" => Some(uniform(0.0, PI / 6.0, -PI / 4.0)),
            _ => None,
        },
        ObjectKind::Cone => match name {
            "circle" => Some(preset(0.0, -l / 10.0, 0.0, 0.0, 0.0)),
            "ellipse" => Some(preset(0.0, -l / 10.0, 0.0, 0.0, -PI / 12.0)),
            "curveStraight" => Some(preset(0.0, -l / 2.0, 0.0, PI / 4.0, -PI / 3.0)),
            "isoscelesTriangle" => Some(uniform(0.0, PI / 2.0, -PI / 3.0)),
            _ => None,
        },
        ObjectKind::TruncatedCone => match name {
            "circle" => Some(preset(0.0, -l / 10.0, 0.0, 0.0, 0.0)),
            "ellipse" => Some(preset(0.0, -l / 10.0, 0.0, 0.0, -PI / 12.0)),
            "curveStraight" => Some(preset(0.0, -l / 2.0, 0.0, PI / 4.0, -PI / 3.0)),
            "isoscelesTrapezoid" => Some(uniform(0.0, PI / 2.0, -PI / 3.0)),
            _ => None,
        },
        ObjectKind::Prism => match name {
            "triangle1" => Some(uniform(0.0, 0.0, 0.0)),
            "triangle2" => Some(preset(0.0, -l * (5.0 / 30.0), 0.0, (4.0f32 / 7.0).sqrt().asin(), 0.0)),
            "rectangle1" => Some(preset(l * (5.0 / 30.0), 0.0, 0.0, PI / 2.0, -PI / 3.0)),
            "rectangle2" => Some(uniform(0.0, 0.0, -PI / 2.0)),
            "trapezoid" => Some(uniform(0.0, PI / 3.0, 0.0)),
            "ordinaryPentagon" => Some(uniform(0.0, PI / 3.0, -PI / 6.0)),
            _ => None,
        },
    };
    known.unwrap_or_else(|| {
        log::warn!("no preset '{name}' for {}, using default", kind.id());
        PlaneParams::default()
    })
}
