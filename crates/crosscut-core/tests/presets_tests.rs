// Host-side tests for the preset plane table.

use std::str::FromStr;

use crosscut_core::plane::PlaneParams;
use crosscut_core::presets::*;

const LENGTH: f32 = 10.0;
const TOL: f32 = 1e-3;

#[test]
fn object_kind_ids_parse_back() {
    for kind in ObjectKind::ALL {
        assert_eq!(ObjectKind::from_str(kind.id()).unwrap(), kind);
        assert!(!kind.label().is_empty());
    }
    let err = ObjectKind::from_str("dodecahedron").unwrap_err();
    assert!(err.to_string().contains("dodecahedron"));
}

#[test]
fn default_preset_is_identity_for_every_kind() {
    for kind in ObjectKind::ALL {
        assert_eq!(
            preset_plane(kind, DEFAULT_PRESET, LENGTH),
            PlaneParams::default()
        );
    }
}

#[test]
fn unknown_preset_falls_back_to_identity() {
    for kind in ObjectKind::ALL {
        assert_eq!(
            preset_plane(kind, "definitelyNotAPreset", LENGTH),
            PlaneParams::default()
        );
    }
}

#[test]
fn every_listed_preset_resolves_to_itself() {
    // Listed names must hit a real table entry, not the fallback; anything
    // falling through would come back as the identity plane. The identity-
    // valued entries are listed explicitly so they are skipped here.
    let identity_presets = [
        "square2",
        "rectangle1",
        "circle",
        "triangle1",
    ];
    for kind in ObjectKind::ALL {
        for name in preset_names(kind) {
            assert_ne!(*name, DEFAULT_PRESET);
            let params = preset_plane(kind, name, LENGTH);
            if identity_presets.contains(name) && params == PlaneParams::default() {
                continue;
            }
            assert_ne!(
                params,
                PlaneParams::default(),
                "{} preset '{}' fell through to the default",
                kind.id(),
                name
            );
        }
    }
}

#[test]
fn cube_isosceles_triangle_matches_closed_form() {
    let params = preset_plane(ObjectKind::Cube, "isoscelesTriangle", LENGTH);
    assert!((params.x_translation - 3.0).abs() < TOL);
    assert!((params.y_translation - 3.0).abs() < TOL);
    assert!((params.z_translation - 3.0).abs() < TOL);
    assert!((params.x_rotation - 45.0).abs() < TOL);
    let expected_z = -(1.0f32 / 3.0).sqrt().asin().to_degrees();
    assert!((params.z_rotation - expected_z).abs() < TOL);
}

#[test]
fn cube_square_presets_are_axis_aligned() {
    let square1 = preset_plane(ObjectKind::Cube, "square1", LENGTH);
    assert_eq!(square1.x_rotation, 0.0);
    assert!((square1.z_rotation + 90.0).abs() < TOL);

    let square2 = preset_plane(ObjectKind::Cube, "square2", LENGTH);
    assert_eq!(square2, PlaneParams::default());
}

#[test]
fn offsets_scale_with_object_length() {
    let small = preset_plane(ObjectKind::Cube, "equilateralTriangle", 10.0);
    let large = preset_plane(ObjectKind::Cube, "equilateralTriangle", 20.0);
    assert!((large.x_translation - 2.0 * small.x_translation).abs() < TOL);
    // Angles do not scale.
    assert!((large.x_rotation - small.x_rotation).abs() < TOL);
}

#[test]
fn cone_presets_drop_the_plane_into_the_base() {
    let circle = preset_plane(ObjectKind::Cone, "circle", LENGTH);
    assert!((circle.y_translation + 1.0).abs() < TOL);
    assert_eq!(circle.x_rotation, 0.0);
    assert_eq!(circle.z_rotation, 0.0);

    let triangle = preset_plane(ObjectKind::Cone, "isoscelesTriangle", LENGTH);
    assert!((triangle.x_rotation - 90.0).abs() < TOL);
    assert!((triangle.z_rotation + 60.0).abs() < TOL);
}

#[test]
fn preset_lists_are_nonempty_and_unique() {
    for kind in ObjectKind::ALL {
        let names = preset_names(kind);
        assert!(!names.is_empty());
        let mut sorted: Vec<&str> = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len(), "{} has duplicates", kind.id());
    }
}
