// Host-side tests for the cutting-plane parameter model.

use std::str::FromStr;

use crosscut_core::plane::{PlaneField, PlaneParams};
use glam::{Mat4, Vec4};

fn sample_params() -> Vec<PlaneParams> {
    vec![
        PlaneParams::default(),
        PlaneParams {
            x_translation: 3.0,
            y_translation: -2.0,
            z_translation: 0.5,
            x_rotation: 45.0,
            z_rotation: -30.0,
        },
        PlaneParams {
            x_translation: -7.5,
            y_translation: 0.0,
            z_translation: 12.0,
            x_rotation: 180.0,
            z_rotation: 90.0,
        },
        // Out-of-range rotations are legal and just rotate further.
        PlaneParams {
            x_translation: 0.0,
            y_translation: 0.0,
            z_translation: 0.0,
            x_rotation: 540.0,
            z_rotation: -361.0,
        },
    ]
}

#[test]
fn transform_matrix_round_trips_through_inverse() {
    for params in sample_params() {
        let m = params.transform_matrix();
        let round_trip = m * m.inverse();
        assert!(
            round_trip.abs_diff_eq(Mat4::IDENTITY, 1e-4),
            "not identity for {params:?}: {round_trip:?}"
        );
    }
}

#[test]
fn identity_params_give_canonical_plane() {
    let plane = PlaneParams::default().world_plane();
    assert!(plane.abs_diff_eq(Vec4::new(0.0, 1.0, 0.0, 0.0), 1e-6));
}

#[test]
fn translation_moves_plane_distance() {
    let params = PlaneParams {
        y_translation: 3.0,
        ..PlaneParams::default()
    };
    // Points with y = 3 satisfy the plane equation, so d = -3.
    assert!(params
        .world_plane()
        .abs_diff_eq(Vec4::new(0.0, 1.0, 0.0, -3.0), 1e-5));
}

#[test]
fn x_rotation_tilts_normal_toward_z() {
    let params = PlaneParams {
        x_rotation: 90.0,
        ..PlaneParams::default()
    };
    assert!(params
        .world_plane()
        .abs_diff_eq(Vec4::new(0.0, 0.0, 1.0, 0.0), 1e-5));
}

#[test]
fn transform_recomputes_after_every_field_change() {
    let mut params = PlaneParams::default();
    let before = params.transform_matrix();
    params.set(PlaneField::ZRotation, 90.0);
    let after = params.transform_matrix();
    assert!(!before.abs_diff_eq(after, 1e-6));
    params.set(PlaneField::ZRotation, 0.0);
    assert!(params.transform_matrix().abs_diff_eq(before, 1e-6));
}

#[test]
fn fields_round_trip_through_set_get() {
    let mut params = PlaneParams::default();
    for (i, field) in PlaneField::ALL.into_iter().enumerate() {
        params.set(field, i as f32 + 0.5);
    }
    for (i, field) in PlaneField::ALL.into_iter().enumerate() {
        assert_eq!(params.get(field), i as f32 + 0.5);
    }
}

#[test]
fn field_ids_parse_back() {
    for field in PlaneField::ALL {
        assert_eq!(PlaneField::from_str(field.id()).unwrap(), field);
    }
    assert!(PlaneField::from_str("wTranslation").is_err());
}
