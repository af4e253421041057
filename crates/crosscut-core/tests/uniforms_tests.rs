// Host-side tests for the per-frame uniform snapshot and the Pod block
// layouts the WGSL structs rely on.

use crosscut_core::camera::CameraRig;
use crosscut_core::plane::PlaneParams;
use crosscut_core::uniforms::*;
use glam::{Vec3, Vec4};

const TOL: f32 = 1e-4;

#[test]
fn pod_blocks_match_wgsl_layouts() {
    // mat4 = 64 bytes, padded mat3 = 48, vec4 = 16, vec3 + pad = 16.
    assert_eq!(std::mem::size_of::<LitUniforms>(), 64 + 48 + 16 + 16);
    assert_eq!(std::mem::size_of::<UnlitUniforms>(), 64 + 16);
    assert_eq!(std::mem::size_of::<ClipUniforms>(), 64 * 3 + 48 + 16);
}

#[test]
fn frame_snapshot_is_consistent() {
    let plane = PlaneParams {
        y_translation: 2.0,
        x_rotation: 30.0,
        ..PlaneParams::default()
    };
    let rig = CameraRig::default();
    let f = frame_matrices(&plane, &rig, 800.0, 600.0);

    assert!(f.view_proj.abs_diff_eq(f.projection * f.view, TOL));
    assert!(f.object_mvp.abs_diff_eq(f.view_proj, TOL));
    assert!(f.clipped_model_view.abs_diff_eq(f.view, TOL));
    assert!(f.clipped_mvp.abs_diff_eq(f.view_proj, TOL));
    assert!(f.clipping_plane.abs_diff_eq(plane.world_plane(), TOL));
    assert!((f.light_dir.length() - 1.0).abs() < TOL);
}

#[test]
fn origin_projects_to_clip_center() {
    let plane = PlaneParams::default();
    let rig = CameraRig::default();
    let f = frame_matrices(&plane, &rig, 800.0, 600.0);
    let clip = f.view_proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < TOL && ndc.y.abs() < TOL);
    assert!((0.0..=1.0).contains(&ndc.z), "origin outside depth range");
}

#[test]
fn ortho_extents_scale_with_viewport() {
    let plane = PlaneParams::default();
    let rig = CameraRig::default();
    let f = frame_matrices(&plane, &rig, 800.0, 600.0);
    // A world point 20 units right of the target along the camera-right axis
    // lands at x = 20 / (800 / 40) = 1 in NDC.
    let right = f.view.transpose().x_axis.truncate().normalize();
    let clip = f.view_proj * (right * 20.0).extend(1.0);
    let ndc_x = clip.x / clip.w;
    assert!((ndc_x - 1.0).abs() < 1e-3, "ndc_x = {ndc_x}");
}

#[test]
fn lit_block_carries_color_and_light() {
    let plane = PlaneParams::default();
    let rig = CameraRig::default();
    let f = frame_matrices(&plane, &rig, 640.0, 480.0);
    let lit = LitUniforms::new(&f, [0.1, 0.2, 0.3, 0.4]);
    assert_eq!(lit.color, [0.1, 0.2, 0.3, 0.4]);
    let light = Vec3::from(lit.light_dir);
    assert!((light.length() - 1.0).abs() < TOL);
    // mat3 columns pad their fourth lane with zero.
    for col in lit.normal_mat {
        assert_eq!(col[3], 0.0);
    }
}

#[test]
fn clip_block_carries_world_plane() {
    let plane = PlaneParams {
        y_translation: 3.0,
        ..PlaneParams::default()
    };
    let rig = CameraRig::default();
    let f = frame_matrices(&plane, &rig, 640.0, 480.0);
    let clip = ClipUniforms::new(&f);
    let eq = Vec4::from(clip.plane);
    assert!(eq.abs_diff_eq(Vec4::new(0.0, 1.0, 0.0, -3.0), 1e-4));
}
