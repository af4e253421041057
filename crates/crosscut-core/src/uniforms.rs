//! Per-frame uniform snapshots.
//!
//! All matrices are computed once per frame into an immutable
//! [`FrameMatrices`] value; the renderer packs them into the Pod blocks below
//! and writes each GPU buffer once. Draws share the snapshots, so no uniform
//! state is mutated between draw calls.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::camera::CameraRig;
use crate::constants::{light_direction, FAR_PLANE, NEAR_PLANE, ORTHO_PIXELS_PER_UNIT};
use crate::math::normal_matrix;
use crate::plane::PlaneParams;

/// Everything the draw passes need for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_proj: Mat4,
    /// Solid transform (the solid sits at the origin, unrotated).
    pub object_mvp: Mat4,
    pub object_normal: Mat3,
    /// Cutting-plane quad transform.
    pub plane_mvp: Mat4,
    /// Model-view of the solid for the plane-discard shader.
    pub clipped_model_view: Mat4,
    pub clipped_mvp: Mat4,
    pub view_normal: Mat3,
    /// World-space plane equation `(nx, ny, nz, d)`.
    pub clipping_plane: Vec4,
    pub light_dir: Vec3,
}

/// Build the frame snapshot from the live scene state and the viewport size
/// in pixels. The projection is orthographic with half-extents scaled from
/// the viewport, so on-screen object size is resolution-independent.
pub fn frame_matrices(
    plane: &PlaneParams,
    rig: &CameraRig,
    width_px: f32,
    height_px: f32,
) -> FrameMatrices {
    let half_x = width_px / ORTHO_PIXELS_PER_UNIT;
    let half_y = height_px / ORTHO_PIXELS_PER_UNIT;
    let view = rig.view_matrix();
    let projection =
        Mat4::orthographic_rh(-half_x, half_x, -half_y, half_y, NEAR_PLANE, FAR_PLANE);
    let view_proj = projection * view;

    let model = Mat4::IDENTITY;
    let model_view = view * model;
    FrameMatrices {
        view,
        projection,
        view_proj,
        object_mvp: view_proj * model,
        object_normal: normal_matrix(model),
        plane_mvp: view_proj * plane.transform_matrix(),
        clipped_model_view: model_view,
        clipped_mvp: projection * model_view,
        view_normal: normal_matrix(view),
        clipping_plane: plane.world_plane(),
        light_dir: light_direction(),
    }
}

/// A `mat3x3<f32>` uniform column array; WGSL pads each column to 16 bytes.
#[inline]
fn mat3_columns(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct LitUniforms {
    pub mvp: [[f32; 4]; 4],
    pub normal_mat: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub light_dir: [f32; 3],
    pub _pad: f32,
}

impl LitUniforms {
    pub fn new(frame: &FrameMatrices, color: [f32; 4]) -> Self {
        Self {
            mvp: frame.object_mvp.to_cols_array_2d(),
            normal_mat: mat3_columns(frame.object_normal),
            color,
            light_dir: frame.light_dir.to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct UnlitUniforms {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl UnlitUniforms {
    pub fn new(mvp: Mat4, color: [f32; 4]) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            color,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ClipUniforms {
    pub model_view: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub view_normal: [[f32; 4]; 3],
    pub plane: [f32; 4],
}

impl ClipUniforms {
    pub fn new(frame: &FrameMatrices) -> Self {
        Self {
            model_view: frame.clipped_model_view.to_cols_array_2d(),
            mvp: frame.clipped_mvp.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            view_normal: mat3_columns(frame.view_normal),
            plane: frame.clipping_plane.to_array(),
        }
    }
}
