// Host-side tests for the draw-pass descriptor table.

use crosscut_core::passes::*;

#[test]
fn draw_order_is_the_sectioning_choreography() {
    let names: Vec<&str> = draw_list().iter().map(|op| op.id.name()).collect();
    assert_eq!(
        names,
        [
            "fill_section_stencil",
            "seed_backface_depth",
            "draw_back_plane",
            "draw_back_faces",
            "draw_section_face",
            "draw_edges",
            "draw_front_faces",
            "draw_front_plane",
        ]
    );
}

#[test]
fn render_state_defaults_are_plain_solid_drawing() {
    let state = RenderState::default();
    assert!(state.depth_test);
    assert!(state.depth_write);
    assert_eq!(state.depth_func, DepthFunc::Less);
    assert!(!state.clear_depth);
    assert!(state.color_write);
    assert_eq!(state.cull, CullMode::None);
    assert!(!state.stencil_test);
    assert!(!state.clear_stencil);
    assert!(!state.stencil_write);
    assert_eq!(state.stencil_front, StencilFaceOps::default());
    assert_eq!(state.stencil_check.func, StencilFunc::Always);
}

#[test]
fn stencil_fill_counts_faces_with_wrapping_ops() {
    let op = draw_op(PassId::FillSectionStencil);
    assert_eq!(op.shader, ShaderKind::Clip);
    assert_eq!(op.geometry, GeometrySlot::Solid);
    let state = op.state;
    assert!(state.stencil_test && state.stencil_write);
    assert!(!state.color_write, "stencil fill must not touch color");
    assert!(!state.depth_test);
    assert_eq!(state.stencil_front.pass, StencilOp::IncrWrap);
    assert_eq!(state.stencil_back.pass, StencilOp::DecrWrap);
    assert_eq!(state.stencil_front.fail, StencilOp::Keep);
    assert_eq!(state.stencil_front.depth_fail, StencilOp::Keep);
    assert_eq!(state.stencil_check.func, StencilFunc::Always);
}

#[test]
fn section_and_front_plane_use_complementary_stencil_tests() {
    let section = draw_op(PassId::DrawSectionFace).state;
    let front_plane = draw_op(PassId::DrawFrontPlane).state;

    assert!(section.stencil_test && front_plane.stencil_test);
    // Neither overlay may disturb the counters laid down by the fill pass.
    assert!(!section.stencil_write && !front_plane.stencil_write);
    assert_eq!(section.stencil_front.pass, StencilOp::Keep);
    assert_eq!(front_plane.stencil_front.pass, StencilOp::Keep);

    // The cut face keys on the wrapped-negative high bit; the outer plane
    // draws everywhere the count is not a bare +1.
    assert_eq!(section.stencil_check.func, StencilFunc::Equal);
    assert_eq!(section.stencil_check.reference, 0x80);
    assert_eq!(section.stencil_check.read_mask, 0x80);
    assert_eq!(front_plane.stencil_check.func, StencilFunc::NotEqual);
    assert_eq!(front_plane.stencil_check.reference, 1);
    assert_eq!(front_plane.stencil_check.read_mask, 0xFF);
}

#[test]
fn depth_seed_pass_writes_backfaces_only() {
    let state = draw_op(PassId::SeedBackfaceDepth).state;
    assert!(state.clear_depth);
    assert!(!state.color_write);
    assert!(state.depth_test && state.depth_write);
    assert_eq!(state.cull, CullMode::Front);
}

#[test]
fn back_plane_reads_depth_with_greater_and_no_writes() {
    let state = draw_op(PassId::DrawBackPlane).state;
    assert_eq!(state.depth_func, DepthFunc::Greater);
    assert!(!state.depth_write);
    assert!(state.color_write);
}

#[test]
fn edges_always_pass_depth() {
    let op = draw_op(PassId::DrawEdges);
    assert_eq!(op.geometry, GeometrySlot::Edge);
    assert_eq!(op.state.depth_func, DepthFunc::Always);
}

#[test]
fn face_passes_cull_opposite_sides() {
    assert_eq!(draw_op(PassId::DrawBackFaces).state.cull, CullMode::Front);
    assert_eq!(draw_op(PassId::DrawFrontFaces).state.cull, CullMode::Back);
}

#[test]
fn only_leading_passes_request_clears() {
    let clears: Vec<bool> = draw_list()
        .iter()
        .map(|op| op.state.clear_depth || op.state.clear_stencil)
        .collect();
    assert_eq!(clears, [true, true, false, false, false, false, false, false]);
}

#[test]
fn lit_passes_share_the_object_uniform_block() {
    for op in draw_list() {
        if op.shader == ShaderKind::Lit {
            assert_eq!(op.uniforms, UniformSlot::Object);
            assert_eq!(op.geometry, GeometrySlot::Solid);
        }
    }
}
