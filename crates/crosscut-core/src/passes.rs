//! The fixed draw-pass sequence that produces the cross-section.
//!
//! Every frame the renderer walks [`draw_list`] in order against a shared
//! depth/stencil target. The order is load-bearing: the stencil fill must run
//! before either plane pass, the depth seed before the back plane, and the
//! section face before the front plane. After [`PassId::FillSectionStencil`]
//! the stencil buffer is nonzero exactly where the cutting plane lies inside
//! the solid; [`PassId::DrawSectionFace`] and [`PassId::DrawFrontPlane`] test
//! that content with complementary functions, so each pixel shows exactly one
//! of the cut face or the outer plane.

/// Depth comparison for a pass. `Always` also covers the "depth test off"
/// case when paired with a disabled depth write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DepthFunc {
    #[default]
    Less,
    Greater,
    Always,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StencilOp {
    #[default]
    Keep,
    /// Increment with wraparound. Wrapping rather than clamping keeps the
    /// signed face count exact modulo 256 for concave or self-overlapping
    /// silhouettes.
    IncrWrap,
    /// Decrement with wraparound.
    DecrWrap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StencilFunc {
    #[default]
    Always,
    Equal,
    NotEqual,
}

/// Op triple for one face orientation: stencil fail, depth fail, pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StencilFaceOps {
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilCheck {
    pub func: StencilFunc,
    pub reference: u32,
    pub read_mask: u32,
}

impl Default for StencilCheck {
    fn default() -> Self {
        Self {
            func: StencilFunc::Always,
            reference: 1,
            read_mask: 0xFF,
        }
    }
}

/// Complete GPU state for one draw operation. Every field has an explicit
/// default so a pass description reads as a diff against the baseline state,
/// and the renderer never has to guess at an unset option.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_func: DepthFunc,
    /// Clear the depth buffer before this pass runs.
    pub clear_depth: bool,
    pub color_write: bool,
    pub cull: CullMode,
    pub stencil_test: bool,
    /// Clear the stencil buffer before this pass runs.
    pub clear_stencil: bool,
    pub stencil_write: bool,
    pub stencil_front: StencilFaceOps,
    pub stencil_back: StencilFaceOps,
    pub stencil_check: StencilCheck,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            depth_test: true,
            depth_write: true,
            depth_func: DepthFunc::Less,
            clear_depth: false,
            color_write: true,
            cull: CullMode::None,
            stencil_test: false,
            clear_stencil: false,
            stencil_write: false,
            stencil_front: StencilFaceOps::default(),
            stencil_back: StencilFaceOps::default(),
            stencil_check: StencilCheck::default(),
        }
    }
}

/// Which shader program a pass binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderKind {
    /// Directional-lit solid color.
    Lit,
    /// Flat color (planes, edges).
    Unlit,
    /// Flat color with per-fragment discard on one side of the cutting plane.
    Clip,
}

/// Which geometry a pass draws. The renderer swaps the meshes bound to
/// `Solid`/`Edge` when the displayed object changes; the pass list itself
/// never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometrySlot {
    Solid,
    Edge,
    Plane,
}

/// Which per-frame uniform block a pass reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    Object,
    Edge,
    Plane,
    Section,
    Clipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassId {
    FillSectionStencil,
    SeedBackfaceDepth,
    DrawBackPlane,
    DrawBackFaces,
    DrawSectionFace,
    DrawEdges,
    DrawFrontFaces,
    DrawFrontPlane,
}

impl PassId {
    pub fn name(self) -> &'static str {
        match self {
            PassId::FillSectionStencil => "fill_section_stencil",
            PassId::SeedBackfaceDepth => "seed_backface_depth",
            PassId::DrawBackPlane => "draw_back_plane",
            PassId::DrawBackFaces => "draw_back_faces",
            PassId::DrawSectionFace => "draw_section_face",
            PassId::DrawEdges => "draw_edges",
            PassId::DrawFrontFaces => "draw_front_faces",
            PassId::DrawFrontPlane => "draw_front_plane",
        }
    }
}

/// Frame draw order. Reordering breaks the stencil/depth choreography.
pub const DRAW_ORDER: [PassId; 8] = [
    PassId::FillSectionStencil,
    PassId::SeedBackfaceDepth,
    PassId::DrawBackPlane,
    PassId::DrawBackFaces,
    PassId::DrawSectionFace,
    PassId::DrawEdges,
    PassId::DrawFrontFaces,
    PassId::DrawFrontPlane,
];

#[derive(Clone, Copy, Debug)]
pub struct DrawOp {
    pub id: PassId,
    pub shader: ShaderKind,
    pub geometry: GeometrySlot,
    pub uniforms: UniformSlot,
    pub state: RenderState,
}

/// The descriptor for one pass.
pub fn draw_op(id: PassId) -> DrawOp {
    match id {
        // Solid through the plane-discard shader, counting surviving front
        // faces down and back faces up. Where the count is nonzero the
        // cutting plane is inside the solid.
        PassId::FillSectionStencil => DrawOp {
            id,
            shader: ShaderKind::Clip,
            geometry: GeometrySlot::Solid,
            uniforms: UniformSlot::Clipped,
            state: RenderState {
                clear_depth: true,
                depth_test: false,
                color_write: false,
                stencil_test: true,
                stencil_write: true,
                stencil_front: StencilFaceOps {
                    fail: StencilOp::Keep,
                    depth_fail: StencilOp::Keep,
                    pass: StencilOp::IncrWrap,
                },
                stencil_back: StencilFaceOps {
                    fail: StencilOp::Keep,
                    depth_fail: StencilOp::Keep,
                    pass: StencilOp::DecrWrap,
                },
                stencil_check: StencilCheck {
                    func: StencilFunc::Always,
                    reference: 1,
                    read_mask: 0xFF,
                },
                ..RenderState::default()
            },
        },
        // Back faces only into a fresh depth buffer; later overlay passes
        // depth-test against the far side of the solid.
        PassId::SeedBackfaceDepth => DrawOp {
            id,
            shader: ShaderKind::Lit,
            geometry: GeometrySlot::Solid,
            uniforms: UniformSlot::Object,
            state: RenderState {
                clear_depth: true,
                color_write: false,
                cull: CullMode::Front,
                ..RenderState::default()
            },
        },
        // The part of the translucent plane behind the solid.
        PassId::DrawBackPlane => DrawOp {
            id,
            shader: ShaderKind::Unlit,
            geometry: GeometrySlot::Plane,
            uniforms: UniformSlot::Plane,
            state: RenderState {
                depth_write: false,
                depth_func: DepthFunc::Greater,
                ..RenderState::default()
            },
        },
        PassId::DrawBackFaces => DrawOp {
            id,
            shader: ShaderKind::Lit,
            geometry: GeometrySlot::Solid,
            uniforms: UniformSlot::Object,
            state: RenderState {
                depth_test: false,
                cull: CullMode::Front,
                ..RenderState::default()
            },
        },
        // The cut face itself, only where the wrap counter marks the plane
        // as inside the solid (high bit set).
        PassId::DrawSectionFace => DrawOp {
            id,
            shader: ShaderKind::Unlit,
            geometry: GeometrySlot::Plane,
            uniforms: UniformSlot::Section,
            state: RenderState {
                depth_test: false,
                stencil_test: true,
                stencil_front: StencilFaceOps::default(),
                stencil_back: StencilFaceOps::default(),
                stencil_check: StencilCheck {
                    func: StencilFunc::Equal,
                    reference: 0x80,
                    read_mask: 0x80,
                },
                ..RenderState::default()
            },
        },
        // Edges stay visible through the translucent surfaces.
        PassId::DrawEdges => DrawOp {
            id,
            shader: ShaderKind::Unlit,
            geometry: GeometrySlot::Edge,
            uniforms: UniformSlot::Edge,
            state: RenderState {
                depth_func: DepthFunc::Always,
                ..RenderState::default()
            },
        },
        PassId::DrawFrontFaces => DrawOp {
            id,
            shader: ShaderKind::Lit,
            geometry: GeometrySlot::Solid,
            uniforms: UniformSlot::Object,
            state: RenderState {
                cull: CullMode::Back,
                ..RenderState::default()
            },
        },
        // The translucent plane in front of the solid; complementary stencil
        // test to the section-face pass.
        PassId::DrawFrontPlane => DrawOp {
            id,
            shader: ShaderKind::Unlit,
            geometry: GeometrySlot::Plane,
            uniforms: UniformSlot::Plane,
            state: RenderState {
                stencil_test: true,
                stencil_front: StencilFaceOps::default(),
                stencil_back: StencilFaceOps::default(),
                stencil_check: StencilCheck {
                    func: StencilFunc::NotEqual,
                    reference: 1,
                    read_mask: 0xFF,
                },
                ..RenderState::default()
            },
        },
    }
}

/// The full frame draw list in order.
pub fn draw_list() -> Vec<DrawOp> {
    DRAW_ORDER.into_iter().map(draw_op).collect()
}
