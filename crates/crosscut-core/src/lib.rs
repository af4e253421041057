pub mod animation;
pub mod camera;
pub mod constants;
pub mod geometry;
pub mod math;
pub mod passes;
pub mod plane;
pub mod presets;
pub mod scene;
pub mod uniforms;

pub static LIT_WGSL: &str = include_str!("../shaders/lit.wgsl");
pub static UNLIT_WGSL: &str = include_str!("../shaders/unlit.wgsl");
pub static CLIP_WGSL: &str = include_str!("../shaders/clip.wgsl");

pub use animation::*;
pub use camera::*;
pub use constants::*;
pub use plane::*;
pub use presets::*;
pub use scene::*;
