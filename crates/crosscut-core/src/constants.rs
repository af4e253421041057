use glam::Vec3;

// Shared scene tuning constants used by both web and native frontends.

// Camera
pub const CAMERA_DISTANCE: f32 = 50.0; // eye sits on the orbit sphere at this radius
pub const DEFAULT_CAMERA_NORMAL: [f32; 3] = [20.0, 20.0, 50.0]; // normalized at use
pub const DRAG_RADIANS_PER_PIXEL: f32 = 0.01;
pub const POLAR_CLAMP_EPSILON: f32 = 1e-4; // keeps the orbit off the poles
pub const POLE_NUDGE: f32 = 1e-4; // z perturbation when the normal lands on the y axis

// Projection; half-extents are pixels / ORTHO_PIXELS_PER_UNIT
pub const ORTHO_PIXELS_PER_UNIT: f32 = 40.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 2000.0;

// Lighting and object placement
pub const LIGHT_DIRECTION: [f32; 3] = [-3.0, 1.0, 2.0]; // normalized at use
pub const OBJECT_LENGTH: f32 = 10.0; // characteristic size fed to mesh builders and presets
pub const PLANE_EXTENT: f32 = 30.0; // cutting-plane quad side length

// Animation
pub const PRESET_ANIMATION_MS: f32 = 500.0;

// Colors (premultiplied nowhere; alpha blending is separate src-alpha)
pub const OBJECT_COLOR: [f32; 4] = [0xD0 as f32 / 255.0, 0xD8 as f32 / 255.0, 0xEE as f32 / 255.0, 0.7];
pub const EDGE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const PLANE_COLOR: [f32; 4] = [1.0, 0x3C as f32 / 255.0, 0x3C as f32 / 255.0, 0.13];
pub const SECTION_COLOR: [f32; 4] = [1.0, 0x3C as f32 / 255.0, 0x3C as f32 / 255.0, 1.0];
pub const CLEAR_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];

#[inline]
pub fn default_camera_normal() -> Vec3 {
    Vec3::from(DEFAULT_CAMERA_NORMAL).normalize()
}

#[inline]
pub fn light_direction() -> Vec3 {
    Vec3::from(LIGHT_DIRECTION).normalize()
}
