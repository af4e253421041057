//! The synchronous scene façade both frontends drive.
//!
//! All entry points are cheap and idempotent; animated transitions go through
//! the clock, direct slider edits bypass it.

use crate::animation::{AnimationClock, Easing};
use crate::camera::{normal_animation, CameraRig, CameraStatus};
use crate::constants::{OBJECT_LENGTH, PRESET_ANIMATION_MS};
use crate::plane::{PlaneField, PlaneParams};
use crate::presets::{preset_names, preset_plane, ObjectKind, DEFAULT_PRESET};

/// Easing rotation for the demo tour; every curve gets a turn.
const DEMO_EASINGS: [Easing; 4] = [
    Easing::QuadOut,
    Easing::SineOut,
    Easing::CubicOut,
    Easing::Linear,
];

pub struct Scene {
    pub plane: PlaneParams,
    pub rig: CameraRig,
    pub clock: AnimationClock,
    pub object: ObjectKind,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            plane: PlaneParams::default(),
            rig: CameraRig::default(),
            clock: AnimationClock::new(),
            object: ObjectKind::Cube,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct slider edit; takes effect immediately, no tween.
    pub fn set_plane_field(&mut self, field: PlaneField, value: f32) {
        self.plane.set(field, value);
    }

    /// Switch the displayed solid and glide the plane to the kind's default
    /// preset.
    pub fn select_object(&mut self, kind: ObjectKind) {
        self.object = kind;
        self.select_preset(DEFAULT_PRESET);
    }

    /// Glide the plane to a named preset of the current object kind.
    pub fn select_preset(&mut self, name: &str) {
        let target = preset_plane(self.object, name, OBJECT_LENGTH);
        self.clock.enqueue_plane(
            PRESET_ANIMATION_MS,
            self.plane,
            target,
            Some(Easing::QuadOut),
        );
    }

    /// Move the camera to `status`: onto the plane normal (Above), its
    /// reverse (Below), or back to the default vantage point (Free). The
    /// transition tweens in polar space so the camera slides over the sphere.
    pub fn set_camera_status(&mut self, status: CameraStatus) {
        self.rig.status = status;
        let target = self.rig.snap_target(&self.plane, status);
        let (from, to) = normal_animation(self.rig.normal, target);
        self.clock
            .enqueue_camera(PRESET_ANIMATION_MS, from, to, Some(Easing::QuadOut));
    }

    /// The camera button: Free -> Above -> Below -> Free.
    pub fn cycle_camera(&mut self) {
        self.set_camera_status(self.rig.status.next());
    }

    /// Restore the default plane and, if the camera is parked on the plane,
    /// the default vantage point.
    pub fn reset_all(&mut self) {
        self.select_preset(DEFAULT_PRESET);
        if self.rig.status != CameraStatus::Free {
            self.set_camera_status(CameraStatus::Free);
        }
    }

    /// Queue a scripted tour through the current kind's presets, ending back
    /// at the default plane.
    pub fn enqueue_demo(&mut self) {
        let names = preset_names(self.object);
        for (i, name) in names.iter().take(DEMO_EASINGS.len()).enumerate() {
            let target = preset_plane(self.object, name, OBJECT_LENGTH);
            self.clock.enqueue_plane(
                PRESET_ANIMATION_MS,
                self.plane,
                target,
                Some(DEMO_EASINGS[i]),
            );
        }
        let home = preset_plane(self.object, DEFAULT_PRESET, OBJECT_LENGTH);
        self.clock
            .enqueue_plane(PRESET_ANIMATION_MS, self.plane, home, Some(Easing::QuadOut));
        log::info!("demo: queued {} segments", self.clock.queue_len());
    }

    /// Cycle through the current kind's presets (used by the native
    /// frontend's keyboard control). Returns the preset just selected.
    pub fn cycle_preset(&mut self, index: &mut usize) -> &'static str {
        let names = preset_names(self.object);
        let name = names[*index % names.len()];
        *index = (*index + 1) % names.len();
        self.select_preset(name);
        name
    }

    /// Advance queued animations by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f32) {
        self.clock.advance(dt_ms, &mut self.plane, &mut self.rig);
    }
}
