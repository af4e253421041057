//! Keyframe animation: a FIFO queue of timed segments advanced once per
//! frame tick.
//!
//! Each segment tweens the cutting plane, the camera direction, or both, from
//! the last committed keyframe to its target. Completion commits the target
//! values exactly, so chained segments never accumulate floating-point drift.

use std::collections::VecDeque;

use crate::camera::{CameraRig, SphericalAngles};
use crate::plane::{PlaneField, PlaneParams};

/// Easing curve applied to a segment's progress. All curves are pure
/// `(from, to, t) -> value` with `t` in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// `1 - (t - 1)^2`
    QuadOut,
    /// `sin(t * pi / 2)`
    SineOut,
    /// `1 + (t - 1)^3`
    CubicOut,
}

impl Easing {
    pub fn apply(self, from: f32, to: f32, t: f32) -> f32 {
        let p = match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (t - 1.0) * (t - 1.0),
            Easing::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
            Easing::CubicOut => 1.0 + (t - 1.0) * (t - 1.0) * (t - 1.0),
        };
        from + (to - from) * p
    }
}

/// One queued transition. Fields that are `None` leave that part of the scene
/// untouched.
#[derive(Clone, Debug)]
pub struct Segment {
    pub duration_ms: f32,
    pub plane: Option<PlaneParams>,
    pub camera: Option<SphericalAngles>,
    pub easing: Option<Easing>,
}

impl Segment {
    fn easing(&self) -> Easing {
        self.easing.unwrap_or(Easing::Linear)
    }
}

/// The last committed keyframe; the "from" side of whatever segment runs
/// next.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keyframe {
    pub plane: PlaneParams,
    pub camera: SphericalAngles,
}

#[derive(Debug, Default)]
pub struct AnimationClock {
    queue: VecDeque<Segment>,
    elapsed_ms: f32,
    playing: bool,
    last: Keyframe,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn last_keyframe(&self) -> Keyframe {
        self.last
    }

    /// Queue a plane transition. When the clock is idle the live plane state
    /// is captured as the starting keyframe, so the tween starts from what is
    /// currently on screen even after manual slider edits.
    pub fn enqueue_plane(
        &mut self,
        duration_ms: f32,
        current: PlaneParams,
        target: PlaneParams,
        easing: Option<Easing>,
    ) {
        if !self.playing {
            self.last.plane = current;
        }
        self.push(Segment {
            duration_ms,
            plane: Some(target),
            camera: None,
            easing,
        });
    }

    /// Queue a camera transition between precomputed polar angles. The caller
    /// supplies the "from" side (see [`crate::camera::normal_animation`]) so
    /// azimuth continuity is already resolved.
    pub fn enqueue_camera(
        &mut self,
        duration_ms: f32,
        from: SphericalAngles,
        to: SphericalAngles,
        easing: Option<Easing>,
    ) {
        self.last.camera = from;
        self.push(Segment {
            duration_ms,
            plane: None,
            camera: Some(to),
            easing,
        });
    }

    fn push(&mut self, segment: Segment) {
        if segment.easing.is_none() {
            log::debug!("animation: segment without easing, using linear");
        }
        self.queue.push_back(segment);
        self.playing = true;
    }

    /// Advance by `dt_ms`, writing interpolated or final values into the live
    /// scene state. One segment is active at a time; whatever remains of `dt`
    /// past a segment's end is discarded.
    pub fn advance(&mut self, dt_ms: f32, plane: &mut PlaneParams, rig: &mut CameraRig) {
        if !self.playing {
            return;
        }
        let Some(segment) = self.queue.front().cloned() else {
            self.playing = false;
            self.elapsed_ms = 0.0;
            return;
        };
        let elapsed = self.elapsed_ms + dt_ms;
        if elapsed >= segment.duration_ms {
            // Commit exactly; interpolation never gets to write the endpoint.
            self.elapsed_ms = 0.0;
            if let Some(target) = segment.plane {
                *plane = target;
                self.last.plane = target;
            }
            if let Some(target) = segment.camera {
                rig.apply_angles(target);
                self.last.camera = target;
            }
            self.queue.pop_front();
            if self.queue.is_empty() {
                log::info!("animation: queue drained");
                self.playing = false;
            }
        } else {
            self.elapsed_ms = elapsed;
            let t = elapsed / segment.duration_ms;
            let easing = segment.easing();
            if let Some(target) = segment.plane {
                for field in PlaneField::ALL {
                    let value = easing.apply(self.last.plane.get(field), target.get(field), t);
                    plane.set(field, value);
                }
            }
            if let Some(target) = segment.camera {
                rig.apply_angles(SphericalAngles {
                    theta: easing.apply(self.last.camera.theta, target.theta, t),
                    phi: easing.apply(self.last.camera.phi, target.phi, t),
                });
            }
        }
    }
}
