use std::time::{Duration, Instant};

use super::drag::DragGesture;
use super::orientation::{DRAG_PIXELS_PER_RADIAN, Orientation};
use super::recenter::{DEFAULT_RECENTER_DURATION, RecenterAnimator, Tick};

/// Owns the globe orientation and the two state machines that write to it.
///
/// Only one of them writes at a time: pressing the pointer cancels a recenter in
/// flight, and a recenter command ends the active drag.
pub struct GlobeController {
    orientation: Orientation,
    drag: Option<DragGesture>,
    recenter: RecenterAnimator,
    pixels_per_radian: f64,
}

impl Default for GlobeController {
    fn default() -> Self {
        Self::new(DRAG_PIXELS_PER_RADIAN, DEFAULT_RECENTER_DURATION)
    }
}

impl GlobeController {
    /// A sensitivity that is not a positive finite number falls back to the default.
    pub fn new(pixels_per_radian: f64, recenter_duration: Duration) -> Self {
        let pixels_per_radian = if pixels_per_radian.is_finite() && pixels_per_radian > 0.0 {
            pixels_per_radian
        } else {
            log::warn!(
                "Invalid pixels_per_radian {pixels_per_radian}, using {DRAG_PIXELS_PER_RADIAN}"
            );
            DRAG_PIXELS_PER_RADIAN
        };

        Self {
            orientation: Orientation::identity(),
            drag: None,
            recenter: RecenterAnimator::new(recenter_duration),
            pixels_per_radian,
        }
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.recenter.is_animating()
    }

    /// Handle pointer press at window position `pos`
    pub fn on_pointer_down(&mut self, pos: [f64; 2]) {
        self.recenter.cancel();
        self.drag = Some(DragGesture::begin(&self.orientation, pos));
        log::debug!("Drag started at ({:.1}, {:.1})", pos[0], pos[1]);
    }

    /// Handle pointer movement. Returns true when the orientation changed.
    pub fn on_pointer_move(&mut self, pos: [f64; 2]) -> bool {
        let Some(gesture) = &self.drag else {
            return false;
        };
        self.orientation = gesture.orientation_at(pos, self.pixels_per_radian);
        true
    }

    pub fn on_pointer_up(&mut self) {
        if let Some(gesture) = self.drag.take() {
            let origin = gesture.origin();
            log::debug!("Drag ended (started at {:.1}, {:.1})", origin[0], origin[1]);
        }
    }

    /// Start animating back to the rest pose. Returns false when already centered.
    pub fn recenter(&mut self, now: Instant) -> bool {
        self.drag = None;
        self.recenter.start(&self.orientation, now)
    }

    /// Advance the recenter animation for the frame at `now`.
    pub fn tick(&mut self, now: Instant) -> Tick {
        self.recenter.tick(&mut self.orientation, now)
    }
}
