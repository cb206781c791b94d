use std::time::{Duration, Instant};

use super::axis_angle::{self, AxisAngle};
use super::orientation::Orientation;

pub const DEFAULT_RECENTER_DURATION: Duration = Duration::from_millis(500);

/// State of one recenter command, frozen when the command starts.
#[derive(Debug, Clone, Copy)]
pub struct RecenterRun {
    pub start: Instant,
    pub snapshot: Orientation,
    pub duration: Duration,
    pub axis_angle: AxisAngle,
}

impl RecenterRun {
    /// Fraction of the run completed at `now`, and whether this is the last step.
    ///
    /// Overshoot and a clock that went backwards both end the run.
    pub fn progress(&self, now: Instant) -> (f64, bool) {
        let Some(elapsed) = now.checked_duration_since(self.start) else {
            return (1.0, true);
        };
        if self.duration.is_zero() {
            return (1.0, true);
        }
        let fraction = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        if fraction > 1.0 {
            (1.0, true)
        } else {
            (fraction, false)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Continue,
    Finished,
}

#[derive(Debug, Clone, Copy, Default)]
enum State {
    #[default]
    Idle,
    Animating(RecenterRun),
}

/// Animates an orientation back to identity along a single axis.
#[derive(Debug, Clone)]
pub struct RecenterAnimator {
    state: State,
    duration: Duration,
}

impl Default for RecenterAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTER_DURATION)
    }
}

impl RecenterAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: State::Idle,
            duration,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Animating(_))
    }

    #[cfg(test)]
    pub fn run(&self) -> Option<&RecenterRun> {
        match &self.state {
            State::Animating(run) => Some(run),
            State::Idle => None,
        }
    }

    /// Begin a run from the live orientation, replacing any run in flight.
    ///
    /// Returns `false` and stays idle when the orientation is already centered.
    pub fn start(&mut self, orientation: &Orientation, now: Instant) -> bool {
        match axis_angle::extract(orientation.transform()) {
            Some(axis_angle) => {
                log::debug!(
                    "Recenter around [{:.4}, {:.4}, {:.4}] by {:.4} rad",
                    axis_angle.axis.x,
                    axis_angle.axis.y,
                    axis_angle.axis.z,
                    axis_angle.angle
                );
                self.state = State::Animating(RecenterRun {
                    start: now,
                    snapshot: *orientation,
                    duration: self.duration,
                    axis_angle,
                });
                true
            }
            None => {
                log::debug!("Recenter skipped: already centered");
                self.state = State::Idle;
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.is_animating() {
            log::debug!("Recenter cancelled");
        }
        self.state = State::Idle;
    }

    /// Advance one animation frame, writing the interpolated orientation.
    pub fn tick(&mut self, orientation: &mut Orientation, now: Instant) -> Tick {
        let State::Animating(run) = self.state else {
            return Tick::Idle;
        };

        let (fraction, finished) = run.progress(now);
        let step = run.axis_angle.partial_inverse(fraction) * run.snapshot.transform();
        orientation.set(&step);

        if finished {
            self.state = State::Idle;
            Tick::Finished
        } else {
            Tick::Continue
        }
    }
}
