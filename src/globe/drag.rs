use nalgebra_glm as glm;

use super::orientation::{Orientation, apply_delta_scaled};

/// One pointer-down to pointer-up interaction.
#[derive(Debug, Clone, Copy)]
pub struct DragGesture {
    snapshot: Orientation,
    origin: [f64; 2],
}

impl DragGesture {
    pub fn begin(orientation: &Orientation, origin: [f64; 2]) -> Self {
        Self {
            snapshot: *orientation,
            origin,
        }
    }

    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    /// Orientation for the pointer at `position` in window coordinates (y down).
    ///
    /// Always measured from the gesture origin and applied to the snapshot, never to the
    /// previous move's result.
    pub fn orientation_at(&self, position: [f64; 2], pixels_per_radian: f64) -> Orientation {
        let dx = position[0] - self.origin[0];
        let dy = -(position[1] - self.origin[1]);
        let transform: glm::DMat4 =
            apply_delta_scaled(self.snapshot.transform(), dx, dy, pixels_per_radian);
        Orientation::from_transform(&transform)
    }
}
