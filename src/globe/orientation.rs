use nalgebra_glm as glm;

/// Pixels of pointer travel per radian of globe rotation.
pub const DRAG_PIXELS_PER_RADIAN: f64 = 120.0;

/// Cumulative rotation of the globe relative to its rest pose.
///
/// Always a pure rotation: every setter strips translation and re-orthonormalizes the
/// rotational block, so rounding drift never turns into scale or shear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    transform: glm::DMat4,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            transform: glm::DMat4::identity(),
        }
    }

    pub fn from_transform(transform: &glm::DMat4) -> Self {
        Self {
            transform: pure_rotation(transform),
        }
    }

    pub fn transform(&self) -> &glm::DMat4 {
        &self.transform
    }

    pub fn set(&mut self, transform: &glm::DMat4) {
        self.transform = pure_rotation(transform);
    }

    /// Rotational 3x3 block.
    #[cfg(test)]
    pub fn rotation(&self) -> glm::DMat3 {
        glm::mat4_to_mat3(&self.transform)
    }

    /// Single precision copy for GPU upload.
    pub fn to_f32(&self) -> glm::Mat4 {
        glm::Mat4::from_iterator(self.transform.iter().map(|&v| v as f32))
    }

    /// Largest element-wise difference from the identity transform.
    #[cfg(test)]
    pub fn distance_from_identity(&self) -> f64 {
        (self.transform - glm::DMat4::identity()).amax()
    }
}

/// 4x4 rotation of `angle` radians around `axis` (normalized internally).
pub fn rotation(axis: &glm::DVec3, angle: f64) -> glm::DMat4 {
    glm::rotation(angle, axis)
}

/// Rotate `base` by a screen-space drag of `(dx, dy)` pixels, `dy` pointing up.
#[cfg(test)]
pub fn apply_delta(base: &glm::DMat4, dx: f64, dy: f64) -> glm::DMat4 {
    apply_delta_scaled(base, dx, dy, DRAG_PIXELS_PER_RADIAN)
}

/// Rotate `base` by a screen-space drag of `(dx, dy)` pixels at the given sensitivity.
///
/// The rotation is composed on the left, in world space, so the drag direction on
/// screen always matches the direction the globe turns.
pub fn apply_delta_scaled(base: &glm::DMat4, dx: f64, dy: f64, pixels_per_radian: f64) -> glm::DMat4 {
    let axis = glm::vec3(-dy, dx, 0.0);
    let length = glm::length(&axis);
    if length == 0.0 {
        return *base;
    }
    rotation(&(axis / length), length / pixels_per_radian) * base
}

/// Strip translation and projective parts and Gram-Schmidt the rotational columns.
fn pure_rotation(m: &glm::DMat4) -> glm::DMat4 {
    let r = glm::mat4_to_mat3(m);
    let x = glm::normalize(&glm::vec3(r[(0, 0)], r[(1, 0)], r[(2, 0)]));
    let y_raw = glm::vec3(r[(0, 1)], r[(1, 1)], r[(2, 1)]);
    let y = glm::normalize(&(y_raw - x * glm::dot(&x, &y_raw)));
    let z = glm::cross(&x, &y);

    glm::mat3_to_mat4(&glm::DMat3::from_columns(&[x, y, z]))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn assert_mat_close(a: &glm::DMat4, b: &glm::DMat4, tol: f64) {
        let diff = (a - b).amax();
        assert!(diff <= tol, "matrices differ by {diff}:\n{a}\n{b}");
    }

    fn apply(m: &glm::DMat4, v: glm::DVec3) -> glm::DVec3 {
        let out = m * glm::vec4(v.x, v.y, v.z, 1.0);
        glm::vec3(out.x, out.y, out.z)
    }

    #[test]
    fn zero_delta_keeps_base() {
        let base = rotation(&glm::vec3(0.0, 1.0, 0.0), 0.3);
        assert_eq!(apply_delta(&base, 0.0, 0.0), base);
    }

    #[test]
    fn dragging_right_turns_front_toward_right() {
        let m = apply_delta(&glm::DMat4::identity(), 60.0, 0.0);
        let front = apply(&m, glm::vec3(0.0, 0.0, 1.0));
        assert!(front.x > 0.4, "front moved to {front:?}");
        // 60px at 120px/rad is half a radian around +y.
        assert!((front.x - 0.5f64.sin()).abs() < 1e-12);
    }

    #[test]
    fn dragging_up_turns_front_upward() {
        let m = apply_delta(&glm::DMat4::identity(), 0.0, 60.0);
        let front = apply(&m, glm::vec3(0.0, 0.0, 1.0));
        assert!(front.y > 0.4, "front moved to {front:?}");
    }

    #[test]
    fn fast_drags_may_exceed_a_full_turn() {
        let full_turn = 2.0 * std::f64::consts::PI * DRAG_PIXELS_PER_RADIAN;
        let m = apply_delta(&glm::DMat4::identity(), full_turn, 0.0);
        assert_mat_close(&m, &glm::DMat4::identity(), 1e-9);
    }

    #[test]
    fn sequential_deltas_compose_on_the_left() {
        let t = rotation(&glm::vec3(1.0, 2.0, 3.0), 1.1);
        let (d1, d2) = ((30.0, -12.0), (-7.0, 44.0));

        let stepwise = apply_delta(&apply_delta(&t, d1.0, d1.1), d2.0, d2.1);

        let r1 = apply_delta(&glm::DMat4::identity(), d1.0, d1.1);
        let r2 = apply_delta(&glm::DMat4::identity(), d2.0, d2.1);
        assert_mat_close(&stepwise, &(r2 * r1 * t), 1e-12);
    }

    #[test]
    fn sensitivity_scales_angle() {
        let slow = apply_delta_scaled(&glm::DMat4::identity(), 10.0, 0.0, 240.0);
        let fast = apply_delta_scaled(&glm::DMat4::identity(), 5.0, 0.0, 120.0);
        assert_mat_close(&slow, &fast, 1e-12);
    }

    #[test]
    fn drift_is_normalized_away() {
        let mut drifted = rotation(&glm::vec3(0.0, 0.0, 1.0), 0.7) * 1.01;
        drifted[(0, 3)] = 5.0;
        drifted[(3, 3)] = 1.0;

        let o = Orientation::from_transform(&drifted);
        let r = o.rotation();
        assert_mat_close(
            &glm::mat3_to_mat4(&(r.transpose() * r)),
            &glm::DMat4::identity(),
            1e-12,
        );
        assert!((r.determinant() - 1.0).abs() < 1e-12);
        assert_eq!(o.transform()[(0, 3)], 0.0);
        assert_mat_close(o.transform(), &rotation(&glm::vec3(0.0, 0.0, 1.0), 0.7), 1e-12);
    }

    #[test]
    fn identity_has_zero_distance() {
        assert_eq!(Orientation::identity().distance_from_identity(), 0.0);
        let turned = Orientation::from_transform(&rotation(&glm::vec3(1.0, 0.0, 0.0), 0.2));
        assert!(turned.distance_from_identity() > 0.1);
    }
}
