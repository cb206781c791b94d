use nalgebra_glm as glm;
use rand::Rng;

/// Offset keeping `R - (1 - ε)I` invertible while it stays dominated by the fixed axis.
const ALMOST_ONE_EPSILON: f64 = 1e-5;

/// Rotations smaller than this are treated as already centered.
pub const MIN_ROTATION_ANGLE: f64 = 1e-4;

/// Inverse iteration stops once a pass moves the axis by less than this.
const AXIS_CONVERGENCE: f64 = 1e-12;

/// Close to the angle cutoff each pass only shrinks the off-axis error by ~ε/θ.
const MAX_INVERSE_ITERATIONS: usize = 64;

/// Below this a coordinate is treated as zero when choosing the axis sign.
const SIGN_EPSILON: f64 = 1e-9;

/// Rotation axis and signed angle such that rotating the source transform by `-angle`
/// around `axis` yields the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    pub axis: glm::DVec3,
    pub angle: f64,
}

impl AxisAngle {
    /// Transform that undoes `fraction` of this rotation.
    pub fn partial_inverse(&self, fraction: f64) -> glm::DMat4 {
        glm::rotation(-self.angle * fraction, &self.axis)
    }
}

/// Extract the axis and angle of `transform`'s rotational part.
///
/// Returns `None` for near-identity rotations, where the fixed axis is ill-defined.
pub fn extract(transform: &glm::DMat4) -> Option<AxisAngle> {
    extract_with_rng(transform, &mut rand::rng())
}

pub fn extract_with_rng<R: Rng + ?Sized>(transform: &glm::DMat4, rng: &mut R) -> Option<AxisAngle> {
    let rotation = glm::mat4_to_mat3(transform);

    let cos_angle = ((rotation.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
    if cos_angle.acos() < MIN_ROTATION_ANGLE {
        return None;
    }

    let axis = fixed_axis(&rotation, rng)?;
    let angle = signed_angle(&rotation, &axis);
    Some(AxisAngle { axis, angle })
}

/// Approximate eigenvector with eigenvalue 1, by inverse iteration on `R - (1 - ε)I`.
fn fixed_axis<R: Rng + ?Sized>(rotation: &glm::DMat3, rng: &mut R) -> Option<glm::DVec3> {
    let shifted = rotation - glm::DMat3::identity() * (1.0 - ALMOST_ONE_EPSILON);
    let inverse = shifted.try_inverse()?;

    let mut axis = glm::vec3(rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>());
    for _ in 0..MAX_INVERSE_ITERATIONS {
        let next = inverse * axis;
        let length = glm::length(&next);
        if !length.is_finite() || length == 0.0 {
            return None;
        }
        let next = next / length;
        let converged = glm::distance(&next, &axis) < AXIS_CONVERGENCE;
        axis = next;
        if converged {
            break;
        }
    }

    Some(canonical_sign(axis))
}

/// Two antiparallel vectors are both valid axes; always hand back the one whose first
/// significant coordinate is positive.
fn canonical_sign(axis: glm::DVec3) -> glm::DVec3 {
    let lead = axis
        .iter()
        .copied()
        .find(|c| c.abs() > SIGN_EPSILON)
        .unwrap_or(0.0);
    if lead < 0.0 { -axis } else { axis }
}

/// Any vector perpendicular to `axis`.
fn reference_vector(axis: &glm::DVec3) -> glm::DVec3 {
    let v = glm::vec3(-axis.y, axis.x, 0.0);
    if glm::length(&v) > 1e-6 {
        v
    } else {
        glm::vec3(0.0, -axis.z, axis.y)
    }
}

fn signed_angle(rotation: &glm::DMat3, axis: &glm::DVec3) -> f64 {
    let original = reference_vector(axis);
    let rotated = rotation * original;

    let angle = original.angle(&rotated);

    let forward = glm::rotate_vec3(&original, angle, axis);
    let backward = glm::rotate_vec3(&original, -angle, axis);
    if glm::distance(&forward, &rotated) < glm::distance(&backward, &rotated) {
        angle
    } else {
        -angle
    }
}
