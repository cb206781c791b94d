use nalgebra_glm as glm;

/// Fixed perspective camera looking at the globe center down -z.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub distance: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraState {
    pub fn new(distance: f32, far: f32) -> Self {
        Self {
            distance,
            fov_y_degrees: 45.0,
            near: 0.1,
            far,
        }
    }

    pub fn view_proj(&self, aspect: f32) -> glm::Mat4 {
        let proj = glm::perspective_rh_zo(aspect, self.fov_y_degrees.to_radians(), self.near, self.far);
        let eye = glm::vec3(0.0, 0.0, self.distance);
        let view = glm::look_at(&eye, &glm::vec3(0.0, 0.0, 0.0), &glm::vec3(0.0, 1.0, 0.0));
        proj * view
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(300.0, 10000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globe_center_projects_to_screen_center() {
        let m = CameraState::default().view_proj(1.0);
        let clip = m * glm::vec4(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn front_of_globe_is_nearer_than_back() {
        let m = CameraState::default().view_proj(1.0);
        let depth = |z: f32| {
            let clip = m * glm::vec4(0.0, 0.0, z, 1.0);
            clip.z / clip.w
        };
        assert!(depth(100.0) < depth(-100.0));
    }
}
