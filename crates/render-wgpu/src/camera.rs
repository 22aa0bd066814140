use glam::{Mat4, Vec3};
use scrollscape_kernel::CameraRig;

/// Perspective camera derived from the scene's camera rig each frame.
/// The rig carries no rotation, so the camera always looks down `-Z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub position: Vec3,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 12.0),
            fov: 35.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl SceneCamera {
    pub fn from_rig(rig: &CameraRig, aspect: f32) -> Self {
        Self {
            position: rig.world_position(),
            fov: rig.fov_degrees.to_radians(),
            aspect,
            near: rig.near,
            far: rig.far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollscape_kernel::{Scene, SceneConfig};

    #[test]
    fn default_camera() {
        let cam = SceneCamera::default();
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn follows_rig_world_position() {
        let scene = Scene::new(&SceneConfig::default());
        let cam = SceneCamera::from_rig(scene.rig(), 2.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 12.0));
        assert!((cam.fov - 35.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let cam = SceneCamera {
            position: Vec3::new(1.0, -4.0, 10.0),
            ..SceneCamera::default()
        };
        let clip = cam.view_projection() * Vec3::new(1.0, -4.0, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_is_clipped() {
        let cam = SceneCamera::default();
        let clip = cam.view_projection() * Vec3::new(0.0, 0.0, 20.0).extend(1.0);
        assert!(clip.w < 0.0);
    }
}
