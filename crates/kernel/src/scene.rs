use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scrollscape_common::{Rgba, Shape, Transform};

use crate::config::SceneConfig;

/// Horizontal swing prefix magnitude; even sections swing with `+`, odd with `-`.
const SWING_PREFIX: f32 = 2.0;

/// A mesh placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
}

/// One of the scroll-section meshes. Only these move after setup.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMesh {
    pub object: SceneObject,
    /// `+2` for even section indices, `-2` for odd ones.
    pub swing_prefix: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgba,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector from the scene origin towards the light.
    pub fn direction(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// The camera and the group it hangs from. The group carries the eased
/// pointer parallax; the camera's local position carries scroll.
/// Neither node is rotated: the camera always looks down `-Z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub group_position: Vec3,
    pub camera_position: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraRig {
    pub fn world_position(&self) -> Vec3 {
        self.group_position + self.camera_position
    }
}

/// The whole scene: three section meshes, static particles, one light and
/// the camera rig.
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) config: SceneConfig,
    pub(crate) sections: Vec<SectionMesh>,
    pub(crate) particles: Vec<SceneObject>,
    pub(crate) light: DirectionalLight,
    pub(crate) rig: CameraRig,
}

impl Scene {
    /// Build the scene described by `config`. The config is expected to be
    /// validated; colors that fail to parse fall back to white.
    pub fn new(config: &SceneConfig) -> Self {
        let d = config.object_distance;

        let sections = section_layout(d)
            .into_iter()
            .enumerate()
            .map(|(i, object)| SectionMesh {
                object,
                swing_prefix: if i % 2 == 0 { SWING_PREFIX } else { -SWING_PREFIX },
            })
            .collect::<Vec<_>>();

        let particles = scatter_particles(config);

        let light = DirectionalLight {
            color: Rgba::from_hex(&config.light.color).unwrap_or(Rgba::WHITE),
            intensity: config.light.intensity,
            position: config.light.position,
        };

        let rig = CameraRig {
            group_position: Vec3::ZERO,
            camera_position: Vec3::new(0.0, 0.0, config.camera.start_z),
            fov_degrees: config.camera.fov_degrees,
            near: config.camera.near,
            far: config.camera.far,
        };

        tracing::debug!(
            sections = sections.len(),
            particles = particles.len(),
            seed = config.particles.seed,
            "scene built"
        );

        Self {
            config: config.clone(),
            sections,
            particles,
            light,
            rig,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn sections(&self) -> &[SectionMesh] {
        &self.sections
    }

    pub fn particles(&self) -> &[SceneObject] {
        &self.particles
    }

    pub fn light(&self) -> &DirectionalLight {
        &self.light
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Every mesh in draw order: sections first, then particles.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.sections
            .iter()
            .map(|s| &s.object)
            .chain(self.particles.iter())
    }

    pub fn object_count(&self) -> usize {
        self.sections.len() + self.particles.len()
    }
}

/// Sphere, torus and cuboid, stacked one `d` apart and alternating sides.
fn section_layout(d: f32) -> [SceneObject; 3] {
    [
        SceneObject {
            name: "sphere".into(),
            shape: Shape::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 32,
            },
            transform: Transform::from_position(Vec3::new(-d * 2.0, 0.0, 0.0)),
        },
        SceneObject {
            name: "torus".into(),
            shape: Shape::Torus {
                radius: 1.0,
                tube: 0.3,
                radial_segments: 100,
                tubular_segments: 50,
            },
            transform: Transform::from_position(Vec3::new(d * 2.0, -d, 0.0)),
        },
        SceneObject {
            name: "cuboid".into(),
            shape: Shape::Cuboid {
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            transform: Transform::from_position(Vec3::new(-d * 2.0, -d * 1.8, 0.0)),
        },
    ]
}

/// Small spheres scattered through the scroll range. Placed once, never animated.
fn scatter_particles(config: &SceneConfig) -> Vec<SceneObject> {
    let d = config.object_distance;
    let p = &config.particles;
    let shape = Shape::Sphere {
        radius: p.radius,
        width_segments: 32,
        height_segments: 32,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(p.seed);

    (0..p.count)
        .map(|i| {
            let x = (rng.random::<f32>() - 0.5) * p.spread;
            let y = d * 0.5 - rng.random::<f32>() * d * 4.0;
            let z = (rng.random::<f32>() - 0.5) * p.spread;
            SceneObject {
                name: format!("particle_{i}"),
                shape,
                transform: Transform::from_position(Vec3::new(x, y, z)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollscape_common::PrimitiveKind;

    #[test]
    fn default_scene_layout() {
        let scene = Scene::new(&SceneConfig::default());
        let kinds: Vec<_> = scene.sections().iter().map(|s| s.object.shape.kind()).collect();
        assert_eq!(
            kinds,
            vec![PrimitiveKind::Sphere, PrimitiveKind::Torus, PrimitiveKind::Cuboid]
        );

        let positions: Vec<Vec3> = scene
            .sections()
            .iter()
            .map(|s| s.object.transform.position)
            .collect();
        assert_eq!(positions[0], Vec3::new(-8.0, 0.0, 0.0));
        assert_eq!(positions[1], Vec3::new(8.0, -4.0, 0.0));
        assert!(positions[2].abs_diff_eq(Vec3::new(-8.0, -7.2, 0.0), 1e-5));
    }

    #[test]
    fn swing_prefix_alternates() {
        let scene = Scene::new(&SceneConfig::default());
        let prefixes: Vec<f32> = scene.sections().iter().map(|s| s.swing_prefix).collect();
        assert_eq!(prefixes, vec![2.0, -2.0, 2.0]);
    }

    #[test]
    fn particles_stay_in_their_band() {
        let config = SceneConfig::default();
        let scene = Scene::new(&config);
        assert_eq!(scene.particles().len(), 30);
        for p in scene.particles() {
            let pos = p.transform.position;
            assert!((-10.0..10.0).contains(&pos.x), "x out of band: {pos}");
            assert!((-10.0..10.0).contains(&pos.z), "z out of band: {pos}");
            // y = d/2 - r * 4d with r in [0, 1)
            assert!(pos.y <= 2.0 && pos.y > -14.0, "y out of band: {pos}");
            assert!(matches!(p.shape, Shape::Sphere { radius, .. } if radius == 0.1));
        }
    }

    #[test]
    fn particles_are_reproducible_per_seed() {
        let config = SceneConfig::default();
        let a = Scene::new(&config);
        let b = Scene::new(&config);
        assert_eq!(a.particles(), b.particles());

        let mut other = config.clone();
        other.particles.seed = 99;
        let c = Scene::new(&other);
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn camera_starts_behind_origin() {
        let scene = Scene::new(&SceneConfig::default());
        assert_eq!(scene.rig().group_position, Vec3::ZERO);
        assert_eq!(scene.rig().world_position(), Vec3::new(0.0, 0.0, 12.0));
        assert_eq!(scene.rig().fov_degrees, 35.0);
    }

    #[test]
    fn light_points_from_upper_corner() {
        let scene = Scene::new(&SceneConfig::default());
        let dir = scene.light().direction();
        assert!(dir.abs_diff_eq(Vec3::splat(1.0).normalize(), 1e-6));
        assert_eq!(scene.light().color, Rgba::WHITE);
    }

    #[test]
    fn objects_lists_sections_then_particles() {
        let scene = Scene::new(&SceneConfig::default());
        assert_eq!(scene.object_count(), 33);
        let names: Vec<&str> = scene.objects().take(4).map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["sphere", "torus", "cuboid", "particle_0"]);
    }
}
