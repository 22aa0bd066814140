use glam::{EulerRot, Vec3};
use scrollscape_kernel::{FrameStats, Scene};
use serde::Serialize;

/// Read-only queries against the scene for the debug panel and CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Snapshot of the rig, the section meshes and the last frame's stats.
    pub fn summary(scene: &Scene, stats: &FrameStats) -> SceneSummary {
        let rig = scene.rig();
        SceneSummary {
            camera_world: rig.world_position().to_array(),
            group_position: rig.group_position.to_array(),
            scroll_progress: stats.scroll_progress,
            parallax_target: stats.parallax_target,
            spin: stats.spin,
            sections: Self::sections(scene),
            particle_count: scene.particles().len(),
        }
    }

    pub fn sections(scene: &Scene) -> Vec<SectionInfo> {
        scene
            .sections()
            .iter()
            .map(|s| {
                let t = &s.object.transform;
                let (rot_y, _, _) = t.rotation.to_euler(EulerRot::YXZ);
                SectionInfo {
                    name: s.object.name.clone(),
                    kind: s.object.shape.kind().name().to_string(),
                    position: t.position.to_array(),
                    rotation_y: rot_y,
                }
            })
            .collect()
    }

    /// Index of the section whose anchor is closest to the camera in y.
    pub fn focused_section(scene: &Scene) -> Option<usize> {
        let cam_y = scene.rig().world_position().y;
        scene
            .sections()
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (a.object.transform.position.y - cam_y).abs();
                let db = (b.object.transform.position.y - cam_y).abs();
                da.total_cmp(&db)
            })
            .map(|(i, _)| i)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub camera_world: [f32; 3],
    pub group_position: [f32; 3],
    pub scroll_progress: f32,
    pub parallax_target: f32,
    pub spin: f32,
    pub sections: Vec<SectionInfo>,
    pub particle_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionInfo {
    pub name: String,
    pub kind: String,
    pub position: [f32; 3],
    pub rotation_y: f32,
}

fn fmt3(v: [f32; 3]) -> String {
    let v = Vec3::from_array(v);
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Camera: world={} group={} scroll={:.0}% spin={:.3}",
            fmt3(self.camera_world),
            fmt3(self.group_position),
            self.scroll_progress * 100.0,
            self.spin
        )?;
        for s in &self.sections {
            writeln!(f, "  {} ({}) pos={}", s.name, s.kind, fmt3(s.position))?;
        }
        write!(f, "Particles: {}", self.particle_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollscape_common::Pointer;
    use scrollscape_kernel::{FrameInput, SceneConfig};

    fn scrolled(scroll_y: f32) -> (Scene, FrameStats) {
        let mut scene = Scene::new(&SceneConfig::default());
        let stats = scene.animate(&FrameInput {
            elapsed: 0.0,
            delta: 0.0,
            scroll_y,
            viewport_height: 800.0,
            pointer: Pointer::default(),
        });
        (scene, stats)
    }

    #[test]
    fn summary_of_fresh_scene() {
        let scene = Scene::new(&SceneConfig::default());
        let summary = SceneInspector::summary(&scene, &FrameStats::default());
        assert_eq!(summary.camera_world, [0.0, 0.0, 12.0]);
        assert_eq!(summary.sections.len(), 3);
        assert_eq!(summary.sections[1].kind, "torus");
        assert_eq!(summary.particle_count, 30);
    }

    #[test]
    fn summary_reflects_scroll() {
        let (scene, stats) = scrolled(800.0);
        let summary = SceneInspector::summary(&scene, &stats);
        assert!((summary.camera_world[1] + 4.0).abs() < 1e-5);
        assert!((summary.scroll_progress - 0.5).abs() < 1e-5);
    }

    #[test]
    fn rotation_beyond_quarter_turn() {
        let mut scene = Scene::new(&SceneConfig::default());
        let stats = scene.animate(&FrameInput {
            elapsed: 32.0,
            delta: 0.0,
            scroll_y: 0.0,
            viewport_height: 800.0,
            pointer: Pointer::default(),
        });
        assert!((stats.spin - 2.0).abs() < 1e-5);
        let summary = SceneInspector::summary(&scene, &stats);
        for section in &summary.sections {
            assert!((section.rotation_y - 2.0).abs() < 1e-5, "{}", section.rotation_y);
        }
    }

    #[test]
    fn focus_follows_scroll() {
        assert_eq!(SceneInspector::focused_section(&scrolled(0.0).0), Some(0));
        assert_eq!(SceneInspector::focused_section(&scrolled(800.0).0), Some(1));
        assert_eq!(SceneInspector::focused_section(&scrolled(1600.0).0), Some(2));
    }

    #[test]
    fn summary_display() {
        let (scene, stats) = scrolled(0.0);
        let s = SceneInspector::summary(&scene, &stats).to_string();
        assert!(s.contains("scroll=0%"));
        // swing is sin(0), so every section sits on x = 0
        assert!(s.contains("sphere (sphere) pos=(0.00, 0.00, 0.00)"));
        assert!(s.ends_with("Particles: 30"));
    }
}
