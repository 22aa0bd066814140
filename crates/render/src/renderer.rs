use glam::{EulerRot, Vec3};
use scrollscape_kernel::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and produces output. It never mutates the
/// scene; object transforms are owned by the kernel's animation step.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the given scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Text renderer: a human-readable dump of the camera rig and mesh transforms.
///
/// Used for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list the static particles, not only the section meshes.
    pub include_particles: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_particles(mut self, include: bool) -> Self {
        self.include_particles = include;
        self
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let _span = tracing::trace_span!("debug_text_render").entered();
        let rig = scene.rig();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (sections={}, particles={}) ===",
            scene.sections().len(),
            scene.particles().len()
        );
        let _ = writeln!(
            out,
            "Camera: group={} local={} world={} fov={:.0}",
            fmt_vec(rig.group_position),
            fmt_vec(rig.camera_position),
            fmt_vec(rig.world_position()),
            rig.fov_degrees
        );

        for section in scene.sections() {
            let t = &section.object.transform;
            // Y first so the angle is not folded into [-pi/2, pi/2].
            let (yaw, _, _) = t.rotation.to_euler(EulerRot::YXZ);
            let _ = writeln!(
                out,
                "  [{}] pos={} rot_y={:.3}",
                section.object.name,
                fmt_vec(t.position),
                yaw
            );
        }

        if self.include_particles {
            for particle in scene.particles() {
                let _ = writeln!(
                    out,
                    "  [{}] pos={}",
                    particle.name,
                    fmt_vec(particle.transform.position)
                );
            }
        }

        out
    }
}
