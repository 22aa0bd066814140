//! Per-frame animation: scroll and pointer drive the camera rig and the
//! section meshes.

use glam::{Quat, Vec3};
use scrollscape_common::Pointer;

use crate::scene::Scene;

/// Everything one frame of animation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Page scroll offset in logical pixels, `0` at the top.
    pub scroll_y: f32,
    /// Viewport height in logical pixels.
    pub viewport_height: f32,
    pub pointer: Pointer,
}

/// Values computed during a frame, for logging and the debug panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Where the camera group is easing towards on both axes.
    pub parallax_target: f32,
    pub group_position: Vec3,
    pub camera_position: Vec3,
    /// Y rotation applied to every section mesh, radians.
    pub spin: f32,
    /// Swing offset before the per-section prefix.
    pub swing: f32,
    /// Scroll offset over the scrollable range, in `[0, 1]`.
    pub scroll_progress: f32,
}

impl Scene {
    /// Advance the camera rig and section meshes by one frame.
    ///
    /// A non-positive viewport height is treated as 1 and a negative or
    /// non-finite delta as 0. Particles, the light and the y/z of each
    /// section mesh are left untouched.
    pub fn animate(&mut self, input: &FrameInput) -> FrameStats {
        let _span = tracing::trace_span!("animate").entered();
        let motion = &self.config.motion;
        let d = self.config.object_distance;

        let height = if input.viewport_height > 0.0 {
            input.viewport_height
        } else {
            1.0
        };
        let delta = if input.delta.is_finite() && input.delta > 0.0 {
            input.delta
        } else {
            0.0
        };
        let scroll = input.scroll_y;
        let parallax = input.pointer.x * motion.parallax_strength;

        let rig = &mut self.rig;
        rig.camera_position.y = (-scroll / height) * d + input.pointer.y * motion.parallax_strength;
        rig.camera_position.z = d + scroll * motion.scroll_depth_rate;

        let ease = motion.parallax_easing * delta;
        rig.group_position.x += (parallax - rig.group_position.x) * ease;
        // The vertical axis eases towards the horizontal target as well.
        rig.group_position.y += (parallax - rig.group_position.y) * ease;

        let spin = (parallax - rig.group_position.y + input.elapsed / motion.spin_time_divisor)
            * motion.spin_rate;
        let swing = (scroll * motion.scroll_swing_rate).sin() * motion.swing_amplitude;
        let rotation = Quat::from_rotation_y(spin);

        for section in &mut self.sections {
            section.object.transform.rotation = rotation;
            section.object.transform.position.x = section.swing_prefix * swing;
        }

        let max_scroll = self.config.max_scroll(height);
        let scroll_progress = if max_scroll > 0.0 {
            (scroll / max_scroll).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let stats = FrameStats {
            parallax_target: parallax,
            group_position: self.rig.group_position,
            camera_position: self.rig.world_position(),
            spin,
            swing,
            scroll_progress,
        };
        tracing::trace!(
            scroll,
            parallax,
            spin,
            camera = ?stats.camera_position,
            "frame animated"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn scene() -> Scene {
        Scene::new(&SceneConfig::default())
    }

    fn input(scroll_y: f32, pointer: Pointer, elapsed: f32, delta: f32) -> FrameInput {
        FrameInput {
            elapsed,
            delta,
            scroll_y,
            viewport_height: 800.0,
            pointer,
        }
    }

    #[test]
    fn first_frame_at_rest() {
        let mut scene = scene();
        let stats = scene.animate(&input(0.0, Pointer::default(), 0.0, 0.016));

        assert_eq!(scene.rig().camera_position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(scene.rig().group_position, Vec3::ZERO);
        for section in scene.sections() {
            assert_eq!(section.object.transform.position.x, 0.0);
            assert!(section.object.transform.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
        }
        assert_eq!(stats.scroll_progress, 0.0);
    }

    #[test]
    fn scrolling_one_viewport_moves_camera_down_one_section() {
        let mut scene = scene();
        let stats = scene.animate(&input(800.0, Pointer::default(), 0.0, 0.016));

        let cam = scene.rig().camera_position;
        assert!((cam.y - -4.0).abs() < 1e-5);
        assert!((cam.z - 11.2).abs() < 1e-4);
        assert!((stats.scroll_progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scroll_swings_sections_in_alternating_directions() {
        let mut scene = scene();
        scene.animate(&input(800.0, Pointer::default(), 0.0, 0.016));

        let swing = 1.6_f32.sin() * 2.0;
        let xs: Vec<f32> = scene
            .sections()
            .iter()
            .map(|s| s.object.transform.position.x)
            .collect();
        assert!((xs[0] - 2.0 * swing).abs() < 1e-5);
        assert!((xs[1] + 2.0 * swing).abs() < 1e-5);
        assert!((xs[2] - 2.0 * swing).abs() < 1e-5);
    }

    #[test]
    fn section_y_and_z_are_fixed() {
        let mut scene = scene();
        let before: Vec<(f32, f32)> = scene
            .sections()
            .iter()
            .map(|s| (s.object.transform.position.y, s.object.transform.position.z))
            .collect();
        scene.animate(&input(1234.0, Pointer::new(0.3, -0.2), 5.0, 0.05));
        let after: Vec<(f32, f32)> = scene
            .sections()
            .iter()
            .map(|s| (s.object.transform.position.y, s.object.transform.position.z))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn pointer_offsets_camera_and_eases_group() {
        let mut scene = scene();
        let stats = scene.animate(&input(0.0, Pointer::new(0.5, 0.5), 0.0, 0.1));

        assert_eq!(stats.parallax_target, 0.25);
        assert!((scene.rig().camera_position.y - 0.25).abs() < 1e-6);
        // 0.25 * (2.0 * 0.1)
        assert!((scene.rig().group_position.x - 0.05).abs() < 1e-6);
        assert!((scene.rig().group_position.y - 0.05).abs() < 1e-6);
        // (0.25 - 0.05 + 0 / 80) * 5
        assert!((stats.spin - 1.0).abs() < 1e-5);
        let expected = Quat::from_rotation_y(1.0);
        for section in scene.sections() {
            assert!(section.object.transform.rotation.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn group_converges_on_parallax_target() {
        let mut scene = scene();
        let pointer = Pointer::new(-0.4, 0.1);
        for frame in 0..300 {
            scene.animate(&input(0.0, pointer, frame as f32 * 0.05, 0.05));
        }
        let group = scene.rig().group_position;
        assert!((group.x - -0.2).abs() < 1e-4);
        assert!((group.y - -0.2).abs() < 1e-4);
        assert_eq!(group.z, 0.0);
    }

    #[test]
    fn spin_grows_with_elapsed_time() {
        let mut scene = scene();
        let stats = scene.animate(&input(0.0, Pointer::default(), 16.0, 0.016));
        // (16 / 80) * 5
        assert!((stats.spin - 1.0).abs() < 1e-5);
    }

    #[test]
    fn particles_and_light_never_move() {
        let mut scene = scene();
        let particles = scene.particles().to_vec();
        let light = *scene.light();
        for frame in 0..10 {
            scene.animate(&input(frame as f32 * 100.0, Pointer::new(0.2, 0.2), frame as f32, 0.1));
        }
        assert_eq!(scene.particles(), particles.as_slice());
        assert_eq!(*scene.light(), light);
    }

    #[test]
    fn degenerate_height_and_delta_are_sanitized() {
        let mut scene = scene();
        let stats = scene.animate(&FrameInput {
            elapsed: 1.0,
            delta: f32::NAN,
            scroll_y: 10.0,
            viewport_height: 0.0,
            pointer: Pointer::new(0.5, 0.0),
        });
        assert!(stats.camera_position.is_finite());
        assert_eq!(scene.rig().camera_position.y, -40.0);
        assert_eq!(scene.rig().group_position, Vec3::ZERO);

        scene.animate(&input(0.0, Pointer::new(0.5, 0.0), 2.0, -1.0));
        assert_eq!(scene.rig().group_position, Vec3::ZERO);
    }

    #[test]
    fn same_inputs_give_same_state() {
        let mut a = scene();
        let mut b = scene();
        let frames = [
            input(0.0, Pointer::new(0.1, 0.1), 0.0, 0.016),
            input(120.0, Pointer::new(0.2, -0.1), 0.016, 0.016),
            input(400.0, Pointer::new(-0.3, 0.4), 0.032, 0.016),
        ];
        for f in &frames {
            assert_eq!(a.animate(f), b.animate(f));
        }
        assert_eq!(a.rig(), b.rig());
        assert_eq!(a.sections(), b.sections());
    }
}
