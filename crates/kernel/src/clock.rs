use std::time::Instant;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick, clamped to `[0, max_delta]`.
    pub delta: f32,
    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Scene clock: elapsed time since start plus the clamped delta between ticks.
///
/// The clamp keeps the parallax easing stable after a stall (window drag,
/// debugger pause) where an unclamped delta would overshoot the target.
#[derive(Debug, Clone)]
pub struct SceneClock {
    start: Instant,
    previous: f32,
    max_delta: f32,
    frame_index: u64,
}

impl SceneClock {
    pub fn start(max_delta: f32) -> Self {
        Self {
            start: Instant::now(),
            previous: 0.0,
            max_delta: max_delta.max(0.0),
            frame_index: 0,
        }
    }

    /// Sample the wall clock and advance.
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed().as_secs_f32();
        self.advance_to(elapsed)
    }

    /// Advance to an explicit elapsed time. Used by `tick` and by headless
    /// runs that step a fixed timeline.
    pub fn advance_to(&mut self, elapsed: f32) -> FrameTime {
        let delta = (elapsed - self.previous).clamp(0.0, self.max_delta);
        self.previous = elapsed;

        let ft = FrameTime {
            elapsed,
            delta,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    pub fn elapsed(&self) -> f32 {
        self.previous
    }
}
