//! Developer tooling: scene inspector, tweakable debug parameters, frame timing.
//!
//! # Invariants
//! - Tools only read the scene; the one thing they hand back is the tint color.

mod inspector;
mod params;
mod timer;

pub use inspector::{SceneInspector, SceneSummary, SectionInfo};
pub use params::DebugParams;
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "scrollscape-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
