//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene; animation is kernel-owned.
//! - Render output derives only from the scene state passed in.
//!
//! The GPU backend lives in `scrollscape-render-wgpu`. This crate holds the
//! trait plus a text renderer used by the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "scrollscape-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
