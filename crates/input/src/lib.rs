//! Input mapping: window-level events become the values the scene animates on.
//!
//! # Invariants
//! - Pointer coordinates are normalized against the logical viewport size.
//! - The scroll offset always stays within `[0, (sections - 1) * height]`.

pub mod scroll;
pub mod viewport;

pub use scroll::{ScrollInput, ScrollState};
pub use viewport::Viewport;
