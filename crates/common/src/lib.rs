//! Shared types for the scrollscape workspace.

mod color;
mod types;

pub use color::{ColorError, Rgba};
pub use types::{Pointer, PrimitiveKind, Shape, Transform};
