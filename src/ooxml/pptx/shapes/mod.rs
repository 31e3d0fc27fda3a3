//! Shape-level types for PPTX parts.

pub mod placeholder;

pub use placeholder::{PlaceholderAttrs, PlaceholderKind, PlaceholderSlot};
