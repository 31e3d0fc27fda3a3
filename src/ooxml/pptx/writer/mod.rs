//! Writer components for new PPTX slides.

pub mod chart;
pub(crate) mod relmap;
pub mod shape;
pub mod slide;

// Re-export main types
pub use chart::{ChartData, ChartKind, ChartSeries};
pub use shape::{
    Crop, ImageData, MutableShape, PlaceholderContent, PlaceholderShape, TableHeaderStyle,
};
pub use slide::MutableSlide;
