/// Parts for PowerPoint presentation documents.
///
/// This module contains read-side wrapper types for the XML parts of a .pptx
/// package, following the structure of the python-pptx library.
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, SlideId};
pub use slide::{ShapeInfo, ShapeKind, SlideLayoutPart, SlideMasterPart, SlidePart, scan_shapes};
