//! PowerPoint (.pptx) presentation support.
//!
//! This module reads and mutates PresentationML packages:
//!
//! - [`Package`]: the .pptx package, layout enumeration and slide insertion/removal
//! - [`parts`]: read-side views over presentation, master, layout and slide XML
//! - [`writer`]: XML generation for new slides, shapes, charts and notes
//! - [`template`]: the built-in blank 16:9 presentation
//!
//! # Example
//!
//! ```rust,no_run
//! use slidesmith::ooxml::pptx::{MutableSlide, Package};
//!
//! let mut pkg = Package::new_default()?;
//! let layouts = pkg.slide_layouts()?;
//! let slide = MutableSlide::new(layouts[6].partname.clone(), &layouts[6].placeholders);
//! pkg.add_slide(&slide)?;
//! pkg.save("blank.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod format;
pub mod package;
pub mod parts;
pub mod shapes;
pub mod template;
pub mod writer;

pub use format::{Geometry, ImageFormat, Paragraph, TextFormat};
pub use package::{DEFAULT_SLIDE_SIZE, LayoutEntry, Package, SlideEntry};
pub use parts::{ShapeInfo, ShapeKind};
pub use shapes::{PlaceholderKind, PlaceholderSlot};
pub use writer::{
    ChartData, ChartKind, ChartSeries, ImageData, MutableShape, MutableSlide, PlaceholderContent,
};
