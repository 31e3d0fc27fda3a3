//! Deck compilation.
//!
//! The pipeline, in order:
//!
//! - [`spec`]: the declarative [`PresentationSpec`] read from YAML or JSON
//! - [`catalogue`]: layouts and placeholder slots of the template
//! - [`resolver`]: picks one layout per slide
//! - [`builder`]: turns a slide spec into shapes on that layout
//! - [`assembler`]: owns the working document and drives the compile
//! - [`substitute`]: optional `{{KEY}}` replacement pass over slide text
//! - [`inspect`](mod@inspect): read-only report over any `.pptx`
//!
//! Errors abort the whole compile; recoverable problems are collected as
//! [`Warning`]s on the [`CompiledDeck`].

pub mod assembler;
pub mod builder;
pub mod catalogue;
pub mod error;
pub mod inspect;
pub mod resolver;
pub mod spec;
pub mod style;
pub mod substitute;

pub use assembler::{
    CompileJob, CompiledDeck, DeckCompiler, WorkingDeck, compile, compile_batch, compile_to_file,
    replace_in_file,
};
pub use catalogue::{Layout, TemplateCatalogue, open_template};
pub use error::{DeckError, Result, Warning};
pub use inspect::{InspectionReport, ShapeReport, SlideReport, inspect, inspect_bytes, inspect_package};
pub use resolver::resolve;
pub use spec::{CellValue, LayoutRef, PlacedImage, PresentationSpec, SlideBody, SlideSpec, SlideType};
pub use style::DeckStyle;
pub use substitute::{ReplacementSet, SubstitutionReport, substitute};
