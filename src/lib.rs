//! Slidesmith - compile declarative presentation specs into PowerPoint decks
//!
//! A deck is described in YAML or JSON as an ordered list of typed slides
//! (title, section, content, table, chart, image, blank). The compiler opens a
//! template (or a built-in blank 16:9 presentation), picks a layout for every
//! slide, fills that layout's placeholders and adds free shapes, then writes a
//! standard `.pptx` package.
//!
//! # Features
//!
//! - **Template-aware**: layouts, placeholders and theme come from any `.pptx`/`.potx`
//! - **Typed content**: bullets, tables, native charts, pictures and speaker notes
//! - **Marker substitution**: `{{KEY}}` tokens in slide text replaced after assembly
//! - **Inspection**: read back layouts, placeholders and slide content of any deck
//!
//! # Example - Compiling a spec
//!
//! ```no_run
//! use slidesmith::deck::{DeckCompiler, PresentationSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = PresentationSpec::from_yaml_str(
//!     r#"
//! title: Quarterly Review
//! slides:
//!   - type: content
//!     title: Highlights
//!     bullets: [Revenue up, Churn down]
//! "#,
//! )?;
//!
//! let deck = DeckCompiler::new().compile(&spec, None)?;
//! std::fs::write("review.pptx", &deck.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a template
//!
//! ```no_run
//! use slidesmith::deck::inspect;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = inspect("template.pptx")?;
//! for layout in &report.layouts {
//!     println!("{}: {} ({} placeholders)", layout.index, layout.name, layout.placeholders.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod deck;
pub mod ooxml;

pub use deck::{
    CompiledDeck, DeckCompiler, DeckError, DeckStyle, InspectionReport, PresentationSpec,
    ReplacementSet, SlideSpec, Warning, WorkingDeck, compile, inspect,
};
