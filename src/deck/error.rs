//! Error and warning types of the deck compiler.
//!
//! Every [`DeckError`] aborts the compile it was raised in. Conditions that
//! leave a usable deck behind are reported as [`Warning`] values next to a
//! successful result instead.
use crate::ooxml::OoxmlError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening templates, resolving layouts or building slides.
#[derive(Error, Debug)]
pub enum DeckError {
    /// Template path does not exist
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Template exists but is not a readable presentation package
    #[error("Invalid presentation file {}: {reason}", path.display())]
    TemplateCorrupt { path: PathBuf, reason: String },

    #[error("Layout '{0}' not found")]
    LayoutNotFound(String),

    #[error("Layout index {index} out of range ({count} layouts available)")]
    LayoutIndexOutOfRange { index: usize, count: usize },

    #[error("Document defines no slide layouts")]
    NoLayoutsAvailable,

    /// Data row `row` (0-based, header excluded) has the wrong width
    #[error("Table row {row} has {found} cells, expected {expected}")]
    TableDimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Series '{series}' has {found} values, expected {expected}")]
    ChartDataMismatch {
        series: String,
        expected: usize,
        found: usize,
    },

    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// Image file exists but cannot be decoded
    #[error("Unsupported image {}: {reason}", path.display())]
    UnsupportedImage { path: PathBuf, reason: String },

    /// Malformed spec document or slide entry
    #[error("Invalid spec: {0}")]
    InvalidSpecShape(String),

    #[error("Slide index {index} out of range ({count} slides)")]
    SlideIndexOutOfRange { index: usize, count: usize },

    #[error("Package error: {0}")]
    Package(#[from] OoxmlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// A non-fatal condition recorded during a compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// `placeholder_images` names an idx the layout does not have
    PlaceholderSlotMissing { slide: usize, idx: u32 },
    /// The slot exists but does not take pictures
    PlaceholderNotPicture { slide: usize, idx: u32 },
    PlaceholderImageUnreadable {
        slide: usize,
        idx: u32,
        path: PathBuf,
        reason: String,
    },
    /// Pie charts render only their first series
    PieSeriesDropped { slide: usize, dropped: usize },
    /// A `{{KEY}}` marker had no replacement
    UnmatchedMarker { key: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaceholderSlotMissing { slide, idx } => {
                write!(f, "slide {}: layout has no placeholder with idx {}", slide, idx)
            },
            Self::PlaceholderNotPicture { slide, idx } => {
                write!(f, "slide {}: placeholder {} is not a picture placeholder", slide, idx)
            },
            Self::PlaceholderImageUnreadable {
                slide,
                idx,
                path,
                reason,
            } => write!(
                f,
                "slide {}: could not fill placeholder {} from {}: {}",
                slide,
                idx,
                path.display(),
                reason
            ),
            Self::PieSeriesDropped { slide, dropped } => write!(
                f,
                "slide {}: pie chart shows only the first series, {} dropped",
                slide, dropped
            ),
            Self::UnmatchedMarker { key } => write!(f, "no replacement for {{{{{}}}}}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DeckError::LayoutIndexOutOfRange { index: 99, count: 5 };
        assert_eq!(err.to_string(), "Layout index 99 out of range (5 layouts available)");

        let err = DeckError::ChartDataMismatch {
            series: "Rev".into(),
            expected: 4,
            found: 3,
        };
        assert!(err.to_string().contains("'Rev' has 3 values, expected 4"));
    }

    #[test]
    fn test_warning_display_and_json() {
        let warning = Warning::UnmatchedMarker { key: "NAME".into() };
        assert_eq!(warning.to_string(), "no replacement for {{NAME}}");

        let json = serde_json::to_string(&Warning::PlaceholderSlotMissing { slide: 2, idx: 13 }).unwrap();
        assert_eq!(json, r#"{"kind":"placeholder_slot_missing","slide":2,"idx":13}"#);
    }
}
