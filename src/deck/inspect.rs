//! Read-only inspection of an existing presentation.
use crate::deck::catalogue::{Layout, TemplateCatalogue};
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::{Package, PlaceholderKind, ShapeInfo, ShapeKind};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Structured description of a presentation.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub slide_count: usize,
    pub layout_count: usize,
    /// EMU
    pub slide_width: i64,
    /// EMU
    pub slide_height: i64,
    pub layouts: Vec<Layout>,
    pub slides: Vec<SlideReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlideReport {
    pub index: usize,
    pub layout: String,
    pub shapes: Vec<ShapeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShapeReport {
    pub name: String,
    pub kind: ShapeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PlaceholderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_idx: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Vec<String>>>,
    pub has_chart: bool,
    pub has_picture: bool,
}

impl From<ShapeInfo> for ShapeReport {
    fn from(info: ShapeInfo) -> Self {
        Self {
            placeholder: info.placeholder_kind(),
            placeholder_idx: info.placeholder.as_ref().map(|attrs| attrs.idx),
            has_chart: info.chart_rid.is_some(),
            has_picture: info.kind == ShapeKind::Picture || info.image_rid.is_some(),
            name: info.name,
            kind: info.kind,
            paragraphs: info.paragraphs,
            table: info.table,
        }
    }
}

impl SlideReport {
    /// Non-empty text of every shape, in document order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes
            .iter()
            .flat_map(|shape| shape.paragraphs.iter())
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Text of the title placeholder, if any.
    pub fn title(&self) -> Option<String> {
        self.shapes
            .iter()
            .find(|shape| shape.placeholder.is_some_and(PlaceholderKind::is_title))
            .map(|shape| shape.paragraphs.join("\n"))
    }
}

impl InspectionReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(output_error)
    }
}

fn output_error(e: serde_json::Error) -> DeckError {
    DeckError::Io(e.into())
}

/// Inspect a presentation file.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<InspectionReport> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DeckError::TemplateNotFound(path.to_path_buf()));
    }
    let package = Package::open(path).map_err(|e| DeckError::TemplateCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    inspect_package(&package)
}

/// Inspect an in-memory `.pptx` package.
pub fn inspect_bytes(bytes: &[u8]) -> Result<InspectionReport> {
    let package = Package::from_bytes(bytes.to_vec())?;
    inspect_package(&package)
}

pub fn inspect_package(package: &Package) -> Result<InspectionReport> {
    let catalogue = TemplateCatalogue::from_package(package)?;
    let (slide_width, slide_height) = package.slide_size()?;
    let slides: Vec<SlideReport> = package
        .slides()?
        .into_iter()
        .enumerate()
        .map(|(index, entry)| SlideReport {
            index,
            layout: entry.layout_name,
            shapes: entry.shapes.into_iter().map(ShapeReport::from).collect(),
            notes: entry.notes,
        })
        .collect();

    Ok(InspectionReport {
        slide_count: slides.len(),
        layout_count: catalogue.len(),
        slide_width,
        slide_height,
        layouts: catalogue.layouts().to_vec(),
        slides,
    })
}

const EMU_PER_INCH: f64 = 914_400.0;

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slides: {}", self.slide_count)?;
        writeln!(f, "Layouts: {}", self.layout_count)?;
        writeln!(
            f,
            "Dimensions: {:.2}\" x {:.2}\"",
            self.slide_width as f64 / EMU_PER_INCH,
            self.slide_height as f64 / EMU_PER_INCH
        )?;

        writeln!(f, "\nAvailable layouts:")?;
        for layout in &self.layouts {
            writeln!(f, "  [{}] {}", layout.index, layout.name)?;
            for slot in layout.content_slots() {
                writeln!(f, "      placeholder {}: {} ({})", slot.idx, slot.name, slot.kind)?;
            }
        }

        if !self.slides.is_empty() {
            writeln!(f, "\nSlides:")?;
        }
        for slide in &self.slides {
            let title = slide.title().unwrap_or_default();
            writeln!(f, "  {}. [{}] {}", slide.index + 1, slide.layout, title)?;
            for shape in &slide.shapes {
                if shape.has_chart {
                    writeln!(f, "      chart: {}", shape.name)?;
                } else if shape.has_picture {
                    writeln!(f, "      picture: {}", shape.name)?;
                } else if let Some(ref table) = shape.table {
                    let cols = table.first().map_or(0, Vec::len);
                    writeln!(f, "      table: {} x {}", table.len(), cols)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::assembler::compile;
    use crate::deck::spec::{PresentationSpec, SlideBody, SlideSpec};

    #[test]
    fn test_inspect_blank_presentation() {
        let package = Package::new_default().unwrap();
        let report = inspect_package(&package).unwrap();
        assert_eq!(report.slide_count, 0);
        assert_eq!(report.layout_count, 11);
        assert_eq!((report.slide_width, report.slide_height), (12_192_000, 6_858_000));
        assert!(report.to_string().contains("[6] Blank"));
    }

    #[test]
    fn test_inspect_compiled_table() {
        let spec = PresentationSpec::new(vec![
            SlideSpec::new(SlideBody::Table {
                headers: vec!["Region".into(), "Revenue".into()],
                rows: vec![vec!["North".into(), "100".into()]],
            })
            .with_title("Sales"),
        ]);
        let deck = compile(&spec, None).unwrap();
        let report = inspect_bytes(&deck.bytes).unwrap();
        let slide = &report.slides[0];
        assert_eq!(slide.title().as_deref(), Some("Sales"));
        let table = slide.shapes.iter().find_map(|s| s.table.clone()).unwrap();
        assert_eq!(table, vec![vec!["Region", "Revenue"], vec!["North", "100"]]);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["slide_count"], 1);
        assert_eq!(json["slides"][0]["layout"], "Title and Content");
    }

    #[test]
    fn test_inspect_missing_file() {
        assert!(matches!(
            inspect("/nonexistent/deck.pptx"),
            Err(DeckError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_json_failure_is_an_output_error() {
        let Err(e) = serde_json::from_str::<u8>("x") else {
            panic!("expected a json error");
        };
        assert!(matches!(output_error(e), DeckError::Io(_)));
    }
}
