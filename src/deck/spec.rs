//! Presentation spec model and loaders.
//!
//! Slide entries are deserialized into a loose record first and then
//! checked into [`SlideSpec`], so a missing or mistyped field surfaces as
//! [`DeckError::InvalidSpecShape`] instead of a half-built slide.
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::ChartKind;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Top-level deck description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresentationSpec {
    /// Title of the implicit first slide
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub slides: Vec<SlideSpec>,
}

impl PresentationSpec {
    pub fn new(slides: Vec<SlideSpec>) -> Self {
        Self {
            title: None,
            subtitle: None,
            slides,
        }
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        serde_saphyr::from_str(input).map_err(|e| DeckError::InvalidSpecShape(e.to_string()))
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| DeckError::InvalidSpecShape(e.to_string()))
    }

    /// Load a spec file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&input)
        } else {
            Self::from_yaml_str(&input)
        }
    }

    /// The title slide synthesized from the top-level `title`/`subtitle`.
    pub fn title_slide(&self) -> Option<SlideSpec> {
        let title = self.title.as_ref()?;
        Some(
            SlideSpec::new(SlideBody::Title {
                subtitle: self.subtitle.clone(),
            })
            .with_title(title.clone()),
        )
    }

    /// Number of slides a compile produces.
    pub fn slide_count(&self) -> usize {
        self.slides.len() + usize::from(self.title.is_some())
    }
}

/// Slide `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Title,
    Section,
    #[default]
    Content,
    Table,
    Chart,
    Image,
    Blank,
}

impl SlideType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Section => "section",
            Self::Content => "content",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Image => "image",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit layout choice of a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutRef {
    Index(usize),
    /// Exact, case-sensitive layout name
    Name(String),
}

/// A table cell as written in the spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null(()),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null(()) => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An image file plus optional placement in inches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacedImage {
    pub path: PathBuf,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PlacedImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Variant-specific slide content.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideBody {
    Title {
        subtitle: Option<String>,
    },
    Section {
        subtitle: Option<String>,
    },
    Content {
        bullets: Vec<String>,
        image: Option<PlacedImage>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Chart {
        kind: ChartKind,
        categories: Vec<String>,
        /// Series in declaration order
        series: Vec<(String, Vec<f64>)>,
    },
    Image {
        image: PlacedImage,
    },
    Blank,
}

/// One slide entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSlide")]
pub struct SlideSpec {
    pub title: Option<String>,
    /// Speaker notes
    pub note: Option<String>,
    pub layout: Option<LayoutRef>,
    /// Picture placeholder idx to image file
    pub placeholder_images: BTreeMap<u32, PathBuf>,
    pub body: SlideBody,
}

impl SlideSpec {
    pub fn new(body: SlideBody) -> Self {
        Self {
            title: None,
            note: None,
            layout: None,
            placeholder_images: BTreeMap::new(),
            body,
        }
    }

    /// Bulleted content slide.
    pub fn content<S: Into<String>>(title: impl Into<String>, bullets: impl IntoIterator<Item = S>) -> Self {
        Self::new(SlideBody::Content {
            bullets: bullets.into_iter().map(Into::into).collect(),
            image: None,
        })
        .with_title(title)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_layout(mut self, layout: LayoutRef) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_placeholder_image(mut self, idx: u32, path: impl Into<PathBuf>) -> Self {
        self.placeholder_images.insert(idx, path.into());
        self
    }

    pub fn slide_type(&self) -> SlideType {
        match self.body {
            SlideBody::Title { .. } => SlideType::Title,
            SlideBody::Section { .. } => SlideType::Section,
            SlideBody::Content { .. } => SlideType::Content,
            SlideBody::Table { .. } => SlideType::Table,
            SlideBody::Chart { .. } => SlideType::Chart,
            SlideBody::Image { .. } => SlideType::Image,
            SlideBody::Blank => SlideType::Blank,
        }
    }
}

/// Every field any slide type accepts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSlide {
    #[serde(rename = "type")]
    slide_type: SlideType,
    title: Option<String>,
    subtitle: Option<String>,
    note: Option<String>,
    layout: Option<LayoutRef>,
    #[serde(deserialize_with = "deserialize_slot_map")]
    placeholder_images: BTreeMap<u32, PathBuf>,
    bullets: Option<Vec<CellValue>>,
    image: Option<PathBuf>,
    path: Option<PathBuf>,
    image_left: Option<f64>,
    image_top: Option<f64>,
    image_width: Option<f64>,
    image_height: Option<f64>,
    left: Option<f64>,
    top: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    headers: Option<Vec<CellValue>>,
    data: Option<Vec<Vec<CellValue>>>,
    chart_type: Option<ChartKind>,
    categories: Option<Vec<CellValue>>,
    #[serde(deserialize_with = "deserialize_series")]
    series: Vec<(String, Vec<f64>)>,
}

impl TryFrom<RawSlide> for SlideSpec {
    type Error = String;

    fn try_from(raw: RawSlide) -> std::result::Result<Self, Self::Error> {
        let body = match raw.slide_type {
            SlideType::Title => SlideBody::Title {
                subtitle: raw.subtitle,
            },
            SlideType::Section => SlideBody::Section {
                subtitle: raw.subtitle,
            },
            SlideType::Content => SlideBody::Content {
                bullets: stringify(raw.bullets.unwrap_or_default()),
                image: match raw.image {
                    Some(path) => Some(PlacedImage {
                        path,
                        left: raw.image_left,
                        top: raw.image_top,
                        width: positive_size("image_width", raw.image_width)?,
                        height: positive_size("image_height", raw.image_height)?,
                    }),
                    None => None,
                },
            },
            SlideType::Table => {
                let headers = raw
                    .headers
                    .filter(|h| !h.is_empty())
                    .map(stringify)
                    .ok_or("table slide requires non-empty 'headers'")?;
                let rows = raw
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(|row| row.iter().map(ToString::to_string).collect())
                    .collect();
                SlideBody::Table { headers, rows }
            },
            SlideType::Chart => {
                let categories = raw
                    .categories
                    .map(stringify)
                    .ok_or("chart slide requires 'categories'")?;
                if raw.series.is_empty() {
                    return Err("chart slide requires at least one entry in 'series'".into());
                }
                SlideBody::Chart {
                    kind: raw.chart_type.unwrap_or_default(),
                    categories,
                    series: raw.series,
                }
            },
            SlideType::Image => {
                let path = raw
                    .image
                    .or(raw.path)
                    .ok_or("image slide requires 'image' (or 'path')")?;
                SlideBody::Image {
                    image: PlacedImage {
                        path,
                        left: raw.left,
                        top: raw.top,
                        width: positive_size("width", raw.width)?,
                        height: positive_size("height", raw.height)?,
                    },
                }
            },
            SlideType::Blank => SlideBody::Blank,
        };

        Ok(Self {
            title: raw.title,
            note: raw.note,
            layout: raw.layout,
            placeholder_images: raw.placeholder_images,
            body,
        })
    }
}

/// Header, category and bullet scalars are kept as their text.
fn stringify(values: Vec<CellValue>) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Picture sizes are inches and must be positive.
fn positive_size(field: &str, value: Option<f64>) -> std::result::Result<Option<f64>, String> {
    match value {
        Some(size) if !(size.is_finite() && size > 0.0) => {
            Err(format!("'{}' must be a positive size, got {}", field, size))
        },
        other => Ok(other),
    }
}

/// Placeholder idx keys arrive as integers (YAML) or strings (JSON objects).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
enum SlotKey {
    Index(u32),
    Text(String),
}

fn deserialize_slot_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<u32, PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<SlotKey, PathBuf>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, path)| match key {
            SlotKey::Index(idx) => Ok((idx, path)),
            SlotKey::Text(text) => text
                .trim()
                .parse::<u32>()
                .map(|idx| (idx, path))
                .map_err(|_| de::Error::custom(format!("placeholder idx '{}' is not an integer", text))),
        })
        .collect()
}

/// Series keep the order they are declared in.
fn deserialize_series<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, Vec<f64>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SeriesVisitor;

    impl<'de> Visitor<'de> for SeriesVisitor {
        type Value = Vec<(String, Vec<f64>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of series name to numeric values")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut series = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, values)) = map.next_entry::<String, Vec<f64>>()? {
                series.push((name, values));
            }
            Ok(series)
        }
    }

    deserializer.deserialize_any(SeriesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_spec() {
        let spec = PresentationSpec::from_yaml_str(
            r#"
title: Q1
subtitle: Review
slides:
  - title: Points
    bullets: [a, b]
    note: speak
  - type: table
    title: Data
    headers: [Name, Value]
    data:
      - [Item A, 100]
      - [Item B, 2.5]
  - type: chart
    chart_type: line
    categories: [Q1, Q2]
    series:
      Zeta: [1, 2]
      Alpha: [3, 4]
  - type: image
    path: logo.png
    width: 3
    layout: 5
    placeholder_images:
      10: pic.png
"#,
        )
        .unwrap();

        assert_eq!(spec.slide_count(), 5);
        let title = spec.title_slide().unwrap();
        assert_eq!(title.title.as_deref(), Some("Q1"));
        assert_eq!(
            title.body,
            SlideBody::Title {
                subtitle: Some("Review".into())
            }
        );

        let content = &spec.slides[0];
        assert_eq!(content.slide_type(), SlideType::Content);
        assert_eq!(content.note.as_deref(), Some("speak"));

        let SlideBody::Table { ref rows, .. } = spec.slides[1].body else {
            panic!("expected table");
        };
        assert_eq!(rows[0], vec!["Item A", "100"]);
        assert_eq!(rows[1], vec!["Item B", "2.5"]);

        let SlideBody::Chart {
            kind, ref series, ..
        } = spec.slides[2].body
        else {
            panic!("expected chart");
        };
        assert_eq!(kind, ChartKind::Line);
        let names: Vec<&str> = series.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);

        let image = &spec.slides[3];
        assert_eq!(image.layout, Some(LayoutRef::Index(5)));
        assert_eq!(image.placeholder_images.get(&10), Some(&PathBuf::from("pic.png")));
        let SlideBody::Image { ref image } = image.body else {
            panic!("expected image");
        };
        assert_eq!(image.path, PathBuf::from("logo.png"));
        assert_eq!(image.width, Some(3.0));
    }

    #[test]
    fn test_json_spec_with_string_slot_keys() {
        let spec = PresentationSpec::from_json_str(
            r#"{"slides": [{"type": "blank", "layout": "Blank", "placeholder_images": {"13": "a.png"}}]}"#,
        )
        .unwrap();
        let slide = &spec.slides[0];
        assert_eq!(slide.body, SlideBody::Blank);
        assert_eq!(slide.layout, Some(LayoutRef::Name("Blank".into())));
        assert!(slide.placeholder_images.contains_key(&13));
        assert!(spec.title_slide().is_none());
    }

    #[test]
    fn test_invalid_shapes() {
        let cases = [
            r#"{"slides": [{"type": "table", "headers": []}]}"#,
            r#"{"slides": [{"type": "chart", "series": {"a": [1]}}]}"#,
            r#"{"slides": [{"type": "image"}]}"#,
            r#"{"slides": [{"type": "video"}]}"#,
            r#"{"slides": [{"placeholder_images": {"x": "a.png"}}]}"#,
            r#"{"title": "no slides"}"#,
        ];
        for case in cases {
            assert!(
                matches!(PresentationSpec::from_json_str(case), Err(DeckError::InvalidSpecShape(_))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_cell_value_display() {
        let row: Vec<CellValue> = serde_json::from_str(r#"[1, 2.5, true, null, "x"]"#).unwrap();
        let text: Vec<String> = row.iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["1", "2.5", "true", "", "x"]);
    }

    #[test]
    fn test_json_numeric_labels_are_stringified() {
        let spec = PresentationSpec::from_json_str(
            r#"{"slides": [
                {"type": "table", "headers": [2023, 2024], "data": [[1, 2]]},
                {"type": "chart", "categories": [2021, 2022.5], "series": {"Rev": [1, 2]}},
                {"bullets": ["one", 2, true]}
            ]}"#,
        )
        .unwrap();

        let SlideBody::Table { ref headers, .. } = spec.slides[0].body else {
            panic!("expected table");
        };
        assert_eq!(headers, &vec!["2023", "2024"]);
        let SlideBody::Chart { ref categories, .. } = spec.slides[1].body else {
            panic!("expected chart");
        };
        assert_eq!(categories, &vec!["2021", "2022.5"]);
        let SlideBody::Content { ref bullets, .. } = spec.slides[2].body else {
            panic!("expected content");
        };
        assert_eq!(bullets, &vec!["one", "2", "true"]);

        let yaml = PresentationSpec::from_yaml_str("slides:\n  - type: table\n    headers: [2023, 2024]\n").unwrap();
        assert_eq!(
            yaml.slides[0].body,
            SlideBody::Table {
                headers: vec!["2023".into(), "2024".into()],
                rows: vec![],
            }
        );
    }

    #[test]
    fn test_non_positive_picture_sizes_rejected() {
        let cases = [
            r#"{"slides": [{"type": "image", "image": "a.png", "width": -2}]}"#,
            r#"{"slides": [{"type": "image", "image": "a.png", "height": 0}]}"#,
            r#"{"slides": [{"bullets": ["x"], "image": "a.png", "image_width": -1.5}]}"#,
        ];
        for case in cases {
            assert!(
                matches!(PresentationSpec::from_json_str(case), Err(DeckError::InvalidSpecShape(_))),
                "{}",
                case
            );
        }
        let spec =
            PresentationSpec::from_json_str(r#"{"slides": [{"type": "image", "image": "a.png", "left": -1, "width": 2}]}"#)
                .unwrap();
        let SlideBody::Image { ref image } = spec.slides[0].body else {
            panic!("expected image");
        };
        assert_eq!((image.left, image.width), (Some(-1.0), Some(2.0)));
    }
}
