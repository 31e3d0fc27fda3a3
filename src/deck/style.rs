//! Styling configuration.
//!
//! [`DeckStyle`] is an immutable value handed to the compiler. Every field
//! has a default, so a style file only needs to name what it changes:
//!
//! ```yaml
//! colors:
//!   primary: "7A1FA2"
//! fonts:
//!   body: 20
//! ```
use crate::common::inches_to_emu;
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::Geometry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Brand colour palette as 6-digit RGB hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub white: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "0066CC".into(),
            secondary: "333333".into(),
            white: "FFFFFF".into(),
        }
    }
}

impl BrandColors {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("white", self.white.as_str()),
        ]
        .into_iter()
    }
}

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: f64,
    pub slide_title: f64,
    pub body: f64,
    pub caption: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 44.0,
            slide_title: 32.0,
            body: 18.0,
            caption: 14.0,
        }
    }
}

/// A rectangle in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(
            inches_to_emu(self.left),
            inches_to_emu(self.top),
            inches_to_emu(self.width),
            inches_to_emu(self.height),
        )
    }
}

/// Default anchor and width of a picture; the height follows the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub row_height: f64,
}

/// Default placement of generated shapes, tuned for 13.333" x 7.5" slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regions {
    /// Title text box used when the layout has no title placeholder
    pub title: Region,
    /// Bullet text box used when the layout has no body placeholder
    pub content: Region,
    pub table: TableRegion,
    pub chart: Region,
    /// Picture next to the bullets of a content slide
    pub content_image: ImageRegion,
    /// Picture of an image slide
    pub image: ImageRegion,
}

impl Default for Regions {
    fn default() -> Self {
        Self {
            title: Region::new(0.5, 0.3, 12.333, 0.8),
            content: Region::new(1.17, 1.8, 11.0, 5.0),
            table: TableRegion {
                left: 1.67,
                top: 2.0,
                width: 10.0,
                row_height: 0.4,
            },
            chart: Region::new(1.67, 2.0, 10.0, 5.0),
            content_image: ImageRegion {
                left: 7.0,
                top: 1.5,
                width: 5.0,
            },
            image: ImageRegion {
                left: 1.17,
                top: 1.8,
                width: 4.0,
            },
        }
    }
}

/// Colours, font sizes and default regions used by the content builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckStyle {
    pub colors: BrandColors,
    pub fonts: FontSizes,
    pub regions: Regions,
}

impl DeckStyle {
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let style: Self =
            serde_saphyr::from_str(input).map_err(|e| DeckError::InvalidSpecShape(format!("style: {}", e)))?;
        style.validate()?;
        Ok(style)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let style: Self =
            serde_json::from_str(input).map_err(|e| DeckError::InvalidSpecShape(format!("style: {}", e)))?;
        style.validate()?;
        Ok(style)
    }

    /// Load a style file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::from_json_str(&input)
        } else {
            Self::from_yaml_str(&input)
        }
    }

    /// Check colours are RGB hex and sizes are positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.colors.iter() {
            if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(DeckError::InvalidSpecShape(format!(
                    "style: colour '{}' must be 6 hex digits, got '{}'",
                    name, value
                )));
            }
        }
        let fonts = &self.fonts;
        for size in [
            fonts.title,
            fonts.slide_title,
            fonts.body,
            fonts.caption,
        ] {
            if !(size.is_finite() && size > 0.0) {
                return Err(DeckError::InvalidSpecShape(format!(
                    "style: font size {} must be positive",
                    size
                )));
            }
        }
        Ok(())
    }
}
