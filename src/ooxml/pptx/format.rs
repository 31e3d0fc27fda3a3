//! Format types shared by the PPTX readers and writers.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Image format types supported by PPTX.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Get the file extension used for media parts of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    /// Detect image format from its magic number.
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            Some(Self::Tiff)
        } else {
            None
        }
    }
}

/// Position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Geometry {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Write an `<a:xfrm>` element (or `<p:xfrm>` for graphic frames).
    pub(crate) fn write_xfrm(&self, xml: &mut String, tag: &str) -> Result<()> {
        write!(
            xml,
            r#"<{tag}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
            self.x, self.y, self.cx, self.cy
        )?;
        Ok(())
    }
}

/// Text formatting properties for runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFormat {
    /// Font family
    pub font: Option<String>,
    /// Font size in points
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// Text color in hex RGB (e.g., "FF0000" for red)
    pub color: Option<String>,
}

impl TextFormat {
    pub fn sized(size: f64) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Write the `<a:rPr>` element for these properties.
    pub(crate) fn write_run_properties(&self, xml: &mut String) -> Result<()> {
        xml.push_str(r#"<a:rPr lang="en-US" dirty="0""#);
        if let Some(size) = self.size {
            write!(xml, r#" sz="{}""#, crate::common::pt_to_centipoints(size))?;
        }
        if let Some(bold) = self.bold {
            xml.push_str(if bold { r#" b="1""# } else { r#" b="0""# });
        }
        if let Some(true) = self.italic {
            xml.push_str(r#" i="1""#);
        }
        if let Some(true) = self.underline {
            xml.push_str(r#" u="sng""#);
        }

        if self.color.is_none() && self.font.is_none() {
            xml.push_str("/>");
            return Ok(());
        }

        xml.push('>');
        if let Some(ref color) = self.color {
            write!(
                xml,
                r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                escape_xml(color)
            )?;
        }
        if let Some(ref font) = self.font {
            write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(font))?;
        }
        xml.push_str("</a:rPr>");
        Ok(())
    }
}

/// One paragraph of a text body: a single run of uniformly formatted text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub format: TextFormat,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Write an `<a:p>` element. Line breaks become `<a:br/>`.
    pub(crate) fn write_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:p>");
        for (i, line) in self.text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<a:br>");
                self.format.write_run_properties(xml)?;
                xml.push_str("</a:br>");
            }
            if line.is_empty() {
                continue;
            }
            xml.push_str("<a:r>");
            self.format.write_run_properties(xml)?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
        }
        xml.push_str("</a:p>");
        Ok(())
    }
}
