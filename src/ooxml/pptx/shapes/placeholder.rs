//! Placeholder semantics.
//!
//! The `type` attribute of `<p:ph>` is decoded exactly once into
//! [`PlaceholderKind`]; all later matching works on the enum.

use crate::ooxml::pptx::format::Geometry;
use serde::Serialize;
use std::fmt;

/// Semantic type of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// Generic content slot (`obj`, also the default when `type` is absent)
    Object,
    Picture,
    Table,
    Chart,
    Diagram,
    Media,
    ClipArt,
    SlideImage,
    DateTime,
    Footer,
    SlideNumber,
    Header,
}

impl PlaceholderKind {
    /// Decode an `ST_PlaceholderType` value. A missing attribute means `obj`.
    pub fn from_type_code(code: Option<&str>) -> Self {
        match code {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some("pic") => Self::Picture,
            Some("tbl") => Self::Table,
            Some("chart") => Self::Chart,
            Some("dgm") => Self::Diagram,
            Some("media") => Self::Media,
            Some("clipArt") => Self::ClipArt,
            Some("sldImg") => Self::SlideImage,
            Some("dt") => Self::DateTime,
            Some("ftr") => Self::Footer,
            Some("sldNum") => Self::SlideNumber,
            Some("hdr") => Self::Header,
            // Unknown codes from newer schema versions behave like generic content.
            Some(_) => Self::Object,
        }
    }

    /// Title or centered title.
    #[inline]
    pub fn is_title(self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Text-accepting content slot.
    #[inline]
    pub fn is_body(self) -> bool {
        matches!(self, Self::Body | Self::Object)
    }

    /// Date, footer, slide number and header placeholders. These belong to the
    /// master's chrome and are not cloned onto new slides.
    #[inline]
    pub fn is_chrome(self) -> bool {
        matches!(
            self,
            Self::DateTime | Self::Footer | Self::SlideNumber | Self::Header
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "center_title",
            Self::Subtitle => "subtitle",
            Self::Body => "body",
            Self::Object => "object",
            Self::Picture => "picture",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Diagram => "diagram",
            Self::Media => "media",
            Self::ClipArt => "clip_art",
            Self::SlideImage => "slide_image",
            Self::DateTime => "date_time",
            Self::Footer => "footer",
            Self::SlideNumber => "slide_number",
            Self::Header => "header",
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a `<p:ph>` element, kept verbatim so that a slide clone
/// inherits from exactly the same layout placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceholderAttrs {
    pub type_code: Option<String>,
    pub idx: u32,
    pub orient: Option<String>,
    pub size: Option<String>,
}

impl PlaceholderAttrs {
    pub fn kind(&self) -> PlaceholderKind {
        PlaceholderKind::from_type_code(self.type_code.as_deref())
    }

    /// Write the `<p:ph>` element. `idx` 0 is the default and is omitted.
    pub(crate) fn write_xml(&self, xml: &mut String) {
        xml.push_str("<p:ph");
        if let Some(ref code) = self.type_code {
            xml.push_str(&format!(r#" type="{}""#, crate::common::escape_xml(code)));
        }
        if let Some(ref orient) = self.orient {
            xml.push_str(&format!(r#" orient="{}""#, crate::common::escape_xml(orient)));
        }
        if let Some(ref size) = self.size {
            xml.push_str(&format!(r#" sz="{}""#, crate::common::escape_xml(size)));
        }
        if self.idx != 0 {
            xml.push_str(&format!(r#" idx="{}""#, self.idx));
        }
        xml.push_str("/>");
    }
}

/// A placeholder slot defined by a slide layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderSlot {
    /// The placeholder `idx`
    pub idx: u32,
    /// Display name (`cNvPr/@name`)
    pub name: String,
    pub kind: PlaceholderKind,
    #[serde(skip)]
    pub attrs: PlaceholderAttrs,
    /// Geometry when the layout overrides the master's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_code() {
        assert_eq!(PlaceholderKind::from_type_code(None), PlaceholderKind::Object);
        assert_eq!(PlaceholderKind::from_type_code(Some("ctrTitle")), PlaceholderKind::CenterTitle);
        assert_eq!(PlaceholderKind::from_type_code(Some("subTitle")), PlaceholderKind::Subtitle);
        assert_eq!(PlaceholderKind::from_type_code(Some("pic")), PlaceholderKind::Picture);
        assert_eq!(PlaceholderKind::from_type_code(Some("sldNum")), PlaceholderKind::SlideNumber);
        assert_eq!(PlaceholderKind::from_type_code(Some("futureType")), PlaceholderKind::Object);
    }

    #[test]
    fn test_predicates() {
        assert!(PlaceholderKind::CenterTitle.is_title());
        assert!(!PlaceholderKind::Subtitle.is_title());
        assert!(PlaceholderKind::Object.is_body());
        assert!(PlaceholderKind::Body.is_body());
        assert!(!PlaceholderKind::Picture.is_body());
        assert!(PlaceholderKind::Footer.is_chrome());
        assert!(!PlaceholderKind::Title.is_chrome());
    }

    #[test]
    fn test_ph_xml() {
        let attrs = PlaceholderAttrs {
            type_code: Some("body".into()),
            idx: 1,
            orient: None,
            size: Some("half".into()),
        };
        let mut xml = String::new();
        attrs.write_xml(&mut xml);
        assert_eq!(xml, r#"<p:ph type="body" sz="half" idx="1"/>"#);

        let mut xml = String::new();
        PlaceholderAttrs {
            type_code: Some("title".into()),
            ..Default::default()
        }
        .write_xml(&mut xml);
        assert_eq!(xml, r#"<p:ph type="title"/>"#);
    }
}
