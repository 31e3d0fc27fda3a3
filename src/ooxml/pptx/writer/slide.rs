/// Slides under construction.
use crate::ooxml::error::Result;
use crate::ooxml::opc::PackURI;
use crate::ooxml::pptx::shapes::{PlaceholderKind, PlaceholderSlot};

use super::chart::ChartData;
use super::relmap::RelationshipMapper;
use super::shape::{ImageData, MutableShape, Paragraph, PlaceholderShape};

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);

/// A new slide bound to a layout.
///
/// Placeholders are cloned from the layout when the slide is created and can
/// then be filled; free shapes are appended after them in insertion order.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Partname of the layout the slide is based on
    pub(crate) layout: PackURI,
    pub(crate) placeholders: Vec<PlaceholderShape>,
    pub(crate) shapes: Vec<MutableShape>,
    /// Speaker notes for the slide
    pub(crate) notes: Option<String>,
}

impl MutableSlide {
    /// Create a slide carrying a copy of every layout placeholder except the
    /// date, footer, slide number and header chrome.
    pub fn new(layout: PackURI, slots: &[PlaceholderSlot]) -> Self {
        let placeholders = slots
            .iter()
            .filter(|slot| !slot.kind.is_chrome())
            .map(|slot| PlaceholderShape::new(slot.attrs.clone(), slot.name.clone()))
            .collect();
        Self {
            layout,
            placeholders,
            shapes: Vec::new(),
            notes: None,
        }
    }

    pub fn layout(&self) -> &PackURI {
        &self.layout
    }

    /// First placeholder whose kind satisfies `pred`.
    pub fn placeholder_mut<F>(&mut self, pred: F) -> Option<&mut PlaceholderShape>
    where
        F: Fn(PlaceholderKind) -> bool,
    {
        self.placeholders.iter_mut().find(|ph| pred(ph.attrs.kind()))
    }

    /// Placeholder with the given `idx`.
    pub fn placeholder_by_idx_mut(&mut self, idx: u32) -> Option<&mut PlaceholderShape> {
        self.placeholders.iter_mut().find(|ph| ph.attrs.idx == idx)
    }

    pub fn placeholders(&self) -> &[PlaceholderShape] {
        &self.placeholders
    }

    pub fn add_shape(&mut self, shape: MutableShape) {
        self.shapes.push(shape);
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Set speaker notes for the slide.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    /// Get the speaker notes for the slide.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Images in the order [`to_xml`](Self::to_xml) visits them.
    pub(crate) fn images(&self) -> Vec<&ImageData> {
        self.placeholders
            .iter()
            .filter_map(PlaceholderShape::image)
            .chain(self.shapes.iter().filter_map(MutableShape::image))
            .collect()
    }

    /// Charts in the order [`to_xml`](Self::to_xml) visits them.
    pub(crate) fn charts(&self) -> Vec<&ChartData> {
        self.shapes.iter().filter_map(MutableShape::chart).collect()
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    pub(crate) fn to_xml(&self, rel_mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str("<p:sld ");
        xml.push_str(SLIDE_NAMESPACES);
        xml.push('>');
        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");
        write_group_properties(&mut xml);

        // Group shape uses id=1.
        let mut shape_id = 2u32;
        let mut image_counter = 0usize;
        let mut chart_counter = 0usize;

        for placeholder in &self.placeholders {
            let rid = if placeholder.image().is_some() {
                let rid = rel_mapper.get_image_id(image_counter);
                image_counter += 1;
                rid
            } else {
                None
            };
            placeholder.to_xml(&mut xml, shape_id, rid)?;
            shape_id += 1;
        }

        for shape in &self.shapes {
            let rid = if shape.image().is_some() {
                let rid = rel_mapper.get_image_id(image_counter);
                image_counter += 1;
                rid
            } else if shape.chart().is_some() {
                let rid = rel_mapper.get_chart_id(chart_counter);
                chart_counter += 1;
                rid
            } else {
                None
            };
            shape.to_xml(&mut xml, shape_id, rid)?;
            shape_id += 1;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }

    /// Generate notes slide XML content.
    pub(crate) fn generate_notes_xml(&self) -> Option<Result<String>> {
        let notes_text = self.notes.as_ref()?;
        Some(notes_xml(notes_text))
    }
}

fn write_group_properties(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");
}

fn notes_xml(notes_text: &str) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str("<p:notes ");
    xml.push_str(SLIDE_NAMESPACES);
    xml.push('>');
    xml.push_str("<p:cSld>");
    xml.push_str("<p:spTree>");
    write_group_properties(&mut xml);

    // Slide thumbnail
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");
    xml.push_str("</p:sp>");

    // Notes text shape
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="3" name="Notes Placeholder 2"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");
    xml.push_str("<p:txBody>");
    xml.push_str("<a:bodyPr/>");
    xml.push_str("<a:lstStyle/>");
    for line in notes_text.lines() {
        Paragraph::new(line).write_xml(&mut xml)?;
    }
    if notes_text.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
    xml.push_str("</p:notes>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::format::Geometry;
    use crate::ooxml::pptx::parts::slide::scan_shapes;
    use crate::ooxml::pptx::shapes::PlaceholderAttrs;
    use crate::ooxml::pptx::writer::chart::{ChartKind, ChartSeries};
    use crate::ooxml::pptx::writer::shape::PlaceholderContent;

    fn slot(type_code: Option<&str>, idx: u32, name: &str) -> PlaceholderSlot {
        let attrs = PlaceholderAttrs {
            type_code: type_code.map(str::to_string),
            idx,
            ..Default::default()
        };
        PlaceholderSlot {
            idx,
            name: name.to_string(),
            kind: attrs.kind(),
            attrs,
            geometry: None,
        }
    }

    fn layout() -> PackURI {
        PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap()
    }

    #[test]
    fn test_chrome_placeholders_not_cloned() {
        let slots = vec![
            slot(Some("title"), 0, "Title 1"),
            slot(None, 1, "Content Placeholder 2"),
            slot(Some("dt"), 10, "Date Placeholder 3"),
            slot(Some("ftr"), 11, "Footer Placeholder 4"),
            slot(Some("sldNum"), 12, "Slide Number Placeholder 5"),
        ];
        let slide = MutableSlide::new(layout(), &slots);
        assert_eq!(slide.placeholders().len(), 2);
    }

    #[test]
    fn test_slide_xml_order_and_ids() {
        let slots = vec![slot(Some("title"), 0, "Title 1"), slot(None, 1, "Content 2")];
        let mut slide = MutableSlide::new(layout(), &slots);
        slide.placeholder_mut(PlaceholderKind::is_title).unwrap().content =
            PlaceholderContent::Text(vec![Paragraph::new("Heading")]);
        slide.add_shape(MutableShape::new_text_box(
            vec![Paragraph::new("free")],
            Geometry::new(1, 2, 3, 4),
        ));
        slide.add_shape(MutableShape::new_chart(
            ChartData {
                kind: ChartKind::Bar,
                categories: vec!["a".into()],
                series: vec![ChartSeries {
                    name: "s".into(),
                    values: vec![1.0],
                }],
            },
            Geometry::new(1, 2, 3, 4),
        ));
        assert_eq!(slide.charts().len(), 1);
        assert!(slide.images().is_empty());

        let mut mapper = RelationshipMapper::new();
        mapper.add_chart(0, "rId2".into());
        let xml = slide.to_xml(&mapper).unwrap();
        let shapes = scan_shapes(xml.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 4);
        assert_eq!(
            shapes.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![2, 3, 4, 5]
        );
        assert_eq!(shapes[0].paragraphs, vec!["Heading"]);
        assert_eq!(shapes[2].paragraphs, vec!["free"]);
        assert_eq!(shapes[3].chart_rid.as_deref(), Some("rId2"));
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = MutableSlide::new(layout(), &[]);
        assert!(slide.generate_notes_xml().is_none());
        slide.set_notes("Say hi\nthen leave");
        let xml = slide.generate_notes_xml().unwrap().unwrap();
        let shapes = scan_shapes(xml.as_bytes()).unwrap();
        assert_eq!(shapes[1].paragraphs, vec!["Say hi", "then leave"]);
    }
}
