/// Slide parts and related types.
///
/// This module contains read-side views over slides, slide layouts and slide
/// masters. All three share one shape scanner which walks the top-level
/// children of `<p:spTree>`.
use crate::common::xml::{resolve_entity, unescape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::pkgreader::attr_value;
use crate::ooxml::pptx::format::Geometry;
use crate::ooxml::pptx::shapes::{PlaceholderAttrs, PlaceholderKind, PlaceholderSlot};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

/// Type of a top-level shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `<p:sp>`
    Shape,
    /// `<p:pic>`
    Picture,
    /// `<p:graphicFrame>` (tables, charts)
    GraphicFrame,
    /// `<p:grpSp>`
    Group,
    /// `<p:cxnSp>`
    Connector,
}

impl ShapeKind {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::Group),
            b"cxnSp" => Some(Self::Connector),
            _ => None,
        }
    }
}

/// Everything the scanner learns about one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeInfo {
    pub kind: ShapeKind,
    pub id: u32,
    pub name: String,
    #[serde(skip)]
    pub placeholder: Option<PlaceholderAttrs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    /// Paragraph texts outside tables, `<a:br/>` rendered as `\n`
    pub paragraphs: Vec<String>,
    /// Table cell texts, row by row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Vec<String>>>,
    #[serde(skip)]
    pub chart_rid: Option<String>,
    #[serde(skip)]
    pub image_rid: Option<String>,
}

impl ShapeInfo {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            id: 0,
            name: String::new(),
            placeholder: None,
            geometry: None,
            paragraphs: Vec::new(),
            table: None,
            chart_rid: None,
            image_rid: None,
        }
    }

    /// Semantic placeholder type, if this shape is a placeholder.
    pub fn placeholder_kind(&self) -> Option<PlaceholderKind> {
        self.placeholder.as_ref().map(PlaceholderAttrs::kind)
    }
}

/// Per-shape parse state.
struct ShapeScan {
    info: ShapeInfo,
    /// Element depth at which the shape element was opened
    depth: usize,
    paragraph: Option<String>,
    cell: Option<Vec<String>>,
    in_text: bool,
    seen_off: bool,
    seen_ext: bool,
}

impl ShapeScan {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.local_name().as_ref() {
            b"cNvPr" if self.info.id == 0 && self.info.name.is_empty() => {
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"id" => {
                            self.info.id = atoi_simd::parse::<u32>(&attr.value).unwrap_or(0)
                        },
                        b"name" => self.info.name = attr_value(&attr)?,
                        _ => {},
                    }
                }
            },
            b"ph" if self.info.placeholder.is_none() => {
                let mut ph = PlaceholderAttrs::default();
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"type" => ph.type_code = Some(attr_value(&attr)?),
                        b"idx" => ph.idx = atoi_simd::parse::<u32>(&attr.value).unwrap_or(0),
                        b"orient" => ph.orient = Some(attr_value(&attr)?),
                        b"sz" => ph.size = Some(attr_value(&attr)?),
                        _ => {},
                    }
                }
                self.info.placeholder = Some(ph);
            },
            b"off" if !self.seen_off => {
                let geom = self.info.geometry.get_or_insert_with(Geometry::default);
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"x" => geom.x = atoi_simd::parse::<i64>(&attr.value).unwrap_or(0),
                        b"y" => geom.y = atoi_simd::parse::<i64>(&attr.value).unwrap_or(0),
                        _ => {},
                    }
                }
                self.seen_off = true;
            },
            // `<a:ext uri=..>` inside extension lists carries no cx.
            b"ext" if self.seen_off && !self.seen_ext => {
                let mut cx = None;
                let mut cy = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"cx" => cx = atoi_simd::parse::<i64>(&attr.value).ok(),
                        b"cy" => cy = atoi_simd::parse::<i64>(&attr.value).ok(),
                        _ => {},
                    }
                }
                if let (Some(cx), Some(cy), Some(geom)) = (cx, cy, self.info.geometry.as_mut()) {
                    geom.cx = cx;
                    geom.cy = cy;
                    self.seen_ext = true;
                }
            },
            b"p" => self.paragraph = Some(String::new()),
            b"t" => self.in_text = true,
            b"br" => {
                if let Some(ref mut p) = self.paragraph {
                    p.push('\n');
                }
            },
            b"tbl" => self.info.table = Some(Vec::new()),
            b"tr" => {
                if let Some(ref mut rows) = self.info.table {
                    rows.push(Vec::new());
                }
            },
            b"tc" => self.cell = Some(Vec::new()),
            b"chart" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"id" {
                        self.info.chart_rid = Some(attr_value(&attr)?);
                    }
                }
            },
            b"blip" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"embed" {
                        self.info.image_rid = Some(attr_value(&attr)?);
                    }
                }
            },
            _ => {},
        }
        Ok(())
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"t" => self.in_text = false,
            b"p" => {
                if let Some(text) = self.paragraph.take() {
                    match self.cell {
                        Some(ref mut cell) => cell.push(text),
                        None => self.info.paragraphs.push(text),
                    }
                }
            },
            b"tc" => {
                if let Some(cell) = self.cell.take()
                    && let Some(row) = self.info.table.as_mut().and_then(|rows| rows.last_mut())
                {
                    row.push(cell.join("\n"));
                }
            },
            _ => {},
        }
    }

    fn text(&mut self, s: &str) {
        if self.in_text
            && let Some(ref mut p) = self.paragraph
        {
            p.push_str(s);
        }
    }
}

/// Scan the top-level shapes of a slide, layout or master part.
pub fn scan_shapes(xml: &[u8]) -> Result<Vec<ShapeInfo>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut current: Option<ShapeScan> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let local = e.local_name();
                let local = local.as_ref();
                if let Some(ref mut scan) = current {
                    scan.open(&e)?;
                } else if tree_depth.is_none() && local == b"spTree" {
                    tree_depth = Some(depth);
                } else if tree_depth.map(|d| d + 1) == Some(depth)
                    && let Some(kind) = ShapeKind::from_tag(local)
                {
                    current = Some(ShapeScan {
                        info: ShapeInfo::new(kind),
                        depth,
                        paragraph: None,
                        cell: None,
                        in_text: false,
                        seen_off: false,
                        seen_ext: false,
                    });
                }
                depth += 1;
            },
            Event::Empty(e) => {
                if let Some(ref mut scan) = current {
                    scan.open(&e)?;
                    // Self-closing paragraphs and cells still count.
                    scan.close(e.local_name().as_ref());
                }
            },
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                let finished = match current {
                    Some(ref mut scan) => {
                        scan.close(e.local_name().as_ref());
                        scan.depth == depth
                    },
                    None => {
                        if tree_depth == Some(depth) {
                            break;
                        }
                        false
                    },
                };
                if finished && let Some(scan) = current.take() {
                    shapes.push(scan.info);
                }
            },
            Event::Text(e) => {
                if let Some(ref mut scan) = current {
                    let raw = std::str::from_utf8(e.as_ref())?;
                    scan.text(&unescape_xml(raw));
                }
            },
            Event::CData(e) => {
                if let Some(ref mut scan) = current {
                    scan.text(std::str::from_utf8(e.as_ref())?);
                }
            },
            Event::GeneralRef(e) => {
                if let Some(ref mut scan) = current {
                    let name = std::str::from_utf8(e.as_ref())?;
                    match resolve_entity(name) {
                        Some(c) => scan.text(c.encode_utf8(&mut [0u8; 4])),
                        None => scan.text(&format!("&{name};")),
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    Ok(shapes)
}

/// Value of the `name` attribute of `<p:cSld>`.
fn common_slide_name(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cSld" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"name" {
                        return attr_value(&attr).map_err(OoxmlError::from);
                    }
                }
                return Ok(String::new());
            },
            Event::Eof => return Ok(String::new()),
            _ => {},
        }
        buf.clear();
    }
}

/// A slide part.
///
/// Corresponds to `/ppt/slides/slideN.xml` in the package.
pub struct SlidePart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlidePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    /// All top-level shapes in document order.
    pub fn shapes(&self) -> Result<Vec<ShapeInfo>> {
        scan_shapes(self.part.blob())
    }

    /// Partname of the layout this slide is based on.
    pub fn layout_partname(&self) -> Result<crate::ooxml::opc::PackURI> {
        use crate::ooxml::opc::constants::relationship_type as RT;
        let rel = self.part.rels().part_with_reltype(RT::SLIDE_LAYOUT)?;
        Ok(rel.target_partname()?)
    }

    /// Partname of the notes slide, if the slide has one.
    pub fn notes_partname(&self) -> Option<crate::ooxml::opc::PackURI> {
        use crate::ooxml::opc::constants::relationship_type as RT;
        self.part
            .rels()
            .part_with_reltype(RT::NOTES_SLIDE)
            .ok()
            .and_then(|rel| rel.target_partname().ok())
    }

    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }
}

/// A slide layout part.
///
/// Corresponds to `/ppt/slideLayouts/slideLayoutN.xml` in the package.
pub struct SlideLayoutPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideLayoutPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    /// Layout display name (`<p:cSld name="...">`).
    pub fn name(&self) -> Result<String> {
        common_slide_name(self.part.blob())
    }

    /// Placeholder slots declared by the layout, in document order.
    pub fn placeholders(&self) -> Result<Vec<PlaceholderSlot>> {
        Ok(scan_shapes(self.part.blob())?
            .into_iter()
            .filter_map(|shape| {
                let attrs = shape.placeholder?;
                Some(PlaceholderSlot {
                    idx: attrs.idx,
                    name: shape.name,
                    kind: attrs.kind(),
                    attrs,
                    geometry: shape.geometry,
                })
            })
            .collect())
    }
}

/// A slide master part.
///
/// Corresponds to `/ppt/slideMasters/slideMasterN.xml` in the package.
pub struct SlideMasterPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideMasterPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    /// Relationship ids of the master's layouts in `<p:sldLayoutIdLst>` order.
    pub fn slide_layout_rids(&self) -> Result<Vec<String>> {
        let mut reader = Reader::from_reader(self.part.blob());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut rids = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldLayoutId" => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"r:id" {
                            rids.push(attr_value(&attr)?);
                        }
                    }
                },
                Event::End(e) if e.local_name().as_ref() == b"sldLayoutIdLst" => break,
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(rids)
    }

    /// Placeholders on the master, used to supply geometry that a layout
    /// inherits instead of declaring.
    pub fn placeholders(&self) -> Result<Vec<ShapeInfo>> {
        Ok(scan_shapes(self.part.blob())?
            .into_iter()
            .filter(|s| s.placeholder.is_some())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::packuri::PackURI;
    use crate::ooxml::opc::part::XmlPart;

    const SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld name="Agenda"><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm></p:grpSpPr>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
<p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Q&amp;A {{NAME}}</a:t></a:r><a:br/><a:r><a:t>line two</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm></p:spPr>
<p:txBody><a:bodyPr/><a:p><a:r><a:t>one</a:t></a:r></a:p><a:p/><a:p><a:r><a:t>two</a:t></a:r></a:p></p:txBody></p:sp>
<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Table 3"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
<p:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></p:xfrm>
<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblGrid/>
<a:tr h="1"><a:tc><a:txBody><a:p><a:r><a:t>H1</a:t></a:r></a:p></a:txBody></a:tc><a:tc><a:txBody><a:p><a:r><a:t>H2</a:t></a:r></a:p></a:txBody></a:tc></a:tr>
<a:tr h="1"><a:tc><a:txBody><a:p><a:r><a:t>a</a:t></a:r></a:p></a:txBody></a:tc><a:tc><a:txBody><a:p/></a:txBody></a:tc></a:tr>
</a:tbl></a:graphicData></a:graphic></p:graphicFrame>
<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="5" name="Chart 4"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
<p:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></p:xfrm>
<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="rId3"/></a:graphicData></a:graphic></p:graphicFrame>
<p:pic><p:nvPicPr><p:cNvPr id="6" name="Picture 5"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>
</p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_scan_shapes() {
        let shapes = scan_shapes(SLIDE.as_bytes()).unwrap();
        assert_eq!(shapes.len(), 5);

        assert_eq!(shapes[0].kind, ShapeKind::Shape);
        assert_eq!(shapes[0].id, 2);
        assert_eq!(shapes[0].placeholder_kind(), Some(PlaceholderKind::Title));
        assert_eq!(shapes[0].paragraphs, vec!["Q&A {{NAME}}\nline two".to_string()]);

        assert_eq!(shapes[1].placeholder_kind(), Some(PlaceholderKind::Object));
        assert_eq!(shapes[1].placeholder.as_ref().unwrap().idx, 1);
        assert_eq!(shapes[1].geometry, Some(Geometry::new(100, 200, 300, 400)));
        assert_eq!(shapes[1].paragraphs, vec!["one", "", "two"]);

        let table = shapes[2].table.as_ref().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], vec!["H1", "H2"]);
        assert_eq!(table[1], vec!["a", ""]);
        assert!(shapes[2].paragraphs.is_empty());

        assert_eq!(shapes[3].chart_rid.as_deref(), Some("rId3"));
        assert_eq!(shapes[4].kind, ShapeKind::Picture);
        assert_eq!(shapes[4].image_rid.as_deref(), Some("rId2"));
    }

    #[test]
    fn test_slide_name() {
        assert_eq!(common_slide_name(SLIDE.as_bytes()).unwrap(), "Agenda");
    }

    #[test]
    fn test_layout_placeholders() {
        let part = XmlPart::new(
            PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap(),
            "application/xml",
            SLIDE.as_bytes().to_vec(),
        );
        let layout = SlideLayoutPart::from_part(&part);
        let slots = layout.placeholders().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].kind, PlaceholderKind::Title);
        assert_eq!(slots[1].idx, 1);
        assert_eq!(slots[1].name, "Content 2");
    }

    #[test]
    fn test_master_layout_rids() {
        let xml = r#"<p:sldMaster xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<p:cSld><p:spTree/></p:cSld><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId2"/><p:sldLayoutId id="2147483650" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;
        let part = XmlPart::new(
            PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap(),
            "application/xml",
            xml.as_bytes().to_vec(),
        );
        let master = SlideMasterPart::from_part(&part);
        assert_eq!(master.slide_layout_rids().unwrap(), vec!["rId2", "rId1"]);
    }
}
