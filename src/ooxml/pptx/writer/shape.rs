/// Shape types and XML generation for new slides.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::PlaceholderAttrs;
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

pub use super::super::format::{Geometry, ImageFormat, Paragraph, TextFormat};
use super::chart::ChartData;

/// Decoded picture bytes plus the facts needed to lay them out.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageData {
    /// Identify the format and read the pixel dimensions without decoding
    /// the full raster.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(&bytes).ok_or_else(|| {
            OoxmlError::InvalidFormat("unrecognized image signature".to_string())
        })?;
        let (width_px, height_px) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| OoxmlError::InvalidFormat(e.to_string()))?;
        if width_px == 0 || height_px == 0 {
            return Err(OoxmlError::InvalidFormat("image has no pixels".to_string()));
        }
        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width_px as f64 / self.height_px as f64
    }
}

/// Source rectangle crop in thousandths of a percent (`100000` = 100%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crop {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Crop {
    /// Crop that centers an image inside a frame of size `cx` x `cy`
    /// without distorting it. `None` when no cropping is needed.
    pub fn to_fill(image: &ImageData, cx: i64, cy: i64) -> Option<Self> {
        if cx <= 0 || cy <= 0 {
            return None;
        }
        let frame_ratio = cx as f64 / cy as f64;
        let image_ratio = image.aspect_ratio();
        if (frame_ratio - image_ratio).abs() < 1e-6 {
            return None;
        }
        if image_ratio > frame_ratio {
            let each = ((1.0 - frame_ratio / image_ratio) / 2.0 * 100_000.0).round() as i64;
            Some(Self {
                left: each,
                right: each,
                ..Default::default()
            })
        } else {
            let each = ((1.0 - image_ratio / frame_ratio) / 2.0 * 100_000.0).round() as i64;
            Some(Self {
                top: each,
                bottom: each,
                ..Default::default()
            })
        }
    }
}

/// Content written into a cloned layout placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderContent {
    /// Left for the user to fill in
    Empty,
    Text(Vec<Paragraph>),
    Picture { image: ImageData, crop: Option<Crop> },
}

/// A placeholder copied from the slide's layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderShape {
    pub attrs: PlaceholderAttrs,
    pub name: String,
    pub content: PlaceholderContent,
}

impl PlaceholderShape {
    pub fn new(attrs: PlaceholderAttrs, name: impl Into<String>) -> Self {
        Self {
            attrs,
            name: name.into(),
            content: PlaceholderContent::Empty,
        }
    }

    pub(crate) fn image(&self) -> Option<&ImageData> {
        match self.content {
            PlaceholderContent::Picture { ref image, .. } => Some(image),
            _ => None,
        }
    }

    /// Generate XML for the placeholder. Geometry is inherited from the layout.
    pub(crate) fn to_xml(&self, xml: &mut String, shape_id: u32, rel_id: Option<&str>) -> Result<()> {
        if let PlaceholderContent::Picture { crop, .. } = self.content
            && let Some(rid) = rel_id
        {
            xml.push_str("<p:pic>");
            xml.push_str("<p:nvPicPr>");
            write!(
                xml,
                r#"<p:cNvPr id="{}" name="{}"/>"#,
                shape_id,
                escape_xml(&self.name)
            )?;
            xml.push_str(r#"<p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr>"#);
            xml.push_str("<p:nvPr>");
            self.attrs.write_xml(xml);
            xml.push_str("</p:nvPr>");
            xml.push_str("</p:nvPicPr>");

            xml.push_str("<p:blipFill>");
            write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
            if let Some(crop) = crop {
                write!(
                    xml,
                    r#"<a:srcRect l="{}" t="{}" r="{}" b="{}"/>"#,
                    crop.left, crop.top, crop.right, crop.bottom
                )?;
            }
            xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
            xml.push_str("</p:blipFill>");
            xml.push_str("<p:spPr/>");
            xml.push_str("</p:pic>");
            return Ok(());
        }

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}"/>"#,
            shape_id,
            escape_xml(&self.name)
        )?;
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        xml.push_str("<p:nvPr>");
        self.attrs.write_xml(xml);
        xml.push_str("</p:nvPr>");
        xml.push_str("</p:nvSpPr>");
        xml.push_str("<p:spPr/>");

        xml.push_str("<p:txBody>");
        xml.push_str("<a:bodyPr/>");
        xml.push_str("<a:lstStyle/>");
        match self.content {
            PlaceholderContent::Text(ref paragraphs) if !paragraphs.is_empty() => {
                for paragraph in paragraphs {
                    paragraph.write_xml(xml)?;
                }
            },
            _ => xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#),
        }
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");

        Ok(())
    }
}

/// Fill and run formatting of the header row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeaderStyle {
    pub fill: String,
    pub format: TextFormat,
}

/// A free-floating shape on a slide (text box, image, table, chart).
#[derive(Debug, Clone, PartialEq)]
pub struct MutableShape {
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ShapeType {
    TextBox {
        paragraphs: Vec<Paragraph>,
        geometry: Geometry,
    },
    Picture {
        image: ImageData,
        geometry: Geometry,
        description: String,
    },
    Table {
        rows: Vec<Vec<String>>,
        geometry: Geometry,
        row_height: i64,
        header: TableHeaderStyle,
        body: TextFormat,
    },
    Chart {
        data: ChartData,
        geometry: Geometry,
    },
}

impl MutableShape {
    /// Create a new text box shape holding one paragraph per entry.
    pub fn new_text_box(paragraphs: Vec<Paragraph>, geometry: Geometry) -> Self {
        Self {
            shape_type: ShapeType::TextBox {
                paragraphs,
                geometry,
            },
        }
    }

    /// Create a new picture shape.
    pub fn new_picture(image: ImageData, geometry: Geometry, description: impl Into<String>) -> Self {
        Self {
            shape_type: ShapeType::Picture {
                image,
                geometry,
                description: description.into(),
            },
        }
    }

    /// Create a new table. The first row is the header row.
    pub fn new_table(
        rows: Vec<Vec<String>>,
        geometry: Geometry,
        row_height: i64,
        header: TableHeaderStyle,
        body: TextFormat,
    ) -> Self {
        Self {
            shape_type: ShapeType::Table {
                rows,
                geometry,
                row_height,
                header,
                body,
            },
        }
    }

    /// Create a new chart frame.
    pub fn new_chart(data: ChartData, geometry: Geometry) -> Self {
        Self {
            shape_type: ShapeType::Chart { data, geometry },
        }
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn image(&self) -> Option<&ImageData> {
        match self.shape_type {
            ShapeType::Picture { ref image, .. } => Some(image),
            _ => None,
        }
    }

    /// Get chart data if this shape is a chart.
    pub(crate) fn chart(&self) -> Option<&ChartData> {
        match self.shape_type {
            ShapeType::Chart { ref data, .. } => Some(data),
            _ => None,
        }
    }

    /// Generate XML for this shape. Pictures and charts need the rId of
    /// their target part.
    pub(crate) fn to_xml(&self, xml: &mut String, shape_id: u32, rel_id: Option<&str>) -> Result<()> {
        match self.shape_type {
            ShapeType::TextBox {
                ref paragraphs,
                geometry,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    shape_id,
                    shape_id - 1
                )?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                geometry.write_xfrm(xml, "a:xfrm")?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr>"#);
                xml.push_str("<a:lstStyle/>");
                if paragraphs.is_empty() {
                    xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
                }
                for paragraph in paragraphs {
                    paragraph.write_xml(xml)?;
                }
                xml.push_str("</p:txBody>");
                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                geometry,
                ref description,
                ..
            } => {
                let rid = rel_id.ok_or_else(|| {
                    OoxmlError::Xml(format!("picture shape {} has no image relationship", shape_id))
                })?;
                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    shape_id,
                    shape_id - 1,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                geometry.write_xfrm(xml, "a:xfrm")?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
            ShapeType::Table {
                ref rows,
                geometry,
                row_height,
                ref header,
                ref body,
            } => {
                write_table(xml, shape_id, rows, geometry, row_height, header, body)?;
            },
            ShapeType::Chart { geometry, .. } => {
                let rid = rel_id.ok_or_else(|| {
                    OoxmlError::Xml(format!("chart shape {} has no chart relationship", shape_id))
                })?;
                xml.push_str("<p:graphicFrame>");
                xml.push_str("<p:nvGraphicFramePr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Chart {}"/>"#,
                    shape_id,
                    shape_id - 1
                )?;
                xml.push_str("<p:cNvGraphicFramePr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvGraphicFramePr>");
                geometry.write_xfrm(xml, "p:xfrm")?;
                xml.push_str("<a:graphic>");
                xml.push_str(
                    r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">"#,
                );
                write!(
                    xml,
                    r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{}"/>"#,
                    rid
                )?;
                xml.push_str("</a:graphicData>");
                xml.push_str("</a:graphic>");
                xml.push_str("</p:graphicFrame>");
            },
        }

        Ok(())
    }
}

fn write_table(
    xml: &mut String,
    shape_id: u32,
    rows: &[Vec<String>],
    geometry: Geometry,
    row_height: i64,
    header: &TableHeaderStyle,
    body: &TextFormat,
) -> Result<()> {
    let cols = rows.first().map(Vec::len).unwrap_or(0).max(1);
    let col_width = geometry.cx / cols as i64;
    let frame = Geometry {
        cy: row_height * rows.len() as i64,
        ..geometry
    };

    xml.push_str("<p:graphicFrame>");
    xml.push_str("<p:nvGraphicFramePr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Table {}"/>"#,
        shape_id,
        shape_id - 1
    )?;
    xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGraphicFramePr>");
    frame.write_xfrm(xml, "p:xfrm")?;

    xml.push_str("<a:graphic>");
    xml.push_str(r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">"#);
    xml.push_str("<a:tbl>");
    xml.push_str(r#"<a:tblPr firstRow="1" bandRow="1"/>"#);
    xml.push_str("<a:tblGrid>");
    for _ in 0..cols {
        write!(xml, r#"<a:gridCol w="{}"/>"#, col_width)?;
    }
    xml.push_str("</a:tblGrid>");

    for (r, row) in rows.iter().enumerate() {
        write!(xml, r#"<a:tr h="{}">"#, row_height)?;
        for cell in row {
            let format = if r == 0 { &header.format } else { body };
            xml.push_str("<a:tc>");
            xml.push_str("<a:txBody><a:bodyPr/><a:lstStyle/>");
            Paragraph::new(cell.as_str())
                .with_format(format.clone())
                .write_xml(xml)?;
            xml.push_str("</a:txBody>");
            if r == 0 {
                write!(
                    xml,
                    r#"<a:tcPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:tcPr>"#,
                    escape_xml(&header.fill)
                )?;
            } else {
                xml.push_str("<a:tcPr/>");
            }
            xml.push_str("</a:tc>");
        }
        xml.push_str("</a:tr>");
    }

    xml.push_str("</a:tbl>");
    xml.push_str("</a:graphicData>");
    xml.push_str("</a:graphic>");
    xml.push_str("</p:graphicFrame>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::parts::slide::scan_shapes;

    fn png(width: u32, height: u32) -> ImageData {
        let mut bytes = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageData::from_bytes(bytes).unwrap()
    }

    fn wrap(inner: &str) -> String {
        format!(
            r#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld><p:spTree>{inner}</p:spTree></p:cSld></p:sld>"#
        )
    }

    #[test]
    fn test_image_data_dimensions() {
        let image = png(40, 20);
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!((image.width_px, image.height_px), (40, 20));
        assert!((image.aspect_ratio() - 2.0).abs() < 1e-9);
        assert!(ImageData::from_bytes(b"not an image".to_vec()).is_err());
    }

    #[test]
    fn test_crop_to_fill() {
        let wide = png(40, 20);
        let crop = Crop::to_fill(&wide, 100, 100).unwrap();
        assert_eq!((crop.left, crop.right, crop.top, crop.bottom), (25_000, 25_000, 0, 0));
        let crop = Crop::to_fill(&wide, 100, 400).unwrap();
        assert_eq!(crop.top, 0);
        assert!(crop.left > 0);
        let crop = Crop::to_fill(&wide, 400, 100).unwrap();
        assert_eq!((crop.top, crop.bottom), (25_000, 25_000));
        assert_eq!(Crop::to_fill(&wide, 200, 100), None);
    }

    #[test]
    fn test_table_xml_scans_back() {
        let header = TableHeaderStyle {
            fill: "0066CC".into(),
            format: TextFormat::sized(14.0).with_bold(true).with_color("FFFFFF"),
        };
        let shape = MutableShape::new_table(
            vec![
                vec!["A".into(), "B".into()],
                vec!["1".into(), "2".into()],
                vec!["3".into(), "4".into()],
            ],
            Geometry::new(0, 0, 1000, 0),
            10,
            header,
            TextFormat::sized(12.0),
        );
        let mut xml = String::new();
        shape.to_xml(&mut xml, 3, None).unwrap();
        assert!(xml.contains(r#"<a:gridCol w="500"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="0066CC"/>"#));

        let shapes = scan_shapes(wrap(&xml).as_bytes()).unwrap();
        let table = shapes[0].table.as_ref().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], vec!["A", "B"]);
        assert_eq!(shapes[0].geometry.unwrap().cy, 30);
    }

    #[test]
    fn test_placeholder_xml() {
        let attrs = PlaceholderAttrs {
            type_code: Some("title".into()),
            ..Default::default()
        };
        let mut shape = PlaceholderShape::new(attrs, "Title 1");
        shape.content = PlaceholderContent::Text(vec![Paragraph::new("Hello")]);
        let mut xml = String::new();
        shape.to_xml(&mut xml, 2, None).unwrap();
        let shapes = scan_shapes(wrap(&xml).as_bytes()).unwrap();
        assert_eq!(shapes[0].paragraphs, vec!["Hello"]);
        assert_eq!(shapes[0].name, "Title 1");
    }

    #[test]
    fn test_picture_requires_relationship() {
        let shape = MutableShape::new_picture(png(2, 2), Geometry::default(), "logo");
        let mut xml = String::new();
        assert!(shape.to_xml(&mut xml, 2, None).is_err());
        let mut xml = String::new();
        shape.to_xml(&mut xml, 2, Some("rId2")).unwrap();
        assert!(xml.contains(r#"r:embed="rId2""#));
    }
}
