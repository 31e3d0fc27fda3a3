/// Package implementation for PowerPoint presentations.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as CT, relationship_type as RT};
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, Part, XmlPart};
use crate::ooxml::pptx::parts::presentation::{
    PresentationPart, SlideId, next_slide_id, with_notes_master, with_slide_ids,
};
use crate::ooxml::pptx::parts::slide::{
    ShapeInfo, SlideLayoutPart, SlideMasterPart, SlidePart, scan_shapes,
};
use crate::ooxml::pptx::shapes::{PlaceholderKind, PlaceholderSlot};
use crate::ooxml::pptx::template;
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use crate::ooxml::pptx::writer::{ImageData, MutableSlide};
use chrono::{DateTime, Utc};
use memchr::memmem;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// Slide size used when a presentation does not declare one (16:9).
pub const DEFAULT_SLIDE_SIZE: (i64, i64) = (12_192_000, 6_858_000);

const MEDIA_PREFIX: &str = "/ppt/media/";

/// One layout of the document, in master order.
#[derive(Debug, Clone)]
pub struct LayoutEntry {
    pub partname: PackURI,
    pub name: String,
    pub placeholders: Vec<PlaceholderSlot>,
}

/// Read-back summary of an existing slide.
#[derive(Debug, Clone)]
pub struct SlideEntry {
    pub partname: PackURI,
    pub layout_name: String,
    pub shapes: Vec<ShapeInfo>,
    /// Speaker notes text, paragraphs joined by `\n`
    pub notes: Option<String>,
}

/// A PowerPoint (.pptx) package.
///
/// This is the main entry point for working with PowerPoint presentations.
/// It wraps an OPC package and provides PowerPoint-specific reading and
/// mutation: layout enumeration, slide removal and slide insertion.
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
    pres_partname: PackURI,
    /// SHA-256 hex digest of every media part, for deduplication
    media_index: HashMap<String, PackURI>,
}

impl Package {
    /// Open a .pptx (or .pptm/.potx) package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Load a package from bytes in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    /// Create the built-in blank presentation.
    pub fn new_default() -> Result<Self> {
        Self::from_opc(template::default_package()?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        // Verify it's a PowerPoint presentation by checking the main part's content type
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        if content_type != CT::PML_PRESENTATION_MAIN
            && content_type != CT::PML_PRES_MACRO_MAIN
            && content_type != CT::PML_TEMPLATE_MAIN
        {
            return Err(OoxmlError::InvalidContentType {
                expected: format!(
                    "{}, {} or {}",
                    CT::PML_PRESENTATION_MAIN,
                    CT::PML_PRES_MACRO_MAIN,
                    CT::PML_TEMPLATE_MAIN
                ),
                got: content_type.to_string(),
            });
        }
        let pres_partname = main_part.partname().clone();

        let media_index = opc
            .iter_parts()
            .filter(|part| part.partname().as_str().starts_with(MEDIA_PREFIX))
            .map(|part| (content_digest(part.blob()), part.partname().clone()))
            .collect();

        Ok(Self {
            opc,
            pres_partname,
            media_index,
        })
    }

    /// Get the underlying OPC package.
    #[inline]
    pub fn opc(&self) -> &OpcPackage {
        &self.opc
    }

    #[inline]
    pub fn opc_mut(&mut self) -> &mut OpcPackage {
        &mut self.opc
    }

    fn presentation_part(&self) -> Result<&dyn Part> {
        Ok(self.opc.get_part(&self.pres_partname)?)
    }

    /// Slide dimensions `(cx, cy)` in EMUs.
    pub fn slide_size(&self) -> Result<(i64, i64)> {
        Ok(PresentationPart::from_part(self.presentation_part()?)
            .slide_size()?
            .unwrap_or(DEFAULT_SLIDE_SIZE))
    }

    /// Every layout of every slide master, masters in `sldMasterIdLst` order
    /// and layouts in each master's `sldLayoutIdLst` order.
    ///
    /// Layout placeholders that inherit their position from the master get
    /// the master's geometry filled in.
    pub fn slide_layouts(&self) -> Result<Vec<LayoutEntry>> {
        let pres = self.presentation_part()?;
        let mut layouts = Vec::new();

        for master_rid in PresentationPart::from_part(pres).slide_master_rids()? {
            let master_uri = pres.related_partname(&master_rid)?;
            let master_part = self.opc.get_part(&master_uri)?;
            let master = SlideMasterPart::from_part(master_part);
            let master_shapes = master.placeholders()?;

            for layout_rid in master.slide_layout_rids()? {
                let layout_uri = master_part.related_partname(&layout_rid)?;
                let Ok(layout_part) = self.opc.get_part(&layout_uri) else {
                    log::debug!("layout {} listed by {} is missing", layout_uri, master_uri);
                    continue;
                };
                let layout = SlideLayoutPart::from_part(layout_part);
                let mut placeholders = layout.placeholders()?;
                for slot in placeholders.iter_mut().filter(|s| s.geometry.is_none()) {
                    slot.geometry = inherited_geometry(slot.kind, &master_shapes);
                }
                layouts.push(LayoutEntry {
                    partname: layout_uri,
                    name: layout.name()?,
                    placeholders,
                });
            }
        }

        Ok(layouts)
    }

    fn slide_ids(&self) -> Result<Vec<SlideId>> {
        PresentationPart::from_part(self.presentation_part()?).slide_ids()
    }

    /// Partnames of the slides in presentation order.
    pub fn slide_partnames(&self) -> Result<Vec<PackURI>> {
        let pres = self.presentation_part()?;
        self.slide_ids()?
            .iter()
            .map(|slide| Ok(pres.related_partname(&slide.r_id)?))
            .collect()
    }

    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.slide_ids()?.len())
    }

    /// Summaries of every slide in presentation order.
    pub fn slides(&self) -> Result<Vec<SlideEntry>> {
        let mut layout_names: HashMap<PackURI, String> = HashMap::new();
        let mut entries = Vec::new();

        for partname in self.slide_partnames()? {
            let slide = SlidePart::from_part(self.opc.get_part(&partname)?);

            let layout_name = match slide.layout_partname() {
                Ok(layout_uri) => match layout_names.get(&layout_uri) {
                    Some(name) => name.clone(),
                    None => {
                        let name = SlideLayoutPart::from_part(self.opc.get_part(&layout_uri)?).name()?;
                        layout_names.insert(layout_uri, name.clone());
                        name
                    },
                },
                Err(_) => String::new(),
            };

            let notes = match slide.notes_partname() {
                Some(notes_uri) if self.opc.contains_part(&notes_uri) => {
                    let shapes = scan_shapes(
                        self.opc.get_part(&notes_uri)?.blob(),
                    )?;
                    shapes
                        .into_iter()
                        .find(|s| s.placeholder_kind() == Some(PlaceholderKind::Body))
                        .map(|s| s.paragraphs.join("\n"))
                },
                _ => None,
            };

            entries.push(SlideEntry {
                shapes: slide.shapes()?,
                partname,
                layout_name,
                notes,
            });
        }

        Ok(entries)
    }

    fn write_slide_ids(&mut self, ids: &[SlideId]) -> Result<()> {
        let pres = self.opc.get_part_mut(&self.pres_partname)?;
        let xml = with_slide_ids(pres.blob(), ids)?;
        pres.set_blob(xml);
        Ok(())
    }

    /// Remove the slide at `index` (0-based) together with every part only
    /// it referenced.
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        let mut ids = self.slide_ids()?;
        if index >= ids.len() {
            return Err(OoxmlError::PartNotFound(format!(
                "slide {} of {}",
                index,
                ids.len()
            )));
        }
        let removed = ids.remove(index);
        self.opc
            .get_part_mut(&self.pres_partname)?
            .rels_mut()
            .remove(&removed.r_id);
        self.write_slide_ids(&ids)?;
        let pruned = self.opc.drop_unreachable();
        log::debug!("removed slide {} and {} orphaned parts", index, pruned);
        Ok(())
    }

    /// Remove every slide.
    pub fn clear_slides(&mut self) -> Result<usize> {
        let ids = self.slide_ids()?;
        let pres = self.opc.get_part_mut(&self.pres_partname)?;
        for slide in &ids {
            pres.rels_mut().remove(&slide.r_id);
        }
        self.write_slide_ids(&[])?;
        let pruned = self.opc.drop_unreachable();
        log::debug!("cleared {} slides, {} parts pruned", ids.len(), pruned);
        Ok(ids.len())
    }

    /// Re-type a template (`.potx`) or macro-enabled (`.pptm`) main part as a
    /// plain presentation. Macro projects are unlinked and pruned. Returns
    /// `true` if the main part was changed.
    pub fn convert_to_presentation(&mut self) -> Result<bool> {
        let main = self.opc.get_part_mut(&self.pres_partname)?;
        if main.content_type() == CT::PML_PRESENTATION_MAIN {
            return Ok(false);
        }
        log::debug!("converting {} to a presentation", main.content_type());
        main.set_content_type(CT::PML_PRESENTATION_MAIN);

        let vba: Vec<String> = main
            .rels()
            .all_with_reltype(RT::VBA_PROJECT)
            .iter()
            .map(|rel| rel.r_id().to_string())
            .collect();
        for r_id in &vba {
            main.rels_mut().remove(r_id);
        }
        if !vba.is_empty() {
            let pruned = self.opc.drop_unreachable();
            log::debug!("dropped macro project ({} parts)", pruned);
        }
        Ok(true)
    }

    /// Store an image as a media part, reusing an identical existing one.
    fn add_media(&mut self, image: &ImageData) -> Result<PackURI> {
        let digest = content_digest(&image.bytes);
        if let Some(existing) = self.media_index.get(&digest)
            && self.opc.contains_part(existing)
        {
            return Ok(existing.clone());
        }
        let partname = self
            .opc
            .next_partname(&format!("{}image%d.{}", MEDIA_PREFIX, image.format.extension()))?;
        self.opc.add_part(Box::new(BlobPart::new(
            partname.clone(),
            image.format.mime_type(),
            image.bytes.clone(),
        )));
        self.media_index.insert(digest, partname.clone());
        Ok(partname)
    }

    /// Partname of the notes master, creating one (with its own theme) when
    /// the presentation has none.
    fn ensure_notes_master(&mut self) -> Result<PackURI> {
        let pres = self.presentation_part()?;
        if let Some(r_id) = PresentationPart::from_part(pres).notes_master_rid()? {
            let partname = pres.related_partname(&r_id)?;
            if self.opc.contains_part(&partname) {
                return Ok(partname);
            }
        }

        let master_uri = self.opc.next_partname("/ppt/notesMasters/notesMaster%d.xml")?;
        let theme_uri = self.opc.next_partname("/ppt/theme/theme%d.xml")?;
        let mut master = XmlPart::new(
            master_uri.clone(),
            CT::PML_NOTES_MASTER,
            template::default_notes_master_xml().as_bytes().to_vec(),
        );
        master.relate_to(&theme_uri, RT::THEME);
        self.opc.add_part(Box::new(XmlPart::new(
            theme_uri,
            CT::OFC_THEME,
            template::default_theme_xml().as_bytes().to_vec(),
        )));
        self.opc.add_part(Box::new(master));

        let pres = self.opc.get_part_mut(&self.pres_partname)?;
        let r_id = pres.relate_to(&master_uri, RT::NOTES_MASTER);
        let xml = with_notes_master(pres.blob(), &r_id)?;
        pres.set_blob(xml);
        log::debug!("created notes master {}", master_uri);
        Ok(master_uri)
    }

    /// Append a slide at the end of the presentation.
    pub fn add_slide(&mut self, slide: &MutableSlide) -> Result<PackURI> {
        if !self.opc.contains_part(slide.layout()) {
            return Err(OoxmlError::PartNotFound(slide.layout().to_string()));
        }

        let slide_uri = self.opc.next_partname("/ppt/slides/slide%d.xml")?;
        let mut part = XmlPart::new(slide_uri.clone(), CT::PML_SLIDE, Vec::new());
        part.relate_to(slide.layout(), RT::SLIDE_LAYOUT);

        let mut mapper = RelationshipMapper::new();
        for (i, image) in slide.images().into_iter().enumerate() {
            let media_uri = self.add_media(image)?;
            mapper.add_image(i, part.relate_to(&media_uri, RT::IMAGE));
        }
        for (i, chart) in slide.charts().into_iter().enumerate() {
            let chart_uri = self.opc.next_partname("/ppt/charts/chart%d.xml")?;
            self.opc.add_part(Box::new(XmlPart::new(
                chart_uri.clone(),
                CT::DML_CHART,
                chart.to_xml()?,
            )));
            mapper.add_chart(i, part.relate_to(&chart_uri, RT::CHART));
        }
        part.set_blob(slide.to_xml(&mapper)?.into_bytes());

        if let Some(notes_xml) = slide.generate_notes_xml() {
            let notes_xml = notes_xml?;
            let master_uri = self.ensure_notes_master()?;
            let notes_uri = self.opc.next_partname("/ppt/notesSlides/notesSlide%d.xml")?;
            let mut notes_part =
                XmlPart::new(notes_uri.clone(), CT::PML_NOTES_SLIDE, notes_xml.into_bytes());
            notes_part.relate_to(&master_uri, RT::NOTES_MASTER);
            notes_part.relate_to(&slide_uri, RT::SLIDE);
            part.relate_to(&notes_uri, RT::NOTES_SLIDE);
            self.opc.add_part(Box::new(notes_part));
        }
        self.opc.add_part(Box::new(part));

        let mut ids = self.slide_ids()?;
        let r_id = self
            .opc
            .get_part_mut(&self.pres_partname)?
            .relate_to(&slide_uri, RT::SLIDE);
        ids.push(SlideId {
            id: next_slide_id(&ids),
            r_id,
        });
        self.write_slide_ids(&ids)?;

        Ok(slide_uri)
    }

    /// Update `docProps/core.xml` with a title and modification time. Does
    /// nothing when the package has no core properties part.
    pub fn set_core_properties(&mut self, title: Option<&str>, modified: DateTime<Utc>) -> Result<()> {
        let Ok(rel) = self.opc.rels().part_with_reltype(RT::CORE_PROPERTIES) else {
            return Ok(());
        };
        let partname = rel.target_partname()?;
        let Ok(part) = self.opc.get_part_mut(&partname) else {
            return Ok(());
        };

        let mut xml = part.blob().to_vec();
        if let Some(title) = title {
            let escaped = escape_xml(title);
            xml = match replace_element_text(&xml, "dc:title", &escaped) {
                Some(updated) => updated,
                None => insert_before(&xml, "</cp:coreProperties>", &format!("<dc:title>{}</dc:title>", escaped))
                    .unwrap_or(xml),
            };
        }
        let stamp = modified.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        if let Some(updated) = replace_element_text(&xml, "dcterms:modified", &stamp) {
            xml = updated;
        }
        part.set_blob(xml);
        Ok(())
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.opc.to_bytes()?)
    }

    /// Save the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Ok(self.opc.save(path)?)
    }
}

fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .to_vec()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Geometry a layout placeholder inherits from the master: titles from the
/// master title, chrome from the same chrome type, everything else from the
/// master body.
fn inherited_geometry(
    kind: PlaceholderKind,
    master_shapes: &[ShapeInfo],
) -> Option<crate::ooxml::pptx::format::Geometry> {
    let wanted = |other: PlaceholderKind| {
        if kind.is_title() {
            other.is_title()
        } else if kind.is_chrome() {
            other == kind
        } else {
            other == PlaceholderKind::Body
        }
    };
    master_shapes
        .iter()
        .find(|s| s.placeholder_kind().is_some_and(wanted))
        .and_then(|s| s.geometry)
}

/// Replace the text content of the first `<tag ...>...</tag>` element.
/// A self-closing element is expanded.
fn replace_element_text(xml: &[u8], tag: &str, text: &str) -> Option<Vec<u8>> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let start = memmem::find_iter(xml, open.as_bytes()).find(|&pos| {
        matches!(xml.get(pos + open.len()), Some(b'>' | b' ' | b'/' | b'\t' | b'\n' | b'\r'))
    })?;
    let gt = start + memchr::memchr(b'>', &xml[start..])?;

    let mut out = Vec::with_capacity(xml.len() + text.len());
    if xml[gt - 1] == b'/' {
        out.extend_from_slice(&xml[..gt - 1]);
        out.push(b'>');
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(close.as_bytes());
        out.extend_from_slice(&xml[gt + 1..]);
    } else {
        let end = gt + memmem::find(&xml[gt..], close.as_bytes())?;
        out.extend_from_slice(&xml[..=gt]);
        out.extend_from_slice(text.as_bytes());
        out.extend_from_slice(&xml[end..]);
    }
    Some(out)
}

fn insert_before(xml: &[u8], marker: &str, fragment: &str) -> Option<Vec<u8>> {
    let pos = memmem::rfind(xml, marker.as_bytes())?;
    let mut out = Vec::with_capacity(xml.len() + fragment.len());
    out.extend_from_slice(&xml[..pos]);
    out.extend_from_slice(fragment.as_bytes());
    out.extend_from_slice(&xml[pos..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::format::Paragraph;
    use crate::ooxml::pptx::writer::{
        ChartData, ChartKind, ChartSeries, MutableShape, PlaceholderContent,
    };
    use crate::ooxml::pptx::format::Geometry;
    use std::io::Cursor;

    fn png() -> ImageData {
        let mut bytes = Vec::new();
        image::RgbImage::new(4, 3)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageData::from_bytes(bytes).unwrap()
    }

    fn content_slide(pkg: &Package) -> MutableSlide {
        let layouts = pkg.slide_layouts().unwrap();
        let layout = &layouts[1];
        let mut slide = MutableSlide::new(layout.partname.clone(), &layout.placeholders);
        slide.placeholder_mut(PlaceholderKind::is_title).unwrap().content =
            PlaceholderContent::Text(vec![Paragraph::new("Hello")]);
        slide
    }

    #[test]
    fn test_default_layout_catalogue() {
        let pkg = Package::new_default().unwrap();
        let layouts = pkg.slide_layouts().unwrap();
        assert_eq!(layouts.len(), 11);
        assert_eq!(layouts[0].name, "Title Slide");
        assert_eq!(layouts[6].name, "Blank");
        // Inherited from the master body placeholder.
        let content = &layouts[1].placeholders[1];
        assert_eq!(content.kind, PlaceholderKind::Object);
        assert_eq!(content.geometry.unwrap().cx, 10515600);
        assert_eq!(pkg.slide_size().unwrap(), DEFAULT_SLIDE_SIZE);
        assert_eq!(pkg.slide_count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_remove_slides() {
        let mut pkg = Package::new_default().unwrap();
        let slide = content_slide(&pkg);
        let first = pkg.add_slide(&slide).unwrap();
        let second = pkg.add_slide(&slide).unwrap();
        assert_eq!(first.as_str(), "/ppt/slides/slide1.xml");
        assert_eq!(second.as_str(), "/ppt/slides/slide2.xml");
        assert_eq!(pkg.slide_count().unwrap(), 2);

        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        let slides = reopened.slides().unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout_name, "Title and Content");
        assert_eq!(slides[0].shapes[0].paragraphs, vec!["Hello"]);

        pkg.remove_slide(0).unwrap();
        assert_eq!(pkg.slide_partnames().unwrap(), vec![second]);
        assert!(!pkg.opc().contains_part(&first));
        assert!(pkg.remove_slide(5).is_err());
        assert_eq!(pkg.clear_slides().unwrap(), 1);
        assert_eq!(pkg.slide_count().unwrap(), 0);
    }

    #[test]
    fn test_media_is_deduplicated() {
        let mut pkg = Package::new_default().unwrap();
        let mut slide = content_slide(&pkg);
        slide.add_shape(MutableShape::new_picture(png(), Geometry::new(0, 0, 10, 10), "a"));
        slide.add_shape(MutableShape::new_picture(png(), Geometry::new(0, 0, 10, 10), "b"));
        pkg.add_slide(&slide).unwrap();
        pkg.add_slide(&slide).unwrap();
        let media = pkg
            .opc()
            .partnames()
            .filter(|p| p.as_str().starts_with(MEDIA_PREFIX))
            .count();
        assert_eq!(media, 1);
    }

    #[test]
    fn test_chart_and_notes_parts() {
        let mut pkg = Package::new_default().unwrap();
        let mut slide = content_slide(&pkg);
        slide.add_shape(MutableShape::new_chart(
            ChartData {
                kind: ChartKind::Pie,
                categories: vec!["x".into()],
                series: vec![ChartSeries {
                    name: "s".into(),
                    values: vec![1.0],
                }],
            },
            Geometry::new(0, 0, 10, 10),
        ));
        slide.set_notes("remember");
        pkg.add_slide(&slide).unwrap();
        pkg.add_slide(&slide).unwrap();

        let names: Vec<String> = pkg.opc().partnames().map(|p| p.to_string()).collect();
        assert!(names.contains(&"/ppt/charts/chart2.xml".to_string()));
        assert!(names.contains(&"/ppt/notesMasters/notesMaster1.xml".to_string()));
        assert!(names.contains(&"/ppt/notesSlides/notesSlide2.xml".to_string()));
        // Only one notes master even with two annotated slides.
        assert_eq!(names.iter().filter(|n| n.contains("notesMaster")).count(), 1);

        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        let slides = reopened.slides().unwrap();
        assert_eq!(slides[1].notes.as_deref(), Some("remember"));
        assert!(slides[1].shapes.iter().any(|s| s.chart_rid.is_some()));
    }

    #[test]
    fn test_core_properties() {
        let mut pkg = Package::new_default().unwrap();
        let when = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        pkg.set_core_properties(Some("Q1 & Q2"), when).unwrap();
        let core = pkg
            .opc()
            .get_part(&PackURI::new("/docProps/core.xml").unwrap())
            .unwrap();
        let xml = std::str::from_utf8(core.blob()).unwrap();
        assert!(xml.contains("<dc:title>Q1 &amp; Q2</dc:title>"));
        assert!(xml.contains(">2025-03-04T05:06:07Z</dcterms:modified>"));
    }

    #[test]
    fn test_replace_element_text() {
        let xml = br#"<r><dc:titleX>no</dc:titleX><dc:title/></r>"#;
        let out = replace_element_text(xml, "dc:title", "yes").unwrap();
        assert_eq!(out, br#"<r><dc:titleX>no</dc:titleX><dc:title>yes</dc:title></r>"#.to_vec());
    }

    #[test]
    fn test_rejects_non_presentation() {
        let mut opc = OpcPackage::new();
        let uri = PackURI::new("/word/document.xml").unwrap();
        opc.add_part(Box::new(XmlPart::new(
            uri.clone(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            b"<w:document/>".to_vec(),
        )));
        opc.relate_to(&uri, RT::OFFICE_DOCUMENT);
        assert!(matches!(
            Package::from_opc(opc),
            Err(OoxmlError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_convert_template_and_macro_packages() {
        let mut pkg = Package::new_default().unwrap();
        assert!(!pkg.convert_to_presentation().unwrap());

        let pres = pkg.pres_partname.clone();
        pkg.opc_mut()
            .get_part_mut(&pres)
            .unwrap()
            .set_content_type(CT::PML_PRES_MACRO_MAIN);
        let vba = PackURI::new("/ppt/vbaProject.bin").unwrap();
        pkg.opc_mut().add_part(Box::new(BlobPart::new(
            vba.clone(),
            "application/vnd.ms-office.vbaProject",
            vec![0xD0, 0xCF],
        )));
        pkg.opc_mut()
            .get_part_mut(&pres)
            .unwrap()
            .relate_to(&vba, RT::VBA_PROJECT);

        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(
            reopened.opc().main_document_part().unwrap().content_type(),
            CT::PML_PRES_MACRO_MAIN
        );

        assert!(pkg.convert_to_presentation().unwrap());
        assert!(!pkg.opc().contains_part(&vba));
        let reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(
            reopened.opc().main_document_part().unwrap().content_type(),
            CT::PML_PRESENTATION_MAIN
        );
        assert_eq!(reopened.slide_layouts().unwrap().len(), 11);
    }
}
