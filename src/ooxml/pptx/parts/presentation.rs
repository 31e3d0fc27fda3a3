/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package. Besides reading the
/// id lists, this module rewrites them in place: the rest of the document is
/// copied byte for byte so that template settings survive untouched.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::pkgreader::attr_value;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as FmtWrite;

/// Smallest slide id PowerPoint accepts.
pub const MIN_SLIDE_ID: u32 = 256;

/// Children of `<p:presentation>` that precede `<p:sldIdLst>`.
const SLD_ID_LST_FOLLOWS: &[&str] = &["sldMasterIdLst", "notesMasterIdLst", "handoutMasterIdLst"];

/// Children of `<p:presentation>` that precede `<p:notesMasterIdLst>`.
const NOTES_MASTER_ID_LST_FOLLOWS: &[&str] = &["sldMasterIdLst"];

/// One `<p:sldId>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub r_id: String,
}

/// The main presentation part.
pub struct PresentationPart<'a> {
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Self {
        Self { part }
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Entries of `<p:sldIdLst>` in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideId>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut ids = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                    let mut id = 0;
                    let mut r_id = String::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"id" => id = atoi_simd::parse::<u32>(&attr.value).unwrap_or(0),
                            b"r:id" => r_id = attr_value(&attr)?,
                            _ => {},
                        }
                    }
                    ids.push(SlideId { id, r_id });
                },
                Event::End(e) if e.local_name().as_ref() == b"sldIdLst" => break,
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(ids)
    }

    /// Relationship ids of `<p:sldMasterId>` entries in order.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        self.list_rids(b"sldMasterId")
    }

    /// Relationship id of the notes master, if one is registered.
    pub fn notes_master_rid(&self) -> Result<Option<String>> {
        Ok(self.list_rids(b"notesMasterId")?.into_iter().next())
    }

    fn list_rids(&self, element: &[u8]) -> Result<Vec<String>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut rids = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element => {
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == b"r:id" {
                            rids.push(attr_value(&attr)?);
                        }
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(rids)
    }

    /// Slide dimensions `(cx, cy)` in EMUs from `<p:sldSz>`.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldSz" => {
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
                    return Ok(cx.zip(cy));
                },
                Event::Eof => return Ok(None),
                _ => {},
            }
            buf.clear();
        }
    }
}

/// Next free slide id: one more than the largest in use, never below 256.
pub fn next_slide_id(ids: &[SlideId]) -> u32 {
    ids.iter()
        .map(|s| s.id.saturating_add(1))
        .max()
        .unwrap_or(MIN_SLIDE_ID)
        .max(MIN_SLIDE_ID)
}

/// Rewrite `<p:sldIdLst>` with the given entries. An empty list removes
/// the element.
pub fn with_slide_ids(xml: &[u8], ids: &[SlideId]) -> Result<Vec<u8>> {
    replace_child_list(
        xml,
        "sldIdLst",
        |prefix| {
            if ids.is_empty() {
                return Ok(None);
            }
            let mut out = String::new();
            write!(out, "<{prefix}sldIdLst>")?;
            for slide in ids {
                write!(
                    out,
                    r#"<{prefix}sldId id="{}" r:id="{}"/>"#,
                    slide.id,
                    escape_xml(&slide.r_id)
                )?;
            }
            write!(out, "</{prefix}sldIdLst>")?;
            Ok(Some(out))
        },
        SLD_ID_LST_FOLLOWS,
    )
}

/// Register a notes master in `<p:notesMasterIdLst>`.
pub fn with_notes_master(xml: &[u8], r_id: &str) -> Result<Vec<u8>> {
    replace_child_list(
        xml,
        "notesMasterIdLst",
        |prefix| {
            Ok(Some(format!(
                r#"<{prefix}notesMasterIdLst><{prefix}notesMasterId r:id="{}"/></{prefix}notesMasterIdLst>"#,
                escape_xml(r_id)
            )))
        },
        NOTES_MASTER_ID_LST_FOLLOWS,
    )
}

/// Replace (or insert, or remove) one direct child of the root element.
///
/// `build` receives the namespace prefix including its colon (`"p:"`) and
/// returns the new element, or `None` to drop it. A missing element is
/// inserted after the last present sibling named in `follows`, or first in
/// the root when none of them exist.
fn replace_child_list<F>(xml: &[u8], list_name: &str, build: F, follows: &[&str]) -> Result<Vec<u8>>
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut prefix = String::new();
    let mut root_open_end: Option<usize> = None;
    let mut insert_at: Option<usize> = None;
    let mut found: Option<(usize, usize)> = None;
    let mut list_start: Option<usize> = None;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if depth == 0 {
                    let qname = e.name();
                    if let Some(p) = qname.prefix() {
                        prefix = format!("{}:", std::str::from_utf8(p.as_ref())?);
                    }
                    root_open_end = Some(reader.buffer_position() as usize);
                } else if depth == 1 && name == list_name.as_bytes() {
                    list_start = Some(before);
                }
                depth += 1;
            },
            Event::Empty(e) => {
                if depth == 1 {
                    let name = e.local_name();
                    let after = reader.buffer_position() as usize;
                    if name.as_ref() == list_name.as_bytes() {
                        found = Some((before, after));
                    } else if follows.iter().any(|f| f.as_bytes() == name.as_ref()) {
                        insert_at = Some(after);
                    }
                }
            },
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    let name = e.local_name();
                    let after = reader.buffer_position() as usize;
                    if name.as_ref() == list_name.as_bytes() {
                        if let Some(start) = list_start.take() {
                            found = Some((start, after));
                        }
                    } else if follows.iter().any(|f| f.as_bytes() == name.as_ref()) {
                        insert_at = Some(after);
                    }
                }
                if depth == 0 {
                    break;
                }
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    let replacement = build(&prefix)?.unwrap_or_default();
    let (start, end) = match (found, insert_at, root_open_end) {
        (Some(range), _, _) => range,
        (None, Some(pos), _) | (None, None, Some(pos)) => (pos, pos),
        (None, None, None) => {
            return Err(OoxmlError::InvalidFormat(
                "presentation part has no root element".to_string(),
            ));
        },
    };

    let mut out = Vec::with_capacity(xml.len() + replacement.len());
    out.extend_from_slice(&xml[..start]);
    out.extend_from_slice(replacement.as_bytes());
    out.extend_from_slice(&xml[end..]);
    Ok(out)
}
