use crate::common::xml::escape_xml;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
/// Relationships between parts of an OPC package.
///
/// Every part (and the package itself) owns a collection of relationships,
/// serialized as the part's `.rels` item.
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    /// Relative part reference or, for external relationships, a URL
    target_ref: String,
    /// Directory of the source part, for resolving `target_ref`
    base_uri: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute partname of the target. Fails for external relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets external resource {}",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }

    /// Numeric part of an `rIdN` identifier.
    fn number(&self) -> Option<u32> {
        rid_number(&self.r_id)
    }
}

fn rid_number(r_id: &str) -> Option<u32> {
    r_id.strip_prefix("rId")
        .and_then(|digits| atoi_simd::parse::<u32>(digits.as_bytes()).ok())
}

/// Collection of relationships from a single source, keyed by rId.
#[derive(Debug)]
pub struct Relationships {
    base_uri: String,
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Insert a relationship with a known rId, replacing any previous one.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) {
        let rel = Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        );
        self.rels.insert(r_id, rel);
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Return the rId of an internal relationship of `reltype` to `target_ref`,
    /// creating it with the next free rId when none exists.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self.rels.values().find(|rel| {
            !rel.is_external() && rel.reltype() == reltype && rel.target_ref() == target_ref
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id.clone(), false);
        r_id
    }

    /// Lowest unused `rIdN`, filling gaps left by removed relationships.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self.rels.values().filter_map(Relationship::number).collect();
        used.sort_unstable();

        let mut next = 1u32;
        for num in used {
            match num.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }
        format!("rId{}", next)
    }

    /// The single relationship of a type. Errors when there is none or several.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.values().filter(|rel| rel.reltype() == reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// All relationships of a type, in rId order.
    pub fn all_with_reltype(&self, reltype: &str) -> Vec<&Relationship> {
        let mut matching: Vec<&Relationship> =
            self.rels.values().filter(|rel| rel.reltype() == reltype).collect();
        matching.sort_by_key(|rel| (rel.number().unwrap_or(u32::MAX), rel.r_id().to_string()));
        matching
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }

    /// Serialize to a `.rels` item, relationships in rId order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by_key(|rel| (rel.number().unwrap_or(u32::MAX), rel.r_id().to_string()));

        for rel in rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
                if rel.is_external() { r#" TargetMode="External""# } else { "" }
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert_eq!(rels.next_r_id(), "rId1");

        rels.add_relationship("t".into(), "a.xml".into(), "rId1".into(), false);
        rels.add_relationship("t".into(), "c.xml".into(), "rId3".into(), false);
        assert_eq!(rels.next_r_id(), "rId2");

        rels.add_relationship("t".into(), "b.xml".into(), "rId2".into(), false);
        assert_eq!(rels.next_r_id(), "rId4");
    }

    #[test]
    fn test_get_or_add() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        assert_eq!(rels.get_or_add("type1", "target2"), "rId2");
        assert_eq!(rels.get_or_add("type2", "target1"), "rId3");
    }

    #[test]
    fn test_part_with_reltype() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert!(rels.part_with_reltype("slide").is_err());
        rels.get_or_add("slide", "slides/slide1.xml");
        assert_eq!(rels.part_with_reltype("slide").unwrap().r_id(), "rId1");
        rels.get_or_add("slide", "slides/slide2.xml");
        assert!(rels.part_with_reltype("slide").is_err());
        assert_eq!(rels.all_with_reltype("slide").len(), 2);
    }

    #[test]
    fn test_to_xml_orders_numerically() {
        let mut rels = Relationships::new("/ppt".to_string());
        rels.add_relationship("t".into(), "x.xml".into(), "rId10".into(), false);
        rels.add_relationship("t".into(), "http://a?b&c".into(), "rId2".into(), true);

        let xml = rels.to_xml();
        let second = xml.find(r#"Id="rId2""#).unwrap();
        let tenth = xml.find(r#"Id="rId10""#).unwrap();
        assert!(second < tenth);
        assert!(xml.contains(r#"Target="http://a?b&amp;c" TargetMode="External""#));
    }
}
