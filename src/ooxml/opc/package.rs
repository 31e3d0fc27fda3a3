/// In-memory OPC package.
///
/// OpcPackage owns the package-level relationships and every part, indexed
/// by partname. Parts are stored in partname order so that iteration (and
/// therefore serialization) is deterministic.
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartFactory};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use crate::ooxml::opc::pkgreader::PackageReader;
use crate::ooxml::opc::pkgwriter::PackageWriter;
use crate::ooxml::opc::rel::Relationships;
use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Seek};
use std::path::Path;

pub struct OpcPackage {
    rels: Relationships,
    parts: BTreeMap<PackURI, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Open an OPC package file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }

    /// Load an OPC package from bytes in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_bytes(data)?)
    }

    /// Load an OPC package from a seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::new(reader)?)
    }

    fn from_phys_reader<R: Read + Seek>(phys_reader: PhysPkgReader<R>) -> Result<Self> {
        Self::unmarshal(PackageReader::from_phys_reader(phys_reader)?)
    }

    /// Convert serialized parts and relationships into the part graph.
    fn unmarshal(mut pkg_reader: PackageReader) -> Result<Self> {
        let mut package = Self::new();

        for srel in pkg_reader.pkg_srels() {
            package.rels.add_relationship(
                srel.reltype.clone(),
                srel.target_ref.clone(),
                srel.r_id.clone(),
                srel.is_external(),
            );
        }

        for spart in pkg_reader.take_sparts() {
            let mut part = PartFactory::load(spart.partname, spart.content_type, spart.blob)?;
            for srel in spart.srels {
                let is_external = srel.is_external();
                part.rels_mut().add_relationship(
                    srel.reltype,
                    srel.target_ref,
                    srel.r_id,
                    is_external,
                );
            }
            package.add_part(part);
        }

        Ok(package)
    }

    /// Partname of the main document part (`/ppt/presentation.xml` for decks).
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    /// The main document part.
    pub fn main_document_part(&self) -> Result<&dyn Part> {
        let partname = self.main_document_partname()?;
        self.get_part(&partname)
    }

    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname)
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn get_part_mut(&mut self, partname: &PackURI) -> Result<&mut dyn Part> {
        match self.parts.get_mut(partname) {
            Some(part) => Ok(part.as_mut()),
            None => Err(OpcError::PartNotFound(partname.to_string())),
        }
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Box<dyn Part>) {
        self.parts.insert(part.partname().clone(), part);
    }

    /// Iterate parts in partname order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn partnames(&self) -> impl Iterator<Item = &PackURI> {
        self.parts.keys()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or reuse a package-level relationship to a part.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        self.rels
            .get_or_add(reltype, &partname.relative_ref(PACKAGE_URI))
    }

    /// First free partname for a `%d` template, e.g. `/ppt/slides/slide%d.xml`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        let taken: HashSet<u32> = self
            .parts
            .keys()
            .filter(|uri| {
                let candidate = template.replacen("%d", &uri.idx().unwrap_or(0).to_string(), 1);
                candidate == uri.as_str()
            })
            .filter_map(PackURI::idx)
            .collect();

        let n = (1..=taken.len() as u32 + 1)
            .find(|n| !taken.contains(n))
            .unwrap_or(taken.len() as u32 + 1);
        PackURI::new(template.replacen("%d", &n.to_string(), 1)).map_err(OpcError::InvalidPackUri)
    }

    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    /// Drop every part no longer reachable from the package relationships.
    ///
    /// Returns the number of parts removed.
    pub fn drop_unreachable(&mut self) -> usize {
        let mut reachable: HashSet<PackURI> = HashSet::with_capacity(self.parts.len());
        let mut queue: Vec<PackURI> = self
            .rels
            .iter()
            .filter(|rel| !rel.is_external())
            .filter_map(|rel| rel.target_partname().ok())
            .collect();

        while let Some(partname) = queue.pop() {
            if !reachable.insert(partname.clone()) {
                continue;
            }
            if let Some(part) = self.parts.get(&partname) {
                queue.extend(
                    part.rels()
                        .iter()
                        .filter(|rel| !rel.is_external())
                        .filter_map(|rel| rel.target_partname().ok()),
                );
            }
        }

        let before = self.parts.len();
        self.parts.retain(|partname, _| reachable.contains(partname));
        before - self.parts.len()
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    /// Serialize to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, self)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};

    fn xml_part(uri: &str, content_type: &str) -> Box<dyn Part> {
        Box::new(XmlPart::new(PackURI::new(uri).unwrap(), content_type, b"<x/>".to_vec()))
    }

    fn small_package() -> OpcPackage {
        let mut pkg = OpcPackage::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let image = PackURI::new("/ppt/media/image1.png").unwrap();

        let mut pres_part = xml_part(pres.as_str(), ct::PML_PRESENTATION_MAIN);
        pres_part.relate_to(&slide, relationship_type::SLIDE);
        let mut slide_part = xml_part(slide.as_str(), ct::PML_SLIDE);
        slide_part.relate_to(&image, relationship_type::IMAGE);

        pkg.add_part(pres_part);
        pkg.add_part(slide_part);
        pkg.add_part(Box::new(BlobPart::new(image, ct::PNG, vec![1, 2, 3])));
        pkg.relate_to(&pres, relationship_type::OFFICE_DOCUMENT);
        pkg
    }

    #[test]
    fn test_roundtrip_through_zip() {
        let pkg = small_package();
        let bytes = pkg.to_bytes().unwrap();
        let reopened = OpcPackage::from_bytes(bytes).unwrap();

        assert_eq!(reopened.part_count(), 3);
        let main = reopened.main_document_part().unwrap();
        assert_eq!(main.content_type(), ct::PML_PRESENTATION_MAIN);
        let image = reopened
            .get_part(&PackURI::new("/ppt/media/image1.png").unwrap())
            .unwrap();
        assert_eq!(image.blob(), &[1, 2, 3]);
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = small_package();
        assert_eq!(
            pkg.next_partname("/ppt/slides/slide%d.xml").unwrap().as_str(),
            "/ppt/slides/slide2.xml"
        );
        assert_eq!(
            pkg.next_partname("/ppt/charts/chart%d.xml").unwrap().as_str(),
            "/ppt/charts/chart1.xml"
        );

        pkg.add_part(xml_part("/ppt/slides/slide3.xml", ct::PML_SLIDE));
        assert_eq!(
            pkg.next_partname("/ppt/slides/slide%d.xml").unwrap().as_str(),
            "/ppt/slides/slide2.xml"
        );
    }

    #[test]
    fn test_drop_unreachable() {
        let mut pkg = small_package();
        let pres = pkg.main_document_partname().unwrap();
        pkg.get_part_mut(&pres).unwrap().rels_mut().remove("rId1");

        assert_eq!(pkg.drop_unreachable(), 2);
        assert_eq!(pkg.part_count(), 1);
        assert!(pkg.contains_part(&pres));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(OpcPackage::from_bytes(b"PK but not really".to_vec()).is_err());
    }
}
