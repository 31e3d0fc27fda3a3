//! Template catalogue: the layouts a document offers.
use crate::deck::error::{DeckError, Result};
use crate::ooxml::pptx::{Package, PlaceholderKind, PlaceholderSlot};
use crate::ooxml::PackURI;
use serde::Serialize;
use std::path::Path;

/// One slide layout and its placeholder slots.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Position in the catalogue (master order, then layout order)
    pub index: usize,
    pub name: String,
    #[serde(skip)]
    pub partname: PackURI,
    pub placeholders: Vec<PlaceholderSlot>,
}

impl Layout {
    /// Placeholders other than date, footer, slide number and header.
    pub fn content_slots(&self) -> impl Iterator<Item = &PlaceholderSlot> {
        self.placeholders.iter().filter(|slot| !slot.kind.is_chrome())
    }

    pub fn has_title(&self) -> bool {
        self.placeholders.iter().any(|slot| slot.kind.is_title())
    }

    /// Has a body or generic content slot.
    pub fn has_body(&self) -> bool {
        self.placeholders.iter().any(|slot| slot.kind.is_body())
    }

    pub fn slot(&self, idx: u32) -> Option<&PlaceholderSlot> {
        self.placeholders.iter().find(|slot| slot.idx == idx)
    }

    pub fn slot_of_kind(&self, kind: PlaceholderKind) -> Option<&PlaceholderSlot> {
        self.placeholders.iter().find(|slot| slot.kind == kind)
    }
}

/// Read-only view of a document's layouts, rebuilt on every compile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateCatalogue {
    layouts: Vec<Layout>,
}

impl TemplateCatalogue {
    pub fn from_package(package: &Package) -> Result<Self> {
        let layouts: Vec<Layout> = package
            .slide_layouts()?
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Layout {
                index,
                name: entry.name,
                partname: entry.partname,
                placeholders: entry.placeholders,
            })
            .collect();
        log::debug!("catalogue has {} layouts", layouts.len());
        Ok(Self { layouts })
    }

    /// Build a catalogue directly from layouts, renumbering them in order.
    pub fn from_layouts(layouts: Vec<Layout>) -> Self {
        let layouts = layouts
            .into_iter()
            .enumerate()
            .map(|(index, layout)| Layout { index, ..layout })
            .collect();
        Self { layouts }
    }

    #[inline]
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }

    /// Exact, case-sensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|layout| layout.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|layout| layout.name.as_str())
    }
}

/// Open a template, or the built-in blank presentation when `path` is `None`.
pub fn open_template(path: Option<&Path>) -> Result<(Package, TemplateCatalogue)> {
    let package = match path {
        Some(path) => {
            if !path.exists() {
                return Err(DeckError::TemplateNotFound(path.to_path_buf()));
            }
            let package = Package::open(path).map_err(|e| DeckError::TemplateCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            log::info!("Loaded template: {}", path.display());
            package
        },
        None => {
            let package = Package::new_default()?;
            log::info!("Created blank presentation");
            package
        },
    };
    let catalogue = TemplateCatalogue::from_package(&package)?;
    Ok((package, catalogue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue() {
        let (_, catalogue) = open_template(None).unwrap();
        assert_eq!(catalogue.len(), 11);
        let names: Vec<&str> = catalogue.names().collect();
        assert_eq!(names[0], "Title Slide");
        assert_eq!(names[1], "Title and Content");

        let title_slide = catalogue.get(0).unwrap();
        assert!(title_slide.has_title());
        assert!(title_slide.slot_of_kind(PlaceholderKind::Subtitle).is_some());
        assert_eq!(title_slide.content_slots().count(), 2);

        let blank = catalogue.by_name("Blank").unwrap();
        assert_eq!(blank.index, 6);
        assert_eq!(blank.content_slots().count(), 0);
        assert!(catalogue.by_name("blank").is_none());

        let picture = catalogue.by_name("Picture with Caption").unwrap();
        assert_eq!(picture.slot(1).unwrap().kind, PlaceholderKind::Picture);
    }

    #[test]
    fn test_missing_and_corrupt_templates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pptx");
        assert!(matches!(open_template(Some(&missing)), Err(DeckError::TemplateNotFound(_))));

        let corrupt = dir.path().join("corrupt.pptx");
        std::fs::write(&corrupt, b"not a zip").unwrap();
        assert!(matches!(
            open_template(Some(&corrupt)),
            Err(DeckError::TemplateCorrupt { .. })
        ));
    }
}
