//! Layout resolution.
//!
//! An explicit `layout` wins. Otherwise the slide type picks a layout by a
//! fixed search over the catalogue, always in catalogue order:
//!
//! | type                          | search                                                                                   | fallback          |
//! |-------------------------------|------------------------------------------------------------------------------------------|-------------------|
//! | title                         | name contains "title" + title slot, then name contains "section" + title slot            | 0                 |
//! | section                       | name contains "section" + title slot, then name contains "title" + title slot            | 0                 |
//! | content, table, chart, image  | name contains "content" + body slot, then name contains "content", then any body slot    | 1, else 0         |
//! | blank                         | no non-chrome slots, then no non-title non-chrome slots                                  | 6, else 0         |
//!
//! Name matching is a case-insensitive substring test.
use crate::deck::catalogue::{Layout, TemplateCatalogue};
use crate::deck::error::{DeckError, Result};
use crate::deck::spec::{LayoutRef, SlideSpec, SlideType};

const CONTENT_FALLBACK: usize = 1;
const BLANK_FALLBACK: usize = 6;

/// Pick the layout for `slide`. Pure in its inputs.
pub fn resolve<'a>(slide: &SlideSpec, catalogue: &'a TemplateCatalogue) -> Result<&'a Layout> {
    if catalogue.is_empty() {
        return Err(DeckError::NoLayoutsAvailable);
    }

    match slide.layout {
        Some(LayoutRef::Name(ref name)) => catalogue
            .by_name(name)
            .ok_or_else(|| DeckError::LayoutNotFound(name.clone())),
        Some(LayoutRef::Index(index)) => catalogue.get(index).ok_or(DeckError::LayoutIndexOutOfRange {
            index,
            count: catalogue.len(),
        }),
        None => {
            let layout = auto_detect(slide.slide_type(), catalogue);
            log::debug!(
                "{} slide resolved to layout {} '{}'",
                slide.slide_type(),
                layout.index,
                layout.name
            );
            Ok(layout)
        },
    }
}

fn name_contains(layout: &Layout, word: &str) -> bool {
    layout.name.to_lowercase().contains(word)
}

fn first<'a, F>(catalogue: &'a TemplateCatalogue, pred: F) -> Option<&'a Layout>
where
    F: Fn(&Layout) -> bool,
{
    catalogue.layouts().iter().find(|layout| pred(layout))
}

fn fallback(catalogue: &TemplateCatalogue, preferred: usize) -> &Layout {
    // Non-empty was checked by the caller.
    catalogue
        .get(preferred)
        .unwrap_or_else(|| &catalogue.layouts()[0])
}

fn auto_detect(slide_type: SlideType, catalogue: &TemplateCatalogue) -> &Layout {
    match slide_type {
        SlideType::Title | SlideType::Section => {
            let (primary, secondary) = if slide_type == SlideType::Title {
                ("title", "section")
            } else {
                ("section", "title")
            };
            first(catalogue, |l| name_contains(l, primary) && l.has_title())
                .or_else(|| first(catalogue, |l| name_contains(l, secondary) && l.has_title()))
                .unwrap_or_else(|| fallback(catalogue, 0))
        },
        SlideType::Content | SlideType::Table | SlideType::Chart | SlideType::Image => {
            first(catalogue, |l| name_contains(l, "content") && l.has_body())
                .or_else(|| first(catalogue, |l| name_contains(l, "content")))
                .or_else(|| first(catalogue, Layout::has_body))
                .unwrap_or_else(|| fallback(catalogue, CONTENT_FALLBACK))
        },
        SlideType::Blank => first(catalogue, |l| l.content_slots().next().is_none())
            .or_else(|| {
                first(catalogue, |l| {
                    l.content_slots().all(|slot| slot.kind.is_title())
                })
            })
            .unwrap_or_else(|| fallback(catalogue, BLANK_FALLBACK)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::catalogue::open_template;
    use crate::deck::spec::SlideBody;
    use crate::ooxml::PackURI;
    use crate::ooxml::pptx::shapes::{PlaceholderAttrs, PlaceholderSlot};
    use proptest::prelude::*;

    fn slot(type_code: Option<&str>, idx: u32) -> PlaceholderSlot {
        let attrs = PlaceholderAttrs {
            type_code: type_code.map(str::to_string),
            idx,
            ..Default::default()
        };
        PlaceholderSlot {
            idx,
            name: format!("Placeholder {}", idx),
            kind: attrs.kind(),
            attrs,
            geometry: None,
        }
    }

    fn layout(name: &str, slots: Vec<PlaceholderSlot>) -> Layout {
        Layout {
            index: 0,
            name: name.to_string(),
            partname: PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap(),
            placeholders: slots,
        }
    }

    fn spec(body: SlideBody) -> SlideSpec {
        SlideSpec::new(body)
    }

    fn content() -> SlideSpec {
        spec(SlideBody::Content {
            bullets: vec![],
            image: None,
        })
    }

    #[test]
    fn test_default_catalogue_choices() {
        let (_, catalogue) = open_template(None).unwrap();
        let title = spec(SlideBody::Title { subtitle: None });
        let section = spec(SlideBody::Section { subtitle: None });
        assert_eq!(resolve(&title, &catalogue).unwrap().name, "Title Slide");
        assert_eq!(resolve(&section, &catalogue).unwrap().name, "Section Header");
        assert_eq!(resolve(&content(), &catalogue).unwrap().name, "Title and Content");
        assert_eq!(resolve(&spec(SlideBody::Blank), &catalogue).unwrap().name, "Blank");
    }

    #[test]
    fn test_explicit_layouts() {
        let (_, catalogue) = open_template(None).unwrap();
        let by_name = content().with_layout(LayoutRef::Name("Two Content".into()));
        assert_eq!(resolve(&by_name, &catalogue).unwrap().index, 3);

        let wrong_case = content().with_layout(LayoutRef::Name("two content".into()));
        assert!(matches!(resolve(&wrong_case, &catalogue), Err(DeckError::LayoutNotFound(_))));

        let by_index = content().with_layout(LayoutRef::Index(5));
        assert_eq!(resolve(&by_index, &catalogue).unwrap().name, "Title Only");

        let out_of_range = content().with_layout(LayoutRef::Index(11));
        assert!(matches!(
            resolve(&out_of_range, &catalogue),
            Err(DeckError::LayoutIndexOutOfRange { index: 11, count: 11 })
        ));
    }

    #[test]
    fn test_out_of_range_on_small_catalogue() {
        let catalogue = TemplateCatalogue::from_layouts(
            (0..5).map(|n| layout(&format!("L{}", n), vec![])).collect(),
        );
        let slide = content().with_layout(LayoutRef::Index(99));
        assert!(matches!(
            resolve(&slide, &catalogue),
            Err(DeckError::LayoutIndexOutOfRange { index: 99, count: 5 })
        ));
    }

    #[test]
    fn test_empty_catalogue() {
        let catalogue = TemplateCatalogue::default();
        assert!(matches!(resolve(&content(), &catalogue), Err(DeckError::NoLayoutsAvailable)));
        let named = content().with_layout(LayoutRef::Name("Blank".into()));
        assert!(matches!(resolve(&named, &catalogue), Err(DeckError::NoLayoutsAvailable)));
    }

    #[test]
    fn test_content_prefers_named_layout_with_body() {
        let catalogue = TemplateCatalogue::from_layouts(vec![
            layout("Cover", vec![slot(Some("ctrTitle"), 0)]),
            layout("Agenda", vec![slot(Some("title"), 0), slot(Some("body"), 1)]),
            layout("Content Only Picture", vec![slot(Some("pic"), 1)]),
            layout("Content", vec![slot(Some("title"), 0), slot(None, 1)]),
        ]);
        assert_eq!(resolve(&content(), &catalogue).unwrap().name, "Content");
    }

    #[test]
    fn test_content_falls_back_to_body_slot_then_index_one() {
        let with_body = TemplateCatalogue::from_layouts(vec![
            layout("Cover", vec![slot(Some("ctrTitle"), 0)]),
            layout("Picture", vec![slot(Some("pic"), 1)]),
            layout("Agenda", vec![slot(Some("body"), 1)]),
        ]);
        assert_eq!(resolve(&content(), &with_body).unwrap().name, "Agenda");

        let without_body = TemplateCatalogue::from_layouts(vec![
            layout("Cover", vec![slot(Some("ctrTitle"), 0)]),
            layout("Picture", vec![slot(Some("pic"), 1)]),
        ]);
        assert_eq!(resolve(&content(), &without_body).unwrap().name, "Picture");

        let single = TemplateCatalogue::from_layouts(vec![layout("Cover", vec![])]);
        assert_eq!(resolve(&content(), &single).unwrap().name, "Cover");
    }

    #[test]
    fn test_blank_fallbacks() {
        let catalogue = TemplateCatalogue::from_layouts(vec![
            layout("A", vec![slot(Some("title"), 0), slot(Some("body"), 1)]),
            layout("Heading", vec![slot(Some("title"), 0), slot(Some("dt"), 10)]),
        ]);
        assert_eq!(resolve(&spec(SlideBody::Blank), &catalogue).unwrap().name, "Heading");

        let catalogue = TemplateCatalogue::from_layouts(
            (0..8)
                .map(|n| layout(&format!("L{}", n), vec![slot(Some("body"), 1)]))
                .collect(),
        );
        assert_eq!(resolve(&spec(SlideBody::Blank), &catalogue).unwrap().name, "L6");
    }

    #[test]
    fn test_title_without_title_named_layout() {
        let catalogue = TemplateCatalogue::from_layouts(vec![
            layout("Cover", vec![slot(Some("ctrTitle"), 0)]),
            layout("Divider", vec![slot(Some("title"), 0)]),
        ]);
        let title = spec(SlideBody::Title { subtitle: None });
        assert_eq!(resolve(&title, &catalogue).unwrap().index, 0);
    }

    fn arb_kind() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("title")),
            Just(Some("ctrTitle")),
            Just(Some("body")),
            Just(Some("pic")),
            Just(Some("dt")),
        ]
    }

    fn arb_catalogue() -> impl Strategy<Value = TemplateCatalogue> {
        let name = prop_oneof![
            Just("Title Slide"),
            Just("Section"),
            Just("Content"),
            Just("Blank"),
            Just("Other"),
        ];
        prop::collection::vec((name, prop::collection::vec(arb_kind(), 0..4)), 1..10).prop_map(|entries| {
            TemplateCatalogue::from_layouts(
                entries
                    .into_iter()
                    .map(|(name, kinds)| {
                        let slots = kinds
                            .into_iter()
                            .enumerate()
                            .map(|(i, kind)| slot(kind, i as u32))
                            .collect();
                        layout(name, slots)
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_resolution_is_deterministic(catalogue in arb_catalogue(), which in 0usize..7) {
            let body = match which {
                0 => SlideBody::Title { subtitle: None },
                1 => SlideBody::Section { subtitle: None },
                2 => SlideBody::Table { headers: vec!["a".into()], rows: vec![] },
                3 => SlideBody::Blank,
                _ => SlideBody::Content { bullets: vec![], image: None },
            };
            let slide = spec(body);
            let first = resolve(&slide, &catalogue).unwrap().index;
            let second = resolve(&slide, &catalogue.clone()).unwrap().index;
            prop_assert_eq!(first, second);
            prop_assert!(first < catalogue.len());
        }
    }
}
