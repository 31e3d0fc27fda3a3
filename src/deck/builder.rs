//! Content builders: one per slide type.
//!
//! A builder starts from a fresh [`MutableSlide`] bound to the resolved
//! layout, fills placeholders where the layout offers a matching one and adds
//! free shapes otherwise. Table and chart data are checked before anything
//! is created.
use crate::common::inches_to_emu;
use crate::deck::catalogue::Layout;
use crate::deck::error::{DeckError, Result, Warning};
use crate::deck::spec::{PlacedImage, SlideBody, SlideSpec};
use crate::deck::style::{DeckStyle, ImageRegion};
use crate::ooxml::pptx::writer::{Crop, TableHeaderStyle};
use crate::ooxml::pptx::{
    ChartData, ChartKind, ChartSeries, Geometry, ImageData, MutableShape, MutableSlide, Paragraph,
    PlaceholderContent, PlaceholderKind, TextFormat,
};
use std::io::ErrorKind;
use std::path::Path;

/// Build the slide described by `spec` on `layout`.
///
/// `slide_index` is the 0-based position of the slide in the output and is
/// only used to label warnings.
pub fn build_slide(
    layout: &Layout,
    spec: &SlideSpec,
    style: &DeckStyle,
    slide_index: usize,
    warnings: &mut Vec<Warning>,
) -> Result<MutableSlide> {
    validate(&spec.body)?;

    let mut builder = SlideBuilder {
        slide: MutableSlide::new(layout.partname.clone(), &layout.placeholders),
        layout,
        style,
        slide_index,
        warnings,
    };

    match spec.body {
        SlideBody::Title { ref subtitle } | SlideBody::Section { ref subtitle } => {
            if let Some(title) = spec.title.as_deref() {
                builder.set_title(title, style.fonts.title);
            }
            if let Some(subtitle) = subtitle.as_deref().filter(|s| !s.is_empty()) {
                builder.set_subtitle(subtitle);
            }
        },
        SlideBody::Content {
            ref bullets,
            ref image,
        } => {
            if let Some(title) = spec.title.as_deref() {
                builder.set_title(title, style.fonts.slide_title);
            }
            if !bullets.is_empty() {
                builder.add_bullets(bullets);
            }
            if let Some(image) = image {
                builder.add_image(image, style.regions.content_image)?;
            }
        },
        SlideBody::Table {
            ref headers,
            ref rows,
        } => {
            if let Some(title) = spec.title.as_deref() {
                builder.set_title(title, style.fonts.slide_title);
            }
            builder.add_table(headers, rows);
        },
        SlideBody::Chart {
            kind,
            ref categories,
            ref series,
        } => {
            if let Some(title) = spec.title.as_deref() {
                builder.set_title(title, style.fonts.slide_title);
            }
            builder.add_chart(kind, categories, series);
        },
        SlideBody::Image { ref image } => {
            if let Some(title) = spec.title.as_deref() {
                builder.set_title(title, style.fonts.slide_title);
            }
            builder.add_image(image, style.regions.image)?;
        },
        SlideBody::Blank => {},
    }

    for (&idx, path) in &spec.placeholder_images {
        builder.fill_picture_placeholder(idx, path);
    }
    if let Some(note) = spec.note.as_deref() {
        builder.slide.set_notes(note);
    }

    Ok(builder.slide)
}

/// Data-shape checks that must pass before any shape exists.
fn validate(body: &SlideBody) -> Result<()> {
    match body {
        SlideBody::Table { headers, rows } => {
            if let Some((row, found)) = rows
                .iter()
                .map(Vec::len)
                .enumerate()
                .find(|&(_, len)| len != headers.len())
            {
                return Err(DeckError::TableDimensionMismatch {
                    row,
                    expected: headers.len(),
                    found,
                });
            }
        },
        SlideBody::Chart {
            categories, series, ..
        } => {
            if let Some((name, values)) = series.iter().find(|(_, values)| values.len() != categories.len()) {
                return Err(DeckError::ChartDataMismatch {
                    series: name.clone(),
                    expected: categories.len(),
                    found: values.len(),
                });
            }
        },
        _ => {},
    }
    Ok(())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<ImageData> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            return Err(DeckError::ImageNotFound(path.to_path_buf()));
        },
        Err(e) => return Err(DeckError::Io(e)),
    };
    ImageData::from_bytes(bytes).map_err(|e| DeckError::UnsupportedImage {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Frame for a picture. A missing width or height follows the pixel aspect
/// ratio; with neither given the region's width is used.
fn picture_geometry(image: &ImageData, placed: &PlacedImage, region: ImageRegion) -> Geometry {
    let aspect = image.aspect_ratio();
    let (width, height) = match (placed.width, placed.height) {
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) => (width, width / aspect),
        (None, Some(height)) => (height * aspect, height),
        (None, None) => (region.width, region.width / aspect),
    };
    Geometry::new(
        inches_to_emu(placed.left.unwrap_or(region.left)),
        inches_to_emu(placed.top.unwrap_or(region.top)),
        inches_to_emu(width),
        inches_to_emu(height),
    )
}

struct SlideBuilder<'a> {
    slide: MutableSlide,
    layout: &'a Layout,
    style: &'a DeckStyle,
    slide_index: usize,
    warnings: &'a mut Vec<Warning>,
}

impl SlideBuilder<'_> {
    fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Title placeholder, or a bold text box of `size` points in the title region.
    fn set_title(&mut self, text: &str, size: f64) {
        if let Some(placeholder) = self.slide.placeholder_mut(PlaceholderKind::is_title) {
            placeholder.content = PlaceholderContent::Text(vec![Paragraph::new(text)]);
            return;
        }
        let format = TextFormat::sized(size)
            .with_bold(true)
            .with_color(&self.style.colors.secondary);
        self.slide.add_shape(MutableShape::new_text_box(
            vec![Paragraph::new(text).with_format(format)],
            self.style.regions.title.geometry(),
        ));
    }

    /// Subtitle goes only into a subtitle placeholder.
    fn set_subtitle(&mut self, text: &str) {
        match self
            .slide
            .placeholder_mut(|kind| kind == PlaceholderKind::Subtitle)
        {
            Some(placeholder) => {
                placeholder.content = PlaceholderContent::Text(vec![Paragraph::new(text)]);
            },
            None => log::debug!(
                "layout '{}' has no subtitle placeholder, subtitle dropped",
                self.layout.name
            ),
        }
    }

    /// One paragraph per bullet, in the body placeholder or a text box.
    fn add_bullets(&mut self, bullets: &[String]) {
        let format = TextFormat::sized(self.style.fonts.body).with_color(&self.style.colors.secondary);
        let paragraphs: Vec<Paragraph> = bullets
            .iter()
            .map(|text| Paragraph::new(text.as_str()).with_format(format.clone()))
            .collect();

        if let Some(placeholder) = self.slide.placeholder_mut(PlaceholderKind::is_body) {
            placeholder.content = PlaceholderContent::Text(paragraphs);
        } else {
            self.slide.add_shape(MutableShape::new_text_box(
                paragraphs,
                self.style.regions.content.geometry(),
            ));
        }
    }

    fn add_table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let region = self.style.regions.table;
        let row_height = inches_to_emu(region.row_height);
        let mut cells = Vec::with_capacity(rows.len() + 1);
        cells.push(headers.to_vec());
        cells.extend(rows.iter().cloned());

        let geometry = Geometry::new(
            inches_to_emu(region.left),
            inches_to_emu(region.top),
            inches_to_emu(region.width),
            row_height * cells.len() as i64,
        );
        let header = TableHeaderStyle {
            fill: self.style.colors.primary.clone(),
            format: TextFormat::sized(self.style.fonts.caption)
                .with_bold(true)
                .with_color(&self.style.colors.white),
        };
        self.slide.add_shape(MutableShape::new_table(
            cells,
            geometry,
            row_height,
            header,
            TextFormat::sized(self.style.fonts.caption),
        ));
    }

    fn add_chart(&mut self, kind: ChartKind, categories: &[String], series: &[(String, Vec<f64>)]) {
        let keep = if kind == ChartKind::Pie { 1 } else { series.len() };
        if series.len() > keep {
            let dropped = series.len() - keep;
            self.warn(Warning::PieSeriesDropped {
                slide: self.slide_index,
                dropped,
            });
        }
        let data = ChartData {
            kind,
            categories: categories.to_vec(),
            series: series
                .iter()
                .take(keep)
                .map(|(name, values)| ChartSeries {
                    name: name.clone(),
                    values: values.clone(),
                })
                .collect(),
        };
        self.slide
            .add_shape(MutableShape::new_chart(data, self.style.regions.chart.geometry()));
    }

    fn add_image(&mut self, placed: &PlacedImage, region: ImageRegion) -> Result<()> {
        let image = load_image(&placed.path)?;
        let geometry = picture_geometry(&image, placed, region);
        let description = placed
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.slide
            .add_shape(MutableShape::new_picture(image, geometry, description));
        Ok(())
    }

    /// Put an image into the picture placeholder `idx`. Problems are
    /// recorded as warnings and never fail the slide.
    fn fill_picture_placeholder(&mut self, idx: u32, path: &Path) {
        let slide = self.slide_index;
        let layout = self.layout;
        let Some(slot) = layout.slot(idx).filter(|slot| !slot.kind.is_chrome()) else {
            self.warn(Warning::PlaceholderSlotMissing { slide, idx });
            return;
        };
        if slot.kind != PlaceholderKind::Picture {
            self.warn(Warning::PlaceholderNotPicture { slide, idx });
            return;
        }
        let geometry = slot.geometry;

        let image = match load_image(path) {
            Ok(image) => image,
            Err(e) => {
                self.warn(Warning::PlaceholderImageUnreadable {
                    slide,
                    idx,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            },
        };
        let crop = geometry.and_then(|g| Crop::to_fill(&image, g.cx, g.cy));
        match self.slide.placeholder_by_idx_mut(idx) {
            Some(placeholder) => placeholder.content = PlaceholderContent::Picture { image, crop },
            None => self.warn(Warning::PlaceholderSlotMissing { slide, idx }),
        }
    }
}
