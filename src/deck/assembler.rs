//! Document assembly.
//!
//! [`WorkingDeck`] owns one in-memory presentation for the duration of a
//! compile. [`DeckCompiler`] drives it: open the template, drop the
//! template's own slides, resolve and build every slide in order, serialize.
//! Any error aborts the whole compile before anything is written.
use crate::deck::builder::build_slide;
use crate::deck::catalogue::{TemplateCatalogue, open_template};
use crate::deck::error::{DeckError, Result, Warning};
use crate::deck::resolver::resolve;
use crate::deck::spec::{PresentationSpec, SlideSpec};
use crate::deck::style::DeckStyle;
use crate::deck::substitute::{ReplacementSet, SubstitutionReport, substitute_package};
use crate::ooxml::pptx::Package;
use chrono::Utc;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// A finished presentation.
#[derive(Debug, Clone)]
pub struct CompiledDeck {
    /// The `.pptx` package
    pub bytes: Vec<u8>,
    pub slide_count: usize,
    pub warnings: Vec<Warning>,
}

/// A presentation open for mutation.
pub struct WorkingDeck {
    package: Package,
    catalogue: TemplateCatalogue,
    style: DeckStyle,
    warnings: Vec<Warning>,
}

impl WorkingDeck {
    /// Open `template` (or the built-in blank presentation). With
    /// `clear_existing` the template's slides are removed first, so it only
    /// contributes masters, layouts and theme, and a `.potx`/`.pptm` source
    /// is re-typed as a plain presentation.
    pub fn open(template: Option<&Path>, clear_existing: bool, style: DeckStyle) -> Result<Self> {
        let (mut package, mut catalogue) = open_template(template)?;
        if clear_existing {
            if package.convert_to_presentation()? {
                log::info!("Derived presentation from template document");
            }
            let removed = package.clear_slides()?;
            if removed > 0 {
                log::info!("Removed {} template slides", removed);
                catalogue = TemplateCatalogue::from_package(&package)?;
            }
        }
        Ok(Self {
            package,
            catalogue,
            style,
            warnings: Vec::new(),
        })
    }

    pub fn catalogue(&self) -> &TemplateCatalogue {
        &self.catalogue
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn style(&self) -> &DeckStyle {
        &self.style
    }

    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.package.slide_count()?)
    }

    /// Resolve a layout for `spec`, build the slide and append it. Returns the
    /// new slide's 0-based index.
    pub fn push_slide(&mut self, spec: &SlideSpec) -> Result<usize> {
        let index = self.slide_count()?;
        let layout = resolve(spec, &self.catalogue)?;
        let slide = build_slide(layout, spec, &self.style, index, &mut self.warnings)?;
        let partname = self.package.add_slide(&slide)?;
        log::debug!(
            "slide {} ({}) added as {} on layout '{}'",
            index,
            spec.slide_type(),
            partname,
            layout.name
        );
        Ok(index)
    }

    /// Remove the slide at `index` (0-based).
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        let count = self.slide_count()?;
        if index >= count {
            return Err(DeckError::SlideIndexOutOfRange { index, count });
        }
        self.package.remove_slide(index)?;
        Ok(())
    }

    /// Replace `{{KEY}}` markers in every slide; returns the replacement count.
    pub fn substitute(&mut self, set: &ReplacementSet) -> Result<usize> {
        Ok(self.substitute_with_report(set)?.applied)
    }

    /// Like [`substitute`](Self::substitute), also recording unmatched
    /// markers as warnings.
    pub fn substitute_with_report(&mut self, set: &ReplacementSet) -> Result<SubstitutionReport> {
        let report = substitute_package(&mut self.package, set)?;
        self.warnings.extend(report.warnings());
        Ok(report)
    }

    /// Stamp the document title and modification time into the core properties.
    pub fn set_core_properties(&mut self, title: Option<&str>) -> Result<()> {
        self.package.set_core_properties(title, Utc::now())?;
        Ok(())
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.package.to_bytes()?)
    }

    /// Write the presentation, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_output(path.as_ref(), &self.to_bytes()?)
    }

    pub fn into_compiled(self) -> Result<CompiledDeck> {
        Ok(CompiledDeck {
            bytes: self.package.to_bytes()?,
            slide_count: self.package.slide_count()?,
            warnings: self.warnings,
        })
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    log::info!("Saved presentation to {}", path.display());
    Ok(())
}

/// One entry of a batch compile.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub spec: PresentationSpec,
    pub template: Option<PathBuf>,
    /// Written on success when set
    pub output: Option<PathBuf>,
}

/// Compiles specs with a fixed style.
#[derive(Debug, Clone, Default)]
pub struct DeckCompiler {
    style: DeckStyle,
}

impl DeckCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: DeckStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &DeckStyle {
        &self.style
    }

    /// Compile `spec` into a `.pptx` package.
    ///
    /// A supplied template only contributes its layouts and theme; its own
    /// slides are dropped. A top-level `title` becomes an extra first slide.
    pub fn compile(&self, spec: &PresentationSpec, template: Option<&Path>) -> Result<CompiledDeck> {
        let mut deck = WorkingDeck::open(template, template.is_some(), self.style.clone())?;

        if let Some(title_slide) = spec.title_slide() {
            deck.push_slide(&title_slide)?;
        }
        for slide in &spec.slides {
            deck.push_slide(slide)?;
        }
        deck.set_core_properties(spec.title.as_deref())?;

        let compiled = deck.into_compiled()?;
        log::info!(
            "Compiled {} slides ({} warnings)",
            compiled.slide_count,
            compiled.warnings.len()
        );
        Ok(compiled)
    }

    /// Compile and write to `output`. Nothing is written if the compile
    /// fails; `output` may be the template itself.
    pub fn compile_to_file(
        &self,
        spec: &PresentationSpec,
        template: Option<&Path>,
        output: &Path,
    ) -> Result<CompiledDeck> {
        let compiled = self.compile(spec, template)?;
        write_output(output, &compiled.bytes)?;
        Ok(compiled)
    }

    /// Compile independent jobs in parallel. Results are in job order.
    pub fn compile_batch(&self, jobs: &[CompileJob]) -> Vec<Result<CompiledDeck>> {
        jobs.par_iter()
            .map(|job| match job.output {
                Some(ref output) => self.compile_to_file(&job.spec, job.template.as_deref(), output),
                None => self.compile(&job.spec, job.template.as_deref()),
            })
            .collect()
    }
}

/// Compile with the default style.
pub fn compile(spec: &PresentationSpec, template: Option<&Path>) -> Result<CompiledDeck> {
    DeckCompiler::new().compile(spec, template)
}

/// Compile with the default style and write to `output`.
pub fn compile_to_file(spec: &PresentationSpec, template: Option<&Path>, output: &Path) -> Result<CompiledDeck> {
    DeckCompiler::new().compile_to_file(spec, template, output)
}

/// Compile a batch with the default style.
pub fn compile_batch(jobs: &[CompileJob]) -> Vec<Result<CompiledDeck>> {
    DeckCompiler::new().compile_batch(jobs)
}

/// Replace markers in an existing presentation and save the result.
pub fn replace_in_file(input: &Path, set: &ReplacementSet, output: &Path) -> Result<SubstitutionReport> {
    let mut deck = WorkingDeck::open(Some(input), false, DeckStyle::default())?;
    let report = deck.substitute_with_report(set)?;
    deck.save(output)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::spec::SlideBody;

    #[test]
    fn test_compile_counts_title_slide() {
        let mut spec = PresentationSpec::new(vec![SlideSpec::content("Points", ["a", "b"])]);
        spec.title = Some("Q1".into());
        let deck = compile(&spec, None).unwrap();
        assert_eq!(deck.slide_count, 2);
        assert!(deck.warnings.is_empty());
        assert_eq!(&deck.bytes[..2], b"PK");
    }

    #[test]
    fn test_failed_compile_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/deck.pptx");
        let spec = PresentationSpec::new(vec![SlideSpec::new(SlideBody::Table {
            headers: vec!["A".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        })]);
        assert!(matches!(
            compile_to_file(&spec, None, &output),
            Err(DeckError::TableDimensionMismatch { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_working_deck_add_and_remove() {
        let mut deck = WorkingDeck::open(None, false, DeckStyle::default()).unwrap();
        assert_eq!(deck.push_slide(&SlideSpec::content("One", ["x"])).unwrap(), 0);
        assert_eq!(deck.push_slide(&SlideSpec::new(SlideBody::Blank)).unwrap(), 1);
        assert!(matches!(
            deck.remove_slide(2),
            Err(DeckError::SlideIndexOutOfRange { index: 2, count: 2 })
        ));
        deck.remove_slide(0).unwrap();
        assert_eq!(deck.slide_count().unwrap(), 1);
    }

    #[test]
    fn test_substitution_through_working_deck() {
        let mut deck = WorkingDeck::open(None, false, DeckStyle::default()).unwrap();
        deck.push_slide(&SlideSpec::content("Hello {{NAME}}", ["Hi {{OTHER}}"]))
            .unwrap();
        let set: ReplacementSet = [("NAME", "John")].into_iter().collect();
        assert_eq!(deck.substitute(&set).unwrap(), 1);
        assert_eq!(
            deck.warnings(),
            &[Warning::UnmatchedMarker {
                key: "OTHER".into()
            }]
        );
        assert_eq!(deck.substitute(&set).unwrap(), 0);
    }

    #[test]
    fn test_batch_keeps_job_order() {
        let good = PresentationSpec::new(vec![SlideSpec::new(SlideBody::Blank)]);
        let bad = PresentationSpec::new(vec![SlideSpec::new(SlideBody::Blank)
            .with_layout(crate::deck::spec::LayoutRef::Index(99))]);
        let jobs: Vec<CompileJob> = [good.clone(), bad, good]
            .into_iter()
            .map(|spec| CompileJob {
                spec,
                template: None,
                output: None,
            })
            .collect();
        let results = compile_batch(&jobs);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DeckError::LayoutIndexOutOfRange { .. })));
        assert_eq!(results[2].as_ref().unwrap().slide_count, 1);
    }
}
