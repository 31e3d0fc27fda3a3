//! `{{KEY}}` marker substitution over slide text.
//!
//! Markers are looked up in one left-to-right pass over each `<a:t>` text
//! segment. Replacement values are never rescanned, so the outcome does not
//! depend on the order keys are applied in.
use crate::common::xml::{escape_xml, unescape_xml};
use crate::deck::error::{DeckError, Result, Warning};
use crate::ooxml::pptx::Package;
use memchr::memmem;
use std::collections::{BTreeSet, HashMap};

const MARKER_OPEN: &str = "{{";
const MARKER_CLOSE: &str = "}}";

/// Marker key to replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    values: HashMap<String, String>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=VALUE` arguments. The value may itself contain `=`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                DeckError::InvalidSpecShape(format!(
                    "invalid replacement format: {} (expected KEY=VALUE)",
                    pair
                ))
            })?;
            set.insert(key, value);
        }
        Ok(set)
    }

    /// Add a replacement. `key` is the bare name, without braces.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Outcome of a substitution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Number of markers replaced
    pub applied: usize,
    /// Keys of markers left in place, sorted
    pub unmatched: BTreeSet<String>,
}

impl SubstitutionReport {
    pub fn warnings(&self) -> Vec<Warning> {
        self.unmatched
            .iter()
            .map(|key| Warning::UnmatchedMarker { key: key.clone() })
            .collect()
    }
}

/// Replace markers in plain text. Returns the new text if anything changed.
pub fn substitute_text(text: &str, set: &ReplacementSet, report: &mut SubstitutionReport) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut changed = false;

    while let Some(start) = rest.find(MARKER_OPEN) {
        let after_open = &rest[start + MARKER_OPEN.len()..];
        let Some(len) = after_open.find(MARKER_CLOSE) else {
            break;
        };
        let key = &after_open[..len];
        // `{{a{{b}}` keeps scanning from the inner opener.
        if key.contains(MARKER_OPEN) {
            let skip = start + MARKER_OPEN.len() + key.rfind(MARKER_OPEN).unwrap_or(0);
            out.push_str(&rest[..skip]);
            rest = &rest[skip..];
            continue;
        }

        out.push_str(&rest[..start]);
        let end = start + MARKER_OPEN.len() + len + MARKER_CLOSE.len();
        match set.get(key) {
            Some(value) => {
                out.push_str(value);
                report.applied += 1;
                changed = true;
            },
            None => {
                out.push_str(&rest[start..end]);
                if !key.is_empty() {
                    report.unmatched.insert(key.to_string());
                }
            },
        }
        rest = &rest[end..];
    }

    if !changed {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

/// Apply substitution to every `<a:t>` element of one XML part.
fn substitute_part(xml: &[u8], set: &ReplacementSet, report: &mut SubstitutionReport) -> Result<Option<Vec<u8>>> {
    let mut out: Vec<u8> = Vec::with_capacity(xml.len());
    let mut copied = 0usize;
    let mut changed = false;

    for open in memmem::find_iter(xml, b"<a:t") {
        if open < copied {
            continue;
        }
        let Some(&next) = xml.get(open + 4) else {
            break;
        };
        if next != b'>' && !next.is_ascii_whitespace() {
            continue;
        }
        let Some(gt) = memchr::memchr(b'>', &xml[open..]).map(|p| open + p) else {
            break;
        };
        if xml[gt - 1] == b'/' {
            continue;
        }
        let text_start = gt + 1;
        let Some(text_end) = memmem::find(&xml[text_start..], b"</a:t>").map(|p| text_start + p) else {
            break;
        };

        let raw = std::str::from_utf8(&xml[text_start..text_end])
            .map_err(|e| DeckError::Package(e.into()))?;
        if raw.contains(MARKER_OPEN)
            && let Some(replaced) = substitute_text(&unescape_xml(raw), set, report)
        {
            out.extend_from_slice(&xml[copied..text_start]);
            out.extend_from_slice(escape_xml(&replaced).as_bytes());
            copied = text_end;
            changed = true;
        }
    }

    if !changed {
        return Ok(None);
    }
    out.extend_from_slice(&xml[copied..]);
    Ok(Some(out))
}

/// Replace markers across all slides of `package`.
pub fn substitute_package(package: &mut Package, set: &ReplacementSet) -> Result<SubstitutionReport> {
    let mut report = SubstitutionReport::default();
    for partname in package.slide_partnames()? {
        let part = package.opc_mut().get_part_mut(&partname).map_err(|e| DeckError::Package(e.into()))?;
        if let Some(updated) = substitute_part(part.blob(), set, &mut report)? {
            part.set_blob(updated);
        }
    }
    for key in &report.unmatched {
        log::warn!("no replacement for {{{{{}}}}}", key);
    }
    log::debug!("substitution applied {} replacements", report.applied);
    Ok(report)
}

/// Replace markers across all slides and return the number of replacements.
pub fn substitute(package: &mut Package, set: &ReplacementSet) -> Result<usize> {
    Ok(substitute_package(package, set)?.applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(pairs: &[(&str, &str)]) -> ReplacementSet {
        pairs.iter().copied().collect()
    }

    fn run(text: &str, set: &ReplacementSet) -> (String, SubstitutionReport) {
        let mut report = SubstitutionReport::default();
        let out = substitute_text(text, set, &mut report).unwrap_or_else(|| text.to_string());
        (out, report)
    }

    #[test]
    fn test_basic_substitution() {
        let names = set(&[("NAME", "John")]);
        let (hello, report) = run("Hello {{NAME}}", &names);
        assert_eq!(hello, "Hello John");
        assert_eq!(report.applied, 1);

        let (hi, report) = run("Hi {{OTHER}}", &names);
        assert_eq!(hi, "Hi {{OTHER}}");
        assert_eq!(report.applied, 0);
        assert!(report.unmatched.contains("OTHER"));
    }

    #[test]
    fn test_case_sensitive_and_single_pass() {
        let values = set(&[("A", "{{B}}"), ("B", "x")]);
        let (out, report) = run("{{A}} {{a}} {{B}}{{B}}", &values);
        assert_eq!(out, "{{B}} {{a}} xx");
        assert_eq!(report.applied, 3);
    }

    #[test]
    fn test_unbalanced_markers() {
        let values = set(&[("K", "v")]);
        assert_eq!(run("{{K", &values).0, "{{K");
        assert_eq!(run("{{x {{K}}", &values).0, "{{x v");
        assert_eq!(run("{{}} }}", &values).0, "{{}} }}");
    }

    #[test]
    fn test_from_pairs() {
        let parsed = ReplacementSet::from_pairs(["NAME=John", "EQ=a=b"]).unwrap();
        assert_eq!(parsed.get("NAME"), Some("John"));
        assert_eq!(parsed.get("EQ"), Some("a=b"));
        assert!(ReplacementSet::from_pairs(["nope"]).is_err());
    }

    #[test]
    fn test_part_substitution_escapes() {
        let xml = br#"<p:sld><a:t>Hi {{NAME}}</a:t><a:t xml:space="preserve"> &amp; {{CO}}</a:t><a:t/></p:sld>"#;
        let values = set(&[("NAME", "<Ann>"), ("CO", "R&D")]);
        let mut report = SubstitutionReport::default();
        let out = substitute_part(xml, &values, &mut report).unwrap().unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            r#"<p:sld><a:t>Hi &lt;Ann&gt;</a:t><a:t xml:space="preserve"> &amp; R&amp;D</a:t><a:t/></p:sld>"#
        );
        assert_eq!(report.applied, 2);

        let mut report = SubstitutionReport::default();
        assert!(substitute_part(b"<a:tbl><a:t>none</a:t></a:tbl>", &values, &mut report)
            .unwrap()
            .is_none());
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            words in prop::collection::vec(prop_oneof![Just("{{A}}"), Just("{{B}}"), Just("{{C}}"), Just("text"), Just(" ")], 0..12),
            a in "[a-z]{0,4}",
            b in "[a-z{}]{0,4}",
        ) {
            let text: String = words.concat();
            let forward: ReplacementSet = vec![("A", a.clone()), ("B", b.clone())].into_iter().collect();
            let backward: ReplacementSet = vec![("B", b.clone()), ("A", a.clone())].into_iter().collect();
            let (first, first_report) = run(&text, &forward);
            let (second, second_report) = run(&text, &backward);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first_report, second_report);
        }
    }
}
