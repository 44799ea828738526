//! Bidirectional identifier ↔ label transform for pattern text
//!
//! `render` swaps technical group names for labels before a pattern is shown
//! to an editor; `normalize` swaps them back and rejects any group name the
//! editor introduced. For patterns built from known identifiers,
//! `normalize(render(p)) == p`.

use super::field_id::is_field_id;
use crate::contract::{SemanticContract, Subentity};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

/// Opening of a named group in either syntax the regex engine accepts,
/// `(?<name>` or `(?P<name>`. Captures the `P` marker and the name, which
/// may hold any character except `>`. Lookbehind openers `(?<=` and `(?<!`
/// never match.
static GROUP_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\?(P?)<([^>=!][^>]*)>").expect("group opener regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(
        "unrecognized group name(s): {}; valid labels: {}",
        .names.join(", "),
        list_or_none(.valid_labels)
    )]
    UnrecognizedGroupName {
        names: Vec<String>,
        valid_labels: Vec<String>,
    },
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`, and prefix `_`
/// when the result is empty or starts with a digit.
pub fn sanitize_label(label: &str) -> String {
    let mut out: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// All named-group names in `pattern`, in order of appearance.
pub fn group_names(pattern: &str) -> Vec<String> {
    GROUP_OPENER
        .captures_iter(pattern)
        .map(|c| c[2].to_string())
        .collect()
}

/// Mutually inverse identifier → label and label → identifier maps.
///
/// Built fresh per transform call from subentity iteration order.
#[derive(Debug, Clone, Default)]
pub struct IdentifierLabelMap {
    to_label: HashMap<String, String>,
    to_id: HashMap<String, String>,
    /// Labels in subentity order, for error reporting.
    labels: Vec<String>,
}

impl IdentifierLabelMap {
    /// Build from `(identifier, label)` pairs.
    ///
    /// Pairs whose identifier is not a technical field id are skipped, as are
    /// repeated identifiers. Colliding labels get `_1`, `_2`, ... suffixes in
    /// iteration order; the first occurrence keeps the bare name.
    pub fn build<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = Self::default();
        let mut taken: HashSet<String> = HashSet::new();
        let mut seen_base: HashMap<String, usize> = HashMap::new();

        for (id, label) in pairs {
            if !is_field_id(id) || map.to_label.contains_key(id) {
                continue;
            }
            let base = sanitize_label(label);
            let counter = seen_base.entry(base.clone()).or_insert(0);
            let mut candidate = if *counter == 0 {
                base.clone()
            } else {
                format!("{}_{}", base, counter)
            };
            while taken.contains(&candidate) {
                *counter += 1;
                candidate = format!("{}_{}", base, counter);
            }
            *counter += 1;

            taken.insert(candidate.clone());
            map.to_label.insert(id.to_string(), candidate.clone());
            map.to_id.insert(candidate.clone(), id.to_string());
            map.labels.push(candidate);
        }

        map
    }

    pub fn from_subentities(subentities: &[Subentity]) -> Self {
        Self::build(
            subentities
                .iter()
                .map(|s| (s.field_id.as_str(), s.label.as_str())),
        )
    }

    pub fn from_contract(contract: &SemanticContract) -> Self {
        Self::from_subentities(&contract.subentities)
    }

    pub fn is_empty(&self) -> bool {
        self.to_label.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_label.len()
    }

    pub fn label_for(&self, id: &str) -> Option<&str> {
        self.to_label.get(id).map(String::as_str)
    }

    pub fn id_for(&self, label: &str) -> Option<&str> {
        self.to_id.get(label).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Replace `(?<identifier>` with `(?<label>` for every known identifier.
    ///
    /// Unknown names are left untouched. The substitution is a single pass,
    /// so a label that happens to look like another identifier is never
    /// rewritten twice.
    pub fn render(&self, pattern: &str) -> String {
        if self.is_empty() || pattern.is_empty() {
            return pattern.to_string();
        }
        GROUP_OPENER
            .replace_all(pattern, |caps: &Captures| match self.label_for(&caps[2]) {
                Some(label) => format!("(?{}<{}>", &caps[1], label),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Inverse of [`render`](Self::render).
    ///
    /// Fails if any group name left after substitution is not a technical
    /// identifier, listing every offending name and all valid labels.
    pub fn normalize(&self, pattern: &str) -> Result<String, TransformError> {
        let restored = GROUP_OPENER
            .replace_all(pattern, |caps: &Captures| match self.id_for(&caps[2]) {
                Some(id) => format!("(?{}<{}>", &caps[1], id),
                None => caps[0].to_string(),
            })
            .into_owned();

        let mut unknown: Vec<String> = Vec::new();
        for name in group_names(&restored) {
            if !is_field_id(&name) && !unknown.contains(&name) {
                unknown.push(name);
            }
        }

        if unknown.is_empty() {
            Ok(restored)
        } else {
            Err(TransformError::UnrecognizedGroupName {
                names: unknown,
                valid_labels: self.labels.clone(),
            })
        }
    }

    /// True if `pattern` names at least one group with a technical identifier.
    pub fn has_technical_names(pattern: &str) -> bool {
        group_names(pattern).iter().any(|n| is_field_id(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: &str = "g_1a2b3c4d5e6f";
    const MONTH: &str = "g_2b3c4d5e6f7a";
    const YEAR: &str = "g_3c4d5e6f7a8b";

    fn date_map() -> IdentifierLabelMap {
        IdentifierLabelMap::build([(DAY, "Giorno"), (MONTH, "Mese"), (YEAR, "Anno")])
    }

    // === Scenario: date pattern renders to labels and back ===
    #[test]
    fn date_pattern_round_trip() {
        let map = date_map();
        let technical = r"(?<g_1a2b3c4d5e6f>\d{1,2})[/-](?<g_2b3c4d5e6f7a>\d{1,2})[/-](?<g_3c4d5e6f7a8b>\d{2,4})";
        let rendered = map.render(technical);
        assert_eq!(
            rendered,
            r"(?<Giorno>\d{1,2})[/-](?<Mese>\d{1,2})[/-](?<Anno>\d{2,4})"
        );
        assert_eq!(map.normalize(&rendered).unwrap(), technical);
    }

    // === Scenario: colliding labels are numbered in order ===
    #[test]
    fn colliding_labels_are_suffixed_in_order() {
        let map = IdentifierLabelMap::build([
            ("g_aaaaaaaaaaaa", "Data"),
            ("g_bbbbbbbbbbbb", "Data"),
            ("g_cccccccccccc", "Data"),
        ]);
        assert_eq!(map.label_for("g_aaaaaaaaaaaa"), Some("Data"));
        assert_eq!(map.label_for("g_bbbbbbbbbbbb"), Some("Data_1"));
        assert_eq!(map.label_for("g_cccccccccccc"), Some("Data_2"));
        assert_eq!(map.labels(), &["Data", "Data_1", "Data_2"]);
    }

    #[test]
    fn suffix_skips_labels_already_taken() {
        let map = IdentifierLabelMap::build([
            ("g_aaaaaaaaaaaa", "Data"),
            ("g_bbbbbbbbbbbb", "Data_1"),
            ("g_cccccccccccc", "Data"),
        ]);
        assert_eq!(map.label_for("g_bbbbbbbbbbbb"), Some("Data_1"));
        assert_eq!(map.label_for("g_cccccccccccc"), Some("Data_2"));
    }

    #[test]
    fn collision_round_trip() {
        let map = IdentifierLabelMap::build([
            ("g_aaaaaaaaaaaa", "Data"),
            ("g_bbbbbbbbbbbb", "Data"),
        ]);
        let p = r"(?<g_aaaaaaaaaaaa>\d+)-(?<g_bbbbbbbbbbbb>\d+)";
        let rendered = map.render(p);
        assert_eq!(rendered, r"(?<Data>\d+)-(?<Data_1>\d+)");
        assert_eq!(map.normalize(&rendered).unwrap(), p);
    }

    #[test]
    fn sanitize_replaces_and_prefixes() {
        assert_eq!(sanitize_label("Data di nascita"), "Data_di_nascita");
        assert_eq!(sanitize_label("città"), "citt_");
        assert_eq!(sanitize_label("1st"), "_1st");
        assert_eq!(sanitize_label(""), "_");
    }

    #[test]
    fn invalid_identifiers_are_skipped() {
        let map = IdentifierLabelMap::build([("day", "Giorno"), (MONTH, "Mese")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.id_for("Giorno"), None);
        assert_eq!(map.render("(?<day>\\d+)"), "(?<day>\\d+)");
    }

    #[test]
    fn render_leaves_unknown_and_absent_names() {
        let map = date_map();
        let p = r"(?<g_ffffffffffff>\d+)(?:x)(?<=a)(?<!b)\d";
        assert_eq!(map.render(p), p);
    }

    #[test]
    fn render_with_empty_map_or_pattern_is_identity() {
        let empty = IdentifierLabelMap::default();
        assert_eq!(empty.render("(?<g_1a2b3c4d5e6f>x)"), "(?<g_1a2b3c4d5e6f>x)");
        assert_eq!(date_map().render(""), "");
    }

    #[test]
    fn round_trip_without_named_groups() {
        let map = date_map();
        let p = r"(\d+)(?:abc)(?i)x(?=y)";
        assert_eq!(map.normalize(&map.render(p)).unwrap(), p);
    }

    #[test]
    fn normalize_rejects_invented_names() {
        let map = date_map();
        let err = map
            .normalize(r"(?<Giorno>\d+)/(?<Settimana>\d+)/(?<Ora>\d+)")
            .unwrap_err();
        match err {
            TransformError::UnrecognizedGroupName { names, valid_labels } => {
                assert_eq!(names, vec!["Settimana", "Ora"]);
                assert_eq!(valid_labels, vec!["Giorno", "Mese", "Anno"]);
            }
        }
    }

    #[test]
    fn normalize_rejects_invented_names_in_p_syntax() {
        let map = date_map();
        let err = map.normalize(r"(?<Giorno>\d{1,2})/(?P<Week>\d{1,2})").unwrap_err();
        assert_eq!(
            err,
            TransformError::UnrecognizedGroupName {
                names: vec!["Week".to_string()],
                valid_labels: vec!["Giorno".to_string(), "Mese".to_string(), "Anno".to_string()],
            }
        );
    }

    #[test]
    fn normalize_rejects_names_with_punctuation() {
        let map = date_map();
        let err = map.normalize(r"(?<Giorno>\d{1,2})/(?<Mese.x>\d{1,2})").unwrap_err();
        match err {
            TransformError::UnrecognizedGroupName { names, .. } => {
                assert_eq!(names, vec!["Mese.x"]);
            }
        }
        assert!(map.normalize(r"(?<Anno[0]>\d{4})").is_err());
    }

    #[test]
    fn p_syntax_round_trips_and_keeps_its_marker() {
        let map = date_map();
        let p = r"(?P<g_1a2b3c4d5e6f>\d{1,2})/(?<g_2b3c4d5e6f7a>\d{1,2})";
        let rendered = map.render(p);
        assert_eq!(rendered, r"(?P<Giorno>\d{1,2})/(?<Mese>\d{1,2})");
        assert_eq!(map.normalize(&rendered).unwrap(), p);
        assert!(IdentifierLabelMap::has_technical_names(r"(?P<g_1a2b3c4d5e6f>\d+)"));
        assert_eq!(group_names(&rendered), vec!["Giorno", "Mese"]);
    }

    #[test]
    fn normalize_error_message_lists_labels() {
        let map = date_map();
        let msg = map.normalize(r"(?<Week>\d+)").unwrap_err().to_string();
        assert!(msg.contains("Week"));
        assert!(msg.contains("Giorno, Mese, Anno"));
    }

    #[test]
    fn normalize_accepts_technical_names_left_in_place() {
        let map = date_map();
        let p = r"(?<Giorno>\d+)(?<g_ffffffffffff>\d+)";
        assert_eq!(
            map.normalize(p).unwrap(),
            r"(?<g_1a2b3c4d5e6f>\d+)(?<g_ffffffffffff>\d+)"
        );
    }

    #[test]
    fn detects_technical_names() {
        assert!(IdentifierLabelMap::has_technical_names(r"(?<g_1a2b3c4d5e6f>\d+)"));
        assert!(!IdentifierLabelMap::has_technical_names(r"(?<Giorno>\d+)"));
        assert!(!IdentifierLabelMap::has_technical_names(r"\d+"));
    }
}
