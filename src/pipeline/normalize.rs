//! Built-in normalization rules
//!
//! Rules are recognized by keywords in the free-text rule; unrecognized
//! rules leave values unchanged.

use crate::contract::SemanticContract;
use crate::engine::FieldValues;

/// English and Italian month names and abbreviations, indexed by month - 1.
const MONTH_NAMES: [&[&str]; 12] = [
    &["january", "jan", "gennaio", "gen"],
    &["february", "feb", "febbraio"],
    &["march", "mar", "marzo"],
    &["april", "apr", "aprile"],
    &["may", "maggio", "mag"],
    &["june", "jun", "giugno", "giu"],
    &["july", "jul", "luglio", "lug"],
    &["august", "aug", "agosto", "ago"],
    &["september", "sep", "sept", "settembre", "set"],
    &["october", "oct", "ottobre", "ott"],
    &["november", "nov", "novembre"],
    &["december", "dec", "dicembre", "dic"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationRule {
    /// Two-digit years: < 50 → 20xx, ≥ 50 → 19xx
    YearFourDigits,
    /// Month names → 1..12, else integer parse
    MonthNumeric,
    /// Integer parse
    DayNumeric,
}

impl NormalizationRule {
    pub fn recognize(rule: &str) -> Option<Self> {
        let rule = rule.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| rule.contains(w));

        if has(&["year", "anno"]) && has(&["4", "four", "quattro"]) {
            Some(Self::YearFourDigits)
        } else if has(&["month", "mese"]) && has(&["numer"]) {
            Some(Self::MonthNumeric)
        } else if has(&["day", "giorno"]) && has(&["numer"]) {
            Some(Self::DayNumeric)
        } else {
            None
        }
    }

    pub fn apply(&self, value: &str) -> String {
        let trimmed = value.trim();
        match self {
            Self::YearFourDigits => {
                if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_digit()) {
                    if let Ok(n) = trimmed.parse::<u32>() {
                        let full = if n < 50 { 2000 + n } else { 1900 + n };
                        return full.to_string();
                    }
                }
                value.to_string()
            }
            Self::MonthNumeric => {
                let key = trimmed.trim_end_matches('.').to_lowercase();
                if let Some(idx) = MONTH_NAMES.iter().position(|names| names.contains(&key.as_str())) {
                    return (idx + 1).to_string();
                }
                parse_int(trimmed).unwrap_or_else(|| value.to_string())
            }
            Self::DayNumeric => parse_int(trimmed).unwrap_or_else(|| value.to_string()),
        }
    }
}

fn parse_int(s: &str) -> Option<String> {
    s.parse::<i64>().ok().map(|n| n.to_string())
}

fn apply_rule(rule: &str, value: &str) -> String {
    match NormalizationRule::recognize(rule) {
        Some(r) => r.apply(value),
        None => value.to_string(),
    }
}

/// Apply subentity rules to their fields, and the contract-level rule to
/// every value of a single-value contract.
pub fn normalize_values(contract: &SemanticContract, raw: &FieldValues) -> FieldValues {
    let mut values = raw.clone();

    for sub in &contract.subentities {
        let Some(rule) = &sub.normalization else {
            continue;
        };
        if let Some(v) = values.get_mut(&sub.field_id) {
            *v = apply_rule(rule, v);
        }
    }

    if contract.subentities.is_empty() {
        if let Some(rule) = &contract.normalization {
            for v in values.values_mut() {
                *v = apply_rule(rule, v);
            }
        }
    }

    values
}
