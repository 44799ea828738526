//! Validation: required fields, structured constraints, range heuristics

use crate::contract::{SemanticContract, StructuredConstraint};
use crate::engine::FieldValues;
use regex::Regex;

fn present<'a>(values: &'a FieldValues, field: &str) -> Option<&'a str> {
    values
        .get(field)
        .map(|v| v.as_str())
        .filter(|v| !v.trim().is_empty())
}

/// Check `value` against every rule of a structured constraint.
fn check_constraint(
    label: &str,
    value: &str,
    constraint: &StructuredConstraint,
    errors: &mut Vec<String>,
) {
    // Numeric bounds only apply to values that parse as numbers.
    if let Ok(n) = value.trim().parse::<f64>() {
        if let Some(min) = constraint.min {
            if n < min {
                errors.push(format!("{}: value {} is below minimum {}", label, value, min));
            }
        }
        if let Some(max) = constraint.max {
            if n > max {
                errors.push(format!("{}: value {} is above maximum {}", label, value, max));
            }
        }
    }

    let len = value.chars().count();
    if let Some(min_len) = constraint.min_length {
        if len < min_len {
            errors.push(format!(
                "{}: length {} of '{}' is below minimum length {}",
                label, len, value, min_len
            ));
        }
    }
    if let Some(max_len) = constraint.max_length {
        if len > max_len {
            errors.push(format!(
                "{}: length {} of '{}' is above maximum length {}",
                label, len, value, max_len
            ));
        }
    }

    if let Some(pattern) = &constraint.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(value) => {
                errors.push(format!(
                    "{}: value '{}' does not match pattern {}",
                    label, value, pattern
                ));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(%label, %pattern, error = %e, "constraint pattern does not compile, skipping");
            }
        }
    }
}

/// Range checks for date parts when no structured constraint is given.
fn check_heuristic_range(field_id: &str, label: &str, value: &str, errors: &mut Vec<String>) {
    let id = field_id.to_lowercase();
    let range = if id.contains("day") {
        Some(("day", 1, 31))
    } else if id.contains("month") {
        Some(("month", 1, 12))
    } else if id.contains("year") {
        Some(("year", 1900, 2100))
    } else {
        None
    };

    let Some((part, lo, hi)) = range else {
        return;
    };
    if let Ok(n) = value.trim().parse::<i64>() {
        if n < lo || n > hi {
            errors.push(format!(
                "{}: {} {} outside range {}-{}",
                label, part, value, lo, hi
            ));
        }
    }
}

/// Validate normalized values against the contract, returning one
/// human-readable error per violated rule.
pub fn validate(contract: &SemanticContract, values: &FieldValues) -> Vec<String> {
    let mut errors = Vec::new();

    for sub in &contract.subentities {
        let Some(value) = present(values, &sub.field_id) else {
            if sub.is_required() {
                errors.push(format!(
                    "missing required field: {} ({})",
                    sub.label, sub.field_id
                ));
            }
            continue;
        };

        match sub.structured_constraint() {
            Some(constraint) => check_constraint(&sub.label, value, constraint, &mut errors),
            None => check_heuristic_range(&sub.field_id, &sub.label, value, &mut errors),
        }
    }

    if contract.subentities.is_empty() {
        if let Some(constraint) = contract.constraints.as_ref().filter(|c| !c.is_empty()) {
            let label = &contract.entity.label;
            if constraint.is_required() && values.values().all(|v| v.trim().is_empty()) {
                errors.push(format!("missing required field: {}", label));
            }
            for value in values.values().filter(|v| !v.trim().is_empty()) {
                check_constraint(label, value, constraint, &mut errors);
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{EntityDescriptor, Subentity};

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let contract = SemanticContract::object(
            EntityDescriptor::new("Person", "name"),
            vec![
                Subentity::new("g_aaaaaaaaaaaa", "Nome", "first name"),
                Subentity::new("g_bbbbbbbbbbbb", "Secondo nome", "middle name").optional(),
            ],
        );
        let errors = validate(&contract, &values(&[("g_aaaaaaaaaaaa", "  ")]));
        assert_eq!(errors, vec!["missing required field: Nome (g_aaaaaaaaaaaa)"]);
    }

    #[test]
    fn constraint_violations_report_value_and_bound() {
        let contract = SemanticContract::object(
            EntityDescriptor::new("Code", "code"),
            vec![Subentity::new("g_aaaaaaaaaaaa", "Codice", "").with_constraints(
                StructuredConstraint::default()
                    .with_range(1.0, 99.0)
                    .with_length(1, 2)
                    .with_pattern(r"^\d+$"),
            )],
        );
        let errors = validate(&contract, &values(&[("g_aaaaaaaaaaaa", "120")]));
        assert_eq!(
            errors,
            vec![
                "Codice: value 120 is above maximum 99",
                "Codice: length 3 of '120' is above maximum length 2",
            ]
        );

        let errors = validate(&contract, &values(&[("g_aaaaaaaaaaaa", "x")]));
        assert_eq!(errors, vec!["Codice: value 'x' does not match pattern ^\\d+$"]);
    }

    #[test]
    fn heuristics_apply_without_constraints() {
        let contract = SemanticContract::object(
            EntityDescriptor::new("Date", "date"),
            vec![
                Subentity::new("day", "Giorno", ""),
                Subentity::new("month", "Mese", ""),
                Subentity::new("year", "Anno", ""),
            ],
        );
        let errors = validate(
            &contract,
            &values(&[("day", "32"), ("month", "12"), ("year", "1850")]),
        );
        assert_eq!(
            errors,
            vec![
                "Giorno: day 32 outside range 1-31",
                "Anno: year 1850 outside range 1900-2100",
            ]
        );
    }

    #[test]
    fn structured_constraint_replaces_heuristic() {
        let contract = SemanticContract::object(
            EntityDescriptor::new("Date", "date"),
            vec![Subentity::new("day", "Giorno", "")
                .with_constraints(StructuredConstraint::default().with_range(1.0, 40.0))],
        );
        assert!(validate(&contract, &values(&[("day", "35")])).is_empty());
    }

    #[test]
    fn value_contract_uses_contract_constraints() {
        let contract = SemanticContract::value(EntityDescriptor::new("Email", "email"))
            .with_constraints(StructuredConstraint::default().with_pattern(r"^[^@\s]+@[^@\s]+$"));
        assert!(validate(&contract, &values(&[("value", "a@b.it")])).is_empty());
        assert_eq!(validate(&contract, &values(&[("value", "nope")])).len(), 1);
    }
}
