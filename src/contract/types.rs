//! Contract data model

use crate::identifier::{FieldId, InvalidFieldId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("duplicate field id in contract: {0}")]
    DuplicateFieldId(String),

    #[error("output shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("operation forbidden by design: {operation} (contracts must stay deterministic)")]
    ForbiddenByDesign { operation: &'static str },
}

/// Categorized examples attached to a constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintExamples {
    #[serde(default)]
    pub valid: Vec<String>,
    #[serde(default)]
    pub invalid: Vec<String>,
    #[serde(default)]
    pub edge: Vec<String>,
}

impl ConstraintExamples {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.invalid.is_empty() && self.edge.is_empty()
    }
}

/// Structured constraint on a single value. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<ConstraintExamples>,
}

impl StructuredConstraint {
    /// A constraint is non-empty when any of its fields is present.
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
            && self.max.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.formats.is_none()
            && self.pattern.is_none()
            && self.required.is_none()
            && self.examples.is_none()
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }
}

/// The entity a contract describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub description: String,
}

impl EntityDescriptor {
    pub fn new(label: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entity_type: entity_type.into(),
            description: String::new(),
        }
    }
}

/// One named field of a composite entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subentity {
    pub field_id: String,
    pub label: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<StructuredConstraint>,
}

impl Subentity {
    pub fn new(
        field_id: impl Into<String>,
        label: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
            meaning: meaning.into(),
            value_type: None,
            optional: false,
            formats: None,
            normalization: None,
            constraints: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_normalization(mut self, rule: impl Into<String>) -> Self {
        self.normalization = Some(rule.into());
        self
    }

    pub fn with_constraints(mut self, constraints: StructuredConstraint) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// The structured constraint, if present and non-empty.
    pub fn structured_constraint(&self) -> Option<&StructuredConstraint> {
        self.constraints.as_ref().filter(|c| !c.is_empty())
    }

    pub fn is_required(&self) -> bool {
        !self.optional || self.constraints.as_ref().is_some_and(|c| c.is_required())
    }
}

/// How repeated mentions of the same field are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedefinitionPolicy {
    #[default]
    LastWins,
    FirstWins,
    ExplicitCorrection,
    Accumulate,
}

/// Output shape: a single scalar, or an object with ordered keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputShape {
    Value,
    Object { keys: Vec<String> },
}

/// Declarative description of what to extract and how to shape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticContract {
    pub entity: EntityDescriptor,
    #[serde(default)]
    pub subentities: Vec<Subentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<StructuredConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<String>,
    #[serde(default)]
    pub redefinition_policy: RedefinitionPolicy,
    pub output: OutputShape,
}

impl SemanticContract {
    /// A single-value contract with no subentities.
    pub fn value(entity: EntityDescriptor) -> Self {
        Self {
            entity,
            subentities: Vec::new(),
            constraints: None,
            normalization: None,
            redefinition_policy: RedefinitionPolicy::default(),
            output: OutputShape::Value,
        }
    }

    /// A composite contract whose output keys follow subentity order.
    pub fn object(entity: EntityDescriptor, subentities: Vec<Subentity>) -> Self {
        let keys = subentities.iter().map(|s| s.field_id.clone()).collect();
        Self {
            entity,
            subentities,
            constraints: None,
            normalization: None,
            redefinition_policy: RedefinitionPolicy::default(),
            output: OutputShape::Object { keys },
        }
    }

    pub fn with_constraints(mut self, constraints: StructuredConstraint) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_normalization(mut self, rule: impl Into<String>) -> Self {
        self.normalization = Some(rule.into());
        self
    }

    pub fn subentity(&self, field_id: &str) -> Option<&Subentity> {
        self.subentities.iter().find(|s| s.field_id == field_id)
    }

    /// Output keys used for coverage: the object key list, falling back to
    /// subentity ids.
    pub fn expected_keys(&self) -> Vec<&str> {
        match &self.output {
            OutputShape::Object { keys } if !keys.is_empty() => {
                keys.iter().map(String::as_str).collect()
            }
            _ => self.subentities.iter().map(|s| s.field_id.as_str()).collect(),
        }
    }

    /// Subentity ids that are not technical field ids. Such fields still
    /// extract, but never get a label in rendered patterns.
    pub fn invalid_field_ids(&self) -> Vec<InvalidFieldId> {
        self.subentities
            .iter()
            .filter_map(|s| FieldId::parse(s.field_id.as_str()).err())
            .collect()
    }

    /// Verify field ids are unique and the output shape agrees with the
    /// subentity list.
    pub fn check(&self) -> Result<(), ContractError> {
        let mut seen = HashSet::new();
        for sub in &self.subentities {
            if !seen.insert(sub.field_id.as_str()) {
                return Err(ContractError::DuplicateFieldId(sub.field_id.clone()));
            }
        }

        match &self.output {
            OutputShape::Value if !self.subentities.is_empty() => Err(ContractError::ShapeMismatch(
                format!("value shape with {} subentities", self.subentities.len()),
            )),
            OutputShape::Object { keys } => {
                let ids: Vec<&str> = self.subentities.iter().map(|s| s.field_id.as_str()).collect();
                if keys.iter().map(String::as_str).eq(ids.iter().copied()) {
                    Ok(())
                } else {
                    Err(ContractError::ShapeMismatch(format!(
                        "object keys {:?} differ from subentity ids {:?}",
                        keys, ids
                    )))
                }
            }
            OutputShape::Value => Ok(()),
        }
    }
}
