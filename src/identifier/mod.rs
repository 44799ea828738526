//! Field identifiers and the identifier ↔ label transform
//!
//! Patterns are stored with opaque technical group names (`g_` + 12 hex
//! digits). Human editors see sanitized labels instead; the transform maps
//! between the two and refuses edits that invent new group names.

mod field_id;
mod transform;

pub use field_id::{is_field_id, FieldId, InvalidFieldId};
pub use transform::{group_names, sanitize_label, IdentifierLabelMap, TransformError};
