//! Confidence scoring from extracted-key coverage

use crate::contract::SemanticContract;
use crate::engine::FieldValues;

/// Confidence levels assigned by coverage band.
pub mod thresholds {
    /// Validation failed.
    pub const INVALID: f32 = 0.0;
    /// Less than half of the expected keys.
    pub const PARTIAL: f32 = 0.5;
    /// At least half of the expected keys.
    pub const MOSTLY: f32 = 0.7;
    /// Every expected key.
    pub const COMPLETE: f32 = 0.95;
    /// Contract expects no particular keys, and something was extracted.
    pub const UNSHAPED: f32 = 0.9;
}

pub fn score_confidence(contract: &SemanticContract, values: &FieldValues, valid: bool) -> f32 {
    if !valid {
        return thresholds::INVALID;
    }

    let expected = contract.expected_keys().len();
    if expected == 0 {
        return if values.is_empty() {
            thresholds::INVALID
        } else {
            thresholds::UNSHAPED
        };
    }

    let coverage = values.len() as f32 / expected as f32;
    if coverage >= 1.0 {
        thresholds::COMPLETE
    } else if coverage >= 0.5 {
        thresholds::MOSTLY
    } else {
        thresholds::PARTIAL
    }
}
