//! Contract refinement entry points
//!
//! Contracts are authored deterministically. Bulk refinement and
//! AI-generated constraints are kept as entry points only so callers get an
//! explicit error instead of a missing function.

use super::types::{ContractError, SemanticContract, StructuredConstraint};

/// Rewrite a contract from free-form instructions. Always fails.
pub fn refine_contract(
    contract: &SemanticContract,
    _instructions: &str,
) -> Result<SemanticContract, ContractError> {
    tracing::warn!(entity = %contract.entity.label, "contract refinement requested");
    Err(ContractError::ForbiddenByDesign {
        operation: "refine_contract",
    })
}

/// Generate constraints for every subentity. Always fails.
pub fn generate_constraints(
    contract: &SemanticContract,
) -> Result<Vec<(String, StructuredConstraint)>, ContractError> {
    tracing::warn!(entity = %contract.entity.label, "constraint generation requested");
    Err(ContractError::ForbiddenByDesign {
        operation: "generate_constraints",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::EntityDescriptor;

    #[test]
    fn refinement_is_forbidden() {
        let c = SemanticContract::value(EntityDescriptor::new("Email", "email"));
        assert_eq!(
            refine_contract(&c, "make it stricter"),
            Err(ContractError::ForbiddenByDesign {
                operation: "refine_contract"
            })
        );
    }

    #[test]
    fn constraint_generation_is_forbidden() {
        let c = SemanticContract::value(EntityDescriptor::new("Email", "email"));
        let err = generate_constraints(&c).unwrap_err();
        assert!(err.to_string().contains("forbidden by design"));
    }
}
