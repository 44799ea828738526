//! Semantic contracts
//!
//! A contract declares which fields to extract for an entity, how each
//! value is normalized and constrained, and the shape of the output.

mod refine;
mod types;

pub use refine::{generate_constraints, refine_contract};
pub use types::{
    ConstraintExamples, ContractError, EntityDescriptor, OutputShape, RedefinitionPolicy,
    SemanticContract, StructuredConstraint, Subentity,
};
