use thiserror::Error;

use crate::domain::Family;
use crate::types::Var;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Value {value} is outside the domain [0, {bound})")]
    InvalidDomainValue { value: u32, bound: u64 },

    #[error("Domain size {size} is not supported (expected 1..=2^16)")]
    InvalidDomainSize { size: u32 },

    #[error("BDD {field} of {bits} bits is not supported (expected 0..=31)")]
    InvalidBddConfig { field: &'static str, bits: usize },

    #[error("Auxiliary variable {var} is already free in a composed relation")]
    VariableCollision { var: Var },

    #[error("Expected a set over the {expected} family, found one over {found}")]
    FamilyMismatch { expected: Family, found: Family },

    #[error("Set over the {family} family depends on {var}, which lies outside it")]
    ForeignVariable { var: Var, family: Family },

    #[error("Graph has no edge rule to build a relation from")]
    EmptyRelation,

    #[error("Restriction under a full assignment did not reduce to a constant")]
    NonConstantRestriction,

    #[error("Fixpoint did not converge within {limit} iterations")]
    IterationLimit { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
