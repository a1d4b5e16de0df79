//! # Indicator Expression Support Types
//!
//! This crate provides the foundational types shared between the indicator
//! expression engine and its consumers: the reference model for formula
//! tokens, the missing-value policy, validation outcomes, evaluation errors
//! and the provider traits through which the engine reaches metadata.
//!
//! ## Overview
//!
//! The support crate acts as the common vocabulary of the indicator stack:
//! - The engine crate depends on it for operand and error types.
//! - Callers implement the provider traits against their own metadata store
//!   (a live registry, or an in-memory snapshot for bulk work).
//! - Serialized forms (policies, operands, expressions) travel through the
//!   REST and CLI surfaces unchanged.
//!
//! ## Core Types
//!
//! - [`DataElementOperand`] - a (data element, category-option-combo)
//!   coordinate; the combo part is absent for *total* references
//! - [`ReferenceKind`] - the closed set of reference grammars
//! - [`MissingValuePolicy`] - governs substitution when referenced values
//!   are absent
//! - [`IndicatorExpression`] - formula text plus policy plus optional
//!   cached exploded text
//! - [`Violation`] - result-typed validation outcome
//! - [`EvaluationError`] - arithmetic evaluation failures
//! - [`DescriptionError`], [`ExplodeError`] - fail-fast contract errors

pub mod evaluation_error;
pub mod expression;
pub mod operand;
pub mod traits;
pub mod violation;

pub use evaluation_error::EvaluationError;
pub use expression::{IndicatorExpression, MissingValuePolicy};
pub use operand::{DataElementOperand, ReferenceKind};
pub use traits::{
    CategoryOptionComboProvider, ConstantProvider, DataElementProvider, OrgUnitGroupProvider,
};
pub use violation::{DescriptionError, ExplodeError, Violation};
