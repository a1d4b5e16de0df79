//! # Indicator Expression Engine
//!
//! This crate computes numeric results for health-indicator and
//! validation-rule formulas written in a small expression language
//! embedded in stored text. A formula mixes literal arithmetic with
//! symbolic references to measured data:
//!
//! ```text
//! #{fbfb3f.Gx1}    value of a data element at one category-option combo
//! #{fbfb3f}        total: the data element summed across all its combos
//! C{penta1}        a named constant
//! OUG{rural}       member count of an organisation-unit group
//! [days]           days in the reporting period
//! ```
//!
//! ## Operations
//!
//! - **Validate** - check every reference against a known identifier
//!   universe; failures are returned as typed
//!   [`Violation`](atrius_indicator_support::Violation) values.
//! - **Describe** - render the formula with display names for audit and
//!   UI; fails fast on any unresolved reference.
//! - **Explode** - rewrite total references into explicit per-combo sums
//!   ahead of repeated evaluation.
//! - **Generate** - substitute concrete values for one evaluation
//!   context under a missing-value policy, yielding pure arithmetic text.
//! - **Evaluate** - run the arithmetic evaluator over generated text.
//!
//! All five are staged text rewrites over the same scanner (see
//! [`scanner`]): four sequential passes, one per reference grammar, each
//! a pure copy-and-replace that leaves non-reference text untouched.
//!
//! ## Usage
//!
//! ```rust
//! use atrius_indicator_expr::{EvaluationContext, IndicatorEngine, MetadataSnapshot};
//! use atrius_indicator_support::{DataElementOperand, IndicatorExpression, MissingValuePolicy};
//!
//! let snapshot = MetadataSnapshot::new()
//!     .with_data_element("anc1", "ANC first visit", ["fixed", "outreach"])
//!     .with_category_option_combo("fixed", "Fixed")
//!     .with_category_option_combo("outreach", "Outreach");
//! let engine = IndicatorEngine::from_snapshot(snapshot);
//!
//! let formula = "#{anc1.fixed}+#{anc1.outreach}";
//! assert!(engine.validate(formula).is_ok());
//!
//! let mut context = EvaluationContext::new();
//! context.set_value(DataElementOperand::value("anc1", "fixed"), 10.0);
//! context.set_value(DataElementOperand::value("anc1", "outreach"), 5.0);
//!
//! let expression = IndicatorExpression::new(formula, MissingValuePolicy::NeverSkip);
//! assert_eq!(engine.evaluate(&expression, &context), Some(15.0));
//! ```
//!
//! ## Concurrency
//!
//! The engine is stateless: every operation is a pure function of its
//! inputs and the injected providers. Bulk work is the caller's to
//! parallelize; [`batch`] offers rayon-backed helpers for the common
//! shapes.

pub mod arithmetic;
pub mod batch;
pub mod cli;
pub mod description;
pub mod engine;
pub mod error;
pub mod explode;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod period;
pub mod registry;
pub mod scanner;
pub mod server;
pub mod tokens;
pub mod validator;

// Re-export key types for library consumers
pub use engine::{EngineConfig, IndicatorEngine};
pub use error::{ExpressionError, ExpressionResult};
pub use explode::ExplodedCache;
pub use generator::EvaluationContext;
pub use period::ReportingPeriod;
pub use registry::MetadataSnapshot;
