//! SQL building blocks for the json/jsonb operator DSL.
//!
//! [`Expression`] is a `{}`-placeholder template with positional parameters.
//! [`Chunk`] is implemented by anything that can render itself into an
//! [`Expression`], including the typed wrappers in [`json`], [`jsonb`] and
//! [`scalar`]. Boolean operators produce a [`Condition`].

/// [`Chunk`] trait for anything that renders into an SQL fragment
pub mod chunk;

/// [`Condition`] struct for boolean operator results, composable with AND/OR
pub mod condition;

pub mod expression;

/// `json` value wrapper and operator methods
pub mod json;

/// `jsonb` value wrapper and operator methods
pub mod jsonb;

/// Text and integer result expressions shared by both JSON types
pub mod scalar;

pub use chunk::Chunk;
pub use condition::Condition;
pub use expression::Expression;
pub use expression::ExpressionArc;
pub use expression::WrapArc;
