//! [`Expression`] and [`ExpressionArc`] structs for building SQL fragment templates
//!
//! There are two kinds of SQL fragments:
//! - [`Expression`]: a template with parameters of type [`serde_json::Value`].
//! - [`ExpressionArc`]: a template whose parameters are shared-ownership
//!   [`Chunk`]s, allowing fragments to nest into each other.
//!
//! [`ExpressionArc`] collapses into a flat [`Expression`] through
//! [`ExpressionArc::render_chunk()`].
//!
//! [`Chunk`]: super::chunk::Chunk

pub mod expression;
pub mod expression_arc;

pub use expression::Expression;
pub use expression_arc::ExpressionArc;
pub use expression_arc::WrapArc;
