pub use crate::datasource::postgres::Postgres;
pub use crate::sql::chunk::Chunk;
pub use crate::sql::expression::{Expression, ExpressionArc, WrapArc};
pub use crate::sql::json::{Json, JsonExpression};
pub use crate::sql::jsonb::{Jsonb, JsonbExpression};
pub use crate::sql::scalar::{IntExpression, TextExpression};
pub use crate::sql::Condition;
pub use crate::{expr, expr_arc};
