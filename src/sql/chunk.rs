use std::fmt::Debug;

use rust_decimal::Decimal;
use serde_json::{to_value, Value};

use crate::sql::Expression;

/// A `Chunk` is anything that can render itself into an [`Expression`]:
/// an SQL template plus the parameters that must travel with it.
///
/// Scalars render as a single bound parameter. The typed JSON expressions
/// and [`Condition`] render their full operator template. Chunks nest: an
/// `->` fragment built over another `->` fragment splices into one template
/// with the parameters of both, in order.
///
/// ```rust
/// let doc: JsonbExpression = Jsonb::from(r#"{"a":{"b":1}}"#).into();
/// let b = doc.field_by_key("a").field_by_key("b");
///
/// let (sql, params) = b.render_chunk().split();
/// // sql:    "{}::jsonb -> {}::text -> {}::text"
/// // params: [r#"{"a":{"b":1}}"#, "a", "b"]
/// ```
///
/// [`Condition`]: super::Condition
pub trait Chunk: Debug + Sync + Send {
    fn render_chunk(&self) -> Expression;
}

impl Chunk for String {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::String(self.clone())])
    }
}

impl Chunk for &str {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::String(self.to_string())])
    }
}

impl Chunk for Value {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![self.clone()])
    }
}

impl Chunk for i64 {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::Number((*self).into())])
    }
}

impl Chunk for u64 {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::Number((*self).into())])
    }
}

impl Chunk for i32 {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::Number((*self).into())])
    }
}

impl Chunk for u32 {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::Number((*self).into())])
    }
}

impl Chunk for bool {
    fn render_chunk(&self) -> Expression {
        Expression::new("{}".to_owned(), vec![Value::Bool(*self)])
    }
}

impl Chunk for Decimal {
    fn render_chunk(&self) -> Expression {
        let f = to_value(self).unwrap();
        Expression::new("{}".to_owned(), vec![f])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_chunk() {
        let s = "Hello, json world!".to_owned();
        let (sql, params) = s.render_chunk().split();

        assert_eq!(sql, "{}");
        assert_eq!(params, vec![json!("Hello, json world!")]);
    }

    #[test]
    fn test_int_chunk() {
        let (sql, params) = (-2_i32).render_chunk().split();

        assert_eq!(sql, "{}");
        assert_eq!(params, vec![json!(-2)]);
    }

    #[test]
    fn test_join_rendered_chunks() {
        let a = "a".render_chunk();
        let b = 10.render_chunk();

        let join = Expression::from_vec(vec![a, b], ", ");

        assert_eq!(join.sql(), "{}, {}");
        assert_eq!(join.sql_final(), "$1, $2");
        assert_eq!(*join.params(), vec![json!("a"), json!(10)]);
    }
}
