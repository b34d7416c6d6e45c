use std::fmt;

use serde_json::{json, Value};

use crate::expr_arc;
use crate::sql::chunk::Chunk;
use crate::sql::expression::{Expression, ExpressionArc};
use crate::sql::scalar::{IntExpression, TextExpression};

/// JSON text destined for a PostgreSQL `json` column or cast.
///
/// The payload is stored verbatim and is not parsed or validated here;
/// malformed JSON is only rejected by the database when the statement
/// executes. Equality and ordering are plain payload equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Json(String);

impl Json {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Json {
    fn from(payload: &str) -> Self {
        Self(payload.to_string())
    }
}

impl From<String> for Json {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl AsRef<str> for Json {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deferred SQL fragment yielding `json`.
///
/// Built from a [`Json`] value (bound as a `{}::json` parameter), a column
/// reference, or by applying one of the operator methods below to an
/// existing fragment. Every method returns a new expression; nothing is
/// validated locally, so out-of-range indexes and empty paths are handed to
/// the database as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonExpression {
    expression: Expression,
}

impl From<Json> for JsonExpression {
    fn from(json: Json) -> Self {
        Self::new(Expression::as_type(Value::String(json.0), "json"))
    }
}

impl Chunk for JsonExpression {
    fn render_chunk(&self) -> Expression {
        self.expression.clone()
    }
}

impl JsonExpression {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// Bound `{}::json` parameter for a JSON string. The string is not
    /// validated.
    pub fn value(json: impl Into<Json>) -> Self {
        Self::from(json.into())
    }

    /// Reference to a `json` table column. The name is rendered into the
    /// template verbatim.
    pub fn column(name: &str) -> Self {
        Self::new(Expression::new(name.to_string(), vec![]))
    }

    /// Array element by zero-based index using `->`. Negative indexes count
    /// from the end of the array.
    pub fn array_element(&self, index: i32) -> JsonExpression {
        JsonExpression::new(
            expr_arc!(
                "{} -> {}",
                self.render_chunk(),
                Expression::as_type(json!(index), "int")
            )
            .render_chunk(),
        )
    }

    /// Array element as `text` rather than `json`, using `->>`.
    pub fn array_element_text(&self, index: i32) -> TextExpression {
        TextExpression::new(
            expr_arc!(
                "{} ->> {}",
                self.render_chunk(),
                Expression::as_type(json!(index), "int")
            )
            .render_chunk(),
        )
    }

    /// Object field by key using `->`.
    pub fn field_by_key(&self, key: &str) -> JsonExpression {
        JsonExpression::new(
            expr_arc!(
                "{} -> {}",
                self.render_chunk(),
                Expression::as_type(json!(key), "text")
            )
            .render_chunk(),
        )
    }

    /// Object field as `text` rather than `json`, using `->>`.
    pub fn field_by_key_text(&self, key: &str) -> TextExpression {
        TextExpression::new(
            expr_arc!(
                "{} ->> {}",
                self.render_chunk(),
                Expression::as_type(json!(key), "text")
            )
            .render_chunk(),
        )
    }

    /// Object at the given path using `#>`. An empty path is passed through
    /// to the database untouched.
    pub fn object_at_path<I, S>(&self, path: I) -> JsonExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonExpression::new(
            expr_arc!("{} #> {}", self.render_chunk(), Expression::text_array(path))
                .render_chunk(),
        )
    }

    /// Object at the given path as `text`, using `#>>`.
    pub fn object_at_path_text<I, S>(&self, path: I) -> TextExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextExpression::new(
            expr_arc!("{} #>> {}", self.render_chunk(), Expression::text_array(path))
                .render_chunk(),
        )
    }

    /// Number of elements in the outermost array, `json_array_length`.
    pub fn array_length(&self) -> IntExpression {
        IntExpression::new(
            ExpressionArc::fx("json_array_length", vec![self.render_chunk()]).render_chunk(),
        )
    }

    /// `json_extract_path`, equivalent to `#>`.
    pub fn extract_path<I, S>(&self, path: I) -> JsonExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonExpression::new(
            expr_arc!(
                "json_extract_path({}, VARIADIC {})",
                self.render_chunk(),
                Expression::text_array(path)
            )
            .render_chunk(),
        )
    }

    /// `json_extract_path_text`, equivalent to `#>>`.
    pub fn extract_path_text<I, S>(&self, path: I) -> TextExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextExpression::new(
            expr_arc!(
                "json_extract_path_text({}, VARIADIC {})",
                self.render_chunk(),
                Expression::text_array(path)
            )
            .render_chunk(),
        )
    }

    /// Type of the outermost value as text (`object`, `array`, `string`,
    /// `number`, `boolean` or `null`), `json_typeof`.
    pub fn type_of(&self) -> TextExpression {
        TextExpression::new(
            ExpressionArc::fx("json_typeof", vec![self.render_chunk()]).render_chunk(),
        )
    }

    /// Document with all object fields that have `null` values omitted,
    /// `json_strip_nulls`. Nulls inside arrays are untouched.
    pub fn strip_nulls(&self) -> JsonExpression {
        JsonExpression::new(
            ExpressionArc::fx("json_strip_nulls", vec![self.render_chunk()]).render_chunk(),
        )
    }
}
