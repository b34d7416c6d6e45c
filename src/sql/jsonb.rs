use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::expr_arc;
use crate::sql::chunk::Chunk;
use crate::sql::condition::Condition;
use crate::sql::expression::{Expression, ExpressionArc};
use crate::sql::scalar::{IntExpression, TextExpression};

/// JSON text destined for a PostgreSQL `jsonb` column or cast.
///
/// `jsonb` is normalised and indexable on the database side, which is also
/// where any validation happens: the payload is held here as an opaque
/// string, equal to another [`Jsonb`] iff the strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Jsonb(String);

impl Jsonb {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Jsonb {
    fn from(payload: &str) -> Self {
        Self(payload.to_string())
    }
}

impl From<String> for Jsonb {
    fn from(payload: String) -> Self {
        Self(payload)
    }
}

impl AsRef<str> for Jsonb {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Jsonb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deferred SQL fragment yielding `jsonb`.
///
/// Carries everything [`JsonExpression`] does, plus the operators only the
/// binary representation supports: containment, key existence, concatenation
/// and the `-` / `#-` delete family. Preconditions such as "top-level value
/// must be an array" for [`delete_element`] are left to the database and
/// surface as execution errors.
///
/// [`JsonExpression`]: super::json::JsonExpression
/// [`delete_element`]: JsonbExpression::delete_element
#[derive(Debug, Clone, PartialEq)]
pub struct JsonbExpression {
    expression: Expression,
}

impl From<Jsonb> for JsonbExpression {
    fn from(jsonb: Jsonb) -> Self {
        Self::new(Expression::as_type(Value::String(jsonb.0), "jsonb"))
    }
}

impl Chunk for JsonbExpression {
    fn render_chunk(&self) -> Expression {
        self.expression.clone()
    }
}

impl JsonbExpression {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// Bound `{}::jsonb` parameter for a JSON string. The string is not
    /// validated.
    pub fn value(jsonb: impl Into<Jsonb>) -> Self {
        Self::from(jsonb.into())
    }

    /// Reference to a `jsonb` table column. The name is rendered into the
    /// template verbatim.
    pub fn column(name: &str) -> Self {
        Self::new(Expression::new(name.to_string(), vec![]))
    }

    /// Array element by zero-based index using `->`. Negative indexes count
    /// from the end of the array.
    pub fn array_element(&self, index: i32) -> JsonbExpression {
        JsonbExpression::new(
            expr_arc!(
                "{} -> {}",
                self.render_chunk(),
                Expression::as_type(json!(index), "int")
            )
            .render_chunk(),
        )
    }

    /// Array element as `text` rather than `jsonb`, using `->>`.
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
    pub fn field_by_key(&self, key: &str) -> JsonbExpression {
        JsonbExpression::new(
            expr_arc!(
                "{} -> {}",
                self.render_chunk(),
                Expression::as_type(json!(key), "text")
            )
            .render_chunk(),
        )
    }

    /// Object field as `text` rather than `jsonb`, using `->>`.
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
    pub fn object_at_path<I, S>(&self, path: I) -> JsonbExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonbExpression::new(
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

    /// Does this document structurally contain the other's top-level
    /// path/value entries? Uses `@>`.
    pub fn contains(&self, other: &JsonbExpression) -> Condition {
        Condition::from_expression(
            self.render_chunk(),
            "@>",
            Arc::new(Box::new(other.clone())),
        )
    }

    /// Are this document's top-level path/value entries contained in the
    /// other? Uses `<@`.
    pub fn contained_in(&self, other: &JsonbExpression) -> Condition {
        Condition::from_expression(
            self.render_chunk(),
            "<@",
            Arc::new(Box::new(other.clone())),
        )
    }

    /// Does the string exist as a top-level object key, or equal a top-level
    /// array/scalar element? Uses `?`.
    pub fn has_key(&self, key: &str) -> Condition {
        Condition::from_expression(
            self.render_chunk(),
            "?",
            Arc::new(Box::new(Expression::as_type(json!(key), "text"))),
        )
    }

    /// Do any of the strings exist as top-level keys? Uses `?|`. An empty
    /// key set is vacuously false, by the database's definition.
    pub fn has_any_key<I, S>(&self, keys: I) -> Condition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::from_expression(
            self.render_chunk(),
            "?|",
            Arc::new(Box::new(Expression::text_array(keys))),
        )
    }

    /// Do all of the strings exist as top-level keys? Uses `?&`. An empty
    /// key set is vacuously true, by the database's definition.
    pub fn has_all_keys<I, S>(&self, keys: I) -> Condition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Condition::from_expression(
            self.render_chunk(),
            "?&",
            Arc::new(Box::new(Expression::text_array(keys))),
        )
    }

    /// Concatenation of two documents with `||`: arrays are appended, and
    /// for objects the right side wins on key collision.
    pub fn concat(&self, other: &JsonbExpression) -> JsonbExpression {
        JsonbExpression::new(
            expr_arc!("{} || {}", self.render_chunk(), other.render_chunk()).render_chunk(),
        )
    }

    /// Document with the key (or string array element) removed, using `-`.
    pub fn delete(&self, key_or_element: &str) -> JsonbExpression {
        JsonbExpression::new(
            expr_arc!(
                "{} - {}",
                self.render_chunk(),
                Expression::as_type(json!(key_or_element), "text")
            )
            .render_chunk(),
        )
    }

    /// Document with all listed keys (or string array elements) removed,
    /// using `-` with a `text[]` operand.
    pub fn delete_all<I, S>(&self, keys_or_elements: I) -> JsonbExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonbExpression::new(
            expr_arc!(
                "{} - {}",
                self.render_chunk(),
                Expression::text_array(keys_or_elements)
            )
            .render_chunk(),
        )
    }

    /// Document with the array element at the index removed, using `-`.
    /// Negative indexes count from the end; a non-array top level is a
    /// database error.
    pub fn delete_element(&self, index: i32) -> JsonbExpression {
        JsonbExpression::new(
            expr_arc!(
                "{} - {}",
                self.render_chunk(),
                Expression::as_type(json!(index), "int")
            )
            .render_chunk(),
        )
    }

    /// Document with the field or element at the path removed, using `#-`.
    pub fn delete_path<I, S>(&self, path: I) -> JsonbExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonbExpression::new(
            expr_arc!("{} #- {}", self.render_chunk(), Expression::text_array(path))
                .render_chunk(),
        )
    }

    /// Number of elements in the outermost array, `jsonb_array_length`.
    pub fn array_length(&self) -> IntExpression {
        IntExpression::new(
            ExpressionArc::fx("jsonb_array_length", vec![self.render_chunk()]).render_chunk(),
        )
    }

    /// `jsonb_extract_path`, equivalent to `#>`.
    pub fn extract_path<I, S>(&self, path: I) -> JsonbExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        JsonbExpression::new(
            expr_arc!(
                "jsonb_extract_path({}, VARIADIC {})",
                self.render_chunk(),
                Expression::text_array(path)
            )
            .render_chunk(),
        )
    }

    /// `jsonb_extract_path_text`, equivalent to `#>>`.
    pub fn extract_path_text<I, S>(&self, path: I) -> TextExpression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextExpression::new(
            expr_arc!(
                "jsonb_extract_path_text({}, VARIADIC {})",
                self.render_chunk(),
                Expression::text_array(path)
            )
            .render_chunk(),
        )
    }

    /// Type of the outermost value as text (`object`, `array`, `string`,
    /// `number`, `boolean` or `null`), `jsonb_typeof`.
    pub fn type_of(&self) -> TextExpression {
        TextExpression::new(
            ExpressionArc::fx("jsonb_typeof", vec![self.render_chunk()]).render_chunk(),
        )
    }

    /// Document with all object fields that have `null` values omitted,
    /// `jsonb_strip_nulls`. Nulls inside arrays are untouched.
    pub fn strip_nulls(&self) -> JsonbExpression {
        JsonbExpression::new(
            ExpressionArc::fx("jsonb_strip_nulls", vec![self.render_chunk()]).render_chunk(),
        )
    }

    /// Indented, human-readable rendering of the document, `jsonb_pretty`.
    pub fn pretty(&self) -> TextExpression {
        TextExpression::new(
            ExpressionArc::fx("jsonb_pretty", vec![self.render_chunk()]).render_chunk(),
        )
    }
}
