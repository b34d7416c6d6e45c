use serde_json::Value;

use crate::sql::chunk::Chunk;

/// Constructs [`Expression`] from a format string and several parameters,
/// passing each parameter through [`json!`]
///
/// ```
/// let sum = expr!("{} + {}", 2, 3);
/// ```
///
/// Parameters can be anything that [`json!`] accepts.
///
/// [`json!`]: serde_json::json!
#[macro_export]
macro_rules! expr {
    ($fmt:expr $(, $arg:expr)*) => {{
        Expression::new(
            $fmt.to_string(),
            vec![
                $( serde_json::json!($arg), )*
            ]
        )
    }}
}

/// A piece of SQL: a template with `{}` placeholders and a positional
/// parameter for each placeholder. Parameters are never interpolated into
/// the template here; they travel alongside it until the query executor
/// binds them.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    expression: String,
    parameters: Vec<Value>,
}

impl Chunk for Expression {
    fn render_chunk(&self) -> Expression {
        self.clone()
    }
}

impl Expression {
    pub fn new(expression: String, parameters: Vec<Value>) -> Self {
        Self {
            expression,
            parameters,
        }
    }

    /// Single-parameter expression with an explicit SQL-side cast, such as
    /// `{}::jsonb` or `{}::int`. The cast is part of the template, so the
    /// database sees an unambiguous parameter type.
    pub fn as_type(value: Value, as_type: &str) -> Self {
        expr!(format!("{{}}::{}", as_type), value)
    }

    /// A `text[]` parameter built from a list of strings, rendered as
    /// `{}::text[]`. Used for path and key-list operands.
    pub fn text_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect::<Vec<Value>>();
        Self::as_type(Value::Array(items), "text[]")
    }

    /// Return SQL template part of the expression
    pub fn sql(&self) -> &String {
        &self.expression
    }

    /// Converts template by replacing `{}` placeholders with `$1`, `$2` etc,
    /// the form tokio-postgres expects
    pub fn sql_final(&self) -> String {
        let mut sql_final = self.expression.clone();

        let token = "{}";
        let mut num = 0;
        while let Some(index) = sql_final.find(token) {
            num += 1;
            sql_final.replace_range(index..index + token.len(), &format!("${}", num));
        }
        sql_final
    }

    pub fn params(&self) -> &Vec<Value> {
        &self.parameters
    }

    /// Combines multiple expressions into one, joining templates with the
    /// delimiter and concatenating parameter lists in order
    pub fn from_vec(vec: Vec<Expression>, delimiter: &str) -> Self {
        let expression = vec
            .iter()
            .map(|pre| pre.expression.clone())
            .collect::<Vec<String>>()
            .join(delimiter);

        let parameters = vec
            .into_iter()
            .flat_map(|pre| pre.parameters)
            .collect::<Vec<Value>>();

        Self {
            expression,
            parameters,
        }
    }

    /// Return SQL template and parameter vec as a tuple
    pub fn split(self) -> (String, Vec<Value>) {
        (self.expression, self.parameters)
    }

    /// Places values into the template and returns a String.
    /// Useful for debugging, but not for SQL execution.
    pub fn preview(&self) -> String {
        let mut preview = self.expression.clone();
        for param in &self.parameters {
            preview = preview.replacen("{}", &param.to_string(), 1);
        }
        preview
    }
}
