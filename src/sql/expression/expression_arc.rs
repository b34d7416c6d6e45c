use std::sync::Arc;

use super::Expression;
use crate::sql::chunk::Chunk;

pub trait WrapArc {
    fn wrap_arc(self) -> Arc<Box<dyn Chunk>>;
}
impl<T: Chunk + 'static> WrapArc for T {
    fn wrap_arc(self) -> Arc<Box<dyn Chunk>> {
        Arc::new(Box::new(self))
    }
}
impl WrapArc for Arc<Box<dyn Chunk>> {
    fn wrap_arc(self) -> Arc<Box<dyn Chunk>> {
        self
    }
}

/// Constructs [`ExpressionArc`] from a format string and parameters that
/// implement [`Chunk`]. Nested expressions are spliced into the template
/// when the result is rendered.
#[macro_export]
macro_rules! expr_arc {
    ($fmt:expr $(, $arg:expr)*) => {{
        ExpressionArc::new(
            $fmt.to_string(),
            vec![
                $( $crate::sql::expression::expression_arc::WrapArc::wrap_arc($arg), )*
            ]
        )
    }}
}

/// Like [`Expression`], but parameters are themselves [`Chunk`]s with shared
/// ownership. Rendering splices every nested template into the outer one and
/// flattens the parameter lists, preserving order.
#[derive(Debug)]
pub struct ExpressionArc {
    expression: String,
    parameters: Vec<Arc<Box<dyn Chunk>>>,
}

impl ExpressionArc {
    pub fn new(expression: String, parameters: Vec<Arc<Box<dyn Chunk>>>) -> ExpressionArc {
        ExpressionArc {
            expression,
            parameters,
        }
    }

    pub fn from_vec(vec: Vec<Arc<Box<dyn Chunk>>>, delimiter: &str) -> Self {
        let expression = vec
            .iter()
            .map(|_| "{}")
            .collect::<Vec<&str>>()
            .join(delimiter);

        Self {
            expression,
            parameters: vec,
        }
    }

    /// SQL function call: `fx("jsonb_pretty", vec![doc])` renders as
    /// `jsonb_pretty({})`
    pub fn fx(function_name: &str, parameters: Vec<Expression>) -> Self {
        let parameters = Expression::from_vec(parameters, ", ");
        expr_arc!(format!("{}({{}})", function_name), parameters)
    }
}

impl Chunk for ExpressionArc {
    fn render_chunk(&self) -> Expression {
        let token = "{}";

        let mut param_iter = self.parameters.iter();
        let mut sql = self.expression.split(token);

        let mut param_out = Vec::new();
        let mut sql_out: String = String::from(sql.next().unwrap());

        for param in param_iter.by_ref() {
            let (param_sql, param_values) = param.render_chunk().split();
            sql_out.push_str(&param_sql);
            param_out.extend(param_values);
            sql_out.push_str(sql.next().unwrap());
        }

        Expression::new(sql_out, param_out)
    }
}
