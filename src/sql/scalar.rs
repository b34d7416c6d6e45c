use crate::sql::chunk::Chunk;
use crate::sql::Expression;

/// An expression yielding `text`, such as `->>`, `#>>`, `json[b]_typeof` or
/// `jsonb_pretty` results.
#[derive(Debug, Clone, PartialEq)]
pub struct TextExpression {
    expression: Expression,
}

impl TextExpression {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }
}

impl Chunk for TextExpression {
    fn render_chunk(&self) -> Expression {
        self.expression.clone()
    }
}

/// An expression yielding `integer`, such as `json[b]_array_length` results.
#[derive(Debug, Clone, PartialEq)]
pub struct IntExpression {
    expression: Expression,
}

impl IntExpression {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }
}

impl Chunk for IntExpression {
    fn render_chunk(&self) -> Expression {
        self.expression.clone()
    }
}
