use std::sync::Arc;

use crate::sql::expression::{Expression, ExpressionArc};
use crate::sql::Chunk;

#[derive(Debug, Clone)]
enum ConditionOperand {
    Expression(Box<Expression>),
    Condition(Box<Condition>),
}

/// Boolean-valued SQL fragment: an operand, an operator and a right-hand
/// chunk, rendered as `(lhs op rhs)`. Produced by the `jsonb` predicate
/// operators (`@>`, `<@`, `?`, `?|`, `?&`) and composable with
/// [`and`](Condition::and) / [`or`](Condition::or).
#[derive(Debug, Clone)]
pub struct Condition {
    operand: ConditionOperand,
    operation: String,
    value: Arc<Box<dyn Chunk>>,
}

impl Condition {
    pub fn from_expression(
        expression: Expression,
        operation: &str,
        value: Arc<Box<dyn Chunk>>,
    ) -> Condition {
        Condition {
            operand: ConditionOperand::Expression(Box::new(expression)),
            operation: operation.to_string(),
            value,
        }
    }

    pub fn from_condition(
        condition: Condition,
        operation: &str,
        value: Arc<Box<dyn Chunk>>,
    ) -> Condition {
        Condition {
            operand: ConditionOperand::Condition(Box::new(condition)),
            operation: operation.to_string(),
            value,
        }
    }

    fn render_operand(&self) -> Expression {
        match &self.operand {
            ConditionOperand::Expression(expression) => expression.render_chunk(),
            ConditionOperand::Condition(condition) => condition.render_chunk(),
        }
    }

    pub fn and(self, other: Condition) -> Condition {
        Condition::from_condition(self, "AND", Arc::new(Box::new(other)))
    }

    pub fn or(self, other: Condition) -> Condition {
        Condition::from_condition(self, "OR", Arc::new(Box::new(other)))
    }
}

impl Chunk for Condition {
    fn render_chunk(&self) -> Expression {
        ExpressionArc::new(
            format!("({{}} {} {{}})", self.operation),
            vec![
                Arc::new(Box::new(self.render_operand())),
                self.value.clone(),
            ],
        )
        .render_chunk()
    }
}
