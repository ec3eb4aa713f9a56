//! src/semantics/counter_expr.rs

use super::literal::convert_literal;
use crate::ast::{BinaryExpression, BinaryOperator, Expression};
use crate::error::EvalError;
use tracing::warn;

/// The identifier Go uses for the per-block auto-increment counter.
pub const COUNTER: &str = "iota";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperator {
    fn from_binary(operator: BinaryOperator) -> Result<Self, EvalError> {
        match operator {
            BinaryOperator::Add => Ok(ArithmeticOperator::Add),
            BinaryOperator::Subtract => Ok(ArithmeticOperator::Subtract),
            BinaryOperator::Multiply => Ok(ArithmeticOperator::Multiply),
            BinaryOperator::Divide => Ok(ArithmeticOperator::Divide),
            other => Err(EvalError::UnsupportedOperator {
                operator: other.symbol().to_string(),
            }),
        }
    }
}

/// An arithmetic step against the counter, remembered so that following
/// lines without an expression can replay it at their own tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub operator: ArithmeticOperator,
    /// The literal side of the expression.
    pub operand: i64,
    pub counter_on_left: bool,
}

impl Operation {
    /// Replays the operation at `counter`. A zero counter used as divisor
    /// yields 0 instead of failing.
    pub fn apply(&self, counter: i64) -> i64 {
        let (left, right) = if self.counter_on_left {
            (counter, self.operand)
        } else {
            (self.operand, counter)
        };
        match self.operator {
            ArithmeticOperator::Add => left.wrapping_add(right),
            ArithmeticOperator::Subtract => left.wrapping_sub(right),
            ArithmeticOperator::Multiply => left.wrapping_mul(right),
            ArithmeticOperator::Divide => {
                if right == 0 {
                    warn!(numerator = left, "division by a zero counter, using 0");
                    0
                } else {
                    left.wrapping_div(right)
                }
            }
        }
    }
}

/// Result of evaluating one binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub value: i64,
    pub uses_counter: bool,
    /// Present when exactly one side is the counter.
    pub operation: Option<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Counter,
    Value(i64),
}

impl Side {
    fn resolve(self, counter: i64) -> i64 {
        match self {
            Side::Counter => counter,
            Side::Value(v) => v,
        }
    }
}

fn classify_operand(expression: &Expression) -> Result<Side, EvalError> {
    match expression {
        Expression::Identifier(name) if name == COUNTER => Ok(Side::Counter),
        Expression::Literal(literal) => convert_literal(literal).map(Side::Value),
        other => Err(EvalError::UnsupportedOperand {
            operand: other.describe(),
        }),
    }
}

/// Evaluates `counter op literal`, `literal op counter` or `literal op
/// literal` at the given counter tick.
///
/// A literal zero divisor is always an error. A counter divisor at tick 0
/// evaluates to 0 so that `10 / iota` can open a block.
pub fn evaluate_binary(expression: &BinaryExpression, counter: i64) -> Result<Evaluation, EvalError> {
    let left = classify_operand(&expression.left)?;
    let right = classify_operand(&expression.right)?;
    let operator = ArithmeticOperator::from_binary(expression.operator)?;

    if operator == ArithmeticOperator::Divide && right == Side::Value(0) {
        return Err(EvalError::DivisionByZero);
    }

    let uses_counter = left == Side::Counter || right == Side::Counter;
    let operation = match (left, right) {
        (Side::Counter, Side::Value(operand)) => Some(Operation {
            operator,
            operand,
            counter_on_left: true,
        }),
        (Side::Value(operand), Side::Counter) => Some(Operation {
            operator,
            operand,
            counter_on_left: false,
        }),
        _ => None,
    };

    let value = match operation {
        Some(op) => op.apply(counter),
        None => {
            // Both sides literal, or both the counter.
            let replay = Operation {
                operator,
                operand: right.resolve(counter),
                counter_on_left: true,
            };
            replay.apply(left.resolve(counter))
        }
    };

    Ok(Evaluation {
        value,
        uses_counter,
        operation,
    })
}
