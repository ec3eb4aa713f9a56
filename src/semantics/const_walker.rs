//! src/semantics/const_walker.rs

use super::counter_expr::{COUNTER, Operation, evaluate_binary};
use super::literal::convert_literal;
use crate::ast::{Expression, GenDecl, Spec, UnaryOperator, ValueSpec};
use crate::error::EvalError;
use tracing::{debug, warn};

/// Name that binds nothing but still consumes a counter tick.
pub const PLACEHOLDER: &str = "_";

/// What the most recent explicit expression looked like. Lines without an
/// expression repeat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastExpression {
    None,
    Plain(i64),
    Counter,
    Operation(Operation),
}

/// Per-block state; a new block always starts from `CounterState::default()`.
#[derive(Debug, Clone, Copy)]
struct CounterState {
    tick: i64,
    last: LastExpression,
}

impl Default for CounterState {
    fn default() -> Self {
        CounterState {
            tick: 0,
            last: LastExpression::None,
        }
    }
}

/// One named constant with its value and byte offset in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConst {
    pub name: String,
    pub value: i64,
    pub offset: usize,
}

/// Walks the lines of a single `const` block and resolves every name.
pub struct ConstBlockWalker {
    state: CounterState,
}

impl ConstBlockWalker {
    pub fn new() -> Self {
        ConstBlockWalker {
            state: CounterState::default(),
        }
    }

    /// Resolves every non-placeholder name of the block, in declaration
    /// order. Specs that are not value specs are ignored and do not tick.
    pub fn walk(mut self, block: &GenDecl) -> Result<Vec<ResolvedConst>, EvalError> {
        let mut resolved = Vec::new();
        for spec in &block.specs {
            let Spec::Value(line) = spec else {
                continue;
            };
            self.walk_line(line, &mut resolved)?;
        }
        debug!(count = resolved.len(), "walked const block");
        Ok(resolved)
    }

    /// A line binding several names evaluates once per name, ticking in
    /// between as if each name had its own line.
    fn walk_line(&mut self, line: &ValueSpec, out: &mut Vec<ResolvedConst>) -> Result<(), EvalError> {
        for (i, name) in line.names.iter().enumerate() {
            if name.name != PLACEHOLDER {
                let value = match line.values.get(i).or_else(|| line.values.first()) {
                    Some(expression) => self.resolve_explicit(expression)?,
                    None => self.resolve_implicit(),
                };
                debug!(name = %name.name, value, tick = self.state.tick, "resolved const");
                out.push(ResolvedConst {
                    name: name.name.clone(),
                    value,
                    offset: name.offset,
                });
            }
            self.state.tick += 1;
        }
        Ok(())
    }

    fn resolve_explicit(&mut self, expression: &Expression) -> Result<i64, EvalError> {
        let tick = self.state.tick;
        match expression {
            Expression::Identifier(name) if name == COUNTER => {
                self.state.last = LastExpression::Counter;
                Ok(tick)
            }
            Expression::Literal(literal) => {
                let value = convert_literal(literal)?;
                self.state.last = LastExpression::Plain(value);
                Ok(value)
            }
            Expression::Unary {
                operator: UnaryOperator::Negate,
                operand,
            } => match &**operand {
                Expression::Literal(literal) => {
                    let value = convert_literal(literal)?.wrapping_neg();
                    self.state.last = LastExpression::Plain(value);
                    Ok(value)
                }
                _ => Ok(unsupported(expression)),
            },
            Expression::Binary(binary) => {
                let evaluation = evaluate_binary(binary, tick)?;
                self.state.last = match (evaluation.uses_counter, evaluation.operation) {
                    (true, Some(operation)) => LastExpression::Operation(operation),
                    // `iota op iota` replays as the bare counter.
                    (true, None) => LastExpression::Counter,
                    (false, _) => LastExpression::Plain(evaluation.value),
                };
                Ok(evaluation.value)
            }
            other => Ok(unsupported(other)),
        }
    }

    fn resolve_implicit(&self) -> i64 {
        match self.state.last {
            LastExpression::Counter => self.state.tick,
            LastExpression::Operation(operation) => operation.apply(self.state.tick),
            LastExpression::Plain(value) => value,
            LastExpression::None => 0,
        }
    }
}

/// Shapes the evaluator does not understand resolve to 0 and leave the
/// remembered expression untouched.
fn unsupported(expression: &Expression) -> i64 {
    warn!(expression = %expression.describe(), "unsupported const expression, using 0");
    0
}

impl Default for ConstBlockWalker {
    fn default() -> Self {
        Self::new()
    }
}
