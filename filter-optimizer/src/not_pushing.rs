use filter_expr::Expression;

use crate::{normalize, ExpressionOptimizer};

/// Pushes NOT operations into comparison operators:
///
/// - `NOT (field = v)` becomes `field != v`, `NOT (field > v)` becomes
///   `field <= v`, `NOT (field IN [..])` becomes `field NOT IN [..]`, and
///   so on for every operator with a defined negation;
/// - `NOT true`/`NOT false` fold to the opposite constant;
/// - the string-matching operators (`CONTAINS`, `STARTS WITH`,
///   `ENDS WITH`) have no defined negation, so their NOT is preserved.
///
/// Running this pass ahead of the boolean-logic and comparison passes
/// exposes contradiction and redundancy pairs that would otherwise hide
/// behind a NOT node.
#[derive(Debug, Default)]
pub struct NotPushingOptimizer;

impl NotPushingOptimizer {
    pub fn new() -> Self {
        NotPushingOptimizer
    }
}

impl<F: Clone + PartialEq> ExpressionOptimizer<F> for NotPushingOptimizer {
    fn optimize(&self, expression: &Expression<F>) -> Expression<F> {
        match expression {
            Expression::Not(inner) => match inner.as_ref() {
                Expression::Comparison { field, op, value } => match op.negated() {
                    Some(negated) => Expression::Comparison {
                        field: field.clone(),
                        op: negated,
                        value: value.clone(),
                    },
                    None => expression.clone(),
                },
                Expression::Bool(value) => Expression::Bool(!value),
                other => Expression::Not(Box::new(self.optimize(other))),
            },
            Expression::And(children) => {
                let optimized = children.iter().map(|c| self.optimize(c)).collect();
                normalize(optimized, true)
            }
            Expression::Or(children) => {
                let optimized = children.iter().map(|c| self.optimize(c)).collect();
                normalize(optimized, false)
            }
            other => other.clone(),
        }
    }
}
