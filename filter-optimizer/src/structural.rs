use filter_expr::Expression;

use crate::{normalize, ExpressionOptimizer};

/// Structural simplifications:
///
/// - flattens nested same-kind nodes: `A AND (B AND C)` becomes
///   `A AND B AND C`, recursively;
/// - eliminates double negation: `NOT (NOT A)` becomes `A`;
/// - normalizes arity: a single-child AND/OR collapses to the child, an
///   empty one to its identity constant.
#[derive(Debug, Default)]
pub struct StructuralOptimizer;

impl StructuralOptimizer {
    pub fn new() -> Self {
        StructuralOptimizer
    }

    /// Collect the terms of a same-kind chain: a child of the same variant
    /// contributes its own direct children (recursively), anything else is
    /// optimized and kept as a single term.
    fn collect<F: Clone + PartialEq>(
        &self,
        expression: &Expression<F>,
        is_and: bool,
        result: &mut Vec<Expression<F>>,
    ) {
        let same_kind = match expression {
            Expression::And(_) => is_and,
            Expression::Or(_) => !is_and,
            _ => false,
        };
        if same_kind {
            for child in expression.direct_children() {
                self.collect(child, is_and, result);
            }
        } else {
            result.push(self.optimize(expression));
        }
    }
}

impl<F: Clone + PartialEq> ExpressionOptimizer<F> for StructuralOptimizer {
    fn optimize(&self, expression: &Expression<F>) -> Expression<F> {
        match expression {
            Expression::And(_) => {
                let mut flattened = Vec::new();
                self.collect(expression, true, &mut flattened);
                normalize(flattened, true)
            }
            Expression::Or(_) => {
                let mut flattened = Vec::new();
                self.collect(expression, false, &mut flattened);
                normalize(flattened, false)
            }
            Expression::Not(inner) => {
                if let Expression::Not(double_inner) = inner.as_ref() {
                    return self.optimize(double_inner.as_ref());
                }
                Expression::Not(Box::new(self.optimize(inner.as_ref())))
            }
            other => other.clone(),
        }
    }
}
