use filter_expr::Expression;

use crate::{normalize, ExpressionOptimizer};

/// Boolean-logic simplifications over the direct children of AND/OR
/// nodes:
///
/// - identity: `A AND true` becomes `A`, `A OR false` becomes `A`;
/// - dominance: `A AND false` becomes `false`, `A OR true` becomes `true`;
/// - idempotence: structural duplicates collapse to one occurrence;
/// - contradiction: `A AND NOT A` becomes `false`;
/// - tautology: `A OR NOT A` becomes `true`;
/// - absorption: `A AND (A OR B)` becomes `A`, `A OR (A AND B)` becomes
///   `A`.
///
/// Children are optimized recursively before the laws are applied; NOT
/// nodes and leaves pass through unchanged at the top level.
#[derive(Debug, Default)]
pub struct BooleanLogicOptimizer;

impl BooleanLogicOptimizer {
    pub fn new() -> Self {
        BooleanLogicOptimizer
    }

    fn reduce<F: Clone + PartialEq>(
        &self,
        expression: &Expression<F>,
        is_and: bool,
    ) -> Expression<F> {
        let terms = expression.direct_children();

        // A node whose children are all boolean literals evaluates outright.
        if terms
            .iter()
            .all(|term| matches!(term, Expression::Bool(_)))
        {
            let value = if is_and {
                terms.iter().all(|term| matches!(term, Expression::Bool(true)))
            } else {
                terms.iter().any(|term| matches!(term, Expression::Bool(true)))
            };
            return Expression::Bool(value);
        }

        // The absorbing constant: false for AND, true for OR. Both the
        // dominance law and a contradiction/tautology pair collapse the
        // whole node to it.
        let absorbing = !is_and;

        let mut final_terms: Vec<Expression<F>> = Vec::new();
        let mut negated_inners: Vec<Expression<F>> = Vec::new();
        for term in terms {
            let optimized = self.optimize(term);

            if let Expression::Not(inner) = &optimized {
                if !negated_inners.contains(inner.as_ref()) {
                    negated_inners.push(inner.as_ref().clone());
                }
            }

            // A term whose negation has already been seen, or a negation
            // of an already-kept term.
            if negated_inners.contains(&optimized) {
                return Expression::Bool(absorbing);
            }
            if let Expression::Not(inner) = &optimized {
                if final_terms.contains(inner.as_ref()) {
                    return Expression::Bool(absorbing);
                }
            }

            if let Expression::Bool(value) = optimized {
                if value == is_and {
                    continue;
                }
                return Expression::Bool(absorbing);
            }

            if !final_terms.contains(&optimized) {
                final_terms.push(optimized);
            }
        }

        let final_terms = absorb(final_terms, is_and);
        normalize(final_terms, is_and)
    }
}

/// Absorption: in an AND, an OR child is dropped when one of its own
/// direct children also appears standalone among the AND's terms (the
/// standalone term already implies the OR); dually for AND children of an
/// OR.
fn absorb<F: Clone + PartialEq>(terms: Vec<Expression<F>>, is_and: bool) -> Vec<Expression<F>> {
    let mut result = Vec::new();
    for term in &terms {
        let absorbable = match term {
            Expression::Or(_) => is_and,
            Expression::And(_) => !is_and,
            _ => false,
        };
        let absorbed = absorbable
            && term
                .direct_children()
                .into_iter()
                .any(|child| child != term && terms.contains(child));
        if !absorbed {
            result.push(term.clone());
        }
    }
    result
}

impl<F: Clone + PartialEq> ExpressionOptimizer<F> for BooleanLogicOptimizer {
    fn optimize(&self, expression: &Expression<F>) -> Expression<F> {
        match expression {
            Expression::And(_) => self.reduce(expression, true),
            Expression::Or(_) => self.reduce(expression, false),
            other => other.clone(),
        }
    }
}
