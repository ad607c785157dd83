use serde::{Deserialize, Serialize};

use crate::builder::ExpressionBuilder;
use crate::errors::FilterError;
use crate::operator::Operator;
use crate::value::{same_elements, Value};

/// An immutable node in a filter predicate tree.
///
/// Expressions are produced by a builder (see
/// [`TreeBuilder`](crate::builder::TreeBuilder)), transformed - never
/// mutated - by optimizer passes, and consumed by renderers or evaluators.
/// The boolean constants are explicit variants: an unsatisfiable predicate
/// reduces to `Bool(false)`, a tautological one to `Bool(true)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression<F> {
    And(Vec<Expression<F>>),
    Or(Vec<Expression<F>>),
    Not(Box<Expression<F>>),
    Comparison {
        field: F,
        op: Operator,
        value: Value,
    },
    Bool(bool),
}

impl<F> Expression<F> {
    /// Pre-order walk over the tree. The visitor is invoked once per node
    /// with the node's depth: 0 at the traversal root, 1 for its direct
    /// children, and so on. The walk never mutates the tree.
    pub fn traverse<'a, V>(&'a self, visitor: &mut V)
    where
        V: FnMut(usize, &'a Expression<F>),
    {
        self.traverse_from(0, visitor);
    }

    fn traverse_from<'a, V>(&'a self, depth: usize, visitor: &mut V)
    where
        V: FnMut(usize, &'a Expression<F>),
    {
        visitor(depth, self);
        match self {
            Expression::And(children) | Expression::Or(children) => {
                for child in children {
                    child.traverse_from(depth + 1, visitor);
                }
            }
            Expression::Not(inner) => inner.traverse_from(depth + 1, visitor),
            Expression::Comparison { .. } | Expression::Bool(_) => {}
        }
    }

    /// The direct children of this node (depth 1 of a traversal rooted
    /// here). Leaves have none.
    pub fn direct_children(&self) -> Vec<&Expression<F>> {
        let mut children = Vec::new();
        self.traverse(&mut |depth, node| {
            if depth == 1 {
                children.push(node);
            }
        });
        children
    }

    /// Combine with another expression under AND.
    pub fn and(self, other: Expression<F>) -> Expression<F> {
        Expression::And(vec![self, other])
    }

    /// Combine with further expressions under a single AND.
    pub fn and_all(self, others: impl IntoIterator<Item = Expression<F>>) -> Expression<F> {
        let mut children = vec![self];
        children.extend(others);
        Expression::And(children)
    }

    /// Combine with another expression under OR.
    pub fn or(self, other: Expression<F>) -> Expression<F> {
        Expression::Or(vec![self, other])
    }

    /// Combine with further expressions under a single OR.
    pub fn or_all(self, others: impl IntoIterator<Item = Expression<F>>) -> Expression<F> {
        let mut children = vec![self];
        children.extend(others);
        Expression::Or(children)
    }

    /// Wrap in a negation.
    pub fn negate(self) -> Expression<F> {
        Expression::Not(Box::new(self))
    }

    /// Weighted complexity score of the tree: comparisons and boolean
    /// literals count 1, NOT and AND nodes 2, OR nodes 3, and every level
    /// of nesting beyond depth 3 adds a further point.
    pub fn complexity(&self) -> usize {
        let mut score = 0;
        self.traverse(&mut |depth, node| {
            score += match node {
                Expression::Comparison { .. } | Expression::Bool(_) => 1,
                Expression::Not(_) | Expression::And(_) => 2,
                Expression::Or(_) => 3,
            };
            if depth > 3 {
                score += depth - 3;
            }
        });
        score
    }
}

impl<F: Clone> Expression<F> {
    /// Rebuild this expression through a builder, producing the builder's
    /// output representation (another tree, a query string, a remapped
    /// field set, ...).
    pub fn build<B: ExpressionBuilder<F>>(&self, builder: &B) -> Result<B::Output, FilterError> {
        match self {
            Expression::And(children) => {
                let resolved = children
                    .iter()
                    .map(|child| child.build(builder))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.and(resolved)
            }
            Expression::Or(children) => {
                let resolved = children
                    .iter()
                    .map(|child| child.build(builder))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.or(resolved)
            }
            Expression::Not(inner) => {
                let resolved = inner.build(builder)?;
                builder.not(resolved)
            }
            Expression::Comparison { field, op, value } => {
                builder.term(field.clone(), *op, value.clone())
            }
            Expression::Bool(value) => builder.literal(*value),
        }
    }
}

/// Structural equality. Variant tags, fields, operators and children are
/// compared recursively by value; `In`/`NotIn` comparison values compare
/// their lists as sets (element order is irrelevant). The optimizers'
/// deduplication logic (idempotence, absorption, contradiction pairing)
/// depends on this, so reference identity is never used.
impl<F: PartialEq> PartialEq for Expression<F> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::And(a), Expression::And(b)) => a == b,
            (Expression::Or(a), Expression::Or(b)) => a == b,
            (Expression::Not(a), Expression::Not(b)) => a == b,
            (Expression::Bool(a), Expression::Bool(b)) => a == b,
            (
                Expression::Comparison { field, op, value },
                Expression::Comparison {
                    field: other_field,
                    op: other_op,
                    value: other_value,
                },
            ) => {
                if field != other_field || op != other_op {
                    return false;
                }
                match (value, other_value) {
                    (Value::List(a), Value::List(b)) => same_elements(a, b),
                    _ => value == other_value,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(field: &str, op: Operator, value: impl Into<Value>) -> Expression<String> {
        Expression::Comparison {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    #[test]
    fn traversal_depths() {
        let expr = term("a", Operator::Eq, 1)
            .and(term("b", Operator::Eq, 2).or(term("c", Operator::Eq, 3)));
        let mut seen = Vec::new();
        expr.traverse(&mut |depth, _| seen.push(depth));
        assert_eq!(vec![0, 1, 1, 2, 2], seen);
    }

    #[test]
    fn direct_children_of_leaf_is_empty() {
        assert!(term("a", Operator::Eq, 1).direct_children().is_empty());
    }

    #[test]
    fn membership_values_compare_as_sets() {
        let a = term("a", Operator::In, vec![1, 2, 3]);
        let b = term("a", Operator::In, vec![3, 1, 2]);
        let c = term("a", Operator::In, vec![1, 2]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn equality_is_structural() {
        let left = term("a", Operator::Eq, 1).and(term("b", Operator::Gt, 2));
        let right = term("a", Operator::Eq, 1).and(term("b", Operator::Gt, 2));
        assert_eq!(left, right);
        assert_ne!(left, term("b", Operator::Gt, 2).and(term("a", Operator::Eq, 1)));
    }

    #[test]
    fn complexity_weights() {
        // one AND (2) + two comparisons (1 each)
        let expr = term("a", Operator::Eq, 1).and(term("b", Operator::Eq, 2));
        assert_eq!(4, expr.complexity());
    }
}
