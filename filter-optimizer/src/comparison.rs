use std::hash::Hash;

use indexmap::IndexMap;

use filter_expr::{Expression, Operator, Value};

use crate::{normalize, ExpressionOptimizer};

/// Per-field reasoning over the comparison terms of an AND node:
///
/// 1. Contradiction detection - `field = 5 AND field = 10`, impossible
///    numeric ranges (`field > 10 AND field < 5`), disjoint `IN` sets, an
///    `IN` set fully excluded by a `NOT IN` set. Any contradiction makes
///    the whole AND `false`.
/// 2. Redundancy elimination - a bound implied by a stricter bound of the
///    same direction is dropped (`field > 3 AND field > 5` keeps only
///    `> 5`), a superset `IN` yields to a subset `IN`, a subset `NOT IN`
///    to a superset `NOT IN`.
///
/// Range rules only fire for values with a numeric reading; text-valued
/// bounds are deliberately left alone (their collation is the consumer's
/// business). OR nodes are optimized child-by-child only - no cross-child
/// set reasoning is attempted there.
#[derive(Debug, Default)]
pub struct ComparisonOptimizer;

impl ComparisonOptimizer {
    pub fn new() -> Self {
        ComparisonOptimizer
    }

    fn reduce_and<F>(&self, expression: &Expression<F>) -> Expression<F>
    where
        F: Clone + PartialEq + Eq + Hash,
    {
        let terms = expression.direct_children();

        let mut by_field: IndexMap<F, Vec<Comparison<'_, F>>> = IndexMap::new();
        for term in &terms {
            if let Expression::Comparison { field, op, value } = term {
                by_field.entry(field.clone()).or_default().push(Comparison {
                    op: *op,
                    value,
                    expression: term,
                });
            }
        }

        let mut optimized_terms: Vec<Expression<F>> = Vec::new();
        for comparisons in by_field.values() {
            if comparisons.len() == 1 {
                optimized_terms.push(comparisons[0].expression.clone());
                continue;
            }
            match reduce_field_group(comparisons) {
                // A contradiction on one field falsifies the whole AND.
                None => return Expression::Bool(false),
                Some(reduced) => optimized_terms.push(reduced),
            }
        }

        for term in &terms {
            if !matches!(term, Expression::Comparison { .. }) {
                optimized_terms.push(self.optimize(term));
            }
        }

        normalize(optimized_terms, true)
    }
}

impl<F> ExpressionOptimizer<F> for ComparisonOptimizer
where
    F: Clone + PartialEq + Eq + Hash,
{
    fn optimize(&self, expression: &Expression<F>) -> Expression<F> {
        match expression {
            Expression::And(_) => self.reduce_and(expression),
            Expression::Or(children) => {
                let optimized = children.iter().map(|c| self.optimize(c)).collect();
                normalize(optimized, false)
            }
            Expression::Not(inner) => Expression::Not(Box::new(self.optimize(inner.as_ref()))),
            other => other.clone(),
        }
    }
}

struct Comparison<'a, F> {
    op: Operator,
    value: &'a Value,
    expression: &'a Expression<F>,
}

/// Reduce the comparisons on a single field. `None` signals a
/// contradiction; otherwise the surviving comparisons are returned,
/// re-combined under AND when more than one remains.
fn reduce_field_group<F: Clone + PartialEq>(
    comparisons: &[Comparison<'_, F>],
) -> Option<Expression<F>> {
    for i in 0..comparisons.len() {
        for j in (i + 1)..comparisons.len() {
            if contradicts(&comparisons[i], &comparisons[j]) {
                return None;
            }
        }
    }

    let mut survivors: Vec<&Comparison<'_, F>> = Vec::new();
    for (i, comparison) in comparisons.iter().enumerate() {
        let redundant = comparisons
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && redundant_given(comparison, other, j < i));
        if !redundant {
            survivors.push(comparison);
        }
    }

    let expressions: Vec<Expression<F>> =
        survivors.iter().map(|c| c.expression.clone()).collect();
    Some(normalize(expressions, true))
}

fn contradicts<F>(a: &Comparison<'_, F>, b: &Comparison<'_, F>) -> bool {
    // field = A AND field = B with A != B can never hold.
    if a.op == Operator::Eq && b.op == Operator::Eq && a.value != b.value {
        return true;
    }

    if let (Some(va), Some(vb)) = (a.value.as_f64(), b.value.as_f64()) {
        if impossible_range(a.op, va, b.op, vb) || impossible_range(b.op, vb, a.op, va) {
            return true;
        }
    }

    if a.op.is_membership() && b.op.is_membership() {
        let set_a = value_set(a.value);
        let set_b = value_set(b.value);
        return match (a.op, b.op) {
            // field IN [1,2] AND field IN [3,4]: no candidate value at all.
            (Operator::In, Operator::In) => disjoint(set_a, set_b),
            // Every candidate of the IN set is excluded by the NOT IN set.
            (Operator::NotIn, Operator::In) => subset(set_b, set_a),
            (Operator::In, Operator::NotIn) => subset(set_a, set_b),
            _ => false,
        };
    }

    false
}

/// One direction of the impossible-range table: a lower bound at or above
/// an upper bound with no overlap point.
fn impossible_range(lower_op: Operator, lower: f64, upper_op: Operator, upper: f64) -> bool {
    match (lower_op, upper_op) {
        (Operator::Gt, Operator::Lt) => lower >= upper,
        (Operator::Gte, Operator::Lt) => lower >= upper,
        (Operator::Gt, Operator::Lte) => lower >= upper,
        _ => false,
    }
}

/// Whether `comparison` is implied by `other` (and may be dropped). When
/// the two are equally strict the earlier occurrence wins, so exactly one
/// of a duplicated bound survives.
fn redundant_given<F>(
    comparison: &Comparison<'_, F>,
    other: &Comparison<'_, F>,
    other_first: bool,
) -> bool {
    if let (Some(value), Some(other_value)) = (comparison.value.as_f64(), other.value.as_f64()) {
        return match (comparison.op, other.op) {
            // A looser lower bound is implied by a stricter one.
            (Operator::Gt, Operator::Gt) | (Operator::Gte, Operator::Gte) => {
                value < other_value || (value == other_value && other_first)
            }
            (Operator::Lt, Operator::Lt) | (Operator::Lte, Operator::Lte) => {
                value > other_value || (value == other_value && other_first)
            }
            // An inclusive bound is implied by a strict bound at or above it.
            (Operator::Gte, Operator::Gt) => value <= other_value,
            (Operator::Lte, Operator::Lt) => value >= other_value,
            _ => false,
        };
    }

    if comparison.op.is_membership() && other.op.is_membership() {
        let set = value_set(comparison.value);
        let other_set = value_set(other.value);
        return match (comparison.op, other.op) {
            // The superset IN is implied by the subset IN.
            (Operator::In, Operator::In) => {
                subset(other_set, set) && (!subset(set, other_set) || other_first)
            }
            // The subset NOT IN is implied by the superset NOT IN.
            (Operator::NotIn, Operator::NotIn) => {
                subset(set, other_set) && (!subset(other_set, set) || other_first)
            }
            _ => false,
        };
    }

    false
}

/// The candidate set of a membership operand: a list value is its
/// elements, a scalar a singleton.
fn value_set(value: &Value) -> &[Value] {
    value.as_list().unwrap_or(std::slice::from_ref(value))
}

fn disjoint(a: &[Value], b: &[Value]) -> bool {
    !a.iter().any(|v| b.contains(v))
}

fn subset(a: &[Value], b: &[Value]) -> bool {
    a.iter().all(|v| b.contains(v))
}
