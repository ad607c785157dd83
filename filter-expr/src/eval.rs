//! Evaluation of expressions against an assignment of fields to values.

use std::cmp::Ordering;

use crate::expression::Expression;
use crate::operator::Operator;
use crate::value::Value;

impl<F> Expression<F> {
    /// Evaluate against an assignment. `lookup` supplies the value of each
    /// field (use [`Value::Null`] for absent fields).
    ///
    /// The connectives have their usual meaning, with the vacuous cases
    /// `AND [] = true` and `OR [] = false`. `Eq`/`Neq` and `In`/`NotIn`
    /// are exact complements; the ordering operators answer false when the
    /// two values are incomparable (e.g. text against a number).
    pub fn evaluate(&self, lookup: &impl Fn(&F) -> Value) -> bool {
        match self {
            Expression::And(children) => children.iter().all(|c| c.evaluate(lookup)),
            Expression::Or(children) => children.iter().any(|c| c.evaluate(lookup)),
            Expression::Not(inner) => !inner.evaluate(lookup),
            Expression::Bool(value) => *value,
            Expression::Comparison { field, op, value } => {
                comparison_matches(*op, &lookup(field), value)
            }
        }
    }
}

/// Whether `actual` satisfies the comparison `op expected`.
pub fn comparison_matches(op: Operator, actual: &Value, expected: &Value) -> bool {
    match op {
        Operator::Eq => actual == expected,
        Operator::Neq => actual != expected,
        Operator::Gt => matches!(actual.compare(expected), Some(Ordering::Greater)),
        Operator::Gte => matches!(
            actual.compare(expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lt => matches!(actual.compare(expected), Some(Ordering::Less)),
        Operator::Lte => matches!(
            actual.compare(expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::In => expected
            .as_list()
            .is_some_and(|values| values.contains(actual)),
        Operator::NotIn => !expected
            .as_list()
            .is_some_and(|values| values.contains(actual)),
        Operator::Contains => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.contains(e),
            _ => false,
        },
        Operator::StartsWith => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.starts_with(e),
            _ => false,
        },
        Operator::EndsWith => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.ends_with(e),
            _ => false,
        },
    }
}
