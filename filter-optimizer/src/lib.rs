//! Rewrites filter expression trees into minimal equivalent forms.
//!
//! Each optimizer is a pure tree-to-tree transformation implementing
//! [`ExpressionOptimizer`]; input trees are never mutated. The passes:
//!
//! - [`StructuralOptimizer`]: flattens nested same-kind AND/OR nodes and
//!   eliminates double negation.
//! - [`NotPushingOptimizer`]: pushes NOT into comparison operators
//!   (`NOT (a > 5)` becomes `a <= 5`).
//! - [`BooleanLogicOptimizer`]: identity, dominance, idempotence,
//!   contradiction/tautology and absorption laws over AND/OR children.
//! - [`ComparisonOptimizer`]: per-field reasoning over the comparisons of
//!   an AND - equality and range contradictions, redundant bounds,
//!   `IN`/`NOT IN` set algebra.
//! - [`CompositeOptimizer`]: runs an ordered pipeline of the above to a
//!   fixed point under a bounded iteration count.
//!
//! An unsatisfiable expression reduces to `Expression::Bool(false)`, a
//! tautological one to `Expression::Bool(true)`; neither is an error.

pub mod boolean_logic;
pub mod comparison;
pub mod composite;
pub mod not_pushing;
pub mod structural;

use filter_expr::Expression;

pub use boolean_logic::BooleanLogicOptimizer;
pub use comparison::ComparisonOptimizer;
pub use composite::CompositeOptimizer;
pub use not_pushing::NotPushingOptimizer;
pub use structural::StructuralOptimizer;

/// A rewrite pass over expression trees. Optimizers are pure: the result
/// is a new tree and the input is left untouched, so callers may retain
/// and compare both.
pub trait ExpressionOptimizer<F> {
    fn optimize(&self, expression: &Expression<F>) -> Expression<F>;
}

/// Arity normalization shared by the passes: an empty child list becomes
/// the connective's identity constant (`AND` is vacuously true, `OR`
/// vacuously false), a single child replaces its parent, anything else is
/// rebuilt as a multi-child node.
pub(crate) fn normalize<F>(mut children: Vec<Expression<F>>, is_and: bool) -> Expression<F> {
    match children.len() {
        0 => Expression::Bool(is_and),
        1 => children.pop().expect("non-empty"),
        _ => {
            if is_and {
                Expression::And(children)
            } else {
                Expression::Or(children)
            }
        }
    }
}
