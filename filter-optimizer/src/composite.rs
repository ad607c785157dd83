use std::hash::Hash;

use log::{debug, warn};

use filter_expr::Expression;

use crate::{
    BooleanLogicOptimizer, ComparisonOptimizer, ExpressionOptimizer, NotPushingOptimizer,
    StructuralOptimizer,
};

/// Default iteration cap for [`CompositeOptimizer::standard`].
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Iteration cap for [`CompositeOptimizer::aggressive`].
pub const AGGRESSIVE_MAX_ITERATIONS: usize = 20;

/// Applies an ordered list of optimizers repeatedly until the tree stops
/// changing (structural equality) or an iteration cap is reached.
///
/// The cap exists because a later pass can re-expose opportunities for an
/// earlier one (negation pushing surfacing a contradiction pair, say), so
/// a single linear sweep is not enough; it bounds pathological inputs, not
/// correctness - realistic predicates converge in two to four passes.
pub struct CompositeOptimizer<F> {
    optimizers: Vec<Box<dyn ExpressionOptimizer<F>>>,
    max_iterations: usize,
}

impl<F> CompositeOptimizer<F> {
    pub fn new(optimizers: Vec<Box<dyn ExpressionOptimizer<F>>>) -> Self {
        Self::with_max_iterations(optimizers, DEFAULT_MAX_ITERATIONS)
    }

    pub fn with_max_iterations(
        optimizers: Vec<Box<dyn ExpressionOptimizer<F>>>,
        max_iterations: usize,
    ) -> Self {
        CompositeOptimizer {
            optimizers,
            max_iterations,
        }
    }
}

impl<F> CompositeOptimizer<F>
where
    F: Clone + PartialEq + Eq + Hash + 'static,
{
    /// The standard pipeline: structural, NOT pushing, boolean logic,
    /// comparison reasoning, up to ten passes.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(StructuralOptimizer::new()),
            Box::new(NotPushingOptimizer::new()),
            Box::new(BooleanLogicOptimizer::new()),
            Box::new(ComparisonOptimizer::new()),
        ])
    }

    /// The standard pipeline followed by a second structural/NOT-pushing/
    /// boolean-logic sweep within each pass, up to twenty passes.
    pub fn aggressive() -> Self {
        Self::with_max_iterations(
            vec![
                Box::new(StructuralOptimizer::new()),
                Box::new(NotPushingOptimizer::new()),
                Box::new(BooleanLogicOptimizer::new()),
                Box::new(ComparisonOptimizer::new()),
                Box::new(StructuralOptimizer::new()),
                Box::new(NotPushingOptimizer::new()),
                Box::new(BooleanLogicOptimizer::new()),
            ],
            AGGRESSIVE_MAX_ITERATIONS,
        )
    }
}

impl<F: Clone + PartialEq> ExpressionOptimizer<F> for CompositeOptimizer<F> {
    fn optimize(&self, expression: &Expression<F>) -> Expression<F> {
        if self.optimizers.is_empty() {
            return expression.clone();
        }
        let mut current = expression.clone();
        let mut iterations = 0;
        loop {
            let previous = current.clone();
            for optimizer in &self.optimizers {
                current = optimizer.optimize(&current);
                if let Expression::Bool(value) = current {
                    // A constant cannot change in a later pass.
                    debug!(
                        "optimization reduced the expression to {} after {} pass(es)",
                        value,
                        iterations + 1
                    );
                    return current;
                }
            }
            iterations += 1;
            if current == previous {
                debug!("optimization converged after {} pass(es)", iterations);
                break;
            }
            if iterations >= self.max_iterations {
                warn!(
                    "optimization stopped at the iteration cap ({}) before converging",
                    self.max_iterations
                );
                break;
            }
        }
        current
    }
}
