//! Randomized property tests: optimization must preserve semantics and
//! reach a stable fixed point for arbitrary (bounded) inputs.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use filter_expr::{Expression, ExpressionBuilder, Operator, TreeBuilder, Value};
use filter_optimizer::{CompositeOptimizer, ExpressionOptimizer};

const FIELDS: [&str; 3] = ["a", "b", "c"];

/// Values are kept to small integers so that every generated comparison is
/// well-typed and comparable under evaluation.
const VALUE_RANGE: std::ops::Range<i64> = 0..8;

fn builder() -> TreeBuilder<String> {
    TreeBuilder::new()
}

fn random_term(rng: &mut StdRng) -> Expression<String> {
    let field = FIELDS[rng.random_range(0..FIELDS.len())].to_string();
    let op = match rng.random_range(0..8) {
        0 => Operator::Eq,
        1 => Operator::Neq,
        2 => Operator::Gt,
        3 => Operator::Gte,
        4 => Operator::Lt,
        5 => Operator::Lte,
        6 => Operator::In,
        _ => Operator::NotIn,
    };
    let value = if op.is_membership() {
        let len = rng.random_range(1..4);
        Value::List(
            (0..len)
                .map(|_| Value::Integer(rng.random_range(VALUE_RANGE)))
                .collect(),
        )
    } else {
        Value::Integer(rng.random_range(VALUE_RANGE))
    };
    builder()
        .term(field, op, value)
        .expect("generated term should be valid")
}

fn random_expression(rng: &mut StdRng, depth: usize) -> Expression<String> {
    if depth == 0 || rng.random_range(0..100) < 35 {
        return random_term(rng);
    }
    match rng.random_range(0..4) {
        0 => {
            let children = (0..rng.random_range(2..4))
                .map(|_| random_expression(rng, depth - 1))
                .collect();
            builder().and(children).expect("AND should build")
        }
        1 => {
            let children = (0..rng.random_range(2..4))
                .map(|_| random_expression(rng, depth - 1))
                .collect();
            builder().or(children).expect("OR should build")
        }
        2 => builder()
            .not(random_expression(rng, depth - 1))
            .expect("NOT should build"),
        _ => random_term(rng),
    }
}

fn random_assignment(rng: &mut StdRng) -> HashMap<String, Value> {
    FIELDS
        .iter()
        .map(|f| (f.to_string(), Value::Integer(rng.random_range(VALUE_RANGE))))
        .collect()
}

#[test]
fn optimization_preserves_semantics() {
    let mut rng = StdRng::seed_from_u64(7);
    let optimizer = CompositeOptimizer::standard();

    for case in 0..250 {
        let exp = random_expression(&mut rng, 3);
        let optimized = optimizer.optimize(&exp);
        for _ in 0..16 {
            let assignment = random_assignment(&mut rng);
            let lookup = |f: &String| assignment.get(f).cloned().unwrap_or(Value::Null);
            assert_eq!(
                exp.evaluate(&lookup),
                optimized.evaluate(&lookup),
                "case {}: {:?} diverged from optimized {:?} under {:?}",
                case,
                exp,
                optimized,
                assignment
            );
        }
    }
}

#[test]
fn optimization_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let optimizer = CompositeOptimizer::standard();

    for case in 0..250 {
        let exp = random_expression(&mut rng, 3);
        let once = optimizer.optimize(&exp);
        let twice = optimizer.optimize(&once);
        assert_eq!(once, twice, "case {}: fixed point not stable for {:?}", case, exp);
    }
}

#[test]
fn aggressive_preset_agrees_with_standard_semantics() {
    let mut rng = StdRng::seed_from_u64(13);
    let optimizer = CompositeOptimizer::aggressive();

    for _ in 0..100 {
        let exp = random_expression(&mut rng, 3);
        let optimized = optimizer.optimize(&exp);
        for _ in 0..8 {
            let assignment = random_assignment(&mut rng);
            let lookup = |f: &String| assignment.get(f).cloned().unwrap_or(Value::Null);
            assert_eq!(exp.evaluate(&lookup), optimized.evaluate(&lookup));
        }
    }
}

#[test]
fn nesting_order_does_not_matter() {
    // AND(a, AND(b, c)) and AND(a, b, c) optimize to the same tree.
    let mut rng = StdRng::seed_from_u64(17);
    let optimizer = CompositeOptimizer::standard();

    for _ in 0..100 {
        let (a, b, c) = (
            random_term(&mut rng),
            random_term(&mut rng),
            random_term(&mut rng),
        );
        let nested = builder()
            .and(vec![
                a.clone(),
                builder().and(vec![b.clone(), c.clone()]).unwrap(),
            ])
            .unwrap();
        let flat = builder().and(vec![a, b, c]).unwrap();
        assert_eq!(optimizer.optimize(&nested), optimizer.optimize(&flat));
    }
}

#[test]
fn deep_trees_terminate_within_the_iteration_cap() {
    let mut rng = StdRng::seed_from_u64(19);
    let optimizer = CompositeOptimizer::standard();

    for _ in 0..20 {
        let exp = random_expression(&mut rng, 6);
        let optimized = optimizer.optimize(&exp);
        // The cap bounds the loop; the result must still be a fixed point
        // for realistic sizes.
        assert_eq!(optimized, optimizer.optimize(&optimized));
    }
}
