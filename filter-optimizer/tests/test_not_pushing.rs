mod common;

use common::{assert_optimizes, parse, render};
use filter_expr::Expression;
use filter_optimizer::{ExpressionOptimizer, NotPushingOptimizer};

#[test]
fn pushes_not_into_equality() {
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score = 42", "score != 42");
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score != 42", "score = 42");
}

#[test]
fn pushes_not_into_ordering_operators() {
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score > 42", "score <= 42");
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score >= 42", "score < 42");
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score < 42", "score >= 42");
    assert_optimizes(&NotPushingOptimizer::new(), "NOT score <= 42", "score > 42");
}

#[test]
fn pushes_not_into_membership() {
    assert_optimizes(
        &NotPushingOptimizer::new(),
        "NOT status IN [ACTIVE, INACTIVE]",
        "status NOT IN [ACTIVE,INACTIVE]",
    );
    assert_optimizes(
        &NotPushingOptimizer::new(),
        "NOT status NOT IN [ACTIVE, INACTIVE]",
        "status IN [ACTIVE,INACTIVE]",
    );
}

#[test]
fn string_matching_operators_keep_their_not() {
    assert_optimizes(
        &NotPushingOptimizer::new(),
        r#"NOT name CONTAINS "test""#,
        r#"(NOT name CONTAINS "test")"#,
    );
    assert_optimizes(
        &NotPushingOptimizer::new(),
        r#"NOT name STARTS WITH "Pro""#,
        r#"(NOT name STARTS WITH "Pro")"#,
    );
    assert_optimizes(
        &NotPushingOptimizer::new(),
        r#"NOT name ENDS WITH "duct""#,
        r#"(NOT name ENDS WITH "duct")"#,
    );
}

#[test]
fn folds_negated_constants() {
    let optimizer = NotPushingOptimizer::new();
    assert_eq!(
        Expression::<String>::Bool(false),
        optimizer.optimize(&parse("NOT true"))
    );
    assert_eq!(
        Expression::<String>::Bool(true),
        optimizer.optimize(&parse("NOT false"))
    );
}

#[test]
fn recurses_through_connectives() {
    let optimizer = NotPushingOptimizer::new();
    let optimized = optimizer.optimize(&parse(
        r#"score > 10 AND NOT name = "test" AND NOT status IN [ACTIVE]"#,
    ));
    let result = render(&optimized);
    assert!(result.contains("score > 10"), "got: {}", result);
    assert!(result.contains("name != \"test\""), "got: {}", result);
    assert!(result.contains("status NOT IN [ACTIVE]"), "got: {}", result);
}

#[test]
fn not_over_a_connective_is_preserved() {
    // De Morgan over AND/OR is out of scope; only the inner terms change.
    assert_optimizes(
        &NotPushingOptimizer::new(),
        "NOT (a = 1 AND NOT b = 2)",
        "(NOT (a = 1 AND b != 2))",
    );
}
