//! Shared helpers for the optimizer integration tests

#![allow(dead_code)]

use filter_expr::{Expression, ExpressionBuilder, StringRenderer, TreeBuilder};

/// Parse query text into an expression over plain string fields.
pub fn parse(input: &str) -> Expression<String> {
    input.parse().expect("query text should parse")
}

/// Build a flat AND over the given query-text terms (the parser itself
/// produces nested two-child nodes).
pub fn flat_and(terms: &[&str]) -> Expression<String> {
    TreeBuilder::new()
        .and(terms.iter().map(|t| parse(t)).collect())
        .expect("AND should build")
}

/// Render an expression back to its query-syntax string.
pub fn render(expression: &Expression<String>) -> String {
    expression
        .build(&StringRenderer::new())
        .expect("expression should render")
}

/// Assert that optimizing `input` produces the `expected` rendering.
pub fn assert_optimizes<O>(optimizer: &O, input: &str, expected: &str)
where
    O: filter_optimizer::ExpressionOptimizer<String>,
{
    let optimized = optimizer.optimize(&parse(input));
    assert_eq!(expected, render(&optimized), "for input: {}", input);
}
