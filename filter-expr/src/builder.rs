use std::marker::PhantomData;
use std::str::FromStr;

use crate::errors::FilterError;
use crate::expression::Expression;
use crate::fields::FilterField;
use crate::operator::Operator;
use crate::parser;
use crate::render::StringRenderer;
use crate::value::Value;

/// Constructs expressions over a field type `F` from the primitive
/// operations. The output representation is up to the implementation: a
/// tree ([`TreeBuilder`]), a query string ([`StringRenderer`]), or a
/// delegate over a remapped field set ([`MappedBuilder`]).
///
/// This is the only supported construction path for expressions; no other
/// component fabricates nodes directly.
pub trait ExpressionBuilder<F> {
    type Output;

    /// The AND of the given expressions.
    fn and(&self, expressions: Vec<Self::Output>) -> Result<Self::Output, FilterError>;

    /// The OR of the given expressions.
    fn or(&self, expressions: Vec<Self::Output>) -> Result<Self::Output, FilterError>;

    /// The negation of the given expression.
    fn not(&self, expression: Self::Output) -> Result<Self::Output, FilterError>;

    /// A boolean literal.
    fn literal(&self, value: bool) -> Result<Self::Output, FilterError>;

    /// A comparison of a field with a value under an operator.
    fn term(&self, field: F, op: Operator, value: Value) -> Result<Self::Output, FilterError>;
}

/// Builder producing [`Expression`] trees. A pure constructor: it performs
/// no optimization, but it does enforce the field typing layer - `term`
/// casts the value to the field's declared type and rejects incompatible
/// values with a build error.
#[derive(Debug, Default)]
pub struct TreeBuilder<F> {
    _fields: PhantomData<fn(F)>,
}

impl<F> TreeBuilder<F> {
    pub fn new() -> Self {
        TreeBuilder {
            _fields: PhantomData,
        }
    }
}

impl<F> ExpressionBuilder<F> for TreeBuilder<F>
where
    F: FilterField + std::fmt::Debug,
{
    type Output = Expression<F>;

    fn and(&self, expressions: Vec<Expression<F>>) -> Result<Expression<F>, FilterError> {
        Ok(Expression::And(expressions))
    }

    fn or(&self, expressions: Vec<Expression<F>>) -> Result<Expression<F>, FilterError> {
        Ok(Expression::Or(expressions))
    }

    fn not(&self, expression: Expression<F>) -> Result<Expression<F>, FilterError> {
        Ok(Expression::Not(Box::new(expression)))
    }

    fn literal(&self, value: bool) -> Result<Expression<F>, FilterError> {
        Ok(Expression::Bool(value))
    }

    fn term(&self, field: F, op: Operator, value: Value) -> Result<Expression<F>, FilterError> {
        // Membership operators always carry a list: a scalar becomes a
        // singleton, an absent value the empty list.
        let value = if op.is_membership() && !value.is_list() {
            if value.is_null() {
                Value::List(Vec::new())
            } else {
                Value::List(vec![value])
            }
        } else {
            value
        };
        let field_type = field.field_type();
        let value = field_type.transform(value)?;
        field_type.validate(op, &value).map_err(|msg| {
            FilterError::build(format!("{}: {:?} {} {}", msg, field, op, value))
        })?;
        Ok(Expression::Comparison { field, op, value })
    }
}

impl<F> TreeBuilder<F>
where
    F: FilterField + std::fmt::Debug + Clone + std::fmt::Display,
{
    /// Render an expression produced by this builder to its query-syntax
    /// string, mapping fields through their `Display` form.
    pub fn serialise(&self, expression: &Expression<F>) -> Result<String, FilterError> {
        let renderer = MappedBuilder::new(StringRenderer::new(), |field: F| {
            Ok::<_, FilterError>(field.to_string())
        });
        expression.build(&renderer)
    }
}

impl<F> TreeBuilder<F>
where
    F: FilterField + std::fmt::Debug + FromStr,
{
    /// Parse query-syntax text into an expression over this builder's
    /// field set, mapping field names through `FromStr`. Terms are
    /// validated as they are built.
    pub fn deserialise(&self, input: &str) -> Result<Expression<F>, FilterError> {
        let mapped = MappedBuilder::new(TreeBuilder::<F>::new(), |name: String| {
            F::from_str(&name).map_err(|_| FilterError::FieldMapping(name.clone()))
        });
        parser::parse_with(input, &mapped)
    }
}

/// Field-mapping adapter: exposes the builder contract over a field set
/// `F1` by translating fields through a fallible mapping function and
/// delegating to a builder over the target field set. A mapping failure is
/// surfaced as a build error naming the offending field.
pub struct MappedBuilder<B, M, F1, F2> {
    delegate: B,
    mapper: M,
    _fields: PhantomData<fn(F1) -> F2>,
}

impl<B, M, F1, F2> MappedBuilder<B, M, F1, F2>
where
    B: ExpressionBuilder<F2>,
    M: Fn(F1) -> Result<F2, FilterError>,
{
    pub fn new(delegate: B, mapper: M) -> Self {
        MappedBuilder {
            delegate,
            mapper,
            _fields: PhantomData,
        }
    }
}

impl<B, M, F1, F2> ExpressionBuilder<F1> for MappedBuilder<B, M, F1, F2>
where
    F1: std::fmt::Display,
    B: ExpressionBuilder<F2>,
    M: Fn(F1) -> Result<F2, FilterError>,
{
    type Output = B::Output;

    fn and(&self, expressions: Vec<Self::Output>) -> Result<Self::Output, FilterError> {
        self.delegate.and(expressions)
    }

    fn or(&self, expressions: Vec<Self::Output>) -> Result<Self::Output, FilterError> {
        self.delegate.or(expressions)
    }

    fn not(&self, expression: Self::Output) -> Result<Self::Output, FilterError> {
        self.delegate.not(expression)
    }

    fn literal(&self, value: bool) -> Result<Self::Output, FilterError> {
        self.delegate.literal(value)
    }

    fn term(&self, field: F1, op: Operator, value: Value) -> Result<Self::Output, FilterError> {
        let name = field.to_string();
        let mapped = (self.mapper)(field).map_err(|_| FilterError::FieldMapping(name))?;
        self.delegate.term(mapped, op, value)
    }
}
