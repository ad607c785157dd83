//! Boolean filter expressions over typed fields.
//!
//! An [`Expression`] is an immutable tree of AND/OR/NOT nodes over
//! comparison terms (`field operator value`). Expressions are constructed
//! through an [`ExpressionBuilder`] - the tree-producing [`TreeBuilder`],
//! the query-syntax [`StringRenderer`], or a [`MappedBuilder`] adapting one
//! field set to another - and can be parsed from and rendered back to a
//! query syntax:
//!
//! ```text
//! status = "active" AND score >= 75 AND role IN [ADMIN, OWNER]
//! ```
//!
//! Field types ([`FieldType`]) validate operator/value combinations when
//! terms are built, and expressions can be evaluated directly against an
//! assignment of field values. The companion `filter-optimizer` crate
//! rewrites expression trees into minimal equivalent forms.

pub mod builder;
pub mod errors;
pub mod eval;
pub mod expression;
pub mod fields;
pub mod operator;
pub mod parser;
pub mod render;
pub mod value;

pub use builder::{ExpressionBuilder, MappedBuilder, TreeBuilder};
pub use errors::FilterError;
pub use expression::Expression;
pub use fields::{FieldKind, FieldType, FilterField};
pub use operator::Operator;
pub use render::StringRenderer;
pub use value::Value;
