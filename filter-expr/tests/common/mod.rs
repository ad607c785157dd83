//! Shared test fixtures for the filter-expr integration tests

#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use filter_expr::{
    Expression, ExpressionBuilder, FieldType, FilterField, Operator, TreeBuilder, Value,
};

/// Fields of a hypothetical customer-record filter, covering every declared
/// field kind plus an operator-restricted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fields {
    Name,
    Score,
    Price,
    Status,
    Created,
    Version,
}

pub const STATUS_VALUES: [&str; 3] = ["ACTIVE", "INACTIVE", "OTHER"];

impl FilterField for Fields {
    fn field_type(&self) -> FieldType {
        match self {
            Fields::Name => FieldType::text(),
            Fields::Score => FieldType::integer(),
            Fields::Price => FieldType::decimal(),
            Fields::Status => FieldType::enumeration("status", STATUS_VALUES),
            Fields::Created => FieldType::date(),
            Fields::Version => FieldType::integer().with_operators([
                Operator::Eq,
                Operator::Neq,
                Operator::In,
                Operator::NotIn,
            ]),
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fields::Name => "name",
            Fields::Score => "score",
            Fields::Price => "price",
            Fields::Status => "status",
            Fields::Created => "created",
            Fields::Version => "version",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Fields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Fields::Name),
            "score" => Ok(Fields::Score),
            "price" => Ok(Fields::Price),
            "status" => Ok(Fields::Status),
            "created" => Ok(Fields::Created),
            "version" => Ok(Fields::Version),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

pub fn builder() -> TreeBuilder<Fields> {
    TreeBuilder::new()
}

/// Build a comparison term over [`Fields`], panicking on validation failure.
pub fn term(field: Fields, op: Operator, value: impl Into<Value>) -> Expression<Fields> {
    builder()
        .term(field, op, value.into())
        .expect("term should pass validation")
}
