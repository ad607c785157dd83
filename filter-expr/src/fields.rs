use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::FilterError;
use crate::operator::Operator;
use crate::value::Value;

/// Implemented by field types that declare a value type for their
/// comparisons. The tree builder consults this when a term is constructed:
/// the raw value is cast to the declared type and validated, and an
/// incompatible value is rejected with a build error.
pub trait FilterField {
    fn field_type(&self) -> FieldType;
}

/// Untyped string fields accept anything.
impl FilterField for String {
    fn field_type(&self) -> FieldType {
        FieldType::any()
    }
}

/// The value type declared for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// No constraint on values.
    Any,
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    /// An enumeration backed by a dynamic set of named values. Values are
    /// resolved case-insensitively and canonicalized to their declared
    /// form. This supports models where the valid values are not known at
    /// compile time (e.g. loaded from configuration).
    Enum { name: String, values: Vec<String> },
}

/// A field's type handler: the value kind plus an optional restriction on
/// the operators the field may be used with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    kind: FieldKind,
    operators: Option<Vec<Operator>>,
}

impl FieldType {
    pub fn new(kind: FieldKind) -> Self {
        FieldType {
            kind,
            operators: None,
        }
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn decimal() -> Self {
        Self::new(FieldKind::Decimal)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    pub fn date_time() -> Self {
        Self::new(FieldKind::DateTime)
    }

    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(FieldKind::Enum {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Restrict the operators this field may be compared with. Without a
    /// restriction every operator is allowed.
    pub fn with_operators(mut self, operators: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    fn allowed(&self, op: Operator) -> bool {
        match &self.operators {
            None => true,
            Some(operators) => operators.contains(&op),
        }
    }

    /// Cast a raw value to the declared type, recursing elementwise into
    /// lists. Values that cannot be represented in the declared type are a
    /// build error.
    pub fn transform(&self, value: Value) -> Result<Value, FilterError> {
        if let Value::List(values) = value {
            let transformed = values
                .into_iter()
                .map(|v| self.transform(v))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Value::List(transformed));
        }
        if value.is_null() {
            return Ok(value);
        }
        match &self.kind {
            FieldKind::Enum { name, values } => match value {
                Value::Symbol(s) | Value::Text(s) => {
                    let canonical = values
                        .iter()
                        .find(|v| v.eq_ignore_ascii_case(&s))
                        .ok_or_else(|| {
                            FilterError::build(format!(
                                "'{}' is not a valid value for {}",
                                s, name
                            ))
                        })?;
                    Ok(Value::Symbol(canonical.clone()))
                }
                other => Ok(other),
            },
            FieldKind::Date => match value {
                Value::Text(s) | Value::Symbol(s) => parse_date(&s).map(Value::Date),
                other => Ok(other),
            },
            FieldKind::DateTime => match value {
                Value::Text(s) | Value::Symbol(s) => parse_date_time(&s).map(Value::DateTime),
                other => Ok(other),
            },
            _ => Ok(value),
        }
    }

    /// Validate an operator/value pair against this type. Returns the
    /// error message when invalid; the caller supplies term context.
    pub fn validate(&self, op: Operator, value: &Value) -> Result<(), String> {
        if !self.allowed(op) {
            return Err("invalid operator".to_string());
        }
        if value.is_list() && !op.is_membership() {
            return Err("operator not compatible with a list value".to_string());
        }
        match value {
            Value::List(values) => {
                for v in values {
                    self.check_kind(v)?;
                }
                Ok(())
            }
            scalar => self.check_kind(scalar),
        }
    }

    fn check_kind(&self, value: &Value) -> Result<(), String> {
        // Null is valid for every declared type.
        if value.is_null() {
            return Ok(());
        }
        match &self.kind {
            FieldKind::Any => Ok(()),
            FieldKind::Text => match value {
                Value::Text(_) => Ok(()),
                _ => Err("expected a string".to_string()),
            },
            FieldKind::Integer => match value {
                Value::Integer(_) => Ok(()),
                _ => Err("expected an integer".to_string()),
            },
            FieldKind::Decimal => match value {
                Value::Integer(_) | Value::Decimal(_) => Ok(()),
                _ => Err("expected a number".to_string()),
            },
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err("expected a boolean".to_string()),
            },
            FieldKind::Date => match value {
                Value::Date(_) => Ok(()),
                _ => Err("expected a date".to_string()),
            },
            FieldKind::DateTime => match value {
                Value::DateTime(_) => Ok(()),
                _ => Err("expected a date/time".to_string()),
            },
            FieldKind::Enum { name, values } => match value {
                Value::Symbol(s) if values.iter().any(|v| v.eq_ignore_ascii_case(s)) => Ok(()),
                Value::Symbol(s) => Err(format!("'{}' is not a valid value for {}", s, name)),
                _ => Err(format!("expected enum {}", name)),
            },
        }
    }
}

/// ISO 8601 date (`yyyy-MM-dd`).
fn parse_date(s: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| FilterError::build(format!("invalid date: {}", s)))
}

/// ISO 8601 date-time (`yyyy-MM-ddTHH:mm:ss`), falling back to a date-only
/// value read as midnight.
fn parse_date_time(s: &str) -> Result<NaiveDateTime, FilterError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    parse_date(s).and_then(|d| {
        d.and_hms_opt(0, 0, 0)
            .ok_or_else(|| FilterError::build(format!("invalid date/time: {}", s)))
    })
}
