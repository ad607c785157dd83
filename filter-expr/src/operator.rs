use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Comparison operators supported in filter terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    /// The operator expressing the negated condition, where one is defined.
    ///
    /// The string-matching operators (`Contains`, `StartsWith`, `EndsWith`)
    /// have no defined negation: their semantics are implementation and
    /// locale dependent, so a negated form cannot be guaranteed equivalent.
    pub fn negated(&self) -> Option<Operator> {
        match self {
            Operator::Eq => Some(Operator::Neq),
            Operator::Neq => Some(Operator::Eq),
            Operator::Gt => Some(Operator::Lte),
            Operator::Gte => Some(Operator::Lt),
            Operator::Lt => Some(Operator::Gte),
            Operator::Lte => Some(Operator::Gt),
            Operator::In => Some(Operator::NotIn),
            Operator::NotIn => Some(Operator::In),
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => None,
        }
    }

    /// Whether the operator takes a list value rather than a scalar.
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::Neq => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Gte => write!(f, ">="),
            Operator::Lt => write!(f, "<"),
            Operator::Lte => write!(f, "<="),
            Operator::In => write!(f, "IN"),
            Operator::NotIn => write!(f, "NOT IN"),
            Operator::Contains => write!(f, "CONTAINS"),
            Operator::StartsWith => write!(f, "STARTS WITH"),
            Operator::EndsWith => write!(f, "ENDS WITH"),
        }
    }
}

impl FromStr for Operator {
    type Err = crate::errors::FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "=" | "==" | "IS" | "EQ" => Ok(Operator::Eq),
            "!=" | "<>" | "~=" | "NEQ" => Ok(Operator::Neq),
            ">" | "GT" => Ok(Operator::Gt),
            ">=" | "GTE" => Ok(Operator::Gte),
            "<" | "LT" => Ok(Operator::Lt),
            "<=" | "LTE" => Ok(Operator::Lte),
            "IN" => Ok(Operator::In),
            "NOT IN" | "NOT_IN" => Ok(Operator::NotIn),
            "CONTAINS" => Ok(Operator::Contains),
            "STARTS WITH" | "STARTS_WITH" => Ok(Operator::StartsWith),
            "ENDS WITH" | "ENDS_WITH" => Ok(Operator::EndsWith),
            _ => Err(crate::errors::FilterError::parse(format!(
                "invalid comparison operator: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_is_self_inverse() {
        for op in [
            Operator::Eq,
            Operator::Neq,
            Operator::Gt,
            Operator::Gte,
            Operator::Lt,
            Operator::Lte,
            Operator::In,
            Operator::NotIn,
        ] {
            let negated = op.negated().unwrap();
            assert_eq!(Some(op), negated.negated());
        }
    }

    #[test]
    fn string_operators_have_no_negation() {
        assert_eq!(None, Operator::Contains.negated());
        assert_eq!(None, Operator::StartsWith.negated());
        assert_eq!(None, Operator::EndsWith.negated());
    }

    #[test]
    fn parse_alternatives() {
        assert_eq!(Operator::Eq, "is".parse().unwrap());
        assert_eq!(Operator::Neq, "<>".parse().unwrap());
        assert_eq!(Operator::NotIn, "NOT IN".parse().unwrap());
        assert!("!!".parse::<Operator>().is_err());
    }
}
