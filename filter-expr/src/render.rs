use crate::builder::ExpressionBuilder;
use crate::errors::FilterError;
use crate::operator::Operator;
use crate::value::Value;

/// Builder whose output is the parsable query-syntax string form of the
/// expression: `(a = 1 AND b > 2)`, `(NOT c CONTAINS "x")`,
/// `d IN [1,2,3]`. Feeding the output back through the parser yields the
/// same expression.
#[derive(Debug, Default)]
pub struct StringRenderer;

impl StringRenderer {
    pub fn new() -> Self {
        StringRenderer
    }

    fn compose(&self, separator: &str, expressions: Vec<String>) -> String {
        if expressions.is_empty() {
            return String::new();
        }
        if expressions.len() == 1 {
            return expressions.into_iter().next().unwrap();
        }
        format!("({})", expressions.join(separator))
    }
}

impl ExpressionBuilder<String> for StringRenderer {
    type Output = String;

    fn and(&self, expressions: Vec<String>) -> Result<String, FilterError> {
        Ok(self.compose(" AND ", expressions))
    }

    fn or(&self, expressions: Vec<String>) -> Result<String, FilterError> {
        Ok(self.compose(" OR ", expressions))
    }

    fn not(&self, expression: String) -> Result<String, FilterError> {
        Ok(format!("(NOT {})", expression))
    }

    fn literal(&self, value: bool) -> Result<String, FilterError> {
        Ok(if value { "true" } else { "false" }.to_string())
    }

    fn term(&self, field: String, op: Operator, value: Value) -> Result<String, FilterError> {
        Ok(format!("{} {} {}", field, op, value))
    }
}
