/// Error types for expression construction and parsing
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A comparison term could not be constructed (field/value type
    /// mismatch, disallowed operator, unparsable date, ...).
    Build(String),
    /// A field could not be translated by a mapping adapter. Carries the
    /// offending field.
    FieldMapping(String),
    /// Query text could not be parsed.
    Parse(String),
}

impl FilterError {
    pub fn build(msg: impl Into<String>) -> Self {
        FilterError::Build(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        FilterError::Parse(msg.into())
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::Build(msg) => write!(f, "Build error: {}", msg),
            FilterError::FieldMapping(field) => {
                write!(f, "Unable to map field: {}", field)
            }
            FilterError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl From<FilterError> for String {
    fn from(error: FilterError) -> Self {
        error.to_string()
    }
}

impl std::error::Error for FilterError {}
