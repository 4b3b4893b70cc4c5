use std::fmt;

/// A single failed check: human-readable message plus optional machine code
///
/// Values are immutable once built; outcomes only ever append them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidationError {
    message: String,
    code: Option<String>,
}

impl ValidationError {
    /// Create an error without a machine-readable code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Create an error carrying a machine-readable code
    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    pub(crate) fn from_parts(message: &str, code: Option<&str>) -> Self {
        Self {
            message: message.to_string(),
            code: code.map(str::to_string),
        }
    }

    /// Get the human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the machine-readable code, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_without_code() {
        assert_eq!(ValidationError::new("too short").to_string(), "too short");
    }

    #[test]
    fn display_with_code() {
        assert_eq!(
            ValidationError::with_code("too short", "min_length").to_string(),
            "[min_length] too short"
        );
    }

    #[test]
    fn from_parts_matches_constructors() {
        assert_eq!(
            ValidationError::from_parts("bad", Some("E1")),
            ValidationError::with_code("bad", "E1")
        );
        assert_eq!(
            ValidationError::from_parts("bad", None),
            ValidationError::new("bad")
        );
    }

    #[test]
    fn accessors_return_fields() {
        let err = ValidationError::with_code("missing @", "email");
        assert_eq!(err.message(), "missing @");
        assert_eq!(err.code(), Some("email"));
        assert_eq!(ValidationError::new("x").code(), None);
    }
}
