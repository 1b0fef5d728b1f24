use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Visitor-supplied name, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq)]
pub struct PersonName(String);

impl FromStr for PersonName {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::new("name", "Имя не может быть пустым"));
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
