use std::fmt;
use std::str::FromStr;

use super::ValidationError;

const MIN_DIGITS: usize = 10;

/// Visitor-supplied phone number.
///
/// Only the number of ASCII digits is checked, the original formatting is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    fn digit_count(value: &str) -> usize {
        value.chars().filter(char::is_ascii_digit).count()
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if Self::digit_count(value) < MIN_DIGITS {
            return Err(ValidationError::new("phone", "Некорректный номер телефона"));
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
