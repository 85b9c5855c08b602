//! PhoneNumber - E.164 destination number

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Destination number in E.164 form (`+` followed by 8-15 digits)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+').ok_or_else(|| {
            DomainError::Validation(format!(
                "Phone number '{}' must be in E.164 format (e.g. +15551234567)",
                raw
            ))
        })?;

        let valid = (8..=15).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit())
            && !digits.starts_with('0');

        if !valid {
            return Err(DomainError::Validation(format!(
                "Phone number '{}' must be in E.164 format (e.g. +15551234567)",
                raw
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        PhoneNumber::parse(&raw)
    }
}

impl From<PhoneNumber> for String {
    fn from(number: PhoneNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
