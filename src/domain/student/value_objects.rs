use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::ValueObjectError;

// ============================================================================
// Student Value Objects
// ============================================================================
//
// Both types can only be obtained through their validating factories.
// Fields are private so an invalid instance is unrepresentable.
//
// ============================================================================

const MAX_LENGTH: usize = 200;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@]+@[^@]+$").expect("email pattern is valid"))
}

/// Student email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and trim a raw address.
    ///
    /// Rules are checked in order: emptiness, length, then the
    /// `<local>@<domain>` shape. The first failing rule is reported.
    pub fn create(raw: &str) -> Result<Self, ValueObjectError> {
        if raw.trim().is_empty() {
            return Err(ValueObjectError::EmptyEmail);
        }

        let email = raw.trim();

        if email.chars().count() > MAX_LENGTH {
            return Err(ValueObjectError::EmailTooLong);
        }

        if !email_pattern().is_match(email) {
            return Err(ValueObjectError::InvalidEmail);
        }

        Ok(Self(email.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Email::create(&raw).map_err(serde::de::Error::custom)
    }
}

/// Student first and last name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    first_name: String,
    last_name: String,
}

impl Name {
    pub fn create(first_name: &str, last_name: &str) -> Result<Self, ValueObjectError> {
        if first_name.trim().is_empty() {
            return Err(ValueObjectError::EmptyFirstName);
        }
        if last_name.trim().is_empty() {
            return Err(ValueObjectError::EmptyLastName);
        }

        let first_name = first_name.trim();
        let last_name = last_name.trim();

        if first_name.chars().count() > MAX_LENGTH {
            return Err(ValueObjectError::FirstNameTooLong);
        }
        if last_name.chars().count() > MAX_LENGTH {
            return Err(ValueObjectError::LastNameTooLong);
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
