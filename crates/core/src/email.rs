use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A normalized email address.
///
/// Construction lowercases and trims, so two spellings of the same mailbox
/// compare equal and key the same row. Validation is deliberately shallow
/// (non-empty, contains `@`); the address book is not an RFC parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::validation("email cannot be empty"));
        }
        if !normalized.contains('@') {
            return Err(Error::validation(format!(
                "email must contain '@' (got {raw:?})"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for EmailAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
