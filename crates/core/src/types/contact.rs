//! Contact details captured at registration.
//!
//! The phone number is the identity key of a user: registering twice with
//! the same number resolves to the same record. Both types validate on
//! construction and are stored in their normalized form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone cannot be empty")]
    Empty,
    /// Fewer digits than an area code plus a landline number.
    #[error("phone must have at least {min} digits (got {got})")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
        /// Digits found in the input.
        got: usize,
    },
    /// More digits than an area code plus a mobile number.
    #[error("phone must have at most {max} digits (got {got})")]
    TooLong {
        /// Maximum number of digits.
        max: usize,
        /// Digits found in the input.
        got: usize,
    },
}

/// A Brazilian phone number (area code + subscriber number), digits only.
///
/// Formatting characters are discarded on parse, so `"(11) 99999-8888"` and
/// `"11999998888"` are the same phone.
///
/// ```
/// use nuvra_core::Phone;
///
/// let phone = Phone::parse("(11) 99999-8888").unwrap();
/// assert_eq!(phone.as_str(), "11999998888");
///
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Minimum digits: two-digit area code plus an eight-digit landline.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum digits: two-digit area code plus a nine-digit mobile.
    pub const MAX_DIGITS: usize = 11;

    /// Parse a phone number, keeping only its digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, or fewer than
    /// [`Self::MIN_DIGITS`] / more than [`Self::MAX_DIGITS`] digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
                got: digits.len(),
            });
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The address is longer than RFC 5321 allows.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Missing `@`, or nothing on one side of it.
    #[error("email must look like name@domain")]
    Malformed,
}

/// An optional contact email, trimmed and structurally checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an optional email field.
    ///
    /// Blank input means "not provided" and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-blank value is too long or is not of the
    /// form `local@domain`.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, EmailError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Some(Self(trimmed.to_owned())))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_strips_mask() {
        let phone = Phone::parse("(75) 93199-3242").unwrap();
        assert_eq!(phone.as_str(), "75931993242");
    }

    #[test]
    fn test_phone_deserialize_validates() {
        let phone: Phone = serde_json::from_str(r#""(11) 3333-4444""#).unwrap();
        assert_eq!(phone.as_str(), "1133334444");
        assert_eq!(serde_json::to_string(&phone).unwrap(), r#""1133334444""#);

        assert!(serde_json::from_str::<Phone>(r#""1""#).is_err());
        assert!(serde_json::from_str::<Phone>(r#""""#).is_err());
    }

    #[test]
    fn test_phone_empty() {
        assert_eq!(Phone::parse("() -"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_phone_too_short() {
        assert!(matches!(
            Phone::parse("119999888"),
            Err(PhoneError::TooShort { got: 9, .. })
        ));
    }

    #[test]
    fn test_phone_too_long() {
        assert!(matches!(
            Phone::parse("+55 11 99999-8888"),
            Err(PhoneError::TooLong { got: 13, .. })
        ));
    }

    #[test]
    fn test_email_blank_is_none() {
        assert_eq!(Email::parse_optional("   ").unwrap(), None);
    }

    #[test]
    fn test_email_trimmed() {
        let email = Email::parse_optional(" ana@nuvra.com.br ").unwrap().unwrap();
        assert_eq!(email.as_str(), "ana@nuvra.com.br");
    }

    #[test]
    fn test_email_malformed() {
        assert_eq!(Email::parse_optional("ana"), Err(EmailError::Malformed));
        assert_eq!(Email::parse_optional("@x.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse_optional("ana@"), Err(EmailError::Malformed));
    }
}
