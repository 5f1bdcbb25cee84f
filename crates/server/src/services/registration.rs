//! Registration: resolve-or-create a user by phone.

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nuvra_core::{Email, EmailError, Phone, PhoneError};

use crate::db::users::NewUser;
use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

/// Lead source recorded for self-registered users.
pub const APP_LEAD_SOURCE: &str = "Nuvra AI App";

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("name is required")]
    MissingName,

    #[error("invalid phone: {0}")]
    Phone(#[from] PhoneError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Validated registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub phone: Phone,
    pub email: Option<Email>,
}

impl Registration {
    /// Validate raw form input.
    ///
    /// The name is trimmed, the phone reduced to its digits and a blank email
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn parse(name: &str, phone: &str, email: Option<&str>) -> Result<Self, RegistrationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }

        Ok(Self {
            name: name.to_owned(),
            phone: Phone::parse(phone)?,
            email: Email::parse_optional(email.unwrap_or_default())?,
        })
    }
}

/// Return the user registered with this phone, creating it if needed.
///
/// An existing user is returned as stored; name and email from the form are
/// not applied to it.
///
/// # Errors
///
/// Returns `RegistrationError::Repository` if the store fails.
#[instrument(skip_all)]
pub async fn register(pool: &PgPool, registration: Registration) -> Result<User, RegistrationError> {
    let users = UserRepository::new(pool);

    if let Some(existing) = users.get_by_phone(&registration.phone).await? {
        tracing::debug!(user_id = %existing.id, "Phone already registered");
        return Ok(existing);
    }

    let new_user = NewUser {
        name: registration.name,
        phone: registration.phone,
        email: registration.email,
        lead_source: Some(APP_LEAD_SOURCE.to_owned()),
    };

    match users.create(&new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Registered new user");
            Ok(user)
        }
        // Lost a race with a concurrent registration of the same phone.
        Err(RepositoryError::Conflict(_)) => users
            .get_by_phone(&new_user.phone)
            .await?
            .ok_or(RegistrationError::Repository(RepositoryError::NotFound)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let reg = Registration::parse("  Ana Souza ", "(11) 99999-8888", Some("  ")).unwrap();
        assert_eq!(reg.name, "Ana Souza");
        assert_eq!(reg.phone.as_str(), "11999998888");
        assert!(reg.email.is_none());
    }

    #[test]
    fn test_parse_keeps_email() {
        let reg = Registration::parse("Ana", "1133334444", Some("ana@empresa.com.br")).unwrap();
        assert_eq!(reg.email.unwrap().as_str(), "ana@empresa.com.br");
    }

    #[test]
    fn test_parse_requires_name() {
        let err = Registration::parse("   ", "11999998888", None).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingName));
    }

    #[test]
    fn test_parse_rejects_short_phone() {
        let err = Registration::parse("Ana", "9999-8888", None).unwrap_err();
        assert!(matches!(err, RegistrationError::Phone(PhoneError::TooShort { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_email() {
        let err = Registration::parse("Ana", "11999998888", Some("ana@")).unwrap_err();
        assert!(matches!(err, RegistrationError::Email(_)));
    }
}
