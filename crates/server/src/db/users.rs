//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nuvra_core::{Email, Phone, SubscriptionStatus, UserId};

use super::{RepositoryError, non_negative, parse_column};
use crate::models::User;

/// Raw `nuvra.users` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: UserId,
    name: String,
    phone: String,
    email: Option<String>,
    subscription_status: String,
    total_uses: i32,
    is_qualified: bool,
    lead_source: Option<String>,
    last_contact_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse_optional(row.email.as_deref().unwrap_or_default()).map_err(
            |e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")),
        )?;

        Ok(Self {
            id: row.id,
            name: row.name,
            phone: parse_column::<Phone>(&row.phone, "phone")?,
            email,
            subscription_status: parse_column(&row.subscription_status, "subscription_status")?,
            total_uses: non_negative(row.total_uses, "total_uses")?,
            is_qualified: row.is_qualified,
            lead_source: row.lead_source,
            last_contact_at: row.last_contact_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Fields of a user being registered.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: Phone,
    pub email: Option<Email>,
    pub lead_source: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored column is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, phone, email, subscription_status, total_uses,
                   is_qualified, lead_source, last_contact_at, created_at, updated_at
            FROM nuvra.users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored column is invalid.
    pub async fn get_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, phone, email, subscription_status, total_uses,
                   is_qualified, lead_source, last_contact_at, created_at, updated_at
            FROM nuvra.users
            WHERE phone = $1
            ",
        )
        .bind(phone.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Insert a new free user with no uses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO nuvra.users (name, phone, email, subscription_status, total_uses, lead_source)
            VALUES ($1, $2, $3, 'free', 0, $4)
            RETURNING id, name, phone, email, subscription_status, total_uses,
                      is_qualified, lead_source, last_contact_at, created_at, updated_at
            ",
        )
        .bind(&new_user.name)
        .bind(new_user.phone.as_str())
        .bind(new_user.email.as_ref().map(Email::as_str))
        .bind(new_user.lead_source.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "phone"))?;

        User::try_from(row)
    }

    /// All users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_newest_first(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, phone, email, subscription_status, total_uses,
                   is_qualified, lead_source, last_contact_at, created_at, updated_at
            FROM nuvra.users
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Count all users and the qualified ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_leads(&self) -> Result<(u64, u64), RepositoryError> {
        let (total, qualified) = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE is_qualified)
            FROM nuvra.users
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok((total.unsigned_abs(), qualified.unsigned_abs()))
    }

    /// Mark a lead as qualified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn mark_qualified(&self, id: UserId) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE nuvra.users SET is_qualified = TRUE
            WHERE id = $1
            RETURNING id, name, phone, email, subscription_status, total_uses,
                      is_qualified, lead_source, last_contact_at, created_at, updated_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        User::try_from(row)
    }

    /// Record that the lead was just contacted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn touch_last_contact(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE nuvra.users SET last_contact_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Change the subscription tier of the user with this phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this phone.
    pub async fn set_subscription_status(
        &self,
        phone: &Phone,
        status: SubscriptionStatus,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE nuvra.users SET subscription_status = $2
            WHERE phone = $1
            RETURNING id, name, phone, email, subscription_status, total_uses,
                      is_qualified, lead_source, last_contact_at, created_at, updated_at
            ",
        )
        .bind(phone.as_str())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        User::try_from(row)
    }
}
