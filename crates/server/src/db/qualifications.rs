//! Lead qualification repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use nuvra_core::{CompanySize, InterestLevel, QualificationId, SourceId, StageId, UserId};

use super::{RepositoryError, parse_column};
use crate::models::Qualification;

#[derive(Debug, sqlx::FromRow)]
struct QualificationRow {
    id: QualificationId,
    user_id: UserId,
    score: i32,
    company_name: Option<String>,
    company_size: String,
    industry: Option<String>,
    job_title: Option<String>,
    interest_level: String,
    estimated_value: Option<Decimal>,
    notes: Option<String>,
    stage_id: Option<StageId>,
    source_id: Option<SourceId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QualificationRow> for Qualification {
    type Error = RepositoryError;

    fn try_from(row: QualificationRow) -> Result<Self, Self::Error> {
        let score = u8::try_from(row.score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("invalid score in database: {}", row.score))
            })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            score,
            company_name: row.company_name,
            company_size: parse_column(&row.company_size, "company_size")?,
            industry: row.industry,
            job_title: row.job_title,
            interest_level: parse_column(&row.interest_level, "interest_level")?,
            estimated_value: row.estimated_value,
            notes: row.notes,
            stage_id: row.stage_id,
            source_id: row.source_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Editable qualification fields. Written as a whole on create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualificationFields {
    pub score: u8,
    pub company_name: Option<String>,
    pub company_size: CompanySize,
    pub industry: Option<String>,
    pub job_title: Option<String>,
    pub interest_level: InterestLevel,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub stage_id: Option<StageId>,
}

/// Repository for lead qualifications.
pub struct QualificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QualificationRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The qualification of a lead, if one was created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored column is invalid.
    pub async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Qualification>, RepositoryError> {
        let row = sqlx::query_as::<_, QualificationRow>(
            r"
            SELECT id, user_id, score, company_name, company_size, industry, job_title,
                   interest_level, estimated_value, notes, stage_id, source_id,
                   created_at, updated_at
            FROM nuvra.lead_qualifications
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Qualification::try_from).transpose()
    }

    /// Every qualification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored column is invalid.
    pub async fn list(&self) -> Result<Vec<Qualification>, RepositoryError> {
        let rows = sqlx::query_as::<_, QualificationRow>(
            r"
            SELECT id, user_id, score, company_name, company_size, industry, job_title,
                   interest_level, estimated_value, notes, stage_id, source_id,
                   created_at, updated_at
            FROM nuvra.lead_qualifications
            ORDER BY created_at
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Qualification::try_from).collect()
    }

    /// Create the qualification of a lead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the lead already has one.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        source_id: Option<SourceId>,
        fields: &QualificationFields,
    ) -> Result<Qualification, RepositoryError> {
        let row = sqlx::query_as::<_, QualificationRow>(
            r"
            INSERT INTO nuvra.lead_qualifications (
                user_id, score, company_name, company_size, industry, job_title,
                interest_level, estimated_value, notes, stage_id, source_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, score, company_name, company_size, industry, job_title,
                      interest_level, estimated_value, notes, stage_id, source_id,
                      created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(i32::from(fields.score))
        .bind(fields.company_name.as_deref())
        .bind(fields.company_size.as_str())
        .bind(fields.industry.as_deref())
        .bind(fields.job_title.as_deref())
        .bind(fields.interest_level.as_str())
        .bind(fields.estimated_value)
        .bind(fields.notes.as_deref())
        .bind(fields.stage_id)
        .bind(source_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "qualification"))?;

        Qualification::try_from(row)
    }

    /// Overwrite the editable fields of a qualification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the qualification does not exist.
    pub async fn update(
        &self,
        id: QualificationId,
        fields: &QualificationFields,
    ) -> Result<Qualification, RepositoryError> {
        let row = sqlx::query_as::<_, QualificationRow>(
            r"
            UPDATE nuvra.lead_qualifications
            SET score = $2, company_name = $3, company_size = $4, industry = $5,
                job_title = $6, interest_level = $7, estimated_value = $8, notes = $9,
                stage_id = $10
            WHERE id = $1
            RETURNING id, user_id, score, company_name, company_size, industry, job_title,
                      interest_level, estimated_value, notes, stage_id, source_id,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(i32::from(fields.score))
        .bind(fields.company_name.as_deref())
        .bind(fields.company_size.as_str())
        .bind(fields.industry.as_deref())
        .bind(fields.job_title.as_deref())
        .bind(fields.interest_level.as_str())
        .bind(fields.estimated_value)
        .bind(fields.notes.as_deref())
        .bind(fields.stage_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Qualification::try_from(row)
    }
}
