//! Lead management over registered users.
//!
//! Every view reads whole tables and aggregates in memory. The lead count of
//! a single deployment is small enough that this stays cheap, and it keeps
//! the aggregation rules in plain, testable functions.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use nuvra_core::{CompanySize, InteractionType, InterestLevel, Phone, StageId, UserId};

use crate::db::qualifications::QualificationFields;
use crate::db::{
    InteractionRepository, QualificationRepository, RepositoryError, SourceRepository,
    StageRepository, UserRepository,
};
use crate::models::{Interaction, Qualification, Source, Stage, User};

/// Stages whose leads count as open deals.
pub const ACTIVE_DEAL_STAGES: [&str; 2] = ["Proposta Enviada", "Negociação"];

/// Subject of the interaction logged when a lead changes stage.
pub const STAGE_CHANGE_SUBJECT: &str = "Mudança de estágio";

/// Interactions shown on the lead detail.
pub const RECENT_INTERACTIONS: i64 = 10;

const ANALYTICS_DAYS: usize = 7;
const TOP_SOURCES: usize = 5;
const MAX_SCORE: u8 = 100;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("lead not found")]
    LeadNotFound,

    #[error("lead already has a qualification")]
    QualificationExists,

    #[error("lead has no qualification")]
    NoQualification,

    #[error("unknown stage")]
    UnknownStage,

    #[error("no pipeline stages configured")]
    NoStages,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

// =============================================================================
// Stats
// =============================================================================

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total_leads: u64,
    pub qualified_leads: u64,
    pub active_deals: u64,
    /// Percentage of qualified leads, rounded half up.
    pub conversion_rate: u64,
}

/// `qualified / total` as a whole percentage, rounded half up; 0 without leads.
#[must_use]
pub const fn conversion_rate(qualified: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (qualified * 200 + total) / (2 * total)
    }
}

/// Qualifications sitting in one of [`ACTIVE_DEAL_STAGES`].
#[must_use]
pub fn count_active_deals(qualifications: &[Qualification], stages: &[Stage]) -> u64 {
    let active: Vec<StageId> = stages
        .iter()
        .filter(|s| ACTIVE_DEAL_STAGES.contains(&s.name.as_str()))
        .map(|s| s.id)
        .collect();

    qualifications
        .iter()
        .filter(|q| q.stage_id.is_some_and(|id| active.contains(&id)))
        .count() as u64
}

/// Dashboard numbers.
///
/// # Errors
///
/// Returns `CrmError::Repository` if the store fails.
#[instrument(skip(pool))]
pub async fn stats(pool: &PgPool) -> Result<LeadStats, CrmError> {
    let (total_leads, qualified_leads) = UserRepository::new(pool).count_leads().await?;
    let stages = StageRepository::new(pool).list().await?;
    let qualifications = QualificationRepository::new(pool).list().await?;

    Ok(LeadStats {
        total_leads,
        qualified_leads,
        active_deals: count_active_deals(&qualifications, &stages),
        conversion_rate: conversion_rate(qualified_leads, total_leads),
    })
}

// =============================================================================
// Lead list
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageBadge {
    pub name: String,
    pub color: String,
}

/// Qualification fields shown next to a lead in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualificationBadge {
    pub score: u8,
    pub interest_level: InterestLevel,
    pub stage: Option<StageBadge>,
}

/// A row of the lead list.
#[derive(Debug, Clone, Serialize)]
pub struct LeadSummary {
    #[serde(flatten)]
    pub user: User,
    pub qualification: Option<QualificationBadge>,
}

/// Attach qualification badges to users, keeping the users' order.
#[must_use]
pub fn summarize_leads(
    users: Vec<User>,
    qualifications: &[Qualification],
    stages: &[Stage],
) -> Vec<LeadSummary> {
    let stages: HashMap<StageId, &Stage> = stages.iter().map(|s| (s.id, s)).collect();
    let by_user: HashMap<UserId, &Qualification> =
        qualifications.iter().map(|q| (q.user_id, q)).collect();

    users
        .into_iter()
        .map(|user| {
            let qualification = by_user.get(&user.id).map(|q| QualificationBadge {
                score: q.score,
                interest_level: q.interest_level,
                stage: q
                    .stage_id
                    .and_then(|id| stages.get(&id))
                    .map(|s| StageBadge {
                        name: s.name.clone(),
                        color: s.color.clone(),
                    }),
            });
            LeadSummary {
                user,
                qualification,
            }
        })
        .collect()
}

/// Which leads to show by pipeline position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StageFilter {
    #[default]
    All,
    /// Leads marked as qualified.
    Qualified,
    /// Leads whose qualification is in the stage with this name.
    Stage(String),
}

impl StageFilter {
    /// Read the `stage` query value; absent or blank means all.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "all") => Self::All,
            Some("qualified") => Self::Qualified,
            Some(name) => Self::Stage(name.to_owned()),
        }
    }
}

/// Lead list filter.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Matched case-insensitively against name and email, verbatim against
    /// the phone digits.
    pub search: String,
    pub stage: StageFilter,
}

impl LeadFilter {
    #[must_use]
    pub fn matches(&self, lead: &LeadSummary) -> bool {
        let term = self.search.to_lowercase();
        let user = &lead.user;

        let matches_search = user.name.to_lowercase().contains(&term)
            || user.phone.as_str().contains(self.search.as_str())
            || user
                .email
                .as_ref()
                .is_some_and(|e| e.as_str().to_lowercase().contains(&term));

        matches_search
            && match &self.stage {
                StageFilter::All => true,
                StageFilter::Qualified => user.is_qualified,
                StageFilter::Stage(name) => lead
                    .qualification
                    .as_ref()
                    .and_then(|q| q.stage.as_ref())
                    .is_some_and(|s| &s.name == name),
            }
    }
}

#[must_use]
pub fn filter_leads(leads: Vec<LeadSummary>, filter: &LeadFilter) -> Vec<LeadSummary> {
    leads.into_iter().filter(|l| filter.matches(l)).collect()
}

/// Leads newest first, filtered.
///
/// # Errors
///
/// Returns `CrmError::Repository` if the store fails.
#[instrument(skip(pool))]
pub async fn list_leads(pool: &PgPool, filter: &LeadFilter) -> Result<Vec<LeadSummary>, CrmError> {
    let users = UserRepository::new(pool).list_newest_first().await?;
    let qualifications = QualificationRepository::new(pool).list().await?;
    let stages = StageRepository::new(pool).list().await?;

    Ok(filter_leads(
        summarize_leads(users, &qualifications, &stages),
        filter,
    ))
}

// =============================================================================
// Lead detail and edits
// =============================================================================

/// A qualification with its stage and source resolved to names.
#[derive(Debug, Clone, Serialize)]
pub struct QualificationDetail {
    #[serde(flatten)]
    pub qualification: Qualification,
    pub stage_name: Option<String>,
    pub source_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadDetail {
    pub user: User,
    pub qualification: Option<QualificationDetail>,
    /// Newest first, at most [`RECENT_INTERACTIONS`].
    pub interactions: Vec<Interaction>,
}

/// Everything known about one lead.
///
/// # Errors
///
/// Returns `CrmError::LeadNotFound` for an unknown id.
#[instrument(skip(pool))]
pub async fn lead_detail(pool: &PgPool, user_id: UserId) -> Result<LeadDetail, CrmError> {
    let user = UserRepository::new(pool)
        .get_by_id(user_id)
        .await?
        .ok_or(CrmError::LeadNotFound)?;

    let qualification = match QualificationRepository::new(pool).get_by_user(user_id).await? {
        Some(qualification) => {
            let stage_name = match qualification.stage_id {
                Some(id) => StageRepository::new(pool).get(id).await?.map(|s| s.name),
                None => None,
            };
            let source_name = match qualification.source_id {
                Some(id) => SourceRepository::new(pool).get(id).await?.map(|s| s.name),
                None => None,
            };
            Some(QualificationDetail {
                qualification,
                stage_name,
                source_name,
            })
        }
        None => None,
    };

    let interactions = InteractionRepository::new(pool)
        .recent_for_user(user_id, RECENT_INTERACTIONS)
        .await?;

    Ok(LeadDetail {
        user,
        qualification,
        interactions,
    })
}

/// Qualification form. Blank text fields are stored as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QualificationInput {
    /// 0 to 100. Left unchanged on update when absent; 0 on create.
    pub score: Option<u8>,
    pub company_name: Option<String>,
    pub company_size: CompanySize,
    pub industry: Option<String>,
    pub job_title: Option<String>,
    pub interest_level: InterestLevel,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub stage_id: Option<StageId>,
}

impl QualificationInput {
    /// Validate into storable fields, using `current_score` when no score
    /// was given.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::InvalidInput` for a score above 100 or a negative
    /// estimated value.
    pub fn into_fields(self, current_score: u8) -> Result<QualificationFields, CrmError> {
        let score = self.score.unwrap_or(current_score);
        if score > MAX_SCORE {
            return Err(CrmError::InvalidInput(format!(
                "score must be between 0 and {MAX_SCORE}"
            )));
        }
        if self.estimated_value.is_some_and(|v| v.is_sign_negative()) {
            return Err(CrmError::InvalidInput(
                "estimated value cannot be negative".to_owned(),
            ));
        }

        Ok(QualificationFields {
            score,
            company_name: non_blank(self.company_name),
            company_size: self.company_size,
            industry: non_blank(self.industry),
            job_title: non_blank(self.job_title),
            interest_level: self.interest_level,
            estimated_value: self.estimated_value,
            notes: non_blank(self.notes),
            stage_id: self.stage_id,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Description of the interaction logged on a stage change.
#[must_use]
pub fn stage_move_description(stage_name: &str) -> String {
    format!("Lead movido para {stage_name}")
}

/// Open a qualification for a lead.
///
/// Without a stage the lead enters the first pipeline stage. The source is
/// the one named by the user's `lead_source`, if it exists.
///
/// # Errors
///
/// Returns `CrmError::LeadNotFound`, `CrmError::QualificationExists`,
/// `CrmError::UnknownStage`, `CrmError::NoStages` or
/// `CrmError::InvalidInput` as appropriate.
#[instrument(skip(pool, input))]
pub async fn create_qualification(
    pool: &PgPool,
    user_id: UserId,
    input: QualificationInput,
) -> Result<Qualification, CrmError> {
    let mut fields = input.into_fields(0)?;

    let user = UserRepository::new(pool)
        .get_by_id(user_id)
        .await?
        .ok_or(CrmError::LeadNotFound)?;

    let stages = StageRepository::new(pool);
    let stage = match fields.stage_id {
        Some(id) => stages.get(id).await?.ok_or(CrmError::UnknownStage)?,
        None => stages.first().await?.ok_or(CrmError::NoStages)?,
    };
    fields.stage_id = Some(stage.id);

    let source_id = match user.lead_source.as_deref() {
        Some(name) => SourceRepository::new(pool)
            .find_by_name(name)
            .await?
            .map(|s| s.id),
        None => None,
    };

    let qualification = QualificationRepository::new(pool)
        .create(user_id, source_id, &fields)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CrmError::QualificationExists,
            other => other.into(),
        })?;

    tracing::info!(qualification_id = %qualification.id, stage = %stage.name, "Qualification created");
    Ok(qualification)
}

/// Overwrite a lead's qualification.
///
/// Moving the lead to a different stage appends an interaction recording
/// the move.
///
/// # Errors
///
/// Returns `CrmError::NoQualification`, `CrmError::UnknownStage` or
/// `CrmError::InvalidInput` as appropriate.
#[instrument(skip(pool, input))]
pub async fn update_qualification(
    pool: &PgPool,
    user_id: UserId,
    input: QualificationInput,
) -> Result<Qualification, CrmError> {
    let qualifications = QualificationRepository::new(pool);
    let current = qualifications
        .get_by_user(user_id)
        .await?
        .ok_or(CrmError::NoQualification)?;

    let fields = input.into_fields(current.score)?;

    let new_stage = match fields.stage_id {
        Some(id) => Some(
            StageRepository::new(pool)
                .get(id)
                .await?
                .ok_or(CrmError::UnknownStage)?,
        ),
        None => None,
    };

    let updated = qualifications.update(current.id, &fields).await?;

    if let Some(stage) = new_stage.filter(|s| current.stage_id != Some(s.id)) {
        InteractionRepository::new(pool)
            .create(
                user_id,
                InteractionType::Other,
                STAGE_CHANGE_SUBJECT,
                Some(&stage_move_description(&stage.name)),
            )
            .await?;
        tracing::info!(stage = %stage.name, "Lead moved");
    }

    Ok(updated)
}

/// Mark a lead as qualified.
///
/// # Errors
///
/// Returns `CrmError::LeadNotFound` for an unknown id.
#[instrument(skip(pool))]
pub async fn qualify_lead(pool: &PgPool, user_id: UserId) -> Result<User, CrmError> {
    UserRepository::new(pool)
        .mark_qualified(user_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CrmError::LeadNotFound,
            other => other.into(),
        })
}

/// A contact to record.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionInput {
    pub interaction_type: InteractionType,
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Record a contact with a lead and stamp its last contact time.
///
/// # Errors
///
/// Returns `CrmError::InvalidInput` for a blank subject and
/// `CrmError::LeadNotFound` for an unknown id.
#[instrument(skip(pool, input), fields(interaction_type = %input.interaction_type))]
pub async fn record_interaction(
    pool: &PgPool,
    user_id: UserId,
    input: InteractionInput,
) -> Result<Interaction, CrmError> {
    let subject = input.subject.trim();
    if subject.is_empty() {
        return Err(CrmError::InvalidInput("subject is required".to_owned()));
    }

    let users = UserRepository::new(pool);
    if users.get_by_id(user_id).await?.is_none() {
        return Err(CrmError::LeadNotFound);
    }

    let description = non_blank(input.description);
    let interaction = InteractionRepository::new(pool)
        .create(user_id, input.interaction_type, subject, description.as_deref())
        .await?;
    users.touch_last_contact(user_id).await?;

    Ok(interaction)
}

/// Pipeline stages in order.
///
/// # Errors
///
/// Returns `CrmError::Repository` if the store fails.
pub async fn stages(pool: &PgPool) -> Result<Vec<Stage>, CrmError> {
    Ok(StageRepository::new(pool).list().await?)
}

// =============================================================================
// Pipeline
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineLead {
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub estimated_value: Option<Decimal>,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineColumn {
    pub stage: Stage,
    pub leads: Vec<PipelineLead>,
    /// Sum of the leads' estimated values; missing values count as zero.
    pub total_value: Decimal,
}

/// One column per stage, in the given order.
#[must_use]
pub fn build_pipeline(
    stages: Vec<Stage>,
    qualifications: &[Qualification],
    users: &[User],
) -> Vec<PipelineColumn> {
    let users: HashMap<UserId, &User> = users.iter().map(|u| (u.id, u)).collect();

    stages
        .into_iter()
        .map(|stage| {
            let leads: Vec<PipelineLead> = qualifications
                .iter()
                .filter(|q| q.stage_id == Some(stage.id))
                .filter_map(|q| {
                    users.get(&q.user_id).map(|u| PipelineLead {
                        id: u.id,
                        name: u.name.clone(),
                        phone: u.phone.clone(),
                        estimated_value: q.estimated_value,
                        score: q.score,
                    })
                })
                .collect();
            let total_value = leads.iter().filter_map(|l| l.estimated_value).sum();

            PipelineColumn {
                stage,
                leads,
                total_value,
            }
        })
        .collect()
}

/// The sales pipeline.
///
/// # Errors
///
/// Returns `CrmError::Repository` if the store fails.
#[instrument(skip(pool))]
pub async fn pipeline(pool: &PgPool) -> Result<Vec<PipelineColumn>, CrmError> {
    let stages = StageRepository::new(pool).list().await?;
    let qualifications = QualificationRepository::new(pool).list().await?;
    let users = UserRepository::new(pool).list_newest_first().await?;

    Ok(build_pipeline(stages, &qualifications, &users))
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `dd/mm/yyyy`.
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStep {
    pub stage: String,
    pub count: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub leads_per_day: Vec<DayCount>,
    pub top_sources: Vec<SourceCount>,
    pub funnel: Vec<FunnelStep>,
    pub average_score: u32,
}

/// Aggregate lead analytics.
///
/// - registrations per UTC day, oldest first, for the last seven days that
///   had any
/// - the five most common qualification sources (ties keep first appearance)
/// - qualifications per stage in pipeline order, empty stages left out
/// - mean qualification score rounded half up
#[must_use]
pub fn build_analytics(
    users: &[User],
    qualifications: &[Qualification],
    stages: &[Stage],
    sources: &[Source],
) -> Analytics {
    let mut per_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    for user in users {
        *per_day.entry(user.created_at.date_naive()).or_default() += 1;
    }
    let skip = per_day.len().saturating_sub(ANALYTICS_DAYS);
    let leads_per_day = per_day
        .into_iter()
        .skip(skip)
        .map(|(day, count)| DayCount {
            date: day.format("%d/%m/%Y").to_string(),
            count,
        })
        .collect();

    let source_names: HashMap<_, &str> = sources.iter().map(|s| (s.id, s.name.as_str())).collect();
    let mut top_sources: Vec<SourceCount> = Vec::new();
    for name in qualifications
        .iter()
        .filter_map(|q| q.source_id.and_then(|id| source_names.get(&id)))
    {
        match top_sources.iter_mut().find(|s| s.name == *name) {
            Some(entry) => entry.count += 1,
            None => top_sources.push(SourceCount {
                name: (*name).to_owned(),
                count: 1,
            }),
        }
    }
    top_sources.sort_by(|a, b| b.count.cmp(&a.count));
    top_sources.truncate(TOP_SOURCES);

    let funnel = stages
        .iter()
        .filter_map(|stage| {
            let count = qualifications
                .iter()
                .filter(|q| q.stage_id == Some(stage.id))
                .count() as u64;
            (count > 0).then(|| FunnelStep {
                stage: stage.name.clone(),
                count,
                color: stage.color.clone(),
            })
        })
        .collect();

    Analytics {
        leads_per_day,
        top_sources,
        funnel,
        average_score: average_score(qualifications),
    }
}

/// Mean score rounded half up; 0 without qualifications.
fn average_score(qualifications: &[Qualification]) -> u32 {
    let n = u32::try_from(qualifications.len()).unwrap_or(u32::MAX);
    if n == 0 {
        return 0;
    }
    let sum: u32 = qualifications.iter().map(|q| u32::from(q.score)).sum();
    (2 * sum + n) / (2 * n)
}

/// Lead analytics.
///
/// # Errors
///
/// Returns `CrmError::Repository` if the store fails.
#[instrument(skip(pool))]
pub async fn analytics(pool: &PgPool) -> Result<Analytics, CrmError> {
    let users = UserRepository::new(pool).list_newest_first().await?;
    let qualifications = QualificationRepository::new(pool).list().await?;
    let stages = StageRepository::new(pool).list().await?;
    let sources = SourceRepository::new(pool).list().await?;

    Ok(build_analytics(&users, &qualifications, &stages, &sources))
}
