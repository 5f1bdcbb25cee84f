//! CRM records: pipeline stages, sources, qualifications, interactions,
//! and the usage log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use nuvra_core::{
    AnalysisType, CompanySize, InteractionId, InteractionType, InterestLevel, QualificationId,
    SourceId, StageId, UsageLogId, UserId,
};

/// A pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub order_position: i32,
    /// Display color (`#RRGGBB`).
    pub color: String,
}

/// Where a lead came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
}

/// Sales qualification of a lead. At most one per user.
#[derive(Debug, Clone, Serialize)]
pub struct Qualification {
    pub id: QualificationId,
    pub user_id: UserId,
    /// 0 to 100.
    pub score: u8,
    pub company_name: Option<String>,
    pub company_size: CompanySize,
    pub industry: Option<String>,
    pub job_title: Option<String>,
    pub interest_level: InterestLevel,
    pub estimated_value: Option<Decimal>,
    pub notes: Option<String>,
    pub stage_id: Option<StageId>,
    pub source_id: Option<SourceId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recorded contact with a lead.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub user_id: UserId,
    pub interaction_type: InteractionType,
    pub subject: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One analysis or chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct UsageLog {
    pub id: UsageLogId,
    pub user_id: UserId,
    pub input_text: String,
    pub analysis_type: AnalysisType,
    pub created_at: DateTime<Utc>,
}
