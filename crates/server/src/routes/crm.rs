//! CRM endpoints over registered users.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use nuvra_core::UserId;

use crate::error::AppError;
use crate::models::{Interaction, Qualification, Stage, User};
use crate::services::crm::{
    self, Analytics, InteractionInput, LeadDetail, LeadFilter, LeadStats, LeadSummary,
    PipelineColumn, QualificationInput, StageFilter,
};
use crate::state::AppState;

/// Build the CRM router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crm/stats", get(stats))
        .route("/crm/leads", get(list_leads))
        .route("/crm/leads/{id}", get(lead_detail))
        .route("/crm/leads/{id}/qualify", post(qualify))
        .route(
            "/crm/leads/{id}/qualification",
            post(create_qualification).put(update_qualification),
        )
        .route("/crm/leads/{id}/interactions", post(record_interaction))
        .route("/crm/stages", get(stages))
        .route("/crm/pipeline", get(pipeline))
        .route("/crm/analytics", get(analytics))
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

impl From<LeadsQuery> for LeadFilter {
    fn from(query: LeadsQuery) -> Self {
        Self {
            stage: StageFilter::parse(query.stage.as_deref()),
            search: query.search.unwrap_or_default(),
        }
    }
}

async fn stats(State(state): State<AppState>) -> Result<Json<LeadStats>, AppError> {
    Ok(Json(crm::stats(state.pool()).await?))
}

async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<LeadsQuery>,
) -> Result<Json<Vec<LeadSummary>>, AppError> {
    let filter = LeadFilter::from(query);
    Ok(Json(crm::list_leads(state.pool(), &filter).await?))
}

async fn lead_detail(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<LeadDetail>, AppError> {
    Ok(Json(crm::lead_detail(state.pool(), id).await?))
}

async fn qualify(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    Ok(Json(crm::qualify_lead(state.pool(), id).await?))
}

async fn create_qualification(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    input: Option<Json<QualificationInput>>,
) -> Result<(StatusCode, Json<Qualification>), AppError> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    let qualification = crm::create_qualification(state.pool(), id, input).await?;
    Ok((StatusCode::CREATED, Json(qualification)))
}

async fn update_qualification(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(input): Json<QualificationInput>,
) -> Result<Json<Qualification>, AppError> {
    Ok(Json(crm::update_qualification(state.pool(), id, input).await?))
}

async fn record_interaction(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(input): Json<InteractionInput>,
) -> Result<(StatusCode, Json<Interaction>), AppError> {
    let interaction = crm::record_interaction(state.pool(), id, input).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

async fn stages(State(state): State<AppState>) -> Result<Json<Vec<Stage>>, AppError> {
    Ok(Json(crm::stages(state.pool()).await?))
}

async fn pipeline(State(state): State<AppState>) -> Result<Json<Vec<PipelineColumn>>, AppError> {
    Ok(Json(crm::pipeline(state.pool()).await?))
}

async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>, AppError> {
    Ok(Json(crm::analytics(state.pool()).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;

    use super::*;
    use crate::routes::test_support::{json_request, send};

    #[test]
    fn test_query_to_filter() {
        let filter = LeadFilter::from(LeadsQuery {
            search: Some("ana".to_owned()),
            stage: Some("qualified".to_owned()),
        });
        assert_eq!(filter.search, "ana");
        assert_eq!(filter.stage, StageFilter::Qualified);

        let filter = LeadFilter::from(LeadsQuery::default());
        assert!(filter.search.is_empty());
        assert_eq!(filter.stage, StageFilter::All);
    }

    #[tokio::test]
    async fn test_malformed_lead_id() {
        let (status, _) = send(
            Request::get("/crm/leads/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_interaction_subject() {
        let uri = format!("/crm/leads/{}/interactions", UserId::generate());
        let request = json_request(
            "POST",
            &uri,
            &json!({"interaction_type": "call", "subject": "  "}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad request: invalid input: subject is required");
    }

    #[tokio::test]
    async fn test_out_of_range_score() {
        let uri = format!("/crm/leads/{}/qualification", UserId::generate());
        let (status, _) = send(json_request("POST", &uri, &json!({"score": 150}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failure_is_hidden() {
        let (status, body) = send(Request::get("/crm/stats").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
