use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::state::ServerState;
use agent_ml::{Author, Department, DepartmentScore, ExpertScore, SkippedItem};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AnalyzeExpertsRequest {
    pub topic: String,
    pub authors: Vec<Author>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeExpertsResponse {
    pub experts: Vec<ExpertScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItem>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeDepartmentsRequest {
    pub topic: String,
    pub departments: Vec<Department>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeDepartmentsResponse {
    pub departments: Vec<DepartmentScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItem>,
}

/// Score authors against a topic
pub async fn analyze_experts(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<AnalyzeExpertsRequest>,
) -> ServerResult<Json<AnalyzeExpertsResponse>> {
    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || {
        service.analyze_experts(&request.topic, &request.authors)
    })
    .await??;

    Ok(Json(AnalyzeExpertsResponse {
        experts: report.accepted,
        skipped: report.skipped,
    }))
}

/// Score departments against a topic
pub async fn analyze_departments(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<AnalyzeDepartmentsRequest>,
) -> ServerResult<Json<AnalyzeDepartmentsResponse>> {
    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || {
        service.analyze_departments(&request.topic, &request.departments)
    })
    .await??;

    Ok(Json(AnalyzeDepartmentsResponse {
        departments: report.accepted,
        skipped: report.skipped,
    }))
}
