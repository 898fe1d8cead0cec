use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::state::ServerState;
use agent_ml::{ArticleAnalysis, QueryAnalysis};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// Request to tag one article
#[derive(Debug, Deserialize)]
pub struct AnalyzeArticleRequest {
    pub document_id: String,
    pub title_ru: String,
    pub abstract_ru: String,
}

/// Request to interpret a free-text user query
#[derive(Debug, Deserialize)]
pub struct AnalyzeQueryRequest {
    pub user_query: String,

    /// Stop-word context; `article_search` when omitted
    #[serde(default)]
    pub context: Option<String>,
}

/// Tag an article's title and abstract and return both embeddings
pub async fn analyze_article(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<AnalyzeArticleRequest>,
) -> ServerResult<Json<ArticleAnalysis>> {
    tracing::debug!(document_id = %request.document_id, "analyze article");

    let service = state.service.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        service.analyze_article(
            &request.document_id,
            &request.title_ru,
            &request.abstract_ru,
        )
    })
    .await??;

    Ok(Json(analysis))
}

/// Interpret a user query and embed what is left of it
pub async fn analyze_query(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<AnalyzeQueryRequest>,
) -> ServerResult<Json<QueryAnalysis>> {
    let service = state.service.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        service.analyze_query(&request.user_query, request.context.as_deref())
    })
    .await??;

    Ok(Json(analysis))
}
