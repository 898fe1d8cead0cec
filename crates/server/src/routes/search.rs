use crate::error::ServerResult;
use crate::extract::ApiJson;
use crate::state::ServerState;
use agent_ml::{Article, EmbeddingVector, SearchResult, SkippedItem};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Semantic search request
#[derive(Debug, Deserialize)]
pub struct SemanticSearchRequest {
    /// Base64 query embedding, decoded while the body is parsed
    pub query_vector: EmbeddingVector,

    #[serde(default)]
    pub articles: Vec<Article>,

    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Semantic search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SemanticSearchResponse {
    pub results: Vec<SearchResult>,
    pub total_found: usize,

    /// Articles whose embeddings could not be decoded or compared
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedItem>,
}

/// Rank the supplied articles against a query embedding
pub async fn semantic_search(
    State(state): State<Arc<ServerState>>,
    ApiJson(request): ApiJson<SemanticSearchRequest>,
) -> ServerResult<Json<SemanticSearchResponse>> {
    tracing::debug!(
        articles = request.articles.len(),
        dimension = request.query_vector.dimension(),
        "semantic search"
    );

    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || {
        service.semantic_search(
            request.query_vector.as_slice(),
            &request.articles,
            request.max_results,
        )
    })
    .await?;

    Ok(Json(SemanticSearchResponse {
        total_found: report.accepted.len(),
        results: report.accepted,
        skipped: report.skipped,
    }))
}
