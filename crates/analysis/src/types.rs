use serde::{Deserialize, Serialize};
use vector::EmbeddingVector;

/// Whether a topic is a strong match for the text or only a plausible one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    Main,
    Secondary,
}

/// A catalog topic assigned to a piece of text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicTag {
    pub topic_name: String,
    /// Cosine similarity between the text and the topic label, in `[0, 1]` for emitted tags.
    pub confidence: f32,
    pub topic_type: TopicType,
}

/// Result of tagging an article's title and abstract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleAnalysis {
    pub topics: Vec<TopicTag>,
    pub title_embedding: EmbeddingVector,
    pub abstract_embedding: EmbeddingVector,
}

/// A free-text query cleaned up for retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryAnalysis {
    pub interpreted_query: String,
    pub key_concepts: Vec<String>,
    pub query_vector: EmbeddingVector,
    /// Echo of the search context the query was interpreted in.
    pub query_type: String,
}

/// A search candidate with caller-supplied, still encoded embeddings.
///
/// The embeddings stay as transport strings so one malformed article can be skipped
/// during ranking instead of failing the whole request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub document_id: String,
    #[serde(default)]
    pub title_ru: String,
    #[serde(default)]
    pub abstract_ru: String,
    pub title_embedding: String,
    pub abstract_embedding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub document_id: String,
    pub relevance_score: f32,
    pub matched_concepts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub author_id: String,
    #[serde(default)]
    pub article_ids: Vec<String>,
    #[serde(default)]
    pub article_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub organization_id: String,
    #[serde(default)]
    pub author_ids: Vec<String>,
    #[serde(default)]
    pub article_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpertScore {
    pub author_id: String,
    pub expertise_score: f32,
    /// Topic strings of the author that are close to the requested topic.
    pub topic_article_count: usize,
    pub total_citations: usize,
    pub last_activity_year: i32,
    pub related_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentScore {
    pub organization_id: String,
    pub strength_score: f32,
    pub expert_count: usize,
    pub total_articles: usize,
    pub key_author_ids: Vec<String>,
}
