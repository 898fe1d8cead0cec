use std::collections::HashMap;
use std::sync::Arc;

use semantic::Embedder;
use vector::cosine_similarity;

use crate::config::{AnalysisConfig, ExpertConfig};
use crate::outcome::{BatchReport, ItemOutcome};
use crate::types::{Author, Department, DepartmentScore, ExpertScore};
use crate::AnalysisError;

/// Scores authors and organizational units against a topic string.
///
/// Both scores are heuristics: the similarity of the candidate's topic strings to
/// the requested topic, plus a capped bonus for volume.
pub struct ExpertAnalyzer {
    embedder: Arc<dyn Embedder>,
    config: ExpertConfig,
}

impl ExpertAnalyzer {
    pub fn new(embedder: Arc<dyn Embedder>, config: &AnalysisConfig) -> Self {
        Self {
            embedder,
            config: config.experts.clone(),
        }
    }

    /// Scores every author and returns those above the expertise threshold, best first.
    ///
    /// Fails only when `topic` itself cannot be embedded.
    pub fn analyze_experts(
        &self,
        topic: &str,
        authors: &[Author],
    ) -> Result<BatchReport<ExpertScore>, AnalysisError> {
        tracing::info!(topic = %topic, authors = authors.len(), "analyzing experts");
        let topic_vec = self.embedder.embed(topic)?;

        let mut report: BatchReport<ExpertScore> = authors
            .iter()
            .map(|author| self.score_expert(author, topic, &topic_vec))
            .collect();
        report.sort_desc_by(|e| e.expertise_score);
        Ok(report)
    }

    /// Scores every department and returns those above the strength threshold, best first.
    pub fn analyze_departments(
        &self,
        topic: &str,
        departments: &[Department],
    ) -> Result<BatchReport<DepartmentScore>, AnalysisError> {
        tracing::info!(
            topic = %topic,
            departments = departments.len(),
            "analyzing departments"
        );
        let topic_vec = self.embedder.embed(topic)?;

        let mut report: BatchReport<DepartmentScore> = departments
            .iter()
            .map(|dept| self.score_department(dept, &topic_vec))
            .collect();
        report.sort_desc_by(|d| d.strength_score);
        Ok(report)
    }

    /// Average similarity of the author's topics to `topic_vec`, plus a bonus per topic.
    /// Authors without any topic strings are never experts.
    pub fn score_expert(
        &self,
        author: &Author,
        topic: &str,
        topic_vec: &[f32],
    ) -> ItemOutcome<ExpertScore> {
        let cfg = &self.config;
        let topics = &author.article_topics;
        if topics.is_empty() {
            return ItemOutcome::BelowThreshold {
                id: author.author_id.clone(),
                score: 0.0,
            };
        }

        let sims = match self.similarities(topic_vec, topics) {
            Ok(sims) => sims,
            Err(err) => {
                return ItemOutcome::Skipped {
                    id: author.author_id.clone(),
                    reason: err.to_string(),
                }
            }
        };

        let avg = sims.iter().sum::<f32>() / sims.len() as f32;
        let bonus = (cfg.expert_bonus_per_topic * topics.len() as f32).min(cfg.expert_bonus_cap);
        let score = (avg + bonus).min(1.0);
        tracing::debug!(author_id = %author.author_id, avg, bonus, score, "author scored");

        if score <= cfg.expert_threshold {
            return ItemOutcome::BelowThreshold {
                id: author.author_id.clone(),
                score,
            };
        }

        ItemOutcome::Accepted(ExpertScore {
            author_id: author.author_id.clone(),
            expertise_score: score,
            topic_article_count: self.count_matches(&sims),
            total_citations: author
                .article_ids
                .len()
                .saturating_mul(cfg.citations_per_article),
            last_activity_year: cfg.placeholder_activity_year,
            related_topics: most_frequent(topics, topic, cfg.max_related_topics),
        })
    }

    /// Share of the department's topics that match `topic_vec`, plus a bonus per match.
    pub fn score_department(
        &self,
        department: &Department,
        topic_vec: &[f32],
    ) -> ItemOutcome<DepartmentScore> {
        let cfg = &self.config;
        let topics = &department.article_topics;
        if topics.is_empty() {
            return ItemOutcome::BelowThreshold {
                id: department.organization_id.clone(),
                score: 0.0,
            };
        }

        let match_count = match self.similarities(topic_vec, topics) {
            Ok(sims) => self.count_matches(&sims),
            Err(err) => {
                return ItemOutcome::Skipped {
                    id: department.organization_id.clone(),
                    reason: err.to_string(),
                }
            }
        };

        let ratio = match_count as f32 / topics.len() as f32;
        let bonus =
            (cfg.department_bonus_per_match * match_count as f32).min(cfg.department_bonus_cap);
        let score = (ratio + bonus).min(1.0);
        tracing::debug!(
            organization_id = %department.organization_id,
            match_count,
            score,
            "department scored"
        );

        if score <= cfg.department_threshold {
            return ItemOutcome::BelowThreshold {
                id: department.organization_id.clone(),
                score,
            };
        }

        ItemOutcome::Accepted(DepartmentScore {
            organization_id: department.organization_id.clone(),
            strength_score: score,
            expert_count: (department.author_ids.len() / 2).min(cfg.max_department_experts),
            total_articles: match_count,
            key_author_ids: department
                .author_ids
                .iter()
                .take(cfg.max_key_authors)
                .cloned()
                .collect(),
        })
    }

    fn similarities(&self, topic_vec: &[f32], topics: &[String]) -> Result<Vec<f32>, AnalysisError> {
        let refs: Vec<&str> = topics.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed_batch(&refs)?;
        vectors
            .iter()
            .map(|v| cosine_similarity(topic_vec, v).map_err(AnalysisError::from))
            .collect()
    }

    fn count_matches(&self, sims: &[f32]) -> usize {
        sims.iter()
            .filter(|&&s| s > self.config.topic_match_threshold)
            .count()
    }
}

/// Up to `limit` of `topics` other than `exclude`, most frequent first. Equal counts
/// keep first-seen order.
fn most_frequent(topics: &[String], exclude: &str, limit: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for topic in topics.iter().filter(|t| t.as_str() != exclude) {
        match index.get(topic.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(topic.as_str(), counts.len());
                counts.push((topic.as_str(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(topic, _)| topic.to_string())
        .collect()
}
