use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::AnalysisError;

/// Thresholds, weights and vocabularies used by all analyzers.
///
/// Every field has a default, so a config file only needs to mention what it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub topics: TopicConfig,
    /// Words dropped from user queries, keyed by search context.
    pub stop_words: HashMap<String, Vec<String>>,
    pub search: SearchConfig,
    pub experts: ExpertConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            topics: TopicConfig::default(),
            stop_words: Self::default_stop_words(),
            search: SearchConfig::default(),
            experts: ExpertConfig::default(),
        }
    }
}

impl AnalysisConfig {
    fn default_stop_words() -> HashMap<String, Vec<String>> {
        let sets: [(&str, &[&str]); 3] = [
            ("expert_search", &["найди", "покажи", "ищи", "экспертов", "авторов"]),
            ("department_search", &["кафедр", "подразделений", "факультетов", "где"]),
            ("article_search", &["статьи", "публикации", "работы", "про"]),
        ];
        sets.iter()
            .map(|(context, words)| {
                (
                    context.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.topics.validate()?;
        self.search.validate()?;
        self.experts.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopicConfig {
    /// Topic labels text is tagged against.
    pub catalog: Vec<String>,
    /// A label is assigned only when similarity is strictly above this.
    pub relevance_threshold: f32,
    /// Above this a tag is `main`, otherwise `secondary`.
    pub main_threshold: f32,
    pub max_tags: usize,
    /// Cap after merging title and abstract tags.
    pub max_combined: usize,
    /// Query words must be longer than this (in characters) to count as a concept.
    pub min_concept_chars: usize,
    pub max_concepts: usize,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            relevance_threshold: 0.3,
            main_threshold: 0.7,
            max_tags: 5,
            max_combined: 3,
            min_concept_chars: 3,
            max_concepts: 5,
        }
    }
}

impl TopicConfig {
    fn validate(&self) -> Result<(), AnalysisError> {
        if self.catalog.iter().all(|label| label.trim().is_empty()) {
            return Err(AnalysisError::InvalidConfig(
                "topics.catalog must contain at least one label".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.relevance_threshold)
            || !(0.0..=1.0).contains(&self.main_threshold)
        {
            return Err(AnalysisError::InvalidConfig(
                "topic thresholds must be between 0.0 and 1.0".into(),
            ));
        }
        if self.main_threshold < self.relevance_threshold {
            return Err(AnalysisError::InvalidConfig(
                "topics.main_threshold must be >= topics.relevance_threshold".into(),
            ));
        }
        if self.max_tags == 0 || self.max_combined == 0 {
            return Err(AnalysisError::InvalidConfig(
                "topics.max_tags and topics.max_combined must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_catalog() -> Vec<String> {
    [
        "машинное обучение",
        "искусственный интеллект",
        "нейронные сети",
        "обработка естественного языка",
        "компьютерное зрение",
        "анализ данных",
        "информационная безопасность",
        "распределенные системы",
        "базы данных",
        "программная инженерия",
        "робототехника",
        "биоинформатика",
        "квантовые вычисления",
        "математическое моделирование",
        "экономика",
        "физика",
        "химия",
        "медицина",
        "экология",
        "образование",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Weights for blending title and abstract similarity into one relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub title_weight: f32,
    pub abstract_weight: f32,
    /// Used when a request does not say how many results it wants.
    pub max_results: usize,
    pub high_relevance: f32,
    pub medium_relevance: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.6,
            abstract_weight: 0.4,
            max_results: 10,
            high_relevance: 0.8,
            medium_relevance: 0.6,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<(), AnalysisError> {
        for (name, weight) in [
            ("title_weight", self.title_weight),
            ("abstract_weight", self.abstract_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "search.{name} must be between 0.0 and 1.0"
                )));
            }
        }
        if self.max_results == 0 {
            return Err(AnalysisError::InvalidConfig(
                "search.max_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExpertConfig {
    /// Authors are emitted only when their score is strictly above this.
    pub expert_threshold: f32,
    pub expert_bonus_per_topic: f32,
    pub expert_bonus_cap: f32,
    /// Similarity above which a topic string counts as on-topic.
    pub topic_match_threshold: f32,
    pub citations_per_article: usize,
    /// Reported as `last_activity_year` until real publication dates are wired in.
    pub placeholder_activity_year: i32,
    pub max_related_topics: usize,
    pub department_threshold: f32,
    pub department_bonus_per_match: f32,
    pub department_bonus_cap: f32,
    pub max_department_experts: usize,
    pub max_key_authors: usize,
}

impl Default for ExpertConfig {
    fn default() -> Self {
        Self {
            expert_threshold: 0.3,
            expert_bonus_per_topic: 0.1,
            expert_bonus_cap: 0.3,
            topic_match_threshold: 0.5,
            citations_per_article: 20,
            placeholder_activity_year: 2023,
            max_related_topics: 3,
            department_threshold: 0.2,
            department_bonus_per_match: 0.05,
            department_bonus_cap: 0.3,
            max_department_experts: 10,
            max_key_authors: 3,
        }
    }
}

impl ExpertConfig {
    fn validate(&self) -> Result<(), AnalysisError> {
        if self.expert_bonus_cap < 0.0 || self.department_bonus_cap < 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "bonus caps must be >= 0.0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.topic_match_threshold) {
            return Err(AnalysisError::InvalidConfig(
                "experts.topic_match_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.topics.catalog.len(), 20);
        assert_eq!(cfg.search.title_weight, 0.6);
        assert_eq!(cfg.experts.placeholder_activity_year, 2023);
    }

    #[test]
    fn default_stop_words_cover_all_contexts() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.stop_words.len(), 3);
        assert!(cfg.stop_words["article_search"].contains(&"про".to_string()));
        assert!(cfg.stop_words["expert_search"].contains(&"экспертов".to_string()));
        assert!(cfg.stop_words["department_search"].contains(&"где".to_string()));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"search": {"max_results": 3}}"#).unwrap();
        assert_eq!(cfg.search.max_results, 3);
        assert_eq!(cfg.search.abstract_weight, 0.4);
        assert_eq!(cfg.stop_words.len(), 3);
        assert_eq!(cfg.topics.max_tags, 5);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let mut cfg = AnalysisConfig::default();
        cfg.topics.catalog = vec!["  ".into()];
        match cfg.validate() {
            Err(AnalysisError::InvalidConfig(msg)) => assert!(msg.contains("catalog")),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let mut cfg = AnalysisConfig::default();
        cfg.search.title_weight = 1.5;
        match cfg.validate() {
            Err(AnalysisError::InvalidConfig(msg)) => assert!(msg.contains("title_weight")),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn inverted_topic_thresholds_are_rejected() {
        let mut cfg = AnalysisConfig::default();
        cfg.topics.main_threshold = 0.2;
        assert!(cfg.validate().is_err());
    }
}
