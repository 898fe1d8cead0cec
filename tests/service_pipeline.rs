//! End-to-end runs of the service built from a YAML file in `fast` mode.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use agent_ml::{Article, Author, EmbeddingVector, MlConfig, MlService};

const CONFIG: &str = r#"
version: "1.0"
name: "pipeline-test"
semantic:
  mode: "fast"
  dimension: 48
analysis:
  topics:
    catalog: ["машинное обучение", "биоинформатика", "экология"]
  search:
    max_results: 3
"#;

async fn service() -> MlService {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let cfg = MlConfig::from_file(file.path()).unwrap();
    MlService::from_config(&cfg).await.unwrap()
}

fn article(id: &str, title: &EmbeddingVector, abstract_vec: &EmbeddingVector) -> Article {
    Article {
        document_id: id.into(),
        title_ru: String::new(),
        abstract_ru: String::new(),
        title_embedding: title.encode(),
        abstract_embedding: abstract_vec.encode(),
    }
}

#[tokio::test]
async fn analyzed_article_is_found_by_its_own_query() {
    let service = service().await;

    let query = service
        .analyze_query("найти статьи про машинное обучение", None)
        .unwrap();
    assert_eq!(query.interpreted_query, "найти машинное обучение");
    assert_eq!(query.key_concepts, vec!["найти", "машинное", "обучение"]);
    assert_eq!(query.query_vector.dimension(), 48);

    // an article whose embeddings equal the query vector must come out on top
    let own = article("own", &query.query_vector, &query.query_vector);
    let others: Vec<Article> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| {
            let analysis = service
                .analyze_article(id, &format!("заголовок {id}"), &format!("аннотация {id}"))
                .unwrap();
            article(id, &analysis.title_embedding, &analysis.abstract_embedding)
        })
        .collect();

    let mut articles = others;
    articles.insert(2, own);

    let report = service.semantic_search(query.query_vector.as_slice(), &articles, None);
    assert!(report.skipped.is_empty());
    assert_eq!(report.accepted.len(), 3);
    assert_eq!(report.accepted[0].document_id, "own");
    assert!((report.accepted[0].relevance_score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn outputs_are_deterministic_across_threads() {
    let service = Arc::new(service().await);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let analysis = service
                    .analyze_article("doc", "Экология городских водоёмов", "Мониторинг качества воды")
                    .unwrap();
                let experts = service
                    .analyze_experts(
                        "экология",
                        &[Author {
                            author_id: "a1".into(),
                            article_ids: vec!["p1".into()],
                            article_topics: vec!["экология".into(), "гидрология".into()],
                        }],
                    )
                    .unwrap();
                (analysis, experts.accepted)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = &results[0];
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(first, result, "thread {i} produced different output");
    }
}

#[tokio::test]
async fn minimal_yaml_uses_defaults() {
    let cfg = MlConfig::from_yaml("version: \"1.0\"\nsemantic:\n  mode: \"fast\"\n").unwrap();
    assert_eq!(cfg.analysis.search.max_results, 10);
    assert_eq!(cfg.analysis.topics.catalog.len(), 20);

    let service = MlService::from_config(&cfg).await.unwrap();
    assert_eq!(service.embedder().dimension(), 384);
}
