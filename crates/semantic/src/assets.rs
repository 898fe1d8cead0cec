use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{SemanticConfig, SemanticError};

/// Local paths of a model and its tokenizer, known to exist.
#[derive(Debug, Clone)]
pub(crate) struct ModelAssets {
    pub(crate) model_path: PathBuf,
    pub(crate) tokenizer_path: PathBuf,
}

impl ModelAssets {
    /// Ensures that the model and tokenizer exist locally, downloading them when URLs are provided.
    pub(crate) async fn resolve(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let model_path = ensure_local_file(&cfg.model_path, cfg.model_url.as_deref(), || {
            SemanticError::ModelNotFound(cfg.model_path.display().to_string())
        })
        .await?;

        let tokenizer_target = tokenizer_storage_path(cfg)?;
        let tokenizer_path =
            ensure_local_file(&tokenizer_target, cfg.tokenizer_url.as_deref(), || {
                SemanticError::TokenizerMissing(tokenizer_target.display().to_string())
            })
            .await?;

        Ok(Self {
            model_path,
            tokenizer_path,
        })
    }
}

/// Determines where the tokenizer should be stored. When no explicit path is supplied we infer a
/// filename from the remote URL and place it next to the model file.
fn tokenizer_storage_path(cfg: &SemanticConfig) -> Result<PathBuf, SemanticError> {
    if let Some(path) = &cfg.tokenizer_path {
        return Ok(path.clone());
    }

    if let Some(url) = &cfg.tokenizer_url {
        let inferred_name = infer_filename_from_url(url).unwrap_or_else(|| "tokenizer.json".into());
        let base_dir = cfg
            .model_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(base_dir.join(inferred_name));
    }

    Err(SemanticError::TokenizerMissing(cfg.model_name.clone()))
}

/// Returns `target` if it already exists, otherwise attempts to download `remote_url`.
async fn ensure_local_file<F>(
    target: &Path,
    remote_url: Option<&str>,
    on_missing: F,
) -> Result<PathBuf, SemanticError>
where
    F: FnOnce() -> SemanticError,
{
    if target.exists() {
        return Ok(target.to_path_buf());
    }

    match remote_url {
        Some(url) => {
            download_to_path(target, url).await?;
            Ok(target.to_path_buf())
        }
        None => Err(on_missing()),
    }
}

/// Downloads `url` into `target`, creating parent directories as needed.
async fn download_to_path(target: &Path, url: &str) -> Result<(), SemanticError> {
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::info!(url = %url, target = %target.display(), "downloading model asset");

    let response = reqwest::get(url)
        .await
        .map_err(|e| SemanticError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SemanticError::Download(format!(
            "unexpected status {status} while fetching {url}"
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SemanticError::Download(e.to_string()))?;

    // a partial download must never be mistaken for a usable asset
    let staging = target.with_extension("part");
    fs::write(&staging, &bytes)?;
    fs::rename(&staging, target)?;
    tracing::info!(bytes = bytes.len(), target = %target.display(), "model asset stored");
    Ok(())
}

/// Extracts a filename from the provided URL, stripping query/fragment parts.
fn infer_filename_from_url(url: &str) -> Option<String> {
    url.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .and_then(|segment| segment.split(['?', '#']).next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
