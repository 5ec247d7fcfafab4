use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::InternalError;

const FALLBACK_FILE_NAME: &str = "upload";

/// Storage for uploaded files
///
/// Returns a stable reference string that is saved on the owning record.
/// Contents are never inspected.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, InternalError>;
}

/// Writes uploads under a local directory
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, InternalError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| InternalError::storage("create_upload_dir", e))?;

        let reference = format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(original_name));
        let path = self.root.join(&reference);

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| InternalError::storage("write_upload", e))?;

        tracing::debug!("Stored upload {} ({} bytes)", reference, bytes.len());

        Ok(reference)
    }
}

/// Reduce a client-supplied name to a safe single path component
///
/// Keeps ASCII letters, digits, '.', '-' and '_'; whitespace becomes '_';
/// directory parts and leading dots are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
