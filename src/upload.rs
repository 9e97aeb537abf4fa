use std::path::PathBuf;

use uuid::Uuid;

use crate::error::AppError;

/// URL prefix under which stored files are served back.
pub const URL_PREFIX: &str = "/uploads";

/// Flat filesystem store for profile and pet images. Files get a generated
/// collision-resistant name; records keep the relative URL path.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `bytes` under a fresh name derived from the client's filename.
    /// Returns the URL path to store on the record.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!("{}-{}", Uuid::now_v7(), sanitize_file_name(original_name));
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        Ok(format!("{URL_PREFIX}/{file_name}"))
    }

    /// Best-effort removal of a previously stored file. Only paths inside
    /// the uploads namespace are touched; anything else is ignored.
    pub async fn remove(&self, url_path: &str) {
        let Some(file_name) = url_path
            .strip_prefix(URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return;
        };
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(file_name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove stored upload {url_path}: {e}");
            }
        }
    }
}

/// Strip anything path-like or unprintable from a client-supplied filename.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .take(100)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
