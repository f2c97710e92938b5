//! Poster storage on the local filesystem, served back under `/uploads`.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const PUBLIC_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone)]
pub struct PosterStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl PosterStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the file under a generated name and returns its public path,
    /// e.g. `/uploads/6f1c...e2.png`.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::validation("Poster file is empty"));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::validation(format!(
                "Poster exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let extension = extension_of(original_name).ok_or_else(|| {
            AppError::validation(format!(
                "Poster must be one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::internal(format!("creating upload dir: {}", e)))?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.dir.join(&file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("writing {}: {}", path.display(), e)))?;

        info!(file = %file_name, size = bytes.len(), "poster stored");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }
}

fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
