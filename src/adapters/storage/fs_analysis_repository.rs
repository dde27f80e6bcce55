//! Filesystem storage adapter for resolved analyses

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::UserId;
use crate::domain::styling::{AnalysisKind, ValidatedResult};
use crate::ports::{AnalysisRepository, StorageError};

/// Filesystem-based analysis storage
///
/// Stores one JSON file per user and kind in a configurable base directory:
/// {base_dir}/analyses/{user_id}/{kind}.json
pub struct FsAnalysisRepository {
    base_dir: PathBuf,
}

impl FsAnalysisRepository {
    /// Create new filesystem storage with base directory
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Get analysis directory for a user
    fn get_user_dir(&self, user_id: &UserId) -> Result<PathBuf, StorageError> {
        let id = user_id.as_str();
        if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
            return Err(StorageError::InvalidPath(format!(
                "User id cannot be used as a directory name: {}",
                id
            )));
        }
        Ok(self.base_dir.join("analyses").join(id))
    }

    /// Get full path to an analysis file
    fn get_file_path(&self, user_id: &UserId, kind: AnalysisKind) -> Result<PathBuf, StorageError> {
        Ok(self
            .get_user_dir(user_id)?
            .join(format!("{}.json", kind.as_str())))
    }

    /// Ensure parent directory exists
    async fn ensure_dir_exists(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("Failed to create directory", e))?;
        }
        Ok(())
    }
}

fn io_error(context: &str, e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        StorageError::PermissionDenied(format!("{}: {}", context, e))
    } else {
        StorageError::IoError(format!("{}: {}", context, e))
    }
}

#[async_trait]
impl AnalysisRepository for FsAnalysisRepository {
    async fn save(&self, user_id: &UserId, result: &ValidatedResult) -> Result<(), StorageError> {
        let file_path = self.get_file_path(user_id, result.kind())?;
        self.ensure_dir_exists(&file_path).await?;

        let content = serde_json::to_string_pretty(result)
            .map_err(|e| StorageError::Corrupt(format!("Failed to encode result: {}", e)))?;

        // Write atomically using a temporary file
        let temp_path = file_path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .await
            .map_err(|e| io_error("Failed to write temporary file", e))?;

        fs::rename(&temp_path, &file_path)
            .await
            .map_err(|e| io_error("Failed to rename file", e))?;

        tracing::debug!(
            user_id = %user_id,
            kind = result.kind().as_str(),
            path = %file_path.display(),
            "Saved analysis"
        );
        Ok(())
    }

    async fn latest(
        &self,
        user_id: &UserId,
        kind: AnalysisKind,
    ) -> Result<Option<ValidatedResult>, StorageError> {
        let file_path = self.get_file_path(user_id, kind)?;

        let content = match fs::read_to_string(&file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("Failed to read file", e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", file_path.display(), e)))
    }
}
