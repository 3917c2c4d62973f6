use crate::publisher_trait::{PublishedArtifact, Publisher};
use async_trait::async_trait;
use captioner_core::PublishError;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes artifacts into a local directory. Republishing truncates the file.
pub struct FilePublisher {
    dir: PathBuf,
    publish_count: AtomicUsize,
}

impl FilePublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            publish_count: AtomicUsize::new(0),
        }
    }

    /// Build from the `[publisher]` table; requires a `path` entry.
    pub fn from_config(config: &toml::Value) -> Result<Self, PublishError> {
        let path = config
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                PublishError::InitializationFailed("missing 'path' in config".to_string())
            })?;
        Ok(Self::new(path))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count.load(Ordering::Relaxed)
    }

    fn artifact_path(&self, artifact_id: &str) -> Result<PathBuf, PublishError> {
        let relative = Path::new(artifact_id);
        let is_plain = !artifact_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(PublishError::PublishFailed(format!(
                "artifact id {artifact_id:?} is not a relative file name"
            )));
        }
        Ok(self.dir.join(relative))
    }
}

#[async_trait]
impl Publisher for FilePublisher {
    fn name(&self) -> &str {
        "file"
    }

    async fn publish(&self, artifact_id: &str, body: &[u8]) -> Result<PublishedArtifact, PublishError> {
        let path = self.artifact_path(artifact_id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PublishError::PublishFailed(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| PublishError::PublishFailed(format!("{}: {e}", path.display())))?;

        self.publish_count.fetch_add(1, Ordering::Relaxed);
        tracing::info!(artifact_id = %artifact_id, path = %path.display(), "wrote artifact");

        Ok(PublishedArtifact {
            artifact_id: artifact_id.to_string(),
            location: path.display().to_string(),
        })
    }
}
