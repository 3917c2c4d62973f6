use async_trait::async_trait;
use captioner_core::PublishError;

/// Where a published artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    pub artifact_id: String,
    /// URL or filesystem path a playback client can load the artifact from.
    pub location: String,
}

/// A storage backend that publishes generated subtitle documents.
///
/// Implementations are created through [`PublisherRegistry`](crate::PublisherRegistry).
/// Publishing the same `artifact_id` twice must replace the earlier asset, so a
/// rerun of the whole pipeline is always safe.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Returns the publisher's plugin name (e.g. `"cloudinary"`, `"file"`).
    fn name(&self) -> &str;
    /// Store `body` under `artifact_id`, overwriting any prior asset.
    async fn publish(&self, artifact_id: &str, body: &[u8]) -> Result<PublishedArtifact, PublishError>;
}
