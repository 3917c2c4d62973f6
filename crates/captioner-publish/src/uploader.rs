use async_trait::async_trait;
use captioner_core::PublishError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub public_id: String,
    pub secure_url: Option<String>,
}

/// Submits source media to the hosted service and requests transcription.
///
/// Transcription runs asynchronously on the service side, so a transcript is
/// usually not available straight after this returns.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload_video_from_url(
        &self,
        source_url: &str,
        media_id: &str,
    ) -> Result<UploadedMedia, PublishError>;
}
