use crate::source_trait::{FetchOutcome, TranscriptSource};
use async_trait::async_trait;
use captioner_core::{parse_raw_segments, FetchError, StorageConfig};

pub const TRANSCRIPT_SUFFIX: &str = ".transcript";

/// Reads `{base}/{media_id}.transcript` over HTTP.
pub struct HttpTranscriptSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptSource {
    pub fn new(config: &StorageConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::FetchFailed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config.transcript_base()))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn transcript_url(&self, media_id: &str) -> String {
        format!("{}/{}{}", self.base_url, media_id, TRANSCRIPT_SUFFIX)
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, media_id: &str) -> Result<FetchOutcome, FetchError> {
        let url = self.transcript_url(media_id);
        tracing::info!(media_id = %media_id, %url, "fetching transcript");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                media_id = %media_id,
                status = status.as_u16(),
                "transcript not available yet; processing may still be running"
            );
            return Ok(FetchOutcome::NotReady {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::FetchFailed(format!("{url}: failed to read body: {e}")))?;
        let segments =
            parse_raw_segments(&body).map_err(|e| FetchError::MalformedBody(e.to_string()))?;

        tracing::debug!(media_id = %media_id, segments = segments.len(), "transcript received");
        Ok(FetchOutcome::Ready(segments))
    }
}
