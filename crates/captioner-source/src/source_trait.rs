use async_trait::async_trait;
use captioner_core::{FetchError, RawSegment};

/// Result of asking the hosted service for a transcript.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Ready(Vec<RawSegment>),
    /// The service answered but has no transcript yet (typically still processing).
    NotReady { status: u16 },
}

/// A place transcripts are read from.
///
/// [`fetch`](Self::fetch) distinguishes "not ready yet" (an `Ok` outcome)
/// from transport failures (`Err`), so callers can treat the former as routine.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Returns the source's name (e.g. `"http"`).
    fn name(&self) -> &str;
    /// Fetch the transcript for a media id with a single request.
    async fn fetch(&self, media_id: &str) -> Result<FetchOutcome, FetchError>;
}
