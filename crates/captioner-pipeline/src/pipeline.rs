use captioner_core::{
    caption_artifact_id, convert_raw_transcript, FetchError, PublishError, TranscriptError,
};
use captioner_publish::{PublishedArtifact, Publisher};
use captioner_source::{FetchOutcome, TranscriptSource};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Pipeline states. `Done` and `NotReady` are successful terminals, `Failed` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Converting,
    Publishing,
    Done,
    NotReady,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Converting => "converting",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::NotReady => "not-ready",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Done {
        artifact: PublishedArtifact,
        cues: usize,
        /// Segments left out because they had no word timings.
        skipped: usize,
    },
    NotReady {
        status: u16,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("converting failed: {0}")]
    Convert(#[from] TranscriptError),

    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Fetch(_) => Stage::Fetching,
            PipelineError::Convert(_) => Stage::Converting,
            PipelineError::Publish(_) => Stage::Publishing,
        }
    }
}

/// Fetch → convert → publish for one media id at a time.
///
/// Holds no per-run state, so one instance can serve many concurrent runs.
pub struct Pipeline {
    source: Arc<dyn TranscriptSource>,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn TranscriptSource>, publisher: Arc<dyn Publisher>) -> Self {
        Self { source, publisher }
    }

    pub async fn run(&self, media_id: &str) -> Result<PipelineOutcome, PipelineError> {
        self.run_stages(media_id).await.inspect_err(|e| {
            tracing::error!(
                media_id = %media_id,
                stage = %Stage::Failed,
                failed_at = %e.stage(),
                "{e}"
            );
        })
    }

    async fn run_stages(&self, media_id: &str) -> Result<PipelineOutcome, PipelineError> {
        tracing::debug!(media_id = %media_id, stage = %Stage::Fetching, source = %self.source.name(), "fetching");
        let raw = match self.source.fetch(media_id).await? {
            FetchOutcome::Ready(raw) => raw,
            FetchOutcome::NotReady { status } => {
                tracing::info!(
                    media_id = %media_id,
                    stage = %Stage::NotReady,
                    status,
                    "no transcript yet; nothing published"
                );
                return Ok(PipelineOutcome::NotReady { status });
            }
        };

        tracing::debug!(media_id = %media_id, stage = %Stage::Converting, segments = raw.len(), "converting");
        let document = convert_raw_transcript(raw)?;
        let cues = document.cues.len();
        let skipped = document.skipped;
        if skipped > 0 {
            tracing::warn!(
                media_id = %media_id,
                skipped,
                "segments without word timings were left out of the captions"
            );
        }

        let artifact_id = caption_artifact_id(media_id);
        tracing::debug!(
            media_id = %media_id,
            stage = %Stage::Publishing,
            publisher = %self.publisher.name(),
            artifact_id = %artifact_id,
            "publishing"
        );
        let artifact = self
            .publisher
            .publish(&artifact_id, document.render().as_bytes())
            .await?;

        tracing::info!(
            media_id = %media_id,
            stage = %Stage::Done,
            cues,
            skipped,
            location = %artifact.location,
            "captions published"
        );
        Ok(PipelineOutcome::Done {
            artifact,
            cues,
            skipped,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Done {
        artifact: PublishedArtifact,
        cues: usize,
        skipped: usize,
    },
    NotReady {
        status: u16,
    },
    Failed {
        reason: String,
    },
}

/// User-facing summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub media_id: String,
    pub status: ReportStatus,
}

impl RunReport {
    pub fn new(media_id: impl Into<String>, result: Result<PipelineOutcome, PipelineError>) -> Self {
        let status = match result {
            Ok(PipelineOutcome::Done {
                artifact,
                cues,
                skipped,
            }) => ReportStatus::Done {
                artifact,
                cues,
                skipped,
            },
            Ok(PipelineOutcome::NotReady { status }) => ReportStatus::NotReady { status },
            Err(e) => ReportStatus::Failed {
                reason: e.to_string(),
            },
        };
        Self {
            media_id: media_id.into(),
            status,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, ReportStatus::Failed { .. })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ReportStatus::Done {
                artifact,
                cues,
                skipped,
            } => write!(
                f,
                "{}: published {} ({} cues, {} skipped) -> {}",
                self.media_id, artifact.artifact_id, cues, skipped, artifact.location
            ),
            ReportStatus::NotReady { status } => write!(
                f,
                "{}: transcript not ready (status {status}); re-run once processing finishes",
                self.media_id
            ),
            ReportStatus::Failed { reason } => write!(f, "{}: failed: {reason}", self.media_id),
        }
    }
}
