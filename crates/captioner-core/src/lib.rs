pub mod config;
pub mod error;
pub mod timestamp;
pub mod transcript;
pub mod types;
pub mod webvtt;

pub use config::{AppConfig, GeneralConfig, MediaConfig, PublisherConfig, StorageConfig};
pub use error::{ConfigError, FetchError, PublishError, TranscriptError};
pub use timestamp::{format_millis, format_timestamp, to_millis};
pub use transcript::{convert_raw_transcript, parse_raw_segments, validate_segments};
pub use types::{
    caption_artifact_id, RawSegment, RawWord, SubtitleCue, SubtitleDocument, TranscriptSegment,
    WordTiming, CAPTION_SUFFIX,
};
pub use webvtt::{transcript_to_vtt, WEBVTT_HEADER};
