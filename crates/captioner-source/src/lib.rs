pub mod http_source;
pub mod source_trait;

pub use http_source::HttpTranscriptSource;
pub use source_trait::{FetchOutcome, TranscriptSource};
