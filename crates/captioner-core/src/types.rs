use serde::Deserialize;

/// Suffix appended to a media id to name its published English caption track.
pub const CAPTION_SUFFIX: &str = "_en.vtt";

/// Name of the caption artifact a playback client looks up for `media_id`.
pub fn caption_artifact_id(media_id: &str) -> String {
    format!("{media_id}{CAPTION_SUFFIX}")
}

/// One word entry as delivered by the transcription service.
///
/// The entry is kept as raw JSON so validation can tell a missing timing
/// apart from one holding the wrong type, and can reject entries that are not
/// objects at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawWord(pub serde_json::Value);

impl RawWord {
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }
}

/// One transcript segment as delivered. `transcript` stays untyped until the
/// segment is known to carry words.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    pub transcript: Option<serde_json::Value>,
    pub words: Option<Vec<RawWord>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordTiming {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub words: Vec<WordTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCue {
    pub index: usize,
    pub start: String,
    pub end: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    pub cues: Vec<SubtitleCue>,
    /// Segments dropped because they carried no word timings.
    pub skipped: usize,
}
