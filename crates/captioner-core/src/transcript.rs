use crate::error::TranscriptError;
use crate::types::{RawSegment, RawWord, SubtitleDocument, TranscriptSegment, WordTiming};

/// Decode a transcript body into its wire segments.
pub fn parse_raw_segments(body: &[u8]) -> Result<Vec<RawSegment>, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Validate wire segments into the typed segment model.
///
/// A segment whose `words` list is absent, null or empty is kept with no
/// words so the converter can skip it. Any other shape problem (a word that
/// is not an object, a missing or non-numeric timing, non-string text, or a
/// segment ending before it starts) fails the whole transcript.
pub fn validate_segments(raw: Vec<RawSegment>) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, segment)| validate_segment(index, segment))
        .collect()
}

/// Validate and convert a fetched transcript in one step.
pub fn convert_raw_transcript(raw: Vec<RawSegment>) -> Result<SubtitleDocument, TranscriptError> {
    let segments = validate_segments(raw)?;
    crate::webvtt::transcript_to_vtt(&segments)
}

fn validate_segment(index: usize, raw: RawSegment) -> Result<TranscriptSegment, TranscriptError> {
    let raw_words = raw.words.unwrap_or_default();
    if raw_words.is_empty() {
        // Skipped by the converter, so the text is never rendered.
        let text = match raw.transcript {
            Some(serde_json::Value::String(text)) => text,
            _ => String::new(),
        };
        return Ok(TranscriptSegment {
            text,
            words: Vec::new(),
        });
    }

    let text = match raw.transcript {
        Some(serde_json::Value::String(text)) => text,
        None | Some(serde_json::Value::Null) => {
            return Err(malformed(index, "missing 'transcript' text".to_string()))
        }
        Some(other) => {
            return Err(malformed(index, format!("non-string 'transcript': {other}")))
        }
    };

    let words = raw_words
        .iter()
        .enumerate()
        .map(|(position, word)| validate_word(index, position, word))
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(first), Some(last)) = (words.first(), words.last()) {
        if last.end < first.start {
            return Err(malformed(
                index,
                format!(
                    "last word ends at {} before the first word starts at {}",
                    last.end, first.start
                ),
            ));
        }
    }

    Ok(TranscriptSegment { text, words })
}

fn validate_word(segment: usize, position: usize, word: &RawWord) -> Result<WordTiming, TranscriptError> {
    if !word.0.is_object() {
        return Err(malformed(
            segment,
            format!("word {position} is not an object: {}", word.0),
        ));
    }
    let start = seconds_field(segment, position, "start_time", word.field("start_time"))?;
    let end = seconds_field(segment, position, "end_time", word.field("end_time"))?;
    if end < start {
        return Err(malformed(
            segment,
            format!("word {position} ends at {end} before it starts at {start}"),
        ));
    }
    Ok(WordTiming { start, end })
}

fn seconds_field(
    segment: usize,
    position: usize,
    field: &str,
    value: Option<&serde_json::Value>,
) -> Result<f64, TranscriptError> {
    match value {
        None | Some(serde_json::Value::Null) => Err(malformed(
            segment,
            format!("word {position} is missing '{field}'"),
        )),
        Some(v) => v.as_f64().ok_or_else(|| {
            malformed(segment, format!("word {position} has non-numeric '{field}': {v}"))
        }),
    }
}

fn malformed(segment: usize, reason: String) -> TranscriptError {
    TranscriptError::MalformedTranscript { segment, reason }
}
