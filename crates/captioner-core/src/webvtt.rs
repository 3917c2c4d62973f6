use crate::error::TranscriptError;
use crate::timestamp::format_timestamp;
use crate::types::{SubtitleCue, SubtitleDocument, TranscriptSegment};
use std::fmt;

pub const WEBVTT_HEADER: &str = "WEBVTT";

/// Build a subtitle document with one cue per segment.
///
/// Segments without word timings are skipped and do not consume a cue index.
/// Only the first and last word of a segment are consulted.
pub fn transcript_to_vtt(segments: &[TranscriptSegment]) -> Result<SubtitleDocument, TranscriptError> {
    let mut doc = SubtitleDocument::default();

    for (position, segment) in segments.iter().enumerate() {
        let (first, last) = match (segment.words.first(), segment.words.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                tracing::debug!(segment = position, "skipping segment without word timings");
                doc.skipped += 1;
                continue;
            }
        };

        doc.cues.push(SubtitleCue {
            index: doc.cues.len() + 1,
            start: format_timestamp(first.start)?,
            end: format_timestamp(last.end)?,
            text: segment.text.trim().to_string(),
        });
    }

    Ok(doc)
}

impl SubtitleDocument {
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}\n\n",
            self.index, self.start, self.end, self.text
        )
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{WEBVTT_HEADER}\n\n")?;
        for cue in &self.cues {
            write!(f, "{cue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordTiming;

    fn segment(text: &str, words: &[(f64, f64)]) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            words: words
                .iter()
                .map(|&(start, end)| WordTiming { start, end })
                .collect(),
        }
    }

    #[test]
    fn test_two_segment_document() {
        let segments = vec![
            segment("Hi", &[(0.0, 1.0)]),
            segment("There", &[(1.5, 2.25)]),
        ];
        let doc = transcript_to_vtt(&segments).unwrap();
        assert_eq!(
            doc.render(),
            "WEBVTT\n\n\
             1\n00:00:00.000 --> 00:00:01.000\nHi\n\n\
             2\n00:00:01.500 --> 00:00:02.250\nThere\n\n"
        );
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let doc = transcript_to_vtt(&[]).unwrap();
        assert_eq!(doc.render(), "WEBVTT\n\n");
        assert_eq!(doc.skipped, 0);
    }

    #[test]
    fn test_skipped_segments_do_not_consume_index() {
        let segments = vec![
            segment("A", &[]),
            segment("B", &[(4.0, 5.0)]),
            segment("C", &[]),
        ];
        let doc = transcript_to_vtt(&segments).unwrap();
        assert_eq!(doc.cues.len(), 1);
        assert_eq!(doc.cues[0].index, 1);
        assert_eq!(doc.cues[0].text, "B");
        assert_eq!(doc.skipped, 2);
    }

    #[test]
    fn test_indices_are_dense_across_gaps() {
        let segments = vec![
            segment("one", &[(0.0, 1.0)]),
            segment("gap", &[]),
            segment("two", &[(2.0, 3.0)]),
            segment("gap", &[]),
            segment("three", &[(4.0, 5.0)]),
        ];
        let doc = transcript_to_vtt(&segments).unwrap();
        let indices: Vec<usize> = doc.cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let rendered = doc.render();
        assert!(rendered.starts_with("WEBVTT\n\n"));
        assert_eq!(rendered.matches(" --> ").count(), 3);
    }

    #[test]
    fn test_text_is_trimmed() {
        let doc = transcript_to_vtt(&[segment("  hello world  ", &[(0.0, 1.0)])]).unwrap();
        assert_eq!(doc.cues[0].text, "hello world");
    }

    #[test]
    fn test_only_first_and_last_word_are_used() {
        let doc = transcript_to_vtt(&[segment(
            "three words here",
            &[(10.0, 10.4), (99.0, 99.5), (11.0, 12.125)],
        )])
        .unwrap();
        assert_eq!(doc.cues[0].start, "00:00:10.000");
        assert_eq!(doc.cues[0].end, "00:00:12.125");
    }

    #[test]
    fn test_negative_time_fails_conversion() {
        let result = transcript_to_vtt(&[segment("x", &[(-2.0, 1.0)])]);
        assert_eq!(result, Err(TranscriptError::InvalidTimestamp(-2.0)));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let segments = vec![segment("a", &[(0.123, 0.456)]), segment("b", &[(1.0, 2.0)])];
        let first = transcript_to_vtt(&segments).unwrap().render();
        let second = transcript_to_vtt(&segments).unwrap().render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_into_bytes_matches_render() {
        let doc = transcript_to_vtt(&[segment("bytes", &[(0.0, 0.5)])]).unwrap();
        let rendered = doc.render();
        assert_eq!(doc.into_bytes(), rendered.into_bytes());
    }
}
