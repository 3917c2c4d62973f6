use crate::error::TranscriptError;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Convert seconds to whole milliseconds, rounding half away from zero.
pub fn to_millis(seconds: f64) -> Result<u64, TranscriptError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TranscriptError::InvalidTimestamp(seconds));
    }
    let millis = (seconds * 1000.0).round();
    // u64::MAX as f64 rounds up to 2^64, the first value that no longer fits
    if millis >= u64::MAX as f64 {
        return Err(TranscriptError::InvalidTimestamp(seconds));
    }
    Ok(millis as u64)
}

/// Format a millisecond count as `HH:MM:SS.mmm`. Hours widen past two digits.
pub fn format_millis(total_ms: u64) -> String {
    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Format a seconds value as a WebVTT cue timestamp.
pub fn format_timestamp(seconds: f64) -> Result<String, TranscriptError> {
    to_millis(seconds).map(format_millis)
}
