/// Transcript normalization: strips `[start --> end]` timestamp markers
///
/// Whisper-style transcribers prefix every line with a bracketed time range.
/// Accuracy is measured on the spoken text only, so the markers are removed
/// and blank lines are dropped while the line order is kept.

use crate::text_diff::split_lines;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static TIMESTAMP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[(\d{1,2}:\d{2}(?::\d{2})?\.\d{3}) --> (\d{1,2}:\d{2}(?::\d{2})?\.\d{3})\]\s*")
        .expect("timestamp marker pattern is valid")
});

/// A single timestamped transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub start: Duration,
    pub end: Duration,
    pub text: String,
}

/// Strip timestamp markers from every line of `raw`
///
/// Lines without a marker pass through trimmed. Lines that are empty after
/// stripping are omitted. Surviving lines are joined with `\n`.
///
/// # Examples
///
/// ```
/// use transcript_accuracy::normalizer::normalize;
///
/// let text = normalize("[00:00:00.000 --> 00:00:06.100]   Hello world.");
/// assert_eq!(text, "Hello world.");
/// ```
pub fn normalize(raw: &str) -> String {
    split_lines(raw.trim())
        .into_iter()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove a leading timestamp marker (if any) and trim the rest of the line
fn strip_marker(line: &str) -> &str {
    match TIMESTAMP_MARKER.find(line) {
        Some(marker) => line[marker.end()..].trim(),
        None => line.trim(),
    }
}

/// Parse a single `[start --> end] text` line
///
/// Returns `None` when the line does not start with a valid marker.
pub fn parse_line(line: &str) -> Option<TranscriptLine> {
    let captures = TIMESTAMP_MARKER.captures(line)?;
    let start = parse_timestamp(captures.get(1)?.as_str())?;
    let end = parse_timestamp(captures.get(2)?.as_str())?;
    let marker_end = captures.get(0)?.end();

    Some(TranscriptLine {
        start,
        end,
        text: line[marker_end..].trim().to_string(),
    })
}

/// Parse every timestamped line with non-empty text, in order
pub fn parse_transcript(raw: &str) -> Vec<TranscriptLine> {
    split_lines(raw)
        .into_iter()
        .filter_map(parse_line)
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Parse `H:MM:SS.mmm` or `MM:SS.mmm` into a duration
fn parse_timestamp(stamp: &str) -> Option<Duration> {
    let (clock, millis) = stamp.split_once('.')?;
    let millis: u64 = millis.parse().ok()?;

    let fields = clock
        .split(':')
        .map(|field| field.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let seconds = match fields.as_slice() {
        [hours, minutes, seconds] => hours * 3600 + minutes * 60 + seconds,
        [minutes, seconds] => minutes * 60 + seconds,
        _ => return None,
    };

    Some(Duration::from_millis(seconds * 1000 + millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_marker_and_padding() {
        let text = normalize("[00:00:00.000 --> 00:00:06.100]   Hello world.");
        assert_eq!(text, "Hello world.");
    }

    #[test]
    fn test_short_form_marker() {
        let text = normalize("[00:06.100 --> 00:10.860]   Second line");
        assert_eq!(text, "Second line");
    }

    #[test]
    fn test_single_digit_hours() {
        let text = normalize("[1:02:03.456 --> 1:02:05.000] Late line");
        assert_eq!(text, "Late line");
    }

    #[test]
    fn test_drops_lines_empty_after_stripping() {
        let raw = "\n[00:00:00.000 --> 00:00:01.000]   \n[00:00:01.000 --> 00:00:02.000] kept\n   \n";
        assert_eq!(normalize(raw), "kept");
    }

    #[test]
    fn test_malformed_marker_passes_through() {
        // Two-digit milliseconds do not match
        let raw = "  [00:00:00.00 --> 00:00:01.00] text  ";
        assert_eq!(normalize(raw), "[00:00:00.00 --> 00:00:01.00] text");
    }

    #[test]
    fn test_marker_only_stripped_at_line_start() {
        let raw = "prefix [00:00:00.000 --> 00:00:01.000] text";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_preserves_order() {
        let raw = "[00:00:00.000 --> 00:00:01.000] one\n\
                   plain two\n\
                   [00:00:02.000 --> 00:00:03.000] three";
        assert_eq!(normalize(raw), "one\nplain two\nthree");
    }

    #[test]
    fn test_carriage_return_line_breaks() {
        let raw = "a\r[00:00.000 --> 00:01.000] b\u{2028}[00:01.000 --> 00:02.000] c";
        assert_eq!(normalize(raw), "a\nb\nc");
        assert_eq!(parse_transcript(raw).len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n \n"), "");
    }

    #[test]
    fn test_parse_line_durations() {
        let line = parse_line("[00:00:06.100 --> 00:00:10.860]   Dilerseniz not alın.").unwrap();
        assert_eq!(line.start, Duration::from_millis(6_100));
        assert_eq!(line.end, Duration::from_millis(10_860));
        assert_eq!(line.text, "Dilerseniz not alın.");
    }

    #[test]
    fn test_parse_line_hours_and_short_form() {
        let line = parse_line("[1:00:00.001 --> 1:00:01.000] x").unwrap();
        assert_eq!(line.start, Duration::from_millis(3_600_001));

        let line = parse_line("[02:30.500 --> 02:31.000] y").unwrap();
        assert_eq!(line.start, Duration::from_millis(150_500));
        assert_eq!(line.end, Duration::from_millis(151_000));
    }

    #[test]
    fn test_parse_line_without_marker() {
        assert_eq!(parse_line("just text"), None);
    }

    #[test]
    fn test_parse_transcript_skips_unmarked_and_empty() {
        let raw = "[00:00:00.000 --> 00:00:01.000] a\n\
                   no marker\n\
                   [00:00:01.000 --> 00:00:02.000]\n\
                   [00:00:02.000 --> 00:00:03.000] b";
        let lines = parse_transcript(raw);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
