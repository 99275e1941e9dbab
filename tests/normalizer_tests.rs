// Transcript normalization over multi-line whisper-style output

use std::time::Duration;
use transcript_accuracy::normalizer::{normalize, parse_transcript};

const TRANSCRIPT: &str = "
[00:00:00.000 --> 00:00:06.100]   Sizden bu soruların cevaplarını düşünmenizi rica ediyorum.
[00:00:06.100 --> 00:00:10.860]   Dilerseniz cevaplarınızı not alın.

[00:00:10.860 --> 00:00:18.660]
[00:00:18.660 --> 00:00:23.060]   Ancak zaman zaman bu dengeler bozulur.
";

#[test]
fn test_normalize_transcript() {
    assert_eq!(
        normalize(TRANSCRIPT),
        "Sizden bu soruların cevaplarını düşünmenizi rica ediyorum.\n\
         Dilerseniz cevaplarınızı not alın.\n\
         Ancak zaman zaman bu dengeler bozulur."
    );
}

#[test]
fn test_plain_text_only_trimmed() {
    let raw = "  first line  \n\n\t\n second line\n";
    assert_eq!(normalize(raw), "first line\nsecond line");
}

#[test]
fn test_idempotent_without_markers() {
    for raw in ["  a\n\n b ", "x", "", "one. two!\n   \nthree?"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_normalized_transcript_is_stable() {
    let once = normalize(TRANSCRIPT);
    assert_eq!(normalize(&once), once);
}

#[test]
fn test_parse_transcript_timings() {
    let lines = parse_transcript(TRANSCRIPT);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0].start, Duration::ZERO);
    assert_eq!(lines[0].end, Duration::from_millis(6_100));
    assert_eq!(lines[2].start, Duration::from_millis(18_660));
    assert_eq!(lines[2].text, "Ancak zaman zaman bu dengeler bozulur.");

    assert!(lines.windows(2).all(|pair| pair[0].end <= pair[1].start));
}
