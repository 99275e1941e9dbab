/// Line-oriented unified diff between two texts
///
/// This module renders the edit steps found by the sequence matcher in the
/// familiar `---` / `+++` / `@@` unified format, so a reviewer can see exactly
/// which transcript lines changed.

use crate::matcher::{SequenceMatcher, Tag};
use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]")
        .expect("line break pattern is valid")
});

/// Split `text` into lines on every line boundary, not just `\n`
///
/// Bare `\r`, vertical tab, form feed, the file/group/record separators,
/// NEL and the Unicode line/paragraph separators all end a line. A single
/// trailing boundary does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK.split(text).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Compute a unified diff of `original` against `modified`
///
/// Both inputs are compared line by line. Each record is returned without a
/// trailing line terminator. Identical inputs produce an empty diff.
///
/// # Format
///
/// 1. `--- <from_label>` and `+++ <to_label>` headers, emitted once
/// 2. One `@@ -start,len +start,len @@` header per hunk
/// 3. Hunk lines prefixed with ` ` (context), `-` (removed) or `+` (added)
///
/// # Examples
///
/// ```
/// use transcript_accuracy::text_diff::unified_diff;
///
/// let diff = unified_diff("a\nb\nc", "a\nx\nc", "Original", "Modified", 3);
/// assert_eq!(
///     diff,
///     vec!["--- Original", "+++ Modified", "@@ -1,3 +1,3 @@", " a", "-b", "+x", " c"]
/// );
/// ```
pub fn unified_diff(
    original: &str,
    modified: &str,
    from_label: &str,
    to_label: &str,
    context: usize,
) -> Vec<String> {
    let a = split_lines(original);
    let b = split_lines(modified);
    unified_diff_lines(&a, &b, from_label, to_label, context)
}

/// Same as [`unified_diff`] for inputs already split into lines
pub fn unified_diff_lines(
    a: &[&str],
    b: &[&str],
    from_label: &str,
    to_label: &str,
    context: usize,
) -> Vec<String> {
    let matcher = SequenceMatcher::new(a, b);
    let mut records = Vec::new();

    for group in matcher.grouped_opcodes(context) {
        if records.is_empty() {
            records.push(format!("--- {}", from_label));
            records.push(format!("+++ {}", to_label));
        }

        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        records.push(format!(
            "@@ -{} +{} @@",
            format_range(first.a_start, last.a_end),
            format_range(first.b_start, last.b_end)
        ));

        for code in &group {
            if code.tag == Tag::Equal {
                records.extend(a[code.a_start..code.a_end].iter().map(|line| format!(" {}", line)));
                continue;
            }
            if matches!(code.tag, Tag::Replace | Tag::Delete) {
                records.extend(a[code.a_start..code.a_end].iter().map(|line| format!("-{}", line)));
            }
            if matches!(code.tag, Tag::Replace | Tag::Insert) {
                records.extend(b[code.b_start..code.b_end].iter().map(|line| format!("+{}", line)));
            }
        }
    }

    records
}

/// Hunk range as `start,len`, `start` for a single line, or `start-1,0` when empty
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change() {
        let diff = unified_diff("hello\nworld", "hello\nworld", "Original", "Modified", 3);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_both_empty() {
        assert!(unified_diff("", "", "Original", "Modified", 3).is_empty());
    }

    #[test]
    fn test_single_line_replacement() {
        let diff = unified_diff("hello", "world", "Original", "Modified", 3);
        assert_eq!(diff, vec!["--- Original", "+++ Modified", "@@ -1 +1 @@", "-hello", "+world"]);
    }

    #[test]
    fn test_append_only() {
        let diff = unified_diff("one", "one\ntwo", "Original", "Modified", 3);
        assert_eq!(diff, vec!["--- Original", "+++ Modified", "@@ -1 +1,2 @@", " one", "+two"]);
    }

    #[test]
    fn test_from_empty() {
        let diff = unified_diff("", "new line", "Original", "Modified", 3);
        assert_eq!(diff, vec!["--- Original", "+++ Modified", "@@ -0,0 +1 @@", "+new line"]);
    }

    #[test]
    fn test_delete_all() {
        let diff = unified_diff("a\nb", "", "Original", "Modified", 3);
        assert_eq!(diff, vec!["--- Original", "+++ Modified", "@@ -1,2 +0,0 @@", "-a", "-b"]);
    }

    #[test]
    fn test_context_is_limited() {
        let original = "1\n2\n3\n4\n5\n6\n7\n8";
        let modified = "1\n2\n3\n4\nfive\n6\n7\n8";
        let diff = unified_diff(original, modified, "Original", "Modified", 1);
        assert_eq!(
            diff,
            vec!["--- Original", "+++ Modified", "@@ -4,3 +4,3 @@", " 4", "-5", "+five", " 6"]
        );
    }

    #[test]
    fn test_distant_changes_make_two_hunks() {
        let original: Vec<String> = (1..=12).map(|n| n.to_string()).collect();
        let mut modified = original.clone();
        modified[0] = "first".to_string();
        modified[11] = "last".to_string();

        let diff = unified_diff(&original.join("\n"), &modified.join("\n"), "A", "B", 2);
        let hunks: Vec<&String> = diff.iter().filter(|line| line.starts_with("@@")).collect();
        assert_eq!(hunks, vec!["@@ -1,3 +1,3 @@", "@@ -10,3 +10,3 @@"]);
    }

    #[test]
    fn test_records_have_no_terminators() {
        let diff = unified_diff("a\r\nb\n", "a\nc\n", "Original", "Modified", 3);
        assert!(diff.iter().all(|line| !line.ends_with('\n') && !line.ends_with('\r')));
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            split_lines("a\x0bb\x0cc\u{85}d\u{2028}e\u{2029}f"),
            vec!["a", "b", "c", "d", "e", "f"]
        );
    }

    #[test]
    fn test_carriage_return_only_lines() {
        let diff = unified_diff("a\rb", "a\rc", "Original", "Modified", 3);
        assert_eq!(diff, vec!["--- Original", "+++ Modified", "@@ -1,2 +1,2 @@", " a", "-b", "+c"]);
    }

    #[test]
    fn test_unicode_lines() {
        let diff = unified_diff("Sözel zorbalık", "Sözal zorbalık", "Orijinal", "Değiştirilmiş", 3);
        assert_eq!(diff[0], "--- Orijinal");
        assert_eq!(diff[1], "+++ Değiştirilmiş");
        assert_eq!(diff[3], "-Sözel zorbalık");
        assert_eq!(diff[4], "+Sözal zorbalık");
    }
}
