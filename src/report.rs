/// Human-readable and YAML renderings of an accuracy report

use crate::accuracy::AccuracyReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;

const RULE: &str = "==================================================";

/// Render the report as a text block
///
/// At most `word_limit` deleted and added words are listed. A word list
/// section is omitted when it would be empty.
pub fn render_text(report: &AccuracyReport, word_limit: usize) -> String {
    let changes = &report.changes;
    let mut out = String::new();

    out.push_str(&format!("{}\nTEXT ACCURACY REPORT\n{}\n", RULE, RULE));

    out.push_str("\n📊 ACCURACY RATES:\n");
    out.push_str(&format!("  • Word accuracy: {:.2}%\n", report.word_accuracy));
    out.push_str(&format!("  • Sentence accuracy: {:.2}%\n", report.sentence_accuracy));
    out.push_str(&format!("  • Overall similarity: {:.2}%\n", report.similarity));

    out.push_str("\n📈 STATISTICS:\n");
    out.push_str(&format!("  • Original word count: {}\n", changes.total_original));
    out.push_str(&format!("  • Modified word count: {}\n", changes.total_modified));
    out.push_str(&format!("  • Common words: {}\n", changes.common.len()));
    out.push_str(&format!("  • Deleted words: {}\n", changes.deleted.len()));
    out.push_str(&format!("  • Added words: {}\n", changes.added.len()));

    out.push_str(&word_list("❌ DELETED WORDS", &changes.deleted, word_limit));
    out.push_str(&word_list("✅ ADDED WORDS", &changes.added, word_limit));

    out
}

/// Section listing the first `limit` words, or nothing when `words` is empty
fn word_list(title: &str, words: &BTreeSet<String>, limit: usize) -> String {
    if words.is_empty() {
        return String::new();
    }

    let mut section = format!("\n{} (first {}):\n", title, limit);
    for word in words.iter().take(limit) {
        section.push_str(&format!("  • {}\n", word));
    }
    section
}

#[derive(Serialize)]
struct YamlReport<'a> {
    #[serde(flatten)]
    report: &'a AccuracyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<&'a [String]>,
}

/// Render the report as YAML, with the diff records under `diff` when given
pub fn render_yaml(report: &AccuracyReport, diff: Option<&[String]>) -> Result<String> {
    serde_yaml::to_string(&YamlReport { report, diff }).context("Failed to serialize report")
}
