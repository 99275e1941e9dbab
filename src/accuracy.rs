/// Accuracy metrics between an original (reference) text and a modified text
///
/// All metrics are computed on preprocessed text: lowercased, whitespace
/// collapsed and punctuation removed. Only the unified diff looks at the raw
/// lines.

use crate::constants::{diff, matching};
use crate::matcher::{best_match, similarity};
use crate::text_diff::unified_diff;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::debug;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// Letters, numbers and `_` only; combining marks are dropped, so a lowercased
// `İ` (`i` + U+0307) becomes a plain `i`
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_\s]").expect("punctuation pattern is valid"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));

/// Lowercase, collapse whitespace runs to one space, drop punctuation, trim
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    let stripped = NON_WORD.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Preprocess `text` and split it into words, keeping duplicates
pub fn tokenize(text: &str) -> Vec<String> {
    preprocess(text)
        .split_whitespace()
        .map(|word| word.to_string())
        .collect()
}

/// Split on runs of `.`, `!` or `?`, trimming each piece and dropping empty ones
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(|sentence| sentence.to_string())
        .collect()
}

/// Tunables for a single analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Minimum ratio for an original sentence to count as matched
    pub sentence_match_cutoff: f64,
    /// Unchanged lines shown around each diff hunk
    pub diff_context_lines: usize,
    pub original_label: String,
    pub modified_label: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            sentence_match_cutoff: matching::SENTENCE_MATCH_CUTOFF,
            diff_context_lines: diff::CONTEXT_LINES,
            original_label: diff::ORIGINAL_LABEL.to_string(),
            modified_label: diff::MODIFIED_LABEL.to_string(),
        }
    }
}

/// Word-level differences between the two texts (distinct words only)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Words of the original missing from the modified text
    pub deleted: BTreeSet<String>,
    /// Words of the modified text missing from the original
    pub added: BTreeSet<String>,
    pub common: BTreeSet<String>,
    /// Distinct words in the original
    pub total_original: usize,
    /// Distinct words in the modified text
    pub total_modified: usize,
}

/// Result of a full analysis; percentages are in `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub word_accuracy: f64,
    pub sentence_accuracy: f64,
    pub similarity: f64,
    pub changes: ChangeSet,
}

/// A loaded text kept alongside its preprocessed form
#[derive(Debug, Clone, Default)]
struct Document {
    raw: String,
    clean: String,
}

impl Document {
    fn load(text: &str) -> Self {
        let raw = text.trim().to_string();
        let clean = preprocess(&raw);
        Document { raw, clean }
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.clean.split_whitespace()
    }
}

/// Compares an original text against a modified one
#[derive(Debug, Clone, Default)]
pub struct AccuracyCalculator {
    original: Document,
    modified: Document,
    options: AnalysisOptions,
}

impl AccuracyCalculator {
    pub fn new(options: AnalysisOptions) -> Self {
        AccuracyCalculator {
            original: Document::default(),
            modified: Document::default(),
            options,
        }
    }

    /// Create a calculator with both texts already loaded
    pub fn with_texts(original: &str, modified: &str, options: AnalysisOptions) -> Self {
        let mut calculator = Self::new(options);
        calculator.load_texts(original, modified);
        calculator
    }

    /// Replace both documents; surrounding whitespace is trimmed
    pub fn load_texts(&mut self, original: &str, modified: &str) {
        self.original = Document::load(original);
        self.modified = Document::load(modified);
        debug!(
            original_chars = self.original.raw.len(),
            modified_chars = self.modified.raw.len(),
            "loaded texts"
        );
    }

    /// Share of original words (with multiplicity) that also occur in the modified text
    ///
    /// Each word counts at most as often as it appears on both sides.
    /// Returns 0.0 when the original has no words.
    pub fn word_accuracy(&self) -> f64 {
        let mut remaining: HashMap<&str, usize> = HashMap::new();
        for word in self.modified.words() {
            *remaining.entry(word).or_insert(0) += 1;
        }

        let mut total = 0;
        let mut matched = 0;
        for word in self.original.words() {
            total += 1;
            if let Some(count) = remaining.get_mut(word) {
                if *count > 0 {
                    *count -= 1;
                    matched += 1;
                }
            }
        }

        if total == 0 {
            return 0.0;
        }

        let accuracy = percentage(matched, total);
        debug!(matched, total, accuracy, "word accuracy");
        accuracy
    }

    /// Share of original sentences with a close enough modified sentence
    ///
    /// A sentence is matched when some modified sentence reaches the cutoff
    /// ratio. Several original sentences may match the same modified one.
    /// Returns 0.0 when the original has no sentences.
    pub fn sentence_accuracy(&self) -> f64 {
        let original = split_sentences(&self.original.clean);
        let modified = split_sentences(&self.modified.clean);

        if original.is_empty() {
            return 0.0;
        }

        let cutoff = self.options.sentence_match_cutoff;
        let matched = original
            .iter()
            .filter(|sentence| best_match(sentence, &modified, cutoff).is_some())
            .count();

        let accuracy = percentage(matched, original.len());
        debug!(matched, total = original.len(), accuracy, "sentence accuracy");
        accuracy
    }

    /// Character-level matching-blocks ratio of the two preprocessed texts, as a percentage
    pub fn similarity_ratio(&self) -> f64 {
        let ratio = similarity(&self.original.clean, &self.modified.clean) * 100.0;
        debug!(ratio, "similarity ratio");
        ratio
    }

    /// Distinct words deleted, added and kept between the two texts
    pub fn analyze_changes(&self) -> ChangeSet {
        let original: BTreeSet<String> = self.original.words().map(str::to_string).collect();
        let modified: BTreeSet<String> = self.modified.words().map(str::to_string).collect();

        ChangeSet {
            deleted: original.difference(&modified).cloned().collect(),
            added: modified.difference(&original).cloned().collect(),
            common: original.intersection(&modified).cloned().collect(),
            total_original: original.len(),
            total_modified: modified.len(),
        }
    }

    /// Unified diff of the raw (not preprocessed) texts, line by line
    pub fn detailed_diff(&self) -> Vec<String> {
        unified_diff(
            &self.original.raw,
            &self.modified.raw,
            &self.options.original_label,
            &self.options.modified_label,
            self.options.diff_context_lines,
        )
    }

    /// Compute every metric and the change set
    pub fn full_analysis(&self) -> AccuracyReport {
        AccuracyReport {
            word_accuracy: self.word_accuracy(),
            sentence_accuracy: self.sentence_accuracy(),
            similarity: self.similarity_ratio(),
            changes: self.analyze_changes(),
        }
    }
}

/// Analyze a pair of texts without keeping a calculator around
pub fn analyze(original: &str, modified: &str, options: &AnalysisOptions) -> AccuracyReport {
    AccuracyCalculator::with_texts(original, modified, options.clone()).full_analysis()
}

fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}
