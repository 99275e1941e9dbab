/// Application-wide constants for transcript normalization, matching, and reporting

pub mod matching {
    /// Minimum similarity ratio for an original sentence to count as reproduced
    pub const SENTENCE_MATCH_CUTOFF: f64 = 0.8;
}

pub mod diff {
    /// Lines of unchanged context shown around each unified diff hunk
    pub const CONTEXT_LINES: usize = 3;

    /// Upper bound accepted for configured context lines
    pub const MAX_CONTEXT_LINES: usize = 100;

    pub const ORIGINAL_LABEL: &str = "Original";
    pub const MODIFIED_LABEL: &str = "Modified";
}

pub mod report {
    /// Number of deleted / added words listed in the text report
    pub const WORD_LIST_LIMIT: usize = 10;
}
