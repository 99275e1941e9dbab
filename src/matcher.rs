/// Matching-blocks sequence matcher
///
/// Finds the longest common contiguous block of two sequences, then recurses
/// on the pieces to its left and right. The blocks found this way drive both
/// the similarity ratio (2M / T) and the line-oriented unified diff.

use std::collections::HashMap;
use std::hash::Hash;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// Edit step turning `a[a_start..a_end]` into `b[b_start..b_end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

impl Opcode {
    fn new(tag: Tag, a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> Self {
        Opcode {
            tag,
            a_start,
            a_end,
            b_start,
            b_end,
        }
    }
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every element of `b`, ascending
    b_positions: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b_positions: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b_positions.entry(item).or_default().push(j);
        }

        SequenceMatcher { a, b, b_positions }
    }

    /// Longest block with `a_lo <= i < a_hi` and `b_lo <= j < b_hi`
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    /// Returns a zero-sized match at `(a_lo, b_lo)` when nothing matches.
    pub fn longest_match(&self, a_lo: usize, a_hi: usize, b_lo: usize, b_hi: usize) -> Match {
        let mut best = Match {
            a_start: a_lo,
            b_start: b_lo,
            size: 0,
        };

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in a_lo..a_hi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();

            if let Some(positions) = self.b_positions.get(&self.a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }

                    let previous = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = previous + 1;
                    new_j2len.insert(j, k);

                    if k > best.size {
                        best = Match {
                            a_start: i + 1 - k,
                            b_start: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }

            j2len = new_j2len;
        }

        best
    }

    /// All matching blocks in order, adjacent blocks merged
    ///
    /// The list always ends with a zero-sized sentinel at `(a.len(), b.len())`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((a_lo, a_hi, b_lo, b_hi)) = queue.pop() {
            let found = self.longest_match(a_lo, a_hi, b_lo, b_hi);
            if found.size == 0 {
                continue;
            }

            blocks.push(found);

            if a_lo < found.a_start && b_lo < found.b_start {
                queue.push((a_lo, found.a_start, b_lo, found.b_start));
            }
            let a_next = found.a_start + found.size;
            let b_next = found.b_start + found.size;
            if a_next < a_hi && b_next < b_hi {
                queue.push((a_next, a_hi, b_next, b_hi));
            }
        }

        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged.push(Match {
            a_start: self.a.len(),
            b_start: self.b.len(),
            size: 0,
        });
        merged
    }

    /// Edit steps that turn `a` into `b`, covering both sequences end to end
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut i = 0;
        let mut j = 0;
        let mut opcodes = Vec::new();

        for block in self.matching_blocks() {
            let tag = if i < block.a_start && j < block.b_start {
                Some(Tag::Replace)
            } else if i < block.a_start {
                Some(Tag::Delete)
            } else if j < block.b_start {
                Some(Tag::Insert)
            } else {
                None
            };

            if let Some(tag) = tag {
                opcodes.push(Opcode::new(tag, i, block.a_start, j, block.b_start));
            }

            i = block.a_start + block.size;
            j = block.b_start + block.size;

            if block.size > 0 {
                opcodes.push(Opcode::new(Tag::Equal, block.a_start, i, block.b_start, j));
            }
        }

        opcodes
    }

    /// Opcodes split into hunks with at most `context` equal elements on each side
    pub fn grouped_opcodes(&self, context: usize) -> Vec<Vec<Opcode>> {
        let mut codes = self.opcodes();
        if codes.is_empty() {
            codes.push(Opcode::new(Tag::Equal, 0, 1, 0, 1));
        }

        // Trim leading and trailing equal runs down to the context size
        if let Some(first) = codes.first_mut() {
            if first.tag == Tag::Equal {
                first.a_start = first.a_start.max(first.a_end.saturating_sub(context));
                first.b_start = first.b_start.max(first.b_end.saturating_sub(context));
            }
        }
        if let Some(last) = codes.last_mut() {
            if last.tag == Tag::Equal {
                last.a_end = last.a_end.min(last.a_start + context);
                last.b_end = last.b_end.min(last.b_start + context);
            }
        }

        let mut groups = Vec::new();
        let mut group = Vec::new();

        for mut code in codes {
            if code.tag == Tag::Equal && code.a_end - code.a_start > context * 2 {
                group.push(Opcode::new(
                    Tag::Equal,
                    code.a_start,
                    code.a_end.min(code.a_start + context),
                    code.b_start,
                    code.b_end.min(code.b_start + context),
                ));
                groups.push(std::mem::take(&mut group));

                code.a_start = code.a_start.max(code.a_end.saturating_sub(context));
                code.b_start = code.b_start.max(code.b_end.saturating_sub(context));
            }
            group.push(code);
        }

        let only_equal = group.len() == 1 && group[0].tag == Tag::Equal;
        if !group.is_empty() && !only_equal {
            groups.push(group);
        }

        groups
    }

    /// Similarity in `[0, 1]`: `2 * M / T`, where `M` is the matched element count
    pub fn ratio(&self) -> f64 {
        let matched: usize = self.matching_blocks().iter().map(|block| block.size).sum();
        ratio_of(matched, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from element counts alone
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<&T, isize> = self
            .b_positions
            .iter()
            .map(|(item, positions)| (*item, positions.len() as isize))
            .collect();

        let mut matched = 0;
        for item in self.a {
            if let Some(count) = available.get_mut(item) {
                if *count > 0 {
                    matched += 1;
                }
                *count -= 1;
            }
        }

        ratio_of(matched, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from sequence lengths alone
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        ratio_of(la.min(lb), la + lb)
    }
}

fn ratio_of(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    2.0 * matched as f64 / total as f64
}

/// Character-level similarity ratio of two strings, in `[0, 1]`
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Index and score of the candidate closest to `word`, if it reaches `cutoff`
///
/// Candidates are pruned by the cheap upper bounds before the full ratio is
/// computed. On equal scores the earliest candidate wins.
pub fn best_match<S: AsRef<str>>(word: &str, candidates: &[S], cutoff: f64) -> Option<(usize, f64)> {
    let word: Vec<char> = word.chars().collect();
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate: Vec<char> = candidate.as_ref().chars().collect();
        let matcher = SequenceMatcher::new(&candidate, &word);

        if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
            continue;
        }

        let score = matcher.ratio();
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best
}
