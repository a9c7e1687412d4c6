//! Longest-match block discovery between two sequences.
//!
//! The matcher repeatedly finds the longest block common to a region of `a`
//! and a region of `b`, then splits the remaining work into the parts before
//! and after that block. The result is an ordered tiling of matching blocks
//! terminated by a zero-length sentinel at `(a.len(), b.len())`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

/// Minimum length of `b` before popular symbols are treated as junk.
const AUTO_JUNK_MIN_LEN: usize = 200;

/// A run of symbols common to both sequences.
///
/// `a[a_start..a_start + len]` equals `b[b_start..b_start + len]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MatchBlock {
    /// Start index in `a`.
    pub a_start: usize,
    /// Start index in `b`.
    pub b_start: usize,
    /// Number of matching symbols.
    pub len: usize,
}

impl MatchBlock {
    pub fn new(a_start: usize, b_start: usize, len: usize) -> Self {
        Self {
            a_start,
            b_start,
            len,
        }
    }

    /// The zero-length block that terminates every block list.
    pub fn sentinel(a_len: usize, b_len: usize) -> Self {
        Self::new(a_len, b_len, 0)
    }

    /// Exclusive end index in `a`.
    pub fn a_end(&self) -> usize {
        self.a_start + self.len
    }

    /// Exclusive end index in `b`.
    pub fn b_end(&self) -> usize {
        self.b_start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Junk handling for the matcher.
///
/// Junk symbols never seed a match. They can still extend a match at its
/// edges when the same junk symbol sits on both sides.
pub struct MatchOptions<'f, T> {
    /// Low-value symbol predicate, applied to symbols of `b`.
    pub is_junk: Option<&'f dyn Fn(&T) -> bool>,
    /// Treat symbols occurring more than `len(b) / 100 + 1` times as junk
    /// when `b` has at least 200 symbols.
    pub auto_junk: bool,
}

impl<T> Default for MatchOptions<'_, T> {
    fn default() -> Self {
        Self {
            is_junk: None,
            auto_junk: false,
        }
    }
}

impl<T> Clone for MatchOptions<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatchOptions<'_, T> {}

impl<T> std::fmt::Debug for MatchOptions<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchOptions")
            .field("is_junk", &self.is_junk.is_some())
            .field("auto_junk", &self.auto_junk)
            .finish()
    }
}

/// Finds matching blocks between `a` and `b`.
///
/// The position index over `b` is built once in the constructor and shared
/// by every region search of this comparison.
pub struct Matcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions in `b` of every symbol that may seed a match, ascending.
    b_positions: HashMap<&'a T, Vec<usize>>,
    /// Symbols flagged by the `is_junk` predicate.
    junk: HashSet<&'a T>,
}

impl<'a, T: Eq + Hash> Matcher<'a, T> {
    /// Create a matcher with no junk heuristics.
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::with_options(a, b, MatchOptions::default())
    }

    pub fn with_options(a: &'a [T], b: &'a [T], options: MatchOptions<'_, T>) -> Self {
        let mut b_positions: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, symbol) in b.iter().enumerate() {
            b_positions.entry(symbol).or_default().push(j);
        }

        let mut junk = HashSet::new();
        if let Some(is_junk) = options.is_junk {
            b_positions.retain(|symbol, _| {
                if is_junk(*symbol) {
                    junk.insert(*symbol);
                    false
                } else {
                    true
                }
            });
        }

        if options.auto_junk && b.len() >= AUTO_JUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let before = b_positions.len();
            b_positions.retain(|_, positions| positions.len() <= limit);
            tracing::trace!(
                popular = before - b_positions.len(),
                limit,
                "auto-junk removed popular symbols"
            );
        }

        Self {
            a,
            b,
            b_positions,
            junk,
        }
    }

    pub fn a(&self) -> &'a [T] {
        self.a
    }

    pub fn b(&self) -> &'a [T] {
        self.b
    }

    fn is_b_junk(&self, symbol: &T) -> bool {
        self.junk.contains(symbol)
    }

    /// Longest block common to `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
    ///
    /// Among blocks of maximal length the one with the smallest `a_start`
    /// wins, then the one with the smallest `b_start`. Returns a zero-length
    /// block at `(a_lo, b_lo)` when nothing matches.
    pub fn find_longest_match(
        &self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> MatchBlock {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_len) = (a_lo, b_lo, 0usize);

        // run_len[j] = length of the match ending at a[i - 1], b[j].
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        for i in a_lo..a_hi {
            let mut next_run_len = HashMap::new();
            if let Some(positions) = self.b_positions.get(&a[i]) {
                let start = positions.partition_point(|&j| j < b_lo);
                for &j in positions[start..].iter().take_while(|&&j| j < b_hi) {
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Symbols excluded from the index (popular or junk) can still extend
        // the best block. Non-junk first, so that a popular-symbol run is
        // absorbed before junk padding is.
        while best_i > a_lo
            && best_j > b_lo
            && !self.is_b_junk(&b[best_j - 1])
            && a[best_i - 1] == b[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < a_hi
            && best_j + best_len < b_hi
            && !self.is_b_junk(&b[best_j + best_len])
            && a[best_i + best_len] == b[best_j + best_len]
        {
            best_len += 1;
        }

        while best_i > a_lo
            && best_j > b_lo
            && self.is_b_junk(&b[best_j - 1])
            && a[best_i - 1] == b[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < a_hi
            && best_j + best_len < b_hi
            && self.is_b_junk(&b[best_j + best_len])
            && a[best_i + best_len] == b[best_j + best_len]
        {
            best_len += 1;
        }

        MatchBlock::new(best_i, best_j, best_len)
    }

    /// All matching blocks, in increasing order, merged where contiguous and
    /// terminated by [`MatchBlock::sentinel`].
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (a_len, b_len) = (self.a.len(), self.b.len());

        let mut found = Vec::new();
        let mut pending = vec![(0, a_len, 0, b_len)];
        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let block = self.find_longest_match(a_lo, a_hi, b_lo, b_hi);
            if block.is_empty() {
                continue;
            }
            if a_lo < block.a_start && b_lo < block.b_start {
                pending.push((a_lo, block.a_start, b_lo, block.b_start));
            }
            if block.a_end() < a_hi && block.b_end() < b_hi {
                pending.push((block.a_end(), a_hi, block.b_end(), b_hi));
            }
            found.push(block);
        }
        // Regions are disjoint and ordered in both sequences, so sorting by
        // start restores the before/match/after order.
        found.sort_unstable();

        let mut blocks = merge_adjacent(found);
        blocks.push(MatchBlock::sentinel(a_len, b_len));
        blocks
    }
}

/// Collapse blocks that continue each other in both sequences.
fn merge_adjacent(blocks: Vec<MatchBlock>) -> Vec<MatchBlock> {
    let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.a_end() == block.a_start && last.b_end() == block.b_start => {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged
}
