//! One-call comparison of two sequences or two text values.

use std::hash::Hash;

use serde::Serialize;

use crate::extract::{extract_differences, Delta, DEFAULT_SEPARATOR};
use crate::matcher::{MatchBlock, MatchOptions, Matcher};
use crate::opcodes::{build_opcodes, Opcode};

/// Everything computed for a single pair of sequences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comparison<T: Ord> {
    pub a_len: usize,
    pub b_len: usize,
    /// Matching blocks, terminated by the sentinel.
    pub blocks: Vec<MatchBlock>,
    pub opcodes: Vec<Opcode>,
    pub delta: Delta<T>,
}

impl<T: Ord> Comparison<T> {
    /// Returns `true` if no opcode is a change.
    pub fn is_identical(&self) -> bool {
        self.opcodes.iter().all(|op| !op.is_change())
    }

    /// Total number of matched symbols.
    pub fn matched(&self) -> usize {
        self.blocks.iter().map(|b| b.len).sum()
    }

    /// Similarity in `[0, 1]`: `2 * matched / (a_len + b_len)`, `1.0` when
    /// both sequences are empty.
    pub fn ratio(&self) -> f64 {
        let total = self.a_len + self.b_len;
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched() as f64 / total as f64
    }
}

/// Align `a` and `b` and collect their differing symbols.
pub fn compare<T>(a: &[T], b: &[T], options: MatchOptions<'_, T>) -> Comparison<T>
where
    T: Eq + Hash + Ord + Clone,
{
    let blocks = Matcher::with_options(a, b, options).matching_blocks();
    let opcodes = build_opcodes(a.len(), b.len(), &blocks);
    let delta = extract_differences(a, b, &opcodes);
    tracing::trace!(
        a_len = a.len(),
        b_len = b.len(),
        opcodes = opcodes.len(),
        differing = delta.len(),
        "sequences compared"
    );
    Comparison {
        a_len: a.len(),
        b_len: b.len(),
        blocks,
        opcodes,
        delta,
    }
}

/// A missing value compares as the empty string.
pub fn normalize(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Differing characters of `a` and `b`, sorted, joined by `", "`.
///
/// ```rust
/// assert_eq!(chardiff_core::diff_chars("kitten", "sitting"), "e, g, i, k, s");
/// assert_eq!(chardiff_core::diff_chars("café", "cafe"), "e, é");
/// ```
pub fn diff_chars(a: &str, b: &str) -> String {
    TextDiffer::default().diff(a, b)
}

/// [`diff_chars`] over possibly-missing values.
pub fn compare_values(a: Option<&str>, b: Option<&str>) -> String {
    diff_chars(normalize(a), normalize(b))
}

/// Character-level differ with junk settings and an output separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDiffer {
    /// Characters that never seed a match.
    pub junk_chars: Vec<char>,
    /// Enable the popular-symbol heuristic for long right-hand values.
    pub auto_junk: bool,
    pub separator: String,
}

impl Default for TextDiffer {
    fn default() -> Self {
        Self {
            junk_chars: Vec::new(),
            auto_junk: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl TextDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_junk_chars(mut self, junk: impl IntoIterator<Item = char>) -> Self {
        self.junk_chars = junk.into_iter().collect();
        self
    }

    pub fn with_auto_junk(mut self, auto_junk: bool) -> Self {
        self.auto_junk = auto_junk;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Full comparison of two text values, symbol by symbol.
    pub fn compare(&self, a: &str, b: &str) -> Comparison<char> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let is_junk = |c: &char| self.junk_chars.contains(c);
        let predicate: Option<&dyn Fn(&char) -> bool> = if self.junk_chars.is_empty() {
            None
        } else {
            Some(&is_junk)
        };
        let options = MatchOptions {
            is_junk: predicate,
            auto_junk: self.auto_junk,
        };
        compare(&a, &b, options)
    }

    /// [`TextDiffer::compare`] over possibly-missing values.
    pub fn compare_values(&self, a: Option<&str>, b: Option<&str>) -> Comparison<char> {
        self.compare(normalize(a), normalize(b))
    }

    /// Rendered differing characters.
    pub fn diff(&self, a: &str, b: &str) -> String {
        self.render(&self.compare(a, b))
    }

    pub fn render(&self, comparison: &Comparison<char>) -> String {
        comparison.delta.render(&self.separator)
    }
}
