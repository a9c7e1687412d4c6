//! Character-level alignment engine for chardiff.
//!
//! Aligns two sequences by recursive longest-match partitioning, turns the
//! matched blocks into an edit script, and reports the set of symbols that
//! are not common to both sides.
//!
//! # Key Types
//!
//! - [`Matcher`] / [`MatchBlock`] / [`MatchOptions`] -- Longest-match block discovery
//! - [`Opcode`] / [`OpTag`] -- Edit script covering both sequences
//! - [`Delta`] -- Sorted set of differing symbols
//! - [`Comparison`] / [`TextDiffer`] -- One-call comparison of text values
//!
//! # Quick Start
//!
//! ```rust
//! use chardiff_core::{compare_values, TextDiffer};
//!
//! assert_eq!(compare_values(Some("kitten"), Some("sitting")), "e, g, i, k, s");
//! assert_eq!(compare_values(None, None), "");
//!
//! let comparison = TextDiffer::new().compare("abc", "abd");
//! assert_eq!(comparison.delta.to_string(), "c, d");
//! ```

pub mod compare;
pub mod extract;
pub mod matcher;
pub mod opcodes;

pub use compare::{compare, compare_values, diff_chars, normalize, Comparison, TextDiffer};
pub use extract::{extract_differences, Delta, DEFAULT_SEPARATOR};
pub use matcher::{MatchBlock, MatchOptions, Matcher};
pub use opcodes::{build_opcodes, OpTag, Opcode};
