//! Collection of the symbols touched by non-equal opcodes.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::opcodes::Opcode;

/// Separator used by [`Delta`]'s `Display` impl.
pub const DEFAULT_SEPARATOR: &str = ", ";

/// The unique symbols that differ between two sequences, in `Ord` order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Delta<T: Ord> {
    symbols: BTreeSet<T>,
}

impl<T: Ord> Default for Delta<T> {
    fn default() -> Self {
        Self {
            symbols: BTreeSet::new(),
        }
    }
}

impl<T: Ord> Delta<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the sequences had no differing symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: &T) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.symbols.iter()
    }

    pub fn into_set(self) -> BTreeSet<T> {
        self.symbols
    }
}

impl<T: Ord + fmt::Display> Delta<T> {
    /// Join the symbols with `separator`. Empty when there are none.
    pub fn render(&self, separator: &str) -> String {
        let mut out = String::new();
        for (idx, symbol) in self.symbols.iter().enumerate() {
            if idx > 0 {
                out.push_str(separator);
            }
            out.push_str(&symbol.to_string());
        }
        out
    }
}

impl<T: Ord + fmt::Display> fmt::Display for Delta<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_SEPARATOR))
    }
}

impl<T: Ord> FromIterator<T> for Delta<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> IntoIterator for Delta<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

/// Collect every symbol of `a` under a `replace`/`delete` span and every
/// symbol of `b` under a `replace`/`insert` span.
pub fn extract_differences<T: Ord + Clone>(a: &[T], b: &[T], opcodes: &[Opcode]) -> Delta<T> {
    let mut symbols = BTreeSet::new();
    for op in opcodes {
        if op.tag.touches_a() {
            symbols.extend(a[op.a_range()].iter().cloned());
        }
        if op.tag.touches_b() {
            symbols.extend(b[op.b_range()].iter().cloned());
        }
    }
    Delta { symbols }
}
