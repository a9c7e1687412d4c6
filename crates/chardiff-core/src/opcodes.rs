//! Edit scripts derived from matching blocks.

use std::fmt;

use serde::Serialize;

use crate::matcher::MatchBlock;

/// The kind of an edit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    /// `a[a_start..a_end]` equals `b[b_start..b_end]`.
    Equal,
    /// `a[a_start..a_end]` is replaced by `b[b_start..b_end]`.
    Replace,
    /// `a[a_start..a_end]` is removed; the `b` span is empty.
    Delete,
    /// `b[b_start..b_end]` is inserted; the `a` span is empty.
    Insert,
}

impl OpTag {
    pub fn as_str(self) -> &'static str {
        match self {
            OpTag::Equal => "equal",
            OpTag::Replace => "replace",
            OpTag::Delete => "delete",
            OpTag::Insert => "insert",
        }
    }

    /// Whether the `a` span of this operation holds differing symbols.
    pub fn touches_a(self) -> bool {
        matches!(self, OpTag::Replace | OpTag::Delete)
    }

    /// Whether the `b` span of this operation holds differing symbols.
    pub fn touches_b(self) -> bool {
        matches!(self, OpTag::Replace | OpTag::Insert)
    }
}

impl fmt::Display for OpTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A typed pair of spans, one in each sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> Self {
        Self {
            tag,
            a_start,
            a_end,
            b_start,
            b_end,
        }
    }

    pub fn a_range(&self) -> std::ops::Range<usize> {
        self.a_start..self.a_end
    }

    pub fn b_range(&self) -> std::ops::Range<usize> {
        self.b_start..self.b_end
    }

    pub fn is_change(&self) -> bool {
        self.tag != OpTag::Equal
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} a[{}:{}] b[{}:{}]",
            self.tag, self.a_start, self.a_end, self.b_start, self.b_end
        )
    }
}

/// Turn a matching-block tiling into opcodes covering `[0, a_len)` and
/// `[0, b_len)` end to end.
///
/// The sentinel at `(a_len, b_len)` is implied, so a block list without one
/// still yields full coverage.
pub fn build_opcodes(a_len: usize, b_len: usize, blocks: &[MatchBlock]) -> Vec<Opcode> {
    let mut opcodes = Vec::with_capacity(blocks.len() * 2);
    let (mut i, mut j) = (0usize, 0usize);

    let sentinel = MatchBlock::sentinel(a_len, b_len);
    for block in blocks.iter().chain(std::iter::once(&sentinel)) {
        let tag = match (block.a_start > i, block.b_start > j) {
            (true, true) => Some(OpTag::Replace),
            (true, false) => Some(OpTag::Delete),
            (false, true) => Some(OpTag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            opcodes.push(Opcode::new(tag, i, block.a_start, j, block.b_start));
        }
        if block.len > 0 {
            opcodes.push(Opcode::new(
                OpTag::Equal,
                block.a_start,
                block.a_end(),
                block.b_start,
                block.b_end(),
            ));
        }
        i = block.a_end();
        j = block.b_end();
    }

    debug_assert_eq!((i, j), (a_len, b_len));
    opcodes
}
