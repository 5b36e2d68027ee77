//! Derives the bit code of every symbol from a huffman tree.
//!
//! Codes are the leaf paths of the tree, 0 for a left step and 1 for a right step.
//! Two different leaves can't sit on the same path, so no code is a prefix of
//! another and greedy bit-by-bit decoding is well defined.

use std::fmt::{Display, Formatter};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::tree::HuffmanTree;
use crate::error::{Error, Result};

/// A code of 1 to 128 bits, right aligned in `bits`. The first bit of the code is the
/// most significant of the `len` low bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// Longest code we can hold. A tree this deep needs weights past u64::MAX, so
    /// build() can never produce one.
    pub const MAX_LEN: usize = 128;

    /// Build a code from its right-aligned bits. Bits above `len` are masked off.
    pub fn new(bits: u128, len: u8) -> Code {
        let mask = if len as usize >= Self::MAX_LEN {
            u128::MAX
        } else {
            (1_u128 << len) - 1
        };
        Code {
            bits: bits & mask,
            len,
        }
    }

    /// Append one bit, or None if the code is already MAX_LEN long.
    pub fn push(self, bit: bool) -> Option<Code> {
        if self.len as usize >= Self::MAX_LEN {
            return None;
        }
        Some(Code {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        })
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if self is a proper prefix of other.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len < other.len
            && other.bits.checked_shr((other.len - self.len) as u32).unwrap_or(0) == self.bits
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            write!(f, "{}", (self.bits >> i) & 1)?;
        }
        Ok(())
    }
}

/// Symbol -> code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Iterate (symbol, code) in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(sym, &code)| code.map(|c| (sym as u8, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.codes.iter().flatten().map(Code::len).max().unwrap_or(0)
    }
}

/// Code -> symbol. The inverse of CodeTable, used by the decoder.
#[derive(Clone, Debug, Default)]
pub struct ReverseCodeTable {
    symbols: FxHashMap<Code, u8>,
    max_len: usize,
}

impl ReverseCodeTable {
    pub fn get(&self, code: &Code) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length of the longest code. A decoder that has read more bits than this
    /// without a match is looking at corrupt data.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl From<&CodeTable> for ReverseCodeTable {
    fn from(table: &CodeTable) -> Self {
        let mut reverse = ReverseCodeTable::default();
        for (sym, code) in table.iter() {
            reverse.symbols.insert(code, sym);
            reverse.max_len = reverse.max_len.max(code.len());
        }
        reverse
    }
}

/// Walk the tree and return the code table and its inverse.
///
/// A tree that is a single leaf gets the code `0`, so even a one-symbol alphabet
/// produces at least one bit per symbol.
pub fn assign_codes(tree: &HuffmanTree) -> Result<(CodeTable, ReverseCodeTable)> {
    let nodes = &tree.nodes;
    if tree.root >= nodes.len() {
        return Err(Error::malformed(format!(
            "root {} is outside the {} node arena",
            tree.root,
            nodes.len()
        )));
    }

    let mut table = CodeTable {
        codes: [None; 256],
    };
    let mut reverse = ReverseCodeTable::default();
    let mut visited = vec![false; nodes.len()];

    // Lone leaf: give it a one bit code instead of the empty path.
    let root_code = if nodes[tree.root].is_leaf() {
        Code::new(0, 1)
    } else {
        Code::default()
    };

    // Depth first, left before right, with an explicit stack so skewed trees can't
    // blow the call stack.
    let mut stack = vec![(tree.root, root_code)];
    while let Some((idx, code)) = stack.pop() {
        if visited[idx] {
            return Err(Error::malformed(format!("node {} is reachable twice", idx)));
        }
        visited[idx] = true;
        let node = &nodes[idx];

        match (node.symbol, node.left, node.right) {
            (Some(sym), None, None) => {
                if table.codes[sym as usize].is_some() {
                    return Err(Error::malformed(format!("symbol {} has two leaves", sym)));
                }
                trace!("symbol {:#04x} weight {} code {}", sym, node.weight, code);
                table.codes[sym as usize] = Some(code);
                reverse.symbols.insert(code, sym);
                reverse.max_len = reverse.max_len.max(code.len());
            }
            (None, Some(left), Some(right)) => {
                // Children always precede their parent in the arena.
                for kid in [left, right] {
                    if kid >= idx {
                        return Err(Error::malformed(format!(
                            "node {} has child {} that does not precede it",
                            idx, kid
                        )));
                    }
                }
                let too_long = || {
                    Error::malformed(format!("code deeper than {} bits", Code::MAX_LEN))
                };
                stack.push((right, code.push(true).ok_or_else(too_long)?));
                stack.push((left, code.push(false).ok_or_else(too_long)?));
            }
            (Some(sym), _, _) => {
                return Err(Error::malformed(format!(
                    "leaf node {} (symbol {}) has children",
                    idx, sym
                )));
            }
            (None, _, _) => {
                return Err(Error::malformed(format!(
                    "internal node {} is missing a child",
                    idx
                )));
            }
        }
    }

    debug!(
        "Assigned {} codes, longest is {} bits",
        table.len(),
        reverse.max_len()
    );
    Ok((table, reverse))
}
