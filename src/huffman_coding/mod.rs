//! The huffman module turns a frequency table into per-symbol bit codes.
//!
//! - tree: builds the merge tree in an index arena from a min-heap keyed on
//!   (weight, insertion sequence), so equal weights always merge the same way.
//! - codes: walks the tree and derives the code table and its inverse.
//!
//! Tree and codes are rebuilt for every encode or decode and dropped afterwards.

pub mod codes;
pub mod tree;
