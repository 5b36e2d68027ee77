//! The compression module runs the huffman pipeline end to end.
//!
//! Compression happens in the following steps:
//! - Frequency count: count how often every byte value occurs.
//! - Tree build: merge the two lightest nodes until one root is left.
//! - Code assignment: walk the tree, 0 for left and 1 for right.
//! - Bit packing: write a padding header byte, every code in input order, then the padding.
//! - Framing: put the frequency table in front so the file can be decoded alone.
//!
//! Decompression reads the frequency table, rebuilds the same tree and matches the
//! packed bits against the codes one bit at a time.
//!

pub mod compress;
pub mod container;
pub mod decompress;
