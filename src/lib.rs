//! Huffman file compressor.
//!
//! Version 0.1.0
//!
//! Counts the bytes of an input, builds a huffman tree from the counts, and packs
//! every byte as its code behind a one byte padding header. Trees are built with a
//! fixed tie-break (equal counts merge in insertion order), so the same input always
//! produces the same bits.
//!
//! ```
//! let packed = huffpack::compress(b"aaabbc")?;
//! assert_eq!(huffpack::decompress(&packed)?, b"aaabbc");
//!
//! // The bare packed output, without the frequency table in front
//! let encoded = huffpack::encode(b"aaabbc")?;
//! assert_eq!(encoded.packed, [0x07, 0x1f, 0x00]);
//! assert_eq!(huffpack::decode(&encoded.packed, &encoded.reverse)?, b"aaabbc");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! Basic command line usage:
//!
//! `$> huffpack input.txt`
//!
//! This will compress the file and create the file compressed_input.bin.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, encode, Encoded};
pub use compression::decompress::{decode, decompress};
pub use error::{Error, Result};
