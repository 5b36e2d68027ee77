//! The bitstream module is the bit-level I/O for huffpack.
//!
//! - bitpacker: packs codes MSB first into bytes behind the 1 byte padding header.
//! - bitreader: reads packed bytes back bit by bit for the decoder and the container parser.
//!
//! Both work on whole in-memory buffers. Nothing here streams.
//!
pub mod bitpacker;
pub mod bitreader;
