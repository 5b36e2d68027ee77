//! The tools module provides the helpers around the huffman core.
//!
//! The tools are:
//! - cli: Command line interface and the options it produces.
//! - data_io: Reading the input file and writing the result to a file or stdout.
//! - freq_count: Frequency count of the input bytes.
//!
pub mod cli;
pub mod data_io;
pub mod freq_count;
