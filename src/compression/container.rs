//! The huffpack file format: a frequency table followed by the packed output.
//!
//! ```text
//! offset  size        meaning
//! 0       3           magic "HPK"
//! 3       1           format version (1)
//! 4       2           distinct symbol count k, big endian, 1-256
//! 6       1           count width w in bytes: 1, 2, 4 or 8
//! 7       k * (1+w)   symbol byte, then its count (big endian), ascending symbol order
//! ...     rest        padding header byte + packed codes
//! ```
//!
//! The decoder rebuilds the exact same tree from the stored counts, so the codes
//! themselves never need to be written out.

use log::{debug, error};

use crate::bitstream::bitreader::BitReader;
use crate::error::{Error, Result};
use crate::tools::freq_count::FreqTable;

pub const MAGIC: &[u8; 3] = b"HPK";
pub const VERSION: u8 = 1;

/// Smallest of 1, 2, 4 or 8 bytes that holds `max`.
fn count_width(max: u64) -> u8 {
    match max {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        0x1_0000..=0xffff_ffff => 4,
        _ => 8,
    }
}

/// Frame a packed output with its frequency table.
pub fn write_container(freqs: &FreqTable, packed: &[u8]) -> Vec<u8> {
    let distinct = freqs.distinct();
    let width = count_width(freqs.iter().map(|(_, count)| count).max().unwrap_or(0));
    let mut out = Vec::with_capacity(7 + distinct * (1 + width as usize) + packed.len());

    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&(distinct as u16).to_be_bytes());
    out.push(width);
    for (sym, count) in freqs.iter() {
        out.push(sym);
        // Keep the low `width` bytes of the big endian count
        out.extend_from_slice(&count.to_be_bytes()[8 - width as usize..]);
    }
    debug!(
        "Container header is {} bytes for {} symbols ({} byte counts)",
        out.len(),
        distinct,
        width
    );
    out.extend_from_slice(packed);
    out
}

/// Split a container into its frequency table and the packed output that follows it.
pub fn read_container(data: &[u8]) -> Result<(FreqTable, &[u8])> {
    let mut br = BitReader::new(data);
    let eof = |br: &BitReader<'_>| Error::UnexpectedEof {
        bits_read: br.bits_read(),
    };

    // Look for a valid signature.
    let magic = br.bytes(3).ok_or_else(|| eof(&br))?;
    if magic != MAGIC {
        error!("Fatal error: not a valid huffpack file.");
        return Err(Error::corrupted("missing HPK signature"));
    }
    let version = br.byte().ok_or_else(|| eof(&br))?;
    if version != VERSION {
        return Err(Error::corrupted(format!("unsupported format version {}", version)));
    }

    let distinct = br.bint(16).ok_or_else(|| eof(&br))? as usize;
    if !(1..=256).contains(&distinct) {
        return Err(Error::corrupted(format!("invalid symbol count {}", distinct)));
    }
    let width = br.byte().ok_or_else(|| eof(&br))?;
    if ![1, 2, 4, 8].contains(&width) {
        return Err(Error::corrupted(format!("invalid count width {}", width)));
    }

    let mut pairs = Vec::with_capacity(distinct);
    for _ in 0..distinct {
        let sym = br.byte().ok_or_else(|| eof(&br))?;
        let count = br.bint(width as usize * 8).ok_or_else(|| eof(&br))?;
        pairs.push((sym, count));
    }
    let freqs = FreqTable::from_pairs(&pairs)?;

    // The header is whole bytes, so the reader is always aligned here.
    let packed = br.rest().ok_or_else(|| eof(&br))?;
    debug!(
        "Found {} symbols, {} packed bytes follow",
        distinct,
        packed.len()
    );
    Ok((freqs, packed))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs;

    #[test]
    fn count_width_test() {
        assert_eq!(count_width(1), 1);
        assert_eq!(count_width(255), 1);
        assert_eq!(count_width(256), 2);
        assert_eq!(count_width(70_000), 4);
        assert_eq!(count_width(u32::MAX as u64 + 1), 8);
    }

    #[test]
    fn layout_test() {
        let table = freqs(b"aaabbc").unwrap();
        let out = write_container(&table, &[0x07, 0x1f, 0x00]);
        assert_eq!(
            out,
            [
                b'H', b'P', b'K', 1, // magic and version
                0, 3, 1, // three symbols, one byte counts
                b'a', 3, b'b', 2, b'c', 1, // table
                0x07, 0x1f, 0x00, // packed output
            ]
        );
        let (back, packed) = read_container(&out).unwrap();
        assert_eq!(back, table);
        assert_eq!(packed, [0x07, 0x1f, 0x00]);
    }

    #[test]
    fn wide_counts_test() {
        let table = FreqTable::from_pairs(&[(0, 300), (255, 1)]).unwrap();
        let out = write_container(&table, &[1, 0]);
        assert_eq!(out[6], 2);
        assert_eq!(&out[7..13], &[0, 0x01, 0x2c, 255, 0, 1]);
        assert_eq!(read_container(&out).unwrap().0, table);
    }

    #[test]
    fn all_symbols_test() {
        let data: Vec<u8> = (0..=255).collect();
        let table = freqs(&data).unwrap();
        let out = write_container(&table, &[8, 0]);
        assert_eq!(&out[4..6], &[1, 0]);
        assert_eq!(read_container(&out).unwrap().0.distinct(), 256);
    }

    #[test]
    fn bad_magic_test() {
        assert!(matches!(
            read_container(b"BZh9\x00\x01\x01a\x01\x07\x00"),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn bad_header_fields_test() {
        // Version 2
        assert!(matches!(
            read_container(b"HPK\x02\x00\x01\x01a\x01"),
            Err(Error::CorruptedData(_))
        ));
        // Zero symbols
        assert!(matches!(
            read_container(b"HPK\x01\x00\x00\x01"),
            Err(Error::CorruptedData(_))
        ));
        // Width 3
        assert!(matches!(
            read_container(b"HPK\x01\x00\x01\x03a\x00\x00\x01"),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn truncated_test() {
        let out = write_container(&freqs(b"aaabbc").unwrap(), &[0x07, 0x1f, 0x00]);
        for cut in 0..13 {
            assert!(
                matches!(read_container(&out[..cut]), Err(Error::UnexpectedEof { .. })),
                "cut at {}",
                cut
            );
        }
    }
}
