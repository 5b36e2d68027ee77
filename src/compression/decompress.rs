use log::{debug, info, trace};

use crate::bitstream::bitreader::BitReader;
use crate::error::{Error, Result};
use crate::huffman_coding::codes::{assign_codes, Code, ReverseCodeTable};
use crate::huffman_coding::tree::HuffmanTree;
use crate::tools::cli::HpOpts;
use crate::tools::data_io::{read_input, write_output};
use crate::tools::freq_count::freqs;

use super::container::read_container;

/// Decode a packed output (padding header + codes) with the code table it was
/// packed with.
pub fn decode(packed: &[u8], reverse: &ReverseCodeTable) -> Result<Vec<u8>> {
    let mut br = BitReader::new(packed);

    // Padding header first
    let pad = br.byte().ok_or(Error::UnexpectedEof { bits_read: 0 })?;
    if !(1..=8).contains(&pad) {
        return Err(Error::InvalidPadding(pad));
    }
    let payload_bits = br.bits_left().checked_sub(pad as usize).ok_or_else(|| {
        Error::corrupted(format!(
            "{} bits of padding but only {} bits after the header",
            pad,
            br.bits_left()
        ))
    })?;
    trace!("Decoding {} payload bits, {} padding bits", payload_bits, pad);

    // Codes are prefix free, so the first table hit is the only possible match.
    let mut out = Vec::with_capacity(payload_bits / reverse.max_len().max(1));
    let mut code = Code::default();
    for _ in 0..payload_bits {
        let bit = br.bool_bit().ok_or(Error::UnexpectedEof {
            bits_read: br.bits_read(),
        })?;
        code = code
            .push(bit)
            .ok_or_else(|| Error::corrupted("code longer than any huffman code"))?;
        if let Some(sym) = reverse.get(&code) {
            out.push(sym);
            code = Code::default();
        } else if code.len() >= reverse.max_len() {
            return Err(Error::corrupted(format!(
                "no code matches {} at bit {}",
                code,
                br.bits_read()
            )));
        }
    }
    if !code.is_empty() {
        return Err(Error::corrupted(format!(
            "stream ends inside a code ({} left over)",
            code
        )));
    }
    if out.is_empty() {
        return Err(Error::corrupted("packed stream holds no symbols"));
    }

    let padding = br.bint(pad as usize).ok_or(Error::UnexpectedEof {
        bits_read: br.bits_read(),
    })?;
    if padding != 0 {
        return Err(Error::corrupted("padding bits are not zero"));
    }
    Ok(out)
}

/// Decode a container: rebuild the tree from the stored counts, then decode the
/// packed output behind it.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let (table, packed) = read_container(data)?;
    let tree = HuffmanTree::build(&table)?;
    let (_, reverse) = assign_codes(&tree)?;
    let out = decode(packed, &reverse)?;

    // The decoded symbols must add up to the table we were given.
    if freqs(&out)? != table {
        return Err(Error::corrupted(
            "decoded symbol counts do not match the frequency table",
        ));
    }
    debug!("Decoded {} symbols", out.len());
    Ok(out)
}

/// Decompress the file specified in opts (HpOpts).
pub fn decompress_file(opts: &HpOpts) -> Result<()> {
    let data = read_input(&opts.file)?;
    let out = decompress(&data)?;
    let written = write_output(opts, &out)?;

    info!("File decompressed successfully.");
    if let Some(path) = written {
        info!("Decompressed file: {}", path.display());
    }
    Ok(())
}

/// Check that the file specified in opts decompresses cleanly, without writing anything.
pub fn test_file(opts: &HpOpts) -> Result<()> {
    let data = read_input(&opts.file)?;
    let out = decompress(&data)?;
    info!("{}: ok ({} bytes)", opts.file.display(), out.len());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::{compress, encode};

    #[test]
    fn worked_example_decode_test() {
        let encoded = encode(b"aaabbc").unwrap();
        assert_eq!(decode(&[0x07, 0x1f, 0x00], &encoded.reverse).unwrap(), b"aaabbc");
    }

    #[test]
    fn single_symbol_round_trip_test() {
        let encoded = encode(b"aaaa").unwrap();
        assert_eq!(decode(&encoded.packed, &encoded.reverse).unwrap(), b"aaaa");
        assert_eq!(decompress(&compress(b"aaaa").unwrap()).unwrap(), b"aaaa");
        assert_eq!(decompress(&compress(b"x").unwrap()).unwrap(), b"x");
    }

    #[test]
    fn round_trip_test() {
        let inputs: Vec<Vec<u8>> = vec![
            b"aaabbc".to_vec(),
            b"ab".to_vec(),
            b"aaaaaaaa".to_vec(),
            "Größe, naïve café, 日本語".as_bytes().to_vec(),
            (0..=255).collect(),
            (0..65_536_u32).map(|i| (i % 251) as u8 ^ (i >> 9) as u8).collect(),
        ];
        for input in inputs {
            let encoded = encode(&input).unwrap();
            assert_eq!(decode(&encoded.packed, &encoded.reverse).unwrap(), input);
            assert_eq!(decompress(&compress(&input).unwrap()).unwrap(), input);
        }
    }

    #[test]
    fn skewed_round_trip_test() {
        // Fibonacci counts make one code per depth level, up to 24 bits long.
        let mut input = vec![];
        let (mut a, mut b) = (1_usize, 1_usize);
        for sym in 0..25_u8 {
            input.extend(std::iter::repeat(sym).take(a));
            let next = a + b;
            a = b;
            b = next;
        }
        let encoded = encode(&input).unwrap();
        assert_eq!(encoded.reverse.max_len(), 24);
        assert_eq!(decompress(&compress(&input).unwrap()).unwrap(), input);
    }

    #[test]
    fn invalid_padding_test() {
        let encoded = encode(b"aaabbc").unwrap();
        assert!(matches!(
            decode(&[0x00, 0x1f, 0x00], &encoded.reverse),
            Err(Error::InvalidPadding(0))
        ));
        assert!(matches!(
            decode(&[0x09, 0x1f, 0x00], &encoded.reverse),
            Err(Error::InvalidPadding(9))
        ));
    }

    #[test]
    fn truncated_decode_test() {
        let encoded = encode(b"aaabbc").unwrap();
        assert!(matches!(
            decode(&[], &encoded.reverse),
            Err(Error::UnexpectedEof { .. })
        ));
        // Header says 8 padding bits but there is no byte after it
        assert!(matches!(
            decode(&[0x08], &encoded.reverse),
            Err(Error::CorruptedData(_))
        ));
        // Header only, with room for nothing but the padding
        assert!(matches!(
            decode(&[0x08, 0x00], &encoded.reverse),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn corrupt_payload_test() {
        let encoded = encode(b"aaabbc").unwrap();
        // Non-zero padding
        assert!(matches!(
            decode(&[0x07, 0x1f, 0x01], &encoded.reverse),
            Err(Error::CorruptedData(_))
        ));
        // Payload ends after the first bit of a two bit code
        assert!(matches!(
            decode(&[0x07, 0x00, 0x80], &encoded.reverse),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn count_mismatch_test() {
        let mut data = compress(b"aaabbc").unwrap();
        // Drop a's count to 2: the rebuilt tree hands out other codes and the
        // decoded counts no longer match the table.
        let at = data.iter().position(|&b| b == b'a').unwrap();
        data[at + 1] = 2;
        assert!(matches!(decompress(&data), Err(Error::CorruptedData(_))));
    }
}
