use log::{debug, info, trace};

use crate::bitstream::bitpacker::pack;
use crate::error::Result;
use crate::huffman_coding::codes::{assign_codes, CodeTable, ReverseCodeTable};
use crate::huffman_coding::tree::HuffmanTree;
use crate::tools::cli::HpOpts;
use crate::tools::data_io::{read_input, trim_trailing_whitespace, write_output};
use crate::tools::freq_count::{freqs, FreqTable};

use super::container::write_container;

/// Everything one encode produced. The tables are kept so callers can decode
/// the packed output without going through the container.
#[derive(Clone, Debug)]
pub struct Encoded {
    pub freqs: FreqTable,
    pub codes: CodeTable,
    pub reverse: ReverseCodeTable,
    /// Padding header byte followed by the packed codes.
    pub packed: Vec<u8>,
}

/// Huffman encode the input: count, build the tree, assign codes, pack.
pub fn encode(data: &[u8]) -> Result<Encoded> {
    let freqs = freqs(data)?;
    debug!(
        "Counted {} symbols, {} distinct",
        freqs.total(),
        freqs.distinct()
    );

    let tree = HuffmanTree::build(&freqs)?;
    let (codes, reverse) = assign_codes(&tree)?;
    for (sym, code) in codes.iter() {
        trace!("{:#04x} x{}: {}", sym, freqs.get(sym), code);
    }

    let packed = pack(data, &codes)?;
    Ok(Encoded {
        freqs,
        codes,
        reverse,
        packed,
    })
}

/// Encode the input and frame it with its frequency table, so the result can be
/// decoded on its own.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let encoded = encode(data)?;
    Ok(write_container(&encoded.freqs, &encoded.packed))
}

/// Compress the input file defined in opts <HpOpts>.
pub fn compress_file(opts: &HpOpts) -> Result<()> {
    let mut text = read_input(&opts.file)?;
    if opts.trim {
        trim_trailing_whitespace(&mut text);
    }

    let out = compress(&text)?;
    let written = write_output(opts, &out)?;

    info!("File compressed successfully.");
    if let Some(path) = written {
        info!("Compressed file: {}", path.display());
    }
    info!(
        "{} bytes in, {} bytes out ({:.1}%)",
        text.len(),
        out.len(),
        out.len() as f64 * 100.0 / text.len() as f64
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitstream::bitreader::BitReader;
    use crate::error::Error;

    #[test]
    fn worked_example_test() {
        let encoded = encode(b"aaabbc").unwrap();
        assert_eq!(encoded.freqs.total(), 6);
        assert_eq!(encoded.codes.get(b'a').unwrap().to_string(), "0");
        assert_eq!(encoded.codes.get(b'b').unwrap().to_string(), "11");
        assert_eq!(encoded.codes.get(b'c').unwrap().to_string(), "10");
        assert_eq!(encoded.packed, [0b0000_0111, 0x1f, 0x00]);
    }

    #[test]
    fn empty_input_test() {
        assert!(matches!(encode(b""), Err(Error::EmptyInput)));
        assert!(matches!(compress(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn padding_bound_test() {
        let texts: [&[u8]; 5] = [
            b"a",
            b"ab",
            b"aaaaaaaa",
            b"hello, world",
            b"the quick brown fox jumps over the lazy dog",
        ];
        for text in texts {
            let encoded = encode(text).unwrap();
            let pad = encoded.packed[0] as usize;
            assert!((1..=8).contains(&pad));

            // Payload bits as predicted by the code table
            let payload: usize = encoded
                .freqs
                .iter()
                .map(|(sym, count)| encoded.codes.get(sym).unwrap().len() * count as usize)
                .sum();
            assert_eq!((encoded.packed.len() - 1) * 8, payload + pad);

            // Padding bits are zero
            let mut br = BitReader::new(&encoded.packed[1..]);
            let mut skipped = 0;
            while skipped < payload {
                let take = (payload - skipped).min(64);
                br.bint(take).unwrap();
                skipped += take;
            }
            assert_eq!(br.bint(pad), Some(0));
        }
    }

    #[test]
    fn deterministic_test() {
        let text = b"abracadabra, said the magician to the rabbit";
        assert_eq!(compress(text).unwrap(), compress(text).unwrap());
    }
}
