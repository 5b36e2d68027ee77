use log::{debug, error};

use crate::error::{Error, Result};
use crate::huffman_coding::codes::{Code, CodeTable};

/// Creates a bitstream for output. Bits are packed most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
    bits: usize,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified. Call finish()
    /// to take the output once everything (padding included) has been written.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
            bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the low `depth` bits (0-32) of data.
    pub fn out_bits(&mut self, data: u32, depth: u8) {
        debug_assert!(depth <= 32);
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data & (0xffffffff >> (32 - depth))) as u64; //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.bits += depth as usize;
        self.write_stream();
    }

    /// Puts an 8 bit word of pre-packed binary encoded data on the stream.
    pub fn out8(&mut self, data: u8) {
        self.out_bits(data as u32, 8);
    }

    /// Puts a huffman code on the stream, first bit first. Codes longer than 32 bits
    /// go out in 32 bit slices.
    pub fn out_code(&mut self, code: Code) {
        let mut remaining = code.len();
        while remaining > 0 {
            let take = remaining.min(32);
            let slice = (code.bits() >> (remaining - take)) as u32;
            self.out_bits(slice, take as u8);
            remaining -= take;
        }
    }

    /// Puts n zero bits on the stream.
    pub fn out_zeros(&mut self, mut n: usize) {
        while n > 0 {
            let take = n.min(32);
            self.out_bits(0, take as u8);
            n -= take;
        }
    }

    /// Total bits written so far.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Returns the packed bytes. Everything written must already add up to whole
    /// bytes; leftover bits in the queue are an error rather than being dropped or
    /// padded here.
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.q_bits > 0 || self.bits % 8 != 0 {
            error!(
                "Stuff left in the BitPacker queue: {} bits at {}",
                self.q_bits,
                self.loc()
            );
            return Err(Error::PaddingConsistency { bits: self.bits });
        }
        Ok(self.output)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits / 8, self.bits % 8)
    }
}

/// Number of zero bits needed to bring `payload_bits` to a byte boundary. A payload
/// that is already aligned gets a whole extra byte, so the result is always 1-8.
pub fn padding_for(payload_bits: usize) -> u8 {
    (8 - payload_bits % 8) as u8
}

/// Pack the input into a padding header byte followed by every symbol's code in
/// input order and the padding zeros.
pub fn pack(data: &[u8], codes: &CodeTable) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    // Size the payload first so the header can go out ahead of it.
    let mut payload_bits = 0_usize;
    for &sym in data {
        payload_bits += code_for(codes, sym)?.len();
    }
    let pad = padding_for(payload_bits);
    debug!(
        "Packing {} symbols into {} bits with {} bits of padding",
        data.len(),
        payload_bits,
        pad
    );

    let mut bp = BitPacker::new(1 + (payload_bits + pad as usize) / 8);
    bp.out8(pad);
    for &sym in data {
        bp.out_code(code_for(codes, sym)?);
    }
    bp.out_zeros(pad as usize);
    bp.finish()
}

fn code_for(codes: &CodeTable, sym: u8) -> Result<Code> {
    codes
        .get(sym)
        .ok_or_else(|| Error::malformed(format!("symbol {:#04x} has no code in the table", sym)))
}
