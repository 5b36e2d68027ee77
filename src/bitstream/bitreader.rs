//! BitReader: reads a packed bitstream, most significant bit first.
//!
//! NOTE: Input is a byte slice already held in memory. Every read returns None
//! (without consuming anything) when fewer bits remain than were asked for.
//!

/// Reads a packed byte slice bit by bit.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        let byte = *self.buffer.get(self.cursor)?;
        let bit = (byte >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return the next n bits (up to 64) as an integer, or None if there aren't enough left.
    pub fn bint(&mut self, mut n: usize) -> Option<u64> {
        if n > 64 || n > self.bits_left() {
            return None;
        }
        let mut result = 0_u64;

        // Finish off a partial byte first, then take whole bytes, then the remainder.
        while n > 0 && self.bit_index > 0 {
            result = result << 1 | self.bit()? as u64;
            n -= 1;
        }
        while n >= 8 {
            result = result << 8 | self.buffer[self.cursor] as u64;
            self.cursor += 1;
            n -= 8;
        }
        while n > 0 {
            result = result << 1 | self.bit()? as u64;
            n -= 1;
        }
        Some(result)
    }

    /// Return the next 8 bits as a u8.
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|b| b as u8)
    }

    /// Return the next n bytes, or None if there aren't that many left.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if n * 8 > self.bits_left() {
            return None;
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// Everything not read yet, when the reader sits on a byte boundary.
    pub fn rest(&self) -> Option<&'a [u8]> {
        if self.bit_index == 0 {
            Some(&self.buffer[self.cursor.min(self.buffer.len())..])
        } else {
            None
        }
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> usize {
        self.cursor * 8 + self.bit_index
    }

    /// Number of bits not consumed yet.
    pub fn bits_left(&self) -> usize {
        (self.buffer.len() * 8).saturating_sub(self.bits_read())
    }

    /// Debugging function to return the bytes.bits location of the reader
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn bit_test() {
        let data = [0b1010_0000];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bool_bit(), Some(true));
        assert_eq!(br.loc(), "[0.3]");
        for _ in 0..5 {
            assert_eq!(br.bit(), Some(0));
        }
        assert_eq!(br.bit(), None);
        assert_eq!(br.bits_read(), 8);
    }

    #[test]
    fn bint_test() {
        let data = [0b0011_0101, 0xde, 0xad, 0b1100_0000];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bint(3), Some(0b001));
        assert_eq!(br.bint(21), Some(0b1_0101_1101_1110_1010_1101));
        assert_eq!(br.bits_left(), 8);
        // Too many bits asked for: nothing consumed
        assert_eq!(br.bint(9), None);
        assert_eq!(br.bint(2), Some(0b11));
        assert_eq!(br.bits_left(), 6);
    }

    #[test]
    fn bytes_and_rest_test() {
        let data = b"HPK\x01rest";
        let mut br = BitReader::new(data);
        assert_eq!(br.bytes(3).unwrap(), b"HPK".to_vec());
        assert_eq!(br.byte(), Some(1));
        assert_eq!(br.rest(), Some(&b"rest"[..]));
        assert_eq!(br.bytes(5), None);
        br.bit();
        assert_eq!(br.rest(), None);
    }

    #[test]
    fn bint_64_test() {
        let data = u64::MAX.to_be_bytes();
        let mut br = BitReader::new(&data);
        assert_eq!(br.bint(64), Some(u64::MAX));
        assert_eq!(br.bint(1), None);
    }
}
