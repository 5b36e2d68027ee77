use crate::error::{Error, Result};

/// Occurrence count of every byte value in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreqTable {
    counts: [u64; 256],
}

impl FreqTable {
    /// Count of one symbol (0 if it never appears).
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Iterate (symbol, count) over the symbols that appear, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(sym, &count)| (sym as u8, count))
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Total number of symbols counted. Equal to the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Rebuild a table from stored (symbol, count) pairs. Zero counts and repeated
    /// symbols can't come out of freqs(), so they mean the source is corrupt.
    pub fn from_pairs(pairs: &[(u8, u64)]) -> Result<Self> {
        let mut counts = [0_u64; 256];
        for &(sym, count) in pairs {
            if count == 0 {
                return Err(Error::corrupted(format!("symbol {} stored with a zero count", sym)));
            }
            if counts[sym as usize] != 0 {
                return Err(Error::corrupted(format!("symbol {} stored twice", sym)));
            }
            counts[sym as usize] = count;
        }
        // Node weights are partial sums of the counts, so the total has to fit.
        if counts.iter().try_fold(0_u64, |acc, &c| acc.checked_add(c)).is_none() {
            return Err(Error::corrupted("symbol counts overflow a 64 bit total"));
        }
        Ok(Self { counts })
    }
}

/// Returns a frequency count of the input data. Fails on empty input since no
/// tree can be built from it.
pub fn freqs(data: &[u8]) -> Result<FreqTable> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut counts = [0_u64; 256];
    data.iter().for_each(|&el| counts[el as usize] += 1);
    Ok(FreqTable { counts })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn freqs_test() {
        let table = freqs(b"aaabbc").unwrap();
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn iter_order_test() {
        let table = freqs(b"zebra").unwrap();
        let syms: Vec<u8> = table.iter().map(|(sym, _)| sym).collect();
        assert_eq!(syms, b"aberz".to_vec());
    }

    #[test]
    fn empty_input_test() {
        assert!(matches!(freqs(b""), Err(Error::EmptyInput)));
    }

    #[test]
    fn from_pairs_test() {
        let table = FreqTable::from_pairs(&[(b'a', 3), (b'c', 1), (b'b', 2)]).unwrap();
        assert_eq!(table, freqs(b"aaabbc").unwrap());
        assert!(FreqTable::from_pairs(&[]).unwrap().is_empty());
        assert!(matches!(
            FreqTable::from_pairs(&[(b'a', 0)]),
            Err(Error::CorruptedData(_))
        ));
        assert!(matches!(
            FreqTable::from_pairs(&[(b'a', 1), (b'a', 2)]),
            Err(Error::CorruptedData(_))
        ));
        assert!(matches!(
            FreqTable::from_pairs(&[(b'a', u64::MAX), (b'b', 1)]),
            Err(Error::CorruptedData(_))
        ));
    }
}
