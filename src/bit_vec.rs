/// Growable bit string packed MSB-first into bytes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bits[index / 8] & (1 << (7 - index % 8)) != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).filter_map(move |i| self.get(i))
    }

    pub fn starts_with(&self, prefix: &BitVec) -> bool {
        prefix.len() <= self.len() && prefix.iter().zip(self.iter()).all(|(a, b)| a == b)
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bv = BitVec::new();
        for bit in iter {
            bv.push_bit(bit);
        }
        bv
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn packs_msb_first() {
        let bv: BitVec = [true, false, true].into_iter().collect();
        assert_eq!(bv.len(), 3);
        assert_eq!(bv.bits, vec![0b1010_0000]);
        assert_eq!(bv.iter().collect::<Vec<_>>(), vec![true, false, true]);
        assert_eq!(bv.get(3), None);
    }

    #[test]
    fn spans_bytes() {
        let bv: BitVec = std::iter::repeat(true).take(9).collect();
        assert_eq!(bv.bits, vec![0xff, 0x80]);
        assert_eq!(bv.len(), 9);
        assert_eq!(bv.get(8), Some(true));
    }

    #[test]
    fn prefix_test() {
        let long: BitVec = [false, true, true].into_iter().collect();
        let short: BitVec = [false, true].into_iter().collect();
        let other: BitVec = [true].into_iter().collect();
        assert!(long.starts_with(&short));
        assert!(long.starts_with(&BitVec::new()));
        assert!(!short.starts_with(&long));
        assert!(!long.starts_with(&other));
    }
}
