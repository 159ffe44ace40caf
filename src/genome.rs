//! Bit-level genome representation.
//!
//! A [`Genome`] is the full weight and bias set of a network, stored as the
//! raw IEEE-754 bit pattern of each `f64` in a fixed word order. Genetic
//! operators only ever see the `u64` words, so a single bit flip in the
//! genome is a single bit flip in the float (which may well produce NaN,
//! infinities or denormals).
//!
//! Bits are addressed word-major, least significant bit first: bit `i`
//! lives in word `i / 64` at position `i % 64`.

/// Number of bits in one genome word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// An ordered sequence of 64-bit words, one per weight or bias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    words: Vec<u64>,
}

impl Genome {
    /// Wraps raw words.
    pub fn from_words(words: Vec<u64>) -> Self {
        Self { words }
    }

    /// Bit-casts each value into a word.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            words: values.iter().map(|v| v.to_bits()).collect(),
        }
    }

    /// A genome of `len` words, all zero bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0; len],
        }
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn into_words(self) -> Vec<u64> {
        self.words
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total number of addressable bits.
    pub fn bit_len(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// The word at `index` reinterpreted as an `f64`.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.words.get(index).map(|&w| f64::from_bits(w))
    }

    /// Iterates over all words as `f64`s.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.words.iter().map(|&w| f64::from_bits(w))
    }

    /// Reads bit `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.bit_len()`.
    pub fn bit(&self, index: usize) -> bool {
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Flips bit `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.bit_len()`.
    pub fn flip_bit(&mut self, index: usize) {
        self.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
    }

    /// Overwrites bits `offset..` with the same bits from `donor`.
    ///
    /// The partial word containing `offset` is merged bit-wise; every later
    /// word is copied whole.
    ///
    /// # Panics
    /// Panics if the genomes differ in length or `offset` is out of range.
    pub fn splice_from(&mut self, donor: &Genome, offset: usize) {
        assert_eq!(self.len(), donor.len(), "genomes must have equal length");
        assert!(offset < self.bit_len(), "splice offset out of range");

        let first = offset / WORD_BITS;
        let shift = offset % WORD_BITS;
        // Bits at or above `shift` come from the donor.
        let keep_mask = if shift == 0 { 0 } else { u64::MAX >> (WORD_BITS - shift) };
        self.words[first] = (self.words[first] & keep_mask) | (donor.words[first] & !keep_mask);
        self.words[first + 1..].copy_from_slice(&donor.words[first + 1..]);
    }

    /// Number of positions where adjacent bits differ.
    pub fn transitions(&self) -> usize {
        (1..self.bit_len())
            .filter(|&i| self.bit(i) != self.bit(i - 1))
            .count()
    }
}

impl From<Vec<u64>> for Genome {
    fn from(words: Vec<u64>) -> Self {
        Self::from_words(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_values_are_bit_cast() {
        let g = Genome::from_values(&[1.0, -0.5]);
        assert_eq!(g.words()[0], 1.0f64.to_bits());
        assert_eq!(g.value(1), Some(-0.5));
        assert_eq!(g.value(2), None);
    }

    #[test]
    fn test_bit_addressing() {
        let mut g = Genome::zeroed(2);
        g.flip_bit(0);
        g.flip_bit(64 + 63);
        assert_eq!(g.words(), &[1, 1 << 63]);
        assert!(g.bit(0));
        assert!(!g.bit(1));
        assert!(g.bit(127));
    }

    #[test]
    fn test_flip_sign_bit() {
        let mut g = Genome::from_values(&[2.0]);
        g.flip_bit(63);
        assert_eq!(g.value(0), Some(-2.0));
    }

    #[test]
    fn test_flip_can_produce_nan() {
        // All exponent bits set plus a mantissa bit is NaN.
        let mut g = Genome::from_values(&[f64::INFINITY]);
        g.flip_bit(0);
        assert!(g.value(0).is_some_and(f64::is_nan));
    }

    #[test]
    fn test_splice_mid_word() {
        let mut child = Genome::from_words(vec![u64::MAX, u64::MAX]);
        let donor = Genome::zeroed(2);
        child.splice_from(&donor, 4);
        assert_eq!(child.words(), &[0b1111, 0]);
    }

    #[test]
    fn test_splice_on_word_boundary() {
        let mut child = Genome::zeroed(3);
        let donor = Genome::from_words(vec![u64::MAX; 3]);
        child.splice_from(&donor, 64);
        assert_eq!(child.words(), &[0, u64::MAX, u64::MAX]);
    }

    #[test]
    fn test_splice_at_zero_copies_donor() {
        let mut child = Genome::from_words(vec![7, 8]);
        let donor = Genome::from_words(vec![1, 2]);
        child.splice_from(&donor, 0);
        assert_eq!(child, donor);
    }

    #[test]
    fn test_transitions() {
        assert_eq!(Genome::zeroed(2).transitions(), 0);
        assert_eq!(Genome::from_words(vec![0b1100, 0]).transitions(), 2);
    }

    proptest! {
        #[test]
        fn prop_value_round_trip_is_bit_exact(words in proptest::collection::vec(any::<u64>(), 0..16)) {
            let g = Genome::from_words(words.clone());
            let values: Vec<f64> = g.values().collect();
            let back = Genome::from_values(&values);
            prop_assert_eq!(back.words(), &words[..]);
        }

        #[test]
        fn prop_splice_has_at_most_one_boundary(len in 1usize..6, offset_seed in any::<usize>()) {
            let mut child = Genome::from_words(vec![u64::MAX; len]);
            let donor = Genome::zeroed(len);
            let offset = offset_seed % child.bit_len();
            child.splice_from(&donor, offset);
            prop_assert!(child.transitions() <= 1);
            for i in 0..child.bit_len() {
                prop_assert_eq!(child.bit(i), i < offset);
            }
        }
    }
}
