//! Normalization of a bundle hash into the per-segment values that select
//! how far along each hash chain the signer reveals.
//!
//! Each tryte of the 81-tryte bundle hash yields one value in `[-13, 13]`,
//! and each run of 27 values drives one key fragment. A fragment signs value
//! `v` by hashing a key segment `13 - v` times; a verifier finishes the chain
//! with `13 + v` more steps. Each chunk is balanced so that its values sum to
//! zero: raising one value lowers another, so a forger who wants to advance
//! any chain must move some other chain backwards, which requires inverting
//! the hash.
use crate::common::{
    Hash, SecurityLevel, HASH_LENGTH, HASH_TRYTES_LENGTH, NORMALIZED_FRAGMENT_LENGTH,
};
use crate::errors::Error;
use crate::trinary::{tryte_value, Trit, MAX_TRYTE_VALUE, MIN_TRYTE_VALUE, TRITS_PER_TRYTE};

/// Balancing policy applied to every 27-value chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Shift the chunk until its values sum to zero: while the sum is positive
    /// the first value above -13 is decremented, while it is negative the first
    /// value below 13 is incremented. A value of 13 may remain; the segment it
    /// selects is then revealed without hashing. This is the policy of deployed
    /// ternary wallets and the one reference signatures are built with.
    ZeroSum,
    /// `ZeroSum` followed by the removal of every 13: the value is decremented
    /// and the first value below 12 in the chunk incremented, keeping the sum at
    /// zero. Every value then lies in `[-13, 12]`, so every revealed segment is
    /// hashed at least once. Signatures made under this policy only verify under
    /// this policy.
    NoMaxValue,
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::ZeroSum
    }
}

/// Normalized bundle hash: 81 values in `[-13, 13]`, three chunks of 27.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedBundleHash([i8; HASH_TRYTES_LENGTH]);

impl NormalizedBundleHash {
    /// Normalize `hash` with the default `ZeroSum` policy.
    pub fn new(hash: &Hash) -> Self {
        Self::with_policy(hash, Normalization::default())
    }

    /// Normalize `hash` with the given policy.
    pub fn with_policy(hash: &Hash, policy: Normalization) -> Self {
        let mut values = [0i8; HASH_TRYTES_LENGTH];
        for (v, tryte) in values.iter_mut().zip(hash.0.chunks_exact(TRITS_PER_TRYTE)) {
            *v = tryte_value(&[tryte[0], tryte[1], tryte[2]]);
        }

        for chunk in values.chunks_exact_mut(NORMALIZED_FRAGMENT_LENGTH) {
            balance_zero_sum(chunk);
            if policy == Normalization::NoMaxValue {
                clear_max_values(chunk);
            }
        }
        Self(values)
    }

    /// All 81 values.
    pub fn as_values(&self) -> &[i8] {
        &self.0
    }

    /// The 27 values driving key fragment `index`, or `None` past the third.
    pub fn fragment(&self, index: usize) -> Option<&[i8]> {
        self.0.chunks_exact(NORMALIZED_FRAGMENT_LENGTH).nth(index)
    }

    /// Iterate over the three 27-value chunks.
    pub fn fragments(&self) -> std::slice::ChunksExact<'_, i8> {
        self.0.chunks_exact(NORMALIZED_FRAGMENT_LENGTH)
    }

    /// Whether signing at `level` would reveal no key segment unhashed, i.e. no
    /// used chunk contains 13. Bundle builders tweak and re-hash the bundle until
    /// this holds.
    pub fn is_secure(&self, level: SecurityLevel) -> bool {
        !self.0[..level.normalized_length()].contains(&MAX_TRYTE_VALUE)
    }
}

fn balance_zero_sum(chunk: &mut [i8]) {
    let mut sum: i32 = chunk.iter().map(|&v| i32::from(v)).sum();
    while sum > 0 {
        match chunk.iter_mut().find(|v| **v > MIN_TRYTE_VALUE) {
            Some(v) => *v -= 1,
            None => break,
        }
        sum -= 1;
    }
    while sum < 0 {
        match chunk.iter_mut().find(|v| **v < MAX_TRYTE_VALUE) {
            Some(v) => *v += 1,
            None => break,
        }
        sum += 1;
    }
}

fn clear_max_values(chunk: &mut [i8]) {
    while let Some(i) = chunk.iter().position(|&v| v == MAX_TRYTE_VALUE) {
        // after zero-sum balancing a chunk holding 13 always holds a negative value
        match chunk.iter().position(|&v| v < MAX_TRYTE_VALUE - 1) {
            Some(j) => {
                chunk[i] -= 1;
                chunk[j] += 1;
            }
            None => break,
        }
    }
}

/// Normalizes a 243-trit bundle hash with the `ZeroSum` policy.
///
/// # Errors
/// The function fails if
/// * `hash.len()` is not `HASH_LENGTH`
/// * `hash` holds a value outside `{-1, 0, 1}`
pub fn normalized_bundle_hash(hash: &[Trit]) -> Result<NormalizedBundleHash, Error> {
    if hash.len() != HASH_LENGTH {
        return Err(Error::InvalidLength(hash.len()));
    }
    Ok(NormalizedBundleHash::new(&Hash::from_trits(hash)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    const BUNDLE_HASH: &str =
        "VAJOHANFEOTRSIPCLG9MIPENDFPLQQUGSBLBHMKZ9XVCUSWIKJOOHSPWJAXVLPTAKMPURYAYD9ONODVOW";

    const NORMALIZED: [i8; 81] = [
        8, 1, 10, -12, 8, 1, -13, 6, 5, -12, -7, -9, -8, 9, -11, 3, 12, 7, 0, 13, 9, -11, 5, -13,
        4, 6, -11, -3, -10, -10, -6, 7, -8, 2, 12, 2, 8, 13, 11, -1, 0, -3, -5, 3, -6, -8, -4, 9,
        11, 10, -12, -12, 8, -8, 13, 13, 13, 13, 13, -5, 12, -11, -7, 1, 11, 13, -11, -6, -9, -2,
        1, -2, 4, 0, -12, -13, -12, 4, -5, -12, -4,
    ];

    #[derive(Clone, Debug)]
    struct ArbHash(Hash);

    impl Arbitrary for ArbHash {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut trits = [0; HASH_LENGTH];
            for t in trits.iter_mut() {
                *t = *g.choose(&[-1, 0, 1]).unwrap();
            }
            ArbHash(Hash(trits))
        }
    }

    #[test]
    fn reference_normalization() {
        let hash = Hash::from_trytes(BUNDLE_HASH).unwrap();
        let normalized = NormalizedBundleHash::new(&hash);
        assert_eq!(normalized.as_values(), &NORMALIZED[..]);
        assert_eq!(normalized.fragment(1), Some(&NORMALIZED[27..54]));
        assert_eq!(normalized.fragment(3), None);

        // the first chunk already holds a 13, so no level is safe to sign
        for level in SecurityLevel::ALL.iter() {
            assert!(!normalized.is_secure(*level));
        }
    }

    #[test]
    fn strict_policy_on_reference_hash() {
        let hash = Hash::from_trytes(BUNDLE_HASH).unwrap();
        let strict = NormalizedBundleHash::with_policy(&hash, Normalization::NoMaxValue);
        assert!(strict.is_secure(SecurityLevel::High));
        // the first chunk holds one 13 at position 19, lowered to 12, and the
        // first value below 12 (position 0) absorbs the difference
        assert_eq!(strict.as_values()[0], NORMALIZED[0] + 1);
        assert_eq!(strict.as_values()[19], 12);
    }

    #[test]
    fn raw_trits_entry_point() {
        let hash = Hash::from_trytes(BUNDLE_HASH).unwrap();
        assert_eq!(
            normalized_bundle_hash(hash.as_trits()).unwrap(),
            NormalizedBundleHash::new(&hash)
        );
        assert_eq!(
            normalized_bundle_hash(&[0; 81]).unwrap_err(),
            Error::InvalidLength(81)
        );
    }

    #[test]
    fn extreme_chunks() {
        // all 13: sum 351, lowered from the front
        let hash = Hash([1; HASH_LENGTH]);
        for chunk in NormalizedBundleHash::new(&hash).fragments() {
            assert_eq!(chunk.iter().map(|&v| i32::from(v)).sum::<i32>(), 0);
        }
        let hash = Hash([-1; HASH_LENGTH]);
        for chunk in NormalizedBundleHash::with_policy(&hash, Normalization::NoMaxValue).fragments()
        {
            assert_eq!(chunk.iter().map(|&v| i32::from(v)).sum::<i32>(), 0);
            assert!(!chunk.contains(&13));
        }
    }

    #[quickcheck]
    fn chunks_sum_to_zero(hash: ArbHash) -> bool {
        NormalizedBundleHash::new(&hash.0).fragments().all(|chunk| {
            chunk.iter().map(|&v| i32::from(v)).sum::<i32>() == 0
                && chunk.iter().all(|v| (MIN_TRYTE_VALUE..=MAX_TRYTE_VALUE).contains(v))
        })
    }

    #[quickcheck]
    fn strict_values_stay_below_max(hash: ArbHash) -> bool {
        NormalizedBundleHash::with_policy(&hash.0, Normalization::NoMaxValue)
            .fragments()
            .all(|chunk| {
                chunk.iter().map(|&v| i32::from(v)).sum::<i32>() == 0
                    && chunk.iter().all(|v| (MIN_TRYTE_VALUE..MAX_TRYTE_VALUE).contains(v))
            })
    }
}
