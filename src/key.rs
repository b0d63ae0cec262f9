//! Key derivation: seed to subseed, subseed to private key, private key to
//! digests and digests to address.
//!
//! A private key is one-time: signing two different bundle hashes with the same
//! key reveals enough chain elements to forge signatures on other messages.
//! Nothing in this crate remembers past signatures, so the only protection is
//! the ownership model: `PrivateKey::sign` consumes the key, and the key cannot
//! be cloned unless the `sk_clone_enabled` feature is set.
use crate::common::{
    Address, Hash, SecurityLevel, HASH_LENGTH, KEY_FRAGMENT_LENGTH, KEY_SEGMENT_HASH_ROUNDS,
};
use crate::errors::Error;
use crate::traits::Sponge;
use crate::trinary::{add_trits, unsigned_to_trits, validate_trits, Trit};
use rand_core::{CryptoRng, RngCore};
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

secret_trit_buffer!(
    Seed,
    HASH_LENGTH,
    "Root secret (81 trytes) from which every one-time key of a wallet is derived."
);

secret_trit_buffer!(
    Subseed,
    HASH_LENGTH,
    "Per-index secret derived from a `Seed`; the input of private key expansion."
);

secret_trit_buffer!(
    KeyFragment,
    KEY_FRAGMENT_LENGTH,
    "One independently hashed part of a private key: 27 segments of 243 trits."
);

impl Seed {
    /// Draw a uniformly random seed from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0; HASH_LENGTH];
        let mut filled = 0;
        let mut bytes = Zeroizing::new([0u8; 64]);
        while filled < HASH_LENGTH {
            rng.fill_bytes(&mut bytes[..]);
            // rejection sampling keeps every trit uniform: 243 = 3^5
            for &b in bytes.iter().filter(|&&b| b < 243) {
                if filled == HASH_LENGTH {
                    break;
                }
                seed[filled] = (b % 3) as Trit - 1;
                filled += 1;
            }
        }
        let out = Seed(seed);
        seed.zeroize();
        out
    }

    /// Derive the subseed at `index`: the index is added to the seed in balanced
    /// ternary (wrapping around on overflow) and the sum is hashed.
    pub fn subseed<S: Sponge>(&self, index: u64) -> Result<Subseed, Error> {
        trace!(index, "deriving subseed");
        let incremented = Zeroizing::new(add_trits(&self.0, &unsigned_to_trits(index)));

        let mut sponge = S::default();
        sponge.absorb(&incremented)?;
        let mut subseed = Subseed([0; HASH_LENGTH]);
        sponge.squeeze_into(&mut subseed.0)?;
        Ok(subseed)
    }
}

impl Subseed {
    /// Expand the subseed into a private key of `level.fragments()` fragments. The
    /// subseed is absorbed once and the key is squeezed block after block.
    pub fn key<S: Sponge>(&self, level: SecurityLevel) -> Result<PrivateKey, Error> {
        trace!(?level, "expanding private key");
        let mut sponge = S::default();
        sponge.absorb(&self.0)?;

        let mut fragments = Vec::with_capacity(level.fragments());
        for _ in 0..level.fragments() {
            let mut fragment = KeyFragment([0; KEY_FRAGMENT_LENGTH]);
            sponge.squeeze_into(&mut fragment.0)?;
            fragments.push(fragment);
        }
        Ok(PrivateKey { level, fragments })
    }
}

impl KeyFragment {
    /// Digest of the fragment: every segment is hashed `KEY_SEGMENT_HASH_ROUNDS`
    /// times, and the resulting 27 chain ends are hashed together.
    pub fn digest<S: Sponge>(&self) -> Result<Hash, Error> {
        let mut chain_ends = Zeroizing::new(self.0);
        chain_segments::<S, _>(&mut chain_ends[..], |_| KEY_SEGMENT_HASH_ROUNDS)?;
        S::digest(&chain_ends[..])
    }
}

/// Advance every 243-trit segment of `fragment` along its hash chain, by
/// `rounds(i)` steps for segment `i`.
pub(crate) fn chain_segments<S, F>(fragment: &mut [Trit], rounds: F) -> Result<(), Error>
where
    S: Sponge,
    F: Fn(usize) -> usize,
{
    let mut sponge = S::default();
    for (i, segment) in fragment.chunks_exact_mut(HASH_LENGTH).enumerate() {
        sponge.transform(segment, rounds(i))?;
    }
    Ok(())
}

/// One-time private key: `security_level.fragments()` key fragments. Each
/// fragment wipes itself when the key is dropped.
#[derive(Zeroize)]
#[cfg_attr(feature = "sk_clone_enabled", derive(Clone))]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub(crate) level: SecurityLevel,
    pub(crate) fragments: Vec<KeyFragment>,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("level", &self.level)
            .finish()
    }
}

impl PrivateKey {
    /// Convert a trit slice into a private key. The security level is implied by
    /// the number of fragments.
    ///
    /// # Errors
    /// The function fails if
    /// * `trits.len()` is not a non-zero multiple of `KEY_FRAGMENT_LENGTH`
    /// * the slice holds more fragments than `MAX_SECURITY_LEVEL`
    /// * `trits` holds a value outside `{-1, 0, 1}`
    pub fn from_trits(trits: &[Trit]) -> Result<Self, Error> {
        if trits.is_empty() || trits.len() % KEY_FRAGMENT_LENGTH != 0 {
            return Err(Error::InvalidLength(trits.len()));
        }
        let level = SecurityLevel::from_fragments(trits.len() / KEY_FRAGMENT_LENGTH)?;
        let fragments = trits
            .chunks_exact(KEY_FRAGMENT_LENGTH)
            .map(KeyFragment::from_trits)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { level, fragments })
    }

    /// Security level of the key.
    pub fn security_level(&self) -> SecurityLevel {
        self.level
    }

    /// Key fragments, in order.
    pub fn fragments(&self) -> &[KeyFragment] {
        &self.fragments
    }

    /// Concatenation of all fragments, as trits.
    pub fn to_trits(&self) -> Zeroizing<Vec<Trit>> {
        let mut out = Zeroizing::new(Vec::with_capacity(self.level.key_length()));
        for fragment in self.fragments.iter() {
            out.extend_from_slice(fragment.as_trits());
        }
        out
    }

    /// One digest per fragment.
    pub fn digests<S: Sponge>(&self) -> Result<Digests, Error> {
        let digests = self
            .fragments
            .iter()
            .map(KeyFragment::digest::<S>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Digests(digests))
    }

    /// Address of the key.
    pub fn address<S: Sponge>(&self) -> Result<Address, Error> {
        self.digests::<S>()?.address::<S>()
    }
}

/// Digests of all fragments of a private key, in fragment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digests(pub(crate) Vec<Hash>);

impl Digests {
    /// Convert concatenated digests into `Self`.
    ///
    /// # Errors
    /// The function fails if
    /// * `trits.len()` is not a non-zero multiple of `HASH_LENGTH`
    /// * `trits` holds a value outside `{-1, 0, 1}`
    pub fn from_trits(trits: &[Trit]) -> Result<Self, Error> {
        if trits.is_empty() || trits.len() % HASH_LENGTH != 0 {
            return Err(Error::InvalidLength(trits.len()));
        }
        let digests = trits
            .chunks_exact(HASH_LENGTH)
            .map(Hash::from_trits)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(digests))
    }

    /// Individual digests.
    pub fn as_hashes(&self) -> &[Hash] {
        &self.0
    }

    /// Concatenated digests.
    pub fn to_trits(&self) -> Vec<Trit> {
        self.0.iter().flat_map(|d| d.as_trits().iter().copied()).collect()
    }

    /// Address committed to by these digests: the hash of their concatenation.
    pub fn address<S: Sponge>(&self) -> Result<Address, Error> {
        Ok(S::digest(&self.to_trits())?.into())
    }
}

/// Derives the subseed at `index` from a 243-trit seed.
///
/// # Errors
/// The function fails if
/// * `seed.len()` is not `HASH_LENGTH`
/// * `seed` holds a value outside `{-1, 0, 1}`
pub fn subseed<S: Sponge>(seed: &[Trit], index: u64) -> Result<Subseed, Error> {
    Seed::from_trits(seed)?.subseed::<S>(index)
}

/// Expands a 243-trit subseed into a private key of the given level.
///
/// # Errors
/// The function fails if
/// * `subseed.len()` is not `HASH_LENGTH`
/// * `subseed` holds a value outside `{-1, 0, 1}`
pub fn key<S: Sponge>(subseed: &[Trit], level: SecurityLevel) -> Result<PrivateKey, Error> {
    Subseed::from_trits(subseed)?.key::<S>(level)
}

/// Computes one digest per key fragment of a private key given as trits. Any
/// non-zero number of fragments is accepted.
///
/// # Errors
/// The function fails if
/// * `key.len()` is not a non-zero multiple of `KEY_FRAGMENT_LENGTH`
/// * `key` holds a value outside `{-1, 0, 1}`
pub fn digests<S: Sponge>(key: &[Trit]) -> Result<Digests, Error> {
    if key.is_empty() || key.len() % KEY_FRAGMENT_LENGTH != 0 {
        return Err(Error::InvalidLength(key.len()));
    }
    validate_trits(key)?;
    let digests = key
        .chunks_exact(KEY_FRAGMENT_LENGTH)
        .map(|trits| KeyFragment::from_trits(trits)?.digest::<S>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Digests(digests))
}

/// Computes the address from concatenated digests.
///
/// # Errors
/// The function fails if
/// * `digests.len()` is not a non-zero multiple of `HASH_LENGTH`
/// * `digests` holds a value outside `{-1, 0, 1}`
pub fn address<S: Sponge>(digests: &[Trit]) -> Result<Address, Error> {
    Digests::from_trits(digests)?.address::<S>()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kerl::Kerl;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[derive(Clone, Debug)]
    struct SeedTrits([Trit; HASH_LENGTH]);

    impl Arbitrary for SeedTrits {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut trits = [0; HASH_LENGTH];
            for t in trits.iter_mut() {
                *t = *g.choose(&[-1, 0, 1]).unwrap();
            }
            SeedTrits(trits)
        }
    }

    fn seed() -> Seed {
        Seed::generate(&mut ChaCha20Rng::from_seed([7u8; 32]))
    }

    #[test]
    fn generated_seed_is_valid() {
        let seed = seed();
        assert!(validate_trits(seed.as_trits()).is_ok());
        assert_eq!(seed.to_trytes().len(), 81);
        assert_ne!(seed.to_trytes(), Seed::generate(&mut ChaCha20Rng::from_seed([8u8; 32])).to_trytes());
    }

    #[test]
    fn subseed_is_deterministic() {
        let seed = seed();
        let a = seed.subseed::<Kerl>(5).unwrap();
        let b = subseed::<Kerl>(seed.as_trits(), 5).unwrap();
        assert_eq!(a.as_trits(), b.as_trits());
    }

    #[test]
    fn subseeds_are_independent() {
        let seed = seed();
        let subseeds: Vec<String> = (0..16)
            .map(|i| seed.subseed::<Kerl>(i).unwrap().to_trytes())
            .collect();
        for (i, a) in subseeds.iter().enumerate() {
            for b in subseeds[i + 1..].iter() {
                assert_ne!(a, b);
            }
        }
    }

    #[quickcheck]
    fn subseeds_differ_across_indices(seed: SeedTrits, i: u64, j: u64) -> bool {
        let seed = Seed(seed.0);
        i == j
            || seed.subseed::<Kerl>(i).unwrap().as_trits()
                != seed.subseed::<Kerl>(j).unwrap().as_trits()
    }

    #[quickcheck]
    fn subseeds_differ_across_seeds(a: SeedTrits, b: SeedTrits, index: u64) -> bool {
        a.0[..HASH_LENGTH - 1] == b.0[..HASH_LENGTH - 1]
            || Seed(a.0).subseed::<Kerl>(index).unwrap().as_trits()
                != Seed(b.0).subseed::<Kerl>(index).unwrap().as_trits()
    }

    #[test]
    fn subseed_wraps_at_the_top_index() {
        let max = Seed::from_trits(&[1; HASH_LENGTH]).unwrap();
        assert!(max.subseed::<Kerl>(u64::MAX).is_ok());
    }

    #[test]
    fn invalid_seeds() {
        assert_eq!(
            subseed::<Kerl>(&[0; 242], 0).unwrap_err(),
            Error::InvalidLength(242)
        );
        let mut trits = [0; HASH_LENGTH];
        trits[17] = -2;
        assert_eq!(
            subseed::<Kerl>(&trits, 0).unwrap_err(),
            Error::InvalidTrit(17, -2)
        );
    }

    #[test]
    fn key_lengths() {
        let subseed = seed().subseed::<Kerl>(0).unwrap();
        for &level in SecurityLevel::ALL.iter() {
            let key = subseed.key::<Kerl>(level).unwrap();
            assert_eq!(key.security_level(), level);
            assert_eq!(key.to_trits().len(), level.fragments() * KEY_FRAGMENT_LENGTH);

            let digests = key.digests::<Kerl>().unwrap();
            assert_eq!(digests.to_trits().len(), level.digests_length());
            assert_eq!(digests.address::<Kerl>().unwrap().as_trits().len(), HASH_LENGTH);
        }
    }

    #[test]
    fn key_prefix_is_shared_across_levels() {
        // the squeeze stream does not depend on how much of it is read
        let subseed = seed().subseed::<Kerl>(3).unwrap();
        let low = subseed.key::<Kerl>(SecurityLevel::Low).unwrap();
        let high = subseed.key::<Kerl>(SecurityLevel::High).unwrap();
        assert_eq!(low.fragments()[0].as_trits(), high.fragments()[0].as_trits());
        assert_ne!(high.fragments()[0].as_trits(), high.fragments()[1].as_trits());
    }

    #[test]
    fn raw_and_typed_apis_agree() {
        let subseed = seed().subseed::<Kerl>(1).unwrap();
        let key = subseed.key::<Kerl>(SecurityLevel::Medium).unwrap();
        let raw_digests = digests::<Kerl>(&key.to_trits()).unwrap();
        assert_eq!(raw_digests, key.digests::<Kerl>().unwrap());
        assert_eq!(
            address::<Kerl>(&raw_digests.to_trits()).unwrap(),
            key.address::<Kerl>().unwrap()
        );

        let parsed = PrivateKey::from_trits(&key.to_trits()).unwrap();
        assert_eq!(parsed.security_level(), SecurityLevel::Medium);
    }

    #[test]
    fn invalid_lengths() {
        assert_eq!(
            digests::<Kerl>(&vec![0; KEY_FRAGMENT_LENGTH + 1]).unwrap_err(),
            Error::InvalidLength(KEY_FRAGMENT_LENGTH + 1)
        );
        assert_eq!(digests::<Kerl>(&[]).unwrap_err(), Error::InvalidLength(0));
        assert_eq!(address::<Kerl>(&[0; 244]).unwrap_err(), Error::InvalidLength(244));
        assert_eq!(
            PrivateKey::from_trits(&vec![0; 4 * KEY_FRAGMENT_LENGTH]).unwrap_err(),
            Error::InvalidSecurityLevel(4)
        );
        assert_eq!(
            key::<Kerl>(&[0; 81], SecurityLevel::Low).unwrap_err(),
            Error::InvalidLength(81)
        );
    }

    #[test]
    fn secrets_are_not_printed() {
        let seed = seed();
        assert_eq!(format!("{:?}", seed), "Seed(..)");
        let key = seed.subseed::<Kerl>(0).unwrap().key::<Kerl>(SecurityLevel::Low).unwrap();
        assert_eq!(format!("{:?}", key), "PrivateKey { level: Low }");
    }
}
