//! Signing and verification of bundle hashes.
//!
//! Key fragment `k` signs the `k`-th chunk of the normalized bundle hash: its
//! segment `i` is advanced `13 - v` steps along its hash chain, where `v` is
//! the `i`-th value of the chunk. A verifier advances the signature segment the
//! remaining `13 + v` steps, which lands on the 26-step chain end committed to
//! by the fragment digest, then rebuilds the address from those digests.
use crate::common::{
    Address, Hash, SecurityLevel, HASH_LENGTH, KEY_FRAGMENT_LENGTH, NORMALIZED_FRAGMENT_LENGTH,
};
use crate::errors::Error;
use crate::key::{chain_segments, Digests, KeyFragment, PrivateKey};
use crate::normalize::{Normalization, NormalizedBundleHash};
use crate::traits::Sponge;
use crate::trinary::{Trit, MAX_TRYTE_VALUE, MIN_TRYTE_VALUE};
use std::convert::TryFrom;
use tracing::{debug, trace};
use zeroize::Zeroizing;

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

public_trit_buffer!(
    SignatureFragment,
    KEY_FRAGMENT_LENGTH,
    "Signature produced by one key fragment: 27 partially chained segments."
);

fn check_normalized(normalized: &[i8]) -> Result<(), Error> {
    if normalized.len() != NORMALIZED_FRAGMENT_LENGTH {
        return Err(Error::LengthMismatch(
            NORMALIZED_FRAGMENT_LENGTH,
            normalized.len(),
        ));
    }
    match normalized
        .iter()
        .position(|v| !(MIN_TRYTE_VALUE..=MAX_TRYTE_VALUE).contains(v))
    {
        Some(i) => Err(Error::InvalidTryteValue(i, normalized[i])),
        None => Ok(()),
    }
}

impl KeyFragment {
    /// Sign one 27-value chunk of a normalized bundle hash.
    ///
    /// # Errors
    /// The function fails if `normalized` does not hold exactly 27 values, or if a
    /// value lies outside `[-13, 13]`.
    pub fn sign<S: Sponge>(&self, normalized: &[i8]) -> Result<SignatureFragment, Error> {
        check_normalized(normalized)?;
        let mut segments = Zeroizing::new(self.0);
        chain_segments::<S, _>(&mut segments[..], |i| {
            (MAX_TRYTE_VALUE - normalized[i]) as usize
        })?;
        Ok(SignatureFragment(*segments))
    }
}

impl SignatureFragment {
    /// Whether the last trit of every segment is zero. Kerl never outputs
    /// anything else there and ignores that trit when absorbing, so a non-zero
    /// value can only come from tampering and would otherwise go unnoticed.
    pub fn is_canonical(&self) -> bool {
        self.0
            .chunks_exact(HASH_LENGTH)
            .all(|segment| segment[HASH_LENGTH - 1] == 0)
    }

    /// Recompute the digest of the key fragment that produced this signature,
    /// given the chunk it signed.
    ///
    /// # Errors
    /// The function fails if `normalized` does not hold exactly 27 values, or if a
    /// value lies outside `[-13, 13]`.
    pub fn digest<S: Sponge>(&self, normalized: &[i8]) -> Result<Hash, Error> {
        check_normalized(normalized)?;
        let mut chain_ends = self.0;
        chain_segments::<S, _>(&mut chain_ends[..], |i| {
            (MAX_TRYTE_VALUE + normalized[i]) as usize
        })?;
        S::digest(&chain_ends[..])
    }
}

/// Signs `normalized` (27 values) with a raw 6561-trit key fragment.
///
/// # Errors
/// The function fails if
/// * `normalized` does not hold 27 values, or `key_fragment` not 6561 trits
///   (`Error::LengthMismatch`)
/// * a normalized value lies outside `[-13, 13]`
/// * `key_fragment` holds a value outside `{-1, 0, 1}`
pub fn signature_fragment<S: Sponge>(
    normalized: &[i8],
    key_fragment: &[Trit],
) -> Result<SignatureFragment, Error> {
    check_normalized(normalized)?;
    if key_fragment.len() != KEY_FRAGMENT_LENGTH {
        return Err(Error::LengthMismatch(KEY_FRAGMENT_LENGTH, key_fragment.len()));
    }
    KeyFragment::from_trits(key_fragment)?.sign::<S>(normalized)
}

/// Recomputes a fragment digest from `normalized` (27 values) and a raw
/// 6561-trit signature fragment.
///
/// # Errors
/// Same conditions as [`signature_fragment`].
pub fn digest<S: Sponge>(normalized: &[i8], signature_fragment: &[Trit]) -> Result<Hash, Error> {
    check_normalized(normalized)?;
    if signature_fragment.len() != KEY_FRAGMENT_LENGTH {
        return Err(Error::LengthMismatch(
            KEY_FRAGMENT_LENGTH,
            signature_fragment.len(),
        ));
    }
    SignatureFragment::from_trits(signature_fragment)?.digest::<S>(normalized)
}

/// Checks `fragments` against `address` for `bundle_hash`, normalized with the
/// default `ZeroSum` policy. The scheme does not encode the security level, so
/// the caller states the one the address was derived with.
///
/// Returns `Ok(false)` for a well-formed but invalid signature, including one
/// with a non-zero trit at the end of any segment (see
/// [`SignatureFragment::is_canonical`]).
///
/// # Errors
/// Returns `Error::LengthMismatch` if `fragments.len()` differs from
/// `level.fragments()`.
pub fn validate_signatures<S: Sponge>(
    address: &Address,
    fragments: &[SignatureFragment],
    bundle_hash: &Hash,
    level: SecurityLevel,
) -> Result<bool, Error> {
    validate_signatures_with::<S>(
        address,
        fragments,
        bundle_hash,
        level,
        Normalization::default(),
    )
}

/// Same as [`validate_signatures`] with an explicit normalization policy, which
/// must be the one the signer used.
pub fn validate_signatures_with<S: Sponge>(
    address: &Address,
    fragments: &[SignatureFragment],
    bundle_hash: &Hash,
    level: SecurityLevel,
    policy: Normalization,
) -> Result<bool, Error> {
    if fragments.len() != level.fragments() {
        return Err(Error::LengthMismatch(level.fragments(), fragments.len()));
    }
    if let Some(i) = fragments.iter().position(|f| !f.is_canonical()) {
        debug!(fragment = i, "signature fragment has a non-zero segment padding trit");
        return Ok(false);
    }
    let normalized = NormalizedBundleHash::with_policy(bundle_hash, policy);

    let digests = fragments
        .iter()
        .zip(normalized.fragments())
        .map(|(fragment, chunk)| fragment.digest::<S>(chunk))
        .collect::<Result<Vec<_>, _>>()?;
    let candidate = Digests(digests).address::<S>()?;

    if &candidate != address {
        debug!(
            expected = %address,
            recovered = %candidate,
            "signature does not match address"
        );
        return Ok(false);
    }
    Ok(true)
}

/// Full signature of a bundle hash: one fragment per key fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde_enabled",
    serde(
        try_from = "Vec<SignatureFragment>",
        into = "Vec<SignatureFragment>"
    )
)]
pub struct Signature {
    level: SecurityLevel,
    fragments: Vec<SignatureFragment>,
}

impl Signature {
    /// Build a signature from its fragments. The security level is the number of
    /// fragments.
    ///
    /// # Errors
    /// Returns `Error::InvalidSecurityLevel` unless 1 to 3 fragments are given.
    pub fn from_fragments(fragments: Vec<SignatureFragment>) -> Result<Self, Error> {
        let level = SecurityLevel::from_fragments(fragments.len())?;
        Ok(Self { level, fragments })
    }

    /// Security level of the key that produced the signature.
    pub fn security_level(&self) -> SecurityLevel {
        self.level
    }

    /// Signature fragments, in key fragment order.
    pub fn fragments(&self) -> &[SignatureFragment] {
        &self.fragments
    }

    /// Verify the signature on `bundle_hash` against `address`, using the
    /// `ZeroSum` normalization.
    pub fn verify<S: Sponge>(&self, address: &Address, bundle_hash: &Hash) -> Result<bool, Error> {
        self.verify_with::<S>(address, bundle_hash, Normalization::default())
    }

    /// Verify with an explicit normalization policy.
    pub fn verify_with<S: Sponge>(
        &self,
        address: &Address,
        bundle_hash: &Hash,
        policy: Normalization,
    ) -> Result<bool, Error> {
        validate_signatures_with::<S>(address, &self.fragments, bundle_hash, self.level, policy)
    }
}

impl TryFrom<Vec<SignatureFragment>> for Signature {
    type Error = Error;

    fn try_from(fragments: Vec<SignatureFragment>) -> Result<Self, Self::Error> {
        Self::from_fragments(fragments)
    }
}

impl From<Signature> for Vec<SignatureFragment> {
    fn from(signature: Signature) -> Self {
        signature.fragments
    }
}

impl PrivateKey {
    /// Sign `bundle_hash` with the `ZeroSum` normalization. The key is consumed:
    /// a second signature with the same key leaks enough chain elements to
    /// forge others.
    pub fn sign<S: Sponge>(self, bundle_hash: &Hash) -> Result<Signature, Error> {
        self.sign_with::<S>(bundle_hash, Normalization::default())
    }

    /// Sign `bundle_hash` with an explicit normalization policy. With `ZeroSum`,
    /// check [`NormalizedBundleHash::is_secure`] first if unhashed segments
    /// must never be revealed.
    pub fn sign_with<S: Sponge>(
        self,
        bundle_hash: &Hash,
        policy: Normalization,
    ) -> Result<Signature, Error> {
        let normalized = NormalizedBundleHash::with_policy(bundle_hash, policy);
        if !normalized.is_secure(self.level) {
            trace!(level = ?self.level, "signing reveals an unhashed key segment");
        }
        let fragments = self
            .fragments
            .iter()
            .zip(normalized.fragments())
            .map(|(fragment, chunk)| fragment.sign::<S>(chunk))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Signature {
            level: self.level,
            fragments,
        })
    }
}
