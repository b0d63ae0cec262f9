//! Structures and constants common to key derivation, signing and verification
use crate::errors::Error;
use std::convert::TryFrom;

#[cfg(feature = "serde_enabled")]
use serde::{Deserialize, Serialize};

/// Width of a hash, a subseed, a digest and an address, in trits.
pub const HASH_LENGTH: usize = 243;
/// Width of a hash in trytes.
pub const HASH_TRYTES_LENGTH: usize = HASH_LENGTH / 3;
/// Number of 243-trit segments in a key fragment.
pub const KEY_SEGMENTS_PER_FRAGMENT: usize = 27;
/// Width of a key fragment, and of a signature fragment, in trits.
pub const KEY_FRAGMENT_LENGTH: usize = KEY_SEGMENTS_PER_FRAGMENT * HASH_LENGTH;
/// Length of every hash chain: the number of times each key segment is hashed
/// to commit to it in the digest.
pub const KEY_SEGMENT_HASH_ROUNDS: usize = 26;
/// Number of normalized values consumed by one fragment.
pub const NORMALIZED_FRAGMENT_LENGTH: usize = KEY_SEGMENTS_PER_FRAGMENT;
/// Highest supported security level.
pub const MAX_SECURITY_LEVEL: usize = 3;

public_trit_buffer!(
    Hash,
    HASH_LENGTH,
    "A 243-trit hash value, such as a bundle hash or a fragment digest."
);

public_trit_buffer!(
    Address,
    HASH_LENGTH,
    "Public key of a one-time key pair. Signatures are valid iff they re-derive this value."
);

impl From<Hash> for Address {
    fn from(hash: Hash) -> Self {
        Address(hash.0)
    }
}

/// Security level of a key. It fixes how many independent key fragments a
/// private key holds, hence how many signature fragments a signature carries.
/// Higher levels raise forgery resistance at the cost of larger keys and
/// signatures.
///
/// | level  | fragments | segments per fragment | trits per segment |
/// |--------|-----------|-----------------------|-------------------|
/// | Low    | 1         | 27                    | 243               |
/// | Medium | 2         | 27                    | 243               |
/// | High   | 3         | 27                    | 243               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde_enabled", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_enabled", serde(try_from = "u8", into = "u8"))]
pub enum SecurityLevel {
    /// One key fragment.
    Low = 1,
    /// Two key fragments.
    Medium = 2,
    /// Three key fragments.
    High = 3,
}

impl SecurityLevel {
    /// All supported levels, in increasing order.
    pub const ALL: [SecurityLevel; MAX_SECURITY_LEVEL] =
        [SecurityLevel::Low, SecurityLevel::Medium, SecurityLevel::High];

    /// Returns the level with the given number of fragments.
    ///
    /// # Errors
    /// Returns `Error::InvalidSecurityLevel` unless `fragments` is 1, 2 or 3.
    pub fn from_fragments(fragments: usize) -> Result<Self, Error> {
        match fragments {
            1 => Ok(SecurityLevel::Low),
            2 => Ok(SecurityLevel::Medium),
            3 => Ok(SecurityLevel::High),
            _ => Err(Error::InvalidSecurityLevel(fragments)),
        }
    }

    /// Number of key fragments, which is also the number of digests and of
    /// signature fragments.
    pub const fn fragments(self) -> usize {
        self as usize
    }

    /// Number of segments in each fragment.
    pub const fn segments_per_fragment(self) -> usize {
        KEY_SEGMENTS_PER_FRAGMENT
    }

    /// Number of trits in each segment.
    pub const fn trits_per_segment(self) -> usize {
        HASH_LENGTH
    }

    /// Private key width in trits.
    pub const fn key_length(self) -> usize {
        self.fragments() * self.segments_per_fragment() * self.trits_per_segment()
    }

    /// Width of the concatenated digests in trits.
    pub const fn digests_length(self) -> usize {
        self.fragments() * HASH_LENGTH
    }

    /// Number of normalized bundle hash values used when signing.
    pub const fn normalized_length(self) -> usize {
        self.fragments() * NORMALIZED_FRAGMENT_LENGTH
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::from_fragments(usize::from(level))
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> u8 {
        level as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn policy_table() {
        assert_eq!(SecurityLevel::Low.key_length(), 6561);
        assert_eq!(SecurityLevel::Medium.key_length(), 2 * 6561);
        assert_eq!(SecurityLevel::High.digests_length(), 3 * 243);
        assert_eq!(SecurityLevel::High.normalized_length(), HASH_TRYTES_LENGTH);
        for level in SecurityLevel::ALL.iter() {
            assert_eq!(level.segments_per_fragment(), 27);
            assert_eq!(level.trits_per_segment(), 243);
        }
    }

    #[test]
    fn level_conversion() {
        assert_eq!(SecurityLevel::try_from(2u8), Ok(SecurityLevel::Medium));
        assert_eq!(SecurityLevel::try_from(0u8), Err(Error::InvalidSecurityLevel(0)));
        assert_eq!(SecurityLevel::try_from(4u8), Err(Error::InvalidSecurityLevel(4)));
        assert_eq!(u8::from(SecurityLevel::High), 3);
    }

    #[test]
    fn hash_from_trytes() {
        let trytes = "CLAAFXEY9AHHCSZCXNKDRZEJHIAFVKYORWNOZAGFPAZYNTSLCXUAG9WBSXBRXYEDPVPLXYVDCBCEKRUBD";
        let address: Address = trytes.parse().unwrap();
        assert_eq!(address.to_string(), trytes);
        assert_eq!(address.as_trits().len(), HASH_LENGTH);

        assert_eq!(Hash::from_trytes("ABC"), Err(Error::InvalidLength(9)));
        assert_eq!(Hash::from_trits(&[2; HASH_LENGTH]), Err(Error::InvalidTrit(0, 2)));
    }
}
