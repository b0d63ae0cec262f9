//! A Winternitz one-time signature implementation over balanced ternary,
//! using the Kerl sponge (Keccak-384 with a trit/byte mapping).
//!
//! A caller-held seed derives one subseed per index; each subseed expands into
//! a private key of one to three fragments, whose 26-step hash chains commit
//! to an address. Signing a bundle hash reveals each chain at a depth selected
//! by the normalized hash, and verification finishes the chains to rebuild the
//! address.
//!
//! # Misuse hazard
//! Every private key must sign at most one bundle hash. Two signatures with
//! the same key reveal chain elements at two depths, which is enough to forge
//! signatures on other hashes. This crate keeps no record of past signatures;
//! [`PrivateKey::sign`] consumes the key, and the key is not `Clone` unless the
//! `sk_clone_enabled` feature is set.
//!
//! # Example
//! ```
//! use wots_kerl::{Hash, Kerl, SecurityLevel, Seed};
//!
//! let seed = Seed::from_trytes(
//!     "ZLNM9UHJWKTTDEZOTH9CXDEIFUJQCIACDPJIXPOWBDW9LTBHC9AQRIXTIHYLIIURLZCXNSTGNIVC9ISVB",
//! )
//! .unwrap();
//! let key = seed
//!     .subseed::<Kerl>(0)
//!     .unwrap()
//!     .key::<Kerl>(SecurityLevel::Medium)
//!     .unwrap();
//! let address = key.address::<Kerl>().unwrap();
//!
//! let bundle_hash = Hash::from_trytes(
//!     "VAJOHANFEOTRSIPCLG9MIPENDFPLQQUGSBLBHMKZ9XVCUSWIKJOOHSPWJAXVLPTAKMPURYAYD9ONODVOW",
//! )
//! .unwrap();
//! let signature = key.sign::<Kerl>(&bundle_hash).unwrap();
//! assert!(signature.verify::<Kerl>(&address, &bundle_hash).unwrap());
//! ```
#![warn(missing_docs, rust_2018_idioms)]

#[macro_use]
mod macros;
pub mod common;
pub mod errors;
pub mod kerl;
pub mod key;
pub mod normalize;
pub mod signature;
pub mod traits;
pub mod trinary;

pub use crate::common::{Address, Hash, SecurityLevel};
pub use crate::errors::Error;
pub use crate::kerl::Kerl;
pub use crate::key::{Digests, KeyFragment, PrivateKey, Seed, Subseed};
pub use crate::normalize::{Normalization, NormalizedBundleHash};
pub use crate::signature::{Signature, SignatureFragment};
pub use crate::traits::Sponge;
