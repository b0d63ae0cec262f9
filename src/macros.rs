//! Macros to build the fixed-width trit buffers of the scheme. Every buffer
//! checks its width and trit values once, when it is built from a slice or a
//! tryte string, so that the signing algorithms can work on plain arrays.

macro_rules! trit_buffer_common {
    ($name:ident, $len:expr) => {
        impl $name {
            /// Width of the buffer in trits.
            pub const LENGTH: usize = $len;

            /// Convert the slice of trits into `Self`.
            ///
            /// # Errors
            /// The function fails if
            /// * `trits.len()` is not `Self::LENGTH`
            /// * `trits` holds a value outside `{-1, 0, 1}`
            pub fn from_trits(trits: &[$crate::trinary::Trit]) -> Result<Self, $crate::errors::Error> {
                if trits.len() != Self::LENGTH {
                    return Err($crate::errors::Error::InvalidLength(trits.len()));
                }
                $crate::trinary::validate_trits(trits)?;

                let mut buffer = [0; $len];
                buffer.copy_from_slice(trits);
                Ok(Self(buffer))
            }

            /// Convert a tryte string into `Self`.
            ///
            /// # Errors
            /// The function fails if the string holds a character outside the tryte
            /// alphabet or does not decode to exactly `Self::LENGTH` trits.
            pub fn from_trytes(trytes: &str) -> Result<Self, $crate::errors::Error> {
                let trits = zeroize::Zeroizing::new($crate::trinary::trytes_to_trits(trytes)?);
                Self::from_trits(&trits)
            }

            /// Return `Self` as its trit representation.
            pub fn as_trits(&self) -> &[$crate::trinary::Trit] {
                &self.0
            }

            /// Encode `Self` as a tryte string.
            pub fn to_trytes(&self) -> String {
                self.0
                    .chunks_exact($crate::trinary::TRITS_PER_TRYTE)
                    .map(|c| {
                        $crate::trinary::tryte_value_to_char($crate::trinary::tryte_value(&[
                            c[0], c[1], c[2],
                        ]))
                    })
                    .collect()
            }
        }
    };
}

/// Buffer holding public data: comparable, hashable, printable as trytes.
macro_rules! public_trit_buffer {
    ($name:ident, $len:expr, $doc:expr) => {
        #[derive(Clone, PartialEq, Eq, Hash)]
        #[cfg_attr(
            feature = "serde_enabled",
            derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
        )]
        #[doc=$doc]
        pub struct $name(pub(crate) [$crate::trinary::Trit; $len]);

        trit_buffer_common!($name, $len);

        impl AsRef<[$crate::trinary::Trit]> for $name {
            fn as_ref(&self) -> &[$crate::trinary::Trit] {
                &self.0
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_trytes())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_trytes())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_trytes(s)
            }
        }
    };
}

/// Buffer holding secret material: wiped on drop, never printed, and only
/// cloneable with the `sk_clone_enabled` feature.
macro_rules! secret_trit_buffer {
    ($name:ident, $len:expr, $doc:expr) => {
        #[derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
        #[cfg_attr(feature = "sk_clone_enabled", derive(Clone))]
        #[doc=$doc]
        pub struct $name(pub(crate) [$crate::trinary::Trit; $len]);

        trit_buffer_common!($name, $len);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(..)", stringify!($name))
            }
        }
    };
}
