//! Traits that define the sponge primitive used by the signature scheme
use crate::common::{Hash, HASH_LENGTH};
use crate::errors::Error;
use crate::trinary::Trit;

/// Trait that defines a ternary sponge function. The scheme uses the sponge as
/// a keyed pseudorandom function, as the step function of its hash chains and
/// as a compressor, always on a freshly created or reset instance. An instance
/// carries mutable state, so it must never be shared between independent
/// derivations; every operation of this crate builds its own.
///
/// # Example
/// ```
/// use wots_kerl::kerl::Kerl;
/// use wots_kerl::traits::Sponge;
///
/// let mut kerl = Kerl::default();
/// kerl.absorb(&[0; 243]).unwrap();
/// let first = kerl.squeeze(243).unwrap();
/// let second = kerl.squeeze(243).unwrap();
///
/// // Successive squeezes keep evolving the state
/// assert_ne!(first, second);
/// ```
pub trait Sponge: Default {
    /// Absorb `input` into the state. `input.len()` must be a non-zero multiple of
    /// `HASH_LENGTH`.
    fn absorb(&mut self, input: &[Trit]) -> Result<(), Error>;
    /// Fill `output` with squeezed trits. `output.len()` must be a non-zero multiple
    /// of `HASH_LENGTH`.
    fn squeeze_into(&mut self, output: &mut [Trit]) -> Result<(), Error>;
    /// Return the sponge to its initial state.
    fn reset(&mut self);

    /// Squeeze `length` trits into a new buffer.
    fn squeeze(&mut self, length: usize) -> Result<Vec<Trit>, Error> {
        let mut out = vec![0; length];
        self.squeeze_into(&mut out)?;
        Ok(out)
    }

    /// Hash `input` with a fresh sponge and return one `HASH_LENGTH` output.
    fn digest(input: &[Trit]) -> Result<Hash, Error> {
        let mut sponge = Self::default();
        sponge.absorb(input)?;
        let mut out = [0; HASH_LENGTH];
        sponge.squeeze_into(&mut out)?;
        Ok(Hash(out))
    }

    /// Advance one hash chain element by `rounds` steps in place. Each step resets
    /// the sponge, absorbs the current value and squeezes the next one.
    /// `value.len()` must be `HASH_LENGTH`.
    fn transform(&mut self, value: &mut [Trit], rounds: usize) -> Result<(), Error> {
        if value.len() != HASH_LENGTH {
            return Err(Error::InvalidLength(value.len()));
        }
        for _ in 0..rounds {
            self.reset();
            self.absorb(value)?;
            self.squeeze_into(value)?;
        }
        self.reset();
        Ok(())
    }
}
