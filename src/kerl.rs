//! Kerl, the ternary sponge built on Keccak-384. Each 243-trit block is
//! mapped to a 384-bit two's complement big endian integer (the most
//! significant trit is treated as zero) before being fed to Keccak, and each
//! squeezed Keccak digest is mapped back to 243 trits, again with the last
//! trit cleared. After every squeeze the Keccak state is reset and re-keyed
//! with the bitwise complement of the digest it just produced.
use crate::common::HASH_LENGTH;
use crate::errors::Error;
use crate::traits::Sponge;
use crate::trinary::Trit;
use num_bigint::{BigInt, Sign};
use sha3::{Digest, Keccak384};

/// Byte size of a Keccak-384 digest.
pub const BYTE_HASH_LENGTH: usize = 48;

/// Kerl sponge. Cheap to create and to clone.
#[derive(Clone, Default)]
pub struct Kerl {
    keccak: Keccak384,
}

impl Sponge for Kerl {
    fn absorb(&mut self, input: &[Trit]) -> Result<(), Error> {
        if input.is_empty() || input.len() % HASH_LENGTH != 0 {
            return Err(Error::InvalidLength(input.len()));
        }
        for block in input.chunks_exact(HASH_LENGTH) {
            self.keccak.update(trits_to_bytes(block));
        }
        Ok(())
    }

    fn squeeze_into(&mut self, output: &mut [Trit]) -> Result<(), Error> {
        if output.is_empty() || output.len() % HASH_LENGTH != 0 {
            return Err(Error::InvalidLength(output.len()));
        }
        for block in output.chunks_exact_mut(HASH_LENGTH) {
            let mut bytes = [0u8; BYTE_HASH_LENGTH];
            bytes.copy_from_slice(&self.keccak.finalize_reset());
            bytes_to_trits(&bytes, block);

            bytes.iter_mut().for_each(|b| *b = !*b);
            self.keccak.update(bytes);
        }
        Ok(())
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.keccak);
    }
}

/// Encodes the first 242 trits of a 243-trit block as a 384-bit two's
/// complement integer in big endian order.
pub fn trits_to_bytes(block: &[Trit]) -> [u8; BYTE_HASH_LENGTH] {
    debug_assert_eq!(block.len(), HASH_LENGTH);
    // |value| <= (3^242 - 1) / 2 < 2^383, so it always fits in 384 signed bits
    let value = block[..HASH_LENGTH - 1]
        .iter()
        .rev()
        .fold(BigInt::default(), |acc, &t| acc * 3u32 + BigInt::from(t));

    let bytes = value.to_signed_bytes_be();
    let fill = if value.sign() == Sign::Minus { 0xff } else { 0x00 };
    let mut out = [fill; BYTE_HASH_LENGTH];
    out[BYTE_HASH_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Decodes a 384-bit two's complement big endian integer into a 243-trit block.
/// The last trit of the block is always zero.
pub fn bytes_to_trits(bytes: &[u8; BYTE_HASH_LENGTH], block: &mut [Trit]) {
    debug_assert_eq!(block.len(), HASH_LENGTH);
    let (sign, magnitude) = BigInt::from_signed_bytes_be(bytes).into_parts();
    let digits = magnitude.to_radix_le(3);

    // unbalanced base 3 digits to balanced trits: a digit of 2 becomes -1 with
    // a carry into the next position
    let mut carry = 0u8;
    for (i, t) in block.iter_mut().enumerate() {
        let digit = digits.get(i).copied().unwrap_or(0) + carry;
        let (trit, next) = match digit {
            0 => (0, 0),
            1 => (1, 0),
            2 => (-1, 1),
            _ => (0, 1),
        };
        carry = next;
        *t = if sign == Sign::Minus { -trit } else { trit };
    }
    block[HASH_LENGTH - 1] = 0;
}
