//! Balanced ternary digit model. A `Trit` takes values in `{-1, 0, 1}` and a
//! tryte groups three trits, least significant first, into a value in
//! `[-13, 13]`. Trytes have a textual form over the alphabet
//! `9ABCDEFGHIJKLMNOPQRSTUVWXYZ`, where `9` is zero, `A..M` are `1..13` and
//! `N..Z` are `-13..-1`.
use crate::errors::Error;

/// A single balanced ternary digit.
pub type Trit = i8;

/// Number of trits in a tryte.
pub const TRITS_PER_TRYTE: usize = 3;
/// Smallest trit value.
pub const MIN_TRIT_VALUE: Trit = -1;
/// Largest trit value.
pub const MAX_TRIT_VALUE: Trit = 1;
/// Smallest tryte value.
pub const MIN_TRYTE_VALUE: i8 = -13;
/// Largest tryte value.
pub const MAX_TRYTE_VALUE: i8 = 13;
/// Tryte alphabet, indexed by the non-negative residue of the tryte value.
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Checks that every element of `trits` is a valid trit.
///
/// # Errors
/// Returns `Error::InvalidTrit` with the position of the first offending value.
pub fn validate_trits(trits: &[Trit]) -> Result<(), Error> {
    match trits
        .iter()
        .position(|t| !(MIN_TRIT_VALUE..=MAX_TRIT_VALUE).contains(t))
    {
        Some(i) => Err(Error::InvalidTrit(i, trits[i])),
        None => Ok(()),
    }
}

/// Value of a tryte given as three trits, least significant first.
pub fn tryte_value(trits: &[Trit; TRITS_PER_TRYTE]) -> i8 {
    trits[0] + trits[1] * 3 + trits[2] * 9
}

/// Converts tryte values, such as a normalized bundle hash, into trits,
/// least significant first within each tryte.
///
/// # Errors
/// Returns `Error::InvalidTryteValue` with the position of the first value
/// outside `[-13, 13]`.
pub fn tryte_values_to_trits(values: &[i8]) -> Result<Vec<Trit>, Error> {
    let mut trits = Vec::with_capacity(values.len() * TRITS_PER_TRYTE);
    for (i, &value) in values.iter().enumerate() {
        if !(MIN_TRYTE_VALUE..=MAX_TRYTE_VALUE).contains(&value) {
            return Err(Error::InvalidTryteValue(i, value));
        }
        trits.extend_from_slice(&balanced_tryte(value));
    }
    Ok(trits)
}

/// `value` must lie in `[-13, 13]`.
fn balanced_tryte(value: i8) -> [Trit; TRITS_PER_TRYTE] {
    let mut out = [0; TRITS_PER_TRYTE];
    let mut n = value;
    for t in out.iter_mut() {
        let digit = (n + 1).rem_euclid(3) - 1;
        *t = digit;
        n = (n - digit) / 3;
    }
    out
}

/// Converts a little endian trit sequence into the integer it represents.
/// Sequences longer than 40 trits exceed `i64` and wrap.
pub fn trits_to_int(trits: &[Trit]) -> i64 {
    trits
        .iter()
        .rev()
        .fold(0i64, |acc, &t| acc.wrapping_mul(3).wrapping_add(i64::from(t)))
}

/// Converts an integer into its shortest little endian trit sequence. Zero is
/// encoded as a single `0` trit.
pub fn int_to_trits(value: i64) -> Vec<Trit> {
    let mut trits = unsigned_to_trits(value.unsigned_abs());
    if value < 0 {
        trits.iter_mut().for_each(|t| *t = -*t);
    }
    trits
}

pub(crate) fn unsigned_to_trits(mut magnitude: u64) -> Vec<Trit> {
    if magnitude == 0 {
        return vec![0];
    }
    let mut trits = Vec::with_capacity(41);
    while magnitude > 0 {
        let rem = magnitude % 3;
        magnitude /= 3;
        if rem == 2 {
            trits.push(-1);
            magnitude += 1;
        } else {
            trits.push(rem as Trit);
        }
    }
    trits
}

/// Adds two little endian trit sequences. The result has the length of the
/// longer input; a carry out of the most significant trit is dropped, so the
/// sum wraps around modulo `3^len`.
pub fn add_trits(a: &[Trit], b: &[Trit]) -> Vec<Trit> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len);
    let mut carry = 0i8;
    for i in 0..len {
        let sum = a.get(i).copied().unwrap_or(0) + b.get(i).copied().unwrap_or(0) + carry;
        let digit = (sum + 1).rem_euclid(3) - 1;
        carry = (sum - digit) / 3;
        out.push(digit);
    }
    out
}

/// Decodes a tryte string into trits.
///
/// # Errors
/// Returns `Error::InvalidTryteChar` on the first character outside the alphabet.
pub fn trytes_to_trits(trytes: &str) -> Result<Vec<Trit>, Error> {
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for c in trytes.chars() {
        let value = char_to_tryte_value(c).ok_or(Error::InvalidTryteChar(c))?;
        trits.extend_from_slice(&balanced_tryte(value));
    }
    Ok(trits)
}

/// Encodes trits as a tryte string.
///
/// # Errors
/// The function fails if
/// * `trits.len()` is not a multiple of three
/// * `trits` holds a value that is not a trit
pub fn trits_to_trytes(trits: &[Trit]) -> Result<String, Error> {
    if trits.len() % TRITS_PER_TRYTE != 0 {
        return Err(Error::InvalidLength(trits.len()));
    }
    validate_trits(trits)?;
    Ok(trits
        .chunks_exact(TRITS_PER_TRYTE)
        .map(|c| tryte_value_to_char(tryte_value(&[c[0], c[1], c[2]])))
        .collect())
}

/// Numeric value of a tryte character.
pub fn char_to_tryte_value(c: char) -> Option<i8> {
    let index = TRYTE_ALPHABET.iter().position(|&b| char::from(b) == c)? as i8;
    Some(if index > MAX_TRYTE_VALUE {
        index - 27
    } else {
        index
    })
}

/// Character of a tryte value. `value` must lie in `[-13, 13]`.
pub(crate) fn tryte_value_to_char(value: i8) -> char {
    char::from(TRYTE_ALPHABET[value.rem_euclid(27) as usize])
}
