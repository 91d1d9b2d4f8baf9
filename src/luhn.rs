//! Luhn checksum for card numbers.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) detects every
//! single-digit error and most adjacent transpositions. [`is_valid`] is the
//! string-level check used by the matcher; the slice functions work on digits
//! that have already been extracted.

/// Fewest digits a card number may have to pass [`is_valid`].
pub const MIN_LUHN_DIGITS: usize = 13;

/// Most digits a card number may have to pass [`is_valid`].
pub const MAX_LUHN_DIGITS: usize = 19;

/// Lookup table for doubled digits: double the value, subtract 9 if > 9.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Checks a card number string with the Luhn algorithm.
///
/// Every non-digit character is discarded first. The remaining digit count
/// must lie within [`MIN_LUHN_DIGITS`]..=[`MAX_LUHN_DIGITS`], otherwise the
/// number is rejected without computing the checksum.
///
/// # Example
///
/// ```
/// use cc_network::luhn;
///
/// assert!(luhn::is_valid("4111111111111111"));
/// assert!(luhn::is_valid("4111 1111 1111 1111"));
/// assert!(!luhn::is_valid("4111111111111112"));
/// assert!(!luhn::is_valid("0000000000")); // too short
/// ```
pub fn is_valid(number: &str) -> bool {
    let digits = digits_of(number);

    if digits.len() < MIN_LUHN_DIGITS || digits.len() > MAX_LUHN_DIGITS {
        return false;
    }

    validate(&digits)
}

/// Extracts the ASCII digits of `input` as values 0-9, skipping everything else.
pub fn digits_of(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Validates a digit slice using the Luhn algorithm.
///
/// No length bounds are applied here; an empty slice is invalid.
///
/// # Algorithm
///
/// 1. Starting from the rightmost digit (check digit), moving left
/// 2. Double every second digit
/// 3. If doubling results in a number > 9, subtract 9
/// 4. Sum all digits
/// 5. If the sum is divisible by 10, the number is valid
///
/// # Example
///
/// ```
/// use cc_network::luhn::validate;
///
/// let digits = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert!(validate(&digits));
///
/// let invalid = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2];
/// assert!(!validate(&invalid));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced modulo 10) of a digit slice.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[digit as usize] as u32
            } else {
                digit as u32
            }
        })
        .sum()
}

/// Generates the check digit for a partial card number.
///
/// Given digits without the check digit, computes the digit that makes the
/// full number pass Luhn validation.
///
/// # Example
///
/// ```
/// use cc_network::luhn::generate_check_digit;
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), 1);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Every existing digit moves one position left once the check digit is
    // appended, so the doubling parity flips.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[digit as usize] as u32
            } else {
                digit as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}
