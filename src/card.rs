//! Card number input wrapper.
//!
//! [`CardNumber`] holds a raw card number as it was received. Its `Debug` and
//! `Display` output is masked, and the buffer is wiped when the value is
//! dropped so the number does not linger in freed memory.

use crate::luhn;
use crate::mask;
use crate::matcher;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A raw card number.
///
/// Only the digit characters are significant. [`is_numeric`](Self::is_numeric)
/// tells whether the input is acceptable to the matcher at all; the Luhn check
/// ignores non-digits.
///
/// # Example
///
/// ```
/// use cc_network::CardNumber;
///
/// let card = CardNumber::new("4111111111111111");
/// assert!(card.is_numeric());
/// assert!(card.passes_luhn());
/// assert_eq!(card.last_four(), "1111");
///
/// // Debug output never shows the full number
/// assert!(!format!("{:?}", card).contains("4111111111111111"));
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CardNumber {
    raw: String,
}

impl CardNumber {
    /// Wraps a raw card number.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw input, exactly as received.
    ///
    /// This exposes the full card number. Never log the result; use
    /// [`masked`](Self::masked) for display.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Length of the input with surrounding whitespace removed.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.trim().len()
    }

    /// Returns true if the trimmed input is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the input consists only of ASCII digits.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matcher::is_numeric(&self.raw)
    }

    /// The digit values (0-9) of the input, non-digits skipped.
    pub fn digits(&self) -> Vec<u8> {
        luhn::digits_of(&self.raw)
    }

    /// Runs the Luhn check, including the 13-19 digit bounds.
    #[inline]
    pub fn passes_luhn(&self) -> bool {
        luhn::is_valid(&self.raw)
    }

    /// Last four digits, safe for display.
    pub fn last_four(&self) -> String {
        mask::last_four_from_string(&self.raw)
    }

    /// Masked form showing the last four digits, e.g. `****-****-****-1111`.
    pub fn masked(&self) -> String {
        mask::mask_string(&self.raw)
    }

    /// Masked form showing the BIN and last four digits, e.g. `411111******1111`.
    pub fn masked_with_bin(&self) -> String {
        mask::mask_with_bin(&self.raw)
    }
}

impl From<String> for CardNumber {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for CardNumber {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for CardNumber {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumber")
            .field("number", &self.masked())
            .field("length", &self.len())
            .finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
