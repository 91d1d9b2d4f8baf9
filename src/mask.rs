//! Masking of card numbers for display and logging.
//!
//! Card numbers are never written to logs in full. The matcher and the
//! binaries log [`mask_string`] output only.
//!
//! Displaying is limited to:
//! - Only the last 4 digits (default)
//! - First 6 digits (BIN) and last 4 digits

/// Masks a card number string showing only the last 4 digits.
///
/// Non-digit characters are dropped before masking. Inputs with four or fewer
/// digits are masked completely.
///
/// # Example
///
/// ```
/// use cc_network::mask::mask_string;
///
/// assert_eq!(mask_string("4111111111111111"), "****-****-****-1111");
/// assert_eq!(mask_string("4111-1111-1111-1111"), "****-****-****-1111");
/// ```
#[inline]
pub fn mask_string(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + (len / 4));

    // Masked portion grouped by four
    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if masked_count % 4 == 0 {
        result.push('-');
    }

    result.extend(&digits[len - 4..]);
    result
}

/// Masks a card number string showing the BIN (first 6) and last 4 digits.
///
/// Format: `411111******1111`. Numbers with 10 or fewer digits fall back to
/// [`mask_string`].
///
/// # Example
///
/// ```
/// use cc_network::mask::mask_with_bin;
///
/// assert_eq!(mask_with_bin("4111111111111111"), "411111******1111");
/// ```
pub fn mask_with_bin(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 10 {
        return mask_string(input);
    }

    let mut result = String::with_capacity(len);
    result.extend(&digits[..6]);
    result.extend(std::iter::repeat('*').take(len - 10));
    result.extend(&digits[len - 4..]);
    result
}

/// Extracts just the last 4 digits from a card number string.
///
/// Returns an empty string if there are fewer than 4 digits.
#[inline]
pub fn last_four_from_string(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].iter().collect()
    } else {
        String::new()
    }
}
