//! Fuzz target for Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use cc_network::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    if digits.is_empty() {
        return;
    }

    let by_slice = luhn::validate(&digits);

    // The string entry point adds the 13 to 19 digit bound
    let text: String = digits.iter().map(|&d| (b'0' + d) as char).collect();
    let in_bounds = (luhn::MIN_LUHN_DIGITS..=luhn::MAX_LUHN_DIGITS).contains(&digits.len());
    assert_eq!(luhn::is_valid(&text), by_slice && in_bounds);

    // Adding the check digit makes it valid
    if digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9, "Check digit should be 0-9");

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }
});
