//! Fuzz target for network matching.
//!
//! Tests that matching never panics and that a valid result passed every check.

#![no_main]

use cc_network::provider::{BuiltinProvider, NetworkProvider};
use cc_network::{luhn, mask, matcher, Outcome};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(networks) = BuiltinProvider.networks() else {
        return;
    };

    let validation = matcher::match_card(data, &networks);
    let _ = mask::mask_string(data);

    if !matcher::is_numeric(data) {
        assert_eq!(validation.outcome(), Outcome::BadRequest);
    }

    if validation.is_valid() {
        assert_eq!(validation.outcome(), Outcome::Ok);
        assert!(luhn::is_valid(data));
    }
});
