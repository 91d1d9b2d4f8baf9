//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use cc_network::generate::{complete_with_check_digit, deterministic_for_network};
use cc_network::provider::{BuiltinProvider, NetworkProvider};
use cc_network::{
    luhn, mask, matcher, validate_with, MatchCriterion, NetworkDefinition, Outcome, Rejection,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn builtin() -> Vec<NetworkDefinition> {
    BuiltinProvider.networks().unwrap()
}

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Generates a Luhn-valid number of 13 to 19 digits.
fn luhn_valid_strategy() -> impl Strategy<Value = String> {
    (13usize..=19).prop_flat_map(|len| {
        digit_string(len - 1).prop_map(move |body| {
            let digits = luhn::digits_of(&body);
            format!("{}{}", body, luhn::generate_check_digit(&digits))
        })
    })
}

/// Generates a string with at least one non-digit character.
fn non_numeric_strategy() -> impl Strategy<Value = String> {
    (
        digit_string_range(0..=10),
        any::<char>().prop_filter("must not be an ASCII digit", |c| !c.is_ascii_digit()),
        digit_string_range(0..=10),
    )
        .prop_map(|(head, bad, tail)| format!("{}{}{}", head, bad, tail))
}

/// Generates a string with separators (spaces, dashes) mixed in.
fn card_with_separators(card: String) -> impl Strategy<Value = String> {
    let len = card.len();
    proptest::collection::vec(prop_oneof![Just(""), Just(" "), Just("-"), Just(" - ")], len)
        .prop_map(move |seps| {
            let mut result = String::new();
            for (c, sep) in card.chars().zip(seps) {
                result.push(c);
                result.push_str(sep);
            }
            result
        })
}

// =============================================================================
// LUHN ALGORITHM PROPERTIES
// =============================================================================

proptest! {
    /// Property: A computed check digit always completes a valid number.
    #[test]
    fn check_digit_completes_valid_number(card in luhn_valid_strategy()) {
        prop_assert!(luhn::is_valid(&card), "{}", card);
    }

    /// Property: Changing any single digit breaks the checksum.
    #[test]
    fn single_digit_change_invalidates(
        card in luhn_valid_strategy(),
        pos in any::<prop::sample::Index>(),
        delta in 1u8..=9,
    ) {
        let mut bytes = card.into_bytes();
        let i = pos.index(bytes.len());
        bytes[i] = b'0' + (bytes[i] - b'0' + delta) % 10;
        let altered = String::from_utf8(bytes).unwrap();
        prop_assert!(!luhn::is_valid(&altered), "{}", altered);
    }

    /// Property: Separators never change the Luhn result.
    #[test]
    fn separators_ignored_by_luhn(
        (card, formatted) in digit_string_range(13..=19)
            .prop_flat_map(|c| (Just(c.clone()), card_with_separators(c)))
    ) {
        prop_assert_eq!(luhn::is_valid(&card), luhn::is_valid(&formatted));
    }

    /// Property: Numbers outside 13 to 19 digits never pass.
    #[test]
    fn out_of_range_lengths_fail(
        card in prop_oneof![digit_string_range(0..=12), digit_string_range(20..=40)]
    ) {
        prop_assert!(!luhn::is_valid(&card));
    }

    /// Property: Completing any prefix yields a valid number of the requested length.
    #[test]
    fn completion_keeps_prefix(prefix in digit_string_range(0..=8), len in 13usize..=19) {
        let card = complete_with_check_digit(&prefix, len).unwrap();
        prop_assert!(card.starts_with(&prefix));
        prop_assert_eq!(card.len(), len);
        prop_assert!(luhn::is_valid(&card));
    }
}

// =============================================================================
// MATCHER PROPERTIES
// =============================================================================

proptest! {
    /// Property: Matching never panics on arbitrary input.
    #[test]
    fn match_never_panics(s in ".*") {
        let _ = matcher::match_card(&s, &builtin());
    }

    /// Property: Any non-digit character makes the input a bad request.
    #[test]
    fn non_digits_are_bad_request(s in non_numeric_strategy()) {
        let v = validate_with(&s, &builtin());
        prop_assert_eq!(v.outcome(), Outcome::BadRequest);
        prop_assert!(!v.is_valid());
        prop_assert_eq!(v.network_name(), None);
    }

    /// Property: Validity implies an identified network, an allowed length
    /// and a passing checksum.
    #[test]
    fn valid_implies_all_checks(card in digit_string_range(0..=22)) {
        let networks = builtin();
        let v = validate_with(&card, &networks);
        if v.is_valid() {
            prop_assert_eq!(v.outcome(), Outcome::Ok);
            prop_assert!(luhn::is_valid(&card));
            let name = v.network_name().unwrap();
            let network = networks.iter().find(|n| n.name() == name).unwrap();
            prop_assert!(network.allows_length(card.len()));
        }
    }

    /// Property: Numeric input is never a bad request.
    #[test]
    fn digits_never_bad_request(card in digit_string_range(0..=25)) {
        prop_assert_ne!(validate_with(&card, &builtin()).outcome(), Outcome::BadRequest);
    }

    /// Property: No built-in network starts with 0, 1, 7, 8 or 9.
    #[test]
    fn unassigned_leading_digit_not_found(
        first in prop::sample::select(vec!['0', '1', '7', '8', '9']),
        rest in digit_string_range(12..=18),
    ) {
        let card = format!("{}{}", first, rest);
        let v = validate_with(&card, &builtin());
        prop_assert_eq!(v.outcome(), Outcome::NotFound);
        prop_assert_eq!(v.message(), "Not Found");
    }

    /// Property: The earlier of two matching networks always wins.
    #[test]
    fn first_listed_match_wins(card in digit_string_range(1..=19)) {
        let first_digit = u64::from(card.as_bytes()[0] - b'0');
        let a = NetworkDefinition::builder("A").prefix(first_digit).lengths([16]).build().unwrap();
        let b = NetworkDefinition::builder("B").prefix(first_digit).lengths([16]).build().unwrap();

        let v = validate_with(&card, &[a, b]);
        prop_assert_eq!(v.network_name(), Some("A"));
    }

    /// Property: A matching prefix beats a matching range in the same network.
    #[test]
    fn prefix_before_range(
        first in prop::char::range('1', '9'),
        rest in digit_string_range(3..=18),
    ) {
        let card = format!("{}{}", first, rest);
        let lead: u64 = card[..2].parse().unwrap();
        let network = NetworkDefinition::builder("Both")
            .prefix(lead)
            .range(0, 9999)
            .lengths([16])
            .build()
            .unwrap();

        let v = validate_with(&card, &[network]);
        prop_assert_eq!(v.matched(), Some(MatchCriterion::Prefix(lead)));
    }

    /// Property: A Luhn-valid card of a disallowed length reports its length.
    #[test]
    fn disallowed_length_reported(card in luhn_valid_strategy()) {
        let network = NetworkDefinition::builder("Any")
            .prefixes(0..10)
            .lengths([99])
            .build()
            .unwrap();

        let v = validate_with(&card, &[network]);
        prop_assert_eq!(v.outcome(), Outcome::Ok);
        prop_assert_eq!(v.rejection(), Some(Rejection::LengthNotAllowed { length: card.len() }));
    }
}

// =============================================================================
// GENERATION PROPERTIES
// =============================================================================

proptest! {
    /// Property: Deterministic cards are identified as their own network by
    /// the whole list and accepted by it.
    #[test]
    fn deterministic_cards_match_network(index in any::<prop::sample::Index>()) {
        let networks = builtin();
        let network = &networks[index.index(networks.len())];
        let card = deterministic_for_network(network, &networks).unwrap();

        let v = validate_with(&card, &networks);
        prop_assert!(v.is_valid(), "{} generated {}", network.name(), card);
        prop_assert_eq!(v.network_name(), Some(network.name()));
    }

    /// Property: A generated card is never claimed by an earlier definition.
    #[test]
    fn deterministic_cards_respect_list_order(
        shadowed in 1u64..=9,
        own in 1u64..=9,
    ) {
        prop_assume!(shadowed != own);
        let earlier = NetworkDefinition::builder("Earlier").prefix(shadowed).lengths([16]).build().unwrap();
        let later = NetworkDefinition::builder("Later")
            .prefixes([shadowed, own])
            .lengths([16])
            .build()
            .unwrap();
        let networks = [earlier, later.clone()];

        let card = deterministic_for_network(&later, &networks).unwrap();
        let result = validate_with(&card, &networks);
        prop_assert_eq!(result.network_name(), Some("Later"));
    }
}

// =============================================================================
// MASKING PROPERTIES (SECURITY)
// =============================================================================

proptest! {
    /// Property: Masking never exposes the full number.
    #[test]
    fn mask_hides_number(card in digit_string_range(5..=19)) {
        let masked = mask::mask_string(&card);
        prop_assert!(!masked.contains(&card));
        prop_assert!(masked.ends_with(&card[card.len() - 4..]));
    }

    /// Property: BIN masking shows at most ten digits.
    #[test]
    fn bin_mask_hides_middle(card in digit_string_range(11..=19)) {
        let masked = mask::mask_with_bin(&card);
        let shown = masked.chars().filter(|c| c.is_ascii_digit()).count();
        prop_assert_eq!(shown, 10);
        prop_assert_eq!(masked.len(), card.len());
    }
}
