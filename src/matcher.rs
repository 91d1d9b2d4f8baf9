//! Issuing-network identification.
//!
//! The matcher walks the definitions in list order and selects the first one
//! whose prefixes or range match the card. Once a network is selected, the
//! card length must be one of the network's allowed lengths and the number
//! must pass the Luhn check for the card to be valid.
//!
//! # Example
//!
//! ```
//! use cc_network::{matcher, NetworkDefinition, Outcome};
//!
//! let networks = vec![
//!     NetworkDefinition::builder("Visa").prefix(4).lengths([16]).build().unwrap(),
//! ];
//!
//! let validation = matcher::match_card("4111111111111111", &networks);
//! assert_eq!(validation.outcome(), Outcome::Ok);
//! assert!(validation.is_valid());
//! assert_eq!(validation.network_name(), Some("Visa"));
//!
//! assert_eq!(matcher::match_card("4111-abcd", &networks).outcome(), Outcome::BadRequest);
//! assert_eq!(matcher::match_card("9111111111111111", &networks).outcome(), Outcome::NotFound);
//! ```

use crate::luhn;
use crate::mask::mask_string;
use crate::network::{NetworkDefinition, PrefixRange};
use crate::outcome::{MatchCriterion, Rejection, Validation};
use tracing::debug;

/// A definition selected for a card, with the rule that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkMatch<'a> {
    /// The selected definition.
    pub network: &'a NetworkDefinition,
    /// The prefix or range that matched.
    pub criterion: MatchCriterion,
}

/// Checks that `card` consists only of ASCII digits.
///
/// The empty string passes; it simply matches no network.
#[inline]
pub fn is_numeric(card: &str) -> bool {
    card.bytes().all(|b| b.is_ascii_digit())
}

fn starts_with_number(card: &str, prefix: u64) -> bool {
    card.starts_with(prefix.to_string().as_str())
}

/// Returns the longest of `network`'s prefixes that `card` starts with.
///
/// Candidates are ranked by descending numeric value. Two integer prefixes
/// that both match the same digit string are nested, so the numerically
/// larger one is always the longer one and the ranking is a true
/// longest-prefix match.
pub fn matching_prefix(network: &NetworkDefinition, card: &str) -> Option<u64> {
    network
        .prefixes()
        .iter()
        .copied()
        .filter(|&prefix| starts_with_number(card, prefix))
        .max()
}

/// Checks whether the leading digits of `card` fall inside `range`.
///
/// As many leading digits are read as `range.min()` has; a card shorter than
/// that never matches.
#[inline]
pub fn range_contains(range: &PrefixRange, card: &str) -> bool {
    range
        .leading_value(card)
        .is_some_and(|value| range.contains(value))
}

/// Finds the first definition, in list order, matching `card`.
///
/// A definition matches if the card starts with one of its prefixes or its
/// leading digits fall inside its range; prefixes are checked first.
pub fn find_network<'a>(card: &str, networks: &'a [NetworkDefinition]) -> Option<NetworkMatch<'a>> {
    networks.iter().find_map(|network| {
        if let Some(prefix) = matching_prefix(network, card) {
            return Some(NetworkMatch {
                network,
                criterion: MatchCriterion::Prefix(prefix),
            });
        }

        network
            .range()
            .filter(|range| range_contains(range, card))
            .map(|range| NetworkMatch {
                network,
                criterion: MatchCriterion::Range(range),
            })
    })
}

/// Checks the trimmed length of `card` against the network's allowed lengths.
#[inline]
pub fn is_valid_length(network: &NetworkDefinition, card: &str) -> bool {
    network.allows_length(card.trim().len())
}

/// Validates `card` against the given network definitions.
///
/// - Non-digit input yields [`Outcome::BadRequest`](crate::Outcome::BadRequest).
/// - No matching network yields [`Outcome::NotFound`](crate::Outcome::NotFound).
/// - Otherwise the outcome is [`Outcome::Ok`](crate::Outcome::Ok) with the
///   network name; the card is valid only if the length is allowed and the
///   Luhn check passes, and [`Validation::rejection`] names the failed check.
pub fn match_card(card: &str, networks: &[NetworkDefinition]) -> Validation {
    if !is_numeric(card) {
        debug!(card = %mask_string(card), "rejected non-numeric card number");
        return Validation::bad_request();
    }

    let Some(found) = find_network(card, networks) else {
        debug!(
            card = %mask_string(card),
            networks = networks.len(),
            "no issuing network matched"
        );
        return Validation::not_found();
    };

    let length = card.trim().len();
    let rejection = if !is_valid_length(found.network, card) {
        Some(Rejection::LengthNotAllowed { length })
    } else if !luhn::is_valid(card) {
        Some(Rejection::ChecksumFailed)
    } else {
        None
    };

    debug!(
        card = %mask_string(card),
        network = found.network.name(),
        criterion = %found.criterion,
        valid = rejection.is_none(),
        "issuing network identified"
    );

    Validation::identified(found.network.name(), found.criterion, rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    fn networks() -> Vec<NetworkDefinition> {
        vec![
            NetworkDefinition::builder("American Express")
                .prefixes([34, 37])
                .lengths([15])
                .build()
                .unwrap(),
            NetworkDefinition::builder("Visa")
                .prefix(4)
                .lengths([13, 16, 19])
                .build()
                .unwrap(),
            NetworkDefinition::builder("Mastercard")
                .prefixes([51, 52, 53, 54, 55])
                .range(2221, 2720)
                .lengths([16])
                .build()
                .unwrap(),
            NetworkDefinition::builder("Discover")
                .prefixes([6011, 65, 644, 645, 646, 647, 648, 649])
                .range(622126, 622925)
                .lengths([16, 17, 18, 19])
                .build()
                .unwrap(),
        ]
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("4111111111111111"));
        assert!(is_numeric(""));
        assert!(!is_numeric("4111-1111"));
        assert!(!is_numeric(" 4111"));
        assert!(!is_numeric("４１１１")); // full-width digits
    }

    #[test]
    fn test_visa_valid() {
        let v = match_card("4111111111111111", &networks());
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(v.is_valid());
        assert_eq!(v.network_name(), Some("Visa"));
        assert_eq!(v.matched(), Some(MatchCriterion::Prefix(4)));
        assert_eq!(v.rejection(), None);
    }

    #[test]
    fn test_bad_request() {
        let v = match_card("4111-abcd", &networks());
        assert_eq!(v.outcome(), Outcome::BadRequest);
        assert!(!v.is_valid());
        assert_eq!(v.network_name(), None);
        assert_eq!(v.message(), "Bad Request");

        // Separators are not accepted by the matcher
        let v = match_card("4111 1111 1111 1111", &networks());
        assert_eq!(v.outcome(), Outcome::BadRequest);
    }

    #[test]
    fn test_not_found() {
        let v = match_card("9111111111111111", &networks());
        assert_eq!(v.outcome(), Outcome::NotFound);
        assert!(!v.is_valid());
        assert_eq!(v.network_name(), None);
        assert_eq!(v.message(), "Not Found");

        assert_eq!(match_card("", &networks()).outcome(), Outcome::NotFound);
        assert_eq!(
            match_card("4111111111111111", &[]).outcome(),
            Outcome::NotFound
        );
    }

    #[test]
    fn test_length_not_allowed_keeps_ok_outcome() {
        // 15-digit Visa number: Visa allows 13, 16, 19
        let v = match_card("411111111111116", &networks());
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(!v.is_valid());
        assert_eq!(v.network_name(), Some("Visa"));
        assert_eq!(v.rejection(), Some(Rejection::LengthNotAllowed { length: 15 }));
    }

    #[test]
    fn test_checksum_failure_keeps_ok_outcome() {
        let v = match_card("4111111111111112", &networks());
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(!v.is_valid());
        assert_eq!(v.network_name(), Some("Visa"));
        assert_eq!(v.rejection(), Some(Rejection::ChecksumFailed));
    }

    #[test]
    fn test_range_match() {
        let v = match_card("2223000048400011", &networks());
        assert_eq!(v.network_name(), Some("Mastercard"));
        assert!(v.is_valid());
        assert_eq!(
            v.matched(),
            Some(MatchCriterion::Range(PrefixRange::new(2221, 2720).unwrap()))
        );

        // Just outside the range
        let v = match_card("2720990000000005", &networks());
        assert_eq!(v.network_name(), Some("Mastercard"));
        assert_eq!(match_card("2721000000000000", &networks()).outcome(), Outcome::NotFound);
    }

    #[test]
    fn test_prefix_evaluated_before_range() {
        let v = match_card("5500000000000004", &networks());
        assert_eq!(v.matched(), Some(MatchCriterion::Prefix(55)));

        let v = match_card("6221260000000000", &networks());
        assert_eq!(v.network_name(), Some("Discover"));
        assert!(matches!(v.matched(), Some(MatchCriterion::Range(_))));
    }

    #[test]
    fn test_first_definition_in_list_order_wins() {
        let overlapping = vec![
            NetworkDefinition::builder("Broad")
                .prefix(4)
                .lengths([16])
                .build()
                .unwrap(),
            NetworkDefinition::builder("Narrow")
                .prefix(4111)
                .lengths([16])
                .build()
                .unwrap(),
        ];
        assert_eq!(
            match_card("4111111111111111", &overlapping).network_name(),
            Some("Broad")
        );

        let reversed: Vec<_> = overlapping.into_iter().rev().collect();
        assert_eq!(
            match_card("4111111111111111", &reversed).network_name(),
            Some("Narrow")
        );
    }

    #[test]
    fn test_longest_matching_prefix() {
        let network = NetworkDefinition::builder("Mixed")
            .prefixes([4, 99, 100, 41, 411])
            .lengths([16])
            .build()
            .unwrap();

        assert_eq!(matching_prefix(&network, "4111111111111111"), Some(411));
        assert_eq!(matching_prefix(&network, "4211111111111111"), Some(4));
        assert_eq!(matching_prefix(&network, "9911111111111111"), Some(99));
        assert_eq!(matching_prefix(&network, "1001111111111111"), Some(100));
        assert_eq!(matching_prefix(&network, "5111111111111111"), None);
    }

    #[test]
    fn test_zero_prefix() {
        let network = NetworkDefinition::builder("Zero")
            .prefix(0)
            .lengths([16])
            .build()
            .unwrap();
        assert_eq!(matching_prefix(&network, "0000000000000000"), Some(0));
        assert_eq!(matching_prefix(&network, "1000000000000000"), None);
    }

    #[test]
    fn test_range_contains_short_card() {
        let range = PrefixRange::new(622126, 622925).unwrap();
        assert!(range_contains(&range, "622126"));
        assert!(!range_contains(&range, "62212"));
        assert!(!range_contains(&range, ""));
    }

    #[test]
    fn test_is_valid_length() {
        let nets = networks();
        let amex = &nets[0];
        assert!(is_valid_length(amex, "378282246310005"));
        assert!(!is_valid_length(amex, "3782822463100050"));
    }

    #[test]
    fn test_find_network() {
        let nets = networks();
        let found = find_network("378282246310005", &nets).unwrap();
        assert_eq!(found.network.name(), "American Express");
        assert_eq!(found.criterion, MatchCriterion::Prefix(37));

        assert!(find_network("1234", &nets).is_none());
    }
}
