//! Card number generation for testing purposes.
//!
//! Generated numbers pass the Luhn check and are identified as the requested
//! network when matched against the whole definition list. A card that an
//! earlier definition would claim is never returned. They are not connected
//! to real accounts and should only be used for testing.
//!
//! # Example
//!
//! ```
//! use cc_network::generate::{complete_with_check_digit, deterministic_for_network};
//! use cc_network::provider::{BuiltinProvider, NetworkProvider};
//! use cc_network::{luhn, matcher};
//!
//! let card = complete_with_check_digit("411111", 16).unwrap();
//! assert_eq!(card, "4111110000000005");
//! assert!(luhn::is_valid(&card));
//!
//! let networks = BuiltinProvider.networks().unwrap();
//! let amex = networks.iter().find(|n| n.name() == "American Express").unwrap();
//! let card = deterministic_for_network(amex, &networks).unwrap();
//! let validation = matcher::match_card(&card, &networks);
//! assert!(validation.is_valid());
//! assert_eq!(validation.network_name(), Some("American Express"));
//! ```

use crate::luhn::{self, MAX_LUHN_DIGITS, MIN_LUHN_DIGITS};
use crate::matcher;
use crate::network::NetworkDefinition;

#[cfg(feature = "generate")]
use crate::network::PrefixRange;
#[cfg(feature = "generate")]
use rand::Rng;

/// Random candidates drawn per card before giving up on a network that
/// earlier definitions shadow.
#[cfg(feature = "generate")]
pub const MAX_GENERATION_ATTEMPTS: usize = 100;

/// Completes `prefix` to `length` digits, zero-filled, with a valid check
/// digit.
///
/// Returns `None` if the prefix contains non-digits or leaves no room for
/// the check digit.
pub fn complete_with_check_digit(prefix: &str, length: usize) -> Option<String> {
    let mut digits = prefix_digits(prefix, length)?;
    digits.resize(length - 1, 0);
    Some(finish(digits))
}

/// Generates a Luhn-valid card for `network` without randomness.
///
/// Starts are tried in order (each prefix, then the lower bound of the
/// range) with the allowed lengths between 13 and 19 digits, shortest first.
/// The first zero-filled card that `networks` identifies as `network` is
/// returned. `None` means no such card exists, e.g. when an earlier
/// definition claims every start.
pub fn deterministic_for_network(
    network: &NetworkDefinition,
    networks: &[NetworkDefinition],
) -> Option<String> {
    let starts = network
        .prefixes()
        .iter()
        .map(u64::to_string)
        .chain(network.range().map(|range| range.min().to_string()));

    starts
        .flat_map(|start| {
            candidate_lengths(network, start.len())
                .filter_map(move |length| complete_with_check_digit(&start, length))
        })
        .find(|card| identified_as(card, network, networks))
}

/// Generates a valid card number with the given prefix and length.
///
/// Requires the `generate` feature.
///
/// # Example
///
/// ```
/// use cc_network::generate::generate_card_with_prefix;
///
/// let card = generate_card_with_prefix("411111", 16).unwrap();
/// assert!(card.starts_with("411111"));
/// assert_eq!(card.len(), 16);
/// assert!(cc_network::luhn::is_valid(&card));
/// ```
#[cfg(feature = "generate")]
pub fn generate_card_with_prefix(prefix: &str, length: usize) -> Option<String> {
    let mut rng = rand::thread_rng();
    generate_card_with_rng(prefix, length, &mut rng)
}

/// Generates a valid card number using a provided RNG.
///
/// This is useful for reproducible test generation with seeded RNGs.
#[cfg(feature = "generate")]
pub fn generate_card_with_rng<R: Rng>(
    prefix: &str,
    length: usize,
    rng: &mut R,
) -> Option<String> {
    let mut digits = prefix_digits(prefix, length)?;

    // Fill with random digits (except last one which will be check digit)
    while digits.len() < length - 1 {
        digits.push(rng.gen_range(0..10));
    }

    Some(finish(digits))
}

/// Generates a random card number that `networks` identifies as `network`
/// and that `network` accepts.
///
/// The start is one of the network's prefixes or a value from its range, and
/// the length is one of its allowed lengths between 13 and 19 digits that
/// leaves room after the start. Candidates claimed by an earlier definition
/// are discarded; after [`MAX_GENERATION_ATTEMPTS`] candidates, or if no
/// start and length combination exists, returns `None`.
///
/// # Example
///
/// ```
/// use cc_network::generate::generate_for_network;
/// use cc_network::provider::{BuiltinProvider, NetworkProvider};
/// use cc_network::matcher;
///
/// let networks = BuiltinProvider.networks().unwrap();
/// let unionpay = networks.iter().find(|n| n.name() == "UnionPay").unwrap();
///
/// let card = generate_for_network(unionpay, &networks, &mut rand::thread_rng()).unwrap();
/// assert_eq!(matcher::match_card(&card, &networks).network_name(), Some("UnionPay"));
/// ```
#[cfg(feature = "generate")]
pub fn generate_for_network<R: Rng>(
    network: &NetworkDefinition,
    networks: &[NetworkDefinition],
    rng: &mut R,
) -> Option<String> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let card = random_candidate(network, rng)?;
        if identified_as(&card, network, networks) {
            return Some(card);
        }
    }

    tracing::debug!(
        network = network.name(),
        attempts = MAX_GENERATION_ATTEMPTS,
        "no generated card was identified as the requested network"
    );
    None
}

/// Generates up to `count` random cards for `network`.
///
/// Fewer cards are returned when [`generate_for_network`] gives up.
/// Requires the `generate` feature.
#[cfg(feature = "generate")]
pub fn generate_many_for_network(
    network: &NetworkDefinition,
    networks: &[NetworkDefinition],
    count: usize,
) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map_while(|_| generate_for_network(network, networks, &mut rng))
        .collect()
}

#[cfg(feature = "generate")]
fn random_candidate<R: Rng>(network: &NetworkDefinition, rng: &mut R) -> Option<String> {
    let mut starts: Vec<String> = network.prefixes().iter().map(u64::to_string).collect();
    if let Some(range) = network.range() {
        starts.push(random_in_range(&range, rng));
    }

    let usable: Vec<(String, Vec<usize>)> = starts
        .into_iter()
        .map(|start| {
            let lengths = candidate_lengths(network, start.len()).collect();
            (start, lengths)
        })
        .filter(|(_, lengths): &(String, Vec<usize>)| !lengths.is_empty())
        .collect();

    if usable.is_empty() {
        return None;
    }

    let (start, lengths) = &usable[rng.gen_range(0..usable.len())];
    let length = lengths[rng.gen_range(0..lengths.len())];
    generate_card_with_rng(start, length, rng)
}

/// Whether matching `card` against `networks` selects `network`.
fn identified_as(card: &str, network: &NetworkDefinition, networks: &[NetworkDefinition]) -> bool {
    matcher::find_network(card, networks).is_some_and(|found| found.network == network)
}

/// A value of `range` rendered with exactly `range.digit_count()` digits, so
/// the range matcher reads it back whole.
#[cfg(feature = "generate")]
fn random_in_range<R: Rng>(range: &PrefixRange, rng: &mut R) -> String {
    let upper = range.max().min(widest_with_digits(range.digit_count()));
    rng.gen_range(range.min()..=upper).to_string()
}

#[cfg(any(feature = "generate", test))]
fn widest_with_digits(count: usize) -> u64 {
    u32::try_from(count)
        .ok()
        .and_then(|exp| 10u64.checked_pow(exp))
        .map_or(u64::MAX, |n| n - 1)
}

/// Allowed lengths the Luhn check accepts that leave room after a start of
/// `start_len` digits.
fn candidate_lengths(
    network: &NetworkDefinition,
    start_len: usize,
) -> impl Iterator<Item = usize> + '_ {
    let mut lengths: Vec<usize> = network
        .allowed_lengths()
        .iter()
        .copied()
        .filter(|&len| (MIN_LUHN_DIGITS..=MAX_LUHN_DIGITS).contains(&len) && len > start_len)
        .collect();
    lengths.sort_unstable();
    lengths.dedup();
    lengths.into_iter()
}

fn prefix_digits(prefix: &str, length: usize) -> Option<Vec<u8>> {
    if !prefix.bytes().all(|b| b.is_ascii_digit()) || prefix.len() >= length {
        return None;
    }

    let mut digits = Vec::with_capacity(length);
    digits.extend(prefix.bytes().map(|b| b - b'0'));
    Some(digits)
}

fn finish(mut digits: Vec<u8>) -> String {
    let check_digit = luhn::generate_check_digit(&digits);
    digits.push(check_digit);
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}
