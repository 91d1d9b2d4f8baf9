//! Batch processing for high-throughput card validation.
//!
//! A [`BatchValidator`] borrows one list of network definitions and checks
//! many cards against it, with optional parallel processing using rayon.
//!
//! # Performance
//!
//! - Definitions are fetched once per batch, not once per card
//! - Optional parallel processing with the `parallel` feature

use crate::matcher::match_card;
use crate::network::NetworkDefinition;
use crate::outcome::{Outcome, Validation};

/// Batch validator over a borrowed list of network definitions.
///
/// # Example
///
/// ```
/// use cc_network::provider::{BuiltinProvider, NetworkProvider};
/// use cc_network::BatchValidator;
///
/// let networks = BuiltinProvider.networks().unwrap();
/// let batch = BatchValidator::new(&networks);
///
/// let cards = ["4111111111111111", "5500000000000004", "378282246310005"];
/// for (card, validation) in cards.iter().zip(batch.validate_all(&cards)) {
///     println!("{}: {} valid={}", card, validation.message(), validation.is_valid());
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchValidator<'a> {
    networks: &'a [NetworkDefinition],
}

impl<'a> BatchValidator<'a> {
    /// Creates a batch validator over `networks`, tried in list order.
    #[inline]
    pub fn new(networks: &'a [NetworkDefinition]) -> Self {
        Self { networks }
    }

    /// The definitions cards are validated against.
    #[inline]
    pub fn networks(&self) -> &'a [NetworkDefinition] {
        self.networks
    }

    /// Validates a batch of card numbers.
    ///
    /// Returns a vector of results in the same order as the input.
    pub fn validate_all<S: AsRef<str>>(&self, cards: &[S]) -> Vec<Validation> {
        cards
            .iter()
            .map(|c| match_card(c.as_ref(), self.networks))
            .collect()
    }

    /// Validates a batch and returns only the valid cards, with their input
    /// position.
    pub fn validate_valid_only<S: AsRef<str>>(&self, cards: &[S]) -> Vec<(usize, Validation)> {
        cards
            .iter()
            .enumerate()
            .map(|(i, c)| (i, match_card(c.as_ref(), self.networks)))
            .filter(|(_, v)| v.is_valid())
            .collect()
    }

    /// Validates a batch and tallies the outcomes.
    pub fn summarize<S: AsRef<str>>(&self, cards: &[S]) -> BatchSummary {
        cards
            .iter()
            .map(|c| match_card(c.as_ref(), self.networks))
            .fold(BatchSummary::default(), |mut summary, v| {
                summary.record(&v);
                summary
            })
    }

    /// Counts valid and invalid cards without keeping the results.
    ///
    /// Returns `(valid_count, invalid_count)`.
    pub fn count_valid<S: AsRef<str>>(&self, cards: &[S]) -> (usize, usize) {
        let valid = cards
            .iter()
            .filter(|c| match_card(c.as_ref(), self.networks).is_valid())
            .count();

        (valid, cards.len() - valid)
    }

    /// Validates cards in parallel using rayon.
    ///
    /// This is typically faster for large batches (>1000 cards) on
    /// multi-core systems.
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn validate_parallel<S: AsRef<str> + Sync>(&self, cards: &[S]) -> Vec<Validation> {
        use rayon::prelude::*;
        cards
            .par_iter()
            .map(|c| match_card(c.as_ref(), self.networks))
            .collect()
    }

    /// Counts valid and invalid cards in parallel.
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn count_valid_parallel<S: AsRef<str> + Sync>(&self, cards: &[S]) -> (usize, usize) {
        use rayon::prelude::*;

        let valid = cards
            .par_iter()
            .filter(|c| match_card(c.as_ref(), self.networks).is_valid())
            .count();

        (valid, cards.len() - valid)
    }
}

/// Tally of a validated batch.
///
/// `valid + invalid + not_found + bad_request == total`; `invalid` counts
/// cards whose network was identified but that failed the length or Luhn
/// check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchSummary {
    /// Cards in the batch.
    pub total: usize,
    /// Identified and valid.
    pub valid: usize,
    /// Identified but rejected.
    pub invalid: usize,
    /// No network matched.
    pub not_found: usize,
    /// Not a digit string.
    pub bad_request: usize,
}

impl BatchSummary {
    /// Adds one validation to the tally.
    pub fn record(&mut self, validation: &Validation) {
        self.total += 1;
        match validation.outcome() {
            Outcome::BadRequest => self.bad_request += 1,
            Outcome::NotFound => self.not_found += 1,
            Outcome::Ok if validation.is_valid() => self.valid += 1,
            Outcome::Ok => self.invalid += 1,
        }
    }
}

impl<'v> FromIterator<&'v Validation> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'v Validation>>(iter: I) -> Self {
        let mut summary = Self::default();
        for validation in iter {
            summary.record(validation);
        }
        summary
    }
}
