//! Card validation against a network provider.
//!
//! [`CardValidator`] asks its provider for the current definitions on every
//! call and hands them to the matcher, so changes to the underlying source
//! take effect without rebuilding the validator.
//!
//! # Example
//!
//! ```
//! use cc_network::{BuiltinProvider, CardValidator, Outcome};
//!
//! let validator = CardValidator::new(BuiltinProvider);
//!
//! let validation = validator.validate("4111111111111111").unwrap();
//! assert_eq!(validation.outcome(), Outcome::Ok);
//! assert_eq!(validation.message(), "Visa");
//!
//! let validation = validator.validate("4111-abcd").unwrap();
//! assert_eq!(validation.message(), "Bad Request");
//! ```

use crate::card::CardNumber;
use crate::matcher::match_card;
use crate::network::NetworkDefinition;
use crate::outcome::Validation;
use crate::provider::{NetworkProvider, ProviderError};
use tracing::warn;

/// Validates card numbers against the definitions of a [`NetworkProvider`].
#[derive(Debug, Clone, Default)]
pub struct CardValidator<P> {
    provider: P,
}

impl<P: NetworkProvider> CardValidator<P> {
    /// Creates a validator over `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Consumes the validator, returning the provider.
    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Validates one card number.
    ///
    /// Fails only if the provider cannot produce its definitions. The card
    /// itself never causes an error; see [`Validation::outcome`].
    pub fn validate(&self, input: &str) -> Result<Validation, ProviderError> {
        let networks = self.load()?;
        Ok(match_card(input, &networks))
    }

    /// Validates a card number held in a [`CardNumber`].
    ///
    /// Same as [`validate`](Self::validate); the number stays inside the
    /// zeroizing wrapper for its whole lifetime.
    pub fn validate_card(&self, card: &CardNumber) -> Result<Validation, ProviderError> {
        self.validate(card.as_str())
    }

    /// Validates many card numbers against a single fetch of definitions.
    ///
    /// Accepts anything that borrows as `str`, including [`CardNumber`].
    pub fn validate_batch<I, S>(&self, inputs: I) -> Result<Vec<Validation>, ProviderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let networks = self.load()?;
        Ok(inputs
            .into_iter()
            .map(|input| match_card(input.as_ref(), &networks))
            .collect())
    }

    fn load(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        self.provider.networks().map_err(|err| {
            warn!(error = %err, "failed to load network definitions");
            err
        })
    }
}

/// Validates `card` against an already loaded list of definitions.
///
/// Equivalent to [`matcher::match_card`](crate::matcher::match_card).
#[inline]
pub fn validate_with(card: &str, definitions: &[NetworkDefinition]) -> Validation {
    match_card(card, definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::IssuingNetworkRecord;
    use crate::outcome::{Outcome, Rejection};
    use crate::provider::{BuiltinProvider, MemoryProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FailingProvider;

    impl NetworkProvider for FailingProvider {
        fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
            Err(ProviderError::ParseError("unavailable".to_string()))
        }
    }

    /// Counts fetches and serves whatever records it currently holds.
    #[derive(Default)]
    struct CountingProvider {
        records: Mutex<Vec<IssuingNetworkRecord>>,
        fetches: AtomicUsize,
    }

    impl NetworkProvider for CountingProvider {
        fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let records = self
                .records
                .lock()
                .map_err(|_| ProviderError::ParseError("poisoned".to_string()))?;
            Ok(crate::network::parse_records(records.iter())?)
        }
    }

    #[test]
    fn test_validate_visa() {
        let validator = CardValidator::new(BuiltinProvider);
        let v = validator.validate("4111111111111111").unwrap();
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(v.is_valid());
        assert_eq!(v.network_name(), Some("Visa"));
        assert_eq!(v.message(), "Visa");
    }

    #[test]
    fn test_validate_outcomes() {
        let validator = CardValidator::new(BuiltinProvider);

        let bad = validator.validate("4111-abcd").unwrap();
        assert_eq!(bad.outcome(), Outcome::BadRequest);
        assert_eq!(bad.message(), "Bad Request");

        let missing = validator.validate("9999999999999995").unwrap();
        assert_eq!(missing.outcome(), Outcome::NotFound);
        assert_eq!(missing.message(), "Not Found");

        let short = validator.validate("41111111111").unwrap();
        assert_eq!(short.outcome(), Outcome::Ok);
        assert!(!short.is_valid());
        assert_eq!(short.network_name(), Some("Visa"));
        assert_eq!(
            short.rejection(),
            Some(Rejection::LengthNotAllowed { length: 11 })
        );
    }

    #[test]
    fn test_provider_error_propagates() {
        let validator = CardValidator::new(FailingProvider);
        assert!(matches!(
            validator.validate("4111111111111111"),
            Err(ProviderError::ParseError(_))
        ));
        assert!(validator.validate_batch(["4111111111111111"]).is_err());
    }

    #[test]
    fn test_definitions_loaded_per_call() {
        let validator = CardValidator::new(CountingProvider::default());

        let before = validator.validate("378282246310005").unwrap();
        assert_eq!(before.outcome(), Outcome::NotFound);

        validator
            .provider()
            .records
            .lock()
            .unwrap()
            .push(IssuingNetworkRecord::new("American Express", "15").starts_with("34,37"));

        let after = validator.validate("378282246310005").unwrap();
        assert_eq!(after.network_name(), Some("American Express"));
        assert_eq!(validator.provider().fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_batch_fetches_once() {
        let provider = CountingProvider::default();
        provider
            .records
            .lock()
            .unwrap()
            .push(IssuingNetworkRecord::new("Visa", "16").starts_with("4"));
        let validator = CardValidator::new(provider);

        let results = validator
            .validate_batch(["4111111111111111", "4111111111111112", "abc"])
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_valid());
        assert_eq!(results[1].rejection(), Some(Rejection::ChecksumFailed));
        assert_eq!(results[2].outcome(), Outcome::BadRequest);
        assert_eq!(validator.provider().fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_validate_with() {
        let provider = MemoryProvider::from_records(&[
            IssuingNetworkRecord::new("Visa", "16").starts_with("4"),
        ])
        .unwrap();

        let v = validate_with("4111111111111111", provider.as_slice());
        assert!(v.is_valid());
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardValidator<BuiltinProvider>>();
        assert_send_sync::<CardValidator<Box<dyn NetworkProvider>>>();
    }

    #[test]
    fn test_validate_card_number_wrapper() {
        let validator = CardValidator::new(BuiltinProvider);
        let card = CardNumber::new("378282246310005");

        let v = validator.validate_card(&card).unwrap();
        assert_eq!(v, validator.validate(card.as_str()).unwrap());
        assert_eq!(v.network_name(), Some("American Express"));
    }

    #[test]
    fn test_batch_of_card_numbers() {
        let validator = CardValidator::new(BuiltinProvider);
        let cards: Vec<CardNumber> = ["4111111111111111", "4111-abcd"]
            .into_iter()
            .map(CardNumber::from)
            .collect();

        let results = validator.validate_batch(&cards).unwrap();
        assert!(results[0].is_valid());
        assert_eq!(results[1].outcome(), Outcome::BadRequest);
    }
}
