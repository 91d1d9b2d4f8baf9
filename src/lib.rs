//! # cc_network
//!
//! Credit card validation against configurable issuing-network definitions.
//!
//! ## Features
//!
//! - Luhn algorithm validation (13 to 19 digits)
//! - Issuing-network identification from data-driven definitions
//!   (prefixes, a leading-digit range, allowed lengths)
//! - Definitions from a built-in dataset, JSON, CSV or SQLite
//! - Card number masking for display and logging
//! - Multiple interfaces: library, CLI, REST API
//!
//! ## Quick Start
//!
//! ```rust
//! use cc_network::{BuiltinProvider, CardValidator, Outcome};
//!
//! let validator = CardValidator::new(BuiltinProvider);
//!
//! let validation = validator.validate("4111111111111111").unwrap();
//! assert_eq!(validation.outcome(), Outcome::Ok);
//! assert!(validation.is_valid());
//! assert_eq!(validation.network_name(), Some("Visa"));
//!
//! // Quick boolean check
//! assert!(cc_network::luhn::is_valid("4111111111111111"));
//! assert!(!cc_network::luhn::is_valid("4111111111111112"));
//! ```
//!
//! ## Outcomes
//!
//! ```rust
//! use cc_network::{validate_with, NetworkDefinition, Outcome, Rejection};
//!
//! let networks = vec![
//!     NetworkDefinition::builder("Visa").prefix(4).lengths([16]).build().unwrap(),
//! ];
//!
//! // Only ASCII digits are accepted
//! assert_eq!(validate_with("4111-abcd", &networks).outcome(), Outcome::BadRequest);
//!
//! // No definition matches
//! assert_eq!(validate_with("9111111111111111", &networks).outcome(), Outcome::NotFound);
//!
//! // Network identified, but the length is not allowed
//! let v = validate_with("4111111111111", &networks);
//! assert_eq!(v.outcome(), Outcome::Ok);
//! assert!(!v.is_valid());
//! assert_eq!(v.network_name(), Some("Visa"));
//! assert_eq!(v.rejection(), Some(Rejection::LengthNotAllowed { length: 13 }));
//! ```
//!
//! ## Network Definitions
//!
//! ```rust
//! use cc_network::{IssuingNetworkRecord, MemoryProvider, CardValidator};
//!
//! let records = vec![
//!     IssuingNetworkRecord::new("Mastercard", "16")
//!         .starts_with("51,52,53,54,55")
//!         .in_range("2221-2720"),
//! ];
//! let provider = MemoryProvider::from_records(&records).unwrap();
//! let validator = CardValidator::new(provider);
//!
//! let v = validator.validate("2223000048400011").unwrap();
//! assert_eq!(v.network_name(), Some("Mastercard"));
//! ```
//!
//! Definitions are tried in list order and the first match wins. Within one
//! definition the prefixes are checked before the range.
//!
//! ## Batch Processing
//!
//! ```rust
//! use cc_network::provider::{BuiltinProvider, NetworkProvider};
//! use cc_network::BatchValidator;
//!
//! let networks = BuiltinProvider.networks().unwrap();
//! let batch = BatchValidator::new(&networks);
//! let cards = vec!["4111111111111111", "5500000000000004", "invalid"];
//!
//! let summary = batch.summarize(&cards);
//! assert_eq!(summary.valid, 2);
//! assert_eq!(summary.bad_request, 1);
//! ```
//!
//! ## Built-in Networks
//!
//! | Network | Prefixes | Range | Lengths |
//! |---------|----------|-------|---------|
//! | Visa | 4 | | 13, 16, 19 |
//! | Mastercard | 51-55 | 2221-2720 | 16 |
//! | American Express | 34, 37 | | 15 |
//! | Discover | 6011, 644-649, 65 | 622126-622925 | 16-19 |
//! | Diners Club | 36, 38, 300-305 | | 14-19 |
//! | JCB | | 3528-3589 | 16-19 |
//! | UnionPay | 62 | | 16-19 |
//! | Maestro | 5018, 5020, 5038, 5893, 6304, 6759, 6761-6763 | | 12-19 |
//! | Mir | | 2200-2204 | 16-19 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `generate` | Random test card generation |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//! | `parallel` | Rayon-based parallelism |
//! | `networks-json` | JSON definition loader |
//! | `networks-csv` | CSV definition loader |
//! | `networks-sqlite` | SQLite definition provider |
//!
//! ## Security
//!
//! - Card numbers are only ever logged masked
//! - `CardNumber` is zeroized on drop and its `Debug`/`Display` are masked;
//!   the CLI and server hold every received card number in one
//!   (`CardValidator::validate_card`). Plain `&str` APIs leave the caller's
//!   buffer as it is.
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod card;
pub mod error;
pub mod generate;
pub mod luhn;
pub mod mask;
pub mod matcher;
pub mod network;
pub mod outcome;
pub mod provider;
pub mod validate;

// Re-export main types at crate root
pub use batch::{BatchSummary, BatchValidator};
pub use card::CardNumber;
pub use error::DefinitionError;
pub use network::{IssuingNetworkRecord, NetworkDefinition, PrefixRange};
pub use outcome::{MatchCriterion, Outcome, Rejection, Validation, ValidationResult};
pub use provider::{BuiltinProvider, MemoryProvider, NetworkProvider, ProviderError};
pub use validate::{validate_with, CardValidator};

#[cfg(test)]
mod tests {
    use super::*;

    // Standard test card numbers from payment processors
    const VISA_16: &str = "4111111111111111";
    const VISA_13: &str = "4222222222222";
    const MASTERCARD: &str = "5555555555554444";
    const MASTERCARD_2: &str = "5105105105105100";
    const MASTERCARD_2_SERIES: &str = "2223000048400011";
    const AMEX: &str = "378282246310005";
    const AMEX_2: &str = "371449635398431";
    const DISCOVER: &str = "6011111111111117";
    const DISCOVER_644: &str = "6445644564456445";
    const DINERS: &str = "30569309025904";
    const DINERS_38: &str = "38520000023237";
    const JCB: &str = "3530111333300000";
    const JCB_2: &str = "3566002020360505";

    fn validate(card: &str) -> Validation {
        CardValidator::new(BuiltinProvider).validate(card).unwrap()
    }

    fn assert_valid(card: &str, network: &str) {
        let v = validate(card);
        assert_eq!(v.outcome(), Outcome::Ok, "{}", card);
        assert_eq!(v.network_name(), Some(network), "{}", card);
        assert!(v.is_valid(), "{} rejected: {:?}", card, v.rejection());
    }

    #[test]
    fn test_visa_validation() {
        assert_valid(VISA_16, "Visa");
        assert_valid(VISA_13, "Visa");
    }

    #[test]
    fn test_mastercard_validation() {
        assert_valid(MASTERCARD, "Mastercard");
        assert_valid(MASTERCARD_2, "Mastercard");
        assert_valid(MASTERCARD_2_SERIES, "Mastercard");

        let v = validate(MASTERCARD_2_SERIES);
        assert_eq!(
            v.matched(),
            Some(MatchCriterion::Range(PrefixRange::new(2221, 2720).unwrap()))
        );
    }

    #[test]
    fn test_amex_validation() {
        assert_valid(AMEX, "American Express");
        assert_valid(AMEX_2, "American Express");
    }

    #[test]
    fn test_discover_validation() {
        assert_valid(DISCOVER, "Discover");
        assert_valid(DISCOVER_644, "Discover");
    }

    #[test]
    fn test_diners_validation() {
        assert_valid(DINERS, "Diners Club");
        assert_valid(DINERS_38, "Diners Club");
    }

    #[test]
    fn test_jcb_validation() {
        assert_valid(JCB, "JCB");
        assert_valid(JCB_2, "JCB");
    }

    #[test]
    fn test_formatted_input_is_bad_request() {
        assert_eq!(validate("4111-1111-1111-1111").outcome(), Outcome::BadRequest);
        assert_eq!(validate("4111 1111 1111 1111").outcome(), Outcome::BadRequest);
        assert_eq!(validate("4111-abcd").outcome(), Outcome::BadRequest);
    }

    #[test]
    fn test_invalid_checksum() {
        let v = validate("4111111111111112");
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(!v.is_valid());
        assert_eq!(v.network_name(), Some("Visa"));
        assert_eq!(v.rejection(), Some(Rejection::ChecksumFailed));
    }

    #[test]
    fn test_length_not_allowed() {
        // 15-digit Luhn-valid Visa-prefixed number
        let card = generate::complete_with_check_digit("4", 15).unwrap();
        assert!(luhn::is_valid(&card));

        let v = validate(&card);
        assert_eq!(v.outcome(), Outcome::Ok);
        assert!(!v.is_valid());
        assert_eq!(v.rejection(), Some(Rejection::LengthNotAllowed { length: 15 }));
    }

    #[test]
    fn test_not_found() {
        let v = validate("9111111111111111");
        assert_eq!(v.outcome(), Outcome::NotFound);
        assert_eq!(v.network_name(), None);
        assert!(!v.is_valid());
        assert_eq!(v.message(), "Not Found");
    }

    #[test]
    fn test_empty_input() {
        // The empty string is numeric and simply matches nothing
        assert_eq!(validate("").outcome(), Outcome::NotFound);
    }

    #[test]
    fn test_luhn_single_digit_alteration() {
        let digits: Vec<char> = VISA_16.chars().collect();
        for i in 0..digits.len() {
            for replacement in '0'..='9' {
                if replacement == digits[i] {
                    continue;
                }
                let mut altered = digits.clone();
                altered[i] = replacement;
                let altered: String = altered.into_iter().collect();
                assert!(!luhn::is_valid(&altered), "{}", altered);
            }
        }
    }

    #[test]
    fn test_first_match_wins_in_list_order() {
        let networks = vec![
            NetworkDefinition::builder("Broad").prefix(4).lengths([16]).build().unwrap(),
            NetworkDefinition::builder("Narrow")
                .prefix(4111)
                .lengths([16])
                .build()
                .unwrap(),
        ];
        assert_eq!(validate_with(VISA_16, &networks).network_name(), Some("Broad"));
    }

    #[test]
    fn test_discover_range_shadows_unionpay() {
        let card = generate::complete_with_check_digit("622126", 16).unwrap();
        assert_valid(&card, "Discover");

        let card = generate::complete_with_check_digit("6200", 16).unwrap();
        assert_valid(&card, "UnionPay");
    }

    #[test]
    fn test_card_number_wrapper() {
        let card = CardNumber::new(VISA_16);
        let v = validate(card.as_str());
        assert!(v.is_valid());
        assert!(!format!("{:?}", card).contains(VISA_16));
    }

    #[test]
    fn test_thread_safety() {
        // Ensure types are Send + Sync
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validation>();
        assert_send_sync::<NetworkDefinition>();
        assert_send_sync::<DefinitionError>();
        assert_send_sync::<ProviderError>();
        assert_send_sync::<CardValidator<MemoryProvider>>();
        assert_send_sync::<BatchValidator<'static>>();
    }
}
