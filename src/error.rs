//! Error types for issuing-network definitions.
//!
//! Validating a card never fails: a bad card is reported through
//! [`Outcome`](crate::Outcome). Errors only arise when building or parsing the
//! network definitions the matcher runs against.

use std::fmt;

/// Errors raised while building or parsing a network definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The network name was empty or whitespace.
    EmptyName,

    /// An entry of the prefix list is not a non-negative integer.
    InvalidPrefix {
        /// The network being parsed.
        network: String,
        /// The offending list entry.
        value: String,
    },

    /// The range is not of the form `min-max` with non-negative integers.
    InvalidRange {
        /// The network being parsed.
        network: String,
        /// The offending range text.
        value: String,
    },

    /// The range lower bound exceeds its upper bound.
    InvertedRange {
        /// The network being parsed.
        network: String,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    /// An allowed length is not a positive integer.
    InvalidLength {
        /// The network being parsed.
        network: String,
        /// The offending list entry.
        value: String,
    },

    /// The network declares no allowed lengths.
    NoAllowedLengths {
        /// The network being parsed.
        network: String,
    },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "network name is empty"),

            Self::InvalidPrefix { network, value } => {
                write!(
                    f,
                    "network '{}': invalid prefix '{}' (expected a non-negative integer)",
                    network, value
                )
            }

            Self::InvalidRange { network, value } => {
                write!(
                    f,
                    "network '{}': invalid range '{}' (expected min-max)",
                    network, value
                )
            }

            Self::InvertedRange { network, min, max } => {
                write!(
                    f,
                    "network '{}': range minimum {} exceeds maximum {}",
                    network, min, max
                )
            }

            Self::InvalidLength { network, value } => {
                write!(
                    f,
                    "network '{}': invalid allowed length '{}' (expected a positive integer)",
                    network, value
                )
            }

            Self::NoAllowedLengths { network } => {
                write!(f, "network '{}': no allowed lengths", network)
            }
        }
    }
}

impl std::error::Error for DefinitionError {}
