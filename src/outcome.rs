//! Results of validating a card against network definitions.

use crate::network::PrefixRange;
use std::fmt;

/// Tri-state outcome code of a validation.
///
/// `Ok` means a network was identified; whether the card is actually valid is
/// carried separately by [`ValidationResult::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The input contained something other than ASCII digits.
    BadRequest,
    /// No network definition matched the card.
    NotFound,
    /// A network was identified.
    Ok,
}

impl Outcome {
    /// Human-readable status text.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Ok => "Ok",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Network name and final verdict for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Identified network, absent on `BadRequest` and `NotFound`.
    pub network_name: Option<String>,
    /// True only if a network matched, the length is allowed and Luhn passes.
    pub is_valid: bool,
}

/// Which rule of a definition selected the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchCriterion {
    /// The card starts with this prefix.
    Prefix(u64),
    /// The card's leading digits fall inside this range.
    Range(PrefixRange),
}

impl fmt::Display for MatchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(p) => write!(f, "prefix {}", p),
            Self::Range(r) => write!(f, "range {}", r),
        }
    }
}

/// Why a card with an identified network was still rejected.
///
/// These cases keep the `Ok` outcome with `is_valid == false`; the rejection
/// tells callers which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The card length is not among the network's allowed lengths.
    LengthNotAllowed {
        /// Length of the card number.
        length: usize,
    },
    /// The Luhn checksum failed (or the digit count was outside 13..=19).
    ChecksumFailed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthNotAllowed { length } => {
                write!(f, "length {} is not allowed for this network", length)
            }
            Self::ChecksumFailed => write!(f, "invalid checksum (Luhn check failed)"),
        }
    }
}

/// Full validation report for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    outcome: Outcome,
    result: ValidationResult,
    matched: Option<MatchCriterion>,
    rejection: Option<Rejection>,
}

impl Validation {
    pub(crate) fn bad_request() -> Self {
        Self {
            outcome: Outcome::BadRequest,
            result: ValidationResult::default(),
            matched: None,
            rejection: None,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self {
            outcome: Outcome::NotFound,
            result: ValidationResult::default(),
            matched: None,
            rejection: None,
        }
    }

    pub(crate) fn identified(
        network: &str,
        matched: MatchCriterion,
        rejection: Option<Rejection>,
    ) -> Self {
        Self {
            outcome: Outcome::Ok,
            result: ValidationResult {
                network_name: Some(network.to_string()),
                is_valid: rejection.is_none(),
            },
            matched: Some(matched),
            rejection,
        }
    }

    /// The outcome code.
    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Network name and verdict.
    #[inline]
    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    /// Consumes the report, returning the network name and verdict.
    pub fn into_result(self) -> ValidationResult {
        self.result
    }

    /// Shorthand for `result().is_valid`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.result.is_valid
    }

    /// Shorthand for `result().network_name`.
    #[inline]
    pub fn network_name(&self) -> Option<&str> {
        self.result.network_name.as_deref()
    }

    /// The rule that selected the network, when one was identified.
    #[inline]
    pub fn matched(&self) -> Option<MatchCriterion> {
        self.matched
    }

    /// The failed check, when a network was identified but the card is invalid.
    #[inline]
    pub fn rejection(&self) -> Option<Rejection> {
        self.rejection
    }

    /// Status text: the network name once identified, otherwise the outcome
    /// message (`"Bad Request"` or `"Not Found"`).
    pub fn message(&self) -> &str {
        self.network_name().unwrap_or(self.outcome.message())
    }
}
