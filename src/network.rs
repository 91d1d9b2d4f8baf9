//! Issuing-network definitions.
//!
//! A [`NetworkDefinition`] describes one card network: the prefixes its
//! numbers start with, an optional numeric range for the leading digits, and
//! the card lengths it issues. Providers hand definitions over in the textual
//! form of [`IssuingNetworkRecord`], which [`IssuingNetworkRecord::parse`]
//! turns into the structured form.

use crate::error::DefinitionError;
use std::fmt;

/// Inclusive numeric range matched against the leading digits of a card.
///
/// The number of leading digits compared is the digit count of `min`, so a
/// range of `2221-2720` looks at the first four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixRange {
    min: u64,
    max: u64,
}

impl PrefixRange {
    /// Creates a range, returning `None` when `min > max`.
    pub const fn new(min: u64, max: u64) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Lower bound (inclusive).
    #[inline]
    pub const fn min(&self) -> u64 {
        self.min
    }

    /// Upper bound (inclusive).
    #[inline]
    pub const fn max(&self) -> u64 {
        self.max
    }

    /// Checks whether `value` lies within the range.
    #[inline]
    pub const fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of leading card digits compared against this range.
    #[inline]
    pub fn digit_count(&self) -> usize {
        decimal_len(self.min)
    }

    /// Reads the leading digits of `card` that this range compares.
    ///
    /// Returns `None` if the card is shorter than [`digit_count`](Self::digit_count)
    /// or the leading characters are not digits.
    pub fn leading_value(&self, card: &str) -> Option<u64> {
        card.get(..self.digit_count())?.parse().ok()
    }
}

impl fmt::Display for PrefixRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Number of decimal digits in `n` (`0` has one digit).
pub(crate) fn decimal_len(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// A structured issuing-network definition.
///
/// Constructed through [`NetworkDefinition::builder`] or
/// [`IssuingNetworkRecord::parse`], both of which enforce that the name is
/// non-blank, the range is ordered and at least one positive length is
/// allowed.
///
/// # Example
///
/// ```
/// use cc_network::NetworkDefinition;
///
/// let visa = NetworkDefinition::builder("Visa")
///     .prefix(4)
///     .lengths([13, 16, 19])
///     .build()
///     .unwrap();
///
/// assert_eq!(visa.name(), "Visa");
/// assert!(visa.allows_length(16));
/// assert!(!visa.allows_length(15));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefinition {
    name: String,
    prefixes: Vec<u64>,
    range: Option<PrefixRange>,
    allowed_lengths: Vec<usize>,
}

impl NetworkDefinition {
    /// Starts building a definition for the named network.
    pub fn builder(name: impl Into<String>) -> NetworkDefinitionBuilder {
        NetworkDefinitionBuilder {
            name: name.into(),
            prefixes: Vec::new(),
            range: None,
            allowed_lengths: Vec::new(),
        }
    }

    /// Network name, e.g. `"Visa"`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured starting prefixes, in declaration order.
    #[inline]
    pub fn prefixes(&self) -> &[u64] {
        &self.prefixes
    }

    /// Configured leading-digit range, if any.
    #[inline]
    pub fn range(&self) -> Option<PrefixRange> {
        self.range
    }

    /// Card lengths this network issues.
    #[inline]
    pub fn allowed_lengths(&self) -> &[usize] {
        &self.allowed_lengths
    }

    /// Returns true if `length` is one of the allowed lengths.
    #[inline]
    pub fn allows_length(&self, length: usize) -> bool {
        self.allowed_lengths.contains(&length)
    }

    /// Converts back into the textual record form.
    pub fn to_record(&self) -> IssuingNetworkRecord {
        IssuingNetworkRecord {
            name: self.name.clone(),
            starts_with_numbers: if self.prefixes.is_empty() {
                None
            } else {
                Some(join(&self.prefixes))
            },
            in_range: self.range.map(|r| r.to_string()),
            allowed_lengths: join(&self.allowed_lengths),
        }
    }
}

impl fmt::Display for NetworkDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.prefixes.is_empty() {
            write!(f, " prefixes={}", join(&self.prefixes))?;
        }
        if let Some(range) = self.range {
            write!(f, " range={}", range)?;
        }
        write!(f, " lengths={}", join(&self.allowed_lengths))
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Builder for [`NetworkDefinition`].
#[derive(Debug, Clone)]
pub struct NetworkDefinitionBuilder {
    name: String,
    prefixes: Vec<u64>,
    range: Option<(u64, u64)>,
    allowed_lengths: Vec<usize>,
}

impl NetworkDefinitionBuilder {
    /// Adds a starting prefix.
    pub fn prefix(mut self, prefix: u64) -> Self {
        self.prefixes.push(prefix);
        self
    }

    /// Adds several starting prefixes.
    pub fn prefixes(mut self, prefixes: impl IntoIterator<Item = u64>) -> Self {
        self.prefixes.extend(prefixes);
        self
    }

    /// Sets the inclusive leading-digit range.
    pub fn range(mut self, min: u64, max: u64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Adds allowed card lengths.
    pub fn lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.allowed_lengths.extend(lengths);
        self
    }

    /// Validates and builds the definition.
    pub fn build(self) -> Result<NetworkDefinition, DefinitionError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        let range = match self.range {
            Some((min, max)) => Some(PrefixRange::new(min, max).ok_or_else(|| {
                DefinitionError::InvertedRange {
                    network: name.clone(),
                    min,
                    max,
                }
            })?),
            None => None,
        };

        if self.allowed_lengths.is_empty() {
            return Err(DefinitionError::NoAllowedLengths { network: name });
        }
        if self.allowed_lengths.contains(&0) {
            return Err(DefinitionError::InvalidLength {
                network: name,
                value: "0".to_string(),
            });
        }

        Ok(NetworkDefinition {
            name,
            prefixes: self.prefixes,
            range,
            allowed_lengths: self.allowed_lengths,
        })
    }
}

/// Textual form of a network definition, as stored by providers.
///
/// - `starts_with_numbers`: comma-separated prefixes, e.g. `"34,37"`
/// - `in_range`: `"min-max"`, e.g. `"2221-2720"`
/// - `allowed_lengths`: comma-separated lengths, e.g. `"16,19"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IssuingNetworkRecord {
    /// Network name.
    pub name: String,

    /// Comma-separated starting prefixes.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "startsWithNumbers", alias = "prefixes")
    )]
    pub starts_with_numbers: Option<String>,

    /// Leading-digit range as `min-max`.
    #[cfg_attr(feature = "serde", serde(default, alias = "inRange", alias = "range"))]
    pub in_range: Option<String>,

    /// Comma-separated allowed lengths.
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "allowedLengths", alias = "lengths")
    )]
    pub allowed_lengths: String,
}

impl IssuingNetworkRecord {
    /// Creates a record with a name and allowed lengths.
    pub fn new(name: impl Into<String>, allowed_lengths: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allowed_lengths: allowed_lengths.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the prefix list.
    pub fn starts_with(mut self, prefixes: impl Into<String>) -> Self {
        self.starts_with_numbers = Some(prefixes.into());
        self
    }

    /// Builder method to set the range.
    pub fn in_range(mut self, range: impl Into<String>) -> Self {
        self.in_range = Some(range.into());
        self
    }

    /// Parses the textual fields into a [`NetworkDefinition`].
    ///
    /// Blank optional fields count as absent. List items are trimmed.
    ///
    /// # Example
    ///
    /// ```
    /// use cc_network::IssuingNetworkRecord;
    ///
    /// let mastercard = IssuingNetworkRecord::new("Mastercard", "16")
    ///     .starts_with("51,52,53,54,55")
    ///     .in_range("2221-2720")
    ///     .parse()
    ///     .unwrap();
    ///
    /// assert_eq!(mastercard.prefixes(), &[51, 52, 53, 54, 55]);
    /// assert_eq!(mastercard.range().unwrap().min(), 2221);
    /// ```
    pub fn parse(&self) -> Result<NetworkDefinition, DefinitionError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        let mut builder = NetworkDefinition::builder(name);

        if let Some(list) = non_blank(self.starts_with_numbers.as_deref()) {
            for item in list.split(',').map(str::trim) {
                let prefix = item
                    .parse::<u64>()
                    .map_err(|_| DefinitionError::InvalidPrefix {
                        network: name.to_string(),
                        value: item.to_string(),
                    })?;
                builder = builder.prefix(prefix);
            }
        }

        if let Some(text) = non_blank(self.in_range.as_deref()) {
            let (min, max) = parse_range(text).ok_or_else(|| DefinitionError::InvalidRange {
                network: name.to_string(),
                value: text.to_string(),
            })?;
            builder = builder.range(min, max);
        }

        if let Some(list) = non_blank(Some(self.allowed_lengths.as_str())) {
            for item in list.split(',').map(str::trim) {
                let length = item
                    .parse::<usize>()
                    .ok()
                    .filter(|&l| l > 0)
                    .ok_or_else(|| DefinitionError::InvalidLength {
                        network: name.to_string(),
                        value: item.to_string(),
                    })?;
                builder = builder.lengths([length]);
            }
        }

        builder.build()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_range(text: &str) -> Option<(u64, u64)> {
    let (min, max) = text.split_once('-')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

/// Parses a list of records, stopping at the first invalid one.
pub fn parse_records<'a, I>(records: I) -> Result<Vec<NetworkDefinition>, DefinitionError>
where
    I: IntoIterator<Item = &'a IssuingNetworkRecord>,
{
    records.into_iter().map(IssuingNetworkRecord::parse).collect()
}
