//! In-memory network provider.

use super::{NetworkProvider, ProviderError};
use crate::error::DefinitionError;
use crate::network::{IssuingNetworkRecord, NetworkDefinition};

/// Network definitions held in memory, in insertion order.
///
/// # Example
///
/// ```
/// use cc_network::provider::{MemoryProvider, NetworkProvider};
/// use cc_network::IssuingNetworkRecord;
///
/// let mut provider = MemoryProvider::new();
/// provider
///     .insert_record(&IssuingNetworkRecord::new("Visa", "13,16,19").starts_with("4"))
///     .unwrap();
///
/// assert_eq!(provider.networks().unwrap()[0].name(), "Visa");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    networks: Vec<NetworkDefinition>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty provider with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            networks: Vec::with_capacity(capacity),
        }
    }

    /// Appends a definition; it is tried after all earlier ones.
    pub fn insert(&mut self, network: NetworkDefinition) {
        self.networks.push(network);
    }

    /// Parses and appends a textual record.
    pub fn insert_record(&mut self, record: &IssuingNetworkRecord) -> Result<(), DefinitionError> {
        self.networks.push(record.parse()?);
        Ok(())
    }

    /// Builds a provider from textual records, failing on the first bad one.
    pub fn from_records<'a, I>(records: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = &'a IssuingNetworkRecord>,
    {
        let networks = crate::network::parse_records(records)?;
        Ok(Self { networks })
    }

    /// Returns an iterator over the definitions in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkDefinition> {
        self.networks.iter()
    }

    /// Borrows the definitions without cloning.
    pub fn as_slice(&self) -> &[NetworkDefinition] {
        &self.networks
    }

    /// Removes all definitions.
    pub fn clear(&mut self) {
        self.networks.clear();
    }
}

impl From<Vec<NetworkDefinition>> for MemoryProvider {
    fn from(networks: Vec<NetworkDefinition>) -> Self {
        Self { networks }
    }
}

impl NetworkProvider for MemoryProvider {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        Ok(self.networks.clone())
    }

    fn len(&self) -> Result<usize, ProviderError> {
        Ok(self.networks.len())
    }
}

/// Builder for creating MemoryProvider instances.
#[derive(Debug, Default)]
pub struct MemoryProviderBuilder {
    networks: Vec<NetworkDefinition>,
    records: Vec<(usize, IssuingNetworkRecord)>,
}

impl MemoryProviderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a structured definition.
    pub fn add(mut self, network: NetworkDefinition) -> Self {
        self.networks.push(network);
        self
    }

    /// Adds a textual record, parsed when the provider is built.
    pub fn add_record(mut self, record: IssuingNetworkRecord) -> Self {
        let position = self.networks.len() + self.records.len();
        self.records.push((position, record));
        self
    }

    /// Parses pending records and builds the provider, keeping the order in
    /// which definitions and records were added.
    pub fn build(self) -> Result<MemoryProvider, DefinitionError> {
        let total = self.networks.len() + self.records.len();
        let mut parsed = self.records.into_iter().peekable();
        let mut structured = self.networks.into_iter();
        let mut networks = Vec::with_capacity(total);

        for position in 0..total {
            let next = match parsed.next_if(|(p, _)| *p == position) {
                Some((_, record)) => record.parse()?,
                None => match structured.next() {
                    Some(network) => network,
                    None => break,
                },
            };
            networks.push(next);
        }

        Ok(MemoryProvider { networks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_card;

    fn visa() -> NetworkDefinition {
        NetworkDefinition::builder("Visa")
            .prefix(4)
            .lengths([13, 16, 19])
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut provider = MemoryProvider::new();
        provider.insert(visa());
        provider
            .insert_record(&IssuingNetworkRecord::new("Amex", "15").starts_with("34,37"))
            .unwrap();

        let names: Vec<_> = provider.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, ["Visa", "Amex"]);
        assert_eq!(provider.len().unwrap(), 2);
    }

    #[test]
    fn test_insert_bad_record() {
        let mut provider = MemoryProvider::new();
        let err = provider
            .insert_record(&IssuingNetworkRecord::new("Bad", "16").in_range("9-1"))
            .unwrap_err();
        assert!(matches!(err, DefinitionError::InvertedRange { .. }));
        assert!(provider.is_empty().unwrap());
    }

    #[test]
    fn test_builder_interleaves_in_order() {
        let provider = MemoryProviderBuilder::new()
            .add_record(IssuingNetworkRecord::new("First", "16").starts_with("4111"))
            .add(visa())
            .add_record(IssuingNetworkRecord::new("Last", "16").starts_with("4"))
            .build()
            .unwrap();

        let names: Vec<_> = provider.iter().map(|n| n.name()).collect();
        assert_eq!(names, ["First", "Visa", "Last"]);
    }

    #[test]
    fn test_builder_reports_bad_record() {
        let result = MemoryProviderBuilder::new()
            .add(visa())
            .add_record(IssuingNetworkRecord::new("Bad", ""))
            .build();
        assert!(matches!(result, Err(DefinitionError::NoAllowedLengths { .. })));
    }

    #[test]
    fn test_from_records() {
        let records = vec![IssuingNetworkRecord::new("Visa", "16").starts_with("4")];
        let provider = MemoryProvider::from_records(&records).unwrap();
        let v = match_card("4111111111111111", provider.as_slice());
        assert!(v.is_valid());
    }

    #[test]
    fn test_clear() {
        let mut provider = MemoryProvider::from(vec![visa()]);
        assert!(!provider.is_empty().unwrap());
        provider.clear();
        assert!(provider.is_empty().unwrap());
    }
}
