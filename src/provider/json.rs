//! JSON network definition loader.
//!
//! Loads issuing-network records from JSON into a [`MemoryProvider`].
//!
//! # Feature
//!
//! Requires the `networks-json` feature.
//!
//! # Supported Formats
//!
//! ## Array format
//!
//! ```json
//! [
//!   {
//!     "name": "Mastercard",
//!     "startsWithNumbers": "51,52,53,54,55",
//!     "inRange": "2221-2720",
//!     "allowedLengths": "16"
//!   }
//! ]
//! ```
//!
//! ## Wrapped format
//!
//! ```json
//! { "networks": [ { "name": "Visa", "prefixes": "4", "lengths": "13,16,19" } ] }
//! ```
//!
//! Array position is matching order. Objects keyed by network name are not
//! accepted since JSON object keys carry no order.

use super::{MemoryProvider, ProviderError};
use crate::network::IssuingNetworkRecord;
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

/// JSON network definition loader.
pub struct JsonNetworkLoader;

impl JsonNetworkLoader {
    /// Loads network definitions from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use cc_network::provider::JsonNetworkLoader;
    ///
    /// let provider = JsonNetworkLoader::from_file("networks.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MemoryProvider, ProviderError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Loads network definitions from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<MemoryProvider, ProviderError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Loads network definitions from a JSON string.
    pub fn parse(json: &str) -> Result<MemoryProvider, ProviderError> {
        let records = Self::parse_records(json)?;
        Ok(MemoryProvider::from_records(&records)?)
    }

    /// Reads the textual records without parsing them into definitions.
    pub fn parse_records(json: &str) -> Result<Vec<IssuingNetworkRecord>, ProviderError> {
        let document: JsonDocument = serde_json::from_str(json)
            .map_err(|e| ProviderError::ParseError(format!("JSON parse error: {}", e)))?;

        Ok(match document {
            JsonDocument::List(records) => records,
            JsonDocument::Wrapped { networks } => networks,
            JsonDocument::Single(record) => vec![record],
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<IssuingNetworkRecord>),
    Wrapped { networks: Vec<IssuingNetworkRecord> },
    Single(IssuingNetworkRecord),
}
