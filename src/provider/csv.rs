//! CSV network definition loader.
//!
//! Loads issuing-network records from CSV into a [`MemoryProvider`].
//!
//! # Feature
//!
//! Requires the `networks-csv` feature.
//!
//! # Supported Format
//!
//! ```csv
//! name,starts_with_numbers,in_range,allowed_lengths
//! Visa,4,,"13,16,19"
//! Mastercard,"51,52,53,54,55",2221-2720,16
//! ```
//!
//! Column order doesn't matter as long as headers are present. The `name` and
//! `allowed_lengths` columns are required. Lists containing commas must be
//! quoted. Row order is matching order.

use super::{MemoryProvider, ProviderError};
use crate::network::IssuingNetworkRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV network definition loader.
pub struct CsvNetworkLoader;

impl CsvNetworkLoader {
    /// Loads network definitions from a CSV file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use cc_network::provider::CsvNetworkLoader;
    ///
    /// let provider = CsvNetworkLoader::from_file("networks.csv")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MemoryProvider, ProviderError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads network definitions from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<MemoryProvider, ProviderError> {
        Self::from_reader_with_delimiter(reader, b',')
    }

    /// Loads network definitions from a CSV string.
    pub fn parse(csv: &str) -> Result<MemoryProvider, ProviderError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Loads network definitions with a custom delimiter.
    pub fn from_reader_with_delimiter<R: Read>(
        reader: R,
        delimiter: u8,
    ) -> Result<MemoryProvider, ProviderError> {
        let records = Self::read_records(reader, delimiter)?;
        Ok(MemoryProvider::from_records(&records)?)
    }

    /// Reads the textual records without parsing them into definitions.
    pub fn read_records<R: Read>(
        reader: R,
        delimiter: u8,
    ) -> Result<Vec<IssuingNetworkRecord>, ProviderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| ProviderError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let col_map = ColumnMap::from_headers(&headers)?;
        let mut records = Vec::new();

        for result in csv_reader.records() {
            let row =
                result.map_err(|e| ProviderError::ParseError(format!("CSV parse error: {}", e)))?;

            if let Some(record) = col_map.parse_row(&row) {
                records.push(record);
            }
        }

        Ok(records)
    }
}

/// Maps CSV column names to indices.
struct ColumnMap {
    name: usize,
    starts_with_numbers: Option<usize>,
    in_range: Option<usize>,
    allowed_lengths: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ProviderError> {
        let mut name_col = None;
        let mut prefixes_col = None;
        let mut range_col = None;
        let mut lengths_col = None;

        for (i, header) in headers.iter().enumerate() {
            match header.to_lowercase().trim() {
                "name" | "network" | "network_name" => name_col = Some(i),
                "starts_with_numbers" | "startswithnumbers" | "prefixes" | "prefix" => {
                    prefixes_col = Some(i)
                }
                "in_range" | "inrange" | "range" => range_col = Some(i),
                "allowed_lengths" | "allowedlengths" | "lengths" => lengths_col = Some(i),
                _ => {}
            }
        }

        let name = name_col
            .ok_or_else(|| ProviderError::ParseError("Missing required 'name' column".to_string()))?;
        let allowed_lengths = lengths_col.ok_or_else(|| {
            ProviderError::ParseError("Missing required 'allowed_lengths' column".to_string())
        })?;

        Ok(Self {
            name,
            starts_with_numbers: prefixes_col,
            in_range: range_col,
            allowed_lengths,
        })
    }

    /// Returns `None` for rows with every field blank.
    fn parse_row(&self, row: &csv::StringRecord) -> Option<IssuingNetworkRecord> {
        if row.iter().all(|field| field.trim().is_empty()) {
            return None;
        }

        let get_field = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        Some(IssuingNetworkRecord {
            name: get_field(Some(self.name)).unwrap_or_default(),
            starts_with_numbers: get_field(self.starts_with_numbers),
            in_range: get_field(self.in_range),
            allowed_lengths: get_field(Some(self.allowed_lengths)).unwrap_or_default(),
        })
    }
}
