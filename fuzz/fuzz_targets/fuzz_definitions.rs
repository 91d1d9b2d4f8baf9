//! Fuzz target for definition parsing.
//!
//! Arbitrary records and JSON documents must either load or fail with an
//! error, never panic, and whatever loads must be safe to match against.

#![no_main]

use arbitrary::Arbitrary;
use cc_network::provider::JsonNetworkLoader;
use cc_network::{validate_with, IssuingNetworkRecord, MemoryProvider};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Record {
    name: String,
    starts_with_numbers: Option<String>,
    in_range: Option<String>,
    allowed_lengths: String,
}

#[derive(Debug, Arbitrary)]
struct Input {
    records: Vec<Record>,
    document: String,
    card: String,
}

fuzz_target!(|input: Input| {
    let records: Vec<IssuingNetworkRecord> = input
        .records
        .into_iter()
        .map(|r| IssuingNetworkRecord {
            name: r.name,
            starts_with_numbers: r.starts_with_numbers,
            in_range: r.in_range,
            allowed_lengths: r.allowed_lengths,
        })
        .collect();

    if let Ok(provider) = MemoryProvider::from_records(&records) {
        let validation = validate_with(&input.card, provider.as_slice());
        if validation.is_valid() {
            assert!(cc_network::luhn::is_valid(&input.card));
        }
    }

    if let Ok(provider) = JsonNetworkLoader::parse(&input.document) {
        let _ = validate_with(&input.card, provider.as_slice());
    }
});
