//! Reference dataset of issuing networks shipped with the crate.

use super::{NetworkProvider, ProviderError};
use crate::network::{parse_records, IssuingNetworkRecord, NetworkDefinition};

/// Name, prefixes, range, allowed lengths. Order is matching order.
const REFERENCE_NETWORKS: &[(&str, Option<&str>, Option<&str>, &str)] = &[
    ("Visa", Some("4"), None, "13,16,19"),
    ("Mastercard", Some("51,52,53,54,55"), Some("2221-2720"), "16"),
    ("American Express", Some("34,37"), None, "15"),
    (
        "Discover",
        Some("6011,644,645,646,647,648,649,65"),
        Some("622126-622925"),
        "16,17,18,19",
    ),
    (
        "Diners Club",
        Some("36,38,300,301,302,303,304,305"),
        None,
        "14,15,16,17,18,19",
    ),
    ("JCB", None, Some("3528-3589"), "16,17,18,19"),
    ("UnionPay", Some("62"), None, "16,17,18,19"),
    (
        "Maestro",
        Some("5018,5020,5038,5893,6304,6759,6761,6762,6763"),
        None,
        "12,13,14,15,16,17,18,19",
    ),
    ("Mir", None, Some("2200-2204"), "16,17,18,19"),
];

/// Returns the reference dataset in its textual record form.
pub fn builtin_records() -> Vec<IssuingNetworkRecord> {
    REFERENCE_NETWORKS
        .iter()
        .map(|&(name, prefixes, range, lengths)| IssuingNetworkRecord {
            name: name.to_string(),
            starts_with_numbers: prefixes.map(str::to_string),
            in_range: range.map(str::to_string),
            allowed_lengths: lengths.to_string(),
        })
        .collect()
}

/// Provider serving the reference dataset.
///
/// The records are parsed on every call, the same way file and database
/// providers parse theirs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl NetworkProvider for BuiltinProvider {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        Ok(parse_records(&builtin_records())?)
    }
}
