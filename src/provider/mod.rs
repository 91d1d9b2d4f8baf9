//! Sources of issuing-network definitions.
//!
//! The matcher never stores definitions itself. A [`NetworkProvider`] is asked
//! for the current list on every validation, in the order the definitions
//! must be tried.
//!
//! # Providers
//!
//! - [`BuiltinProvider`] - the reference dataset shipped with the crate
//! - [`MemoryProvider`] - definitions assembled in code
//! - `JsonNetworkLoader` - JSON file loader (`networks-json` feature)
//! - `CsvNetworkLoader` - CSV file loader (`networks-csv` feature)
//! - `SqliteNetworkProvider` - SQLite table read on every call (`networks-sqlite` feature)
//!
//! # Example
//!
//! ```
//! use cc_network::provider::{BuiltinProvider, NetworkProvider};
//!
//! let networks = BuiltinProvider.networks().unwrap();
//! assert!(networks.iter().any(|n| n.name() == "Visa"));
//! ```

mod builtin;
mod memory;

#[cfg(feature = "networks-json")]
mod json;

#[cfg(feature = "networks-csv")]
mod csv;

#[cfg(feature = "networks-sqlite")]
mod sqlite;

pub use builtin::{builtin_records, BuiltinProvider};
pub use memory::{MemoryProvider, MemoryProviderBuilder};

#[cfg(feature = "networks-json")]
pub use self::json::JsonNetworkLoader;

#[cfg(feature = "networks-csv")]
pub use self::csv::CsvNetworkLoader;

#[cfg(feature = "networks-sqlite")]
pub use self::sqlite::SqliteNetworkProvider;

use crate::error::DefinitionError;
use crate::network::NetworkDefinition;
use std::fmt;

/// Read-only source of network definitions.
///
/// Implementations must return definitions in matching order; the matcher
/// selects the first definition that matches a card.
pub trait NetworkProvider: Send + Sync {
    /// Fetches the current list of network definitions.
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError>;

    /// Returns the number of definitions currently available.
    fn len(&self) -> Result<usize, ProviderError> {
        Ok(self.networks()?.len())
    }

    /// Returns true if the provider has no definitions.
    fn is_empty(&self) -> Result<bool, ProviderError> {
        Ok(self.len()? == 0)
    }
}

impl<P: NetworkProvider + ?Sized> NetworkProvider for &P {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        (**self).networks()
    }
}

impl<P: NetworkProvider + ?Sized> NetworkProvider for Box<P> {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        (**self).networks()
    }
}

impl<P: NetworkProvider + ?Sized> NetworkProvider for std::sync::Arc<P> {
    fn networks(&self) -> Result<Vec<NetworkDefinition>, ProviderError> {
        (**self).networks()
    }
}

/// Error type for network providers.
#[derive(Debug)]
pub enum ProviderError {
    /// Failed to read the source.
    IoError(std::io::Error),
    /// Failed to parse the source format.
    ParseError(String),
    /// Database is unreadable or has an unexpected layout.
    InvalidDatabase(String),
    /// A record could not be turned into a definition.
    Definition(DefinitionError),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {}", e),
            Self::ParseError(s) => write!(f, "Parse error: {}", s),
            Self::InvalidDatabase(s) => write!(f, "Invalid database: {}", s),
            Self::Definition(e) => write!(f, "Invalid definition: {}", e),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            Self::Definition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<DefinitionError> for ProviderError {
    fn from(err: DefinitionError) -> Self {
        Self::Definition(err)
    }
}
