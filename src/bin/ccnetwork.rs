//! CLI tool for card validation against issuing-network definitions.
//!
//! # Usage
//!
//! ```bash
//! # Validate a card number against the built-in networks
//! ccnetwork validate 4111111111111111
//!
//! # Use definitions from a file (.json or .csv)
//! ccnetwork --networks networks.json validate 4111111111111111 --output json
//!
//! # List the loaded networks
//! ccnetwork networks
//!
//! # Generate test card numbers for a network
//! ccnetwork generate --network Visa --count 5
//! ```
//!
//! Set `RUST_LOG=debug` to trace matching decisions on stderr.

use cc_network::provider::{BuiltinProvider, CsvNetworkLoader, JsonNetworkLoader};
use cc_network::{
    generate, matcher, CardNumber, CardValidator, NetworkDefinition, NetworkProvider, Outcome,
    ProviderError, Validation,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ccnetwork")]
#[command(
    author,
    version,
    about = "Credit card validation against issuing-network definitions"
)]
struct Cli {
    /// Network definitions file (.json or .csv); built-in networks if omitted
    #[arg(short, long, global = true, env = "CC_NETWORK_FILE")]
    networks: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a card number (digits only)
    Validate {
        /// Card number to validate
        card_number: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Check if a card passes the Luhn algorithm
    Luhn {
        /// Card number to check; non-digits are ignored
        card_number: String,
    },

    /// Identify the issuing network without checking length or checksum
    Detect {
        /// Card number (or partial number)
        card_number: String,
    },

    /// List the network definitions in matching order
    Networks {
        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Generate test card numbers (for testing only)
    Generate {
        /// Network name, as listed by `networks`
        #[arg(short = 'N', long)]
        network: String,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Print the single zero-filled card instead of random digits
        #[arg(short, long, conflicts_with = "count")]
        deterministic: bool,
    },

    /// Mask a card number for display
    Mask {
        /// Card number to mask
        card_number: String,

        /// Include BIN (first 6 digits)
        #[arg(short, long)]
        with_bin: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            card_number,
            output,
        } => {
            let card = CardNumber::new(card_number);
            load(cli.networks.as_deref()).and_then(|p| cmd_validate(p, &card, output))
        }
        Commands::Luhn { card_number } => Ok(cmd_luhn(&CardNumber::new(card_number))),
        Commands::Detect { card_number } => {
            let card = CardNumber::new(card_number);
            load(cli.networks.as_deref()).and_then(|p| cmd_detect(p, &card))
        }
        Commands::Networks { output } => {
            load(cli.networks.as_deref()).and_then(|p| cmd_networks(p, output))
        }
        Commands::Generate {
            network,
            count,
            deterministic,
        } => load(cli.networks.as_deref())
            .and_then(|p| cmd_generate(p, &network, count, deterministic)),
        Commands::Mask {
            card_number,
            with_bin,
        } => Ok(cmd_mask(&CardNumber::new(card_number), with_bin)),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(2)
    })
}

fn load(path: Option<&Path>) -> Result<Box<dyn NetworkProvider>, ProviderError> {
    let Some(path) = path else {
        return Ok(Box::new(BuiltinProvider));
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonNetworkLoader::from_file(path)?)),
        Some("csv") => Ok(Box::new(CsvNetworkLoader::from_file(path)?)),
        #[cfg(feature = "networks-sqlite")]
        Some("db" | "sqlite" | "sqlite3") => Ok(Box::new(
            cc_network::provider::SqliteNetworkProvider::open(path)?,
        )),
        _ => Err(ProviderError::ParseError(format!(
            "unsupported definitions file '{}' (expected .json or .csv)",
            path.display()
        ))),
    }
}

fn cmd_validate(
    provider: Box<dyn NetworkProvider>,
    card: &CardNumber,
    output: OutputFormat,
) -> Result<ExitCode, ProviderError> {
    let validation = CardValidator::new(provider).validate_card(card)?;

    match output {
        OutputFormat::Text => print_validation_text(card, &validation),
        OutputFormat::Json => {
            let rejection = validation.rejection().map(|r| r.to_string());
            let body = json!({
                "outcome": validation.outcome().message(),
                "network_name": validation.network_name(),
                "is_valid": validation.is_valid(),
                "message": validation.message(),
                "masked": card.masked(),
                "rejection": rejection,
            });
            println!("{}", body);
        }
    }

    Ok(if validation.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_validation_text(card: &CardNumber, validation: &Validation) {
    println!("Outcome: {}", validation.outcome());
    match validation.outcome() {
        Outcome::BadRequest => {
            println!("Valid: no");
            println!("Error: card number must contain digits only");
        }
        Outcome::NotFound => {
            println!("Valid: no");
            println!("Network: Unknown");
        }
        Outcome::Ok => {
            println!("Valid: {}", if validation.is_valid() { "yes" } else { "no" });
            println!("Network: {}", validation.message());
            if let Some(criterion) = validation.matched() {
                println!("Matched: {}", criterion);
            }
            if let Some(rejection) = validation.rejection() {
                println!("Error: {}", rejection);
            }
            println!("Masked: {}", card);
        }
    }
}

fn cmd_luhn(card: &CardNumber) -> ExitCode {
    if card.passes_luhn() {
        println!("Luhn check: PASS");
        ExitCode::SUCCESS
    } else {
        println!("Luhn check: FAIL");
        ExitCode::FAILURE
    }
}

fn cmd_detect(
    provider: Box<dyn NetworkProvider>,
    card: &CardNumber,
) -> Result<ExitCode, ProviderError> {
    if card.is_empty() || !card.is_numeric() {
        eprintln!("Error: card number must contain digits only");
        return Ok(ExitCode::FAILURE);
    }

    let networks = provider.networks()?;
    match matcher::find_network(card.as_str(), &networks) {
        Some(found) => {
            println!("Detected Network: {}", found.network.name());
            println!("Matched: {}", found.criterion);
            println!("Allowed Lengths: {:?}", found.network.allowed_lengths());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("Detected Network: Unknown");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_networks(
    provider: Box<dyn NetworkProvider>,
    output: OutputFormat,
) -> Result<ExitCode, ProviderError> {
    let networks = provider.networks()?;

    match output {
        OutputFormat::Text => {
            for network in &networks {
                println!("{}", network);
            }
        }
        OutputFormat::Json => {
            let records: Vec<_> = networks.iter().map(NetworkDefinition::to_record).collect();
            let body = serde_json::to_string_pretty(&records)
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;
            println!("{}", body);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_generate(
    provider: Box<dyn NetworkProvider>,
    name: &str,
    count: usize,
    deterministic: bool,
) -> Result<ExitCode, ProviderError> {
    let networks = provider.networks()?;
    let Some(network) = networks
        .iter()
        .find(|n| n.name().eq_ignore_ascii_case(name.trim()))
    else {
        eprintln!("Error: unknown network '{}'", name);
        return Ok(ExitCode::FAILURE);
    };

    if deterministic {
        return Ok(match generate::deterministic_for_network(network, &networks) {
            Some(card) => {
                println!("{}", card);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Error: {}", ungeneratable(network));
                ExitCode::FAILURE
            }
        });
    }

    let cards = generate::generate_many_for_network(network, &networks, count);
    if cards.len() < count {
        eprintln!("Error: {}", ungeneratable(network));
        return Ok(ExitCode::FAILURE);
    }

    for card in cards {
        println!("{}", card);
    }
    Ok(ExitCode::SUCCESS)
}

fn ungeneratable(network: &NetworkDefinition) -> String {
    format!(
        "no card of 13 to 19 digits is identified as '{}' (length not allowed or claimed by an earlier network)",
        network.name()
    )
}

fn cmd_mask(card: &CardNumber, with_bin: bool) -> ExitCode {
    if card.digits().len() < 4 {
        eprintln!("Error: Card number too short");
        return ExitCode::FAILURE;
    }

    if with_bin {
        println!("{}", card.masked_with_bin());
    } else {
        println!("{}", card.masked());
    }
    ExitCode::SUCCESS
}
