use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dnsbridge::config::BridgeConfig;
use dnsbridge::dns::DNSPacket;
use dnsbridge::script::{
    AddressBook, DefaultRecordCodec, NoAddressBook, ScriptQuery, StaticAddressBook,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dnsbridge",
    version,
    about = "Expose decoded DNS messages to scripts and rebuild them after edits"
)]
struct Cli {
    /// TOML address book used to resolve the client (overrides DNSBRIDGE_ADDRESS_BOOK)
    #[arg(long, global = true, value_name = "FILE")]
    address_book: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the script view of a message
    Inspect {
        /// Decoded DNS message as JSON
        #[arg(short, long, value_name = "FILE")]
        message: PathBuf,

        /// Address of the client that sent the message
        #[arg(short, long, value_name = "IP")]
        client: String,
    },
    /// Apply a script's edited view and print the message to forward
    Apply {
        /// Decoded DNS message as JSON
        #[arg(short, long, value_name = "FILE")]
        message: PathBuf,

        /// Script view as handed back by the script, as JSON
        #[arg(short, long, value_name = "FILE")]
        edits: PathBuf,

        /// Address of the client that sent the message
        #[arg(short, long, value_name = "IP")]
        client: String,
    },
}

#[derive(Serialize)]
struct ApplyOutput {
    modified: bool,
    message: DNSPacket,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = BridgeConfig::from_env_with_address_book(
        cli.address_book
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
    )?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let address_book: Box<dyn AddressBook> = match &config.address_book_path {
        Some(path) => {
            let book = StaticAddressBook::load(path)?;
            info!(path = %path, endpoints = book.len(), "Using address book");
            Box::new(book)
        }
        None => Box::new(NoAddressBook),
    };
    let codec = DefaultRecordCodec;

    let output = match cli.command {
        Command::Inspect { message, client } => {
            let packet = read_packet(&message)?;
            let query =
                ScriptQuery::from_packet(&packet, &client, address_book.as_ref(), &codec);
            to_json(&query, config.pretty_output)?
        }
        Command::Apply {
            message,
            edits,
            client,
        } => {
            let packet = read_packet(&message)?;
            let mut query =
                ScriptQuery::from_packet(&packet, &client, address_book.as_ref(), &codec);

            let edited: ScriptQuery = serde_json::from_str(&std::fs::read_to_string(&edits)?)?;
            query.apply_script_state(edited);

            let modified = query.was_modified();
            let message = if modified {
                query.to_packet(&codec)
            } else {
                packet
            };
            info!(modified, id = message.header.id, "Script edits applied");
            to_json(&ApplyOutput { modified, message }, config.pretty_output)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn read_packet(path: &Path) -> Result<DNSPacket, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
