//! hm-cli: play hangman on the ledger.
//!
//! Every command that changes a game submits one signed batch, then polls
//! the batch status (unless `--no-wait`) and reports the outcome.

mod render;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hm_02_envelope_builder::prelude::*;

/// Hangman ledger client
#[derive(Parser, Debug)]
#[command(name = "hm-cli")]
#[command(about = "Create, guess and inspect hangman games on the ledger")]
struct Args {
    /// REST API URL (overrides HM_REST_API_URL)
    #[arg(long)]
    url: Option<String>,

    /// Private key as hex, or a file containing it. A random key is used if absent.
    #[arg(long, env = "HM_PRIVATE_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Submit without waiting for the batch to commit
    #[arg(long)]
    no_wait: bool,

    /// Log envelope details (-v) or everything (-vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game
    Create { name: String, word: String },
    /// Delete a game and its history
    Delete { name: String },
    /// Guess a letter
    Guess { name: String, letter: char },
    /// Show the current state of a game
    Show {
        name: String,
        /// Print every snapshot instead of the current one
        #[arg(long)]
        history: bool,
    },
    /// List recent blocks
    Blocks {
        #[arg(long, default_value_t = 1000)]
        limit: usize,
    },
    /// Print a fresh private key and its public key
    Keygen,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info,hm_02_envelope_builder=debug"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_signer(key: Option<&str>) -> Result<Secp256k1Signer> {
    let Some(key) = key else {
        return Ok(Secp256k1Signer::generate());
    };
    let hex = if Path::new(key).is_file() {
        std::fs::read_to_string(key).with_context(|| format!("failed to read key file {key}"))?
    } else {
        key.to_string()
    };
    Secp256k1Signer::from_hex(&hex).context("invalid private key")
}

type Client = HangmanClient<Secp256k1Signer, RestApiClient>;

/// Report a submission, waiting for its outcome unless `no_wait`.
async fn submit(
    client: &Client,
    no_wait: bool,
    label: &str,
    name: &str,
    sub: Submission,
) -> Result<BatchStatus> {
    debug!(batch = %sub.batch_id, address = %sub.address, "submitted");
    if no_wait {
        println!("{label} '{name}' submitted: {}", sub.link);
        return Ok(BatchStatus::Pending);
    }
    let status = client.wait_for_commit(&sub.link).await?;
    println!("{}", render::status(label, name, status));
    if status == BatchStatus::Invalid {
        bail!("transaction for '{name}' was rejected by the validator");
    }
    Ok(status)
}

async fn show(client: &Client, name: &str) -> Result<()> {
    match client.game(name).await? {
        Some(game) => print!("{}", render::game(&game)),
        None => println!("Game '{name}' not found"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Command::Keygen = args.command {
        let signer = Secp256k1Signer::generate();
        println!("private key: {}", signer.private_key_hex());
        println!("public key:  {}", signer.public_key());
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.url {
        config.rest_api_url = url;
    }
    let signer = load_signer(args.key.as_deref())?;
    let gateway = RestApiClient::new(&config.rest_api_url, config.request_timeout)
        .context("failed to create REST API client")?;
    let client = HangmanClient::new(signer, gateway, config);
    debug!(public_key = %client.public_key(), "session key");

    match args.command {
        Command::Create { name, word } => {
            let sub = client.create(&name, &word).await?;
            submit(&client, args.no_wait, "Created game", &name, sub).await?;
        }
        Command::Delete { name } => {
            let sub = client.delete(&name).await?;
            submit(&client, args.no_wait, "Deleted game", &name, sub).await?;
        }
        Command::Guess { name, letter } => {
            let sub = client.guess(&name, letter).await?;
            let status = submit(&client, args.no_wait, "Guess on", &name, sub).await?;
            if status == BatchStatus::Committed {
                show(&client, &name).await?;
            }
        }
        Command::Show { name, history } => {
            if history {
                match client.history(&name).await? {
                    Some(log) => print!("{}", render::history(&log)),
                    None => println!("Game '{name}' not found"),
                }
            } else {
                show(&client, &name).await?;
            }
        }
        Command::Blocks { limit } => {
            let blocks = client.blocks(limit).await?;
            print!("{}", render::blocks(&blocks, limit));
        }
        Command::Keygen => {}
    }

    Ok(())
}
