//! hm-tp: serve the `hm` transaction family to a validator.
//!
//! Connects to the validator's component endpoint, registers every family
//! version the processor handles, then applies each process request against
//! the validator's context until interrupted.

mod connection;
mod context;
mod handler;
mod protocol;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use prost::Message as _;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use zeromq::{DealerSocket, Socket};

use hm_01_transaction_processor::prelude::*;

use crate::connection::{expect_reply, run_socket, ValidatorConnection};
use crate::context::ValidatorState;
use crate::protocol::{
    content, register_status, Message, MessageType, TpProcessRequest, TpRegisterResponse,
    TpUnregisterRequest,
};

type Processor = HangmanProcessor<ValidatorState>;

/// Hangman transaction processor
#[derive(Parser, Debug)]
#[command(name = "hm-tp")]
#[command(about = "Validate and apply hangman moves for a validator")]
struct Args {
    /// Validator component endpoint
    #[arg(short = 'C', long, env = "HM_VALIDATOR", default_value = "tcp://127.0.0.1:4004")]
    validator: String,

    /// Transactions the validator may hand over at once
    #[arg(long, default_value_t = 10)]
    max_occupancy: u32,

    /// Seconds to wait on each state request
    #[arg(long, default_value_t = STATE_TIMEOUT.as_secs())]
    state_timeout: u64,

    /// Log transactions (-v) or everything (-vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            state_timeout: Duration::from_secs(self.state_timeout),
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info,hm_tp=debug,hm_01_transaction_processor=debug"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut socket = DealerSocket::new();
    socket
        .connect(&args.validator)
        .await
        .with_context(|| format!("connecting to {}", args.validator))?;
    info!(validator = %args.validator, "connected");

    let (connection, queued) = ValidatorConnection::new();
    let (inbox_tx, mut inbox) = mpsc::channel(256);
    let pump = tokio::spawn(run_socket(socket, Arc::clone(&connection), queued, inbox_tx));

    let state = Arc::new(ValidatorState::new(Arc::clone(&connection)));
    let processor = Arc::new(HangmanProcessor::new(state, args.processor_config()));
    register(&connection, processor.as_ref(), args.max_occupancy).await?;

    loop {
        tokio::select! {
            next = inbox.recv() => {
                let Some(message) = next else {
                    bail!("validator connection closed");
                };
                serve(&connection, &processor, message)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    let stats = processor.stats().await;
    info!(
        applied = stats.applied,
        rejected = stats.rejected,
        failed = stats.failed,
        "processor stats"
    );
    let unregister = connection.request(
        MessageType::TpUnregisterRequest,
        content(&TpUnregisterRequest {}),
    );
    if tokio::time::timeout(Duration::from_secs(2), unregister).await.is_err() {
        warn!("validator did not acknowledge unregister");
    }
    pump.abort();
    Ok(())
}

async fn register(
    connection: &ValidatorConnection,
    processor: &Processor,
    max_occupancy: u32,
) -> Result<()> {
    for request in handler::registrations(processor, max_occupancy) {
        let reply = connection
            .request(MessageType::TpRegisterRequest, content(&request))
            .await?;
        let response: TpRegisterResponse =
            expect_reply(&reply, MessageType::TpRegisterResponse, "register response")?;
        if response.status != register_status::OK {
            bail!(
                "validator refused {} {} (status {})",
                request.family,
                request.version,
                response.status
            );
        }
        info!(family = %request.family, version = %request.version, "registered");
    }
    Ok(())
}

/// Handle one message the validator sent on its own initiative.
fn serve(
    connection: &Arc<ValidatorConnection>,
    processor: &Arc<Processor>,
    message: Message,
) -> Result<()> {
    match message.kind() {
        Some(MessageType::PingRequest) => {
            connection.reply(&message, MessageType::PingResponse, Vec::new())?;
        }
        Some(MessageType::TpProcessRequest) => {
            let request = TpProcessRequest::decode(message.content.as_slice())
                .context("decoding process request")?;
            let connection = Arc::clone(connection);
            let processor = Arc::clone(processor);
            tokio::spawn(async move {
                let context_id = request.context_id.clone();
                let response =
                    ValidatorState::scoped(context_id, handler::respond(processor.as_ref(), request))
                        .await;
                if let Err(err) =
                    connection.reply(&message, MessageType::TpProcessResponse, content(&response))
                {
                    warn!(error = %err, "could not answer process request");
                }
            });
        }
        _ => debug!(message_type = message.message_type, "ignoring message"),
    }
    Ok(())
}
