//! # Seal Runtime
//!
//! Development host for the Seal Records subsystem (qc-18).
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from env (`SealConfig::from_env`)
//! 2. Validate the delegation target
//! 3. Install the tracing subscriber (stderr)
//! 4. Wire local + legacy in-memory ledgers
//! 5. Call `init`, then serve stdin until EOF or ctrl-c
//!
//! ## Wire Format
//!
//! Each stdin line is `<function> <arg> <arg> ...` (whitespace separated,
//! `#` starts a comment line). Each reply is one JSON object on stdout:
//!
//! ```text
//! seal acct1 100        → {"status":200,"payload":""}
//! querybykey acct1      → {"status":200,"payload":"100"}
//! bogus                 → {"status":500,"message":"unsupported function name: bogus"}
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qc_18_seal_records::prelude::*;

type LocalHandler = RecordHandler<Arc<InMemoryLedger>, CrossStoreDelegate<Arc<InMemoryLedger>>>;

/// One reply line on stdout.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Reply {
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<&Response> for Reply {
    fn from(response: &Response) -> Self {
        Self {
            status: response.status(),
            payload: response
                .payload()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            message: response.message().map(str::to_string),
        }
    }
}

/// Split a request line into function name and arguments.
fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let mut parts = line.split_whitespace().map(str::to_string);
    let function = parts.next()?;
    Some((function, parts.collect()))
}

fn init_tracing(config: &SealConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log filter: {}", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Local handler delegating to a legacy handler over the configured target.
fn build_handler(config: &SealConfig) -> LocalHandler {
    let legacy_ledger = Arc::new(InMemoryLedger::new());
    let legacy = RecordHandler::new(legacy_ledger, NoDelegate);

    let ledger = Arc::new(InMemoryLedger::new());
    ledger.register_peer(
        config.delegation.name.clone(),
        config.delegation.channel.clone(),
        Arc::new(legacy),
    );

    RecordHandler::new(
        Arc::clone(&ledger),
        CrossStoreDelegate::new(ledger, config.delegation.clone()),
    )
}

async fn serve(handler: &LocalHandler) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, shutting down");
                break;
            }
        };
        let Some(line) = line else {
            info!("stdin closed, shutting down");
            break;
        };
        let Some((function, args)) = parse_line(&line) else {
            continue;
        };

        let response = handler.invoke(&function, &args);
        if response.is_error() {
            warn!(function = %function, status = response.status(), "invocation returned error");
        }

        let mut encoded = serde_json::to_vec(&Reply::from(&response))?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SealConfig::from_env();
    config.validate().context("invalid seal configuration")?;
    init_tracing(&config)?;

    info!(
        version = qc_18_seal_records::VERSION,
        delegate = %config.delegation.name,
        channel = %config.delegation.channel,
        "starting seal runtime"
    );

    let handler = build_handler(&config);
    let init = handler.init();
    anyhow::ensure!(init.is_success(), "handler init failed: {:?}", init.message());

    serve(&handler).await
}
