//! TempBot MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Each request runs on its own task
//! against a shared, read-only `UnitProcessor`; responses are written by a
//! single writer task so frames never interleave.

mod config;
mod format;
mod help;
mod logging;
mod server;

use std::process;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use config::ClientConfig;
use server::{handle_line, PROTOCOL_VERSION, SERVER_VERSION};

#[tokio::main]
async fn main() {
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    // held until exit so buffered file output is flushed
    let _log_guard = match logging::init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging setup failed: {}", e);
            process::exit(1);
        }
    };

    let processor = match tempbot_units::standard_processor() {
        Ok(processor) => Arc::new(processor),
        Err(e) => {
            error!(error = %e, "invalid unit catalog");
            process::exit(1);
        }
    };

    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        dimensions = processor.dimensions().len(),
        "TempBot MCP server started"
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(frame) = rx.recv().await {
            let written = async {
                stdout.write_all(frame.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await
            };
            if let Err(e) = written.await {
                error!(error = %e, "error writing response");
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received request");

                let processor = Arc::clone(&processor);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let Some(response) = handle_line(&processor, &line) else {
                        return;
                    };
                    match serde_json::to_string(&response) {
                        Ok(frame) => {
                            if tx.send(frame).is_err() {
                                error!("writer closed before response could be sent");
                            }
                        }
                        Err(e) => error!(error = %e, "failed to serialize response"),
                    }
                });
            }
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    // the writer drains once every in-flight request has dropped its sender
    drop(tx);
    if let Err(e) = writer.await {
        error!(error = %e, "writer task failed");
    }

    info!("server shutting down");
}
