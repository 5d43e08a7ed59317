//! Tracing subscriber setup driven by `ClientConfig`

use std::fs::OpenOptions;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{ClientConfig, LogFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Console output
/// goes to stderr; stdout carries protocol frames. The returned guard must
/// be held for the life of the process when logging to a file.
pub fn init_logging(config: &ClientConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.log_output.to_console() {
        layers.push(fmt_layer(config.log_format, std::io::stderr, true));
    }

    if config.log_output.to_file() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        let (writer, file_guard) = tracing_appender::non_blocking(file);
        layers.push(fmt_layer(config.log_format, writer, false));
        guard = Some(file_guard);
    }

    Registry::default().with(layers).with(filter).try_init()?;

    tracing::info!(config = %config, "logging initialized");
    Ok(guard)
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        LogFormat::Dev => layer
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Prod => layer.with_target(false).compact().boxed(),
    }
}
