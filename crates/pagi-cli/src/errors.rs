//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use pagi_client::WorldError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("failed to serialise result: {0}")]
    SerialiseReport(serde_json::Error),
    #[error("failed to write result: {0}")]
    EmitReport(io::Error),
}
