//! Rendering of command results.
//!
//! JSON output emits one object per result, tagged with `kind`; human output
//! prints the bare values.

use std::io::Write;

use pagi_client::{AngleUnit, Point, Side, VisionGrid, VisionKind};
use serde::Serialize;

use crate::AppError;
use crate::cli::ResolvedOutputFormat;

/// Result of one CLI operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Report {
    /// A raw reply line.
    Message { line: String },
    /// A non-blocking receive found nothing.
    Empty,
    /// A command was sent without waiting for a reply.
    Sent { command: String },
    /// Active state or reflex names.
    Names { names: Vec<String> },
    /// Body or hand coordinates.
    Position {
        #[serde(flatten)]
        point: Point,
    },
    /// Agent rotation.
    Rotation { value: f64, unit: AngleUnit },
    /// Whether a jump succeeded.
    Jump { success: bool },
    /// Movement that completed.
    Moved { paces: u32, side: Side },
    /// Vision field rows, bottom row first.
    Vision {
        field: VisionKind,
        rows: Vec<Vec<String>>,
    },
}

impl From<VisionGrid> for Report {
    fn from(grid: VisionGrid) -> Self {
        Self::Vision {
            field: grid.kind(),
            rows: grid.rows().to_vec(),
        }
    }
}

impl Report {
    fn human(&self) -> String {
        match self {
            Self::Message { line } => line.clone(),
            Self::Empty => "no matching message available".to_owned(),
            Self::Sent { command } => format!("sent {command}"),
            Self::Names { names } if names.is_empty() => "(none)".to_owned(),
            Self::Names { names } => names.join("\n"),
            Self::Position { point } => format!("{} {}", point.x, point.y),
            Self::Rotation { value, .. } => value.to_string(),
            Self::Jump { success } => success.to_string(),
            Self::Moved { paces, side } => format!("moved {paces} paces {side}"),
            // Top row first so the grid reads like the field it depicts.
            Self::Vision { rows, .. } => rows
                .iter()
                .rev()
                .map(|row| row.join(","))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Writes `report` to `stdout` in `format`, followed by a newline.
pub(crate) fn emit<W: Write>(
    report: &Report,
    format: ResolvedOutputFormat,
    stdout: &mut W,
) -> Result<(), AppError> {
    match format {
        ResolvedOutputFormat::Json => {
            serde_json::to_writer(&mut *stdout, report).map_err(AppError::SerialiseReport)?;
        }
        ResolvedOutputFormat::Human => {
            stdout
                .write_all(report.human().as_bytes())
                .map_err(AppError::EmitReport)?;
        }
    }
    stdout.write_all(b"\n").map_err(AppError::EmitReport)?;
    stdout.flush().map_err(AppError::EmitReport)
}
