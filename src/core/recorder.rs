//! Pass event recorder.
//!
//! Appends one JSONL event per rule outcome so operators can reconstruct
//! what a pass did after the fact. Read-only on the render side: it shows
//! existing event data and never fabricates missing fields.

use crate::core::error::GatehouseError;
use crate::core::report::PassReport;
use crate::core::time;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Event logged for each rule application within a pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlterEvent {
    pub ts: String,
    pub event_id: String,
    pub pass_id: String,
    pub rule: String,
    pub target: String,
    pub requirement: String,
    pub status: String,
    pub detail: Option<String>,
    pub table_digest: String,
}

/// Append every outcome in `report` to the JSONL log at `path`.
///
/// Returns the pass id shared by the appended events.
pub fn append_pass(path: &Path, report: &PassReport) -> Result<String, GatehouseError> {
    let pass_id = time::new_event_id();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(GatehouseError::IoError)?;

    for outcome in &report.outcomes {
        let event = AlterEvent {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            pass_id: pass_id.clone(),
            rule: outcome.rule.clone(),
            target: outcome.target.clone(),
            requirement: outcome.requirement.clone(),
            status: outcome.status.to_string(),
            detail: outcome.detail.clone(),
            table_digest: report.table_digest.clone(),
        };
        let line = serde_json::to_string(&event)
            .map_err(|e| GatehouseError::ValidationError(e.to_string()))?;
        writeln!(file, "{}", line).map_err(GatehouseError::IoError)?;
    }

    Ok(pass_id)
}

/// Read up to `limit` events from the log. Malformed lines are skipped
/// rather than failing the whole read.
pub fn read_events(path: &Path, limit: usize) -> Result<Vec<AlterEvent>, GatehouseError> {
    let file = File::open(path).map_err(GatehouseError::IoError)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(GatehouseError::IoError)?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AlterEvent>(&line) {
            Ok(ev) => events.push(ev),
            Err(_) => continue,
        }
        if events.len() >= limit {
            break;
        }
    }

    Ok(events)
}
