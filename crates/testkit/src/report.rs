//! Run summaries exported as JSON for CI artifacts.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    /// Crafted at least the requested amount.
    Completed,
    /// Completed with fewer items than requested.
    Shortfall,
    /// Stopped with an error.
    Aborted,
}

/// Summary of one craft run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftReport {
    /// Item requested, `id:meta` or `id:*`.
    pub item: String,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Overall result.
    pub result: RunResult,
    /// Items requested.
    pub requested: u32,
    /// Items moved into storage.
    pub crafted: u32,
    /// Inventory manipulations issued.
    pub ops: usize,
    /// Error message for aborted runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CraftReport {
    /// Report stamped with the current time.
    pub fn new(item: impl Into<String>, result: RunResult, requested: u32, crafted: u32) -> Self {
        Self {
            item: item.into(),
            timestamp: Utc::now(),
            result,
            requested,
            crafted,
            ops: 0,
            error: None,
        }
    }

    /// Record the number of issued ops.
    pub fn with_ops(mut self, ops: usize) -> Self {
        self.ops = ops;
        self
    }

    /// Record the abort reason.
    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    /// Persist as pretty JSON, creating parent dirs if needed.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        File::create(path)?.write_all(json.as_bytes())?;
        Ok(())
    }
}
