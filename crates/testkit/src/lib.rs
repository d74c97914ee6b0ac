#![warn(missing_docs)]
//! Test surfaces for the crafter: item and recipe fixtures, seeded
//! inventories, an operation journal sink and run reports.

mod fixtures;
mod report;

use anyhow::{Context, Result};
use mdminecraft_inventory::InventoryOp;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use fixtures::*;
pub use report::*;

/// One journaled inventory manipulation.
#[derive(Debug, Serialize)]
pub struct OpRecord<'a> {
    /// Position of the op in the journal, starting at 0.
    pub step: usize,
    /// Short label, e.g. `right_click`.
    pub kind: &'a str,
    /// The op itself.
    pub payload: &'a InventoryOp,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create journal {}", path.display()))?;
        Ok(Self {
            file: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &OpRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Append every op in order and flush.
    pub fn write_journal(&mut self, ops: &[InventoryOp]) -> Result<()> {
        for op in ops {
            let record = OpRecord {
                step: self.written,
                kind: op.kind(),
                payload: op,
            };
            self.write(&record)?;
        }
        self.file.flush()?;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}
