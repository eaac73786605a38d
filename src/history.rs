//! Per-epoch error records for plotting and offline analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::error::Result;

/// The training error measured at the end of one epoch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub epoch: usize,
    pub error: f64,
}

/// An ordered series of per-epoch error values.
///
/// The crate never renders anything itself; whoever draws training
/// progress (a chart, a notebook, a script) reads this series or the CSV
/// it exports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    records: Vec<ErrorRecord>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        TrainingHistory {
            records: Vec::new(),
        }
    }

    /// Appends the error measured after `epoch`.
    pub fn record(&mut self, epoch: usize, error: f64) {
        self.records.push(ErrorRecord { epoch, error });
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently recorded epoch, if any.
    pub fn last(&self) -> Option<&ErrorRecord> {
        self.records.last()
    }

    /// Serializes the series as `epoch,error` CSV rows with a header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes the CSV series to a file at `path`.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}
