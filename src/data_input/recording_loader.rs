// src/data_input/recording_loader.rs

use csv::ReaderBuilder;
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{BurstError, Result};
use crate::measure_names::{Group, GROUP_COUNT};

/// Supplies the raw trials of each group. Validation into `Recording`s happens downstream,
/// so a malformed trial is reported against its group instead of aborting the load.
pub trait RecordingLoader {
    fn load_group(&self, group: Group) -> Result<Vec<Vec<f64>>>;
}

/// Reads one CSV file per group.
///
/// Each row after `header_lines` is one trial. The first column holds a row label and is
/// ignored; every other cell may hold one or more whitespace-separated timestamps.
#[derive(Debug, Clone)]
pub struct CsvRecordingLoader {
    paths: [PathBuf; GROUP_COUNT],
    header_lines: usize,
}

impl CsvRecordingLoader {
    pub fn new(eki_path: impl Into<PathBuf>, wt_path: impl Into<PathBuf>, header_lines: usize) -> Self {
        Self {
            paths: [eki_path.into(), wt_path.into()],
            header_lines,
        }
    }

    pub fn path(&self, group: Group) -> &Path {
        &self.paths[group.index()]
    }
}

impl RecordingLoader for CsvRecordingLoader {
    fn load_group(&self, group: Group) -> Result<Vec<Vec<f64>>> {
        let path = self.path(group);
        info!("Reading {} recordings from '{}'", group, path.display());
        let file = File::open(path)?;
        let trials = parse_recording_csv(BufReader::new(file), self.header_lines)?;
        info!("Finished reading {} trials for {}.", trials.len(), group);
        Ok(trials)
    }
}

/// Parses trial rows from any CSV source.
pub fn parse_recording_csv<R: Read>(source: R, header_lines: usize) -> Result<Vec<Vec<f64>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut trials = Vec::new();
    for (row_index, result) in reader.records().enumerate() {
        let record = result?;
        if row_index < header_lines {
            debug!("Skipping header row {}: {:?}", row_index + 1, record);
            continue;
        }

        let mut timestamps = Vec::new();
        for cell in record.iter().skip(1) {
            for token in cell.split_whitespace() {
                let value = token.parse::<f64>().map_err(|_| {
                    BurstError::Parse(format!(
                        "row {}: '{}' is not a number",
                        row_index + 1,
                        token
                    ))
                })?;
                timestamps.push(value);
            }
        }
        debug!("Row {}: {} timestamps", row_index + 1, timestamps.len());
        trials.push(timestamps);
    }
    Ok(trials)
}
