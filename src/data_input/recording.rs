// src/data_input/recording.rs

use crate::error::{BurstError, Result};
use crate::measure_names::Group;

/// Alternating burst-start/burst-stop timestamps (seconds) for one trial.
///
/// Construction validates that the timestamps are finite and strictly increasing;
/// the sequence cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    timestamps: Vec<f64>,
}

impl Recording {
    pub fn new(timestamps: Vec<f64>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(BurstError::malformed("empty timestamp sequence"));
        }
        if let Some(idx) = timestamps.iter().position(|t| !t.is_finite()) {
            return Err(BurstError::malformed(format!(
                "non-finite timestamp {} at index {idx}",
                timestamps[idx]
            )));
        }
        if let Some(idx) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BurstError::malformed(format!(
                "timestamps not strictly increasing at index {}: {} then {}",
                idx + 1,
                timestamps[idx],
                timestamps[idx + 1]
            )));
        }
        Ok(Self { timestamps })
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of start/stop pairs.
    pub fn complete_bursts(&self) -> usize {
        self.timestamps.len() / 2
    }

    /// True when the sequence ends on a start with no matching stop.
    pub fn has_unpaired_start(&self) -> bool {
        self.timestamps.len() % 2 == 1
    }
}

/// Ordered trials of one group.
#[derive(Debug, Clone)]
pub struct GroupRecordings {
    pub group: Group,
    pub trials: Vec<Recording>,
}

impl GroupRecordings {
    /// Validates every raw trial; the first malformed trial fails the whole group.
    pub fn from_raw(group: Group, raw_trials: Vec<Vec<f64>>) -> Result<Self> {
        let trials = raw_trials
            .into_iter()
            .enumerate()
            .map(|(trial, timestamps)| {
                Recording::new(timestamps).map_err(|err| match err {
                    BurstError::MalformedRecording(msg) => {
                        BurstError::malformed(format!("{group} trial {trial}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { group, trials })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_timestamps() {
        let rec = Recording::new(vec![0.0, 2.0, 5.0, 7.0, 10.0]).unwrap();
        assert_eq!(rec.len(), 5);
        assert_eq!(rec.complete_bursts(), 2);
        assert!(rec.has_unpaired_start());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Recording::new(vec![]), Err(BurstError::MalformedRecording(_))));
    }

    #[test]
    fn rejects_repeated_timestamp() {
        let err = Recording::new(vec![0.0, 1.0, 1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn rejects_nan() {
        assert!(Recording::new(vec![0.0, f64::NAN]).is_err());
    }

    #[test]
    fn group_failure_names_the_trial() {
        let err = GroupRecordings::from_raw(
            Group::Wt,
            vec![vec![0.0, 1.0], vec![3.0, 2.0]],
        )
        .unwrap_err();
        assert!(matches!(err, BurstError::MalformedRecording(ref msg) if msg.starts_with("WT trial 1")));
    }
}
