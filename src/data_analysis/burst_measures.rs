// src/data_analysis/burst_measures.rs

use log::{debug, warn};

use crate::data_input::recording::Recording;
use crate::error::{BurstError, Result};
use crate::measure_names::{Measure, MEASURE_COUNT};
use crate::types::TrialSamples;

/// The four derived sequences of one trial.
///
/// `burst_dur` has one value per complete burst; the other three have one fewer.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstMeasures {
    pub burst_dur: Vec<f64>,
    pub cycle_dur: Vec<f64>,
    pub duty_cycle: Vec<f64>,
    pub qi: Vec<f64>,
    /// Set when an odd-length recording lost its final, unpaired burst start.
    pub dropped_trailing_start: bool,
}

impl BurstMeasures {
    pub fn get(&self, measure: Measure) -> &[f64] {
        match measure {
            Measure::BurstDur => &self.burst_dur,
            Measure::CycleDur => &self.cycle_dur,
            Measure::DutyCycle => &self.duty_cycle,
            Measure::Qi => &self.qi,
        }
    }
}

/// Converts alternating start/stop timestamps into burst, cycle, duty-cycle and quiescence
/// sequences.
///
/// Burst starts sit at even indices and stops at odd indices. A trailing start without a
/// stop is excluded from every measure so the sequences stay aligned.
pub fn calculate_burst_measures(recording: &Recording) -> Result<BurstMeasures> {
    let timestamps = recording.timestamps();
    let n_bursts = recording.complete_bursts();
    if n_bursts == 0 {
        return Err(BurstError::malformed(format!(
            "no complete burst in {} timestamp(s)",
            timestamps.len()
        )));
    }
    let dropped_trailing_start = recording.has_unpaired_start();
    if dropped_trailing_start {
        warn!(
            "Recording has an unpaired trailing burst start at {:.3}s; excluded from measures.",
            timestamps[timestamps.len() - 1]
        );
    }

    let paired = &timestamps[..n_bursts * 2];
    let burst_start: Vec<f64> = paired.iter().step_by(2).copied().collect();
    let burst_stop: Vec<f64> = paired.iter().skip(1).step_by(2).copied().collect();

    let burst_dur: Vec<f64> = burst_start
        .iter()
        .zip(&burst_stop)
        .map(|(start, stop)| stop - start)
        .collect();
    let cycle_dur: Vec<f64> = burst_start.windows(2).map(|w| w[1] - w[0]).collect();
    let duty_cycle: Vec<f64> = burst_dur
        .iter()
        .zip(&cycle_dur)
        .map(|(burst, cycle)| burst / cycle)
        .collect();
    let qi: Vec<f64> = burst_start
        .iter()
        .skip(1)
        .zip(&burst_stop)
        .map(|(next_start, stop)| next_start - stop)
        .collect();

    let measures = BurstMeasures {
        burst_dur,
        cycle_dur,
        duty_cycle,
        qi,
        dropped_trailing_start,
    };
    for measure in Measure::ALL {
        debug!("{}:\n{:?}", measure.full_name(), measures.get(measure));
    }
    Ok(measures)
}

/// Per-group measures, one list of per-trial sequences for each `Measure`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasureSet {
    samples: [TrialSamples; MEASURE_COUNT],
    dropped_trailing_starts: Vec<usize>,
}

impl MeasureSet {
    pub fn from_trials(trials: Vec<BurstMeasures>) -> Self {
        let mut set = MeasureSet::default();
        for (trial_index, trial) in trials.into_iter().enumerate() {
            if trial.dropped_trailing_start {
                set.dropped_trailing_starts.push(trial_index);
            }
            let BurstMeasures {
                burst_dur,
                cycle_dur,
                duty_cycle,
                qi,
                ..
            } = trial;
            set.samples[Measure::BurstDur.index()].push(burst_dur);
            set.samples[Measure::CycleDur.index()].push(cycle_dur);
            set.samples[Measure::DutyCycle.index()].push(duty_cycle);
            set.samples[Measure::Qi.index()].push(qi);
        }
        set
    }

    /// Extracts every trial; the first malformed trial fails the whole set.
    pub fn from_recordings(recordings: &[Recording]) -> Result<Self> {
        let trials = recordings
            .iter()
            .enumerate()
            .map(|(trial, rec)| {
                calculate_burst_measures(rec).map_err(|err| match err {
                    BurstError::MalformedRecording(msg) => {
                        BurstError::malformed(format!("trial {trial}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_trials(trials))
    }

    pub fn get(&self, measure: Measure) -> &TrialSamples {
        &self.samples[measure.index()]
    }

    pub fn trial_count(&self) -> usize {
        self.samples[Measure::BurstDur.index()].len()
    }

    /// Indices of trials whose unpaired final start was dropped.
    pub fn dropped_trailing_starts(&self) -> &[usize] {
        &self.dropped_trailing_starts
    }
}
