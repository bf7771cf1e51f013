// src/error.rs

//! Error types for burst analysis.

use std::fmt;

use thiserror::Error;

/// Unified error type for every stage of the pipeline.
#[derive(Error, Debug)]
pub enum BurstError {
    /// Empty, non-finite or non-increasing timestamps, or no complete burst.
    #[error("malformed recording: {0}")]
    MalformedRecording(String),

    #[error("unknown measure '{0}' (expected one of burstDur, cycleDur, dutyCycle, qI)")]
    UnknownMeasure(String),

    /// A sample sequence (or the list of trials itself) had no values.
    #[error("empty sample{}", .trial.map(|t| format!(" in trial {t}")).unwrap_or_default())]
    EmptySample { trial: Option<usize> },

    #[error("cumulative probability {p} outside quantile domain [{min}, {max}]")]
    OutOfDomain { p: f64, min: f64, max: f64 },

    /// Probabilities decrease, or repeat while flat regions are rejected.
    #[error("CDF not invertible at bin {index}: {reason}")]
    NonMonotonicDomain { index: usize, reason: String },

    #[error("invalid bins: {0}")]
    InvalidBins(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV cell that is not a number.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Fieldless view of `BurstError`, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    MalformedRecording,
    UnknownMeasure,
    EmptySample,
    OutOfDomain,
    NonMonotonicDomain,
    InvalidBins,
    Config,
    Io,
    Csv,
    Parse,
}

impl BurstError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BurstError::MalformedRecording(_) => ErrorKind::MalformedRecording,
            BurstError::UnknownMeasure(_) => ErrorKind::UnknownMeasure,
            BurstError::EmptySample { .. } => ErrorKind::EmptySample,
            BurstError::OutOfDomain { .. } => ErrorKind::OutOfDomain,
            BurstError::NonMonotonicDomain { .. } => ErrorKind::NonMonotonicDomain,
            BurstError::InvalidBins(_) => ErrorKind::InvalidBins,
            BurstError::Config(_) => ErrorKind::Config,
            BurstError::Io(_) => ErrorKind::Io,
            BurstError::Csv(_) => ErrorKind::Csv,
            BurstError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        BurstError::MalformedRecording(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        BurstError::Config(message.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MalformedRecording => "MalformedRecordingError",
            ErrorKind::UnknownMeasure => "UnknownMeasureError",
            ErrorKind::EmptySample => "EmptySampleError",
            ErrorKind::OutOfDomain => "OutOfDomainError",
            ErrorKind::NonMonotonicDomain => "NonMonotonicDomainError",
            ErrorKind::InvalidBins => "InvalidBinsError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Io => "IoError",
            ErrorKind::Csv => "CsvError",
            ErrorKind::Parse => "ParseError",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, BurstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = BurstError::EmptySample { trial: Some(2) };
        assert_eq!(err.kind().to_string(), "EmptySampleError");
        assert_eq!(err.to_string(), "empty sample in trial 2");
        assert_eq!(BurstError::EmptySample { trial: None }.to_string(), "empty sample");
    }

    #[test]
    fn test_out_of_domain_message() {
        let err = BurstError::OutOfDomain { p: 1.5, min: 0.0, max: 1.0 };
        assert_eq!(err.kind(), ErrorKind::OutOfDomain);
        assert!(err.to_string().contains("1.5"));
    }
}
