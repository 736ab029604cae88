use crate::parameters::TriggerParameter;
use pixie_timing_common::Tick;
use thiserror::Error;

/// Every public entry point rejects bad input locally with one of these;
/// no variant is fatal and failed calls leave the simulator untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    #[error("invalid channel address: module {module}, channel {channel}")]
    InvalidChannelIndex { module: usize, channel: usize },
    #[error("no parameter named \"{0}\" in the parameter list")]
    UnknownParameterName(String),
    #[error("value {value} is outside the valid range [{low}, {high}] for \"{name}\"")]
    ValueOutOfRange {
        name: TriggerParameter,
        value: Tick,
        low: Tick,
        high: Tick,
    },
    #[error("invalid coincidence scheme {0}, expected a value in [0, 3]")]
    InvalidCoincidenceScheme(i32),
    #[error("waveform source is empty")]
    EmptyWaveform,
    #[error("waveform start tick {0} lies beyond the end of the trace")]
    StartTickOutOfRange(usize),
}
