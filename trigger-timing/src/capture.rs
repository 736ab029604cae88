use crate::channel::CoincidenceScheme;
use pixie_timing_common::{CHANNEL_COUNT, TRACE_LENGTH};

/// Decides whether a set of captured events is worth handing to the
/// simulator at all, before any waveform is injected. Slots 0/1 are the
/// start (beta) pair, slots 2/3 the stop (VANDLE) pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaptureGate {
    scheme: CoincidenceScheme,
}

impl CaptureGate {
    pub fn new(scheme: CoincidenceScheme) -> Self {
        Self { scheme }
    }

    pub fn accepts(&self, present: [bool; CHANNEL_COUNT]) -> bool {
        let [beta_0, beta_1, vandle_0, vandle_1] = present;
        match self.scheme {
            CoincidenceScheme::Singles => beta_0 || beta_1 || vandle_0 || vandle_1,
            CoincidenceScheme::Doubles => (beta_0 && beta_1) || (vandle_0 && vandle_1),
            CoincidenceScheme::Triples => (beta_0 || beta_1) && (vandle_0 && vandle_1),
            CoincidenceScheme::Quads => (beta_0 && beta_1) && (vandle_0 && vandle_1),
        }
    }
}

/// Start-tick offsets of each captured event relative to the earliest one,
/// for aligning the traces within the waveform store. Slots lagging by a
/// full trace length or more are dropped.
pub fn trace_offsets(times: [Option<f64>; CHANNEL_COUNT]) -> [Option<usize>; CHANNEL_COUNT] {
    let first = times
        .iter()
        .flatten()
        .fold(f64::INFINITY, |acc, &time| acc.min(time));
    times.map(|time| {
        time.and_then(|time| {
            let offset = (time - first) as usize;
            (offset < TRACE_LENGTH).then_some(offset)
        })
    })
}
