//! Software model of the digital trigger pipeline of a four-channel
//! beta/VANDLE digitizer setup.
//!
//! Given the baseline-subtracted traces captured on up to four channels, the
//! simulator reproduces the front-end trigger logic in software: a fast
//! digital filter and threshold trigger per channel, the programmable
//! delay/stretch chain that turns each trigger into a logic-level timing
//! window, pairwise coincidence within each detector pair, module-level
//! validation, and finally the global validation and master triggers. An
//! operator can thereby predict whether the hardware would have accepted an
//! event before committing timing parameters to the front end.
//!
//! ```rust
//! use trigger_timing::TriggerSimulator;
//!
//! let mut sim = TriggerSimulator::new();
//! let trace: Vec<f64> = (0..1000).map(|k| if k < 500 { 0.0 } else { 100.0 }).collect();
//! sim.set_waveform(0, 0, &trace, 0).unwrap();
//!
//! // A single channel never satisfies the pairwise coincidence requirement.
//! assert!(!sim.validate());
//! ```

mod capture;
mod channel;
mod coincidence;
mod error;
mod filter;
mod parameters;
mod simulator;
mod window;

pub use capture::{trace_offsets, CaptureGate};
pub use channel::{ChannelAddress, ChannelRole, CoincidenceScheme};
pub use error::TriggerError;
pub use parameters::{parameter_help, TriggerParameter};
pub use simulator::{DerivedState, TriggerSimulator};
pub use window::LogicWindow;
