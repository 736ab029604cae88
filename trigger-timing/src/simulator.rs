use crate::channel::{ChannelAddress, ChannelRole, ChannelTable, CoincidenceScheme};
use crate::coincidence::{pairwise_coincidence, PairwiseWindows};
use crate::error::TriggerError;
use crate::filter::{fast_filter, find_trigger};
use crate::parameters::{ParameterTable, TriggerParameter};
use crate::window::LogicWindow;
use pixie_timing_common::{Sample, Tick, TRACE_LENGTH};
use tracing::{debug, trace};

/// Fixed propagation latency between a channel trigger and its discriminator
/// output reaching the coincidence logic, in ticks.
const LOGIC_LATENCY: Tick = 150;
/// Width of a validated fast-trigger pulse, in ticks.
const VALIDATED_TRIGGER_LENGTH: Tick = 8;

/// Everything one validation pass derives from the waveform store. The whole
/// struct is recomputed from scratch on every pass, so no stale window can
/// leak from a previous acquisition cycle.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DerivedState {
    trigger_times: ChannelTable<Option<Tick>>,
    fast_trigger: ChannelTable<LogicWindow>,
    validated_fast_trigger: ChannelTable<LogicWindow>,
    pairwise: PairwiseWindows,
    beta_pairwise_or: bool,
    global_validation: LogicWindow,
    global_validation_flag: bool,
    master_trigger: LogicWindow,
}

impl DerivedState {
    /// Tick at which the channel's filtered trace crossed its threshold, if
    /// any.
    pub fn trigger_time(&self, addr: ChannelAddress) -> Option<Tick> {
        self.trigger_times[addr]
    }

    /// The channel's delayed fast-trigger window, as presented to the
    /// validation logic (the `ExternDelayLen` shift included).
    pub fn fast_trigger(&self, addr: ChannelAddress) -> LogicWindow {
        self.fast_trigger[addr]
    }

    pub fn validated_fast_trigger(&self, addr: ChannelAddress) -> LogicWindow {
        self.validated_fast_trigger[addr]
    }

    pub fn pairwise_beta(&self, addr: ChannelAddress) -> LogicWindow {
        self.pairwise.beta[addr]
    }

    pub fn pairwise_vandle(&self, addr: ChannelAddress) -> LogicWindow {
        self.pairwise.vandle[addr]
    }

    pub fn channel_validation(&self, addr: ChannelAddress) -> LogicWindow {
        self.pairwise.channel_validation[addr]
    }

    pub fn beta_pairwise_or(&self) -> bool {
        self.beta_pairwise_or
    }

    pub fn global_validation(&self) -> LogicWindow {
        self.global_validation
    }

    pub fn is_validated(&self) -> bool {
        self.global_validation_flag
    }

    pub fn master_trigger(&self) -> LogicWindow {
        self.master_trigger
    }
}

/// The trigger-timing logic simulator. Holds one baseline-subtracted trace
/// per channel plus the programmable timing parameters, and reproduces the
/// front-end trigger pipeline over them on each [`validate`] call.
///
/// [`validate`]: TriggerSimulator::validate
pub struct TriggerSimulator {
    params: ParameterTable,
    roles: ChannelTable<ChannelRole>,
    scheme: CoincidenceScheme,
    waveforms: ChannelTable<Vec<Sample>>,
    derived: DerivedState,
}

impl Default for TriggerSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerSimulator {
    pub fn new() -> Self {
        let mut simulator = Self {
            params: ParameterTable::default(),
            roles: ChannelTable::default(),
            scheme: CoincidenceScheme::default(),
            waveforms: ChannelTable::from_fn(|_| vec![0.0; TRACE_LENGTH]),
            derived: DerivedState::default(),
        };
        simulator.apply_scheme(simulator.scheme);
        simulator
    }

    /// Copy a baseline-subtracted trace into the channel's waveform store at
    /// the given start tick. Samples beyond the copied range keep their
    /// previous value, so traces shorter than the store are padded by
    /// whatever `clear` left there.
    pub fn set_waveform(
        &mut self,
        module: usize,
        channel: usize,
        source: &[Sample],
        start_tick: usize,
    ) -> Result<(), TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        if source.is_empty() {
            return Err(TriggerError::EmptyWaveform);
        }
        if start_tick > TRACE_LENGTH {
            return Err(TriggerError::StartTickOutOfRange(start_tick));
        }
        let length = source.len().min(TRACE_LENGTH - start_tick);
        self.waveforms[addr][start_tick..start_tick + length].copy_from_slice(&source[..length]);
        Ok(())
    }

    /// Edit a timing parameter by its front-end name. Returns the previous
    /// value on success.
    pub fn set_parameter(
        &mut self,
        module: usize,
        channel: usize,
        name: &str,
        value: Tick,
    ) -> Result<Tick, TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        self.params.set_named(addr, name, value)
    }

    pub fn parameter(
        &self,
        module: usize,
        channel: usize,
        param: TriggerParameter,
    ) -> Result<Tick, TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        Ok(self.params.get(addr, param))
    }

    /// Set a channel's fast-filter threshold, returning the previous value.
    pub fn set_threshold(
        &mut self,
        module: usize,
        channel: usize,
        value: Tick,
    ) -> Result<Tick, TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        Ok(self.params.set_threshold(addr, value))
    }

    pub fn threshold(&self, module: usize, channel: usize) -> Result<Tick, TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        Ok(self.params.threshold(addr))
    }

    /// Set the working ADC amplitude range to 2^bits, rescaling every
    /// threshold to keep its fraction of full scale. Returns the previous
    /// range.
    pub fn set_adc_bit_range(&mut self, bits: u32) -> Tick {
        self.params.set_adc_bit_range(bits)
    }

    pub fn adc_range(&self) -> Tick {
        self.params.adc_range()
    }

    /// Apply a coincidence-scheme preset, assigning each module's channels
    /// their beta or VANDLE role.
    pub fn set_coincidence_scheme(&mut self, scheme: i32) -> Result<(), TriggerError> {
        let scheme = CoincidenceScheme::try_from(scheme)?;
        self.apply_scheme(scheme);
        Ok(())
    }

    pub fn scheme(&self) -> CoincidenceScheme {
        self.scheme
    }

    /// Override a single channel's role outside the scheme presets.
    pub fn set_role(
        &mut self,
        module: usize,
        channel: usize,
        role: ChannelRole,
    ) -> Result<(), TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        self.roles[addr] = role;
        Ok(())
    }

    pub fn role(&self, module: usize, channel: usize) -> Result<ChannelRole, TriggerError> {
        let addr = ChannelAddress::new(module, channel)?;
        Ok(self.roles[addr])
    }

    fn apply_scheme(&mut self, scheme: CoincidenceScheme) {
        self.scheme = scheme;
        let (beta_role, vandle_role) = scheme.roles();
        for addr in ChannelAddress::all() {
            self.roles[addr] = if addr.module() == 0 {
                beta_role
            } else {
                vandle_role
            };
        }
    }

    /// Recompute every derived quantity from the current waveform store and
    /// parameters, returning the global-validation flag.
    pub fn validate(&mut self) -> bool {
        self.derived = compute_pass(&self.waveforms, &self.params, &self.roles);
        debug!(
            beta_pairwise_or = self.derived.beta_pairwise_or,
            validated = self.derived.global_validation_flag,
            "trigger validation pass"
        );
        self.derived.global_validation_flag
    }

    /// The windows and flags derived by the last `validate` call, for the
    /// display layer to draw.
    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// Zero the waveform store and all derived state. Parameters, thresholds
    /// and channel roles survive.
    pub fn clear(&mut self) {
        for addr in ChannelAddress::all() {
            self.waveforms[addr].fill(0.0);
        }
        self.derived = DerivedState::default();
    }
}

/// One full pass of the trigger pipeline, a pure function of the waveform
/// store, parameters and roles.
fn compute_pass(
    waveforms: &ChannelTable<Vec<Sample>>,
    params: &ParameterTable,
    roles: &ChannelTable<ChannelRole>,
) -> DerivedState {
    let mut state = DerivedState::default();

    // Fast filter and threshold trigger per channel, then the fast-trigger
    // window: logic latency plus the programmable output delay, stretched by
    // FastTrigBackLen.
    for addr in ChannelAddress::all() {
        let filtered = fast_filter(&waveforms[addr]);
        let Some(trigger) = find_trigger(&filtered, params.threshold(addr)) else {
            continue;
        };
        trace!(
            module = addr.module(),
            channel = addr.channel(),
            trigger,
            "channel trigger"
        );
        state.trigger_times[addr] = Some(trigger);
        let start = trigger + LOGIC_LATENCY + params.get(addr, TriggerParameter::FtrigoutDelay);
        state.fast_trigger[addr] =
            LogicWindow::active(start, start + params.get(addr, TriggerParameter::FastTrigBackLen));
    }

    // Pairwise coincidence within each module.
    state.pairwise = pairwise_coincidence(&state.fast_trigger, roles, params);

    // Shift each fast trigger by the external delay that lines it up with
    // the validation triggers, then mark it validated if its leading edge
    // lands inside the channel-validation window.
    for addr in ChannelAddress::all() {
        state.fast_trigger[addr] =
            state.fast_trigger[addr].delayed(params.get(addr, TriggerParameter::ExternDelayLen));
        if let Some(start) = state.fast_trigger[addr].start() {
            if state.pairwise.channel_validation[addr].contains(start) {
                state.validated_fast_trigger[addr] =
                    LogicWindow::active(start, start + VALIDATED_TRIGGER_LENGTH);
            }
        }
    }

    // Module-level OR over the beta pairwise triggers.
    state.beta_pairwise_or = state.pairwise.beta[ChannelAddress::BETA_LEAD].is_active();

    // Global validation: the beta pairwise window against the VANDLE one.
    if state.beta_pairwise_or {
        state.global_validation = state.pairwise.beta[ChannelAddress::BETA_LEAD]
            .intersect(state.pairwise.vandle[ChannelAddress::VANDLE_LEAD]);
        state.global_validation_flag = state.global_validation.is_active();
    }

    // Master trigger: the stretched global validation window.
    if state.global_validation_flag {
        state.master_trigger = state
            .global_validation
            .stretched_from_stop(params.get(ChannelAddress::BETA_LEAD, TriggerParameter::ExtTrigStretch));
    }

    state
}
