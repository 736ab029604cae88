use crate::channel::{ChannelAddress, ChannelTable};
use crate::error::TriggerError;
use pixie_timing_common::Tick;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

const DEFAULT_ADC_BITS: u32 = 12;
const DEFAULT_THRESHOLD: Tick = 5;

/// The five programmable trigger-timing quantities, independently valued per
/// channel. Names match the front-end parameter set verbatim so that values
/// vetted here can be copied straight into the hardware configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum TriggerParameter {
    FastTrigBackLen,
    FtrigoutDelay,
    ExternDelayLen,
    ExtTrigStretch,
    ChanTrigStretch,
}

impl TriggerParameter {
    /// Inclusive validity range, in ticks.
    pub fn limits(&self) -> (Tick, Tick) {
        match self {
            Self::FastTrigBackLen => (8, 32760),
            Self::FtrigoutDelay => (0, 1016),
            Self::ExternDelayLen => (0, 2040),
            Self::ExtTrigStretch => (8, 32760),
            Self::ChanTrigStretch => (8, 32760),
        }
    }

    pub fn default_value(&self) -> Tick {
        match self {
            Self::FastTrigBackLen => 48,
            Self::FtrigoutDelay => 0,
            Self::ExternDelayLen => 104,
            Self::ExtTrigStretch => 400,
            Self::ChanTrigStretch => 200,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FastTrigBackLen => {
                "Stretch the fast trigger before using for coincidence (basically the coincidence window width)"
            }
            Self::FtrigoutDelay => "Delay the fast trigger before it is used in coincidence",
            Self::ExternDelayLen => {
                "Delay the local fast trigger to compensate for delayed channel or global validation trigger"
            }
            Self::ExtTrigStretch => "Stretch the external global validation trigger (triples)",
            Self::ChanTrigStretch => "Stretch the channel validation trigger (doubles)",
        }
    }
}

/// One (name, description) row per registry entry, for command help output.
pub fn parameter_help() -> impl Iterator<Item = (TriggerParameter, &'static str)> {
    TriggerParameter::iter().map(|param| (param, param.description()))
}

/// Per-channel values of the five trigger parameters, the fast-filter
/// thresholds, and the working ADC amplitude range.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParameterTable {
    fast_trig_back_len: ChannelTable<Tick>,
    ftrigout_delay: ChannelTable<Tick>,
    extern_delay_len: ChannelTable<Tick>,
    ext_trig_stretch: ChannelTable<Tick>,
    chan_trig_stretch: ChannelTable<Tick>,
    thresholds: ChannelTable<Tick>,
    adc_range: Tick,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self {
            fast_trig_back_len: ChannelTable::filled(TriggerParameter::FastTrigBackLen.default_value()),
            ftrigout_delay: ChannelTable::filled(TriggerParameter::FtrigoutDelay.default_value()),
            extern_delay_len: ChannelTable::filled(TriggerParameter::ExternDelayLen.default_value()),
            ext_trig_stretch: ChannelTable::filled(TriggerParameter::ExtTrigStretch.default_value()),
            chan_trig_stretch: ChannelTable::filled(TriggerParameter::ChanTrigStretch.default_value()),
            thresholds: ChannelTable::filled(DEFAULT_THRESHOLD),
            adc_range: 1 << DEFAULT_ADC_BITS,
        }
    }
}

impl ParameterTable {
    fn table(&self, param: TriggerParameter) -> &ChannelTable<Tick> {
        match param {
            TriggerParameter::FastTrigBackLen => &self.fast_trig_back_len,
            TriggerParameter::FtrigoutDelay => &self.ftrigout_delay,
            TriggerParameter::ExternDelayLen => &self.extern_delay_len,
            TriggerParameter::ExtTrigStretch => &self.ext_trig_stretch,
            TriggerParameter::ChanTrigStretch => &self.chan_trig_stretch,
        }
    }

    fn table_mut(&mut self, param: TriggerParameter) -> &mut ChannelTable<Tick> {
        match param {
            TriggerParameter::FastTrigBackLen => &mut self.fast_trig_back_len,
            TriggerParameter::FtrigoutDelay => &mut self.ftrigout_delay,
            TriggerParameter::ExternDelayLen => &mut self.extern_delay_len,
            TriggerParameter::ExtTrigStretch => &mut self.ext_trig_stretch,
            TriggerParameter::ChanTrigStretch => &mut self.chan_trig_stretch,
        }
    }

    pub(crate) fn get(&self, addr: ChannelAddress, param: TriggerParameter) -> Tick {
        self.table(param)[addr]
    }

    /// Set a parameter after checking its registered limits; the previous
    /// value is returned on success.
    pub(crate) fn set(
        &mut self,
        addr: ChannelAddress,
        param: TriggerParameter,
        value: Tick,
    ) -> Result<Tick, TriggerError> {
        let (low, high) = param.limits();
        if !(low..=high).contains(&value) {
            return Err(TriggerError::ValueOutOfRange {
                name: param,
                value,
                low,
                high,
            });
        }
        Ok(std::mem::replace(&mut self.table_mut(param)[addr], value))
    }

    /// Dispatch a parameter edit by name, as the command surface supplies it.
    pub(crate) fn set_named(
        &mut self,
        addr: ChannelAddress,
        name: &str,
        value: Tick,
    ) -> Result<Tick, TriggerError> {
        let param = TriggerParameter::from_str(name)
            .map_err(|_| TriggerError::UnknownParameterName(name.to_owned()))?;
        self.set(addr, param, value)
    }

    pub(crate) fn threshold(&self, addr: ChannelAddress) -> Tick {
        self.thresholds[addr]
    }

    pub(crate) fn set_threshold(&mut self, addr: ChannelAddress, value: Tick) -> Tick {
        std::mem::replace(&mut self.thresholds[addr], value)
    }

    pub(crate) fn adc_range(&self) -> Tick {
        self.adc_range
    }

    /// Set the working amplitude range to 2^bits, rescaling every stored
    /// threshold so its fraction of full scale is preserved. Returns the
    /// previous range.
    pub(crate) fn set_adc_bit_range(&mut self, bits: u32) -> Tick {
        let old_range = self.adc_range;
        // 2^bits saturates once it no longer fits a positive Tick.
        self.adc_range = if bits < 31 { 1 << bits } else { Tick::MAX };
        for addr in ChannelAddress::all() {
            self.thresholds[addr] =
                (self.thresholds[addr] as f64 * self.adc_range as f64 / old_range as f64) as Tick;
        }
        old_range
    }
}
