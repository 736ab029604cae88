use crate::error::TriggerError;
use pixie_timing_common::{channel_index, CHANNELS_PER_MODULE, CHANNEL_COUNT, MODULE_COUNT};
use std::ops::{Index, IndexMut};
use strum::Display;

/// A validated (module, channel) pair. Module 0 is the beta detector pair,
/// module 1 the VANDLE pair; within a module the two channels form the
/// pairwise-coincidence candidates. Out-of-range indices are rejected here
/// so that everything downstream can index its tables without checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelAddress {
    module: usize,
    channel: usize,
}

impl ChannelAddress {
    /// Channel (0, 0), carrying the beta pair's shared windows.
    pub const BETA_LEAD: Self = Self {
        module: 0,
        channel: 0,
    };
    /// Channel (1, 0), carrying the VANDLE pair's shared windows.
    pub const VANDLE_LEAD: Self = Self {
        module: 1,
        channel: 0,
    };

    pub fn new(module: usize, channel: usize) -> Result<Self, TriggerError> {
        if module >= MODULE_COUNT || channel >= CHANNELS_PER_MODULE {
            return Err(TriggerError::InvalidChannelIndex { module, channel });
        }
        Ok(Self { module, channel })
    }

    pub fn module(&self) -> usize {
        self.module
    }

    pub fn channel(&self) -> usize {
        self.channel
    }

    /// The other channel of the same module's detector pair.
    pub fn sibling(&self) -> Self {
        Self {
            module: self.module,
            channel: self.channel ^ 1,
        }
    }

    pub(crate) fn flat(&self) -> usize {
        channel_index(self.module, self.channel)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..MODULE_COUNT).flat_map(|module| {
            (0..CHANNELS_PER_MODULE).map(move |channel| Self { module, channel })
        })
    }

    /// The even channel of each module, which carries its pair's windows.
    pub(crate) fn pair_leads() -> impl Iterator<Item = Self> {
        (0..MODULE_COUNT).map(|module| Self { module, channel: 0 })
    }
}

/// Fixed-capacity table holding one value per channel, keyed by a validated
/// address rather than raw integers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChannelTable<T>([T; CHANNEL_COUNT]);

impl<T> ChannelTable<T> {
    pub(crate) fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self(std::array::from_fn(f))
    }
}

impl<T: Copy> ChannelTable<T> {
    pub(crate) fn filled(value: T) -> Self {
        Self([value; CHANNEL_COUNT])
    }
}

impl<T: Default> Default for ChannelTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<ChannelAddress> for ChannelTable<T> {
    type Output = T;

    fn index(&self, addr: ChannelAddress) -> &T {
        &self.0[addr.flat()]
    }
}

impl<T> IndexMut<ChannelAddress> for ChannelTable<T> {
    fn index_mut(&mut self, addr: ChannelAddress) -> &mut T {
        &mut self.0[addr.flat()]
    }
}

/// Which coincidence path a channel's fast-trigger window feeds into,
/// assigned per channel by the coincidence-scheme preset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChannelRole {
    Beta,
    BetaPw,
    Vandle,
    Neutron,
    #[default]
    Unset,
}

impl ChannelRole {
    pub(crate) fn is_beta(&self) -> bool {
        matches!(self, Self::Beta | Self::BetaPw)
    }

    pub(crate) fn is_vandle(&self) -> bool {
        matches!(self, Self::Vandle | Self::Neutron)
    }
}

/// Triggering scheme presets, named for how many of the four channels must
/// hold an event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum CoincidenceScheme {
    Singles,
    Doubles,
    #[default]
    Triples,
    Quads,
}

impl TryFrom<i32> for CoincidenceScheme {
    type Error = TriggerError;

    fn try_from(scheme: i32) -> Result<Self, TriggerError> {
        match scheme {
            0 => Ok(Self::Singles),
            1 => Ok(Self::Doubles),
            2 => Ok(Self::Triples),
            3 => Ok(Self::Quads),
            _ => Err(TriggerError::InvalidCoincidenceScheme(scheme)),
        }
    }
}

impl CoincidenceScheme {
    /// Role preset applied to (module 0, module 1). The hardware tool this
    /// models assigns the same pair for Doubles and Quads.
    pub(crate) fn roles(&self) -> (ChannelRole, ChannelRole) {
        match self {
            Self::Singles => (ChannelRole::Beta, ChannelRole::Neutron),
            Self::Doubles => (ChannelRole::BetaPw, ChannelRole::Vandle),
            Self::Triples => (ChannelRole::Beta, ChannelRole::Vandle),
            Self::Quads => (ChannelRole::BetaPw, ChannelRole::Vandle),
        }
    }
}
