pub type Tick = i32;
pub type Sample = f64;

pub const MODULE_COUNT: usize = 2;
pub const CHANNELS_PER_MODULE: usize = 2;
pub const CHANNEL_COUNT: usize = MODULE_COUNT * CHANNELS_PER_MODULE;

/// Number of samples in a captured trace.
pub const TRACE_LENGTH: usize = 1000;

pub fn channel_index(module_index: usize, channel_index: usize) -> usize {
    (module_index * CHANNELS_PER_MODULE) + channel_index
}
