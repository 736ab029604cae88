use pixie_timing_common::{Sample, Tick};

/// Rise length of the trigger filter (L), in ticks.
const TRIGGER_RISETIME: isize = 16;
/// Flat-top gap of the trigger filter (G), in ticks.
const TRIGGER_FLATTOP: isize = 0;

/// Output of the fast filter over one trace, together with the tick of its
/// maximum. Ties keep the first tick reached.
pub(crate) struct FilteredTrace {
    samples: Vec<Sample>,
    max_index: usize,
}

/// Trapezoidal fast filter: for each tick the sum of the leading L samples
/// minus the sum of the L samples behind the flat-top gap. Responds strongly
/// to a rising edge and stays near zero over flat baseline. Indices outside
/// the trace contribute zero.
pub(crate) fn fast_filter(trace: &[Sample]) -> FilteredTrace {
    let len = trace.len() as isize;
    let mut samples = vec![0.0; trace.len()];
    let mut max_index = 0;
    let mut maximum = Sample::MIN;
    for k in 0..len {
        let mut acc = 0.0;
        for l in (k - 2 * TRIGGER_RISETIME - TRIGGER_FLATTOP + 1)..=(k - TRIGGER_RISETIME - TRIGGER_FLATTOP) {
            if (0..len).contains(&l) {
                acc -= trace[l as usize];
            }
        }
        for l in (k - TRIGGER_RISETIME + 1)..=k {
            if (0..len).contains(&l) {
                acc += trace[l as usize];
            }
        }
        samples[k as usize] = acc;
        if acc > maximum {
            maximum = acc;
            max_index = k as usize;
        }
    }
    FilteredTrace { samples, max_index }
}

/// Scan backward from the filter maximum, down to tick 3, for the first
/// rising crossing of the threshold. A maximum stuck at tick 0 means the
/// trace never rose, so the channel holds no trigger.
pub(crate) fn find_trigger(filtered: &FilteredTrace, threshold: Tick) -> Option<Tick> {
    if filtered.max_index == 0 {
        return None;
    }
    let threshold = threshold as Sample;
    for k in (3..=filtered.max_index).rev() {
        if filtered.samples[k - 1] < threshold && filtered.samples[k] >= threshold {
            return Some(k as Tick);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixie_timing_common::TRACE_LENGTH;
    use rand::Rng;

    fn step_trace(edge: usize, amplitude: Sample) -> Vec<Sample> {
        let mut trace = vec![0.0; TRACE_LENGTH];
        trace[edge..].fill(amplitude);
        trace
    }

    #[test]
    fn flat_trace_has_no_trigger() {
        let filtered = fast_filter(&vec![0.0; TRACE_LENGTH]);
        assert_eq!(filtered.max_index, 0);
        assert_eq!(find_trigger(&filtered, 5), None);
    }

    #[test]
    fn step_filter_ramps_over_the_rise_length() {
        let filtered = fast_filter(&step_trace(500, 100.0));
        assert_eq!(filtered.samples[499], 0.0);
        assert_eq!(filtered.samples[500], 100.0);
        assert_eq!(filtered.samples[507], 800.0);
        // Leading window full, trailing window still on baseline.
        assert_eq!(filtered.samples[515], 1600.0);
        // Trailing window catches up and cancels the step.
        assert_eq!(filtered.samples[531], 0.0);
        assert_eq!(filtered.max_index, 515);
    }

    #[test]
    fn trigger_is_the_first_rising_crossing_below_the_maximum() {
        let filtered = fast_filter(&step_trace(500, 100.0));
        assert_eq!(find_trigger(&filtered, 5), Some(500));
        assert_eq!(find_trigger(&filtered, 150), Some(501));
    }

    #[test]
    fn threshold_above_the_peak_finds_no_crossing() {
        let filtered = fast_filter(&step_trace(500, 100.0));
        assert_eq!(find_trigger(&filtered, 2000), None);
    }

    #[test]
    fn tie_keeps_the_first_maximum() {
        let mut trace = vec![0.0; TRACE_LENGTH];
        trace[100..150].fill(100.0);
        trace[600..650].fill(100.0);
        let filtered = fast_filter(&trace);
        assert_eq!(filtered.samples[115], 1600.0);
        assert_eq!(filtered.samples[615], 1600.0);
        assert_eq!(filtered.max_index, 115);
    }

    #[test]
    fn subthreshold_noise_never_triggers() {
        // The filter sums 16 samples each way, so |filtered| < 32 for noise
        // bounded by 1; a threshold of 40 can never be crossed.
        let mut rng = rand::rng();
        let trace: Vec<Sample> = (0..TRACE_LENGTH)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        let filtered = fast_filter(&trace);
        assert_eq!(find_trigger(&filtered, 40), None);
    }
}
