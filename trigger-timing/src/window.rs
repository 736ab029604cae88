use pixie_timing_common::Tick;

/// A [start, stop] interval of ticks during which a derived logic signal is
/// high. `Inactive` replaces the `stop == 0` sentinel the hardware registers
/// use, so a window legitimately stopping at tick 0 stays unambiguous.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogicWindow {
    #[default]
    Inactive,
    Active {
        start: Tick,
        stop: Tick,
    },
}

impl LogicWindow {
    pub(crate) fn active(start: Tick, stop: Tick) -> Self {
        Self::Active { start, stop }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn start(&self) -> Option<Tick> {
        match self {
            Self::Active { start, .. } => Some(*start),
            Self::Inactive => None,
        }
    }

    pub fn stop(&self) -> Option<Tick> {
        match self {
            Self::Active { stop, .. } => Some(*stop),
            Self::Inactive => None,
        }
    }

    /// Shift both edges, modelling a cable or logic delay.
    pub(crate) fn delayed(self, delay: Tick) -> Self {
        match self {
            Self::Active { start, stop } => Self::Active {
                start: start + delay,
                stop: stop + delay,
            },
            Self::Inactive => Self::Inactive,
        }
    }

    /// A new window of the given length starting where this one stops.
    pub(crate) fn stretched_from_stop(self, length: Tick) -> Self {
        match self {
            Self::Active { stop, .. } => Self::Active {
                start: stop,
                stop: stop + length,
            },
            Self::Inactive => Self::Inactive,
        }
    }

    pub(crate) fn contains(&self, tick: Tick) -> bool {
        matches!(self, Self::Active { start, stop } if (*start..=*stop).contains(&tick))
    }

    /// Intersection of two windows. Empty intersections (stop not strictly
    /// after start) collapse to `Inactive`.
    pub(crate) fn intersect(self, other: Self) -> Self {
        if let (
            Self::Active {
                start: a_start,
                stop: a_stop,
            },
            Self::Active {
                start: b_start,
                stop: b_stop,
            },
        ) = (self, other)
        {
            let start = a_start.max(b_start);
            let stop = a_stop.min(b_stop);
            if stop > start {
                return Self::Active { start, stop };
            }
        }
        Self::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delayed_shifts_both_edges() {
        let window = LogicWindow::active(650, 698);
        assert_eq!(window.delayed(104), LogicWindow::active(754, 802));
        assert_eq!(LogicWindow::Inactive.delayed(104), LogicWindow::Inactive);
    }

    #[test]
    fn stretch_starts_at_the_stop_tick() {
        let window = LogicWindow::active(650, 698);
        assert_eq!(window.stretched_from_stop(200), LogicWindow::active(698, 898));
        assert_eq!(
            LogicWindow::Inactive.stretched_from_stop(200),
            LogicWindow::Inactive
        );
    }

    #[test]
    fn contains_is_inclusive_at_both_edges() {
        let window = LogicWindow::active(10, 20);
        assert!(window.contains(10));
        assert!(window.contains(20));
        assert!(!window.contains(9));
        assert!(!window.contains(21));
        assert!(!LogicWindow::Inactive.contains(0));
    }

    #[test]
    fn intersect_overlapping_windows() {
        let a = LogicWindow::active(650, 698);
        let b = LogicWindow::active(640, 690);
        assert_eq!(a.intersect(b), LogicWindow::active(650, 690));
    }

    #[test]
    fn intersect_disjoint_or_touching_is_inactive() {
        let a = LogicWindow::active(0, 10);
        let b = LogicWindow::active(20, 30);
        assert_eq!(a.intersect(b), LogicWindow::Inactive);
        // Windows that merely touch have an empty intersection.
        let c = LogicWindow::active(10, 20);
        assert_eq!(a.intersect(c), LogicWindow::Inactive);
        assert_eq!(a.intersect(LogicWindow::Inactive), LogicWindow::Inactive);
    }
}
