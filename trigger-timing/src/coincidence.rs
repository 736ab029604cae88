use crate::channel::{ChannelAddress, ChannelRole, ChannelTable};
use crate::parameters::{ParameterTable, TriggerParameter};
use crate::window::LogicWindow;
use pixie_timing_common::Tick;

/// Windows produced by the pairwise stage. Each module's pair shares its
/// windows, mirrored onto both sibling channels.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct PairwiseWindows {
    pub(crate) beta: ChannelTable<LogicWindow>,
    pub(crate) vandle: ChannelTable<LogicWindow>,
    pub(crate) channel_validation: ChannelTable<LogicWindow>,
}

/// Fixed-width overlap test between the fast-trigger windows of a detector
/// pair: coincident iff the later window's leading edge falls within the
/// earlier window's active width. Returns the overlap window's edges.
fn pairwise_overlap(
    even: LogicWindow,
    odd: LogicWindow,
    back_len: Tick,
) -> Option<(Tick, Tick)> {
    let (Some(even_start), Some(odd_start)) = (even.start(), odd.start()) else {
        return None;
    };
    let lo = even_start.min(odd_start);
    let hi = even_start.max(odd_start);
    (hi <= lo + back_len).then_some((hi, lo + back_len))
}

/// Intersect each module's sibling fast-trigger windows into role-tagged
/// pairwise-coincidence windows, and stretch the populated one into the
/// channel-validation window.
pub(crate) fn pairwise_coincidence(
    fast_triggers: &ChannelTable<LogicWindow>,
    roles: &ChannelTable<ChannelRole>,
    params: &ParameterTable,
) -> PairwiseWindows {
    let mut out = PairwiseWindows::default();
    for lead in ChannelAddress::pair_leads() {
        let pair = lead.sibling();
        let back_len = params.get(lead, TriggerParameter::FastTrigBackLen);
        let Some((hi, stop)) = pairwise_overlap(fast_triggers[lead], fast_triggers[pair], back_len)
        else {
            continue;
        };
        let window = LogicWindow::active(hi, stop);
        // Both sibling channels expose the pair's windows.
        let role = roles[lead];
        if role.is_vandle() {
            out.vandle[lead] = window;
            out.vandle[pair] = window;
        } else if role.is_beta() {
            out.beta[lead] = window;
            out.beta[pair] = window;
        } else {
            // An unset role feeds neither coincidence path.
            continue;
        }
        let validation =
            window.stretched_from_stop(params.get(lead, TriggerParameter::ChanTrigStretch));
        out.channel_validation[lead] = validation;
        out.channel_validation[pair] = validation;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_triggers(windows: [LogicWindow; 4]) -> ChannelTable<LogicWindow> {
        let mut table = ChannelTable::default();
        for (addr, window) in ChannelAddress::all().zip(windows) {
            table[addr] = window;
        }
        table
    }

    fn beta_vandle_roles() -> ChannelTable<ChannelRole> {
        let mut roles = ChannelTable::default();
        for addr in ChannelAddress::all() {
            roles[addr] = if addr.module() == 0 {
                ChannelRole::Beta
            } else {
                ChannelRole::Vandle
            };
        }
        roles
    }

    #[test]
    fn equal_starts_are_coincident() {
        // Boundary case hi == lo.
        assert_eq!(
            pairwise_overlap(LogicWindow::active(650, 698), LogicWindow::active(650, 698), 48),
            Some((650, 698))
        );
    }

    #[test]
    fn leading_edge_at_the_window_limit_is_coincident() {
        assert_eq!(
            pairwise_overlap(LogicWindow::active(650, 698), LogicWindow::active(698, 746), 48),
            Some((698, 698))
        );
        assert_eq!(
            pairwise_overlap(LogicWindow::active(650, 698), LogicWindow::active(699, 747), 48),
            None
        );
    }

    #[test]
    fn a_single_active_window_is_never_coincident() {
        assert_eq!(
            pairwise_overlap(LogicWindow::active(650, 698), LogicWindow::Inactive, 48),
            None
        );
        assert_eq!(pairwise_overlap(LogicWindow::Inactive, LogicWindow::Inactive, 48), None);
    }

    #[test]
    fn windows_are_tagged_by_the_lead_channel_role() {
        let triggers = fast_triggers([
            LogicWindow::active(650, 698),
            LogicWindow::active(660, 708),
            LogicWindow::active(650, 698),
            LogicWindow::active(650, 698),
        ]);
        let out = pairwise_coincidence(&triggers, &beta_vandle_roles(), &ParameterTable::default());

        // Module 0 (beta roles): overlap [660, 650+48].
        assert_eq!(out.beta[ChannelAddress::BETA_LEAD], LogicWindow::active(660, 698));
        assert_eq!(out.vandle[ChannelAddress::BETA_LEAD], LogicWindow::Inactive);
        assert_eq!(
            out.channel_validation[ChannelAddress::BETA_LEAD],
            LogicWindow::active(698, 898)
        );

        // Module 1 (vandle roles).
        assert_eq!(out.vandle[ChannelAddress::VANDLE_LEAD], LogicWindow::active(650, 698));
        assert_eq!(out.beta[ChannelAddress::VANDLE_LEAD], LogicWindow::Inactive);

        // Mirrored onto the odd siblings.
        assert_eq!(
            out.beta[ChannelAddress::BETA_LEAD.sibling()],
            out.beta[ChannelAddress::BETA_LEAD]
        );
        assert_eq!(
            out.channel_validation[ChannelAddress::VANDLE_LEAD.sibling()],
            out.channel_validation[ChannelAddress::VANDLE_LEAD]
        );
    }

    #[test]
    fn unset_roles_feed_no_path() {
        let triggers = fast_triggers([
            LogicWindow::active(650, 698),
            LogicWindow::active(650, 698),
            LogicWindow::Inactive,
            LogicWindow::Inactive,
        ]);
        let out =
            pairwise_coincidence(&triggers, &ChannelTable::default(), &ParameterTable::default());
        assert_eq!(out, PairwiseWindows::default());
    }

    #[test]
    fn separated_pair_yields_no_windows() {
        let triggers = fast_triggers([
            LogicWindow::active(650, 698),
            LogicWindow::active(800, 848),
            LogicWindow::Inactive,
            LogicWindow::Inactive,
        ]);
        let out =
            pairwise_coincidence(&triggers, &beta_vandle_roles(), &ParameterTable::default());
        assert_eq!(out, PairwiseWindows::default());
    }
}
