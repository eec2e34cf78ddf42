use crate::action::RejectReason;

/// Counters describing what happened to one tick's commands.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// Commands received.
    pub commands: usize,
    /// Commands that became intents.
    pub accepted: usize,
    rejections: [usize; RejectReason::ALL.len()],
    /// Intents examined by the resolver that had no effect.
    pub skipped_intents: usize,
    /// Intents never examined because the per-tick log cap was reached.
    pub dropped_intents: usize,
    /// Combat events cut by the zone's per-tick event budget.
    pub events_over_budget: usize,
}

impl TickReport {
    /// Empty report for a tick that received `commands` commands.
    pub fn new(commands: usize) -> Self {
        Self {
            commands,
            ..Self::default()
        }
    }

    pub fn reject(&mut self, reason: RejectReason) {
        self.rejections[reason as usize] += 1;
    }

    pub fn rejected(&self, reason: RejectReason) -> usize {
        self.rejections[reason as usize]
    }

    pub fn total_rejected(&self) -> usize {
        self.rejections.iter().sum()
    }

    /// Non-zero rejection counts in declaration order.
    pub fn rejections(&self) -> impl Iterator<Item = (RejectReason, usize)> + '_ {
        RejectReason::ALL
            .iter()
            .map(|&reason| (reason, self.rejected(reason)))
            .filter(|&(_, count)| count > 0)
    }
}
