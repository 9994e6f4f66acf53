use std::collections::VecDeque;

use crate::stats::CombatantId;

/// Round-robin scheduling state.
///
/// The queue holds the remaining actors of the current round, fastest first.
/// `current` is set by `prepare_next_turn` and cleared by `execute`.
/// `round_closed` is set once end-of-round ticks have run for the current
/// round, so they never run twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub queue: VecDeque<CombatantId>,
    pub current: Option<CombatantId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub round_closed: bool,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }
}
