//! End-of-session battle report.

use battle_core::{
    BattleSummary, CompanionProfile, CompanionReward, Difficulty, LogEntry, Outcome, RewardBundle,
};
use serde::Serialize;

/// Everything a finished session produced. Serializes to JSON for tooling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleReport {
    pub session: u64,
    pub outcome: Outcome,
    pub difficulty: Difficulty,
    pub summary: BattleSummary,
    pub rewards: RewardBundle,
    pub companion: Option<CompanionReport>,
    pub log: Vec<LogEntry>,
}

/// Companion growth after the battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanionReport {
    pub reward: CompanionReward,
    pub levels_gained: u32,
    /// The profile with the reward already applied.
    pub profile: CompanionProfile,
}

impl BattleReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
