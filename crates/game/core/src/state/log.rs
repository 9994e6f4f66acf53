//! Ordered, structured combat log.
//!
//! The log is the game-facing record of a battle: every action, hit, status
//! change and refusal lands here in order. Renderers and replays read it;
//! nothing in the engine reads it back.

use crate::ability::AbilityId;
use crate::stats::CombatantId;
use crate::status::StatusKind;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum LogKind {
    BattleStart,
    RoundStart,
    Hit,
    Critical,
    Dodge,
    Ability,
    /// A manual ability chosen as an action did not fire.
    AbilityFailed,
    Heal,
    DamageOverTime,
    StatusApplied,
    StatusRejected,
    StatusExpired,
    /// Turn lost to freeze or stun.
    Incapacitated,
    Defend,
    Item,
    EscapeFailed,
    EscapeDeclined,
    Escaped,
    PhaseChange,
    InvalidAction,
    Defeated,
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub round: u32,
    pub actor: CombatantId,
    pub target: Option<CombatantId>,
    pub kind: LogKind,
    pub amount: Option<u32>,
    pub ability: Option<AbilityId>,
    pub status: Option<StatusKind>,
    /// Free-form detail, e.g. why an action was refused.
    pub note: Option<String>,
}

impl LogEntry {
    pub fn new(round: u32, actor: CombatantId, kind: LogKind) -> Self {
        Self {
            round,
            actor,
            target: None,
            kind,
            amount: None,
            ability: None,
            status: None,
            note: None,
        }
    }

    pub fn with_target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_ability(mut self, ability: &AbilityId) -> Self {
        self.ability = Some(ability.clone());
        self
    }

    pub fn with_status(mut self, status: StatusKind) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended at or after `start`.
    pub fn since(&self, start: usize) -> &[LogEntry] {
        self.entries.get(start..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_returns_the_tail() {
        let mut log = CombatLog::new();
        log.push(LogEntry::new(1, CombatantId(0), LogKind::RoundStart));
        log.push(LogEntry::new(1, CombatantId(0), LogKind::Hit).with_amount(12));
        log.push(LogEntry::new(1, CombatantId(1), LogKind::Dodge));

        let tail = log.since(1);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].amount, Some(12));
        assert!(log.since(10).is_empty());
        assert_eq!(log.count(LogKind::Dodge), 1);
    }
}
