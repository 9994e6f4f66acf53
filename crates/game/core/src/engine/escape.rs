//! Escape attempts.

use crate::config::EscapeParams;
use crate::state::{LogEntry, LogKind, Outcome};
use crate::stats::CombatantId;

use super::BattleEngine;

/// Escape bookkeeping for one battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapeTracker {
    pub attempts: u32,
    /// Rounds until the next attempt is allowed.
    pub cooldown: u32,
}

impl EscapeTracker {
    /// Called once per completed round.
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum DeclineReason {
    ExhaustedAttempts,
    Cooldown { rounds: u32 },
    /// A boss-class enemy is still standing.
    Inescapable,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EscapeOutcome {
    Escaped { chance: f64 },
    Failed { chance: f64 },
    /// Refused before rolling; no attempt is spent.
    Declined(DeclineReason),
}

/// Escape probability.
///
/// ```text
/// chance = clamp(base + (speed - mean enemy speed) × speed_factor
///                     - (max enemy level - level) × level_factor, min, max)
/// ```
pub fn escape_chance(
    player_speed: u32,
    player_level: u32,
    enemies: &[(u32, u32)],
    params: &EscapeParams,
) -> f64 {
    if enemies.is_empty() {
        return params.max_chance;
    }
    let mean_speed =
        enemies.iter().map(|(speed, _)| f64::from(*speed)).sum::<f64>() / enemies.len() as f64;
    let max_level = enemies.iter().map(|(_, level)| *level).max().unwrap_or(0);

    let speed_term = (f64::from(player_speed) - mean_speed) * params.speed_factor;
    let level_term = (f64::from(max_level) - f64::from(player_level)) * params.level_factor;
    (params.base + speed_term - level_term).clamp(params.min_chance, params.max_chance)
}

impl BattleEngine<'_> {
    pub(super) fn attempt_escape(&mut self, actor: CombatantId) -> EscapeOutcome {
        let config = self.config;
        let params = &config.escape;
        let round = self.state.round;

        let decline = if self.state.living_enemies().any(|e| e.tier.is_boss_class()) {
            Some(DeclineReason::Inescapable)
        } else if self.state.escape.attempts >= params.max_attempts {
            Some(DeclineReason::ExhaustedAttempts)
        } else if self.state.escape.cooldown > 0 {
            Some(DeclineReason::Cooldown {
                rounds: self.state.escape.cooldown,
            })
        } else {
            None
        };
        if let Some(reason) = decline {
            self.state.log.push(
                LogEntry::new(round, actor, LogKind::EscapeDeclined).with_note(reason.to_string()),
            );
            return EscapeOutcome::Declined(reason);
        }

        let (speed, level) = (
            self.state.effective_speed(actor),
            self.state.combatant(actor).map_or(1, |c| c.level),
        );
        let enemies: Vec<(u32, u32)> = self
            .state
            .living_enemies()
            .map(|e| (self.state.effective_speed(e.id), e.level))
            .collect();
        let chance = escape_chance(speed, level, &enemies, params);

        self.state.escape.attempts += 1;
        self.state.escape.cooldown = params.cooldown_rounds;

        if self.rng.chance(chance) {
            self.state
                .log
                .push(LogEntry::new(round, actor, LogKind::Escaped));
            self.finish(Outcome::Escaped);
            EscapeOutcome::Escaped { chance }
        } else {
            self.state
                .log
                .push(LogEntry::new(round, actor, LogKind::EscapeFailed));
            EscapeOutcome::Failed { chance }
        }
    }
}
