//! Companion assist turns.

use crate::ai::{TargetPriority, select_target};
use crate::engine::{ActionReport, BattleEngine, Command, ExecuteError};
use crate::state::LogKind;
use crate::stats::CombatantId;

/// One enemy as shown after a companion turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySnapshot {
    pub id: CombatantId,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
}

/// Presentation cue derived from a log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationCue {
    pub kind: LogKind,
    pub actor: CombatantId,
    pub target: Option<CombatantId>,
    pub amount: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionTurnResult {
    pub companion_hp: u32,
    pub enemies: Vec<EnemySnapshot>,
    pub animations: Vec<AnimationCue>,
    pub report: ActionReport,
}

/// Plays the prepared turn of a companion.
///
/// With the configured chance (30% by default) a ready manual ability is
/// used; otherwise the companion attacks the lowest-HP enemy. Everything goes
/// through the same engine primitives as any other actor, so mood-adjusted
/// stats apply both ways.
pub fn process_companion_turn(
    engine: &mut BattleEngine<'_>,
    companion: CombatantId,
) -> Result<CompanionTurnResult, ExecuteError> {
    let command = choose_command(engine, companion);
    let report = engine.execute(companion, command)?;

    let state = engine.state();
    let companion_hp = state.combatant(companion).map_or(0, |c| c.stats.hp);
    let enemies = state
        .enemies()
        .map(|e| EnemySnapshot {
            id: e.id,
            name: e.name.clone(),
            hp: e.stats.hp,
            max_hp: e.stats.max_hp,
        })
        .collect();
    let animations = report
        .entries
        .iter()
        .filter(|e| {
            !matches!(
                e.kind,
                LogKind::RoundStart | LogKind::BattleStart | LogKind::StatusExpired
            )
        })
        .map(|e| AnimationCue {
            kind: e.kind,
            actor: e.actor,
            target: e.target,
            amount: e.amount,
        })
        .collect();

    Ok(CompanionTurnResult {
        companion_hp,
        enemies,
        animations,
        report,
    })
}

fn choose_command(engine: &mut BattleEngine<'_>, companion: CombatantId) -> Command {
    let context = engine.battle_context(companion);
    let skill_chance = engine.config().limits.companion_skill_chance;
    let target = select_target(TargetPriority::LowestHp, &context.opponents, engine.rng());

    let Some(target) = target else {
        return Command::Defend;
    };
    if let Some(ability) = context.ready_skills.first() {
        if engine.rng().chance(skill_chance) {
            return Command::Skill {
                ability: ability.clone(),
                target: Some(target),
            };
        }
    }
    Command::Attack { target }
}
