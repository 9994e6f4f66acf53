//! Weighted action selection.

use crate::ability::AbilityId;
use crate::env::RandomSource;
use crate::stats::{Combatant, CombatantId};

use super::boss::BossPhase;
use super::pattern::{AiPattern, PatternWeights, TargetPriority};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionKind {
    Attack,
    Skill(AbilityId),
    Defend,
    Item,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub kind: DecisionKind,
    /// `None` for self-targeted actions or when no opponent is alive.
    pub target: Option<CombatantId>,
}

/// A living opponent as seen by the deciding combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetInfo {
    pub id: CombatantId,
    pub hp: u32,
    /// Effective attack, used by [`TargetPriority::HighestDamage`].
    pub attack: u32,
}

/// What the decider may look at besides itself.
#[derive(Clone, Debug, Default)]
pub struct BattleContext {
    pub opponents: Vec<TargetInfo>,
    /// Manual abilities off cooldown.
    pub ready_skills: Vec<AbilityId>,
    /// Set for bosses; overrides the pattern's weight table.
    pub boss_phase: Option<&'static BossPhase>,
}

/// Picks an action for `actor`.
///
/// Consumes one roll for the action kind, one for the skill pick when more
/// than one skill is ready, and one for a random target when there is more
/// than one opponent.
pub fn decide_action(
    pattern: AiPattern,
    actor: &Combatant,
    ctx: &BattleContext,
    rng: &mut dyn RandomSource,
) -> Decision {
    let weights = ctx
        .boss_phase
        .map_or_else(|| pattern.weights(), |phase| phase.weights);

    let drawn = draw_kind(&weights, rng);
    let kind = match drawn {
        Drawn::Skill if actor.hp_ratio() < weights.skill_usage_threshold => DecisionKind::Attack,
        Drawn::Skill if ctx.ready_skills.is_empty() => DecisionKind::Attack,
        Drawn::Skill => {
            let pick = rng.index(ctx.ready_skills.len());
            DecisionKind::Skill(ctx.ready_skills[pick].clone())
        }
        Drawn::Item if actor.items == 0 => DecisionKind::Attack,
        Drawn::Item => DecisionKind::Item,
        Drawn::Defend => DecisionKind::Defend,
        Drawn::Attack => DecisionKind::Attack,
    };

    let target = match kind {
        DecisionKind::Attack | DecisionKind::Skill(_) => {
            select_target(weights.target_priority, &ctx.opponents, rng)
        }
        DecisionKind::Defend | DecisionKind::Item => None,
    };

    tracing::debug!(
        actor = %actor.id,
        pattern = %pattern,
        drawn = ?drawn,
        decision = ?kind,
        target = ?target,
        "ai decision"
    );

    Decision { kind, target }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drawn {
    Attack,
    Skill,
    Defend,
    Item,
}

fn draw_kind(weights: &PatternWeights, rng: &mut dyn RandomSource) -> Drawn {
    let total = weights.total();
    if total == 0 {
        return Drawn::Attack;
    }
    let roll = (rng.next_f64() * f64::from(total)) as u32;

    let mut upper = weights.attack;
    if roll < upper {
        return Drawn::Attack;
    }
    upper += weights.skill;
    if roll < upper {
        return Drawn::Skill;
    }
    upper += weights.defend;
    if roll < upper {
        return Drawn::Defend;
    }
    Drawn::Item
}

/// Chooses a target among living opponents.
pub fn select_target(
    priority: TargetPriority,
    opponents: &[TargetInfo],
    rng: &mut dyn RandomSource,
) -> Option<CombatantId> {
    match priority {
        TargetPriority::LowestHp => opponents.iter().min_by_key(|t| (t.hp, t.id)).map(|t| t.id),
        TargetPriority::HighestDamage => opponents
            .iter()
            .max_by_key(|t| (t.attack, core::cmp::Reverse(t.id)))
            .map(|t| t.id),
        TargetPriority::Random => {
            if opponents.is_empty() {
                None
            } else {
                Some(opponents[rng.index(opponents.len())].id)
            }
        }
    }
}
