//! Combatants: the actors of a single battle session.

use crate::ability::AbilityId;
use crate::ai::AiPattern;
use crate::companion::Mood;
use crate::reward::DropEntry;

use super::element::Element;
use super::kind::{StatKind, Stats};

/// Unique identifier of a combatant within one battle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// The player always uses id 0.
    pub const PLAYER: Self = Self(0);

    pub const fn is_player(&self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl core::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the battle a combatant fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Companion,
    Enemy,
}

impl Side {
    /// Player and companion fight together.
    pub const fn is_player_side(&self) -> bool {
        matches!(self, Self::Player | Self::Companion)
    }

    pub fn is_hostile_to(&self, other: Side) -> bool {
        self.is_player_side() != other.is_player_side()
    }
}

/// Monster power classification.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tier {
    #[default]
    Common,
    Elite,
    Boss,
    Legendary,
}

impl Tier {
    pub const fn hp_multiplier(&self) -> f64 {
        match self {
            Tier::Common => 1.0,
            Tier::Elite => 1.5,
            Tier::Boss => 3.0,
            Tier::Legendary => 5.0,
        }
    }

    /// Applied to attack and defense.
    pub const fn offense_multiplier(&self) -> f64 {
        match self {
            Tier::Common => 1.0,
            Tier::Elite => 1.2,
            Tier::Boss => 1.5,
            Tier::Legendary => 2.0,
        }
    }

    pub const fn exp_multiplier(&self) -> f64 {
        match self {
            Tier::Common => 1.0,
            Tier::Elite => 1.5,
            Tier::Boss => 3.0,
            Tier::Legendary => 5.0,
        }
    }

    pub const fn gold_multiplier(&self) -> f64 {
        match self {
            Tier::Common => 1.0,
            Tier::Elite => 1.5,
            Tier::Boss => 2.5,
            Tier::Legendary => 4.0,
        }
    }

    /// Chance that a defeated monster of this tier drops anything.
    pub const fn drop_chance(&self) -> f64 {
        match self {
            Tier::Common => 0.3,
            Tier::Elite => 0.5,
            Tier::Boss => 0.8,
            Tier::Legendary => 1.0,
        }
    }

    /// Bosses and legendaries get guaranteed drops and block escape.
    pub const fn is_boss_class(&self) -> bool {
        matches!(self, Tier::Boss | Tier::Legendary)
    }
}

/// External definition of a combatant, as loaded from a content table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tier: Tier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    pub base_stats: Stats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ai_pattern: Option<AiPattern>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// Consumable healing items carried into battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<DropEntry>,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

/// A participant in a battle session.
///
/// Built from a definition at session start and owned by the
/// [`BattleState`](crate::state::BattleState) until the session ends.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub level: u32,
    pub element: Element,
    pub stats: Stats,
    pub tier: Tier,
    pub ai_pattern: Option<AiPattern>,
    pub abilities: Vec<AbilityId>,
    pub items: u32,
    /// Set by the Defend action, cleared at the start of the actor's next turn.
    pub defending: bool,
    pub drops: Vec<DropEntry>,
    pub mood: Option<Mood>,
}

impl Combatant {
    /// Minimal constructor; fill the rest with the `with_*` builders.
    pub fn new(id: CombatantId, name: impl Into<String>, side: Side, stats: Stats) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            level: 1,
            element: Element::Neutral,
            stats,
            tier: Tier::Common,
            ai_pattern: None,
            abilities: Vec::new(),
            items: 0,
            defending: false,
            drops: Vec::new(),
            mood: None,
        }
    }

    /// Builds a combatant from a content definition.
    ///
    /// Enemies get tier scaling; everybody starts at full HP.
    pub fn from_definition(id: CombatantId, side: Side, def: &CombatantDefinition) -> Self {
        let mut stats = def.base_stats;
        if side == Side::Enemy {
            stats.scale(StatKind::MaxHp, def.tier.hp_multiplier());
            stats.scale(StatKind::Attack, def.tier.offense_multiplier());
            stats.scale(StatKind::Defense, def.tier.offense_multiplier());
        }
        stats.hp = stats.max_hp;

        Self {
            id,
            name: def.name.clone(),
            side,
            level: def.level.max(1),
            element: def.element,
            stats,
            tier: def.tier,
            ai_pattern: def.ai_pattern,
            abilities: def.abilities.clone(),
            items: def.items,
            defending: false,
            drops: def.drops.clone(),
            mood: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_ai(mut self, pattern: AiPattern) -> Self {
        self.ai_pattern = Some(pattern);
        self
    }

    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.abilities = abilities.into_iter().collect();
        self
    }

    pub fn with_items(mut self, items: u32) -> Self {
        self.items = items;
        self
    }

    pub fn with_drops(mut self, drops: impl IntoIterator<Item = DropEntry>) -> Self {
        self.drops = drops.into_iter().collect();
        self
    }

    /// Multiplies hp, attack and defense, e.g. for difficulty pre-scaling.
    pub fn prescale(&mut self, multiplier: f64) {
        self.stats.scale(StatKind::MaxHp, multiplier);
        self.stats.scale(StatKind::Attack, multiplier);
        self.stats.scale(StatKind::Defense, multiplier);
        self.stats.hp = self.stats.max_hp;
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        self.stats.hp_ratio()
    }

    /// True at or below half HP (`hp * 2 <= max_hp`).
    pub fn is_below_half(&self) -> bool {
        self.stats.hp.saturating_mul(2) <= self.stats.max_hp
    }

    /// Subtracts damage, floored at 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.stats.hp;
        self.stats.hp = crate::combat::apply_damage(before, amount);
        before - self.stats.hp
    }

    /// Restores HP up to max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.stats.hp;
        self.stats.hp = before.saturating_add(amount).min(self.stats.max_hp);
        self.stats.hp - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin_def(tier: Tier) -> CombatantDefinition {
        CombatantDefinition {
            id: "goblin".into(),
            name: "Goblin".into(),
            level: 3,
            tier,
            element: Element::Earth,
            base_stats: Stats {
                hp: 1,
                max_hp: 40,
                attack: 10,
                defense: 10,
                ..Stats::default()
            },
            ai_pattern: Some(AiPattern::Aggressive),
            abilities: Vec::new(),
            items: 0,
            drops: Vec::new(),
        }
    }

    #[test]
    fn enemies_are_tier_scaled_and_full_hp() {
        let elite = Combatant::from_definition(CombatantId(1), Side::Enemy, &goblin_def(Tier::Elite));
        assert_eq!(elite.stats.max_hp, 60);
        assert_eq!(elite.stats.hp, 60);
        assert_eq!(elite.stats.attack, 12);
        assert_eq!(elite.stats.defense, 12);
    }

    #[test]
    fn allies_ignore_tier_scaling() {
        let ally = Combatant::from_definition(CombatantId(2), Side::Companion, &goblin_def(Tier::Boss));
        assert_eq!(ally.stats.max_hp, 40);
        assert_eq!(ally.stats.hp, 40);
    }

    #[test]
    fn damage_and_heal_saturate() {
        let mut c = Combatant::new(CombatantId(1), "dummy", Side::Enemy, Stats::default());
        assert_eq!(c.take_damage(30), 30);
        assert_eq!(c.heal(100), 30);
        assert_eq!(c.take_damage(500), 100);
        assert!(!c.is_alive());
        assert_eq!(c.heal(10), 0);
    }

    #[test]
    fn below_half_guard() {
        let mut c = Combatant::new(CombatantId(1), "dummy", Side::Enemy, Stats::default());
        c.stats.hp = 51;
        assert!(!c.is_below_half());
        c.stats.hp = 50;
        assert!(c.is_below_half());
    }

    #[test]
    fn sides() {
        assert!(Side::Player.is_hostile_to(Side::Enemy));
        assert!(!Side::Player.is_hostile_to(Side::Companion));
        assert!(Side::Enemy.is_hostile_to(Side::Companion));
    }
}
