//! Combat stats and the closed set of modifiable stat kinds.
//!
//! Status effects and boss phases never index stats by name: they carry a
//! [`StatKind`] and go through [`Stats::get`] / [`Stats::set`], so every
//! lookup is an exhaustive match.

/// Absorbs float noise such as `20.0 * 0.6 = 11.999...` before flooring.
const INTEGRAL_EPSILON: f64 = 1e-9;

/// Stats that buffs, debuffs and phase multipliers can target.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum StatKind {
    MaxHp,
    Attack,
    Defense,
    Speed,
    CritRate,
    CritDamage,
    Dodge,
    Accuracy,
}

impl StatKind {
    /// True for stats stored as whole numbers.
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::MaxHp | Self::Attack | Self::Defense | Self::Speed
        )
    }
}

/// Per-combatant numeric stats.
///
/// Integral stats are whole numbers; rates are fractions (`0.1` = 10%).
/// `crit_damage` is the multiplier applied on a critical hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub dodge: f64,
    pub accuracy: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hp: 100,
            max_hp: 100,
            attack: 10,
            defense: 5,
            speed: 10,
            crit_rate: 0.0,
            crit_damage: 1.5,
            dodge: 0.0,
            accuracy: 0.0,
        }
    }
}

impl Stats {
    /// Typed read of a modifiable stat.
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::MaxHp => f64::from(self.max_hp),
            StatKind::Attack => f64::from(self.attack),
            StatKind::Defense => f64::from(self.defense),
            StatKind::Speed => f64::from(self.speed),
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
            StatKind::Dodge => self.dodge,
            StatKind::Accuracy => self.accuracy,
        }
    }

    /// Typed write of a modifiable stat.
    ///
    /// Integral stats are floored and saturate at zero. Lowering `max_hp`
    /// also caps current `hp`.
    pub fn set(&mut self, kind: StatKind, value: f64) {
        let whole = (value.max(0.0) + INTEGRAL_EPSILON)
            .floor()
            .min(f64::from(u32::MAX)) as u32;
        match kind {
            StatKind::MaxHp => {
                self.max_hp = whole.max(1);
                self.hp = self.hp.min(self.max_hp);
            }
            StatKind::Attack => self.attack = whole,
            StatKind::Defense => self.defense = whole,
            StatKind::Speed => self.speed = whole,
            StatKind::CritRate => self.crit_rate = value,
            StatKind::CritDamage => self.crit_damage = value,
            StatKind::Dodge => self.dodge = value,
            StatKind::Accuracy => self.accuracy = value,
        }
    }

    /// Multiplies a stat in place.
    pub fn scale(&mut self, kind: StatKind, multiplier: f64) {
        let value = self.get(kind) * multiplier;
        self.set(kind, value);
    }

    /// Current HP as a fraction of max HP.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn get_set_round_trip_every_kind() {
        let mut stats = Stats::default();
        for kind in StatKind::iter() {
            let before = stats.get(kind);
            stats.set(kind, before * 2.0);
            assert_eq!(stats.get(kind), before * 2.0, "{kind}");
        }
    }

    #[test]
    fn integral_stats_floor_and_saturate() {
        let mut stats = Stats::default();
        stats.set(StatKind::Attack, 12.9);
        assert_eq!(stats.attack, 12);
        stats.set(StatKind::Defense, -4.0);
        assert_eq!(stats.defense, 0);
    }

    #[test]
    fn lowering_max_hp_caps_hp() {
        let mut stats = Stats::default();
        stats.set(StatKind::MaxHp, 40.0);
        assert_eq!(stats.max_hp, 40);
        assert_eq!(stats.hp, 40);
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!("crit_rate".parse::<StatKind>(), Ok(StatKind::CritRate));
        assert_eq!(StatKind::MaxHp.to_string(), "max_hp");
    }
}
