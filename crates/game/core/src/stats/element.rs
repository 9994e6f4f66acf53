//! Elemental affinities and matchups.

use crate::config::DamageParams;

/// Element tag carried by every combatant.
///
/// Cycle: Fire → Earth → Wind → Water → Fire (each beats the next).
/// Light and Dark are each strong against the other. Neutral has no matchups.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

/// Result of comparing an attacking element against a defending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Matchup {
    Strong,
    Neutral,
    Weak,
}

impl Element {
    /// Element this one beats, if any.
    const fn beats(&self) -> Option<Element> {
        match self {
            Element::Fire => Some(Element::Earth),
            Element::Earth => Some(Element::Wind),
            Element::Wind => Some(Element::Water),
            Element::Water => Some(Element::Fire),
            Element::Light => Some(Element::Dark),
            Element::Dark => Some(Element::Light),
            Element::Neutral => None,
        }
    }

    /// Matchup of `self` attacking `defender`.
    pub fn matchup(&self, defender: Element) -> Matchup {
        if *self == defender {
            return Matchup::Neutral;
        }
        if self.beats() == Some(defender) {
            Matchup::Strong
        } else if defender.beats() == Some(*self) {
            Matchup::Weak
        } else {
            Matchup::Neutral
        }
    }

    /// Damage multiplier for `self` attacking `defender`.
    pub fn multiplier_against(&self, defender: Element, params: &DamageParams) -> f64 {
        match self.matchup(defender) {
            Matchup::Strong => params.strong_multiplier,
            Matchup::Weak => params.weak_multiplier,
            Matchup::Neutral => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn cycle_pairs() {
        use Element::*;
        assert_eq!(Fire.matchup(Earth), Matchup::Strong);
        assert_eq!(Earth.matchup(Wind), Matchup::Strong);
        assert_eq!(Wind.matchup(Water), Matchup::Strong);
        assert_eq!(Water.matchup(Fire), Matchup::Strong);

        assert_eq!(Earth.matchup(Fire), Matchup::Weak);
        assert_eq!(Fire.matchup(Water), Matchup::Weak);

        assert_eq!(Fire.matchup(Wind), Matchup::Neutral);
        assert_eq!(Water.matchup(Earth), Matchup::Neutral);
    }

    #[test]
    fn light_and_dark_are_mutually_strong() {
        assert_eq!(Element::Light.matchup(Element::Dark), Matchup::Strong);
        assert_eq!(Element::Dark.matchup(Element::Light), Matchup::Strong);
    }

    #[test]
    fn neutral_and_mirror_matchups() {
        for element in Element::iter() {
            assert_eq!(element.matchup(element), Matchup::Neutral);
            assert_eq!(Element::Neutral.matchup(element), Matchup::Neutral);
        }
    }

    #[test]
    fn multipliers_follow_params() {
        let params = DamageParams::default();
        assert_eq!(Element::Fire.multiplier_against(Element::Earth, &params), 1.5);
        assert_eq!(Element::Fire.multiplier_against(Element::Water, &params), 0.7);
        assert_eq!(Element::Fire.multiplier_against(Element::Wind, &params), 1.0);
    }
}
