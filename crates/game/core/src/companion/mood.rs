/// Companion mood. Ordered best to worst: `Happy > Normal > Sad > Tired ≈ Hungry`.
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
pub enum Mood {
    Happy,
    #[default]
    Normal,
    Sad,
    Tired,
    Hungry,
}

/// Stat and growth multipliers of a mood.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoodModifiers {
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub exp_gain: f64,
}

impl Mood {
    pub const fn modifiers(&self) -> MoodModifiers {
        match self {
            Self::Happy => MoodModifiers {
                attack: 1.2,
                defense: 1.1,
                speed: 1.1,
                exp_gain: 1.2,
            },
            Self::Normal => MoodModifiers {
                attack: 1.0,
                defense: 1.0,
                speed: 1.0,
                exp_gain: 1.0,
            },
            Self::Sad => MoodModifiers {
                attack: 0.85,
                defense: 0.9,
                speed: 0.9,
                exp_gain: 0.8,
            },
            Self::Tired => MoodModifiers {
                attack: 0.7,
                defense: 0.8,
                speed: 0.6,
                exp_gain: 0.7,
            },
            Self::Hungry => MoodModifiers {
                attack: 0.65,
                defense: 0.75,
                speed: 0.7,
                exp_gain: 0.6,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happier_moods_never_weaker() {
        let order = [Mood::Happy, Mood::Normal, Mood::Sad];
        for pair in order.windows(2) {
            let (better, worse) = (pair[0].modifiers(), pair[1].modifiers());
            assert!(better.attack > worse.attack);
            assert!(better.exp_gain > worse.exp_gain);
        }
        assert!(Mood::Sad.modifiers().attack > Mood::Tired.modifiers().attack);
    }
}
