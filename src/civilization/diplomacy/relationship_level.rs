use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the level of relationship between civilizations.
///
/// Ordered from worst to best, so levels compare with the standard operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RelationshipLevel {
    Unforgivable,
    Enemy,
    Competitor,
    Neutral,
    Favorable,
    Friend,
    Ally,
}

impl RelationshipLevel {
    /// Level of a city-state towards a major civ, from its influence.
    ///
    /// War forces at least Enemy but never lifts Unforgivable.
    pub fn from_influence(influence: f32, at_war: bool) -> Self {
        match influence {
            i if i <= -60.0 => Self::Unforgivable,
            i if i <= -30.0 => Self::Enemy,
            _ if at_war => Self::Enemy,
            i if i >= 60.0 => Self::Ally,
            i if i >= 30.0 => Self::Friend,
            _ => Self::Neutral,
        }
    }

    /// Level of an AI major civ towards another civ, from the sum of its modifiers
    pub fn from_opinion(opinion: f32, at_war: bool) -> Self {
        match opinion {
            o if o <= -80.0 => Self::Unforgivable,
            o if o <= -40.0 => Self::Enemy,
            _ if at_war => Self::Enemy,
            o if o <= -15.0 => Self::Competitor,
            o if o >= 80.0 => Self::Ally,
            o if o >= 40.0 => Self::Friend,
            o if o >= 15.0 => Self::Favorable,
            _ => Self::Neutral,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Unforgivable => "Unforgivable",
            Self::Enemy => "Enemy",
            Self::Competitor => "Competitor",
            Self::Neutral => "Neutral",
            Self::Favorable => "Favorable",
            Self::Friend => "Friend",
            Self::Ally => "Ally",
        }
    }
}

impl fmt::Display for RelationshipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
