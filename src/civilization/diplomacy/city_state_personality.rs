use serde::{Deserialize, Serialize};

/// Represents the personality type of a city-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CityStatePersonality {
    Friendly,
    #[default]
    Neutral,
    /// Loses influence towards major civs faster
    Hostile,
    Irrational,
}

/// What a city-state is about. Militaristic ones hand out units to their friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityStateType {
    Cultured,
    Maritime,
    Mercantile,
    Militaristic,
    Religious,
}
