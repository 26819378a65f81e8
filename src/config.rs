use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DiplomacyError, Result};

/// Tunable numbers of the diplomacy rules, the equivalent of a ruleset's mod constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModConstants {
    /// Turns during which neither side will accept peace or trades after a declaration of war
    pub minimum_war_duration: i32,
    pub declaration_of_friendship_duration: i32,
    pub denunciation_duration: i32,
    /// Length of a promise (or refusal) not to settle near another civ
    pub settle_promise_duration: i32,
    /// Influence a city-state drifts towards when nothing else happens
    pub city_state_resting_point: f32,
    pub militaristic_unit_interval_friend: i32,
    pub militaristic_unit_interval_ally: i32,
    /// Gold a city-state hands to a major civ on first contact (doubled for the first one)
    pub city_state_meeting_gift: i32,
}

impl Default for ModConstants {
    fn default() -> Self {
        Self {
            minimum_war_duration: 10,
            declaration_of_friendship_duration: 30,
            denunciation_duration: 30,
            settle_promise_duration: 100,
            city_state_resting_point: 0.0,
            militaristic_unit_interval_friend: 20,
            militaristic_unit_interval_ally: 17,
            city_state_meeting_gift: 15,
        }
    }
}

/// Game speed dependent durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speed {
    pub deal_duration: i32,
    pub peace_deal_duration: i32,
}

impl Default for Speed {
    fn default() -> Self {
        Self {
            deal_duration: 30,
            peace_deal_duration: 10,
        }
    }
}

/// Everything a game needs besides its civilizations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub constants: ModConstants,
    pub speed: Speed,
    /// Seed for the few random choices the rules make (gift unit timing)
    pub seed: u64,
}

impl GameConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading game config");
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Durations become flag countdowns and trade lengths, which must be at least one turn
    pub fn validate(&self) -> Result<()> {
        let constants = &self.constants;
        let durations = [
            ("minimum_war_duration", constants.minimum_war_duration),
            ("declaration_of_friendship_duration", constants.declaration_of_friendship_duration),
            ("denunciation_duration", constants.denunciation_duration),
            ("settle_promise_duration", constants.settle_promise_duration),
            ("militaristic_unit_interval_friend", constants.militaristic_unit_interval_friend),
            ("militaristic_unit_interval_ally", constants.militaristic_unit_interval_ally),
            ("deal_duration", self.speed.deal_duration),
            ("peace_deal_duration", self.speed.peace_deal_duration),
        ];
        if let Some((name, turns)) = durations.into_iter().find(|(_, turns)| *turns <= 0) {
            return Err(DiplomacyError::InvalidConfig(format!(
                "{name} must be a positive number of turns, got {turns}"
            )));
        }
        if constants.city_state_meeting_gift < 0 {
            return Err(DiplomacyError::InvalidConfig(format!(
                "city_state_meeting_gift cannot be negative, got {}",
                constants.city_state_meeting_gift
            )));
        }
        Ok(())
    }
}
