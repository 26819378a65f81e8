use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::civilization::diplomacy::{CityStatePersonality, CityStateType, DiplomacyManager, DiplomaticStatus};
use crate::civilization::notification::{Notification, NotificationAction, NotificationCategory};
use crate::civilization::player_type::PlayerType;
use crate::models::{City, MapUnit, SnapshotList};
use crate::trade::TradeRequest;

/// A civilization taking part in diplomacy: a major civ, a city-state or the barbarians.
///
/// Cloning gives a fully independent copy: diplomacy edges refer to the other civ by
/// name only, and the snapshot lists allocate fresh storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Civilization {
    pub civ_name: String,
    pub player_type: PlayerType,
    pub is_city_state: bool,
    #[serde(default)]
    pub city_state_type: Option<CityStateType>,
    #[serde(default)]
    pub city_state_personality: CityStatePersonality,
    #[serde(default)]
    pub is_barbarian: bool,

    pub gold: i32,

    #[serde(default)]
    pub units: SnapshotList<MapUnit>,
    #[serde(default)]
    pub cities: SnapshotList<City>,

    /// One edge per civ we have met, keyed by the other civ's name
    pub diplomacy: BTreeMap<String, DiplomacyManager>,

    /// For city-states, the major civ currently allied to us
    #[serde(default)]
    pub ally_civ: Option<String>,

    #[serde(default)]
    pub trade_requests: SnapshotList<TradeRequest>,

    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Civilization {
    pub fn new(civ_name: impl Into<String>, player_type: PlayerType) -> Self {
        Self {
            civ_name: civ_name.into(),
            player_type,
            is_city_state: false,
            city_state_type: None,
            city_state_personality: CityStatePersonality::Neutral,
            is_barbarian: false,
            gold: 0,
            units: SnapshotList::new(),
            cities: SnapshotList::new(),
            diplomacy: BTreeMap::new(),
            ally_civ: None,
            trade_requests: SnapshotList::new(),
            notifications: Vec::new(),
        }
    }

    /// City-states are always AI controlled
    pub fn new_city_state(
        civ_name: impl Into<String>,
        city_state_type: CityStateType,
        personality: CityStatePersonality,
    ) -> Self {
        Self {
            is_city_state: true,
            city_state_type: Some(city_state_type),
            city_state_personality: personality,
            ..Self::new(civ_name, PlayerType::AI)
        }
    }

    pub fn new_barbarians() -> Self {
        Self {
            is_barbarian: true,
            ..Self::new("Barbarians", PlayerType::AI)
        }
    }

    pub fn is_human(&self) -> bool {
        self.player_type == PlayerType::Human
    }

    pub fn is_major_civ(&self) -> bool {
        !self.is_barbarian && !self.is_city_state
    }

    /// Barbarians are never defeated; everyone else is once they own nothing at all.
    pub fn is_defeated(&self) -> bool {
        !self.is_barbarian && self.cities.is_empty() && self.units.is_empty()
    }

    pub fn knows(&self, other_civ_name: &str) -> bool {
        self.diplomacy.contains_key(other_civ_name)
    }

    pub fn get_diplomacy_manager(&self, other_civ_name: &str) -> Option<&DiplomacyManager> {
        self.diplomacy.get(other_civ_name)
    }

    pub fn get_diplomacy_manager_mut(&mut self, other_civ_name: &str) -> Option<&mut DiplomacyManager> {
        self.diplomacy.get_mut(other_civ_name)
    }

    pub fn is_at_war_with(&self, other_civ_name: &str) -> bool {
        self.diplomacy
            .get(other_civ_name)
            .is_some_and(|d| d.diplomatic_status == DiplomaticStatus::War)
    }

    /// Net gold per turn from every trade we are part of
    pub fn trade_gold_per_turn(&self) -> i32 {
        self.diplomacy.values().map(DiplomacyManager::gold_per_turn).sum()
    }

    /// AI players have nobody to read notifications, so they are dropped.
    pub fn add_notification(
        &mut self,
        text: impl Into<String>,
        category: NotificationCategory,
        action: Option<NotificationAction>,
        icons: &[&str],
    ) {
        if !self.is_human() {
            return;
        }
        let notification = Notification::new(text, icons, action, category);
        trace!(civ = %self.civ_name, text = notification.text(), "notification");
        self.notifications.push(notification);
    }

    pub fn add_units(&mut self, units: impl IntoIterator<Item = MapUnit>) {
        for unit in units {
            self.units.with_added(unit);
        }
    }

    pub fn add_city(&mut self, city: City) {
        self.cities.with_added(city);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    #[test]
    fn test_defeated_only_without_cities_and_units() {
        let mut civ = Civilization::new("Rome", PlayerType::AI);
        assert!(civ.is_defeated());
        civ.add_units([MapUnit::new(1, "Warrior", true, (0, 0) as Position)]);
        assert!(!civ.is_defeated());
        assert!(!Civilization::new_barbarians().is_defeated());
    }

    #[test]
    fn test_ai_notifications_are_suppressed() {
        let mut ai = Civilization::new("Rome", PlayerType::AI);
        let mut human = Civilization::new("Greece", PlayerType::Human);
        ai.add_notification("hello", NotificationCategory::General, None, &[]);
        human.add_notification("hello", NotificationCategory::General, None, &["Rome"]);
        assert!(ai.notifications.is_empty());
        assert_eq!(human.notifications.len(), 1);
        assert_eq!(human.notifications[0].icons(), &["Rome".to_string()]);
    }

    #[test]
    fn test_clone_does_not_share_edges() {
        let mut civ = Civilization::new("Rome", PlayerType::AI);
        civ.diplomacy.insert("Greece".into(), DiplomacyManager::new("Rome", "Greece"));
        let mut copy = civ.clone();
        copy.get_diplomacy_manager_mut("Greece").unwrap().diplomatic_status = DiplomaticStatus::War;
        assert!(!civ.is_at_war_with("Greece"));
        assert!(copy.is_at_war_with("Greece"));
    }
}
