use tracing::{debug, info};

use crate::civilization::diplomacy::{CityStateType, DiplomacyFlags, DiplomaticModifiers, RelationshipLevel};
use crate::civilization::notification::{NotificationAction, NotificationCategory};
use crate::constants::Constants;
use crate::game_info::GameInfo;

/// Rules that only apply to city-states: influence, alliances and gifted units.
pub struct CityStateFunctions;

impl CityStateFunctions {
    /// Sets the influence of `city_state_name` towards `major_civ_name` and recomputes its ally.
    ///
    /// # Panics
    /// When `city_state_name` is not a city-state.
    pub fn set_influence(game: &mut GameInfo, city_state_name: &str, major_civ_name: &str, amount: f32) {
        assert!(
            game.get_civilization(city_state_name).is_city_state,
            "Only city-states have influence, {city_state_name} is a major civ"
        );
        game.get_diplomacy_manager_mut(city_state_name, major_civ_name).influence = amount;
        Self::update_ally_civ_for_city_state(game, city_state_name);
    }

    pub fn add_influence(game: &mut GameInfo, city_state_name: &str, major_civ_name: &str, amount: f32) {
        let current = game.get_diplomacy_manager(city_state_name, major_civ_name).get_influence();
        Self::set_influence(game, city_state_name, major_civ_name, current + amount);
    }

    /// City-states whose current ally is `major_civ_name`
    pub fn get_allied_city_states(game: &GameInfo, major_civ_name: &str) -> Vec<String> {
        game.civilizations
            .iter()
            .filter(|c| c.is_city_state && !c.is_defeated() && c.ally_civ.as_deref() == Some(major_civ_name))
            .map(|c| c.civ_name.clone())
            .collect()
    }

    /// The living major civ with the most influence (at least the ally threshold) becomes our
    /// ally. Ties go to the civ first in name order.
    pub fn update_ally_civ_for_city_state(game: &mut GameInfo, city_state_name: &str) {
        let city_state = game.get_civilization(city_state_name);
        if !city_state.is_city_state {
            return;
        }

        let mut new_ally: Option<(&str, f32)> = None;
        for (other_name, diplomacy_manager) in &city_state.diplomacy {
            if !game.is_alive(other_name) || !game.get_civilization(other_name).is_major_civ() {
                continue;
            }
            let influence = diplomacy_manager.get_influence();
            if influence < Constants::ALLY_INFLUENCE {
                continue;
            }
            if new_ally.map_or(true, |(_, best)| influence > best) {
                new_ally = Some((other_name.as_str(), influence));
            }
        }
        let new_ally_name = new_ally.map(|(name, _)| name.to_string());
        let old_ally_name = city_state.ally_civ.clone();
        if old_ally_name == new_ally_name {
            return;
        }

        info!(civ = city_state_name, old_ally = ?old_ally_name, new_ally = ?new_ally_name, "city-state ally changed");
        game.get_civilization_mut(city_state_name).ally_civ = new_ally_name.clone();

        if let Some(new_ally_name) = &new_ally_name {
            let new_ally = game.get_civilization_mut(new_ally_name);
            new_ally.add_notification(
                format!("We have allied with [{city_state_name}]."),
                NotificationCategory::Diplomacy,
                Some(NotificationAction::DiplomacyAction {
                    other_civ: city_state_name.to_string(),
                }),
                &[city_state_name],
            );
            game.services_mut().update_civ_resources(new_ally_name);
        }

        if let Some(old_ally_name) = &old_ally_name {
            if game.is_alive(old_ally_name) {
                let old_ally = game.get_civilization_mut(old_ally_name);
                old_ally.add_notification(
                    format!("We have lost alliance with [{city_state_name}]."),
                    NotificationCategory::Diplomacy,
                    Some(NotificationAction::DiplomacyAction {
                        other_civ: city_state_name.to_string(),
                    }),
                    &[city_state_name],
                );
                game.services_mut().update_civ_resources(old_ally_name);

                if let Some(new_ally_name) = &new_ally_name {
                    if game.knows(old_ally_name, new_ally_name) {
                        game.get_diplomacy_manager_mut(old_ally_name, new_ally_name)
                            .add_modifier(DiplomaticModifiers::StoleOurAlly, -10.0);
                    }
                }
            }
        }
    }

    /// Interval between gifted units for a major civ at `level` with a militaristic city-state,
    /// `None` when no units are due at that level
    pub fn military_unit_interval(game: &GameInfo, city_state_name: &str, level: RelationshipLevel) -> Option<i32> {
        if game.get_civilization(city_state_name).city_state_type != Some(CityStateType::Militaristic) {
            return None;
        }
        let constants = &game.config.constants;
        match level {
            RelationshipLevel::Ally => Some(constants.militaristic_unit_interval_ally),
            RelationshipLevel::Friend => Some(constants.militaristic_unit_interval_friend),
            _ => None,
        }
    }

    /// Arms, keeps or removes the major civ's `ProvideMilitaryUnit` countdown according to how
    /// the city-state currently sees it
    pub fn update_military_unit_gift_flag(game: &mut GameInfo, major_civ_name: &str, city_state_name: &str) {
        let level = game
            .get_diplomacy_manager(city_state_name, major_civ_name)
            .relationship_level(game);
        let Some(interval) = Self::military_unit_interval(game, city_state_name, level) else {
            game.get_diplomacy_manager_mut(major_civ_name, city_state_name)
                .remove_flag(DiplomacyFlags::ProvideMilitaryUnit);
            return;
        };

        let current = game
            .get_diplomacy_manager(major_civ_name, city_state_name)
            .get_flag(DiplomacyFlags::ProvideMilitaryUnit);
        if current.map_or(true, |turns| turns > interval) {
            let variance = game.random_variance();
            game.get_diplomacy_manager_mut(major_civ_name, city_state_name)
                .set_flag(DiplomacyFlags::ProvideMilitaryUnit, (interval + variance).max(1));
        }
    }

    /// Hands a military unit of the services' choosing to `receiving_civ_name`. Quietly does nothing
    /// when no unit can be provided.
    pub fn give_military_unit_to_patron(game: &mut GameInfo, city_state_name: &str, receiving_civ_name: &str) {
        let unit = {
            let city_state = game.get_civilization(city_state_name);
            let receiving_civ = game.get_civilization(receiving_civ_name);
            game.services().giftable_military_unit(city_state, receiving_civ)
        };
        let Some(unit) = unit else {
            debug!(civ = city_state_name, other_civ = receiving_civ_name, "no unit available to gift");
            return;
        };

        info!(civ = city_state_name, other_civ = receiving_civ_name, unit = %unit.name, "city-state gifted a unit");
        let location = unit.position;
        let unit_name = unit.name.clone();
        let receiving_civ = game.get_civilization_mut(receiving_civ_name);
        receiving_civ.add_units([unit]);
        receiving_civ.add_notification(
            format!("[{city_state_name}] gave us a [{unit_name}] as gift!"),
            NotificationCategory::Units,
            Some(NotificationAction::LocationAction { location }),
            &[city_state_name, unit_name.as_str()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::civilization::diplomacy::{CityStatePersonality, DiplomacyFunctions};
    use crate::civilization::{Civilization, PlayerType};
    use crate::config::GameConfig;
    use crate::headless::HeadlessServices;
    use crate::models::City;

    fn game() -> GameInfo {
        let mut game = GameInfo::new(GameConfig::default(), Box::new(HeadlessServices::new()));
        for name in ["Rome", "Greece"] {
            let mut civ = Civilization::new(name, PlayerType::AI);
            civ.add_city(City::new(name, (0, 0)));
            game.add_civilization(civ);
        }
        let mut sparta = Civilization::new_city_state("Sparta", CityStateType::Militaristic, CityStatePersonality::Neutral);
        sparta.add_city(City::new("Sparta", (5, 5)));
        game.add_civilization(sparta);
        DiplomacyFunctions::make_civilizations_meet(&mut game, "Rome", "Greece", false);
        DiplomacyFunctions::make_civilizations_meet(&mut game, "Sparta", "Rome", false);
        DiplomacyFunctions::make_civilizations_meet(&mut game, "Sparta", "Greece", false);
        game
    }

    #[test]
    fn test_highest_influence_wins_and_ties_go_by_name() {
        let mut game = game();
        CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 70.0);
        CityStateFunctions::set_influence(&mut game, "Sparta", "Greece", 70.0);
        assert_eq!(game.get_civilization("Sparta").ally_civ.as_deref(), Some("Greece"));

        CityStateFunctions::add_influence(&mut game, "Sparta", "Rome", 5.0);
        assert_eq!(game.get_civilization("Sparta").ally_civ.as_deref(), Some("Rome"));
        assert_eq!(
            game.get_diplomacy_manager("Greece", "Rome").get_modifier(DiplomaticModifiers::StoleOurAlly),
            -10.0
        );
        assert_eq!(CityStateFunctions::get_allied_city_states(&game, "Rome"), vec!["Sparta".to_string()]);
    }

    #[test]
    fn test_unit_interval_by_level() {
        let game = game();
        assert_eq!(CityStateFunctions::military_unit_interval(&game, "Sparta", RelationshipLevel::Ally), Some(17));
        assert_eq!(CityStateFunctions::military_unit_interval(&game, "Sparta", RelationshipLevel::Friend), Some(20));
        assert_eq!(CityStateFunctions::military_unit_interval(&game, "Sparta", RelationshipLevel::Neutral), None);
    }

    #[test]
    #[should_panic(expected = "Only city-states have influence")]
    fn test_influence_is_for_city_states_only() {
        let mut game = game();
        CityStateFunctions::set_influence(&mut game, "Rome", "Greece", 10.0);
    }
}
