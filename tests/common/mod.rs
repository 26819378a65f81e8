#![allow(dead_code)]

use unciv_diplomacy::civilization::diplomacy::{CityStatePersonality, CityStateType, DiplomacyFunctions};
use unciv_diplomacy::civilization::{Civilization, PlayerType};
use unciv_diplomacy::config::GameConfig;
use unciv_diplomacy::headless::HeadlessServices;
use unciv_diplomacy::models::City;
use unciv_diplomacy::GameInfo;

pub fn game_with(services: HeadlessServices) -> GameInfo {
    GameInfo::new(GameConfig::default(), Box::new(services))
}

/// A major civ with one city, so it counts as alive
pub fn add_major(game: &mut GameInfo, name: &str, player_type: PlayerType) {
    let mut civ = Civilization::new(name, player_type);
    let x = game.civilizations.len() as i32 * 10;
    civ.add_city(City::new(format!("{name} capital"), (x + 4, 4)));
    game.add_civilization(civ);
}

pub fn add_city_state(game: &mut GameInfo, name: &str, city_state_type: CityStateType) {
    let mut civ = Civilization::new_city_state(name, city_state_type, CityStatePersonality::Neutral);
    let x = game.civilizations.len() as i32 * 10;
    civ.add_city(City::new(name, (x + 4, 4)));
    game.add_civilization(civ);
}

pub fn meet(game: &mut GameInfo, civ: &str, other: &str) {
    DiplomacyFunctions::make_civilizations_meet(game, civ, other, false);
}

pub fn meet_all(game: &mut GameInfo) {
    let names = game.civ_names();
    for (i, civ) in names.iter().enumerate() {
        for other in &names[i + 1..] {
            meet(game, civ, other);
        }
    }
}

/// How many notifications `civ` received whose text contains `text`
pub fn notifications_containing(game: &GameInfo, civ: &str, text: &str) -> usize {
    game.get_civilization(civ)
        .notifications
        .iter()
        .filter(|n| n.text().contains(text))
        .count()
}
