use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::civilization::diplomacy::{CityStateFunctions, DiplomacyManager, DiplomacyTurnManager};
use crate::civilization::Civilization;
use crate::config::GameConfig;
use crate::error::{DiplomacyError, Result};
use crate::models::{MapUnit, Position, ResourceSupplyList};

/// Everything the diplomacy rules need from the rest of the game: the map, the
/// resource ledger, unit selection and the yield caches.
///
/// The diplomacy code only ever talks to the outside world through this trait, so a
/// game can plug in its real map while tests use [`crate::headless::HeadlessServices`].
pub trait GameServices {
    /// Current net resource balances of a civ, including what trades bring in and take out
    fn civ_resource_supply(&self, civ: &Civilization) -> ResourceSupplyList;

    fn tile_owner(&self, position: Position) -> Option<String>;

    /// Nearest tile to `from` (excluding `from` itself) satisfying `can_enter`
    fn closest_tile_where(&self, from: Position, can_enter: &dyn Fn(Position) -> bool) -> Option<Position>;

    /// A unit a city-state can gift to `receiving_civ`, already placed on the map
    fn giftable_military_unit(&self, city_state: &Civilization, receiving_civ: &Civilization) -> Option<MapUnit>;

    fn update_stats_for_next_turn(&mut self, civ_name: &str);

    fn update_civ_resources(&mut self, civ_name: &str);
}

/// The registry of civilizations, and the context handle every diplomacy operation receives.
pub struct GameInfo {
    /// In turn order
    pub civilizations: Vec<Civilization>,
    pub config: GameConfig,
    pub turns: u32,
    rng: StdRng,
    services: Box<dyn GameServices>,
}

impl fmt::Debug for GameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameInfo")
            .field("turns", &self.turns)
            .field("config", &self.config)
            .field("civilizations", &self.civilizations)
            .finish_non_exhaustive()
    }
}

impl GameInfo {
    pub fn new(config: GameConfig, services: Box<dyn GameServices>) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            civilizations: Vec::new(),
            config,
            turns: 0,
            rng,
            services,
        }
    }

    /// Rebuilds a game from saved parts. The random stream continues from the turn reached.
    pub fn from_parts(
        civilizations: Vec<Civilization>,
        config: GameConfig,
        turns: u32,
        services: Box<dyn GameServices>,
    ) -> Self {
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(u64::from(turns)));
        Self {
            civilizations,
            config,
            turns,
            rng,
            services,
        }
    }

    pub fn add_civilization(&mut self, civ: Civilization) {
        assert!(
            self.civilizations.iter().all(|c| c.civ_name != civ.civ_name),
            "Civilization {} is already part of the game",
            civ.civ_name
        );
        self.civilizations.push(civ);
    }

    // region lookups

    pub fn try_get_civilization(&self, civ_name: &str) -> Result<&Civilization> {
        self.civilizations
            .iter()
            .find(|c| c.civ_name == civ_name)
            .ok_or_else(|| DiplomacyError::UnknownCivilization(civ_name.to_string()))
    }

    pub fn get_civilization(&self, civ_name: &str) -> &Civilization {
        match self.civilizations.iter().find(|c| c.civ_name == civ_name) {
            Some(civ) => civ,
            None => panic!("Unknown civilization {civ_name}"),
        }
    }

    pub fn get_civilization_mut(&mut self, civ_name: &str) -> &mut Civilization {
        match self.civilizations.iter_mut().find(|c| c.civ_name == civ_name) {
            Some(civ) => civ,
            None => panic!("Unknown civilization {civ_name}"),
        }
    }

    pub fn get_diplomacy_manager(&self, civ_name: &str, other_civ_name: &str) -> &DiplomacyManager {
        match self.get_civilization(civ_name).get_diplomacy_manager(other_civ_name) {
            Some(diplomacy_manager) => diplomacy_manager,
            None => panic!("{civ_name} has never met {other_civ_name}"),
        }
    }

    pub fn get_diplomacy_manager_mut(&mut self, civ_name: &str, other_civ_name: &str) -> &mut DiplomacyManager {
        match self.get_civilization_mut(civ_name).get_diplomacy_manager_mut(other_civ_name) {
            Some(diplomacy_manager) => diplomacy_manager,
            None => panic!("{civ_name} has never met {other_civ_name}"),
        }
    }

    pub fn knows(&self, civ_name: &str, other_civ_name: &str) -> bool {
        self.get_civilization(civ_name).knows(other_civ_name)
    }

    pub fn is_at_war(&self, civ_name: &str, other_civ_name: &str) -> bool {
        self.get_civilization(civ_name).is_at_war_with(other_civ_name)
    }

    /// Still in the game: not defeated, and not yet destroyed
    pub fn is_alive(&self, civ_name: &str) -> bool {
        self.try_get_civilization(civ_name).is_ok_and(|civ| !civ.is_defeated())
    }

    /// Living civs `civ_name` has met, in name order
    pub fn get_known_civs(&self, civ_name: &str) -> Vec<String> {
        self.get_civilization(civ_name)
            .diplomacy
            .keys()
            .filter(|name| self.is_alive(name))
            .cloned()
            .collect()
    }

    pub fn civ_names(&self) -> Vec<String> {
        self.civilizations.iter().map(|c| c.civ_name.clone()).collect()
    }

    /// Deep copy of every civilization, for turn snapshots
    pub fn snapshot_civilizations(&self) -> Vec<Civilization> {
        self.civilizations.clone()
    }

    /// Known pairs whose mirror edges disagree on war and peace. Always empty in a healthy game.
    pub fn asymmetric_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for civ in &self.civilizations {
            for (other_name, diplomacy_manager) in &civ.diplomacy {
                let Ok(other_civ) = self.try_get_civilization(other_name) else {
                    continue;
                };
                if let Some(mirror) = other_civ.get_diplomacy_manager(&civ.civ_name) {
                    if mirror.diplomatic_status != diplomacy_manager.diplomatic_status {
                        pairs.push((civ.civ_name.clone(), other_name.clone()));
                    }
                }
            }
        }
        pairs
    }

    // endregion

    // region services

    pub fn services(&self) -> &dyn GameServices {
        self.services.as_ref()
    }

    pub fn services_mut(&mut self) -> &mut dyn GameServices {
        self.services.as_mut()
    }

    /// One of -1, 0 or 1, from the seeded game random stream
    pub fn random_variance(&mut self) -> i32 {
        self.rng.random_range(-1..=1)
    }

    /// Whether units of `civ_name` may stand on the tile at `position`
    pub fn can_enter(&self, civ_name: &str, position: Position) -> bool {
        let Some(owner) = self.services.tile_owner(position) else {
            return true;
        };
        if owner == civ_name {
            return true;
        }
        match self.get_civilization(civ_name).get_diplomacy_manager(&owner) {
            Some(diplomacy_manager) => diplomacy_manager.is_at_war() || diplomacy_manager.has_open_borders,
            None => true,
        }
    }

    /// Moves every unit of `civ_name` standing in `owner_name`'s territory to the closest tile it
    /// may occupy. Units with nowhere to go are disbanded.
    pub fn relocate_units_out_of_territory(&mut self, civ_name: &str, owner_name: &str) {
        let units = self.get_civilization(civ_name).units.snapshot();
        for unit in units.iter() {
            if self.services.tile_owner(unit.position).as_deref() != Some(owner_name) {
                continue;
            }
            if self.can_enter(civ_name, unit.position) {
                continue;
            }
            let destination = self
                .services
                .closest_tile_where(unit.position, &|position| self.can_enter(civ_name, position));
            let civ = self.get_civilization_mut(civ_name);
            match destination {
                Some(position) => {
                    debug!(civ = civ_name, unit = %unit.name, ?position, "relocating unit out of foreign territory");
                    civ.units.map_into_new(|u| {
                        if u.id == unit.id {
                            MapUnit { position, ..u.clone() }
                        } else {
                            u.clone()
                        }
                    });
                }
                None => {
                    debug!(civ = civ_name, unit = %unit.name, "no tile to relocate to, disbanding");
                    civ.units.retain_into_new(|u| u.id != unit.id);
                }
            }
        }
    }

    // endregion

    // region turns

    /// Runs the diplomacy part of a turn for every civ in registry order.
    pub fn next_turn(&mut self) {
        for civ_name in self.civ_names() {
            if !self.is_alive(&civ_name) {
                continue;
            }
            DiplomacyTurnManager::next_turn(self, &civ_name);
            if self.get_civilization(&civ_name).is_city_state {
                CityStateFunctions::update_ally_civ_for_city_state(self, &civ_name);
            }
            let civ = self.get_civilization_mut(&civ_name);
            let gold_per_turn = civ.trade_gold_per_turn();
            civ.gold += gold_per_turn;
        }

        let newly_defeated: Vec<String> = self
            .civilizations
            .iter()
            .filter(|c| c.is_defeated() && !c.diplomacy.is_empty())
            .map(|c| c.civ_name.clone())
            .collect();
        for civ_name in newly_defeated {
            self.destroy_civilization(&civ_name);
        }

        self.turns += 1;
        debug_assert!(self.asymmetric_pairs().is_empty(), "asymmetric statuses after turn {}", self.turns);
    }

    /// Removes a civ from diplomacy. Its name stays resolvable so survivors' edges remain valid.
    pub fn destroy_civilization(&mut self, civ_name: &str) {
        info!(civ = civ_name, "civilization destroyed");
        {
            let civ = self.get_civilization_mut(civ_name);
            civ.diplomacy.clear();
            civ.trade_requests.replace(Vec::new());
            civ.ally_civ = None;
            civ.units.replace(Vec::new());
            civ.cities.replace(Vec::new());
        }

        for civ in self.civilizations.iter_mut().filter(|c| c.civ_name != civ_name) {
            for (other_name, diplomacy_manager) in civ.diplomacy.iter_mut() {
                if other_name == civ_name {
                    diplomacy_manager.trades.clear();
                    diplomacy_manager.has_open_borders = false;
                } else {
                    diplomacy_manager.trades.retain(|trade| !trade.mentions_civ(civ_name));
                }
            }
            civ.trade_requests
                .retain_into_new(|request| request.requesting_civ != civ_name && !request.trade.mentions_civ(civ_name));
        }

        let orphaned_city_states: Vec<String> = self
            .civilizations
            .iter()
            .filter(|c| c.is_city_state && c.ally_civ.as_deref() == Some(civ_name))
            .map(|c| c.civ_name.clone())
            .collect();
        for city_state in orphaned_city_states {
            CityStateFunctions::update_ally_civ_for_city_state(self, &city_state);
        }
    }

    // endregion
}
