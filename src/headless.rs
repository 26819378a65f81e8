use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::civilization::Civilization;
use crate::game_info::GameServices;
use crate::models::{MapUnit, Position, ResourceSupplyList};

/// How far from a unit the headless map looks for a free tile
const SEARCH_RADIUS: i32 = 10;

/// Every callback the rules made into the services, in order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceCalls {
    pub stats_updates: Vec<String>,
    pub resource_updates: Vec<String>,
}

/// A map-less stand-in for the rest of the game.
///
/// Territory is a plain tile-to-owner table, resources come from a fixed base supply per
/// civ plus whatever its trades move, and city-states gift a unit of a configured type
/// next to their capital.
#[derive(Debug, Clone, Default)]
pub struct HeadlessServices {
    territory: HashMap<Position, String>,
    base_resources: HashMap<String, ResourceSupplyList>,
    gift_unit_name: Option<String>,
    /// Tiles outside `0..width, 0..height` do not exist
    map_size: Option<(i32, i32)>,
    calls: Rc<RefCell<ServiceCalls>>,
}

impl HeadlessServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `owner` every tile of the rectangle from `from` to `to`, both included
    pub fn with_territory(mut self, owner: &str, from: Position, to: Position) -> Self {
        for x in from.0.min(to.0)..=from.0.max(to.0) {
            for y in from.1.min(to.1)..=from.1.max(to.1) {
                self.territory.insert((x, y), owner.to_string());
            }
        }
        self
    }

    pub fn with_resource(mut self, civ_name: &str, resource: &str, amount: i32) -> Self {
        self.base_resources
            .entry(civ_name.to_string())
            .or_default()
            .add(resource, "Tiles", amount);
        self
    }

    pub fn with_gift_unit(mut self, unit_name: &str) -> Self {
        self.gift_unit_name = Some(unit_name.to_string());
        self
    }

    pub fn with_map_size(mut self, width: i32, height: i32) -> Self {
        self.map_size = Some((width, height));
        self
    }

    /// Shared view of the recorded calls, still readable after the services are boxed into a game
    pub fn calls(&self) -> Rc<RefCell<ServiceCalls>> {
        Rc::clone(&self.calls)
    }

    fn on_map(&self, position: Position) -> bool {
        match self.map_size {
            Some((width, height)) => (0..width).contains(&position.0) && (0..height).contains(&position.1),
            None => true,
        }
    }
}

impl GameServices for HeadlessServices {
    fn civ_resource_supply(&self, civ: &Civilization) -> ResourceSupplyList {
        let mut supply = self.base_resources.get(&civ.civ_name).cloned().unwrap_or_default();
        for diplomacy_manager in civ.diplomacy.values() {
            supply.add_all(&diplomacy_manager.resources_from_trade());
        }
        supply
    }

    fn tile_owner(&self, position: Position) -> Option<String> {
        self.territory.get(&position).cloned()
    }

    fn closest_tile_where(&self, from: Position, can_enter: &dyn Fn(Position) -> bool) -> Option<Position> {
        for distance in 1..=SEARCH_RADIUS {
            for dy in -distance..=distance {
                for dx in -distance..=distance {
                    if dx.abs() != distance && dy.abs() != distance {
                        continue;
                    }
                    let position = (from.0 + dx, from.1 + dy);
                    if self.on_map(position) && can_enter(position) {
                        return Some(position);
                    }
                }
            }
        }
        None
    }

    fn giftable_military_unit(&self, city_state: &Civilization, receiving_civ: &Civilization) -> Option<MapUnit> {
        let unit_name = self.gift_unit_name.as_ref()?;
        let position = city_state.cities.first().map_or((0, 0), |city| city.location);
        let id = receiving_civ.units.iter().map(|u| u.id).max().map_or(1, |id| id + 1);
        Some(MapUnit::new(id, unit_name.clone(), true, position))
    }

    fn update_stats_for_next_turn(&mut self, civ_name: &str) {
        trace!(civ = civ_name, "stats update requested");
        self.calls.borrow_mut().stats_updates.push(civ_name.to_string());
    }

    fn update_civ_resources(&mut self, civ_name: &str) {
        trace!(civ = civ_name, "resource update requested");
        self.calls.borrow_mut().resource_updates.push(civ_name.to_string());
    }
}
