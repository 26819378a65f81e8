use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::civilization::diplomacy::{
    CityStatePersonality, DiplomacyFlags, DiplomaticModifiers, DiplomaticStatus, RelationshipLevel,
};
use crate::civilization::Civilization;
use crate::constants::Constants;
use crate::game_info::GameInfo;
use crate::models::ResourceSupplyList;
use crate::serializers::migrations;
use crate::trade::{Trade, TradeOfferType};

/// One civilization's half of a relationship with another civilization.
///
/// Each civ owns one manager per civ it has met, keyed by the other civ's name. The
/// other side is only ever reached through the [`GameInfo`] registry by name, so
/// cloning or saving a civilization never drags the other civ along with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomacyManager {
    /// Name of the civ owning this manager
    pub civ_name: String,
    pub other_civ_name: String,
    pub trades: Vec<Trade>,
    pub diplomatic_status: DiplomaticStatus,
    /// Countdowns, strictly positive while present
    #[serde(deserialize_with = "migrations::deserialize_flags")]
    pub flags_countdown: BTreeMap<DiplomacyFlags, i32>,
    /// Never holds a zero after `add_modifier`
    #[serde(deserialize_with = "migrations::deserialize_modifiers")]
    pub diplomatic_modifiers: BTreeMap<DiplomaticModifiers, f32>,
    /// Only meaningful when the owner is a city-state
    pub(crate) influence: f32,
    /// Derived from `trades`, see [`DiplomacyManager::update_has_open_borders`]
    pub has_open_borders: bool,
}

impl DiplomacyManager {
    pub fn new(civ_name: impl Into<String>, other_civ_name: impl Into<String>) -> Self {
        Self {
            civ_name: civ_name.into(),
            other_civ_name: other_civ_name.into(),
            trades: Vec::new(),
            diplomatic_status: DiplomaticStatus::Peace,
            flags_countdown: BTreeMap::new(),
            diplomatic_modifiers: BTreeMap::new(),
            influence: 0.0,
            has_open_borders: false,
        }
    }

    pub fn civ_info<'a>(&self, game: &'a GameInfo) -> &'a Civilization {
        game.get_civilization(&self.civ_name)
    }

    pub fn other_civ<'a>(&self, game: &'a GameInfo) -> &'a Civilization {
        game.get_civilization(&self.other_civ_name)
    }

    /// The mirror edge, owned by the other civ
    pub fn other_civ_diplomacy<'a>(&self, game: &'a GameInfo) -> &'a DiplomacyManager {
        game.get_diplomacy_manager(&self.other_civ_name, &self.civ_name)
    }

    pub fn is_at_war(&self) -> bool {
        self.diplomatic_status == DiplomaticStatus::War
    }

    // region flags

    pub fn has_flag(&self, flag: DiplomacyFlags) -> bool {
        self.flags_countdown.contains_key(&flag)
    }

    pub fn get_flag(&self, flag: DiplomacyFlags) -> Option<i32> {
        self.flags_countdown.get(&flag).copied()
    }

    pub fn set_flag(&mut self, flag: DiplomacyFlags, amount: i32) {
        assert!(amount > 0, "flag {flag} must be set to a positive number of turns, got {amount}");
        self.flags_countdown.insert(flag, amount);
    }

    pub fn remove_flag(&mut self, flag: DiplomacyFlags) {
        self.flags_countdown.remove(&flag);
    }

    // endregion

    // region modifiers

    /// Adds to a modifier, removing it when the result is exactly zero
    pub fn add_modifier(&mut self, modifier: DiplomaticModifiers, amount: f32) {
        let current = self.diplomatic_modifiers.entry(modifier).or_insert(0.0);
        *current += amount;
        if *current == 0.0 {
            self.diplomatic_modifiers.remove(&modifier);
        }
    }

    /// Overwrites a modifier. Unlike `add_modifier` a zero is kept.
    pub fn set_modifier(&mut self, modifier: DiplomaticModifiers, amount: f32) {
        self.diplomatic_modifiers.insert(modifier, amount);
    }

    pub fn get_modifier(&self, modifier: DiplomaticModifiers) -> f32 {
        self.diplomatic_modifiers.get(&modifier).copied().unwrap_or(0.0)
    }

    pub fn has_modifier(&self, modifier: DiplomaticModifiers) -> bool {
        self.diplomatic_modifiers.contains_key(&modifier)
    }

    pub fn remove_modifier(&mut self, modifier: DiplomaticModifiers) {
        self.diplomatic_modifiers.remove(&modifier);
    }

    /// Moves a modifier towards zero by `amount`, removing it instead of overshooting
    pub fn revert_to_zero(&mut self, modifier: DiplomaticModifiers, amount: f32) {
        let Some(current_amount) = self.diplomatic_modifiers.get(&modifier).copied() else {
            return;
        };
        if amount >= current_amount.abs() {
            self.remove_modifier(modifier);
        } else if current_amount > 0.0 {
            self.add_modifier(modifier, -amount);
        } else {
            self.add_modifier(modifier, amount);
        }
    }

    /// Our opinion of the other civ. Only our own modifiers count, never theirs.
    pub fn opinion_of_other_civ(&self) -> f32 {
        self.diplomatic_modifiers.values().sum()
    }

    // endregion

    // region relationship

    pub fn relationship_level(&self, game: &GameInfo) -> RelationshipLevel {
        let civ_info = self.civ_info(game);
        let other_civ = self.other_civ(game);

        if civ_info.is_human() && other_civ.is_human() {
            return RelationshipLevel::Neutral; // People make their own choices.
        }

        if civ_info.is_human() {
            // Only the AI side has an opinion worth scoring
            return match other_civ.diplomacy.get(&self.civ_name) {
                Some(their_diplomacy) => their_diplomacy.relationship_level(game),
                None => RelationshipLevel::Neutral,
            };
        }

        if civ_info.is_city_state {
            return RelationshipLevel::from_influence(self.influence, self.is_at_war());
        }

        RelationshipLevel::from_opinion(self.opinion_of_other_civ(), self.is_at_war())
    }

    /// Civs both sides know, excluding the two sides themselves
    pub fn get_common_known_civs(&self, game: &GameInfo) -> Vec<String> {
        let other_civ = self.other_civ(game);
        game.get_known_civs(&self.civ_name)
            .into_iter()
            .filter(|name| *name != self.other_civ_name && other_civ.knows(name))
            .collect()
    }

    // endregion

    // region trades

    /// Turns left on an active peace treaty, 0 if there is none
    pub fn turns_to_peace_treaty(&self) -> i32 {
        self.trades
            .iter()
            .flat_map(|trade| trade.our_offers.iter())
            .find(|offer| offer.is_peace_treaty() && offer.duration > 0)
            .map_or(0, |offer| offer.duration)
    }

    pub fn can_declare_war(&self, game: &GameInfo) -> bool {
        !self.civ_info(game).is_defeated()
            && !self.other_civ(game).is_defeated()
            && self.turns_to_peace_treaty() == 0
            && self.diplomatic_status != DiplomaticStatus::War
    }

    /// Net gold per turn flowing to us from the trades with this civ
    pub fn gold_per_turn(&self) -> i32 {
        let mut gold_per_turn_for_us = 0;
        for trade in &self.trades {
            for offer in trade.our_offers.iter().filter(|o| o.trade_offer_type == TradeOfferType::GoldPerTurn) {
                gold_per_turn_for_us -= offer.amount;
            }
            for offer in trade.their_offers.iter().filter(|o| o.trade_offer_type == TradeOfferType::GoldPerTurn) {
                gold_per_turn_for_us += offer.amount;
            }
        }
        gold_per_turn_for_us
    }

    pub fn resources_from_trade(&self) -> ResourceSupplyList {
        let mut new_resource_supply_list = ResourceSupplyList::new();
        for trade in &self.trades {
            for offer in trade.our_offers.iter().filter(|o| o.trade_offer_type.is_resource()) {
                new_resource_supply_list.add(&offer.name, "Trade", -offer.amount);
            }
            for offer in trade.their_offers.iter().filter(|o| o.trade_offer_type.is_resource()) {
                new_resource_supply_list.add(&offer.name, "Trade", offer.amount);
            }
        }
        new_resource_supply_list
    }

    /// Recomputes `has_open_borders` from the trades. Returns true when the borders just closed.
    pub fn update_has_open_borders(&mut self) -> bool {
        let new_has_open_borders = self
            .trades
            .iter()
            .flat_map(|t| t.their_offers.iter())
            .any(|o| o.is_open_borders() && o.duration > 0);

        let borders_were_closed = self.has_open_borders && !new_has_open_borders;
        self.has_open_borders = new_has_open_borders;
        borders_were_closed
    }

    // endregion

    // region influence

    /// Influence of our city-state with the other civ
    pub fn get_influence(&self) -> f32 {
        self.influence
    }

    pub fn get_city_state_influence_resting_point(&self, game: &GameInfo) -> f32 {
        game.config.constants.city_state_resting_point
    }

    pub fn get_city_state_influence_degrade(&self, game: &GameInfo) -> f32 {
        if self.influence <= self.get_city_state_influence_resting_point(game) {
            return 0.0;
        }
        match self.civ_info(game).city_state_personality {
            CityStatePersonality::Hostile => 1.5,
            _ => 1.0,
        }
    }

    pub fn get_city_state_influence_recovery(&self, game: &GameInfo) -> f32 {
        if self.influence >= self.get_city_state_influence_resting_point(game) {
            return 0.0;
        }
        1.0 // sic: personality does not matter here
    }

    /// Turns until a city-state relationship drops a level, 0 if it is not about to
    pub fn get_turns_to_relationship_change(&self, game: &GameInfo) -> i32 {
        let civ_info = self.civ_info(game);
        let other_civ = self.other_civ(game);
        if other_civ.is_city_state {
            return other_civ
                .diplomacy
                .get(&self.civ_name)
                .map_or(0, |d| d.get_turns_to_relationship_change(game));
        }
        if !civ_info.is_city_state {
            return 0;
        }

        let drop_per_turn = self.get_city_state_influence_degrade(game);
        if drop_per_turn == 0.0 {
            return 0;
        }
        let threshold = match self.relationship_level(game) {
            RelationshipLevel::Ally => Constants::ALLY_INFLUENCE,
            RelationshipLevel::Friend => 30.0,
            _ => return 0,
        };
        ((self.influence - threshold) / drop_per_turn).ceil() as i32 + 1
    }

    // endregion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::TradeOffer;

    fn manager() -> DiplomacyManager {
        DiplomacyManager::new("Rome", "Greece")
    }

    #[test]
    fn test_add_then_subtract_removes_modifier() {
        let mut dm = manager();
        dm.add_modifier(DiplomaticModifiers::SharedEnemy, 5.0);
        dm.add_modifier(DiplomaticModifiers::SharedEnemy, -5.0);
        assert!(!dm.has_modifier(DiplomaticModifiers::SharedEnemy));
        assert!(dm.diplomatic_modifiers.is_empty());
    }

    #[test]
    fn test_set_modifier_keeps_zero() {
        let mut dm = manager();
        dm.set_modifier(DiplomaticModifiers::UnacceptableDemands, 0.0);
        assert!(dm.has_modifier(DiplomaticModifiers::UnacceptableDemands));
        assert_eq!(dm.opinion_of_other_civ(), 0.0);
    }

    #[test]
    fn test_revert_to_zero_moves_towards_zero_and_clamps() {
        let mut dm = manager();
        dm.set_modifier(DiplomaticModifiers::WarMongerer, -1.0);
        dm.revert_to_zero(DiplomaticModifiers::WarMongerer, 0.5);
        assert_eq!(dm.get_modifier(DiplomaticModifiers::WarMongerer), -0.5);
        dm.revert_to_zero(DiplomaticModifiers::WarMongerer, 0.75);
        assert!(!dm.has_modifier(DiplomaticModifiers::WarMongerer));

        dm.set_modifier(DiplomaticModifiers::YearsOfPeace, 2.0);
        dm.revert_to_zero(DiplomaticModifiers::YearsOfPeace, 0.5);
        assert_eq!(dm.get_modifier(DiplomaticModifiers::YearsOfPeace), 1.5);

        dm.revert_to_zero(DiplomaticModifiers::CapturedOurCities, 0.25);
        assert!(!dm.has_modifier(DiplomaticModifiers::CapturedOurCities));
    }

    #[test]
    fn test_opinion_is_sum_of_own_modifiers() {
        let mut dm = manager();
        dm.add_modifier(DiplomaticModifiers::DeclarationOfFriendship, 35.0);
        dm.add_modifier(DiplomaticModifiers::WarMongerer, -5.0);
        assert_eq!(dm.opinion_of_other_civ(), 30.0);
    }

    #[test]
    #[should_panic(expected = "positive number of turns")]
    fn test_flags_must_be_positive() {
        manager().set_flag(DiplomacyFlags::DeclaredWar, 0);
    }

    #[test]
    fn test_trade_queries() {
        let mut dm = manager();
        let mut trade = Trade::new();
        trade.our_offers.add(TradeOffer::with_duration("Iron", TradeOfferType::StrategicResource, 2, 20));
        trade.our_offers.add(TradeOffer::with_duration("Gold", TradeOfferType::GoldPerTurn, 3, 20));
        trade.their_offers.add(TradeOffer::with_duration("Gold", TradeOfferType::GoldPerTurn, 7, 20));
        trade.their_offers.add(TradeOffer::with_duration("Silk", TradeOfferType::LuxuryResource, 1, 20));
        trade.their_offers.add(TradeOffer::with_duration(Constants::OPEN_BORDERS, TradeOfferType::Agreement, 1, 20));
        dm.trades.push(trade);

        assert_eq!(dm.gold_per_turn(), 4);
        let resources = dm.resources_from_trade();
        assert_eq!(resources.amount_of("Iron"), -2);
        assert_eq!(resources.amount_of("Silk"), 1);
        assert!(!dm.update_has_open_borders());
        assert!(dm.has_open_borders);

        dm.trades.clear();
        assert!(dm.update_has_open_borders());
        assert!(!dm.has_open_borders);
    }

    #[test]
    fn test_turns_to_peace_treaty() {
        let mut dm = manager();
        assert_eq!(dm.turns_to_peace_treaty(), 0);
        let mut treaty = Trade::new();
        treaty.our_offers.add(TradeOffer::with_duration(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, 7));
        treaty.their_offers.add(TradeOffer::with_duration(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, 7));
        dm.trades.push(treaty);
        assert_eq!(dm.turns_to_peace_treaty(), 7);
    }
}
