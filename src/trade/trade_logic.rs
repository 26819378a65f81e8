use tracing::{debug, info};

use crate::civilization::diplomacy::{DeclareWar, DeclareWarReason, DiplomacyFunctions};
use crate::game_info::GameInfo;
use crate::trade::{Trade, TradeOffer, TradeOfferType};

/// A trade being put together between two civs, from `our_civ_name`'s point of view
#[derive(Debug, Clone)]
pub struct TradeLogic {
    pub our_civ_name: String,
    pub other_civ_name: String,
    pub current_trade: Trade,
}

impl TradeLogic {
    pub fn new(our_civ_name: impl Into<String>, other_civ_name: impl Into<String>) -> Self {
        Self {
            our_civ_name: our_civ_name.into(),
            other_civ_name: other_civ_name.into(),
            current_trade: Trade::new(),
        }
    }

    pub fn with_trade(mut self, trade: Trade) -> Self {
        self.current_trade = trade;
        self
    }

    /// Accept the current trade
    ///
    /// # Panics
    /// When the two civs have not met.
    pub fn accept_trade(&self, game: &mut GameInfo) {
        let our_civ_name = self.our_civ_name.as_str();
        let other_civ_name = self.other_civ_name.as_str();
        info!(civ = our_civ_name, other_civ = other_civ_name, "trade accepted");

        if self.current_trade.all_offers().any(|offer| offer.duration > 0) {
            game.get_diplomacy_manager_mut(our_civ_name, other_civ_name)
                .trades
                .push(self.current_trade.clone());
            game.get_diplomacy_manager_mut(other_civ_name, our_civ_name)
                .trades
                .push(self.current_trade.reverse());
        }

        // Transfer gold, introductions and the like
        for offer in self.current_trade.their_offers.iter() {
            self.transfer_trade(game, other_civ_name, our_civ_name, offer);
        }
        for offer in self.current_trade.our_offers.iter() {
            self.transfer_trade(game, our_civ_name, other_civ_name, offer);
        }

        // Treaties are shared, so only one side signs them
        if self.current_trade.their_offers.iter().any(TradeOffer::is_peace_treaty) {
            DiplomacyFunctions::make_peace(game, our_civ_name, other_civ_name);
        }

        DiplomacyFunctions::update_has_open_borders(game, our_civ_name, other_civ_name);
        DiplomacyFunctions::update_has_open_borders(game, other_civ_name, our_civ_name);

        for civ_name in [our_civ_name, other_civ_name] {
            game.services_mut().update_civ_resources(civ_name);
            game.services_mut().update_stats_for_next_turn(civ_name);
        }
    }

    /// Transfer a one-off trade offer from one civilization to another
    fn transfer_trade(&self, game: &mut GameInfo, from: &str, to: &str, offer: &TradeOffer) {
        match offer.trade_offer_type {
            TradeOfferType::Gold => {
                game.get_civilization_mut(to).gold += offer.amount;
                game.get_civilization_mut(from).gold -= offer.amount;
            }
            TradeOfferType::Introduction => {
                if offer.name != to && game.is_alive(&offer.name) {
                    DiplomacyFunctions::make_civilizations_meet(game, to, &offer.name, false);
                }
            }
            TradeOfferType::WarDeclaration => {
                let name_of_civ_to_declare_war_on = offer.name.as_str();
                let can_declare_war = game
                    .get_civilization(from)
                    .get_diplomacy_manager(name_of_civ_to_declare_war_on)
                    .is_some_and(|diplomacy_manager| diplomacy_manager.can_declare_war(game));
                if can_declare_war {
                    DeclareWar::declare_war(game, from, name_of_civ_to_declare_war_on, DeclareWarReason::direct());
                } else {
                    debug!(civ = from, other_civ = name_of_civ_to_declare_war_on, "traded war declaration no longer possible");
                }
            }
            _ => {}
        }
    }

    /// Accepts the trade `requesting_civ_name` proposed to `civ_name`, removing it from the queue.
    /// Returns false when there was no such request.
    pub fn accept_trade_request(game: &mut GameInfo, civ_name: &str, requesting_civ_name: &str) -> bool {
        let request = game
            .get_civilization(civ_name)
            .trade_requests
            .iter()
            .find(|request| request.requesting_civ == requesting_civ_name)
            .cloned();
        let Some(request) = request else {
            return false;
        };
        game.get_civilization_mut(civ_name)
            .trade_requests
            .retain_into_new(|r| r.requesting_civ != requesting_civ_name);

        TradeLogic::new(requesting_civ_name, civ_name)
            .with_trade(request.trade)
            .accept_trade(game);
        true
    }
}
