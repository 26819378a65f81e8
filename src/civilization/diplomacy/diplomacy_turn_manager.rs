use tracing::{debug, info};

use crate::civilization::diplomacy::{
    CityStateFunctions, DiplomacyFlags, DiplomacyFunctions, DiplomaticModifiers, DiplomaticStatus, RelationshipLevel,
};
use crate::civilization::notification::{NotificationAction, NotificationCategory};
use crate::constants::Constants;
use crate::game_info::GameInfo;
use crate::trade::{Trade, TradeOffer, TradeOfferType};

/// Manages turn-based diplomatic actions and state changes
pub struct DiplomacyTurnManager;

impl DiplomacyTurnManager {
    /// Runs the turn of every edge `civ_name` owns, in name order
    pub fn next_turn(game: &mut GameInfo, civ_name: &str) {
        let other_civ_names: Vec<String> = game.get_civilization(civ_name).diplomacy.keys().cloned().collect();
        for other_civ_name in other_civ_names {
            if !game.is_alive(&other_civ_name) || !game.knows(&other_civ_name, civ_name) {
                continue;
            }
            Self::next_turn_edge(game, civ_name, &other_civ_name);
        }
    }

    /// Handles all turn-based diplomatic actions of one edge
    pub fn next_turn_edge(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        Self::next_turn_diplomatic_modifiers(game, civ_name, other_civ_name);
        Self::next_turn_flags(game, civ_name, other_civ_name);
        Self::next_turn_trades(game, civ_name, other_civ_name);
        Self::remove_untenable_trades(game, civ_name, other_civ_name);
        DiplomacyFunctions::update_has_open_borders(game, civ_name, other_civ_name);
        if game.get_civilization(civ_name).is_city_state && game.get_civilization(other_civ_name).is_major_civ() {
            Self::next_turn_city_state_influence(game, civ_name, other_civ_name);
        }
    }

    /// Updates diplomatic modifiers for the next turn
    fn next_turn_diplomatic_modifiers(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let other_has_open_borders = game.get_diplomacy_manager(other_civ_name, civ_name).has_open_borders;
        let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);

        if diplomacy_manager.diplomatic_status == DiplomaticStatus::Peace {
            let years_of_peace = diplomacy_manager.get_modifier(DiplomaticModifiers::YearsOfPeace);
            if years_of_peace < 30.0 {
                diplomacy_manager.add_modifier(DiplomaticModifiers::YearsOfPeace, (30.0 - years_of_peace).min(0.5));
            }
        } else {
            diplomacy_manager.revert_to_zero(DiplomaticModifiers::YearsOfPeace, 0.5);
        }

        let mut open_borders = 0;
        if diplomacy_manager.has_open_borders {
            open_borders += 1;
        }
        if other_has_open_borders {
            open_borders += 1;
        }
        if open_borders > 0 {
            diplomacy_manager.add_modifier(DiplomaticModifiers::OpenBorders, open_borders as f32 / 8.0);
        } else {
            diplomacy_manager.revert_to_zero(DiplomaticModifiers::OpenBorders, 1.0 / 8.0);
        }

        // Negatives
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::DeclaredWarOnUs, 1.0 / 8.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::WarMongerer, 1.0 / 2.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::CapturedOurCities, 1.0 / 4.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::BetrayedDeclarationOfFriendship, 1.0 / 8.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::RefusedToNotSettleCitiesNearUs, 1.0 / 4.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::BetrayedPromiseToNotSettleCitiesNearUs, 1.0 / 8.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::UnacceptableDemands, 1.0 / 4.0);
        diplomacy_manager.revert_to_zero(DiplomaticModifiers::StoleOurAlly, 1.0 / 2.0);

        if !diplomacy_manager.has_flag(DiplomacyFlags::DeclarationOfFriendship) {
            diplomacy_manager.revert_to_zero(DiplomaticModifiers::DeclarationOfFriendship, 1.0 / 2.0);
        }

        if game.get_civilization(civ_name).is_major_civ() && game.get_civilization(other_civ_name).is_city_state {
            CityStateFunctions::update_military_unit_gift_flag(game, civ_name, other_civ_name);
        }
    }

    /// Counts every flag down. Flags run out at zero and fire their one-shot effect.
    ///
    /// A unit gift that comes due while either side has no cities is left at zero and never
    /// fires; only falling below Friend clears it.
    fn next_turn_flags(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let flags: Vec<(DiplomacyFlags, i32)> = game
            .get_diplomacy_manager(civ_name, other_civ_name)
            .flags_countdown
            .iter()
            .map(|(flag, countdown)| (*flag, *countdown))
            .collect();

        for (flag, countdown) in flags {
            if countdown <= 0 {
                continue;
            }
            let countdown = countdown - 1;
            let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
            diplomacy_manager.flags_countdown.insert(flag, countdown);
            if countdown > 0 {
                continue;
            }

            // Only when flag is expired
            match flag {
                DiplomacyFlags::ProvideMilitaryUnit => {
                    if game.get_civilization(civ_name).cities.is_empty()
                        || game.get_civilization(other_civ_name).cities.is_empty()
                    {
                        debug!(civ = civ_name, other_civ = other_civ_name, "unit gift due but a side has no cities");
                        continue;
                    }
                    game.get_diplomacy_manager_mut(civ_name, other_civ_name).remove_flag(flag);
                    CityStateFunctions::give_military_unit_to_patron(game, other_civ_name, civ_name);
                }
                DiplomacyFlags::AgreedToNotSettleNearUs => {
                    diplomacy_manager.remove_flag(flag);
                    diplomacy_manager.add_modifier(DiplomaticModifiers::FulfilledPromiseToNotSettleCitiesNearUs, 10.0);
                }
                _ => diplomacy_manager.remove_flag(flag),
            }
        }
    }

    /// Ages the trades on our side. A trade is dropped from both sides once nothing in our copy
    /// has turns left; each side hears about every incoming offer ending exactly once.
    fn next_turn_trades(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let mut messages: Vec<String> = Vec::new();
        let mut stats_changed = false;
        let mut resources_changed = false;

        let expired_trades: Vec<Trade> = {
            let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
            for trade in diplomacy_manager.trades.iter_mut() {
                for offer in trade.our_offers.iter_mut().filter(|o| o.duration > 0) {
                    offer.duration -= 1;
                    if offer.duration == 0 {
                        stats_changed = true;
                        resources_changed |= offer.trade_offer_type.is_resource();
                    }
                }
                for offer in trade.their_offers.iter_mut().filter(|o| o.duration > 0) {
                    offer.duration -= 1;
                    match offer.duration {
                        0 => {
                            messages.push(format!("[{}] from [{}] has ended", offer.name, other_civ_name));
                            stats_changed = true;
                            resources_changed |= offer.trade_offer_type.is_resource();
                        }
                        1 => messages.push(format!("[{}] from [{}] will end next turn", offer.name, other_civ_name)),
                        3 => messages.push(format!("[{}] from [{}] will end in [3] turns", offer.name, other_civ_name)),
                        _ => {}
                    }
                }
            }
            let expired_trades = diplomacy_manager.trades.iter().filter(|t| t.is_expired()).cloned().collect();
            diplomacy_manager.trades.retain(|t| !t.is_expired());
            expired_trades
        };

        let mut mirror_messages: Vec<String> = Vec::new();
        let mut mirror_stats_changed = false;
        let mut mirror_resources_changed = false;
        if !expired_trades.is_empty() {
            info!(civ = civ_name, other_civ = other_civ_name, count = expired_trades.len(), "trades expired");
            let other_civ_diplomacy = game.get_diplomacy_manager_mut(other_civ_name, civ_name);
            for trade in &expired_trades {
                let reversed = trade.reverse();
                let Some(index) = other_civ_diplomacy.trades.iter().position(|t| t.equal_trade(&reversed)) else {
                    continue;
                };
                let mirror_trade = other_civ_diplomacy.trades.remove(index);
                for offer in mirror_trade.all_offers().filter(|o| o.duration > 0) {
                    mirror_stats_changed = true;
                    mirror_resources_changed |= offer.trade_offer_type.is_resource();
                }
                for offer in mirror_trade.their_offers.iter().filter(|o| o.duration > 0) {
                    mirror_messages.push(format!("[{}] from [{}] has ended", offer.name, civ_name));
                }
            }
        }

        Self::notify_trade(game, civ_name, other_civ_name, messages);
        Self::notify_trade(game, other_civ_name, civ_name, mirror_messages);

        for (name, stats, resources) in [
            (civ_name, stats_changed, resources_changed),
            (other_civ_name, mirror_stats_changed, mirror_resources_changed),
        ] {
            if stats {
                game.services_mut().update_stats_for_next_turn(name);
            }
            if resources {
                game.services_mut().update_civ_resources(name);
            }
        }
    }

    fn notify_trade(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, messages: Vec<String>) {
        let civ = game.get_civilization_mut(civ_name);
        for message in messages {
            civ.add_notification(
                message,
                NotificationCategory::Trade,
                Some(NotificationAction::DiplomacyAction {
                    other_civ: other_civ_name.to_string(),
                }),
                &[other_civ_name],
            );
        }
    }

    /// Removes trades that are no longer valid
    fn remove_untenable_trades(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let negative_civ_resources = game
            .services()
            .civ_resource_supply(game.get_civilization(civ_name))
            .negative_resources();
        if negative_civ_resources.is_empty() {
            return;
        }

        let untenable_trades: Vec<Trade> = game
            .get_diplomacy_manager(civ_name, other_civ_name)
            .trades
            .iter()
            .filter(|trade| {
                trade
                    .our_offers
                    .iter()
                    .any(|offer| offer.trade_offer_type.is_resource() && negative_civ_resources.contains(&offer.name))
            })
            .cloned()
            .collect();
        if untenable_trades.is_empty() {
            return;
        }

        let deal_duration = game.config.speed.deal_duration;
        for trade in untenable_trades {
            info!(civ = civ_name, other_civ = other_civ_name, "trade cut short");
            {
                let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
                if let Some(index) = diplomacy_manager.trades.iter().position(|t| t.equal_trade(&trade)) {
                    diplomacy_manager.trades.remove(index);
                }
            }
            {
                let reversed = trade.reverse();
                let other_civ_diplomacy = game.get_diplomacy_manager_mut(other_civ_name, civ_name);
                if let Some(index) = other_civ_diplomacy.trades.iter().position(|t| t.equal_trade(&reversed)) {
                    other_civ_diplomacy.trades.remove(index);
                }
                // If you cut a trade short, we're not going to trust you with per-turn trades for a while
                other_civ_diplomacy.set_flag(DiplomacyFlags::ResourceTradesCutShort, deal_duration * 2);
            }

            // Can't cut short peace treaties!
            if let Some(peace_treaty) = trade.their_offers.iter().find(|o| o.is_peace_treaty() && o.duration > 0) {
                Self::remake_peace_treaty(game, civ_name, other_civ_name, peace_treaty.duration);
            }

            for (name, other_name) in [(civ_name, other_civ_name), (other_civ_name, civ_name)] {
                game.get_civilization_mut(name).add_notification(
                    format!("One of our trades with [{other_name}] has been cut short"),
                    NotificationCategory::Trade,
                    Some(NotificationAction::DiplomacyAction {
                        other_civ: other_name.to_string(),
                    }),
                    &[other_name],
                );
            }
        }

        for name in [civ_name, other_civ_name] {
            game.services_mut().update_civ_resources(name);
            game.services_mut().update_stats_for_next_turn(name);
        }
    }

    /// Creates a new peace treaty with the specified duration
    fn remake_peace_treaty(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, duration_left: i32) {
        let mut treaty = Trade::new();
        treaty.our_offers.add(TradeOffer::with_duration(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, duration_left));
        treaty.their_offers.add(TradeOffer::with_duration(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, duration_left));
        game.get_diplomacy_manager_mut(other_civ_name, civ_name)
            .trades
            .push(treaty.reverse());
        game.get_diplomacy_manager_mut(civ_name, other_civ_name).trades.push(treaty);
    }

    /// Drifts a city-state's influence towards its resting point and warns the major civ
    fn next_turn_city_state_influence(game: &mut GameInfo, city_state_name: &str, major_civ_name: &str) {
        let (initial_relationship_level, new_influence) = {
            let diplomacy_manager = game.get_diplomacy_manager(city_state_name, major_civ_name);
            let initial_relationship_level = diplomacy_manager.relationship_level(game);
            let resting_point = diplomacy_manager.get_city_state_influence_resting_point(game);
            let influence = diplomacy_manager.get_influence();
            let new_influence = if influence > resting_point {
                let decrement = diplomacy_manager.get_city_state_influence_degrade(game);
                (influence - decrement).max(resting_point)
            } else if influence < resting_point {
                let increment = diplomacy_manager.get_city_state_influence_recovery(game);
                (influence + increment).min(resting_point)
            } else {
                influence
            };
            (initial_relationship_level, new_influence)
        };
        game.get_diplomacy_manager_mut(city_state_name, major_civ_name).influence = new_influence;

        if game.get_civilization(city_state_name).is_defeated() {
            return;
        }

        let diplomacy_manager = game.get_diplomacy_manager(city_state_name, major_civ_name);
        let about_to_degrade = diplomacy_manager.get_turns_to_relationship_change(game) == 1;
        let current_relationship_level = diplomacy_manager.relationship_level(game);
        let degraded = initial_relationship_level >= RelationshipLevel::Friend
            && initial_relationship_level != current_relationship_level;

        let major_civ = game.get_civilization_mut(major_civ_name);
        let diplomacy_action = Some(NotificationAction::DiplomacyAction {
            other_civ: city_state_name.to_string(),
        });
        if about_to_degrade {
            major_civ.add_notification(
                format!("Your relationship with [{city_state_name}] is about to degrade"),
                NotificationCategory::Diplomacy,
                diplomacy_action.clone(),
                &[city_state_name],
            );
        }
        if degraded {
            major_civ.add_notification(
                format!("Your relationship with [{city_state_name}] degraded"),
                NotificationCategory::Diplomacy,
                diplomacy_action,
                &[city_state_name],
            );
        }
    }
}
