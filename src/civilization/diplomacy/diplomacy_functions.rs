use tracing::{debug, info};

use crate::civilization::diplomacy::{
    CityStateFunctions, DeclareWar, DeclareWarReason, DiplomacyFlags, DiplomacyManager, DiplomaticModifiers,
    DiplomaticStatus, RelationshipLevel,
};
use crate::civilization::notification::{NotificationAction, NotificationCategory};
use crate::constants::Constants;
use crate::game_info::GameInfo;
use crate::trade::{TradeLogic, TradeOffer, TradeOfferType};

/// Functions related to diplomacy between civilizations
pub struct DiplomacyFunctions;

impl DiplomacyFunctions {
    /// Makes two civilizations meet each other, creating both edges at once.
    ///
    /// Meeting again is a no-op. With `war_on_contact` the first civ declares war right away.
    ///
    /// # Panics
    /// When either side is the barbarians, or a civ tries to meet itself.
    pub fn make_civilizations_meet(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, war_on_contact: bool) {
        assert_ne!(civ_name, other_civ_name, "A civilization cannot meet itself");
        assert!(
            !game.get_civilization(civ_name).is_barbarian && !game.get_civilization(other_civ_name).is_barbarian,
            "Barbarians do not take part in diplomacy"
        );
        if game.knows(civ_name, other_civ_name) {
            return;
        }

        info!(civ = civ_name, other_civ = other_civ_name, "civilizations met");
        Self::meet_civ(game, civ_name, other_civ_name, war_on_contact);
        Self::meet_civ(game, other_civ_name, civ_name, war_on_contact);

        if war_on_contact {
            DeclareWar::declare_war(game, civ_name, other_civ_name, DeclareWarReason::direct());
        }
    }

    /// Internal function to make this civilization meet another
    fn meet_civ(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, war_on_contact: bool) {
        game.get_civilization_mut(civ_name)
            .diplomacy
            .insert(other_civ_name.to_string(), DiplomacyManager::new(civ_name, other_civ_name));

        game.get_civilization_mut(other_civ_name).add_notification(
            format!("We have encountered [{civ_name}]!"),
            NotificationCategory::Diplomacy,
            Some(NotificationAction::DiplomacyAction {
                other_civ: civ_name.to_string(),
            }),
            &[civ_name],
        );

        let civ = game.get_civilization(civ_name);
        if !civ.is_city_state || !game.get_civilization(other_civ_name).is_major_civ() {
            return;
        }
        if war_on_contact {
            return; // No gift if we are just about to be at war
        }

        let known_major_civs = civ
            .diplomacy
            .keys()
            .filter(|name| game.get_civilization(name).is_major_civ())
            .count();
        let city_state_location = civ.cities.first().map(|city| city.location);

        let mut gift_amount = game.config.constants.city_state_meeting_gift;
        let meet_string = if known_major_civs == 1 {
            gift_amount *= 2;
            format!("[{civ_name}] has given us [{gift_amount}] Gold as we are the first major civ to meet them")
        } else {
            format!("[{civ_name}] has given us [{gift_amount}] Gold as a token of goodwill for meeting us")
        };

        let other_civ = game.get_civilization_mut(other_civ_name);
        other_civ.gold += gift_amount;
        other_civ.add_notification(
            meet_string,
            NotificationCategory::Diplomacy,
            city_state_location.map(|location| NotificationAction::LocationAction { location }),
            &[civ_name],
        );
    }

    /// Recomputes whether `other_civ_name` lets us through. When the borders just closed our units
    /// inside their territory are moved out.
    pub fn update_has_open_borders(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) -> bool {
        let borders_were_closed = game
            .get_diplomacy_manager_mut(civ_name, other_civ_name)
            .update_has_open_borders();
        if borders_were_closed {
            // borders were closed, get out!
            debug!(civ = civ_name, other_civ = other_civ_name, "open borders ended");
            game.relocate_units_out_of_territory(civ_name, other_civ_name);
        }
        borders_were_closed
    }

    pub fn can_sign_declaration_of_friendship_with(game: &GameInfo, civ_name: &str, other_civ_name: &str) -> bool {
        let Some(diplomacy_manager) = game.get_civilization(civ_name).get_diplomacy_manager(other_civ_name) else {
            return false;
        };
        game.get_civilization(other_civ_name).is_major_civ()
            && !diplomacy_manager.is_at_war()
            && !diplomacy_manager.has_flag(DiplomacyFlags::Denunciation)
            && !diplomacy_manager.has_flag(DiplomacyFlags::DeclarationOfFriendship)
    }

    // region peace

    /// Ends the war between the two civs on both sides, and moves every unit out of what is
    /// now foreign territory.
    pub fn make_peace(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        info!(civ = civ_name, other_civ = other_civ_name, "peace made");
        game.get_diplomacy_manager_mut(civ_name, other_civ_name).diplomatic_status = DiplomaticStatus::Peace;
        game.get_diplomacy_manager_mut(other_civ_name, civ_name).diplomatic_status = DiplomaticStatus::Peace;

        // Get out of others' territory
        game.relocate_units_out_of_territory(civ_name, other_civ_name);
        game.relocate_units_out_of_territory(other_civ_name, civ_name);

        Self::update_city_states_after_peace(game, civ_name, other_civ_name);
        Self::update_city_states_after_peace(game, other_civ_name, civ_name);

        let common_known_civs = game
            .get_diplomacy_manager(civ_name, other_civ_name)
            .get_common_known_civs(game);
        for third_civ in common_known_civs {
            game.get_civilization_mut(&third_civ).add_notification(
                format!("[{civ_name}] and [{other_civ_name}] have signed a Peace Treaty!"),
                NotificationCategory::Diplomacy,
                None,
                &[civ_name, other_civ_name],
            );
        }

        debug_assert!(game.asymmetric_pairs().is_empty(), "asymmetric statuses after peace");
    }

    /// Our allied city-states make peace with our former enemy; the other city-states still
    /// fighting them don't like that we did.
    fn update_city_states_after_peace(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        if !game.get_civilization(civ_name).is_major_civ() {
            return;
        }
        for third_civ in game.get_known_civs(civ_name) {
            let city_state = game.get_civilization(&third_civ);
            if !city_state.is_city_state || !city_state.is_at_war_with(other_civ_name) {
                continue;
            }
            if city_state.ally_civ.as_deref() == Some(civ_name) {
                Self::sign_peace_treaty(game, &third_civ, other_civ_name);
            } else {
                CityStateFunctions::add_influence(game, &third_civ, civ_name, -10.0);
            }
        }
    }

    /// Makes peace through a peace treaty, so neither side can declare war again for a while
    pub fn sign_peace_treaty(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let speed = game.config.speed.clone();
        let mut trade_logic = TradeLogic::new(civ_name, other_civ_name);
        trade_logic.current_trade.our_offers.add(TradeOffer::new(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, &speed));
        trade_logic.current_trade.their_offers.add(TradeOffer::new(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, &speed));
        trade_logic.accept_trade(game);
    }

    // endregion

    // region friendship and denunciation

    pub fn sign_declaration_of_friendship(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        info!(civ = civ_name, other_civ = other_civ_name, "declaration of friendship signed");
        let duration = game.config.constants.declaration_of_friendship_duration;
        for (from, to) in [(civ_name, other_civ_name), (other_civ_name, civ_name)] {
            let diplomacy_manager = game.get_diplomacy_manager_mut(from, to);
            diplomacy_manager.set_modifier(DiplomaticModifiers::DeclarationOfFriendship, 35.0);
            diplomacy_manager.set_flag(DiplomacyFlags::DeclarationOfFriendship, duration);
        }

        for third_civ in Self::major_third_parties(game, civ_name, other_civ_name) {
            game.get_civilization_mut(&third_civ).add_notification(
                format!("[{civ_name}] and [{other_civ_name}] have signed the Declaration of Friendship!"),
                NotificationCategory::Diplomacy,
                None,
                &[civ_name, other_civ_name],
            );
            let level = game
                .get_diplomacy_manager(&third_civ, other_civ_name)
                .relationship_level(game);
            let (modifier, amount) = match level {
                RelationshipLevel::Unforgivable => (DiplomaticModifiers::DeclaredFriendshipWithOurEnemies, -15.0),
                RelationshipLevel::Enemy => (DiplomaticModifiers::DeclaredFriendshipWithOurEnemies, -5.0),
                RelationshipLevel::Friend => (DiplomaticModifiers::DeclaredFriendshipWithOurAllies, 5.0),
                RelationshipLevel::Ally => (DiplomaticModifiers::DeclaredFriendshipWithOurAllies, 15.0),
                _ => continue,
            };
            game.get_diplomacy_manager_mut(&third_civ, civ_name)
                .add_modifier(modifier, amount);
        }
    }

    pub fn denounce(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        info!(civ = civ_name, other_civ = other_civ_name, "denounced");
        let duration = game.config.constants.denunciation_duration;
        for (from, to) in [(civ_name, other_civ_name), (other_civ_name, civ_name)] {
            let diplomacy_manager = game.get_diplomacy_manager_mut(from, to);
            diplomacy_manager.set_modifier(DiplomaticModifiers::Denunciation, -35.0);
            diplomacy_manager.set_flag(DiplomacyFlags::Denunciation, duration);
        }

        game.get_civilization_mut(other_civ_name).add_notification(
            format!("[{civ_name}] has denounced us!"),
            NotificationCategory::Diplomacy,
            Some(NotificationAction::DiplomacyAction {
                other_civ: civ_name.to_string(),
            }),
            &[civ_name],
        );

        // We, the denouncing civ, lose the approval of those who like the denounced, and win over their enemies
        for third_civ in Self::major_third_parties(game, civ_name, other_civ_name) {
            game.get_civilization_mut(&third_civ).add_notification(
                format!("[{civ_name}] has denounced [{other_civ_name}]!"),
                NotificationCategory::Diplomacy,
                None,
                &[civ_name, other_civ_name],
            );
            let level = game
                .get_diplomacy_manager(&third_civ, other_civ_name)
                .relationship_level(game);
            let (modifier, amount) = match level {
                RelationshipLevel::Unforgivable => (DiplomaticModifiers::DenouncedOurEnemies, 15.0),
                RelationshipLevel::Enemy => (DiplomaticModifiers::DenouncedOurEnemies, 5.0),
                RelationshipLevel::Friend => (DiplomaticModifiers::DenouncedOurAllies, -5.0),
                RelationshipLevel::Ally => (DiplomaticModifiers::DenouncedOurAllies, -15.0),
                _ => continue,
            };
            game.get_diplomacy_manager_mut(&third_civ, civ_name)
                .add_modifier(modifier, amount);
        }
    }

    /// Major civs we know, other than `other_civ_name`, that have also met `other_civ_name`
    fn major_third_parties(game: &GameInfo, civ_name: &str, other_civ_name: &str) -> Vec<String> {
        game.get_diplomacy_manager(civ_name, other_civ_name)
            .get_common_known_civs(game)
            .into_iter()
            .filter(|name| game.get_civilization(name).is_major_civ())
            .collect()
    }

    // endregion

    // region settling demands

    /// `civ_name` gives in to `requesting_civ_name`'s demand to stop settling near them
    pub fn agree_not_to_settle_near(game: &mut GameInfo, civ_name: &str, requesting_civ_name: &str) {
        debug!(civ = civ_name, other_civ = requesting_civ_name, "agreed not to settle nearby");
        let duration = game.config.constants.settle_promise_duration;
        game.get_diplomacy_manager_mut(requesting_civ_name, civ_name)
            .set_flag(DiplomacyFlags::AgreedToNotSettleNearUs, duration);
        game.get_diplomacy_manager_mut(civ_name, requesting_civ_name)
            .add_modifier(DiplomaticModifiers::UnacceptableDemands, -10.0);
        game.get_civilization_mut(requesting_civ_name).add_notification(
            format!("[{civ_name}] agreed to stop settling cities near us!"),
            NotificationCategory::Diplomacy,
            Some(NotificationAction::DiplomacyAction {
                other_civ: civ_name.to_string(),
            }),
            &[civ_name],
        );
    }

    /// `civ_name` turns down `requesting_civ_name`'s demand to stop settling near them
    pub fn refuse_demand_not_to_settle_near(game: &mut GameInfo, civ_name: &str, requesting_civ_name: &str) {
        debug!(civ = civ_name, other_civ = requesting_civ_name, "refused to stop settling nearby");
        let duration = game.config.constants.settle_promise_duration;
        game.get_diplomacy_manager_mut(civ_name, requesting_civ_name)
            .add_modifier(DiplomaticModifiers::UnacceptableDemands, -20.0);
        let requesting_diplomacy = game.get_diplomacy_manager_mut(requesting_civ_name, civ_name);
        requesting_diplomacy.set_flag(DiplomacyFlags::IgnoreThemSettlingNearUs, duration);
        requesting_diplomacy.add_modifier(DiplomaticModifiers::RefusedToNotSettleCitiesNearUs, -15.0);
        game.get_civilization_mut(requesting_civ_name).add_notification(
            format!("[{civ_name}] refused to stop settling cities near us!"),
            NotificationCategory::Diplomacy,
            Some(NotificationAction::DiplomacyAction {
                other_civ: civ_name.to_string(),
            }),
            &[civ_name],
        );
    }

    // endregion
}
