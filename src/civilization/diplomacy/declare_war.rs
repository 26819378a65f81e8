use tracing::{debug, info};

use crate::civilization::diplomacy::{
    CityStateFunctions, DiplomacyFlags, DiplomacyFunctions, DiplomaticModifiers, DiplomaticStatus,
};
use crate::civilization::notification::{NotificationAction, NotificationCategory};
use crate::game_info::GameInfo;

/// Represents the type of war being declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarType {
    /// One civ declared war on the other
    DirectWar,
    /// A city state has joined a war through its alliance
    CityStateAllianceWar,
}

/// Stores the reason for the war
///
/// For `CityStateAllianceWar` the `ally_civ` is the major civ the city-state is fighting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclareWarReason {
    pub war_type: WarType,
    pub ally_civ: Option<String>,
}

impl DeclareWarReason {
    pub fn new(war_type: WarType, ally_civ: Option<String>) -> Self {
        Self { war_type, ally_civ }
    }

    pub fn direct() -> Self {
        Self::new(WarType::DirectWar, None)
    }
}

/// Handles war declarations and their effects
pub struct DeclareWar;

impl DeclareWar {
    /// Declares war from `civ_name` on `other_civ_name`.
    /// Handles all war effects and diplomatic changes with other civs and such.
    ///
    /// Influence with a city-state only drops when it is attacked directly, not when its
    /// ally is attacked.
    ///
    /// # Panics
    /// If the two are already at war, or a peace treaty between them is still running.
    pub fn declare_war(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, declare_war_reason: DeclareWarReason) {
        {
            let diplomacy_manager = game.get_diplomacy_manager(civ_name, other_civ_name);
            assert!(
                diplomacy_manager.diplomatic_status != DiplomaticStatus::War,
                "{civ_name} is already at war with {other_civ_name}"
            );
            assert!(
                diplomacy_manager.turns_to_peace_treaty() == 0,
                "{civ_name} cannot declare war on {other_civ_name} during a peace treaty"
            );
        }
        info!(civ = civ_name, other_civ = other_civ_name, war_type = ?declare_war_reason.war_type, "war declared");

        Self::notify_of_war(game, civ_name, other_civ_name, &declare_war_reason);

        Self::on_war_declared(game, civ_name, other_civ_name);
        Self::on_war_declared(game, other_civ_name, civ_name);

        Self::change_opinions(game, civ_name, other_civ_name, &declare_war_reason);

        Self::break_treaties(game, civ_name, other_civ_name);

        Self::call_in_city_state_allies(game, civ_name, other_civ_name);

        CityStateFunctions::update_ally_civ_for_city_state(game, other_civ_name);

        debug_assert!(game.asymmetric_pairs().is_empty(), "asymmetric statuses after war declaration");
    }

    /// Notifies civilizations about the war declaration
    fn notify_of_war(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, declare_war_reason: &DeclareWarReason) {
        let common_known_civs = game
            .get_diplomacy_manager(civ_name, other_civ_name)
            .get_common_known_civs(game);
        let diplomacy_action = Some(NotificationAction::DiplomacyAction {
            other_civ: civ_name.to_string(),
        });

        match (declare_war_reason.war_type, declare_war_reason.ally_civ.as_deref()) {
            (WarType::CityStateAllianceWar, Some(ally_civ)) => {
                game.get_civilization_mut(other_civ_name).add_notification(
                    format!("[{civ_name}] has joined [{ally_civ}] in the war against us!"),
                    NotificationCategory::War,
                    diplomacy_action.clone(),
                    &[civ_name, ally_civ],
                );
                for third_civ in common_known_civs.iter().filter(|c| *c != ally_civ) {
                    game.get_civilization_mut(third_civ).add_notification(
                        format!("[{civ_name}] has joined [{ally_civ}] in the war against [{other_civ_name}]!"),
                        NotificationCategory::War,
                        diplomacy_action.clone(),
                        &[civ_name, other_civ_name],
                    );
                }
                game.get_civilization_mut(ally_civ).add_notification(
                    format!("[{civ_name}] has joined us in the war against [{other_civ_name}]!"),
                    NotificationCategory::War,
                    diplomacy_action,
                    &[civ_name, other_civ_name],
                );
            }
            _ => {
                game.get_civilization_mut(other_civ_name).add_notification(
                    format!("[{civ_name}] has declared war on us!"),
                    NotificationCategory::War,
                    diplomacy_action.clone(),
                    &[civ_name],
                );
                for third_civ in &common_known_civs {
                    game.get_civilization_mut(third_civ).add_notification(
                        format!("[{civ_name}] has declared war on [{other_civ_name}]!"),
                        NotificationCategory::War,
                        diplomacy_action.clone(),
                        &[civ_name, other_civ_name],
                    );
                }
            }
        }
    }

    /// Everything that happens to both sides equally when war is declared by one side on the other
    fn on_war_declared(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        // Cancel all trades
        let (ended_offers, had_trades) = {
            let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
            let ended_offers: Vec<String> = diplomacy_manager
                .trades
                .iter()
                .flat_map(|trade| trade.their_offers.iter())
                .filter(|offer| offer.duration > 0)
                .map(|offer| offer.name.clone())
                .collect();
            let had_trades = !diplomacy_manager.trades.is_empty();
            diplomacy_manager.trades.clear();
            (ended_offers, had_trades)
        };

        let civ = game.get_civilization_mut(civ_name);
        for offer_name in ended_offers {
            civ.add_notification(
                format!("[{offer_name}] from [{other_civ_name}] has ended"),
                NotificationCategory::Trade,
                Some(NotificationAction::DiplomacyAction {
                    other_civ: other_civ_name.to_string(),
                }),
                &[other_civ_name],
            );
        }
        civ.trade_requests
            .retain_into_new(|request| request.requesting_civ != other_civ_name);

        if had_trades {
            game.services_mut().update_stats_for_next_turn(civ_name);
            game.services_mut().update_civ_resources(civ_name);
        }

        // Must come *before* state is "at war" so units know they're not allowed in tiles without open borders anymore
        DiplomacyFunctions::update_has_open_borders(game, civ_name, other_civ_name);

        let minimum_war_duration = game.config.constants.minimum_war_duration;
        let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
        diplomacy_manager.diplomatic_status = DiplomaticStatus::War;
        diplomacy_manager.set_flag(DiplomacyFlags::DeclinedPeace, minimum_war_duration); // AI won't propose peace for 10 turns
        diplomacy_manager.set_flag(DiplomacyFlags::DeclaredWar, minimum_war_duration); // AI won't agree to trade for 10 turns
        diplomacy_manager.remove_flag(DiplomacyFlags::BorderConflict);
    }

    /// Changes opinions of the target and of everyone watching
    fn change_opinions(game: &mut GameInfo, civ_name: &str, other_civ_name: &str, declare_war_reason: &DeclareWarReason) {
        game.get_diplomacy_manager_mut(other_civ_name, civ_name)
            .add_modifier(DiplomaticModifiers::DeclaredWarOnUs, -20.0);

        if game.get_civilization(other_civ_name).is_city_state && declare_war_reason.war_type == WarType::DirectWar {
            CityStateFunctions::add_influence(game, other_civ_name, civ_name, -60.0);
        }

        // Apply warmongering
        // The target is never at war with itself, so it takes the penalty too
        for third_civ in game.get_known_civs(civ_name) {
            let amount = if game.is_at_war(&third_civ, other_civ_name) { 5.0 } else { -5.0 };
            game.get_diplomacy_manager_mut(&third_civ, civ_name)
                .add_modifier(DiplomaticModifiers::WarMongerer, amount);
        }

        // Apply shared enemy modifiers
        let common_known_civs = game
            .get_diplomacy_manager(civ_name, other_civ_name)
            .get_common_known_civs(game);
        for third_civ in common_known_civs {
            if game.is_at_war(&third_civ, other_civ_name) && !game.is_at_war(&third_civ, civ_name) {
                // Improve our relations
                Self::add_shared_enemy_bonus(game, &third_civ, civ_name);
            } else if game.is_at_war(&third_civ, civ_name) && !game.is_at_war(&third_civ, other_civ_name) {
                // Improve their relations
                Self::add_shared_enemy_bonus(game, &third_civ, other_civ_name);
            }
        }
    }

    fn add_shared_enemy_bonus(game: &mut GameInfo, third_civ_name: &str, towards_civ_name: &str) {
        if game.get_civilization(third_civ_name).is_city_state {
            CityStateFunctions::add_influence(game, third_civ_name, towards_civ_name, 10.0);
        } else {
            game.get_diplomacy_manager_mut(third_civ_name, towards_civ_name)
                .add_modifier(DiplomaticModifiers::SharedEnemy, 5.0);
        }
    }

    /// Breaks treaties between the civilizations at war
    fn break_treaties(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        let betrayed_friendship = {
            let diplomacy_manager = game.get_diplomacy_manager_mut(civ_name, other_civ_name);
            let had_flag = diplomacy_manager.has_flag(DiplomacyFlags::DeclarationOfFriendship);
            diplomacy_manager.remove_flag(DiplomacyFlags::DeclarationOfFriendship);
            had_flag
        };
        {
            let other_civ_diplomacy = game.get_diplomacy_manager_mut(other_civ_name, civ_name);
            if betrayed_friendship {
                other_civ_diplomacy.remove_modifier(DiplomaticModifiers::DeclarationOfFriendship);
            }
            other_civ_diplomacy.remove_flag(DiplomacyFlags::DeclarationOfFriendship);
        }

        if !betrayed_friendship {
            return;
        }
        debug!(civ = civ_name, other_civ = other_civ_name, "declaration of friendship betrayed");
        for known_civ in game.get_known_civs(civ_name) {
            let amount = if known_civ == other_civ_name { -40.0 } else { -20.0 };
            let diplomacy_manager = game.get_diplomacy_manager_mut(&known_civ, civ_name);
            diplomacy_manager.add_modifier(DiplomaticModifiers::BetrayedDeclarationOfFriendship, amount);
            // obviously this guy's declarations of friendship aren't worth much.
            diplomacy_manager.remove_modifier(DiplomaticModifiers::DeclaredFriendshipWithOurAllies);
        }
    }

    /// Calls in city-state allies of both sides. Only a major declarer pulls them in, and the
    /// city-states' own declarations never do, so this goes exactly one level deep.
    fn call_in_city_state_allies(game: &mut GameInfo, civ_name: &str, other_civ_name: &str) {
        if game.get_civilization(civ_name).is_city_state {
            return;
        }

        for city_state in CityStateFunctions::get_allied_city_states(game, civ_name) {
            if city_state == other_civ_name || !game.knows(&city_state, other_civ_name) {
                continue;
            }
            if !game.get_diplomacy_manager(&city_state, other_civ_name).can_declare_war(game) {
                continue;
            }
            Self::declare_war(
                game,
                &city_state,
                other_civ_name,
                DeclareWarReason::new(WarType::CityStateAllianceWar, Some(civ_name.to_string())),
            );
        }

        if game.get_civilization(other_civ_name).is_city_state {
            return;
        }
        for city_state in CityStateFunctions::get_allied_city_states(game, other_civ_name) {
            if city_state == civ_name || !game.knows(&city_state, civ_name) {
                continue;
            }
            if !game.get_diplomacy_manager(&city_state, civ_name).can_declare_war(game) {
                continue;
            }
            Self::declare_war(
                game,
                &city_state,
                civ_name,
                DeclareWarReason::new(WarType::CityStateAllianceWar, Some(other_civ_name.to_string())),
            );
        }
    }
}
