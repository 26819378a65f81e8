mod common;

use common::{add_city_state, add_major, game_with, meet, meet_all, notifications_containing};
use unciv_diplomacy::civilization::diplomacy::{
    CityStateFunctions, CityStateType, DeclareWar, DeclareWarReason, DiplomacyFlags, DiplomacyFunctions,
    DiplomaticModifiers, RelationshipLevel,
};
use unciv_diplomacy::civilization::{Civilization, PlayerType};
use unciv_diplomacy::headless::HeadlessServices;
use unciv_diplomacy::models::MapUnit;
use unciv_diplomacy::trade::{Trade, TradeLogic, TradeOffer, TradeOfferType, TradeRequest};
use unciv_diplomacy::GameInfo;

fn three_majors() -> GameInfo {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_major(&mut game, "Egypt", PlayerType::AI);
    meet_all(&mut game);
    game
}

#[test]
fn test_allied_city_state_joins_war() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::Human);
    add_city_state(&mut game, "Sparta", CityStateType::Militaristic);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 65.0);
    assert_eq!(game.get_civilization("Sparta").ally_civ.as_deref(), Some("Rome"));

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());

    assert!(game.is_at_war("Rome", "Greece"));
    assert!(game.is_at_war("Sparta", "Greece"));
    assert!(game.is_at_war("Greece", "Sparta"));
    assert!(game.asymmetric_pairs().is_empty());
    assert_eq!(notifications_containing(&game, "Greece", "[Rome] has declared war on us!"), 1);
    assert_eq!(
        notifications_containing(&game, "Greece", "[Sparta] has joined [Rome] in the war against us!"),
        1
    );
    // Joining through the alliance costs nothing with the target
    assert_eq!(game.get_diplomacy_manager("Sparta", "Greece").get_influence(), 0.0);
}

#[test]
fn test_unallied_city_state_stays_out() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_city_state(&mut game, "Sparta", CityStateType::Maritime);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 59.0);

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());
    assert!(!game.is_at_war("Sparta", "Greece"));
}

#[test]
fn test_target_allied_city_state_joins_war() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_city_state(&mut game, "Corinth", CityStateType::Militaristic);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Corinth", "Greece", 65.0);
    assert_eq!(game.get_civilization("Corinth").ally_civ.as_deref(), Some("Greece"));

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());

    assert!(game.is_at_war("Corinth", "Rome"));
    assert!(game.is_at_war("Rome", "Corinth"));
    assert!(game.asymmetric_pairs().is_empty());
    assert_eq!(game.get_civilization("Corinth").ally_civ.as_deref(), Some("Greece"));
}

#[test]
fn test_alliance_wars_stop_after_one_hop() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_city_state(&mut game, "Sparta", CityStateType::Militaristic);
    add_city_state(&mut game, "Corinth", CityStateType::Maritime);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 65.0);
    CityStateFunctions::set_influence(&mut game, "Corinth", "Greece", 65.0);

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());

    assert!(game.is_at_war("Sparta", "Greece"));
    assert!(game.is_at_war("Corinth", "Rome"));
    // The two allies each joined a war, but never one against each other
    assert!(!game.is_at_war("Corinth", "Sparta"));
    assert!(!game.is_at_war("Sparta", "Corinth"));
    assert!(game.asymmetric_pairs().is_empty());
}

#[test]
fn test_humans_stay_neutral_towards_each_other() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::Human);
    add_major(&mut game, "Greece", PlayerType::Human);
    meet(&mut game, "Rome", "Greece");
    game.get_diplomacy_manager_mut("Rome", "Greece")
        .add_modifier(DiplomaticModifiers::WarMongerer, -90.0);
    game.get_diplomacy_manager_mut("Greece", "Rome")
        .add_modifier(DiplomaticModifiers::YearsOfPeace, 85.0);

    assert_eq!(
        game.get_diplomacy_manager("Rome", "Greece").relationship_level(&game),
        RelationshipLevel::Neutral
    );
    assert_eq!(
        game.get_diplomacy_manager("Greece", "Rome").relationship_level(&game),
        RelationshipLevel::Neutral
    );
}

#[test]
fn test_human_side_mirrors_the_ai_view() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::Human);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_major(&mut game, "Egypt", PlayerType::AI);
    meet_all(&mut game);
    game.get_diplomacy_manager_mut("Greece", "Rome")
        .add_modifier(DiplomaticModifiers::WarMongerer, -50.0);
    // The human's own modifiers play no part
    game.get_diplomacy_manager_mut("Rome", "Greece")
        .add_modifier(DiplomaticModifiers::YearsOfPeace, 90.0);
    game.get_diplomacy_manager_mut("Rome", "Egypt")
        .add_modifier(DiplomaticModifiers::WarMongerer, -90.0);

    assert_eq!(
        game.get_diplomacy_manager("Greece", "Rome").relationship_level(&game),
        RelationshipLevel::Enemy
    );
    assert_eq!(
        game.get_diplomacy_manager("Rome", "Greece").relationship_level(&game),
        RelationshipLevel::Enemy
    );
    assert_eq!(
        game.get_diplomacy_manager("Rome", "Egypt").relationship_level(&game),
        RelationshipLevel::Neutral
    );
}

#[test]
fn test_declaration_of_friendship_is_symmetric() {
    let mut game = three_majors();
    game.get_diplomacy_manager_mut("Egypt", "Greece")
        .add_modifier(DiplomaticModifiers::YearsOfPeace, 85.0);
    assert_eq!(
        game.get_diplomacy_manager("Egypt", "Greece").relationship_level(&game),
        RelationshipLevel::Ally
    );

    DiplomacyFunctions::sign_declaration_of_friendship(&mut game, "Rome", "Greece");

    for (civ, other) in [("Rome", "Greece"), ("Greece", "Rome")] {
        let edge = game.get_diplomacy_manager(civ, other);
        assert_eq!(edge.get_modifier(DiplomaticModifiers::DeclarationOfFriendship), 35.0);
        assert_eq!(edge.get_flag(DiplomacyFlags::DeclarationOfFriendship), Some(30));
    }
    assert_eq!(
        game.get_diplomacy_manager("Egypt", "Rome")
            .get_modifier(DiplomaticModifiers::DeclaredFriendshipWithOurAllies),
        15.0
    );
    assert!(!DiplomacyFunctions::can_sign_declaration_of_friendship_with(&game, "Rome", "Greece"));
}

#[test]
fn test_war_betrays_friendship() {
    let mut game = three_majors();
    DiplomacyFunctions::sign_declaration_of_friendship(&mut game, "Rome", "Greece");

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());

    assert!(!game.get_diplomacy_manager("Rome", "Greece").has_flag(DiplomacyFlags::DeclarationOfFriendship));
    let greece_on_rome = game.get_diplomacy_manager("Greece", "Rome");
    assert!(!greece_on_rome.has_flag(DiplomacyFlags::DeclarationOfFriendship));
    assert!(!greece_on_rome.has_modifier(DiplomaticModifiers::DeclarationOfFriendship));
    assert_eq!(greece_on_rome.get_modifier(DiplomaticModifiers::BetrayedDeclarationOfFriendship), -40.0);
    assert_eq!(greece_on_rome.get_modifier(DiplomaticModifiers::DeclaredWarOnUs), -20.0);
    assert_eq!(greece_on_rome.get_modifier(DiplomaticModifiers::WarMongerer), -5.0);
    assert_eq!(
        game.get_diplomacy_manager("Egypt", "Rome")
            .get_modifier(DiplomaticModifiers::BetrayedDeclarationOfFriendship),
        -20.0
    );
}

#[test]
fn test_warmongering_and_shared_enemies() {
    let mut game = three_majors();
    DeclareWar::declare_war(&mut game, "Egypt", "Greece", DeclareWarReason::direct());
    assert_eq!(
        game.get_diplomacy_manager("Rome", "Egypt").get_modifier(DiplomaticModifiers::WarMongerer),
        -5.0
    );

    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());

    let egypt_on_rome = game.get_diplomacy_manager("Egypt", "Rome");
    assert_eq!(egypt_on_rome.get_modifier(DiplomaticModifiers::WarMongerer), 5.0);
    assert_eq!(egypt_on_rome.get_modifier(DiplomaticModifiers::SharedEnemy), 5.0);
    assert!(game.get_diplomacy_manager("Rome", "Greece").has_flag(DiplomacyFlags::DeclaredWar));
    assert_eq!(
        game.get_diplomacy_manager("Greece", "Rome").get_flag(DiplomacyFlags::DeclinedPeace),
        Some(10)
    );
}

#[test]
fn test_attacking_a_city_state_costs_influence() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_city_state(&mut game, "Sparta", CityStateType::Cultured);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 20.0);

    DeclareWar::declare_war(&mut game, "Rome", "Sparta", DeclareWarReason::direct());

    let sparta_on_rome = game.get_diplomacy_manager("Sparta", "Rome");
    assert_eq!(sparta_on_rome.get_influence(), -40.0);
    assert_eq!(sparta_on_rome.relationship_level(&game), RelationshipLevel::Enemy);
}

#[test]
fn test_war_cancels_trades_and_requests() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::Human);
    add_major(&mut game, "Greece", PlayerType::AI);
    meet_all(&mut game);
    let speed = game.config.speed.clone();
    let mut logic = TradeLogic::new("Greece", "Rome");
    logic.current_trade.our_offers.add(TradeOffer::new("Gold", TradeOfferType::GoldPerTurn, 5, &speed));
    logic.accept_trade(&mut game);
    game.get_civilization_mut("Rome")
        .trade_requests
        .with_added(TradeRequest::new("Greece", Trade::new()));

    DeclareWar::declare_war(&mut game, "Greece", "Rome", DeclareWarReason::direct());

    assert!(game.get_diplomacy_manager("Rome", "Greece").trades.is_empty());
    assert!(game.get_diplomacy_manager("Greece", "Rome").trades.is_empty());
    assert!(game.get_civilization("Rome").trade_requests.is_empty());
    assert_eq!(notifications_containing(&game, "Rome", "[Gold] from [Greece] has ended"), 1);
}

#[test]
fn test_peace_treaty_evicts_units_and_blocks_war() {
    let services = HeadlessServices::new()
        .with_map_size(40, 20)
        .with_territory("Greece", (10, 0), (19, 9));
    let mut game = game_with(services);
    add_major(&mut game, "Rome", PlayerType::Human);
    add_major(&mut game, "Greece", PlayerType::AI);
    meet_all(&mut game);
    game.get_civilization_mut("Rome")
        .add_units([MapUnit::new(7, "Legion", true, (12, 2))]);
    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());
    assert!(game.can_enter("Rome", (12, 2)));

    DiplomacyFunctions::sign_peace_treaty(&mut game, "Rome", "Greece");

    assert!(!game.is_at_war("Rome", "Greece"));
    assert!(!game.is_at_war("Greece", "Rome"));
    assert_eq!(game.get_diplomacy_manager("Rome", "Greece").turns_to_peace_treaty(), 10);
    assert_eq!(game.get_diplomacy_manager("Greece", "Rome").turns_to_peace_treaty(), 10);
    let legion = &game.get_civilization("Rome").units[0];
    assert_eq!(legion.id, 7);
    assert_ne!(game.services().tile_owner(legion.position).as_deref(), Some("Greece"));
    assert!(!game.get_diplomacy_manager("Rome", "Greece").can_declare_war(&game));
}

#[test]
#[should_panic(expected = "during a peace treaty")]
fn test_declaring_war_under_treaty_panics() {
    let mut game = three_majors();
    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());
    DiplomacyFunctions::sign_peace_treaty(&mut game, "Rome", "Greece");
    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());
}

#[test]
fn test_peace_brings_allied_city_states_along() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_city_state(&mut game, "Sparta", CityStateType::Militaristic);
    add_city_state(&mut game, "Corinth", CityStateType::Mercantile);
    meet_all(&mut game);
    CityStateFunctions::set_influence(&mut game, "Sparta", "Rome", 65.0);
    DeclareWar::declare_war(&mut game, "Rome", "Greece", DeclareWarReason::direct());
    DeclareWar::declare_war(&mut game, "Corinth", "Greece", DeclareWarReason::direct());
    assert!(game.is_at_war("Sparta", "Greece"));

    DiplomacyFunctions::sign_peace_treaty(&mut game, "Rome", "Greece");

    assert!(!game.is_at_war("Sparta", "Greece"));
    assert_eq!(game.get_diplomacy_manager("Sparta", "Greece").turns_to_peace_treaty(), 10);
    assert!(game.is_at_war("Corinth", "Greece"));
    assert_eq!(game.get_diplomacy_manager("Corinth", "Rome").get_influence(), -10.0);
    assert!(game.asymmetric_pairs().is_empty());
}

#[test]
fn test_city_state_gifts_gold_on_first_contact() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::Human);
    add_major(&mut game, "Greece", PlayerType::Human);
    add_city_state(&mut game, "Sparta", CityStateType::Religious);
    add_city_state(&mut game, "Corinth", CityStateType::Cultured);

    meet(&mut game, "Sparta", "Rome");
    meet(&mut game, "Greece", "Sparta");
    meet(&mut game, "Sparta", "Rome");

    assert_eq!(game.get_civilization("Rome").gold, 30);
    assert_eq!(game.get_civilization("Greece").gold, 15);
    assert_eq!(notifications_containing(&game, "Rome", "first major civ to meet them"), 1);
    assert_eq!(notifications_containing(&game, "Rome", "We have encountered [Sparta]!"), 1);

    DiplomacyFunctions::make_civilizations_meet(&mut game, "Rome", "Corinth", true);
    assert!(game.is_at_war("Rome", "Corinth"));
    assert_eq!(game.get_civilization("Rome").gold, 30);
    assert_eq!(game.get_diplomacy_manager("Corinth", "Rome").get_influence(), -60.0);
}

#[test]
#[should_panic(expected = "Barbarians do not take part in diplomacy")]
fn test_barbarians_cannot_be_met() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    game.add_civilization(Civilization::new_barbarians());
    meet(&mut game, "Rome", "Barbarians");
}

#[test]
fn test_denunciation_and_its_audience() {
    let mut game = three_majors();
    game.get_diplomacy_manager_mut("Egypt", "Greece")
        .add_modifier(DiplomaticModifiers::WarMongerer, -50.0);

    DiplomacyFunctions::denounce(&mut game, "Rome", "Greece");

    for (civ, other) in [("Rome", "Greece"), ("Greece", "Rome")] {
        let edge = game.get_diplomacy_manager(civ, other);
        assert_eq!(edge.get_modifier(DiplomaticModifiers::Denunciation), -35.0);
        assert_eq!(edge.get_flag(DiplomacyFlags::Denunciation), Some(30));
    }
    assert_eq!(
        game.get_diplomacy_manager("Egypt", "Rome").get_modifier(DiplomaticModifiers::DenouncedOurEnemies),
        5.0
    );
    assert!(!DiplomacyFunctions::can_sign_declaration_of_friendship_with(&game, "Rome", "Greece"));
}

#[test]
fn test_settling_demands() {
    let mut game = three_majors();

    DiplomacyFunctions::agree_not_to_settle_near(&mut game, "Greece", "Rome");
    assert_eq!(
        game.get_diplomacy_manager("Rome", "Greece").get_flag(DiplomacyFlags::AgreedToNotSettleNearUs),
        Some(100)
    );
    assert_eq!(
        game.get_diplomacy_manager("Greece", "Rome").get_modifier(DiplomaticModifiers::UnacceptableDemands),
        -10.0
    );

    DiplomacyFunctions::refuse_demand_not_to_settle_near(&mut game, "Egypt", "Rome");
    assert_eq!(
        game.get_diplomacy_manager("Egypt", "Rome").get_modifier(DiplomaticModifiers::UnacceptableDemands),
        -20.0
    );
    let rome_on_egypt = game.get_diplomacy_manager("Rome", "Egypt");
    assert_eq!(rome_on_egypt.get_flag(DiplomacyFlags::IgnoreThemSettlingNearUs), Some(100));
    assert_eq!(
        rome_on_egypt.get_modifier(DiplomaticModifiers::RefusedToNotSettleCitiesNearUs),
        -15.0
    );
}

#[test]
fn test_traded_introduction_and_war_declaration() {
    let mut game = game_with(HeadlessServices::new());
    add_major(&mut game, "Rome", PlayerType::AI);
    add_major(&mut game, "Greece", PlayerType::AI);
    add_major(&mut game, "Egypt", PlayerType::AI);
    meet(&mut game, "Rome", "Greece");
    meet(&mut game, "Greece", "Egypt");
    let speed = game.config.speed.clone();

    let mut introduction = TradeLogic::new("Rome", "Greece");
    introduction
        .current_trade
        .their_offers
        .add(TradeOffer::new("Egypt", TradeOfferType::Introduction, 1, &speed));
    introduction.accept_trade(&mut game);
    assert!(game.knows("Rome", "Egypt"));
    assert!(game.knows("Egypt", "Rome"));
    assert!(game.get_diplomacy_manager("Rome", "Greece").trades.is_empty());

    let mut war_pact = TradeLogic::new("Rome", "Greece");
    war_pact
        .current_trade
        .our_offers
        .add(TradeOffer::new("Egypt", TradeOfferType::WarDeclaration, 1, &speed));
    war_pact.accept_trade(&mut game);
    assert!(game.is_at_war("Rome", "Egypt"));
    assert!(!game.is_at_war("Greece", "Egypt"));
}
