use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use unciv_diplomacy::civilization::diplomacy::{
    CityStateFunctions, CityStatePersonality, CityStateType, DeclareWar, DeclareWarReason, DiplomacyFunctions,
};
use unciv_diplomacy::civilization::{Civilization, PlayerType};
use unciv_diplomacy::config::GameConfig;
use unciv_diplomacy::constants::Constants;
use unciv_diplomacy::headless::HeadlessServices;
use unciv_diplomacy::models::{City, MapUnit};
use unciv_diplomacy::serializers;
use unciv_diplomacy::trade::{TradeLogic, TradeOffer, TradeOfferType};
use unciv_diplomacy::GameInfo;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with game constants and speed; defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of turns to simulate
    #[arg(short, long, default_value_t = 40)]
    turns: u32,
    /// Write the final game state to this file
    #[arg(short, long)]
    save: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    info!("Starting headless diplomacy simulation");
    let mut game = setup_game(config);

    for turn in 0..args.turns {
        script(&mut game, turn);
        game.next_turn();
    }

    for civ in &game.civilizations {
        for (other_name, diplomacy_manager) in &civ.diplomacy {
            info!(
                civ = %civ.civ_name,
                other_civ = %other_name,
                status = ?diplomacy_manager.diplomatic_status,
                level = %diplomacy_manager.relationship_level(&game),
                opinion = diplomacy_manager.opinion_of_other_civ(),
                "final relationship"
            );
        }
        info!(civ = %civ.civ_name, gold = civ.gold, notifications = civ.notifications.len(), "final treasury");
    }

    if let Some(path) = &args.save {
        serializers::save_game_to_file(&game, path)?;
    }
    Ok(())
}

fn setup_game(config: GameConfig) -> GameInfo {
    let services = HeadlessServices::new()
        .with_map_size(40, 20)
        .with_territory("Rome", (0, 0), (9, 9))
        .with_territory("Greece", (10, 0), (19, 9))
        .with_territory("Egypt", (0, 10), (9, 19))
        .with_territory("Sparta", (20, 0), (24, 4))
        .with_resource("Rome", "Iron", 2)
        .with_resource("Greece", "Silk", 1)
        .with_gift_unit("Hoplite");
    let mut game = GameInfo::new(config, Box::new(services));

    let mut rome = Civilization::new("Rome", PlayerType::AI);
    rome.add_city(City::new("Roma", (4, 4)));
    rome.add_units([MapUnit::new(1, "Legion", true, (12, 2))]);
    let mut greece = Civilization::new("Greece", PlayerType::AI);
    greece.add_city(City::new("Athens", (14, 4)));
    let mut egypt = Civilization::new("Egypt", PlayerType::Human);
    egypt.add_city(City::new("Thebes", (4, 14)));
    let mut sparta =
        Civilization::new_city_state("Sparta", CityStateType::Militaristic, CityStatePersonality::Hostile);
    sparta.add_city(City::new("Sparta", (22, 2)));

    for civ in [rome, greece, egypt, sparta] {
        game.add_civilization(civ);
    }
    for (civ, other) in [("Rome", "Greece"), ("Rome", "Egypt"), ("Greece", "Egypt"), ("Sparta", "Rome"), ("Sparta", "Greece")] {
        DiplomacyFunctions::make_civilizations_meet(&mut game, civ, other, false);
    }
    game
}

/// Scripted moves, keyed by turn
fn script(game: &mut GameInfo, turn: u32) {
    match turn {
        0 => {
            let speed = game.config.speed.clone();
            let mut trade_logic = TradeLogic::new("Rome", "Greece");
            trade_logic.current_trade.our_offers.add(TradeOffer::new("Iron", TradeOfferType::StrategicResource, 1, &speed));
            trade_logic.current_trade.their_offers.add(TradeOffer::new(Constants::OPEN_BORDERS, TradeOfferType::Agreement, 1, &speed));
            trade_logic.current_trade.their_offers.add(TradeOffer::new("Gold", TradeOfferType::GoldPerTurn, 3, &speed));
            trade_logic.accept_trade(game);
            CityStateFunctions::set_influence(game, "Sparta", "Rome", 100.0);
        }
        2 => DiplomacyFunctions::sign_declaration_of_friendship(game, "Rome", "Egypt"),
        5 => DiplomacyFunctions::refuse_demand_not_to_settle_near(game, "Greece", "Rome"),
        10 => DeclareWar::declare_war(game, "Rome", "Greece", DeclareWarReason::direct()),
        22 => DiplomacyFunctions::sign_peace_treaty(game, "Rome", "Greece"),
        30 => DiplomacyFunctions::denounce(game, "Egypt", "Greece"),
        _ => {}
    }
}
