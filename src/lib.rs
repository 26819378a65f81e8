//! Bilateral diplomacy between the civilizations of an Unciv-style game: relationship
//! edges, war and peace cascades, trades, city-state influence and the per-turn upkeep
//! of all of it.

pub mod civilization;
pub mod config;
pub mod constants;
pub mod error;
pub mod game_info;
pub mod headless;
pub mod models;
pub mod serializers;
pub mod trade;

pub use error::{DiplomacyError, Result};
pub use game_info::{GameInfo, GameServices};
