pub mod migrations;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::civilization::Civilization;
use crate::config::GameConfig;
use crate::error::{DiplomacyError, Result};
use crate::game_info::{GameInfo, GameServices};

/// Bumped whenever the save layout changes in a way older builds cannot read
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SaveGameRef<'a> {
    version: u32,
    turns: u32,
    config: &'a GameConfig,
    civilizations: &'a [Civilization],
}

#[derive(Deserialize)]
struct SaveHeader {
    #[serde(default)]
    version: u32,
}

#[derive(Deserialize)]
struct SaveGame {
    turns: u32,
    #[serde(default)]
    config: GameConfig,
    civilizations: Vec<Civilization>,
}

pub fn save_game(game: &GameInfo) -> Result<String> {
    let save = SaveGameRef {
        version: SAVE_VERSION,
        turns: game.turns,
        config: &game.config,
        civilizations: &game.civilizations,
    };
    Ok(serde_json::to_string_pretty(&save)?)
}

/// Rebuilds a game from its JSON save, plugging in `services` for the map side
pub fn load_game(json: &str, services: Box<dyn GameServices>) -> Result<GameInfo> {
    let header: SaveHeader = serde_json::from_str(json)?;
    if header.version > SAVE_VERSION {
        return Err(DiplomacyError::UnsupportedSaveVersion {
            found: header.version,
            supported: SAVE_VERSION,
        });
    }
    let save: SaveGame = serde_json::from_str(json)?;
    save.config.validate()?;
    debug!(version = header.version, turns = save.turns, civs = save.civilizations.len(), "game loaded");
    Ok(GameInfo::from_parts(save.civilizations, save.config, save.turns, services))
}

pub fn save_game_to_file(game: &GameInfo, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, save_game(game)?)?;
    info!(path = %path.display(), turn = game.turns, "game saved");
    Ok(())
}

pub fn load_game_from_file(path: impl AsRef<Path>, services: Box<dyn GameServices>) -> Result<GameInfo> {
    let text = fs::read_to_string(path)?;
    load_game(&text, services)
}
