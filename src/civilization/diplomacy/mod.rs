pub mod city_state_functions;
pub mod city_state_personality;
pub mod declare_war;
pub mod diplomacy_flags;
pub mod diplomacy_functions;
pub mod diplomacy_manager;
pub mod diplomacy_turn_manager;
pub mod diplomatic_modifiers;
pub mod diplomatic_status;
pub mod relationship_level;

pub use city_state_functions::CityStateFunctions;
pub use city_state_personality::{CityStatePersonality, CityStateType};
pub use declare_war::{DeclareWar, DeclareWarReason, WarType};
pub use diplomacy_flags::DiplomacyFlags;
pub use diplomacy_functions::DiplomacyFunctions;
pub use diplomacy_manager::DiplomacyManager;
pub use diplomacy_turn_manager::DiplomacyTurnManager;
pub use diplomatic_modifiers::DiplomaticModifiers;
pub use diplomatic_status::DiplomaticStatus;
pub use relationship_level::RelationshipLevel;
