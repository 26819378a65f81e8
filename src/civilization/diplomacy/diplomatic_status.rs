use serde::{Deserialize, Serialize};

/// Represents the diplomatic status between two civilizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiplomaticStatus {
    #[default]
    Peace,
    War,
}
