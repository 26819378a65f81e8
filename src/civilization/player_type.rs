use serde::{Deserialize, Serialize};

/// Who makes the decisions for a civilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerType {
    #[default]
    AI,
    /// Receives notifications and makes its own diplomatic choices
    Human,
}
