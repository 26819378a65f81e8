pub mod civilization;
pub mod diplomacy;
pub mod notification;
pub mod player_type;

pub use civilization::Civilization;
pub use notification::{Notification, NotificationAction, NotificationCategory};
pub use player_type::PlayerType;
