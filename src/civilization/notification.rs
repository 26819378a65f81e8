use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Category - grouping of notifications, within a category the most recent one is shown on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotificationCategory {
    #[default]
    General,
    Trade,
    Diplomacy,
    Units,
    War,
}

/// What a client should focus when the notification is activated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationAction {
    LocationAction { location: Position },
    DiplomacyAction { other_civ: String },
}

/// A message for one civilization's player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    category: NotificationCategory,

    /// The notification text, untranslated. Bracketed parts are placeholders.
    text: String,

    /// Icons to be shown, usually civ names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    icons: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<NotificationAction>,
}

impl Notification {
    pub fn new(
        text: impl Into<String>,
        notification_icons: &[&str],
        action: Option<NotificationAction>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            category,
            text: text.into(),
            icons: notification_icons.iter().map(|icon| icon.to_string()).collect(),
            action,
        }
    }

    pub fn category(&self) -> NotificationCategory {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn icons(&self) -> &[String] {
        &self.icons
    }

    pub fn action(&self) -> Option<&NotificationAction> {
        self.action.as_ref()
    }
}
