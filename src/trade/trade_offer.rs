use serde::{Deserialize, Serialize};

use crate::config::Speed;
use crate::constants::Constants;

/// Enum that classifies Trade Types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeOfferType {
    Gold,
    GoldPerTurn,
    /// Treaties are shared by both sides - like peace treaty
    Treaty,
    /// Agreements are one-sided, like open borders
    Agreement,
    LuxuryResource,
    StrategicResource,
    /// Introduction to another civilization
    Introduction,
    /// Declaration of war on another civilization
    WarDeclaration,
}

impl TradeOfferType {
    /// Trade is a one-time effect without duration
    pub fn is_immediate(&self) -> bool {
        matches!(
            self,
            TradeOfferType::Gold | TradeOfferType::Introduction
                | TradeOfferType::WarDeclaration
        )
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, TradeOfferType::LuxuryResource | TradeOfferType::StrategicResource)
    }

    /// Offers whose name is another civilization
    pub fn names_civilization(&self) -> bool {
        matches!(self, TradeOfferType::Introduction | TradeOfferType::WarDeclaration)
    }
}

/// Represents a single offer in a trade between civilizations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TradeOffer {
    /// The name of the offer (resource name, treaty name, civ name...)
    pub name: String,
    pub trade_offer_type: TradeOfferType,
    pub amount: i32,
    /// Turns left; 0 for offers without duration, -1 for immediate ones
    pub duration: i32,
}

impl TradeOffer {
    /// Create a new trade offer, taking its duration from the game speed
    pub fn new(name: impl Into<String>, trade_offer_type: TradeOfferType, amount: i32, speed: &Speed) -> Self {
        let name = name.into();
        let duration = if trade_offer_type.is_immediate() {
            -1
        } else if name == Constants::PEACE_TREATY {
            speed.peace_deal_duration
        } else {
            speed.deal_duration
        };
        Self::with_duration(name, trade_offer_type, amount, duration)
    }

    pub fn with_duration(name: impl Into<String>, trade_offer_type: TradeOfferType, amount: i32, duration: i32) -> Self {
        Self {
            name: name.into(),
            trade_offer_type,
            amount,
            duration,
        }
    }

    /// Same offer, ignoring how long is left on it
    pub fn equals(&self, offer: &TradeOffer) -> bool {
        offer.name == self.name && offer.trade_offer_type == self.trade_offer_type && offer.amount == self.amount
    }

    pub fn is_peace_treaty(&self) -> bool {
        self.trade_offer_type == TradeOfferType::Treaty && self.name == Constants::PEACE_TREATY
    }

    pub fn is_open_borders(&self) -> bool {
        self.trade_offer_type == TradeOfferType::Agreement && self.name == Constants::OPEN_BORDERS
    }
}

impl PartialEq for TradeOffer {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for TradeOffer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_follows_speed() {
        let speed = Speed::default();
        let peace = TradeOffer::new(Constants::PEACE_TREATY, TradeOfferType::Treaty, 1, &speed);
        let iron = TradeOffer::new("Iron", TradeOfferType::StrategicResource, 2, &speed);
        let gold = TradeOffer::new("Gold", TradeOfferType::Gold, 100, &speed);
        assert_eq!(peace.duration, speed.peace_deal_duration);
        assert_eq!(iron.duration, speed.deal_duration);
        assert_eq!(gold.duration, -1);
    }

    #[test]
    fn test_equality_ignores_duration() {
        let a = TradeOffer::with_duration("Silk", TradeOfferType::LuxuryResource, 1, 5);
        let b = TradeOffer::with_duration("Silk", TradeOfferType::LuxuryResource, 1, 25);
        assert_eq!(a, b);
    }
}
