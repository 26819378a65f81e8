use serde::{Deserialize, Serialize};

use crate::trade::trade_offer::TradeOffer;
use crate::trade::trade_offers_list::TradeOffersList;

/// A trade between two civilizations, as seen from one of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// The offers made by the other civilization
    pub their_offers: TradeOffersList,
    /// The offers made by our civilization
    pub our_offers: TradeOffersList,
}

impl Trade {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same trade as seen from the other side
    pub fn reverse(&self) -> Self {
        Self {
            their_offers: self.our_offers.clone(),
            our_offers: self.their_offers.clone(),
        }
    }

    /// Same offers on both sides, ignoring remaining durations
    pub fn equal_trade(&self, trade: &Trade) -> bool {
        if trade.our_offers.len() != self.our_offers.len() || trade.their_offers.len() != self.their_offers.len() {
            return false;
        }
        trade.our_offers.iter().all(|offer| self.our_offers.iter().any(|o| o.equals(offer)))
            && trade.their_offers.iter().all(|offer| self.their_offers.iter().any(|o| o.equals(offer)))
    }

    /// Every offer on both sides, ours first
    pub fn all_offers(&self) -> impl Iterator<Item = &TradeOffer> {
        self.our_offers.iter().chain(self.their_offers.iter())
    }

    /// True once nothing in the trade has turns left
    pub fn is_expired(&self) -> bool {
        self.all_offers().all(|o| o.duration <= 0)
    }

    pub fn mentions_civ(&self, civ_name: &str) -> bool {
        self.all_offers()
            .any(|o| o.trade_offer_type.names_civilization() && o.name == civ_name)
    }
}

/// A trade proposed by another civilization, waiting for an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub requesting_civ: String,
    /// The trade from the requesting civ's point of view
    pub trade: Trade,
}

impl TradeRequest {
    pub fn new(requesting_civ: impl Into<String>, trade: Trade) -> Self {
        Self {
            requesting_civ: requesting_civ.into(),
            trade,
        }
    }
}
