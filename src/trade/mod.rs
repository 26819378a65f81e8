pub mod trade;
pub mod trade_logic;
pub mod trade_offer;
pub mod trade_offers_list;

pub use trade::{Trade, TradeRequest};
pub use trade_logic::TradeLogic;
pub use trade_offer::{TradeOffer, TradeOfferType};
pub use trade_offers_list::TradeOffersList;
