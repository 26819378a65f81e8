use serde::{Deserialize, Serialize};

use crate::trade::trade_offer::TradeOffer;

/// A list of trade offers that merges equivalent offers on insertion
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeOffersList {
    offers: Vec<TradeOffer>,
}

impl TradeOffersList {
    pub fn new() -> Self {
        Self { offers: Vec::new() }
    }

    /// Add an offer to the list
    ///
    /// If an equivalent offer (same name and type) already exists, the amounts are combined.
    /// If the combined amount is zero, the offer is removed.
    pub fn add(&mut self, element: TradeOffer) {
        if let Some(equivalent_offer) = self
            .offers
            .iter_mut()
            .find(|it| it.name == element.name && it.trade_offer_type == element.trade_offer_type)
        {
            equivalent_offer.amount += element.amount;
            if equivalent_offer.amount == 0 {
                self.offers
                    .retain(|it| it.name != element.name || it.trade_offer_type != element.trade_offer_type);
            }
        } else {
            self.offers.push(element);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeOffer> {
        self.offers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TradeOffer> {
        self.offers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

impl<'a> IntoIterator for &'a TradeOffersList {
    type Item = &'a TradeOffer;
    type IntoIter = std::slice::Iter<'a, TradeOffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.offers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::TradeOfferType;

    #[test]
    fn test_equivalent_offers_merge_and_cancel() {
        let mut list = TradeOffersList::new();
        list.add(TradeOffer::with_duration("Gold", TradeOfferType::GoldPerTurn, 5, 30));
        list.add(TradeOffer::with_duration("Gold", TradeOfferType::GoldPerTurn, 3, 30));
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next().map(|o| o.amount), Some(8));

        list.add(TradeOffer::with_duration("Gold", TradeOfferType::GoldPerTurn, -8, 30));
        assert!(list.is_empty());
    }
}
