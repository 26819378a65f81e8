use serde::{Deserialize, Serialize};

/// One line of a resource ledger: how much of a resource comes from (or goes to) a given origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSupply {
    pub resource: String,
    pub origin: String,
    pub amount: i32,
}

/// Resource amounts grouped by resource and origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSupplyList {
    supplies: Vec<ResourceSupply>,
}

impl ResourceSupplyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the line for `resource` from `origin`, dropping the line if it nets to zero
    pub fn add(&mut self, resource: &str, origin: &str, amount: i32) {
        if let Some(existing) = self
            .supplies
            .iter_mut()
            .find(|s| s.resource == resource && s.origin == origin)
        {
            existing.amount += amount;
            if existing.amount == 0 {
                self.supplies.retain(|s| s.resource != resource || s.origin != origin);
            }
        } else if amount != 0 {
            self.supplies.push(ResourceSupply {
                resource: resource.to_string(),
                origin: origin.to_string(),
                amount,
            });
        }
    }

    pub fn add_all(&mut self, other: &ResourceSupplyList) {
        for supply in &other.supplies {
            self.add(&supply.resource, &supply.origin, supply.amount);
        }
    }

    /// Net amount of a resource over all origins
    pub fn amount_of(&self, resource: &str) -> i32 {
        self.supplies
            .iter()
            .filter(|s| s.resource == resource)
            .map(|s| s.amount)
            .sum()
    }

    /// Names of resources whose net amount is below zero
    pub fn negative_resources(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for supply in &self.supplies {
            if !names.contains(&supply.resource) && self.amount_of(&supply.resource) < 0 {
                names.push(supply.resource.clone());
            }
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.supplies.is_empty()
    }
}
