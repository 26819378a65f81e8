//! Keys of flags and modifiers that older saves may still carry.
//!
//! Saves store both maps keyed by variant name. When a kind is renamed the old key is listed
//! here with its replacement; kinds that were retired are listed so they load silently.
//! Any other unknown key is dropped with a warning.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::civilization::diplomacy::{DiplomacyFlags, DiplomaticModifiers};

pub const RENAMED_FLAGS: &[(&str, DiplomacyFlags)] = &[
    ("AgreedToNotSettleNear", DiplomacyFlags::AgreedToNotSettleNearUs),
    ("IgnoreThemSettlingNear", DiplomacyFlags::IgnoreThemSettlingNearUs),
];

pub const REMOVED_FLAGS: &[&str] = &[
    "DefensivePact",
    "ResearchAgreement",
    "GaveGift",
    "AgreedToNotSendMissionaries",
    "IgnoreThemSendingMissionaries",
];

pub const RENAMED_MODIFIERS: &[(&str, DiplomaticModifiers)] = &[
    ("Warmonger", DiplomaticModifiers::WarMongerer),
    (
        "FulfilledPromiseToNotSettleCities",
        DiplomaticModifiers::FulfilledPromiseToNotSettleCitiesNearUs,
    ),
];

pub const REMOVED_MODIFIERS: &[&str] = &[
    "DefensivePact",
    "SignedDefensivePactWithOurAllies",
    "BetrayedDefensivePact",
    "ResearchAgreement",
    "GaveUsGifts",
    "BetrayedPromiseToNotSpreadReligionToUs",
    "RefusedToNotSpreadReligionToUs",
    "FulfilledPromiseToNotSpreadReligion",
];

pub fn migrate_flag(key: &str) -> Option<DiplomacyFlags> {
    if let Some(flag) = DiplomacyFlags::from_name(key) {
        return Some(flag);
    }
    if let Some((_, flag)) = RENAMED_FLAGS.iter().find(|(old, _)| *old == key) {
        return Some(*flag);
    }
    if !REMOVED_FLAGS.contains(&key) {
        warn!(flag = key, "dropping unknown diplomacy flag");
    }
    None
}

pub fn migrate_modifier(key: &str) -> Option<DiplomaticModifiers> {
    if let Some(modifier) = DiplomaticModifiers::from_name(key) {
        return Some(modifier);
    }
    if let Some((_, modifier)) = RENAMED_MODIFIERS.iter().find(|(old, _)| *old == key) {
        return Some(*modifier);
    }
    if !REMOVED_MODIFIERS.contains(&key) {
        warn!(modifier = key, "dropping unknown diplomatic modifier");
    }
    None
}

/// Countdowns that already ran out are dropped, except for a pending military unit gift
pub fn deserialize_flags<'de, D>(deserializer: D) -> Result<BTreeMap<DiplomacyFlags, i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, i32>::deserialize(deserializer)?;
    let mut flags = BTreeMap::new();
    for (key, countdown) in raw {
        let Some(flag) = migrate_flag(&key) else {
            continue;
        };
        // Only the military unit gift may wait at zero; anything else would never expire
        if countdown <= 0 && flag != DiplomacyFlags::ProvideMilitaryUnit {
            warn!(flag = %key, countdown, "dropping expired diplomacy flag");
            continue;
        }
        flags.insert(flag, countdown);
    }
    Ok(flags)
}

/// Renamed modifiers that meet an existing one are summed
pub fn deserialize_modifiers<'de, D>(deserializer: D) -> Result<BTreeMap<DiplomaticModifiers, f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, f32>::deserialize(deserializer)?;
    let mut modifiers = BTreeMap::new();
    for (key, amount) in raw {
        if let Some(modifier) = migrate_modifier(&key) {
            *modifiers.entry(modifier).or_insert(0.0) += amount;
        }
    }
    modifiers.retain(|_, amount| *amount != 0.0);
    Ok(modifiers)
}
