use std::fmt;

use serde::{Deserialize, Serialize};

/// Named countdowns kept on a diplomacy edge.
///
/// Persisted by variant name, never by position, so kinds can be added or retired
/// between versions (see `serializers::migrations`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiplomacyFlags {
    /// AI won't propose peace
    DeclinedPeace,
    /// AI won't agree to trade
    DeclaredWar,
    DeclarationOfFriendship,
    Denunciation,
    BorderConflict,
    /// They promised not to settle near us; pays off when it runs out
    AgreedToNotSettleNearUs,
    /// They refused to stop settling near us
    IgnoreThemSettlingNearUs,
    /// A city-state owes us a military unit when this reaches zero
    ProvideMilitaryUnit,
    /// They cut a resource trade short, so no per-turn trades for a while
    ResourceTradesCutShort,
}

impl DiplomacyFlags {
    pub const ALL: [DiplomacyFlags; 9] = [
        DiplomacyFlags::DeclinedPeace,
        DiplomacyFlags::DeclaredWar,
        DiplomacyFlags::DeclarationOfFriendship,
        DiplomacyFlags::Denunciation,
        DiplomacyFlags::BorderConflict,
        DiplomacyFlags::AgreedToNotSettleNearUs,
        DiplomacyFlags::IgnoreThemSettlingNearUs,
        DiplomacyFlags::ProvideMilitaryUnit,
        DiplomacyFlags::ResourceTradesCutShort,
    ];

    /// Stable save-file key
    pub fn as_str(&self) -> &'static str {
        match self {
            DiplomacyFlags::DeclinedPeace => "DeclinedPeace",
            DiplomacyFlags::DeclaredWar => "DeclaredWar",
            DiplomacyFlags::DeclarationOfFriendship => "DeclarationOfFriendship",
            DiplomacyFlags::Denunciation => "Denunciation",
            DiplomacyFlags::BorderConflict => "BorderConflict",
            DiplomacyFlags::AgreedToNotSettleNearUs => "AgreedToNotSettleNearUs",
            DiplomacyFlags::IgnoreThemSettlingNearUs => "IgnoreThemSettlingNearUs",
            DiplomacyFlags::ProvideMilitaryUnit => "ProvideMilitaryUnit",
            DiplomacyFlags::ResourceTradesCutShort => "ResourceTradesCutShort",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|flag| flag.as_str() == name)
    }
}

impl fmt::Display for DiplomacyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for flag in DiplomacyFlags::ALL {
            assert_eq!(DiplomacyFlags::from_name(flag.as_str()), Some(flag));
        }
        assert_eq!(DiplomacyFlags::from_name("ResearchAgreement"), None);
    }

    #[test]
    fn test_serde_uses_the_stable_name() {
        let json = serde_json::to_string(&DiplomacyFlags::ProvideMilitaryUnit).unwrap();
        assert_eq!(json, "\"ProvideMilitaryUnit\"");
    }
}
