use std::fmt;

use serde::{Deserialize, Serialize};

/// Named opinion weights one civ holds about another. Their sum is the opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiplomaticModifiers {
    // Negative
    DeclaredWarOnUs,
    WarMongerer,
    CapturedOurCities,
    DeclaredFriendshipWithOurEnemies,
    BetrayedDeclarationOfFriendship,
    Denunciation,
    DenouncedOurAllies,
    RefusedToNotSettleCitiesNearUs,
    BetrayedPromiseToNotSettleCitiesNearUs,
    UnacceptableDemands,
    StoleOurAlly,

    // Positive
    YearsOfPeace,
    SharedEnemy,
    DeclarationOfFriendship,
    DeclaredFriendshipWithOurAllies,
    DenouncedOurEnemies,
    OpenBorders,
    FulfilledPromiseToNotSettleCitiesNearUs,
}

impl DiplomaticModifiers {
    pub const ALL: [DiplomaticModifiers; 18] = [
        DiplomaticModifiers::DeclaredWarOnUs,
        DiplomaticModifiers::WarMongerer,
        DiplomaticModifiers::CapturedOurCities,
        DiplomaticModifiers::DeclaredFriendshipWithOurEnemies,
        DiplomaticModifiers::BetrayedDeclarationOfFriendship,
        DiplomaticModifiers::Denunciation,
        DiplomaticModifiers::DenouncedOurAllies,
        DiplomaticModifiers::RefusedToNotSettleCitiesNearUs,
        DiplomaticModifiers::BetrayedPromiseToNotSettleCitiesNearUs,
        DiplomaticModifiers::UnacceptableDemands,
        DiplomaticModifiers::StoleOurAlly,
        DiplomaticModifiers::YearsOfPeace,
        DiplomaticModifiers::SharedEnemy,
        DiplomaticModifiers::DeclarationOfFriendship,
        DiplomaticModifiers::DeclaredFriendshipWithOurAllies,
        DiplomaticModifiers::DenouncedOurEnemies,
        DiplomaticModifiers::OpenBorders,
        DiplomaticModifiers::FulfilledPromiseToNotSettleCitiesNearUs,
    ];

    /// Stable save-file key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeclaredWarOnUs => "DeclaredWarOnUs",
            Self::WarMongerer => "WarMongerer",
            Self::CapturedOurCities => "CapturedOurCities",
            Self::DeclaredFriendshipWithOurEnemies => "DeclaredFriendshipWithOurEnemies",
            Self::BetrayedDeclarationOfFriendship => "BetrayedDeclarationOfFriendship",
            Self::Denunciation => "Denunciation",
            Self::DenouncedOurAllies => "DenouncedOurAllies",
            Self::RefusedToNotSettleCitiesNearUs => "RefusedToNotSettleCitiesNearUs",
            Self::BetrayedPromiseToNotSettleCitiesNearUs => "BetrayedPromiseToNotSettleCitiesNearUs",
            Self::UnacceptableDemands => "UnacceptableDemands",
            Self::StoleOurAlly => "StoleOurAlly",
            Self::YearsOfPeace => "YearsOfPeace",
            Self::SharedEnemy => "SharedEnemy",
            Self::DeclarationOfFriendship => "DeclarationOfFriendship",
            Self::DeclaredFriendshipWithOurAllies => "DeclaredFriendshipWithOurAllies",
            Self::DenouncedOurEnemies => "DenouncedOurEnemies",
            Self::OpenBorders => "OpenBorders",
            Self::FulfilledPromiseToNotSettleCitiesNearUs => "FulfilledPromiseToNotSettleCitiesNearUs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|modifier| modifier.as_str() == name)
    }

    /// What the AI says about this modifier on the diplomacy screen
    pub fn text(&self) -> &'static str {
        match self {
            Self::DeclaredWarOnUs => "You declared war on us!",
            Self::WarMongerer => "Your warmongering ways are unacceptable to us.",
            Self::CapturedOurCities => "You have captured our cities!",
            Self::DeclaredFriendshipWithOurEnemies => "You have declared friendship with our enemies!",
            Self::BetrayedDeclarationOfFriendship => "Your so-called 'friendship' is worth nothing.",
            Self::Denunciation => "You have publicly denounced us!",
            Self::DenouncedOurAllies => "You have denounced our allies",
            Self::RefusedToNotSettleCitiesNearUs => "You refused to stop settling cities near us",
            Self::BetrayedPromiseToNotSettleCitiesNearUs => "You betrayed your promise to not settle cities near us",
            Self::UnacceptableDemands => "Your arrogant demands are in bad taste",
            Self::StoleOurAlly => "You stole our ally",
            Self::YearsOfPeace => "Years of peace have strengthened our relations.",
            Self::SharedEnemy => "Our mutual military struggle brings us closer together.",
            Self::DeclarationOfFriendship => "We have signed a public declaration of friendship",
            Self::DeclaredFriendshipWithOurAllies => "You have declared friendship with our allies",
            Self::DenouncedOurEnemies => "You have denounced our enemies",
            Self::OpenBorders => "Our open borders have brought us closer together.",
            Self::FulfilledPromiseToNotSettleCitiesNearUs => "You fulfilled your promise to stop settling cities near us!",
        }
    }
}

impl fmt::Display for DiplomaticModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
