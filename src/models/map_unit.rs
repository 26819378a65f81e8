use serde::{Deserialize, Serialize};

/// Map position in offset coordinates
pub type Position = (i32, i32);

/// The slice of a unit the diplomacy rules care about: where it stands and whether it fights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapUnit {
    pub id: u32,
    pub name: String,
    pub is_military: bool,
    pub position: Position,
}

impl MapUnit {
    pub fn new(id: u32, name: impl Into<String>, is_military: bool, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            is_military,
            position,
        }
    }
}

/// A settlement. Only its existence and location matter here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub location: Position,
}

impl City {
    pub fn new(name: impl Into<String>, location: Position) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}
