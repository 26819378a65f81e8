/// Names of trade offers that the engine treats specially.
pub struct Constants;

impl Constants {
    pub const PEACE_TREATY: &'static str = "Peace Treaty";
    pub const OPEN_BORDERS: &'static str = "Open Borders";

    /// Influence at or above which a city-state considers a major civ its ally
    pub const ALLY_INFLUENCE: f32 = 60.0;
}
