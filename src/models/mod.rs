pub mod map_unit;
pub mod resource_supply_list;
pub mod snapshot_list;

pub use map_unit::{City, MapUnit, Position};
pub use resource_supply_list::{ResourceSupply, ResourceSupplyList};
pub use snapshot_list::SnapshotList;
