pub mod area;
pub mod row;
pub mod snapshot;
pub mod time_of_day;

pub use area::AreaKey;
pub use row::{Occupancy, OccupancyRow};
pub use snapshot::RealtimeSnapshot;
pub use time_of_day::{Granularity, TimeOfDay};
