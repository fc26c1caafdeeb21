pub mod modification;
pub mod outline;
pub mod query;
pub mod snapping;
pub mod transform;
