pub mod config;
pub mod error;
pub mod graph;
pub mod math;
pub mod operations;
pub mod session;
pub mod store;

pub use error::{Result, WallplanError};
