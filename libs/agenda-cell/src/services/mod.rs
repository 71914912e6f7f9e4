pub mod booking;
pub mod directory;
pub mod generator;
pub mod store;
