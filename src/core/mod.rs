pub mod engine;
pub mod locks;
pub mod purge;
pub mod reports;
pub mod roster;
