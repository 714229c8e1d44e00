//! Repository layer: one zero-sized struct per table with async query
//! functions taking the pool explicitly.

mod item_repo;

pub use item_repo::ItemRepo;
