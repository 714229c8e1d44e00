pub mod export;
pub mod items;
