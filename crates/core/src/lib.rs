//! Domain model and pure logic for DevSnippet.
//!
//! Nothing in this crate performs network or database I/O: item types,
//! filtering, the client state container, export generators, and
//! language-model prompt construction all live here so the server, the
//! client, and tests can share them.

pub mod assist;
pub mod category;
pub mod error;
pub mod export;
pub mod filter;
pub mod item;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod types;
