//! Command implementations.

pub mod config;
pub mod enrich;
pub mod key;
pub mod shell;
