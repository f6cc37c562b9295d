//! CLI command handlers.

pub mod compare;
pub mod evaluate;
