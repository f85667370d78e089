//! Command handlers

pub mod config;
pub mod conflicts;
pub mod quote;
pub mod status;
pub mod sync;
pub mod transfer;
