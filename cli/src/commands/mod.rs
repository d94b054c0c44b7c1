//! Command implementations

pub mod services;
pub mod start;
pub mod status;
pub mod version;
