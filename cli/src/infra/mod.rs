//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: filesystem access, the file
//! ledger, HTTP repository access, archive unpacking, health probing, and
//! process spawning.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod archive;
pub mod config;
pub mod fs;
pub mod health;
pub mod ledger;
pub mod process;
pub mod repository;
