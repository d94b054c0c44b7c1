//! Shared types for svcman: the on-disk ledger records.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod ledger;

pub use ledger::{INSTALL_FILENAME, InstallRecord, PLACEHOLDER_DIGEST, RuntimeStateRecord, STATE_FILENAME};
