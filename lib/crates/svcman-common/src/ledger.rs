//! Records kept in an install directory's ledger.
//!
//! Both records are keyed by the absolute install directory they live in.
//! An install directory holds exactly one [`InstallRecord`] and at most one
//! [`RuntimeStateRecord`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the install record inside an install directory.
pub const INSTALL_FILENAME: &str = ".install.json";

/// File name of the runtime state record inside an install directory.
pub const STATE_FILENAME: &str = ".state.json";

/// Digest written into records until artifact hashing exists.
pub const PLACEHOLDER_DIGEST: &str = "TODO";

/// A specific installed version of a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallRecord {
    /// Service id this install directory was populated for.
    pub service: String,
    pub artifact: String,
    pub version: String,
    /// Absolute path of the unpacked service directory.
    pub path: PathBuf,
    pub md5sum: String,
    pub created: DateTime<Utc>,
}

/// The most recent launch of a service.
///
/// Advisory only: nothing updates or removes it when the process exits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeStateRecord {
    pub service: String,
    pub artifact: String,
    pub version: String,
    pub path: PathBuf,
    pub md5sum: String,
    pub started: DateTime<Utc>,
    pub pid: u32,
    pub port: u16,
    /// Full argument list passed to the executable, program name excluded.
    #[serde(default)]
    pub args: Vec<String>,
}
