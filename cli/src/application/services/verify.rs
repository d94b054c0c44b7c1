//! Decides whether an existing install can be reused as-is.

use crate::application::ports::LocalFs;
use crate::domain::InstallRecord;

/// Check an install record against the requested service and version.
///
/// - the record must belong to `service_id`;
/// - its version must equal `version`, unless `offline`, where whatever is
///   installed is the best available;
/// - the recorded service directory must still exist.
///
/// Content hashes are not checked.
pub fn verify_install(
    fs: &impl LocalFs,
    record: &InstallRecord,
    service_id: &str,
    version: &str,
    offline: bool,
) -> bool {
    if record.service != service_id {
        return false;
    }
    if record.version != version && !offline {
        return false;
    }
    fs.exists(&record.path)
}
