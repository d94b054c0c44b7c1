//! Property-based tests for install verification and launch assembly.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use proptest::prelude::*;
use svcman_cli::application::ports::LocalFs;
use svcman_cli::application::services::verify::verify_install;
use svcman_cli::domain::InstallRecord;
use svcman_cli::domain::artifact::escape_segment;
use svcman_cli::domain::launch::{assemble_args, resolve_port};

use crate::mocks::auth_service;

struct StaticFs(bool);

impl LocalFs for StaticFs {
    fn exists(&self, _: &Path) -> bool {
        self.0
    }
    fn create_dir_all(&self, _: &Path) -> Result<()> {
        Ok(())
    }
    fn remove_dir_all(&self, _: &Path) -> Result<()> {
        Ok(())
    }
    fn remove_file(&self, _: &Path) -> Result<()> {
        Ok(())
    }
    fn create_file(&self, _: &Path) -> Result<File> {
        anyhow::bail!("not used")
    }
}

fn record(service: &str, version: &str) -> InstallRecord {
    InstallRecord {
        service: service.to_string(),
        artifact: "auth".into(),
        version: version.to_string(),
        path: PathBuf::from("/srv/install/AUTH/auth"),
        md5sum: "TODO".into(),
        created: Utc::now(),
    }
}

proptest! {
    /// A record for another service never verifies, online or offline.
    #[test]
    fn prop_other_service_never_verifies(
        other in "[A-Z]{1,8}",
        version in "[0-9.]{1,8}",
        offline in proptest::bool::ANY,
    ) {
        prop_assume!(other != "AUTH");
        let rec = record(&other, &version);
        prop_assert!(!verify_install(&StaticFs(true), &rec, "AUTH", &version, offline));
    }

    /// Online, verification is exactly version equality (given the path exists).
    #[test]
    fn prop_online_requires_matching_version(
        installed in "[0-9]\\.[0-9]",
        requested in "[0-9]\\.[0-9]",
    ) {
        let rec = record("AUTH", &installed);
        let ok = verify_install(&StaticFs(true), &rec, "AUTH", &requested, false);
        prop_assert_eq!(ok, installed == requested);
    }

    /// Offline, any version of the right service verifies while its path exists.
    #[test]
    fn prop_offline_ignores_version(
        installed in "[0-9.]{0,8}",
        requested in "[0-9.]{0,8}",
        present in proptest::bool::ANY,
    ) {
        let rec = record("AUTH", &installed);
        prop_assert_eq!(
            verify_install(&StaticFs(present), &rec, "AUTH", &requested, true),
            present
        );
    }

    /// A missing service directory never verifies.
    #[test]
    fn prop_missing_path_never_verifies(version in "[0-9.]{1,8}", offline in proptest::bool::ANY) {
        let rec = record("AUTH", &version);
        prop_assert!(!verify_install(&StaticFs(false), &rec, "AUTH", &version, offline));
    }

    /// The generated port argument always matches the resolved port.
    #[test]
    fn prop_port_argument_matches_resolved_port(port in proptest::option::of(0u16..)) {
        let service = auth_service();
        let resolved = resolve_port(&service, port);
        let args = assemble_args(&service, "1.0", Path::new("/srv/x"), resolved, &HashMap::new());
        let expected = format!("-Dhttp.port={resolved}");
        prop_assert!(args.contains(&expected));
        if port.is_none() || port == Some(0) {
            prop_assert_eq!(resolved, 8500);
        }
    }

    /// Escaped path segments never contain separators or spaces.
    #[test]
    fn prop_escaped_segment_has_no_separators(raw in "\\PC{0,24}") {
        let escaped = escape_segment(&raw);
        prop_assert!(!escaped.contains('/'));
        prop_assert!(!escaped.contains(' '));
        prop_assert!(!escaped.contains('?'));
    }
}
