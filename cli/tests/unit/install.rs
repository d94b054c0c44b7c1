//! Tests for the install step.

#![allow(clippy::expect_used)]

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use svcman_cli::application::services::install::{
    InstallRequest, install_service, remove_existing_versions,
};
use svcman_cli::domain::StartError;
use svcman_cli::domain::progress::STATE_INIT;
use svcman_cli::infra::fs::LocalFs as RealFs;

use crate::mocks::{
    FakeRepository, MemoryLedger, REPO, RecordingFs, RecordingReporter, auth_service,
};

#[test]
fn relative_install_dir_panics_before_touching_disk() {
    let fs = RecordingFs {
        existing: true,
        ..RecordingFs::default()
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        remove_existing_versions(&fs, Path::new("install/AUTH"))
    }));

    assert!(result.is_err(), "relative path must panic");
    assert!(fs.calls().is_empty(), "no filesystem call may run: {:?}", fs.calls());
}

#[test]
fn existing_install_dir_is_removed_then_recreated() {
    let fs = RecordingFs {
        existing: true,
        ..RecordingFs::default()
    };

    remove_existing_versions(&fs, Path::new("/srv/install/AUTH")).expect("reset");

    assert_eq!(
        fs.calls(),
        [
            "exists /srv/install/AUTH",
            "remove_dir_all /srv/install/AUTH",
            "create_dir_all /srv/install/AUTH",
        ]
    );
}

#[test]
fn missing_install_dir_is_only_created() {
    let fs = RecordingFs::default();

    remove_existing_versions(&fs, Path::new("/srv/install/AUTH")).expect("reset");

    assert_eq!(
        fs.calls(),
        ["exists /srv/install/AUTH", "create_dir_all /srv/install/AUTH"]
    );
}

#[tokio::test]
async fn install_wipes_old_content_and_persists_record() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let install_dir = tmp.path().join("install").join("AUTH");
    std::fs::create_dir_all(install_dir.join("auth-0.9.0")).expect("old version");
    let ledger = MemoryLedger::default();
    let repository = FakeRepository::with_latest("1.0.0");
    let reporter = RecordingReporter::default();
    let service = auth_service();

    let record = install_service(
        &RealFs,
        &ledger,
        &repository,
        &reporter,
        InstallRequest {
            install_dir: &install_dir,
            service: &service,
            version: "1.0.0",
            repository_url: REPO,
        },
    )
    .await
    .expect("installed");

    assert!(!install_dir.join("auth-0.9.0").exists());
    assert_eq!(record.path, install_dir.join("auth-1.0.0"));
    assert_eq!(record.service, "AUTH");
    assert_eq!(record.artifact, "auth");
    assert_eq!(record.md5sum, "TODO");
    assert_eq!(ledger.install(&install_dir), Some(record));
    let first = reporter.events().into_iter().next().expect("event");
    assert_eq!(first.state, STATE_INIT);
    assert_eq!(first.percent, Some(0));
}

#[tokio::test]
async fn unresettable_install_dir_is_an_io_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    // A file where the install directory should be cannot be removed as a directory.
    let install_dir = tmp.path().join("AUTH");
    std::fs::write(&install_dir, "not a directory").expect("write");
    let repository = FakeRepository::with_latest("1.0.0");
    let reporter = RecordingReporter::default();
    let service = auth_service();

    let err = install_service(
        &RealFs,
        &MemoryLedger::default(),
        &repository,
        &reporter,
        InstallRequest {
            install_dir: &install_dir,
            service: &service,
            version: "1.0.0",
            repository_url: REPO,
        },
    )
    .await
    .expect_err("reset fails");

    assert!(matches!(err.downcast_ref::<StartError>(), Some(StartError::Io { .. })));
    assert_eq!(repository.fetch_count(), 0);
    assert!(reporter.events().is_empty());
}
