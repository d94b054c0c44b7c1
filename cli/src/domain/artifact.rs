//! Repository URL construction and version metadata parsing.
//!
//! Pure functions: strings in, strings out.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::domain::service::BinaryDescriptor;

/// Bytes escaped inside a single URL path segment.
///
/// Unreserved characters stay as-is, as do the sub-delimiters that are legal
/// inside a segment (`$ & + = : @`). Everything else, including `/`, `;`,
/// `,` and `?`, is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

static LATEST_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<latest>\s*([^<\s]+)\s*</latest>").ok());
static RELEASE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<release>\s*([^<\s]+)\s*</release>").ok());

/// Percent-encode one path segment.
#[must_use]
pub fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Archive file name for a version: `<artifact>-<version>.tgz`, both escaped.
#[must_use]
pub fn archive_filename(artifact: &str, version: &str) -> String {
    format!("{}-{}.tgz", escape_segment(artifact), escape_segment(version))
}

/// Download URL of a versioned artifact.
///
/// `<repo>/<group>/<artifact>/<version>/<artifact>-<version>.tgz`, every
/// segment escaped independently. A trailing `/` on `repository_url` is
/// ignored.
#[must_use]
pub fn download_url(repository_url: &str, binary: &BinaryDescriptor, version: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        repository_url.trim_end_matches('/'),
        escape_segment(&binary.group_id),
        escape_segment(&binary.artifact),
        escape_segment(version),
        archive_filename(&binary.artifact, version),
    )
}

/// URL of the repository's version metadata for an artifact.
#[must_use]
pub fn metadata_url(repository_url: &str, binary: &BinaryDescriptor) -> String {
    format!(
        "{}/{}/{}/maven-metadata.xml",
        repository_url.trim_end_matches('/'),
        escape_segment(&binary.group_id),
        escape_segment(&binary.artifact),
    )
}

/// Extract the latest published version from repository metadata.
///
/// Prefers `<latest>`, falls back to `<release>`.
#[must_use]
pub fn parse_latest_version(metadata: &str) -> Option<String> {
    [&*LATEST_RE, &*RELEASE_RE]
        .into_iter()
        .flatten()
        .find_map(|re| re.captures(metadata))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
