// ── Record-to-domain conversions ──
//
// Small pure helpers the entity builders share: the OS translation table,
// provider unit conversions, the image architecture tag and timestamp
// parsing. Missing inputs map to `None`, never to a default.

use chrono::{DateTime, Utc};

use pvs_api::ImageSpecifications;

use crate::model::OsTag;

/// Bytes per provider gigabyte (binary, 1024³).
pub const BYTES_PER_GIGABYTE: u64 = 1024 * 1024 * 1024;

/// Megabytes per provider gigabyte.
pub const MEGABYTES_PER_GIGABYTE: u64 = 1024;

const LITTLE_ENDIAN: &str = "little-endian";

// ── Operating systems ──────────────────────────────────────────────

/// Map the provider's short OS key to a normalized tag.
///
/// Closed table; anything else has no tag.
pub fn os_tag(key: Option<&str>) -> Option<OsTag> {
    match key? {
        "aix" => Some(OsTag::UnixAix),
        "ibmi" => Some(OsTag::IbmI),
        "redhat" | "rhel" => Some(OsTag::LinuxRedhat),
        "sles" => Some(OsTag::LinuxSuse),
        _ => None,
    }
}

// ── Units ──────────────────────────────────────────────────────────

/// Provider gigabytes (possibly fractional) to bytes.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn gigabytes_to_bytes(gigabytes: f64) -> u64 {
    (gigabytes * BYTES_PER_GIGABYTE as f64).round() as u64
}

/// Provider memory gigabytes to megabytes.
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn memory_gigabytes_to_megabytes(gigabytes: f64) -> u64 {
    (gigabytes * MEGABYTES_PER_GIGABYTE as f64).round() as u64
}

// ── Images ─────────────────────────────────────────────────────────

/// Architecture tag of an image: the base architecture, suffixed with
/// `le` for little-endian images (`ppc64` → `ppc64le`).
pub fn architecture_tag(spec: &ImageSpecifications) -> Option<String> {
    let mut arch = spec.architecture.clone()?;
    if spec.endianness.as_deref() == Some(LITTLE_ENDIAN) {
        arch.push_str("le");
    }
    Some(arch)
}

// ── Misc ───────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, silently dropping unparseable values.
pub fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a numeric provider value as its shortest decimal text.
///
/// Processor entitlements are stored this way on purpose: whole counts read
/// as `2` rather than `2.0`, and fractional shares keep their digits (`0.25`).
pub fn format_number(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}
