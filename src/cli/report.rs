//! Machine-readable summary of a finished run.

use serde::Serialize;
use std::path::PathBuf;

/// Printed by `--json` after a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Input bundle
    pub bundle: PathBuf,
    /// APK set produced by bundletool
    pub apks: PathBuf,
    /// Extracted universal APK
    pub apk: PathBuf,
    /// Size of the APK in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the APK
    pub sha256: String,
}
