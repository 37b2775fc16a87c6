//! Conversion request: the caller-supplied inputs for one `build-apks` run.

use crate::bundler::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Inputs for a single bundle-to-APK-set conversion.
///
/// Every field is required. The request is never mutated once built and
/// lives only as long as one conversion.
///
/// Passwords are redacted from the `Debug` output so a request can be logged
/// without leaking credentials.
///
/// # Examples
///
/// ```
/// use aab2apk::bundler::ConversionRequest;
///
/// let request = ConversionRequest::new(
///     "app-release.aab",
///     "app-release.apks",
///     "release.jks",
///     "store-secret",
///     "upload",
///     "key-secret",
/// );
/// assert!(request.validate().is_ok());
/// assert!(!format!("{request:?}").contains("store-secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    bundle_path: PathBuf,
    container_output_path: PathBuf,
    keystore_path: PathBuf,
    keystore_password: String,
    key_alias: String,
    key_password: String,
}

impl ConversionRequest {
    /// Creates a request from plain values.
    pub fn new(
        bundle_path: impl Into<PathBuf>,
        container_output_path: impl Into<PathBuf>,
        keystore_path: impl Into<PathBuf>,
        keystore_password: impl Into<String>,
        key_alias: impl Into<String>,
        key_password: impl Into<String>,
    ) -> Self {
        Self {
            bundle_path: bundle_path.into(),
            container_output_path: container_output_path.into(),
            keystore_path: keystore_path.into(),
            keystore_password: keystore_password.into(),
            key_alias: key_alias.into(),
            key_password: key_password.into(),
        }
    }

    /// The `.aab` to convert.
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    /// Where the tool writes the `.apks` container.
    pub fn container_output_path(&self) -> &Path {
        &self.container_output_path
    }

    pub fn keystore_path(&self) -> &Path {
        &self.keystore_path
    }

    pub fn keystore_password(&self) -> &str {
        &self.keystore_password
    }

    pub fn key_alias(&self) -> &str {
        &self.key_alias
    }

    pub fn key_password(&self) -> &str {
        &self.key_password
    }

    /// Checks that every field was supplied.
    ///
    /// Returns [`Error::MissingField`] naming the first empty field, in
    /// declaration order.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, bool); 6] = [
            ("bundle", self.bundle_path.as_os_str().is_empty()),
            ("apks output", self.container_output_path.as_os_str().is_empty()),
            ("keystore", self.keystore_path.as_os_str().is_empty()),
            ("keystore password", self.keystore_password.is_empty()),
            ("key alias", self.key_alias.is_empty()),
            ("key password", self.key_password.is_empty()),
        ];

        match fields.iter().find(|(_, empty)| *empty) {
            Some((field, _)) => Err(Error::MissingField { field: *field }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("bundle_path", &self.bundle_path)
            .field("container_output_path", &self.container_output_path)
            .field("keystore_path", &self.keystore_path)
            .field("keystore_password", &"<redacted>")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"<redacted>")
            .finish()
    }
}
