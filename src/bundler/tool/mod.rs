//! Tool provisioning.
//!
//! The packaging tool is never run from where it is stored. Each conversion
//! gets a private, uniquely named temporary copy of it, and that copy is
//! removed as soon as the [`ProvisionedTool`] handle is dropped or closed.

mod asset;

pub use asset::{BUNDLETOOL_JAR, ToolAsset};

use crate::bundler::{Error, Result, Settings};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Prefix for temporary tool copies.
const TOOL_FILE_PREFIX: &str = "bundletool-";

/// Copies a [`ToolAsset`] into a fresh temporary file.
#[derive(Debug, Clone)]
pub struct ToolProvisioner {
    asset: ToolAsset,
    temp_dir: PathBuf,
    executable: bool,
}

impl ToolProvisioner {
    /// Creates a provisioner that writes into `temp_dir`.
    pub fn new(asset: ToolAsset, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset,
            temp_dir: temp_dir.into(),
            executable: false,
        }
    }

    /// Creates a provisioner configured from bundler settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            asset: settings.tool().clone(),
            temp_dir: settings.temp_dir().to_path_buf(),
            executable: settings.runtime().needs_executable_tool(),
        }
    }

    /// Marks the copy executable (Unix only).
    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    /// Writes the tool to a new temporary file and returns its handle.
    ///
    /// The file name is unique per call, so concurrent conversions never
    /// share a copy.
    ///
    /// # Errors
    ///
    /// [`Error::Provisioning`] if the asset cannot be loaded or the file
    /// cannot be created or written.
    pub async fn provision(&self) -> Result<ProvisionedTool> {
        let name = self.asset.name();
        let provisioning = |source: io::Error| Error::Provisioning {
            asset: name.clone(),
            source,
        };

        let bytes = self.asset.load().await.map_err(provisioning)?;
        let suffix = self.asset.suffix();
        let temp_dir = self.temp_dir.clone();
        let executable = self.executable;

        let path = tokio::task::spawn_blocking(move || {
            write_temp_tool(&temp_dir, &suffix, &bytes, executable)
        })
        .await?
        .map_err(provisioning)?;

        log::debug!("Provisioned {} at {}", name, path.display());

        Ok(ProvisionedTool { path, asset: name })
    }
}

fn write_temp_tool(
    temp_dir: &Path,
    suffix: &str,
    bytes: &[u8],
    executable: bool,
) -> io::Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix(TOOL_FILE_PREFIX)
        .suffix(suffix)
        .tempfile_in(temp_dir)?;

    file.write_all(bytes)?;
    file.flush()?;

    #[cfg(unix)]
    {
        if executable {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o755))?;
        }
    }
    #[cfg(not(unix))]
    let _ = executable;

    // Closes the handle; the path still deletes itself on drop.
    Ok(file.into_temp_path())
}

/// A temporary copy of the packaging tool.
///
/// The file is removed when this handle is dropped. Use
/// [`ProvisionedTool::close`] to observe removal failures.
#[derive(Debug)]
pub struct ProvisionedTool {
    path: TempPath,
    asset: String,
}

impl ProvisionedTool {
    /// Location of the temporary copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the asset this copy was made from.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Removes the temporary copy.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(bytes: &'static [u8]) -> ToolAsset {
        ToolAsset::Embedded {
            name: BUNDLETOOL_JAR,
            bytes,
        }
    }

    #[tokio::test]
    async fn copy_matches_asset_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ToolProvisioner::new(asset(b"\x50\x4b\x03\x04jar"), dir.path())
            .provision()
            .await
            .unwrap();

        assert_eq!(std::fs::read(tool.path()).unwrap(), b"\x50\x4b\x03\x04jar");
        assert!(tool.path().starts_with(dir.path()));
        let file_name = tool.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with(TOOL_FILE_PREFIX));
        assert!(file_name.ends_with(".jar"));
    }

    #[tokio::test]
    async fn each_call_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let provisioner = ToolProvisioner::new(asset(b"tool"), dir.path());

        let first = provisioner.provision().await.unwrap();
        let second = provisioner.provision().await.unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[tokio::test]
    async fn drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ToolProvisioner::new(asset(b"tool"), dir.path())
            .provision()
            .await
            .unwrap();
        let path = tool.path().to_path_buf();
        assert!(path.exists());

        drop(tool);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn close_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ToolProvisioner::new(asset(b"tool"), dir.path())
            .provision()
            .await
            .unwrap();
        let path = tool.path().to_path_buf();

        tool.close().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_asset_is_provisioning_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolProvisioner::new(ToolAsset::from_file(dir.path().join("nope.jar")), dir.path())
            .provision()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provisioning { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unwritable_directory_is_provisioning_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolProvisioner::new(asset(b"tool"), dir.path().join("does/not/exist"))
            .provision()
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provisioning { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn executable_copy_has_exec_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = ToolProvisioner::new(asset(b"#!/bin/sh\nexit 0\n"), dir.path())
            .executable(true)
            .provision()
            .await
            .unwrap();

        let mode = std::fs::metadata(tool.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
