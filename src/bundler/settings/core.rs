//! Core Settings struct and implementations.

use super::ToolRuntime;
use crate::bundler::tool::ToolAsset;
use std::path::{Path, PathBuf};

/// Output mode requested from the tool: one configuration-independent APK.
pub const UNIVERSAL_MODE: &str = "universal";

/// Settings shared by every conversion run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use aab2apk::bundler::{SettingsBuilder, ToolAsset, ToolRuntime};
///
/// # fn example() -> aab2apk::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .tool(ToolAsset::from_file("/opt/android/bundletool-all.jar"))
///     .runtime(ToolRuntime::java("/usr/lib/jvm/default/bin/java"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Packaging tool to provision for each run.
    tool: ToolAsset,

    /// How the provisioned tool is launched.
    runtime: ToolRuntime,

    /// Directory receiving temporary tool copies.
    temp_dir: PathBuf,

    /// Remove an existing container at the output path before running.
    ///
    /// bundletool refuses to write over an existing `--output` file.
    overwrite_existing: bool,
}

impl Settings {
    pub(super) fn new(
        tool: ToolAsset,
        runtime: ToolRuntime,
        temp_dir: PathBuf,
        overwrite_existing: bool,
    ) -> Self {
        Self {
            tool,
            runtime,
            temp_dir,
            overwrite_existing,
        }
    }

    /// Returns the tool asset.
    pub fn tool(&self) -> &ToolAsset {
        &self.tool
    }

    /// Returns the tool runtime.
    pub fn runtime(&self) -> &ToolRuntime {
        &self.runtime
    }

    /// Returns the directory used for temporary tool copies.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Whether an existing container is replaced.
    pub fn overwrite_existing(&self) -> bool {
        self.overwrite_existing
    }

    /// Returns the output mode passed to the tool.
    pub fn mode(&self) -> &'static str {
        UNIVERSAL_MODE
    }
}
