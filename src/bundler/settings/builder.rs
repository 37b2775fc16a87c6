//! Builder for constructing Settings.

use super::{Settings, ToolRuntime};
use crate::bundler::tool::ToolAsset;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```
/// use aab2apk::bundler::{SettingsBuilder, ToolAsset, ToolRuntime};
///
/// # fn example() -> aab2apk::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .tool(ToolAsset::from_file("bundletool.jar"))
///     .runtime(ToolRuntime::Native)
///     .temp_dir("/var/tmp")
///     .overwrite_existing(true)
///     .build()?;
///
/// assert_eq!(settings.mode(), "universal");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    tool: Option<ToolAsset>,
    runtime: ToolRuntime,
    temp_dir: Option<PathBuf>,
    overwrite_existing: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the packaging tool asset.
    ///
    /// # Required
    ///
    /// Required unless the `embedded-bundletool` feature is enabled, in which
    /// case the compiled-in jar is used.
    pub fn tool(mut self, tool: ToolAsset) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Sets how the tool is launched.
    ///
    /// Default: `java -jar`, with `java` located on first use
    pub fn runtime(mut self, runtime: ToolRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    /// Sets the directory for temporary tool copies.
    ///
    /// Default: the system temp directory
    pub fn temp_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.temp_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace an existing container at the output path.
    ///
    /// Default: false
    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no tool asset was set and none is embedded.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let tool = match self.tool {
            Some(tool) => tool,
            None => default_tool()?,
        };

        Ok(Settings::new(
            tool,
            self.runtime,
            self.temp_dir.unwrap_or_else(std::env::temp_dir),
            self.overwrite_existing,
        ))
    }
}

#[cfg(feature = "embedded-bundletool")]
fn default_tool() -> crate::bundler::Result<ToolAsset> {
    Ok(ToolAsset::embedded())
}

#[cfg(not(feature = "embedded-bundletool"))]
fn default_tool() -> crate::bundler::Result<ToolAsset> {
    use crate::bundler::error::Context;

    None::<ToolAsset>.context(
        "bundletool asset is required: pass --bundletool or set BUNDLETOOL_JAR \
         (or build with the embedded-bundletool feature)",
    )
}
