//! Bundle-to-APK conversion pipeline.
//!
//! The pipeline has two stages, each with a plain-value entry point:
//!
//! 1. [`convert`] provisions a temporary copy of bundletool and runs
//!    `build-apks --mode=universal`, producing an APK set (`.apks`).
//! 2. [`extract`] pulls the universal APK out of that set as
//!    `extracted.apk`.
//!
//! # Example
//!
//! ```no_run
//! use aab2apk::bundler::{self, ConversionRequest, SettingsBuilder, ToolAsset};
//!
//! # async fn example() -> aab2apk::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .tool(ToolAsset::from_file("bundletool-all.jar"))
//!     .build()?;
//!
//! let request = ConversionRequest::new(
//!     "app-release.aab",
//!     "app-release.apks",
//!     "release.jks",
//!     "store-password",
//!     "upload",
//!     "key-password",
//! );
//!
//! if bundler::convert(&settings, &request).await {
//!     if let Some(apk) = bundler::extract("app-release.apks", "dist").await {
//!         println!("APK saved to {}", apk.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod builder;
pub mod error;
pub mod settings;
pub mod tool;
pub mod utils;

pub use artifact::{APK_EXTENSION, ArtifactExtractor, EXTRACTED_APK_NAME};
pub use builder::ConversionInvoker;
pub use error::{Error, Result};
pub use settings::{ConversionRequest, Settings, SettingsBuilder, ToolRuntime, UNIVERSAL_MODE};
pub use tool::{ProvisionedTool, ToolAsset, ToolProvisioner};

use std::path::{Path, PathBuf};

/// Runs the conversion stage. Returns `true` if the tool exited cleanly.
pub async fn convert(settings: &Settings, request: &ConversionRequest) -> bool {
    ConversionInvoker::new(settings).convert(request).await
}

/// Runs the extraction stage. Returns the extracted APK path, or `None`.
pub async fn extract(container: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Option<PathBuf> {
    ArtifactExtractor::new().extract(container, output_dir).await
}
