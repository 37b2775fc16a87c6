//! Android App Bundle to universal APK converter.
//!
//! This library wraps bundletool's `build-apks` command:
//! - provisions a private temporary copy of the tool for each conversion
//! - runs it with signing credentials to produce an APK set (.apks)
//! - extracts the universal APK from that set
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use bundler::{ConversionRequest, Settings, SettingsBuilder, convert, extract};
pub use error::{AppError, CliError, Result};
