//! External tool detection and availability checking.
//!
//! bundletool is a jar, so conversions need a Java runtime. This module
//! locates one once per process.

use crate::bundler::Result;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Location of the `java` launcher, if one is available.
///
/// `JAVA_HOME/bin/java` wins over `PATH`. Cached to avoid repeated lookups
/// and subprocess calls.
pub static JAVA: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let candidate = java_home_binary().or_else(|| match which::which("java") {
        Ok(path) => Some(path),
        Err(e) => {
            log::debug!("java not found in PATH: {}", e);
            None
        }
    })?;

    log::debug!("Found java at: {}", candidate.display());

    // `java -version` writes to stderr
    match std::process::Command::new(&candidate).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stderr);
            log::info!(
                "✓ java available: {}",
                version.lines().next().unwrap_or_default().trim()
            );
            Some(candidate)
        }
        Ok(output) => {
            log::warn!(
                "java found at {} but -version check failed (exit code: {:?}). \
                 Stderr: {}",
                candidate.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
            None
        }
        Err(e) => {
            log::warn!(
                "java found at {} but failed to execute: {}. \
                 Check file permissions.",
                candidate.display(),
                e
            );
            None
        }
    }
});

/// Resolves [`JAVA`] off the async runtime.
///
/// The first lookup spawns `java -version`, so it runs on the blocking pool.
pub async fn java() -> Result<Option<PathBuf>> {
    Ok(tokio::task::spawn_blocking(|| JAVA.clone()).await?)
}

fn java_home_binary() -> Option<PathBuf> {
    let home = std::env::var_os("JAVA_HOME")?;
    let java = PathBuf::from(home)
        .join("bin")
        .join(if cfg!(windows) { "java.exe" } else { "java" });

    if java.is_file() {
        Some(java)
    } else {
        log::debug!(
            "JAVA_HOME is set but {} does not exist, falling back to PATH",
            java.display()
        );
        None
    }
}
