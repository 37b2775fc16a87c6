//! Crate-level error types.
//!
//! Wraps [`crate::bundler::Error`] with the pipeline stage it came from so the
//! user can tell a failed conversion from a failed extraction without
//! re-running with verbose logging.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Exit code for argument and setup errors.
pub const EXIT_GENERAL: i32 = 1;
/// Exit code when `build-apks` fails.
pub const EXIT_CONVERSION: i32 = 3;
/// Exit code when the APK cannot be extracted.
pub const EXIT_EXTRACTION: i32 = 4;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum AppError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// The bundle could not be converted into an APK set.
    #[error("Failed to convert AAB to APKS: {0}")]
    Conversion(#[source] crate::bundler::Error),

    /// The APK could not be extracted from the APK set.
    #[error("Failed to extract APK from APKS: {0}")]
    Extraction(#[source] crate::bundler::Error),

    /// Bundler errors outside either stage
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Conversion(_) => EXIT_CONVERSION,
            Self::Extraction(_) => EXIT_EXTRACTION,
            _ => EXIT_GENERAL,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as BundlerError;

        match self {
            Self::Conversion(BundlerError::CommandFailed { .. }) => vec![
                "Install a Java runtime, set JAVA_HOME, or pass --java".to_string(),
            ],
            Self::Conversion(BundlerError::ToolExited { .. }) => vec![
                "Check the bundletool output above".to_string(),
                "Verify the keystore path, passwords and key alias".to_string(),
                "Pass --overwrite if the .apks file already exists".to_string(),
            ],
            Self::Conversion(BundlerError::Provisioning { .. }) => vec![
                "Check that the bundletool jar exists and the temp directory is writable"
                    .to_string(),
            ],
            Self::Extraction(BundlerError::ArtifactNotFound { .. }) => vec![
                "The APK set holds no .apk entry; check that bundletool ran in universal mode"
                    .to_string(),
            ],
            Self::Cli(_) => vec!["Run with --help to see required arguments".to_string()],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
