//! Error types for conversion and extraction.
//!
//! Every failure the pipeline can produce has its own variant so callers can
//! tell a missing tool apart from a tool that ran and failed, or an unreadable
//! container apart from one that simply holds no APK.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the conversion pipeline.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// The packaging tool could not be copied into a temporary file.
    #[error("failed to provision {asset}: {source}")]
    Provisioning {
        /// Name of the tool asset being provisioned
        asset: String,
        #[source]
        source: io::Error,
    },

    /// The external command could not be launched.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        command: String,
        #[source]
        error: io::Error,
    },

    /// The external command ran and exited unsuccessfully.
    #[error("`{command}` exited with {}", describe_exit(.code))]
    ToolExited { command: String, code: Option<i32> },

    /// A required request field was left empty.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// The container could not be opened as a zip archive.
    #[error("failed to open APK set {}: {}", .path.display(), describe_zip(.source))]
    ContainerOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The container is readable but holds no entry with the wanted extension.
    #[error("no .{extension} entries found in {}", .container.display())]
    ArtifactNotFound { container: PathBuf, extension: String },

    /// An archive entry name would escape the output directory.
    #[error("refusing to extract entry with unsafe path: {name}")]
    UnsafeEntryPath { name: String },

    /// Filesystem failure while extracting or moving the artifact.
    #[error("{context} {}: {source}", .path.display())]
    Extraction {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem failure with context.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A required setting had no value and no fallback.
    #[error("{0}")]
    GenericError(String),
}

fn describe_zip(error: &zip::result::ZipError) -> String {
    match error {
        zip::result::ZipError::Io(io) => io.to_string(),
        other => other.to_string(),
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status code {code}"),
        None => "no status code (terminated by signal)".to_string(),
    }
}

/// Turns a missing value into an [`Error::GenericError`] carrying `context`.
pub trait Context<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Attaches a path and a description to I/O errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Attaches a path and description to I/O errors raised during extraction.
pub(crate) fn extraction_error(context: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::Extraction {
        context,
        path,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_exit_message_includes_code() {
        let err = Error::ToolExited {
            command: "java -jar bundletool.jar build-apks".into(),
            code: Some(3),
        };
        assert_eq!(
            err.to_string(),
            "`java -jar bundletool.jar build-apks` exited with status code 3"
        );
    }

    #[test]
    fn tool_exit_without_code_mentions_signal() {
        let err = Error::ToolExited {
            command: "bundletool".into(),
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("no entry").unwrap_err();
        assert!(matches!(err, Error::GenericError(msg) if msg == "no entry"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.fs_context("reading keystore", "/tmp/release.jks").unwrap_err();
        assert_eq!(err.to_string(), "reading keystore /tmp/release.jks: gone");
    }
}
