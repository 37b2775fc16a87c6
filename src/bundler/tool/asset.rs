//! Sources for the packaging tool binary.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the bundled tool.
pub const BUNDLETOOL_JAR: &str = "bundletool.jar";

/// Where the packaging tool's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolAsset {
    /// Bytes compiled into the program.
    Embedded {
        name: &'static str,
        bytes: &'static [u8],
    },

    /// A tool file on disk, read when provisioning.
    File(PathBuf),
}

impl ToolAsset {
    /// The bundletool jar compiled in from `resources/bundletool.jar`.
    #[cfg(feature = "embedded-bundletool")]
    pub fn embedded() -> Self {
        Self::Embedded {
            name: BUNDLETOOL_JAR,
            bytes: include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/bundletool.jar"
            )),
        }
    }

    /// A tool read from `path` at provisioning time.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> String {
        match self {
            Self::Embedded { name, .. } => (*name).to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// File suffix for the temporary copy, including the dot (e.g. `.jar`).
    ///
    /// Empty when the asset name carries no extension.
    pub fn suffix(&self) -> String {
        let file_name = match self {
            Self::Embedded { name, .. } => Path::new(name),
            Self::File(path) => path.as_path(),
        };
        file_name
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }

    /// Loads the tool's bytes.
    ///
    /// An empty asset is reported as [`io::ErrorKind::NotFound`]: a zero-byte
    /// tool can never run, and an empty embedded slice means the resource was
    /// not bundled.
    pub async fn load(&self) -> io::Result<Cow<'static, [u8]>> {
        let bytes = match self {
            Self::Embedded { bytes, .. } => Cow::Borrowed(*bytes),
            Self::File(path) => Cow::Owned(tokio::fs::read(path).await?),
        };

        if bytes.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("tool asset {} is empty", self.name()),
            ));
        }

        Ok(bytes)
    }
}
