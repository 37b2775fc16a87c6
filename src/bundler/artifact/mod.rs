//! APK extraction from APK set containers.
//!
//! bundletool writes its output as a zip archive (`.apks`). In universal
//! mode that archive holds one installable APK, which this module copies out
//! under a fixed name.

use crate::bundler::{
    Error, Result,
    error::extraction_error,
    utils::fs::{missing_dirs, prune_empty_dirs},
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extension of installable Android packages.
pub const APK_EXTENSION: &str = "apk";

/// File name given to the extracted package.
pub const EXTRACTED_APK_NAME: &str = "extracted.apk";

/// Prefix of the in-progress file written during extraction.
const PARTIAL_PREFIX: &str = ".extracted-";

/// Pulls the first matching package out of an APK set.
///
/// # Examples
///
/// ```no_run
/// use aab2apk::bundler::ArtifactExtractor;
///
/// # async fn example() {
/// match ArtifactExtractor::new().extract("app.apks", "out").await {
///     Some(apk) => println!("Saved to {}", apk.display()),
///     None => eprintln!("Failed to extract APK from APKS."),
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactExtractor {
    extension: String,
    output_name: String,
}

impl Default for ArtifactExtractor {
    fn default() -> Self {
        Self {
            extension: APK_EXTENSION.to_string(),
            output_name: EXTRACTED_APK_NAME.to_string(),
        }
    }
}

impl ArtifactExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the package and returns its path, or `None` on any failure.
    ///
    /// Failures are logged and never propagated. A container with no
    /// matching entry also yields `None`; use
    /// [`ArtifactExtractor::try_extract`] to tell the cases apart.
    pub async fn extract(
        &self,
        container: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Option<PathBuf> {
        match self.try_extract(container, output_dir).await {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Failed to extract APK from APKS: {}", e);
                None
            }
        }
    }

    /// Extracts the first entry ending in `.apk` to
    /// `output_dir/extracted.apk`.
    ///
    /// Entries are considered in archive listing order. Later matches are
    /// ignored. The container is opened read-only and never modified. An
    /// existing `extracted.apk` is replaced, so repeated runs converge on
    /// the same file. No other file in `output_dir` is written, and a failed
    /// extraction leaves the directory as it found it.
    ///
    /// # Errors
    ///
    /// * [`Error::ContainerOpen`] - missing, unreadable or corrupt container
    /// * [`Error::ArtifactNotFound`] - valid archive without a matching entry
    /// * [`Error::UnsafeEntryPath`] - entry name escapes `output_dir`
    /// * [`Error::Extraction`] - filesystem failure while writing or moving
    pub async fn try_extract(
        &self,
        container: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let container = container.as_ref().to_path_buf();
        let output_dir = output_dir.as_ref().to_path_buf();
        let extractor = self.clone();

        tokio::task::spawn_blocking(move || extractor.extract_blocking(&container, &output_dir))
            .await?
    }

    fn extract_blocking(&self, container: &Path, output_dir: &Path) -> Result<PathBuf> {
        log::info!("Extracting APK from {}", container.display());

        let mut archive = open_container(container)?;
        let matches = self.matching_entries(&archive);

        let Some(&(index, ref name)) = matches.first() else {
            return Err(Error::ArtifactNotFound {
                container: container.to_path_buf(),
                extension: self.extension.clone(),
            });
        };

        if matches.len() > 1 {
            log::debug!(
                "{} matching entries in {}, using {} and ignoring: {}",
                matches.len(),
                container.display(),
                name,
                matches[1..]
                    .iter()
                    .map(|(_, n)| n.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if archive.by_index(index)?.enclosed_name().is_none() {
            return Err(Error::UnsafeEntryPath { name: name.clone() });
        }

        let created_dirs = missing_dirs(output_dir);
        std::fs::create_dir_all(output_dir)
            .map_err(extraction_error("creating output directory", output_dir))?;

        let target = output_dir.join(&self.output_name);
        if let Err(e) = write_entry(&mut archive, index, output_dir, &target) {
            prune_empty_dirs(&created_dirs);
            return Err(e);
        }

        log::info!("✓ Extracted {} to {}", name, target.display());
        Ok(target)
    }

    /// Indices and names of file entries carrying the target extension, in
    /// archive order.
    fn matching_entries(&self, archive: &ZipArchive<File>) -> Vec<(usize, String)> {
        let suffix = format!(".{}", self.extension);

        (0..archive.len())
            .filter_map(|index| {
                let name = archive.name_for_index(index)?;
                log::debug!("  entry {}: {}", index, name);
                (name.ends_with(&suffix) && !name.ends_with('/')).then(|| (index, name.to_string()))
            })
            .collect()
    }
}

/// Streams entry `index` into a temporary file next to `target`, then moves
/// it into place. The temporary file is removed on every failure path, so
/// nothing but `target` is ever created in `output_dir`.
fn write_entry(
    archive: &mut ZipArchive<File>,
    index: usize,
    output_dir: &Path,
    target: &Path,
) -> Result<()> {
    let mut entry = archive.by_index(index)?;
    let mut partial = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(".part")
        .tempfile_in(output_dir)
        .map_err(extraction_error("creating temporary file in", output_dir))?;

    io::copy(&mut entry, &mut partial).map_err(extraction_error("writing", partial.path()))?;
    partial
        .as_file()
        .sync_all()
        .map_err(extraction_error("flushing", partial.path()))?;

    partial
        .persist(target)
        .map_err(|e| extraction_error("moving entry to", target)(e.error))?;
    Ok(())
}

fn open_container(container: &Path) -> Result<ZipArchive<File>> {
    let open_error = |source| Error::ContainerOpen {
        path: container.to_path_buf(),
        source,
    };

    let file = File::open(container).map_err(|e| open_error(zip::result::ZipError::Io(e)))?;
    ZipArchive::new(file).map_err(open_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn write_container(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, bytes) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(bytes).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn single_entry_is_extracted_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("toc.pb", b"toc"), ("universal.apk", b"apk bytes")]);
        let out = dir.path().join("out");

        let path = ArtifactExtractor::new().extract(&container, &out).await.unwrap();

        assert_eq!(path, out.join(EXTRACTED_APK_NAME));
        assert_eq!(std::fs::read(&path).unwrap(), b"apk bytes");
        assert!(!out.join("universal.apk").exists());
    }

    #[tokio::test]
    async fn first_match_in_listing_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(
            &container,
            &[("splits/base-master.apk", b"master"), ("splits/base-en.apk", b"en")],
        );

        let path = ArtifactExtractor::new()
            .try_extract(&container, dir.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"master");
        assert!(!dir.path().join("splits").exists());
    }

    #[tokio::test]
    async fn nested_entry_keeps_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("standalones/", b""), ("standalones/universal.apk", b"u")]);
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("notes.txt"), b"keep").unwrap();

        let path = ArtifactExtractor::new().try_extract(&container, &out).await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"u");
        assert_eq!(std::fs::read(out.join("notes.txt")).unwrap(), b"keep");
    }

    #[tokio::test]
    async fn no_matching_entry_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("toc.pb", b"toc"), ("apk/", b""), ("readme.apk.txt", b"x")]);

        let extractor = ArtifactExtractor::new();
        let err = extractor.try_extract(&container, dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }));
        assert!(extractor.extract(&container, dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn corrupt_container_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("broken.apks");
        std::fs::write(&container, b"PK\x03\x04 definitely not a zip").unwrap();

        let extractor = ArtifactExtractor::new();
        let err = extractor.try_extract(&container, dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::ContainerOpen { .. }));
        assert!(extractor.extract(&container, dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn missing_container_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactExtractor::new()
            .try_extract(dir.path().join("absent.apks"), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ContainerOpen { .. }));
        assert!(err.to_string().contains("absent.apks"));
    }

    #[tokio::test]
    async fn container_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("universal.apk", b"apk")]);
        let before = std::fs::read(&container).unwrap();

        ArtifactExtractor::new()
            .try_extract(&container, dir.path().join("out"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&container).unwrap(), before);
    }

    #[tokio::test]
    async fn repeated_extraction_gives_same_content() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("universal.apk", b"stable")]);
        let out = dir.path().join("out");
        let extractor = ArtifactExtractor::new();

        let first = extractor.try_extract(&container, &out).await.unwrap();
        let first_bytes = std::fs::read(&first).unwrap();
        let second = extractor.try_extract(&container, &out).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), first_bytes);
    }

    #[tokio::test]
    async fn entry_escaping_output_dir_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("evil.apks");
        write_container(&container, &[("../../escape.apk", b"evil")]);
        let out = dir.path().join("a/b");

        let err = ArtifactExtractor::new()
            .try_extract(&container, &out)
            .await
            .unwrap_err();

        // Some zip versions already refuse such names when reading the archive.
        assert!(matches!(
            err,
            Error::UnsafeEntryPath { .. } | Error::ContainerOpen { .. }
        ));
        assert!(!dir.path().join("escape.apk").exists());
        assert!(!dir.path().join("a").exists());
    }

    /// Stored (uncompressed) container whose entry data has one byte flipped,
    /// so reading it fails the CRC check at end of stream.
    fn write_corrupt_container(path: &Path, name: &str) {
        let payload = b"universal apk payload that will not survive the crc check";
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file(name, options).unwrap();
        zip.write_all(payload).unwrap();
        zip.finish().unwrap();

        let mut bytes = std::fs::read(path).unwrap();
        let offset = bytes
            .windows(payload.len())
            .position(|window| window == payload)
            .unwrap();
        bytes[offset + 3] ^= 0xff;
        std::fs::write(path, bytes).unwrap();
    }

    #[tokio::test]
    async fn failed_write_leaves_output_dir_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_corrupt_container(&container, "splits/universal.apk");
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("notes.txt"), b"keep").unwrap();

        let err = ArtifactExtractor::new()
            .try_extract(&container, &out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Extraction { .. }));
        let left: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![std::ffi::OsString::from("notes.txt")]);
    }

    #[tokio::test]
    async fn failed_write_removes_created_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_corrupt_container(&container, "universal.apk");
        let out = dir.path().join("dist/apk");

        let extractor = ArtifactExtractor::new();
        assert!(extractor.extract(&container, &out).await.is_none());
        assert!(!dir.path().join("dist").exists());
    }

    #[tokio::test]
    async fn file_named_like_entry_is_not_touched() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("app.apks");
        write_container(&container, &[("universal.apk", b"from set")]);
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("universal.apk"), b"user file").unwrap();

        let path = ArtifactExtractor::new().try_extract(&container, &out).await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"from set");
        assert_eq!(std::fs::read(out.join("universal.apk")).unwrap(), b"user file");
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }
}
