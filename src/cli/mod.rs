//! Command line interface for aab2apk.
//!
//! Replaces an interactive form: every input is a flag or environment
//! variable, and the two pipeline stages report distinct exit codes.

mod args;
mod output;
mod report;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;
pub use report::ConversionReport;

use crate::bundler::{
    ArtifactExtractor, ConversionInvoker, builder::checksum::calculate_sha256, error::ErrorExt,
};
use crate::error::{AppError, Result};
use anyhow::Context;
use std::path::Path;

/// Main CLI entry point
///
/// Returns the process exit code. Pipeline failures are reported here and
/// turned into their stage's exit code rather than returned as errors.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::from(&args);

    match execute(&args, &config).await {
        Ok(()) => Ok(0),
        Err(e) => {
            config.error(&e.to_string())?;
            for suggestion in e.recovery_suggestions() {
                config.output().indent(&format!("• {}", suggestion))?;
            }
            Ok(e.exit_code())
        }
    }
}

/// Runs conversion then extraction for parsed arguments.
pub async fn execute(args: &Args, config: &RuntimeConfig) -> Result<()> {
    args.validate()?;
    let request = args
        .conversion_request()
        .context("resolving bundle, APK set and keystore paths")?;
    let settings = args.settings()?;

    log::debug!("Request: {:?}", request);
    config.verbose_println(&format!("Tool: {}", settings.tool().name()))?;

    if !args.overwrite && request.container_output_path().exists() {
        config.warn(&format!(
            "{} already exists and bundletool will not replace it; pass --overwrite",
            request.container_output_path().display()
        ))?;
    }

    config.section("Converting AAB to APKS")?;
    config.progress(&format!(
        "{} -> {}",
        request.bundle_path().display(),
        request.container_output_path().display()
    ))?;
    ConversionInvoker::new(&settings)
        .try_convert(&request)
        .await
        .map_err(AppError::Conversion)?;
    config.success(&format!(
        "Created {}",
        request.container_output_path().display()
    ))?;

    config.section("Extracting APK")?;
    let apk = ArtifactExtractor::new()
        .try_extract(request.container_output_path(), &args.output_dir)
        .await
        .map_err(AppError::Extraction)?;

    let (size, sha256) = describe_apk(&apk).await?;

    let report = ConversionReport {
        bundle: request.bundle_path().to_path_buf(),
        apks: request.container_output_path().to_path_buf(),
        apk: apk.clone(),
        size,
        sha256,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        config.success(&format!(
            "APK extracted successfully. Saved to {}",
            apk.display()
        ))?;
        config.indent(&format!("Size:   {} bytes", report.size))?;
        config.indent(&format!("SHA256: {}", report.sha256))?;
    }

    Ok(())
}

/// Size and SHA-256 of the extracted APK. Failures count as extraction
/// failures.
async fn describe_apk(apk: &Path) -> Result<(u64, String)> {
    let size = tokio::fs::metadata(apk)
        .await
        .fs_context("reading metadata of", apk)
        .map_err(AppError::Extraction)?
        .len();
    let sha256 = calculate_sha256(apk)
        .await
        .map_err(AppError::Extraction)?;

    Ok((size, sha256))
}
