//! Runs `bundletool build-apks` for a single request.

use crate::bundler::{
    ConversionRequest, Error, Result, Settings,
    tool::{ProvisionedTool, ToolProvisioner},
    utils::fs,
};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;

/// Subcommand that turns an app bundle into an APK set.
pub const BUILD_APKS: &str = "build-apks";

/// Flags whose values are secrets and must never reach the logs.
const SECRET_FLAGS: [&str; 2] = ["--ks-pass=", "--key-pass="];

/// Converts app bundles into APK sets by running the packaging tool.
///
/// Each call provisions its own copy of the tool and removes it before
/// returning, whatever the outcome. Nothing is shared between calls, so
/// independent requests may run concurrently as long as their output paths
/// differ.
#[derive(Debug, Clone, Copy)]
pub struct ConversionInvoker<'a> {
    settings: &'a Settings,
}

impl<'a> ConversionInvoker<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Converts `request.bundle_path()` into the APK set at
    /// `request.container_output_path()`.
    ///
    /// Returns `true` only if the tool exited with status 0. Failures are
    /// logged and never retried.
    pub async fn convert(&self, request: &ConversionRequest) -> bool {
        match self.try_convert(request).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to convert AAB to APKS: {}", e);
                false
            }
        }
    }

    /// Like [`ConversionInvoker::convert`], but reports why it failed.
    ///
    /// The tool is not launched if the request is incomplete or provisioning
    /// fails. There is no timeout: a tool that never exits blocks this call.
    pub async fn try_convert(&self, request: &ConversionRequest) -> Result<()> {
        request.validate()?;

        let tool = ToolProvisioner::from_settings(self.settings)
            .provision()
            .await?;

        let outcome = self.run(&tool, request).await;

        let tool_path = tool.path().to_path_buf();
        if let Err(e) = tool.close() {
            log::warn!(
                "Failed to remove temporary tool {}: {}",
                tool_path.display(),
                e
            );
        }

        outcome
    }

    async fn run(&self, tool: &ProvisionedTool, request: &ConversionRequest) -> Result<()> {
        self.prepare_output(request.container_output_path()).await?;

        let prefix = self.settings.runtime().launch_prefix(tool.path()).await?;
        let mut args = prefix.args;
        args.extend(build_apks_args(request, self.settings.mode()));

        let command = render_command(&prefix.program, &args);
        log::info!(
            "Converting {} to {}",
            request.bundle_path().display(),
            request.container_output_path().display()
        );
        log::debug!("Running {}", command);

        let status = tokio::process::Command::new(&prefix.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|error| Error::CommandFailed {
                command: command.clone(),
                error,
            })?;

        if !status.success() {
            return Err(Error::ToolExited {
                command,
                code: status.code(),
            });
        }

        log::info!(
            "✓ Created APK set: {}",
            request.container_output_path().display()
        );
        Ok(())
    }

    async fn prepare_output(&self, container: &Path) -> Result<()> {
        if self.settings.overwrite_existing() {
            fs::remove_file_if_exists(container).await?;
        }

        if let Some(parent) = container.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        Ok(())
    }
}

/// Builds the `build-apks` argument vector for `request`.
///
/// Order is fixed: subcommand, bundle, output, keystore, keystore password,
/// key password, key alias, mode. Each flag and its value form a single
/// argument so no shell ever sees the passwords.
pub fn build_apks_args(request: &ConversionRequest, mode: &str) -> Vec<OsString> {
    vec![
        OsString::from(BUILD_APKS),
        flag("--bundle=", request.bundle_path()),
        flag("--output=", request.container_output_path()),
        flag("--ks=", request.keystore_path()),
        flag("--ks-pass=pass:", request.keystore_password()),
        flag("--key-pass=pass:", request.key_password()),
        flag("--ks-key-alias=", request.key_alias()),
        flag("--mode=", mode),
    ]
}

fn flag(name: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(value);
    arg
}

/// Renders a command line for logs with password values masked.
pub fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        let arg = arg.to_string_lossy();
        rendered.push(' ');
        match SECRET_FLAGS.iter().find(|secret| arg.starts_with(*secret)) {
            Some(secret) => {
                rendered.push_str(secret);
                rendered.push_str("pass:****");
            }
            None => rendered.push_str(&arg),
        }
    }
    rendered
}
