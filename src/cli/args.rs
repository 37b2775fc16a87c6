//! Command line argument parsing and validation.

use crate::bundler::{self, ConversionRequest, Settings, SettingsBuilder, ToolAsset, ToolRuntime};
use crate::error::CliError;
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Convert an Android App Bundle into a signed universal APK
#[derive(Parser, Debug)]
#[command(
    name = "aab2apk",
    version,
    about = "Convert an Android App Bundle (.aab) into a signed universal APK",
    long_about = "Converts an Android App Bundle into a single installable APK.

Runs `bundletool build-apks --mode=universal` on a temporary copy of bundletool,
then extracts the universal APK from the resulting .apks file as extracted.apk.

Usage:
  aab2apk --bundle app.aab --output-dir dist --ks release.jks --ks-key-alias upload \\
          --bundletool bundletool-all.jar
  AAB2APK_KS_PASS=... AAB2APK_KEY_PASS=... aab2apk -b app.aab -o dist --ks release.jks --ks-key-alias upload

Exit codes: 0 = success, 1 = invalid arguments, 2 = usage error, 3 = conversion failed,
4 = extraction failed."
)]
pub struct Args {
    /// Android App Bundle (.aab) to convert
    #[arg(short = 'b', long, value_name = "AAB")]
    pub bundle: PathBuf,

    /// APK set written by bundletool [default: <AAB> with .apks extension]
    #[arg(long, value_name = "APKS")]
    pub apks: Option<PathBuf>,

    /// Directory receiving extracted.apk (created if missing)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Keystore used to sign the APKs
    #[arg(long = "ks", value_name = "KEYSTORE")]
    pub keystore: PathBuf,

    /// Keystore password
    #[arg(long = "ks-pass", env = "AAB2APK_KS_PASS", hide_env_values = true, value_name = "PASSWORD")]
    pub keystore_password: String,

    /// Alias of the signing key inside the keystore
    #[arg(long = "ks-key-alias", env = "AAB2APK_KS_KEY_ALIAS", value_name = "ALIAS")]
    pub key_alias: String,

    /// Password of the signing key
    #[arg(long = "key-pass", env = "AAB2APK_KEY_PASS", hide_env_values = true, value_name = "PASSWORD")]
    pub key_password: String,

    /// bundletool jar to run [default: the embedded copy, if built in]
    #[arg(long, env = "BUNDLETOOL_JAR", value_name = "JAR")]
    pub bundletool: Option<PathBuf>,

    /// Java launcher [default: $JAVA_HOME/bin/java, then java on PATH]
    #[arg(long, value_name = "JAVA", conflicts_with = "launcher")]
    pub java: Option<PathBuf>,

    /// Run the tool as `<PROGRAM> <tool> build-apks ...` instead of `java -jar`
    #[arg(long, value_name = "PROGRAM")]
    pub launcher: Option<PathBuf>,

    /// Replace an existing APK set at the --apks path
    #[arg(long)]
    pub overwrite: bool,

    /// Print a JSON report instead of status lines
    #[arg(long)]
    pub json: bool,

    /// Suppress status output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Checks that every required value is present and the inputs exist.
    pub fn validate(&self) -> Result<(), CliError> {
        let required = [
            ("--bundle", self.bundle.as_os_str().is_empty()),
            ("--output-dir", self.output_dir.as_os_str().is_empty()),
            ("--ks", self.keystore.as_os_str().is_empty()),
            ("--ks-pass", self.keystore_password.is_empty()),
            ("--ks-key-alias", self.key_alias.is_empty()),
            ("--key-pass", self.key_password.is_empty()),
        ];
        if let Some((argument, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(CliError::MissingArgument {
                argument: argument.to_string(),
            });
        }

        for (label, path) in [("Bundle", &self.bundle), ("Keystore", &self.keystore)] {
            if !path.is_file() {
                return Err(CliError::InvalidArguments {
                    reason: format!("{} not found: {}", label, path.display()),
                });
            }
        }

        if self.apks.as_deref() == Some(self.bundle.as_path()) {
            return Err(CliError::InvalidArguments {
                reason: "--apks must differ from --bundle".to_string(),
            });
        }

        Ok(())
    }

    /// APK set path, defaulting to the bundle path with an `.apks` extension.
    pub fn apks_path(&self) -> PathBuf {
        self.apks
            .clone()
            .unwrap_or_else(|| self.bundle.with_extension("apks"))
    }

    /// Builds the conversion request with absolute paths.
    pub fn conversion_request(&self) -> std::io::Result<ConversionRequest> {
        Ok(ConversionRequest::new(
            absolute(&self.bundle)?,
            absolute(&self.apks_path())?,
            absolute(&self.keystore)?,
            self.keystore_password.clone(),
            self.key_alias.clone(),
            self.key_password.clone(),
        ))
    }

    /// Builds bundler settings from the tool-related flags.
    pub fn settings(&self) -> bundler::Result<Settings> {
        let mut builder = SettingsBuilder::new().overwrite_existing(self.overwrite);

        if let Some(jar) = &self.bundletool {
            builder = builder.tool(ToolAsset::from_file(jar));
        }

        let runtime = match (&self.launcher, &self.java) {
            (Some(program), _) => ToolRuntime::interpreter(program, Vec::<String>::new()),
            (None, Some(java)) => ToolRuntime::java(java),
            (None, None) => ToolRuntime::default(),
        };

        builder.runtime(runtime).build()
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        // JSON mode owns stdout
        let output = super::OutputManager::new(args.verbose, args.quiet || args.json);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
