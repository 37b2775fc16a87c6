//! Shared fixtures: APK set archives and a scripted stand-in for bundletool.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Writes a zip archive with `entries` in the given order.
pub fn write_apk_set(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, bytes) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// A shell script that behaves like `bundletool build-apks`.
///
/// It is run as `sh <copy> build-apks --bundle=... --output=...`, so `$0` is
/// the provisioned copy. Every invocation appends that path to `tool.log`
/// and writes each argument on its own line to `args.log`.
pub struct MockTool {
    pub script: PathBuf,
    pub tool_log: PathBuf,
    pub args_log: PathBuf,
}

impl MockTool {
    /// Copies `apk_set` to the `--output=` path, then exits with `exit_code`.
    /// With no `apk_set`, nothing is written.
    pub fn new(dir: &Path, apk_set: Option<&Path>, exit_code: i32) -> Self {
        let script = dir.join("bundletool.sh");
        let tool_log = dir.join("tool.log");
        let args_log = dir.join("args.log");

        let copy = match apk_set {
            Some(source) => format!("cp '{}' \"$out\"\n", source.display()),
            None => String::new(),
        };
        let body = format!(
            "printf '%s\\n' \"$0\" >> '{tool_log}'\n\
             : > '{args_log}'\n\
             out=\n\
             for arg in \"$@\"; do\n\
             \x20 printf '%s\\n' \"$arg\" >> '{args_log}'\n\
             \x20 case \"$arg\" in --output=*) out=\"${{arg#--output=}}\" ;; esac\n\
             done\n\
             {copy}\
             exit {exit_code}\n",
            tool_log = tool_log.display(),
            args_log = args_log.display(),
        );
        std::fs::write(&script, body).unwrap();

        Self {
            script,
            tool_log,
            args_log,
        }
    }

    /// Paths of the provisioned copies the script ran from.
    pub fn invocations(&self) -> Vec<PathBuf> {
        std::fs::read_to_string(&self.tool_log)
            .unwrap_or_default()
            .lines()
            .map(PathBuf::from)
            .collect()
    }

    /// Arguments of the most recent invocation.
    pub fn last_args(&self) -> Vec<String> {
        std::fs::read_to_string(&self.args_log)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Number of entries in `dir`.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
