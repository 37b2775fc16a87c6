//! How the provisioned tool file gets launched.

use crate::bundler::{Error, Result, builder::tool_detection};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Launch strategy for the provisioned packaging tool.
///
/// bundletool ships as a jar, so the default runs it through `java -jar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolRuntime {
    /// `java -jar <tool>`. With no explicit path, `java` is located via
    /// `JAVA_HOME` or `PATH` on first use.
    Java { java: Option<PathBuf> },

    /// `<program> <args...> <tool>`, e.g. a wrapper script interpreter.
    Interpreter { program: PathBuf, args: Vec<OsString> },

    /// The tool file itself is executable.
    Native,
}

impl Default for ToolRuntime {
    fn default() -> Self {
        Self::Java { java: None }
    }
}

impl ToolRuntime {
    /// Runs the tool with a specific `java` binary.
    pub fn java(java: impl Into<PathBuf>) -> Self {
        Self::Java {
            java: Some(java.into()),
        }
    }

    /// Runs the tool through `program`, passing `args` before the tool path.
    pub fn interpreter<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self::Interpreter {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the provisioned file must carry execute permission.
    pub fn needs_executable_tool(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Resolves the program to spawn and the arguments that precede the
    /// tool path.
    ///
    /// For [`ToolRuntime::Native`] the program is the tool itself and the
    /// prefix carries no arguments.
    pub(crate) async fn launch_prefix(&self, tool: &std::path::Path) -> Result<LaunchPrefix> {
        match self {
            Self::Java { java } => {
                let program = match java {
                    Some(path) => path.clone(),
                    None => tool_detection::java().await?.ok_or_else(|| Error::CommandFailed {
                        command: "java".to_string(),
                        error: io::Error::new(
                            io::ErrorKind::NotFound,
                            "java not found. Install a JDK, set JAVA_HOME, or pass --java",
                        ),
                    })?,
                };
                Ok(LaunchPrefix {
                    program,
                    args: vec![OsString::from("-jar"), tool.as_os_str().to_owned()],
                })
            }
            Self::Interpreter { program, args } => {
                let mut prefix = args.clone();
                prefix.push(tool.as_os_str().to_owned());
                Ok(LaunchPrefix {
                    program: program.clone(),
                    args: prefix,
                })
            }
            Self::Native => Ok(LaunchPrefix {
                program: tool.to_path_buf(),
                args: Vec::new(),
            }),
        }
    }
}

/// Program plus the leading arguments that select the tool.
#[derive(Debug)]
pub(crate) struct LaunchPrefix {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}
