//! Colored terminal output.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes status lines to the terminal, honoring quiet and verbose modes.
///
/// Errors always go to stderr and are never silenced.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            stdout_color: color_choice(io::stdout().is_terminal()),
            stderr_color: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Detail line, shown only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            self.stdout_line(None, "  ", message)?;
        }
        Ok(())
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout_line(Some(Color::Green), "✓", message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut err = StandardStream::stderr(self.stderr_color);
        write_prefixed(&mut err, Some(Color::Yellow), "⚠", message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        let mut err = StandardStream::stderr(self.stderr_color);
        write_prefixed(&mut err, Some(Color::Red), "✗", message)
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout_line(Some(Color::Cyan), "→", message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.stdout_color);
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{title}")?;
        out.reset()
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stdout_line(None, " ", message)
    }

    fn stdout_line(&self, color: Option<Color>, prefix: &str, message: &str) -> io::Result<()> {
        let mut out = StandardStream::stdout(self.stdout_color);
        write_prefixed(&mut out, color, prefix, message)
    }
}

fn write_prefixed(
    stream: &mut StandardStream,
    color: Option<Color>,
    prefix: &str,
    message: &str,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(color).set_bold(color.is_some()))?;
    write!(stream, "{prefix}")?;
    stream.reset()?;
    writeln!(stream, " {message}")
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
