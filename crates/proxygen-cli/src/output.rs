//! Colored terminal output
//!
//! Uses `termcolor` for cross-platform colored output.
//! Respects `NO_COLOR` and the `--color` flag.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use proxygen_engine::{Diagnostic, DiagnosticSink, Severity};

/// Resolve `ColorChoice` from the CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Styled writer over stdout (results) and stderr (diagnostics)
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
    errors: usize,
    warnings: usize,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
            errors: 0,
            warnings: 0,
        }
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), false);
    }

    /// Bold text.
    pub fn bold(&mut self, text: &str) {
        self.write_styled(text, None, true);
    }

    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.stdout);
    }

    /// One diagnostic on stderr, severity label colored
    pub fn diagnostic(&mut self, diagnostic: &Diagnostic) {
        let (label, color) = match diagnostic.severity {
            Severity::Error => {
                self.errors += 1;
                ("error", Color::Red)
            }
            Severity::Warning => {
                self.warnings += 1;
                ("warning", Color::Yellow)
            }
            Severity::Note => ("note", Color::Cyan),
        };

        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", label);
        if let Some(code) = diagnostic.code {
            let _ = write!(self.stderr, "[{}]", code.as_str());
        }
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, ": {}", diagnostic.message);
    }

    /// Summary line on stderr, if anything was reported
    pub fn summary(&mut self) {
        if self.errors == 0 && self.warnings == 0 {
            return;
        }
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = writeln!(
            self.stderr,
            "{} error(s), {} warning(s)",
            self.errors, self.warnings
        );
        let _ = self.stderr.reset();
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}

impl DiagnosticSink for StyledOutput {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostic(&diagnostic);
    }
}
