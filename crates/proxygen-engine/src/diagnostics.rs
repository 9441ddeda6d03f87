//! Diagnostics channel
//!
//! Every synthesis and compile call takes an explicit [`DiagnosticSink`].
//! There is no ambient default: callers pick a collector, a callback, or the
//! tracing forwarder.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Diagnostic code (e.g. "PG0001")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticCode(pub &'static str);

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Method with an output-only parameter was skipped
pub const OUT_PARAM_REJECTED: DiagnosticCode = DiagnosticCode("PG0001");
/// Output-only argument replaced by a discard
pub const OUT_PARAM_DISCARDED: DiagnosticCode = DiagnosticCode("PG0002");
/// Sequence of registry members returned without id substitution
pub const SEQUENCE_LEAK: DiagnosticCode = DiagnosticCode("PG0003");
/// Events are not forwarded for registry-member proxies
pub const EVENTS_UNSUPPORTED: DiagnosticCode = DiagnosticCode("PG0004");
/// Registry container skipped during discovery
pub const REGISTRY_SKIPPED: DiagnosticCode = DiagnosticCode("PG0005");
/// Line reported by a compiler backend
pub const COMPILER_OUTPUT: DiagnosticCode = DiagnosticCode("PG0100");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<DiagnosticCode>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{}]: {}", self.severity, code.as_str(), self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in order
impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Adapts a single-string callback
pub struct FnSink<F>(pub F);

impl<F: FnMut(&str)> DiagnosticSink for FnSink<F> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (self.0)(&diagnostic.to_string());
    }
}

/// Forwards diagnostics to `tracing` at the matching level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let code = diagnostic.code.map(|c| c.as_str()).unwrap_or("-");
        match diagnostic.severity {
            Severity::Error => tracing::error!(code, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(code, "{}", diagnostic.message),
            Severity::Note => tracing::info!(code, "{}", diagnostic.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let diag = Diagnostic::warning("skipped").with_code(OUT_PARAM_REJECTED);
        assert_eq!(diag.to_string(), "warning[PG0001]: skipped");
        assert_eq!(Diagnostic::error("boom").to_string(), "error: boom");
    }

    #[test]
    fn test_fn_sink_receives_rendered_lines() {
        let mut lines = Vec::new();
        {
            let mut sink = FnSink(|line: &str| lines.push(line.to_string()));
            sink.emit(Diagnostic::note("one"));
            sink.emit(Diagnostic::error("two"));
        }
        assert_eq!(lines, vec!["note: one", "error: two"]);
    }
}
