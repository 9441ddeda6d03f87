//! Compilation of proxy units
//!
//! [`compile`] renders a unit, hands the source to a [`CompilerBackend`] and
//! either returns an [`Artifact`] or fails with every diagnostic the backend
//! reported. Nothing is returned on failure.

mod check;
mod command;

pub use check::{check_unit, CheckBackend};
pub use command::CommandBackend;

use crate::diagnostics::{Diagnostic, DiagnosticSink, COMPILER_OUTPUT};
use crate::emit::emit;
use crate::error::{ProxyGenError, ProxyGenResult};
use crate::unit::ProxyUnit;

/// Input handed to a backend
pub struct CompileRequest<'a> {
    pub unit: &'a ProxyUnit,
    pub source: &'a str,
    pub references: &'a [String],
}

/// What a backend reports back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOutput {
    /// One entry per error line; empty means success
    pub errors: Vec<String>,
    /// Compiled image, for backends that produce one
    pub image: Option<Vec<u8>>,
}

pub trait CompilerBackend {
    fn name(&self) -> &str;

    /// Build the request. `Err` is reserved for failing to run at all;
    /// compiler errors go in [`BackendOutput::errors`].
    fn build(&self, request: &CompileRequest<'_>) -> ProxyGenResult<BackendOutput>;
}

/// A successfully compiled proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub assembly_name: String,
    pub source: String,
    pub references: Vec<String>,
    pub image: Option<Vec<u8>>,
}

/// Compile `unit` against `references`
///
/// Every backend error is emitted to `sink` before the combined
/// [`ProxyGenError::Compilation`] is returned.
pub fn compile(
    unit: &ProxyUnit,
    references: &[String],
    backend: &dyn CompilerBackend,
    sink: &mut dyn DiagnosticSink,
) -> ProxyGenResult<Artifact> {
    let source = emit(unit);
    let request = CompileRequest {
        unit,
        source: &source,
        references,
    };

    tracing::debug!(
        backend = backend.name(),
        class = %unit.class_name,
        references = references.len(),
        "compiling proxy"
    );
    let output = backend.build(&request)?;

    if !output.errors.is_empty() {
        for error in &output.errors {
            sink.emit(Diagnostic::error(error.clone()).with_code(COMPILER_OUTPUT));
        }
        return Err(ProxyGenError::Compilation {
            diagnostics: output.errors,
        });
    }

    sink.emit(Diagnostic::note(format!(
        "Service {} compiled successfully",
        unit.class_name
    )));
    Ok(Artifact {
        assembly_name: unit.class_name.clone(),
        source,
        references: references.to_vec(),
        image: output.image,
    })
}
