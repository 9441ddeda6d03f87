//! External compiler backend
//!
//! Writes the source to a scratch directory and runs a command built from an
//! argument template. Placeholders:
//!
//! - `{source}`: path of the rendered `.cs` file
//! - `{out}`: path the image must be written to
//! - `{references}`: expands to one argument per reference, each rendered
//!   through the reference template (`-r:{reference}` by default)

use std::fs;
use std::path::Path;
use std::process::Command;

use super::{BackendOutput, CompileRequest, CompilerBackend};
use crate::error::{ProxyGenError, ProxyGenResult};

/// Runs an external C# compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    reference_arg: String,
}

impl CommandBackend {
    /// `program` with the `csc` argument template
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![
                "-nologo".to_string(),
                "-target:library".to_string(),
                "-out:{out}".to_string(),
                "{references}".to_string(),
                "{source}".to_string(),
            ],
            reference_arg: "-r:{reference}".to_string(),
        }
    }

    pub fn csc() -> Self {
        Self::new("csc")
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reference_arg(mut self, template: impl Into<String>) -> Self {
        self.reference_arg = template.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Expand the argument template
    fn command_args(&self, source: &Path, out: &Path, references: &[String]) -> Vec<String> {
        let source = source.to_string_lossy();
        let out = out.to_string_lossy();
        let mut expanded = Vec::with_capacity(self.args.len() + references.len());
        for arg in &self.args {
            if arg == "{references}" {
                expanded.extend(
                    references
                        .iter()
                        .map(|r| self.reference_arg.replace("{reference}", r)),
                );
            } else {
                expanded.push(arg.replace("{source}", &source).replace("{out}", &out));
            }
        }
        expanded
    }

    fn backend_error(&self, message: impl Into<String>) -> ProxyGenError {
        ProxyGenError::Backend {
            backend: self.program.clone(),
            message: message.into(),
        }
    }
}

impl CompilerBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn build(&self, request: &CompileRequest<'_>) -> ProxyGenResult<BackendOutput> {
        let dir = tempfile::tempdir()?;
        let source_path = dir.path().join(format!("{}.cs", request.unit.class_name));
        let out_path = dir.path().join(format!("{}.dll", request.unit.class_name));
        fs::write(&source_path, request.source)?;

        let args = self.command_args(&source_path, &out_path, request.references);
        tracing::debug!(program = %self.program, ?args, "running compiler");
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(dir.path())
            .output()
            .map_err(|e| self.backend_error(format!("failed to start: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let lines: Vec<&str> = stdout
            .lines()
            .chain(stderr.lines())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut errors: Vec<String> = lines
            .iter()
            .filter(|l| is_error_line(l))
            .map(|l| l.to_string())
            .collect();

        if !output.status.success() && errors.is_empty() {
            errors = lines.iter().map(|l| l.to_string()).collect();
            if errors.is_empty() {
                errors.push(format!("{} exited with {}", self.program, output.status));
            }
        }
        if !errors.is_empty() {
            return Ok(BackendOutput {
                errors,
                image: None,
            });
        }

        let image = fs::read(&out_path).map_err(|e| {
            self.backend_error(format!("no image at {}: {}", out_path.display(), e))
        })?;
        Ok(BackendOutput {
            errors: Vec::new(),
            image: Some(image),
        })
    }
}

/// `file(1,2): error CS0103: ...` or a bare `error ...` line
fn is_error_line(line: &str) -> bool {
    line.contains(": error ") || line.starts_with("error")
}
