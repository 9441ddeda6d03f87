//! Engine errors

use thiserror::Error;

use crate::config::ConfigError;

pub type ProxyGenResult<T> = Result<T, ProxyGenError>;

#[derive(Debug, Error)]
pub enum ProxyGenError {
    #[error("Registry descriptor '{name}' duplicates the {role} type {ty}")]
    DuplicateDescriptor {
        name: String,
        role: &'static str,
        ty: String,
    },

    #[error("Service compilation failed with {} errors", diagnostics.len())]
    Compilation { diagnostics: Vec<String> },

    #[error("Compiler backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    #[error("Invalid type name '{name}': {message}")]
    InvalidTypeName { name: String, message: String },

    #[error("Type catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyGenError {
    /// Diagnostics carried by a compilation failure, empty for other errors
    pub fn diagnostics(&self) -> &[String] {
        match self {
            ProxyGenError::Compilation { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}
