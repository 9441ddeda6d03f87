//! Proxygen Engine
//!
//! Synthesizes boundary-safe proxy classes for interface-based host APIs.
//!
//! This crate provides:
//! - A type model ([`TypeModel`], [`TypeSource`]) with a JSON-backed [`TypeCatalog`]
//! - Registry classification and discovery
//! - The proxy rewrite rules ([`ProxySpec`])
//! - C# emission and pluggable compilation backends
//!
//! # Usage
//!
//! ```ignore
//! use proxygen_engine::{HostProfile, ProxySpec, RegistrySet, TypeCatalog};
//!
//! let catalog = TypeCatalog::from_file(path)?;
//! let registries = RegistrySet::new(descriptors)?;
//! let profile = HostProfile::default();
//!
//! let wrapped = catalog.find("IElement").unwrap();
//! let mut diagnostics = Vec::new();
//! let source = ProxySpec::new(wrapped, &catalog, &registries, &profile)
//!     .with_all()
//!     .generate_source(&mut diagnostics);
//! ```

pub mod classify;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod discover;
pub mod emit;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod naming;
pub mod synth;
pub mod types;
pub mod unit;

pub use classify::{classify, Classification, WrappedKind};
pub use compile::{
    compile, Artifact, BackendOutput, CheckBackend, CommandBackend, CompileRequest,
    CompilerBackend,
};
pub use config::{ConfigError, HostProfile, OutParamPolicy, SingletonBinding};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, FnSink, Severity, TracingSink};
pub use discover::discover_registries;
pub use emit::emit;
pub use enumerate::{MemberEnumerator, MemberSet};
pub use error::{ProxyGenError, ProxyGenResult};
pub use model::{
    EventInfo, InterfaceModel, MethodInfo, ParamDirection, ParamInfo, PropertyInfo, TypeCatalog,
    TypeModel, TypeSource,
};
pub use synth::{MemberFamily, ProxySpec};
pub use types::{RegistryDescriptor, RegistrySet, TypeRef};
pub use unit::{ProxyUnit, UnitAssembler};
