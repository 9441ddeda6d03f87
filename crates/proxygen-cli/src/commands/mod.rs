//! Subcommand implementations and the loading steps they share.

pub mod compile;
pub mod generate;
pub mod init_config;
pub mod registries;

use std::path::{Path, PathBuf};

use anyhow::Context;
use proxygen_engine::{
    discover_registries, Diagnostic, DiagnosticSink, HostProfile, InterfaceModel, RegistrySet,
    TypeCatalog, TypeModel,
};

/// Profile looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG: &str = "proxygen.toml";

pub fn load_catalog(path: &Path) -> anyhow::Result<TypeCatalog> {
    TypeCatalog::from_file(path)
        .with_context(|| format!("Failed to load type catalog {}", path.display()))
}

/// Explicit profile, else `./proxygen.toml`, else the built-in defaults
pub fn load_profile(path: Option<&Path>) -> anyhow::Result<HostProfile> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG);
            if !local.is_file() {
                tracing::debug!("no {} found, using default profile", DEFAULT_CONFIG);
                return Ok(HostProfile::default());
            }
            local
        }
    };
    HostProfile::from_file(&path)
        .with_context(|| format!("Failed to load host profile {}", path.display()))
}

/// Registries reachable from the catalog's host root; empty without one
pub fn load_registries(
    catalog: &TypeCatalog,
    profile: &HostProfile,
    sink: &mut dyn DiagnosticSink,
) -> anyhow::Result<RegistrySet> {
    let Some(host) = catalog.host.as_ref() else {
        tracing::debug!("catalog has no host root; no registries");
        return Ok(RegistrySet::empty());
    };
    let Some(root) = catalog.get(host) else {
        sink.emit(Diagnostic::warning(format!(
            "host root {} is not in the catalog; no registries",
            host
        )));
        return Ok(RegistrySet::empty());
    };

    let descriptors = discover_registries(root, catalog, profile, sink);
    RegistrySet::new(descriptors).context("Conflicting registry descriptors")
}

pub fn find_interface<'c>(catalog: &'c TypeCatalog, name: &str) -> anyhow::Result<&'c InterfaceModel> {
    catalog
        .find(name)
        .with_context(|| format!("Interface '{}' not found in catalog", name))
}

/// Interfaces wrapped when none are named: everything except the host root,
/// the registry root and the registry containers
pub fn default_targets<'c>(
    catalog: &'c TypeCatalog,
    profile: &HostProfile,
    registries: &RegistrySet,
) -> Vec<&'c InterfaceModel> {
    let host = catalog.host.as_ref();
    let registry_root = host
        .and_then(|h| catalog.get(h))
        .and_then(|root| {
            root.properties
                .iter()
                .find(|p| p.name == profile.registry_property)
                .map(|p| p.ty.clone())
        });

    catalog
        .iter()
        .filter(|model| {
            let ty = model.type_ref();
            Some(ty) != host
                && Some(ty) != registry_root.as_ref()
                && registries.by_registry(ty).is_none()
        })
        .collect()
}
