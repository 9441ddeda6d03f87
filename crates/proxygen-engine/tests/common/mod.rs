//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use proxygen_engine::{
    discover_registries, Diagnostic, HostProfile, RegistryDescriptor, RegistrySet, TypeCatalog,
    TypeRef,
};

pub const ELEMENT: &str = "SuperMemoAssistant.Interop.SuperMemo.Registry.Members.IElement";
pub const ELEMENT_REGISTRY: &str =
    "SuperMemoAssistant.Interop.SuperMemo.Registry.Models.IElementRegistry";
pub const ELEMENT_WDW: &str = "SuperMemoAssistant.Interop.SuperMemo.UI.Element.IElementWdw";
pub const COLLECTION: &str = "SuperMemoAssistant.Interop.SuperMemo.Core.ISMCollection";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn host_catalog() -> TypeCatalog {
    TypeCatalog::from_file(&fixture_path("supermemo.json")).unwrap()
}

/// Registries discovered from the fixture's host root
pub fn host_registries(catalog: &TypeCatalog, profile: &HostProfile) -> RegistrySet {
    let host = catalog.host.as_ref().and_then(|h| catalog.get(h)).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    RegistrySet::new(discover_registries(host, catalog, profile, &mut diagnostics)).unwrap()
}

/// Single Element registry over `Ns` types, for hand-built catalogs
pub fn element_registry() -> RegistrySet {
    RegistrySet::new(vec![RegistryDescriptor::new(
        "Element",
        TypeRef::new("Ns.IElementRegistry"),
        TypeRef::new("Ns.IElement"),
    )])
    .unwrap()
}

pub fn t(name: &str) -> TypeRef {
    TypeRef::new(name)
}
