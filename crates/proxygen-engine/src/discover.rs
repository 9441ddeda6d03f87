//! Registry discovery from host metadata
//!
//! The host root exposes a registry-of-registries property. Each of its
//! properties is a container; a container whose (possibly inherited)
//! interfaces include the generic registry marker yields one descriptor whose
//! member type is the marker's single argument.

use rustc_hash::FxHashSet;

use crate::config::HostProfile;
use crate::diagnostics::{Diagnostic, DiagnosticSink, REGISTRY_SKIPPED};
use crate::model::{TypeModel, TypeSource};
use crate::types::{RegistryDescriptor, TypeRef};

/// Discover registry descriptors reachable from `host_root`
///
/// Containers that cannot be resolved or carry no marker are reported to
/// `sink` and left out; the result is in property order.
pub fn discover_registries(
    host_root: &dyn TypeModel,
    types: &dyn TypeSource,
    profile: &HostProfile,
    sink: &mut dyn DiagnosticSink,
) -> Vec<RegistryDescriptor> {
    let root = host_root.type_ref();
    let Some(registry_prop) = host_root
        .properties()
        .into_iter()
        .find(|p| p.name == profile.registry_property)
    else {
        sink.emit(
            Diagnostic::warning(format!(
                "{} has no '{}' property; no registries discovered",
                root, profile.registry_property
            ))
            .with_code(REGISTRY_SKIPPED),
        );
        return Vec::new();
    };

    let Some(registry_root) = types.lookup(&registry_prop.ty) else {
        sink.emit(
            Diagnostic::warning(format!("registry root type {} is not available", registry_prop.ty))
                .with_code(REGISTRY_SKIPPED),
        );
        return Vec::new();
    };

    let mut descriptors = Vec::new();
    for prop in registry_root.properties() {
        if profile
            .excluded_registries
            .iter()
            .any(|fragment| prop.ty.simple_name().contains(fragment.as_str()))
        {
            tracing::debug!(registry = %prop.name, container = %prop.ty, "excluded by profile");
            continue;
        }

        match registry_member_type(&prop.ty, types, &profile.registry_marker) {
            Some(member_type) => {
                tracing::debug!(registry = %prop.name, member = %member_type, "registry discovered");
                descriptors.push(RegistryDescriptor::new(
                    prop.name.clone(),
                    prop.ty.clone(),
                    member_type,
                ));
            }
            None => sink.emit(
                Diagnostic::warning(format!(
                    "{}.{} ({}) does not implement {}<T>; skipped",
                    registry_prop.ty, prop.name, prop.ty, profile.registry_marker
                ))
                .with_code(REGISTRY_SKIPPED),
            ),
        }
    }
    descriptors
}

/// Member type of `container`, found through its implemented interfaces
fn registry_member_type(container: &TypeRef, types: &dyn TypeSource, marker: &str) -> Option<TypeRef> {
    let mut visited = FxHashSet::default();
    let mut pending = vec![container.clone()];

    while let Some(ty) = pending.pop() {
        if !visited.insert(ty.clone()) {
            continue;
        }
        let Some(model) = types.lookup(&ty) else {
            continue;
        };
        for iface in model.implemented_interfaces() {
            if iface.name() == marker && iface.args().len() == 1 {
                return Some(iface.args()[0].clone());
            }
            pending.push(iface);
        }
    }
    None
}
