//! Type classification against the registry descriptors

use crate::config::HostProfile;
use crate::types::{RegistryDescriptor, RegistrySet, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'r> {
    PassThrough,
    RegistryMember(&'r RegistryDescriptor),
    RegistryContainer(&'r RegistryDescriptor),
}

/// Classify a type. Total: every type lands in exactly one variant.
pub fn classify<'r>(ty: &TypeRef, registries: &'r RegistrySet) -> Classification<'r> {
    if let Some(descriptor) = registries.by_member(ty) {
        Classification::RegistryMember(descriptor)
    } else if let Some(descriptor) = registries.by_registry(ty) {
        Classification::RegistryContainer(descriptor)
    } else {
        Classification::PassThrough
    }
}

/// Registry member descriptor of `ty`, if any
pub fn registry_member<'r>(ty: &TypeRef, registries: &'r RegistrySet) -> Option<&'r RegistryDescriptor> {
    match classify(ty, registries) {
        Classification::RegistryMember(descriptor) => Some(descriptor),
        _ => None,
    }
}

/// How the proxy reaches the object it wraps, decided once per session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedKind<'r> {
    /// Injected through the constructor
    Plain,
    /// Re-resolved from its registry on every call
    RegistryMember(&'r RegistryDescriptor),
    /// The registry itself, read from the service locator
    RegistryContainer(&'r RegistryDescriptor),
    /// Fixed service-locator path
    FixedSingleton(String),
}

impl<'r> WrappedKind<'r> {
    pub fn of(ty: &TypeRef, registries: &'r RegistrySet, profile: &HostProfile) -> Self {
        match classify(ty, registries) {
            Classification::RegistryMember(d) => WrappedKind::RegistryMember(d),
            Classification::RegistryContainer(d) => WrappedKind::RegistryContainer(d),
            Classification::PassThrough => match profile.singleton(ty.name()) {
                Some(binding) => WrappedKind::FixedSingleton(binding.path.clone()),
                None => WrappedKind::Plain,
            },
        }
    }
}
