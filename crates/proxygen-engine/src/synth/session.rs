use crate::classify::{registry_member, WrappedKind};
use crate::config::HostProfile;
use crate::diagnostics::{Diagnostic, DiagnosticSink, SEQUENCE_LEAK};
use crate::naming::alphabetic;
use crate::types::{RegistryDescriptor, RegistrySet, TypeRef};
use crate::unit::{Expr, FieldRef, Method, ProxyUnit, UnitAssembler};

use super::context::MemberContext;

/// State of one synthesis run; owns the unit under construction
pub(super) struct Session<'a, 's> {
    pub(super) registries: &'a RegistrySet,
    pub(super) profile: &'a HostProfile,
    pub(super) wrapped_type: TypeRef,
    pub(super) kind: WrappedKind<'a>,
    /// Field holding the wrapped object, or its registry for members
    pub(super) wrapped: FieldRef,
    pub(super) unit: UnitAssembler,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'a, 's> Session<'a, 's> {
    pub(super) fn new(
        ty: &TypeRef,
        registries: &'a RegistrySet,
        profile: &'a HostProfile,
        sink: &'s mut dyn DiagnosticSink,
    ) -> Self {
        let base = alphabetic(ty.simple_name());
        let mut unit = UnitAssembler::new(
            format!("{}{}", base, profile.namespace_suffix),
            format!("{}{}", base, profile.class_suffix),
            profile.name_prefix.clone(),
        );

        let kind = WrappedKind::of(ty, registries, profile);
        let wrapped = match &kind {
            WrappedKind::Plain => unit.constructor_field(ty),
            WrappedKind::RegistryMember(d) | WrappedKind::RegistryContainer(d) => {
                unit.fixed_field(&d.registry_type, profile.registry_path_for(&d.name))
            }
            WrappedKind::FixedSingleton(path) => {
                unit.fixed_field(ty, profile.singleton_path_for(path))
            }
        };
        tracing::debug!(class = unit.class_name(), ?kind, "proxy shell initialized");

        Self {
            registries,
            profile,
            wrapped_type: ty.clone(),
            kind,
            wrapped,
            unit,
            sink,
        }
    }

    pub(super) fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    /// Descriptor of the wrapped type when every member re-resolves it by key
    pub(super) fn wrapped_member(&self) -> Option<&'a RegistryDescriptor> {
        match self.kind {
            WrappedKind::RegistryMember(d) => Some(d),
            _ => None,
        }
    }

    /// Start a member whose target is the wrapped object.
    ///
    /// Returns the context and the expression to read or invoke on: the
    /// wrapped field, or a local resolved from the leading key parameter.
    pub(super) fn begin_member(
        &mut self,
        name: impl Into<String>,
        return_type: TypeRef,
    ) -> (MemberContext<'_, 'a>, Expr) {
        let member = self.wrapped_member();
        let mut cx = MemberContext::new(&mut self.unit, self.registries, name, return_type);
        let target = match member {
            Some(descriptor) => cx.resolve_instance(descriptor, &self.wrapped),
            None => self.wrapped.expr(),
        };
        (cx, target)
    }

    /// Warn when a sequence of registry members would leak object references
    pub(super) fn check_return_shape(&mut self, member: &str, ty: &TypeRef) {
        let Some(element) = ty.sequence_element() else {
            return;
        };
        if registry_member(element, self.registries).is_some() {
            let message = format!(
                "{}.{} returns {}; elements are passed through without id substitution",
                self.wrapped_type, member, ty
            );
            self.diagnose(Diagnostic::warning(message).with_code(SEQUENCE_LEAK));
        }
    }

    pub(super) fn push_method(&mut self, method: Method) {
        tracing::trace!(method = %method.name, params = method.params.len(), "member synthesized");
        self.unit.push_method(method);
    }

    pub(super) fn finish(self) -> ProxyUnit {
        self.unit.finish()
    }
}
