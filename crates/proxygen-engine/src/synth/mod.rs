//! Proxy synthesis
//!
//! A [`ProxySpec`] names the interface to wrap and which member families to
//! convert. It is a plain value: each `with_*` step takes the spec and returns
//! the updated one, and asking for a family twice changes nothing.
//! [`ProxySpec::synthesize`] runs one session and returns the finished unit.
//!
//! # Rewrite rules
//!
//! - Passthrough types are declared and passed unchanged.
//! - A registry-member parameter becomes an integer key; the body resolves
//!   `registry[key]` into a local before use.
//! - A registry-member return value is replaced by its `Id`.
//! - When the wrapped type is itself a registry member, every member takes the
//!   key first and re-resolves the instance on each call.

mod accessors;
mod context;
mod events;
mod methods;
mod session;

use std::collections::BTreeSet;

use crate::config::HostProfile;
use crate::diagnostics::DiagnosticSink;
use crate::emit::emit;
use crate::enumerate::MemberEnumerator;
use crate::model::{TypeModel, TypeSource};
use crate::types::RegistrySet;
use crate::unit::ProxyUnit;

use session::Session;

/// Member families, in the order a session converts them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberFamily {
    Getters,
    Setters,
    Methods,
    Events,
}

impl MemberFamily {
    pub const ALL: [MemberFamily; 4] = [
        MemberFamily::Getters,
        MemberFamily::Setters,
        MemberFamily::Methods,
        MemberFamily::Events,
    ];
}

#[derive(Clone)]
pub struct ProxySpec<'a> {
    wrapped: &'a dyn TypeModel,
    types: &'a dyn TypeSource,
    registries: &'a RegistrySet,
    profile: &'a HostProfile,
    families: BTreeSet<MemberFamily>,
}

impl<'a> ProxySpec<'a> {
    pub fn new(
        wrapped: &'a dyn TypeModel,
        types: &'a dyn TypeSource,
        registries: &'a RegistrySet,
        profile: &'a HostProfile,
    ) -> Self {
        Self {
            wrapped,
            types,
            registries,
            profile,
            families: BTreeSet::new(),
        }
    }

    pub fn with(mut self, family: MemberFamily) -> Self {
        self.families.insert(family);
        self
    }

    pub fn with_getters(self) -> Self {
        self.with(MemberFamily::Getters)
    }

    pub fn with_setters(self) -> Self {
        self.with(MemberFamily::Setters)
    }

    pub fn with_methods(self) -> Self {
        self.with(MemberFamily::Methods)
    }

    pub fn with_events(self) -> Self {
        self.with(MemberFamily::Events)
    }

    pub fn with_all(self) -> Self {
        MemberFamily::ALL.into_iter().fold(self, ProxySpec::with)
    }

    pub fn families(&self) -> impl Iterator<Item = MemberFamily> + '_ {
        self.families.iter().copied()
    }

    /// Run one synthesis session
    pub fn synthesize(&self, sink: &mut dyn DiagnosticSink) -> ProxyUnit {
        let ty = self.wrapped.type_ref();
        let _span = tracing::debug_span!("synthesize", ty = %ty).entered();

        let members = MemberEnumerator::new(self.types, self.profile.out_params).enumerate(self.wrapped);
        let mut session = Session::new(ty, self.registries, self.profile, sink);

        for family in &self.families {
            match family {
                MemberFamily::Getters => session.add_getters(&members.getters),
                MemberFamily::Setters => session.add_setters(&members.setters),
                MemberFamily::Methods => session.add_methods(&members.methods, &members.rejected),
                MemberFamily::Events => session.add_events(&members.events),
            }
        }

        session.finish()
    }

    /// Synthesize and render to source text
    pub fn generate_source(&self, sink: &mut dyn DiagnosticSink) -> String {
        emit(&self.synthesize(sink))
    }
}
