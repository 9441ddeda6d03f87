//! Member enumeration with interface inheritance merging

use rustc_hash::FxHashSet;

use crate::config::OutParamPolicy;
use crate::model::{EventInfo, MethodInfo, TypeModel, TypeSource};
use crate::types::TypeRef;

/// Convertible members of one interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    pub methods: Vec<MethodInfo>,
    pub getters: Vec<MethodInfo>,
    pub setters: Vec<MethodInfo>,
    pub events: Vec<EventInfo>,
    /// Methods dropped because of output-only parameters
    pub rejected: Vec<MethodInfo>,
}

pub struct MemberEnumerator<'a> {
    types: &'a dyn TypeSource,
    out_params: OutParamPolicy,
}

impl<'a> MemberEnumerator<'a> {
    pub fn new(types: &'a dyn TypeSource, out_params: OutParamPolicy) -> Self {
        Self { types, out_params }
    }

    /// Enumerate `ty` and every interface it inherits, declared members first.
    ///
    /// Declared methods keep all their overloads; an inherited member is only
    /// added when nothing of the same name was collected before it.
    pub fn enumerate(&self, ty: &dyn TypeModel) -> MemberSet {
        let mut set = MemberSet::default();
        let mut visited = FxHashSet::default();
        visited.insert(ty.type_ref().clone());
        self.collect(ty, &mut set, &mut visited, true);

        if self.out_params == OutParamPolicy::Reject {
            let (kept, rejected): (Vec<_>, Vec<_>) = std::mem::take(&mut set.methods)
                .into_iter()
                .partition(|m| !m.has_out_params());
            set.methods = kept;
            set.rejected = rejected;
        }

        set
    }

    fn collect(
        &self,
        ty: &dyn TypeModel,
        set: &mut MemberSet,
        visited: &mut FxHashSet<TypeRef>,
        declared: bool,
    ) {
        let methods = ty.methods();
        let known: FxHashSet<String> = set.methods.iter().map(|m| m.name.clone()).collect();

        for method in methods {
            if method.special_name {
                let bucket = if method.name.starts_with("get_") {
                    &mut set.getters
                } else if method.name.starts_with("set_") {
                    &mut set.setters
                } else {
                    continue;
                };
                if !bucket.iter().any(|m| m.name == method.name) {
                    bucket.push(method);
                }
            } else if declared || !known.contains(&method.name) {
                set.methods.push(method);
            }
        }

        for event in ty.events() {
            if !set.events.iter().any(|e| e.name == event.name) {
                set.events.push(event);
            }
        }

        for base in ty.implemented_interfaces() {
            if !visited.insert(base.clone()) {
                continue;
            }
            match self.types.lookup(&base) {
                Some(model) => self.collect(model.as_ref(), set, visited, false),
                None => tracing::trace!(interface = %base, "base interface not in type source"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InterfaceModel, ParamInfo, PropertyInfo, TypeCatalog};

    fn t(name: &str) -> TypeRef {
        TypeRef::new(name)
    }

    fn catalog() -> TypeCatalog {
        TypeCatalog::new(vec![
            InterfaceModel::new(t("Ns.IBase"))
                .with_property(PropertyInfo::read_only("Id", TypeRef::int()))
                .with_property(PropertyInfo::read_write("Title", t("System.String")))
                .with_method(MethodInfo::new("Delete", vec![], t("System.Boolean")))
                .with_method(MethodInfo::new(
                    "Display",
                    vec![ParamInfo::new("force", t("System.Boolean"))],
                    TypeRef::void(),
                ))
                .with_event(crate::model::EventInfo::new("Deleted", None))
                .with_interface(t("Ns.IDerived")),
            InterfaceModel::new(t("Ns.IDerived"))
                .with_property(PropertyInfo::read_only("Title", t("System.Object")))
                .with_method(MethodInfo::new("Display", vec![], TypeRef::void()))
                .with_method(MethodInfo::new("Display", vec![ParamInfo::new("a", TypeRef::int())], TypeRef::void()))
                .with_interface(t("Ns.IBase")),
            InterfaceModel::new(t("Ns.IWithOut"))
                .with_method(MethodInfo::new(
                    "TryGet",
                    vec![
                        ParamInfo::new("id", TypeRef::int()),
                        ParamInfo::out("value", t("System.String")),
                    ],
                    t("System.Boolean"),
                ))
                .with_method(MethodInfo::new("Count", vec![], TypeRef::int())),
        ])
    }

    #[test]
    fn test_most_specific_wins() {
        let catalog = catalog();
        let derived = catalog.get(&t("Ns.IDerived")).unwrap();
        let set = MemberEnumerator::new(&catalog, OutParamPolicy::Reject).enumerate(derived);

        // Both declared overloads survive; the inherited Display(bool) does not
        let displays: Vec<usize> = set
            .methods
            .iter()
            .filter(|m| m.name == "Display")
            .map(|m| m.params.len())
            .collect();
        assert_eq!(displays, vec![0, 1]);
        assert!(set.methods.iter().any(|m| m.name == "Delete"));

        // Declared getter shadows the inherited one
        let title = set.getters.iter().find(|m| m.name == "get_Title").unwrap();
        assert_eq!(title.return_type, t("System.Object"));
        assert!(set.getters.iter().any(|m| m.name == "get_Id"));
        assert_eq!(set.setters.len(), 1);
        assert_eq!(set.events.len(), 1);
    }

    #[test]
    fn test_accessors_never_appear_as_methods() {
        let catalog = catalog();
        let base = catalog.get(&t("Ns.IBase")).unwrap();
        let set = MemberEnumerator::new(&catalog, OutParamPolicy::Reject).enumerate(base);
        assert!(set.methods.iter().all(|m| !m.special_name));
        assert!(set.methods.iter().all(|m| !m.name.starts_with("get_")));
    }

    #[test]
    fn test_inheritance_cycles_terminate() {
        let catalog = catalog();
        let base = catalog.get(&t("Ns.IBase")).unwrap();
        let set = MemberEnumerator::new(&catalog, OutParamPolicy::Reject).enumerate(base);
        assert_eq!(set.methods.iter().filter(|m| m.name == "Display").count(), 1);
    }

    #[test]
    fn test_out_params_rejected() {
        let catalog = catalog();
        let ty = catalog.get(&t("Ns.IWithOut")).unwrap();
        let set = MemberEnumerator::new(&catalog, OutParamPolicy::Reject).enumerate(ty);
        assert_eq!(set.methods.len(), 1);
        assert_eq!(set.rejected.len(), 1);
        assert_eq!(set.rejected[0].name, "TryGet");
    }

    #[test]
    fn test_out_params_kept_when_discarding() {
        let catalog = catalog();
        let ty = catalog.get(&t("Ns.IWithOut")).unwrap();
        let set = MemberEnumerator::new(&catalog, OutParamPolicy::Discard).enumerate(ty);
        assert_eq!(set.methods.len(), 2);
        assert!(set.rejected.is_empty());
    }
}
