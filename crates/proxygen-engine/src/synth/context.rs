//! Per-member conversion state and the identifier-substitution rules

use crate::classify::registry_member;
use crate::model::ParamInfo;
use crate::types::{RegistryDescriptor, RegistrySet, TypeRef};
use crate::unit::{Argument, Expr, FieldRef, Method, Param, Stmt, UnitAssembler};

/// Integer handle exposed by every registry member
pub(crate) const ID_PROPERTY: &str = "Id";

/// Builds one proxy method; dropped once the method is handed to the unit
pub(crate) struct MemberContext<'s, 'a> {
    unit: &'s mut UnitAssembler,
    registries: &'a RegistrySet,
    method: Method,
}

impl<'s, 'a> MemberContext<'s, 'a> {
    pub(crate) fn new(
        unit: &'s mut UnitAssembler,
        registries: &'a RegistrySet,
        name: impl Into<String>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            unit,
            registries,
            method: Method::new(name, return_type),
        }
    }

    /// Take an integer key parameter and resolve `registry[key]` into a local
    pub(crate) fn resolve_instance(
        &mut self,
        descriptor: &RegistryDescriptor,
        registry: &FieldRef,
    ) -> Expr {
        let key = self.unit.next_name();
        self.method
            .params
            .push(Param::new(key.clone(), descriptor.key_type.clone()));

        let local = self.unit.next_name();
        self.method.body.push(Stmt::Declare {
            ty: descriptor.member_type.clone(),
            name: local.clone(),
            init: Some(registry.expr().index(Expr::Arg(key))),
        });
        Expr::Local(local)
    }

    /// Declare the proxy parameter standing in for `info`; returns the value
    /// to pass where the original parameter was used
    pub(crate) fn convert_value_param(&mut self, info: &ParamInfo) -> Expr {
        match registry_member(&info.ty, self.registries) {
            Some(descriptor) => {
                let registry = self.unit.constructor_field(&descriptor.registry_type);
                self.resolve_instance(descriptor, &registry)
            }
            None => {
                let name = self.unit.next_name();
                self.method.params.push(Param::new(name.clone(), info.ty.clone()));
                Expr::Arg(name)
            }
        }
    }

    /// Call argument for `info`; output-only parameters become discards
    pub(crate) fn convert_param(&mut self, info: &ParamInfo) -> Argument {
        if info.is_out() {
            Argument::DiscardOut
        } else {
            Argument::Value(self.convert_value_param(info))
        }
    }

    /// Return a property read, projecting registry members to their id
    pub(crate) fn return_property(&mut self, read: Expr, ty: &TypeRef) {
        match registry_member(ty, self.registries) {
            Some(descriptor) => {
                self.method.return_type = descriptor.key_type.clone();
                self.method
                    .body
                    .push(Stmt::Return(Some(read.property(ID_PROPERTY))));
            }
            None => self.method.body.push(Stmt::Return(Some(read))),
        }
    }

    /// Return an invocation result, projecting registry members to their id
    pub(crate) fn return_invoke(&mut self, invoke: Expr, ty: &TypeRef) {
        if ty.is_void() {
            self.method.body.push(Stmt::Expr(invoke));
            return;
        }

        match registry_member(ty, self.registries) {
            Some(descriptor) => {
                let local = self.unit.next_name();
                self.method.body.push(Stmt::Declare {
                    ty: ty.clone(),
                    name: local.clone(),
                    init: Some(invoke),
                });
                self.method.return_type = descriptor.key_type.clone();
                self.method.body.push(Stmt::Return(Some(
                    Expr::Local(local).property(ID_PROPERTY),
                )));
            }
            None => self.method.body.push(Stmt::Return(Some(invoke))),
        }
    }

    pub(crate) fn push(&mut self, stmt: Stmt) {
        self.method.body.push(stmt);
    }

    pub(crate) fn add_param(&mut self, ty: TypeRef) -> String {
        let name = self.unit.next_name();
        self.method.params.push(Param::new(name.clone(), ty));
        name
    }

    pub(crate) fn finish(self) -> Method {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registries() -> RegistrySet {
        RegistrySet::new(vec![RegistryDescriptor::new(
            "Element",
            TypeRef::new("Ns.IElementRegistry"),
            TypeRef::new("Ns.IElement"),
        )])
        .unwrap()
    }

    #[test]
    fn test_registry_param_becomes_key() {
        let regs = registries();
        let mut unit = UnitAssembler::new("N", "C", "var");
        let mut cx = MemberContext::new(&mut unit, &regs, "Move", TypeRef::void());

        let value = cx.convert_value_param(&ParamInfo::new("target", TypeRef::new("Ns.IElement")));
        let method = cx.finish();

        // var0/var1: injected registry (param, field); var2: key; var3: local
        assert_eq!(value, Expr::Local("var3".to_string()));
        assert_eq!(method.params, vec![Param::new("var2", TypeRef::int())]);
        assert_eq!(
            method.body[0],
            Stmt::Declare {
                ty: TypeRef::new("Ns.IElement"),
                name: "var3".to_string(),
                init: Some(Expr::Field("var1".to_string()).index(Expr::Arg("var2".to_string()))),
            }
        );
    }

    #[test]
    fn test_passthrough_param_kept() {
        let regs = registries();
        let mut unit = UnitAssembler::new("N", "C", "var");
        let mut cx = MemberContext::new(&mut unit, &regs, "Rename", TypeRef::void());
        let value = cx.convert_value_param(&ParamInfo::new("title", TypeRef::new("System.String")));
        let method = cx.finish();

        assert_eq!(value, Expr::Arg("var0".to_string()));
        assert_eq!(method.params[0].ty, TypeRef::new("System.String"));
        assert!(method.body.is_empty());
        assert_eq!(unit.finish().fields().count(), 0);
    }

    #[test]
    fn test_return_invoke_of_member_projects_id() {
        let regs = registries();
        let mut unit = UnitAssembler::new("N", "C", "var");
        let mut cx = MemberContext::new(&mut unit, &regs, "First", TypeRef::new("Ns.IElement"));
        let invoke = Expr::Field("w".to_string()).invoke("First", vec![]);
        cx.return_invoke(invoke.clone(), &TypeRef::new("Ns.IElement"));
        let method = cx.finish();

        assert_eq!(method.return_type, TypeRef::int());
        assert_eq!(
            method.body,
            vec![
                Stmt::Declare {
                    ty: TypeRef::new("Ns.IElement"),
                    name: "var0".to_string(),
                    init: Some(invoke),
                },
                Stmt::Return(Some(Expr::Local("var0".to_string()).property("Id"))),
            ]
        );
    }

    #[test]
    fn test_void_invoke_is_a_statement() {
        let regs = registries();
        let mut unit = UnitAssembler::new("N", "C", "var");
        let mut cx = MemberContext::new(&mut unit, &regs, "Refresh", TypeRef::void());
        let invoke = Expr::Field("w".to_string()).invoke("Refresh", vec![]);
        cx.return_invoke(invoke.clone(), &TypeRef::void());
        assert_eq!(cx.finish().body, vec![Stmt::Expr(invoke)]);
    }
}
