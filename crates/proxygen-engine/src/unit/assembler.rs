//! Incremental construction of a proxy unit

use super::{Constructor, Event, Expr, Field, FieldInit, Member, Method, Param, ProxyUnit, Stmt};
use crate::naming::NameAllocator;
use crate::types::TypeRef;

/// Handle to a field already declared on the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub name: String,
    pub ty: TypeRef,
}

impl FieldRef {
    /// `this.name`
    pub fn expr(&self) -> Expr {
        Expr::Field(self.name.clone())
    }
}

/// Owns the class being generated, its constructor and its name allocator
pub struct UnitAssembler {
    namespace: String,
    class_name: String,
    namer: NameAllocator,
    members: Vec<Member>,
    constructor: Constructor,
}

impl UnitAssembler {
    pub fn new(
        namespace: impl Into<String>,
        class_name: impl Into<String>,
        name_prefix: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            namer: NameAllocator::new(name_prefix),
            members: Vec::new(),
            constructor: Constructor::default(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn next_name(&mut self) -> String {
        self.namer.next()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Existing field declared with exactly `ty`
    pub fn field_of_type(&self, ty: &TypeRef) -> Option<FieldRef> {
        self.members.iter().find_map(|m| match m {
            Member::Field(f) if &f.ty == ty => Some(FieldRef {
                name: f.name.clone(),
                ty: f.ty.clone(),
            }),
            _ => None,
        })
    }

    /// Field of type `ty` bound from a constructor parameter, reused if present
    pub fn constructor_field(&mut self, ty: &TypeRef) -> FieldRef {
        if let Some(existing) = self.field_of_type(ty) {
            return existing;
        }

        let param = Param::new(self.next_name(), ty.clone());
        let field = Field {
            name: self.next_name(),
            ty: ty.clone(),
            init: FieldInit::ConstructorParam(param.name.clone()),
        };
        let field_ref = FieldRef {
            name: field.name.clone(),
            ty: ty.clone(),
        };

        tracing::trace!(field = %field.name, ty = %ty, "constructor-injected field");
        self.constructor.body.push(Stmt::Assign {
            target: field_ref.expr(),
            value: Expr::Arg(param.name.clone()),
        });
        self.constructor.params.push(param);
        self.members.push(Member::Field(field));
        field_ref
    }

    /// Field of type `ty` initialized from a service-locator path, reused if present
    pub fn fixed_field(&mut self, ty: &TypeRef, path: impl Into<String>) -> FieldRef {
        if let Some(existing) = self.field_of_type(ty) {
            return existing;
        }

        let field = Field {
            name: self.next_name(),
            ty: ty.clone(),
            init: FieldInit::Fixed(path.into()),
        };
        tracing::trace!(field = %field.name, ty = %ty, "directly initialized field");
        let field_ref = FieldRef {
            name: field.name.clone(),
            ty: ty.clone(),
        };
        self.members.push(Member::Field(field));
        field_ref
    }

    pub fn add_constructor_statement(&mut self, stmt: Stmt) {
        self.constructor.body.push(stmt);
    }

    pub fn push_method(&mut self, method: Method) {
        self.members.push(Member::Method(method));
    }

    pub fn push_event(&mut self, event: Event) {
        self.members.push(Member::Event(event));
    }

    /// Flush the constructor into the member list and hand over the unit
    pub fn finish(mut self) -> ProxyUnit {
        self.members.push(Member::Constructor(self.constructor));
        ProxyUnit {
            namespace: self.namespace,
            class_name: self.class_name,
            members: self.members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> UnitAssembler {
        UnitAssembler::new("IElementNamespace", "IElementSvc", "var")
    }

    #[test]
    fn test_constructor_field_is_deduplicated() {
        let mut unit = assembler();
        let ty = TypeRef::new("Ns.IElementRegistry");
        let first = unit.constructor_field(&ty);
        let second = unit.constructor_field(&ty);
        assert_eq!(first, second);

        let finished = unit.finish();
        assert_eq!(finished.fields().count(), 1);
        let ctor = finished.constructor().unwrap();
        assert_eq!(ctor.params.len(), 1);
        assert_eq!(ctor.body.len(), 1);
    }

    #[test]
    fn test_constructor_field_binds_parameter() {
        let mut unit = assembler();
        let field = unit.constructor_field(&TypeRef::new("Ns.IThing"));
        let finished = unit.finish();

        let ctor = finished.constructor().unwrap();
        assert_eq!(ctor.params[0].name, "var0");
        assert_eq!(field.name, "var1");
        assert_eq!(
            ctor.body[0],
            Stmt::Assign {
                target: Expr::Field("var1".to_string()),
                value: Expr::Arg("var0".to_string()),
            }
        );
        assert_eq!(
            finished.field("var1").unwrap().init,
            FieldInit::ConstructorParam("var0".to_string())
        );
    }

    #[test]
    fn test_fixed_field_reused_by_constructor_lookup() {
        let mut unit = assembler();
        let ty = TypeRef::new("Ns.IElementRegistry");
        let fixed = unit.fixed_field(&ty, "Svc.SM.Registry.Element");
        let again = unit.constructor_field(&ty);
        assert_eq!(fixed, again);

        let finished = unit.finish();
        assert!(finished.constructor().unwrap().params.is_empty());
        assert_eq!(finished.fields().count(), 1);
    }

    #[test]
    fn test_finish_adds_exactly_one_constructor() {
        let mut unit = assembler();
        unit.push_method(Method::new("GetId", TypeRef::int()));
        let finished = unit.finish();
        assert_eq!(finished.constructors().count(), 1);
        assert_eq!(finished.methods().count(), 1);
    }
}
