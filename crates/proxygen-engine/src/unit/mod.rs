//! Proxy unit: the generated namespace, class and members
//!
//! [`UnitAssembler`] builds a unit incrementally during a synthesis session;
//! [`ProxyUnit`] is the finished, read-only result handed to emission and
//! compilation.

mod assembler;
mod code;

pub use assembler::{FieldRef, UnitAssembler};
pub use code::{Argument, Expr, Stmt};

use crate::types::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInit {
    /// Bound from this constructor parameter
    ConstructorParam(String),
    /// Initialized from a fixed service-locator path
    Fixed(String),
}

/// Private field of the proxy class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub init: FieldInit,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constructor {
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// Public final method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: Vec<Stmt>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type,
            body: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Public event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    /// Delegate type of the event
    pub handler_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(Field),
    Constructor(Constructor),
    Method(Method),
    Event(Event),
}

impl Member {
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Field(f) => Some(&f.name),
            Member::Method(m) => Some(&m.name),
            Member::Event(e) => Some(&e.name),
            Member::Constructor(_) => None,
        }
    }
}

/// A finished proxy: one namespace holding one public class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyUnit {
    pub namespace: String,
    pub class_name: String,
    pub members: Vec<Member>,
}

impl ProxyUnit {
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.members.iter().filter_map(|m| match m {
            Member::Event(e) => Some(e),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(c) => Some(c),
            _ => None,
        })
    }

    /// The single constructor flushed at finish time
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructors().next()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods().find(|m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().find(|f| f.name == name)
    }

    pub fn field_of_type(&self, ty: &TypeRef) -> Option<&Field> {
        self.fields().find(|f| &f.ty == ty)
    }
}
