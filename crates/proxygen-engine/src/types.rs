//! Type references and registry descriptors
//!
//! A [`TypeRef`] names a type by its fully-qualified name plus generic
//! arguments, e.g. `System.Collections.Generic.IEnumerable<Ns.IElement>`.
//! Registry descriptors pair an entity type with the container the host uses
//! to look entities up by integer key.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ProxyGenError, ProxyGenResult};

const GENERIC_SEQUENCE: &str = "System.Collections.Generic.IEnumerable";

/// Reference to a (possibly generic, possibly array) type by full name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeRef {
    name: String,
    args: Vec<TypeRef>,
    array_rank: u8,
}

impl TypeRef {
    /// Non-generic type by full name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_rank: 0,
        }
    }

    /// Constructed generic type
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            array_rank: 0,
        }
    }

    /// The fixed registry key type
    pub fn int() -> Self {
        Self::new("System.Int32")
    }

    pub fn void() -> Self {
        Self::new("System.Void")
    }

    pub fn object() -> Self {
        Self::new("System.Object")
    }

    /// `IEnumerable<element>`
    pub fn sequence_of(element: TypeRef) -> Self {
        Self::generic(GENERIC_SEQUENCE, vec![element])
    }

    /// Array of this type; the rank saturates at `u8::MAX`
    pub fn array(mut self) -> Self {
        self.array_rank = self.array_rank.saturating_add(1);
        self
    }

    /// Full name without generic arguments
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name after the last namespace separator
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Namespace part of the name, if any
    pub fn namespace(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(ns, _)| ns)
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn array_rank(&self) -> u8 {
        self.array_rank
    }

    pub fn is_void(&self) -> bool {
        self.name == "System.Void" && self.args.is_empty() && self.array_rank == 0
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// Element type when this is `IEnumerable<T>`
    pub fn sequence_element(&self) -> Option<&TypeRef> {
        match self.args.as_slice() {
            [element] if self.name == GENERIC_SEQUENCE && self.array_rank == 0 => Some(element),
            _ => None,
        }
    }

    /// Same type with the generic arguments and array rank stripped
    pub fn definition(&self) -> TypeRef {
        TypeRef::new(self.name.clone())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl FromStr for TypeRef {
    type Err = ProxyGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeNameParser { input: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing characters"));
        }
        Ok(ty)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = ProxyGenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}

struct TypeNameParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeNameParser<'a> {
    fn error(&self, message: &str) -> ProxyGenError {
        ProxyGenError::InvalidTypeName {
            name: self.input.to_string(),
            message: format!("{} at offset {}", message, self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> ProxyGenResult<TypeRef> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' || c == '`' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let name = &self.input[start..self.pos];
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') {
            return Err(self.error("expected a type name"));
        }

        let mut ty = TypeRef::new(name);
        if self.eat('<') {
            loop {
                ty.args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
        }
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'"));
            }
            ty.array_rank = ty
                .array_rank
                .checked_add(1)
                .ok_or_else(|| self.error("array rank too large"))?;
        }
        Ok(ty)
    }
}

/// One category of host-tracked entity and the container addressing it by key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDescriptor {
    /// Property name of the container on the host's registry root
    pub name: String,
    pub registry_type: TypeRef,
    pub member_type: TypeRef,
    #[serde(default = "TypeRef::int")]
    pub key_type: TypeRef,
}

impl RegistryDescriptor {
    pub fn new(name: impl Into<String>, registry_type: TypeRef, member_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            registry_type,
            member_type,
            key_type: TypeRef::int(),
        }
    }
}

/// Read-only set of registry descriptors, indexed by member and container type
#[derive(Debug, Clone, Default)]
pub struct RegistrySet {
    descriptors: Vec<RegistryDescriptor>,
    by_member: FxHashMap<TypeRef, usize>,
    by_registry: FxHashMap<TypeRef, usize>,
}

impl RegistrySet {
    /// Build the set, rejecting descriptors that share a member or container type
    pub fn new(descriptors: Vec<RegistryDescriptor>) -> ProxyGenResult<Self> {
        let mut by_member = FxHashMap::default();
        let mut by_registry = FxHashMap::default();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_member
                .insert(descriptor.member_type.clone(), index)
                .is_some()
            {
                return Err(ProxyGenError::DuplicateDescriptor {
                    name: descriptor.name.clone(),
                    role: "member",
                    ty: descriptor.member_type.to_string(),
                });
            }
            if by_registry
                .insert(descriptor.registry_type.clone(), index)
                .is_some()
            {
                return Err(ProxyGenError::DuplicateDescriptor {
                    name: descriptor.name.clone(),
                    role: "registry",
                    ty: descriptor.registry_type.to_string(),
                });
            }
        }

        Ok(Self {
            descriptors,
            by_member,
            by_registry,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn by_member(&self, ty: &TypeRef) -> Option<&RegistryDescriptor> {
        self.by_member.get(ty).map(|&i| &self.descriptors[i])
    }

    pub fn by_registry(&self, ty: &TypeRef) -> Option<&RegistryDescriptor> {
        self.by_registry.get(ty).map(|&i| &self.descriptors[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let ty: TypeRef = "Ns.Models.IElement".parse().unwrap();
        assert_eq!(ty.name(), "Ns.Models.IElement");
        assert_eq!(ty.simple_name(), "IElement");
        assert_eq!(ty.namespace(), Some("Ns.Models"));
        assert!(!ty.is_generic());
    }

    #[test]
    fn test_parse_nested_generics() {
        let ty: TypeRef = "System.Collections.Generic.Dictionary<System.String, System.Collections.Generic.IEnumerable<Ns.IElement>>"
            .parse()
            .unwrap();
        assert_eq!(ty.args().len(), 2);
        assert_eq!(ty.args()[1].sequence_element(), Some(&TypeRef::new("Ns.IElement")));
        assert_eq!(
            ty.to_string(),
            "System.Collections.Generic.Dictionary<System.String, System.Collections.Generic.IEnumerable<Ns.IElement>>"
        );
    }

    #[test]
    fn test_parse_arrays() {
        let ty: TypeRef = "System.Byte[][]".parse().unwrap();
        assert_eq!(ty.name(), "System.Byte");
        assert_eq!(ty.array_rank(), 2);
        assert_eq!(ty.to_string(), "System.Byte[][]");
        assert!(ty.sequence_element().is_none());
    }

    #[test]
    fn test_parse_array_rank_limit() {
        let max = format!("Ns.T{}", "[]".repeat(255));
        let ty: TypeRef = max.parse().unwrap();
        assert_eq!(ty.array_rank(), u8::MAX);
        assert_eq!(ty.to_string(), max);
        assert_eq!(ty.clone().array().array_rank(), u8::MAX);

        let over = format!("Ns.T{}", "[]".repeat(256));
        assert!(matches!(
            over.parse::<TypeRef>(),
            Err(ProxyGenError::InvalidTypeName { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert!("".parse::<TypeRef>().is_err());
        assert!("A<B".parse::<TypeRef>().is_err());
        assert!("A<B>>".parse::<TypeRef>().is_err());
        assert!("Ns.".parse::<TypeRef>().is_err());
        assert!("A[".parse::<TypeRef>().is_err());
    }

    #[test]
    fn test_serde_uses_textual_form() {
        let ty = TypeRef::sequence_of(TypeRef::new("Ns.IElement"));
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, "\"System.Collections.Generic.IEnumerable<Ns.IElement>\"");
        let back: TypeRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }

    #[test]
    fn test_registry_set_lookups() {
        let set = RegistrySet::new(vec![RegistryDescriptor::new(
            "Element",
            TypeRef::new("Ns.IElementRegistry"),
            TypeRef::new("Ns.IElement"),
        )])
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.by_member(&TypeRef::new("Ns.IElement")).map(|d| d.name.as_str()),
            Some("Element")
        );
        assert!(set.by_registry(&TypeRef::new("Ns.IElementRegistry")).is_some());
        assert!(set.by_member(&TypeRef::new("Ns.IElementRegistry")).is_none());
        assert_eq!(set.iter().next().unwrap().key_type, TypeRef::int());
    }

    #[test]
    fn test_registry_set_rejects_duplicate_member() {
        let result = RegistrySet::new(vec![
            RegistryDescriptor::new("A", TypeRef::new("Ns.IA"), TypeRef::new("Ns.IElement")),
            RegistryDescriptor::new("B", TypeRef::new("Ns.IB"), TypeRef::new("Ns.IElement")),
        ]);
        assert!(matches!(
            result,
            Err(ProxyGenError::DuplicateDescriptor { role: "member", .. })
        ));
    }

    #[test]
    fn test_registry_set_rejects_duplicate_registry() {
        let result = RegistrySet::new(vec![
            RegistryDescriptor::new("A", TypeRef::new("Ns.IReg"), TypeRef::new("Ns.IA")),
            RegistryDescriptor::new("B", TypeRef::new("Ns.IReg"), TypeRef::new("Ns.IB")),
        ]);
        assert!(matches!(
            result,
            Err(ProxyGenError::DuplicateDescriptor { role: "registry", .. })
        ));
    }
}
