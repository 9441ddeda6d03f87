//! Type model of the foreign API
//!
//! The engine never reflects over a live assembly. It reads interface shapes
//! through [`TypeModel`] and resolves referenced types through [`TypeSource`].
//! [`TypeCatalog`] is the bundled implementation, loaded from JSON metadata
//! produced by whatever extractor sits in front of the engine.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ProxyGenResult;
use crate::types::TypeRef;

/// Read-only view of one interface type
pub trait TypeModel {
    fn type_ref(&self) -> &TypeRef;

    /// Declared methods, accessor methods included and flagged `special_name`
    fn methods(&self) -> Vec<MethodInfo>;

    fn properties(&self) -> Vec<PropertyInfo>;

    fn events(&self) -> Vec<EventInfo>;

    /// Directly implemented (base) interfaces
    fn implemented_interfaces(&self) -> Vec<TypeRef>;
}

/// Resolves type references to models
pub trait TypeSource {
    fn lookup(&self, ty: &TypeRef) -> Option<Box<dyn TypeModel + '_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamDirection {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub direction: ParamDirection,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: ParamDirection::In,
        }
    }

    pub fn out(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: ParamDirection::Out,
        }
    }

    pub fn is_out(&self) -> bool {
        self.direction == ParamDirection::Out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamInfo>,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    /// Compiler-generated accessor (`get_X` / `set_X`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub special_name: bool,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, params: Vec<ParamInfo>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            special_name: false,
        }
    }

    pub fn getter(property: &str, ty: TypeRef) -> Self {
        Self {
            name: format!("get_{}", property),
            params: Vec::new(),
            return_type: ty,
            special_name: true,
        }
    }

    pub fn setter(property: &str, ty: TypeRef) -> Self {
        Self {
            name: format!("set_{}", property),
            params: vec![ParamInfo::new("value", ty)],
            return_type: TypeRef::void(),
            special_name: true,
        }
    }

    pub fn has_out_params(&self) -> bool {
        self.params.iter().any(ParamInfo::is_out)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "default_true")]
    pub can_read: bool,
    #[serde(default)]
    pub can_write: bool,
}

impl PropertyInfo {
    pub fn read_only(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            can_read: true,
            can_write: false,
        }
    }

    pub fn read_write(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            can_read: true,
            can_write: true,
        }
    }
}

/// Event declaration; `payload` is the single notification argument, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<TypeRef>,
}

impl EventInfo {
    pub fn new(name: impl Into<String>, payload: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Serialized shape of one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceModel {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
    #[serde(default)]
    pub events: Vec<EventInfo>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
}

impl InterfaceModel {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_event(mut self, event: EventInfo) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_interface(mut self, ty: TypeRef) -> Self {
        self.interfaces.push(ty);
        self
    }
}

impl TypeModel for InterfaceModel {
    fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    fn methods(&self) -> Vec<MethodInfo> {
        let mut methods = Vec::with_capacity(self.methods.len() + self.properties.len());
        for property in &self.properties {
            if property.can_read {
                methods.push(MethodInfo::getter(&property.name, property.ty.clone()));
            }
            if property.can_write {
                methods.push(MethodInfo::setter(&property.name, property.ty.clone()));
            }
        }
        methods.extend(self.methods.iter().cloned());
        methods
    }

    fn properties(&self) -> Vec<PropertyInfo> {
        self.properties.clone()
    }

    fn events(&self) -> Vec<EventInfo> {
        self.events.clone()
    }

    fn implemented_interfaces(&self) -> Vec<TypeRef> {
        self.interfaces.clone()
    }
}

/// Collection of interface models addressable by type name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    /// Root type exposing the host's services (registries, UI singletons)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<TypeRef>,
    #[serde(default)]
    pub types: Vec<InterfaceModel>,
    #[serde(skip)]
    index: FxHashMap<TypeRef, usize>,
}

impl TypeCatalog {
    pub fn new(types: Vec<InterfaceModel>) -> Self {
        let mut catalog = Self {
            host: None,
            types,
            index: FxHashMap::default(),
        };
        catalog.reindex();
        catalog
    }

    pub fn with_host(mut self, host: TypeRef) -> Self {
        self.host = Some(host);
        self
    }

    /// Parse a catalog from JSON text
    pub fn from_json(content: &str) -> ProxyGenResult<Self> {
        let mut catalog: TypeCatalog = serde_json::from_str(content)?;
        catalog.reindex();
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> ProxyGenResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ProxyGenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add(&mut self, model: InterfaceModel) {
        self.index.insert(model.ty.clone(), self.types.len());
        self.types.push(model);
    }

    pub fn get(&self, ty: &TypeRef) -> Option<&InterfaceModel> {
        self.index.get(ty).map(|&i| &self.types[i])
    }

    /// Find a type by full or simple name
    pub fn find(&self, name: &str) -> Option<&InterfaceModel> {
        self.types
            .iter()
            .find(|m| m.ty.name() == name || m.ty.to_string() == name)
            .or_else(|| self.types.iter().find(|m| m.ty.simple_name() == name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceModel> {
        self.types.iter()
    }

    fn reindex(&mut self) {
        self.index = self
            .types
            .iter()
            .enumerate()
            .map(|(i, m)| (m.ty.clone(), i))
            .collect();
    }
}

impl TypeSource for TypeCatalog {
    fn lookup(&self, ty: &TypeRef) -> Option<Box<dyn TypeModel + '_>> {
        self.get(ty).map(|m| Box::new(m) as Box<dyn TypeModel + '_>)
    }
}

impl<T: TypeModel + ?Sized> TypeModel for &T {
    fn type_ref(&self) -> &TypeRef {
        (**self).type_ref()
    }

    fn methods(&self) -> Vec<MethodInfo> {
        (**self).methods()
    }

    fn properties(&self) -> Vec<PropertyInfo> {
        (**self).properties()
    }

    fn events(&self) -> Vec<EventInfo> {
        (**self).events()
    }

    fn implemented_interfaces(&self) -> Vec<TypeRef> {
        (**self).implemented_interfaces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_expand_to_accessors() {
        let model = InterfaceModel::new(TypeRef::new("Ns.IThing"))
            .with_property(PropertyInfo::read_only("Id", TypeRef::int()))
            .with_property(PropertyInfo::read_write("Title", TypeRef::new("System.String")))
            .with_method(MethodInfo::new("Delete", vec![], TypeRef::new("System.Boolean")));

        let names: Vec<String> = model.methods().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["get_Id", "get_Title", "set_Title", "Delete"]);

        let methods = model.methods();
        assert!(methods[0].special_name);
        assert!(!methods[3].special_name);
        assert_eq!(methods[2].params[0].ty, TypeRef::new("System.String"));
        assert!(methods[2].return_type.is_void());
    }

    #[test]
    fn test_catalog_json_defaults() {
        let json = r#"{
            "host": "Ns.IHost",
            "types": [
                {
                    "type": "Ns.IThing",
                    "methods": [
                        { "name": "Find", "params": [
                            { "name": "id", "type": "System.Int32" },
                            { "name": "result", "type": "Ns.IThing", "direction": "out" }
                        ] }
                    ],
                    "properties": [ { "name": "Id", "type": "System.Int32" } ],
                    "events": [ { "name": "Changed" } ],
                    "interfaces": [ "Ns.IBase" ]
                }
            ]
        }"#;

        let catalog = TypeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.host, Some(TypeRef::new("Ns.IHost")));

        let thing = catalog.get(&TypeRef::new("Ns.IThing")).unwrap();
        assert!(thing.methods[0].return_type.is_void());
        assert!(thing.methods[0].has_out_params());
        assert!(thing.properties[0].can_read);
        assert!(!thing.properties[0].can_write);
        assert_eq!(thing.events[0].payload, None);

        assert!(catalog.lookup(&TypeRef::new("Ns.IBase")).is_none());
        assert!(catalog.find("IThing").is_some());
        assert!(catalog.find("Ns.IThing").is_some());
    }

    #[test]
    fn test_catalog_rejects_oversized_array_rank() {
        let json = format!(
            r#"{{ "types": [ {{ "type": "Ns.T{}" }} ] }}"#,
            "[]".repeat(256)
        );
        assert!(TypeCatalog::from_json(&json).is_err());
    }
}
