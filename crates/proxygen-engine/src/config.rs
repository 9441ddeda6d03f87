//! Host profile (proxygen.toml)
//!
//! Describes where the host application exposes its services and how
//! generated proxies are named. Defaults match the SuperMemo Assistant host.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a host profile
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the profile file
    #[error("Failed to read host profile: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse host profile: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to write host profile: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Validation error
    #[error("Invalid host profile: {0}")]
    ValidationError(String),
}

/// What to do with methods that carry output-only parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutParamPolicy {
    /// Skip the method and report it
    #[default]
    Reject,
    /// Keep the method and pass a discarded output argument
    Discard,
}

/// A type exposed by the host as a fixed singleton (e.g. a UI root)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingletonBinding {
    /// Full name of the singleton's type
    pub type_name: String,
    /// Path below the service root, e.g. `UI.ElementWdw`
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfile {
    /// Expression reaching the host's service locator
    pub service_root: String,

    /// Member of the service root holding the registries
    pub registry_path: String,

    /// Property of the host root type whose type lists the registries
    pub registry_property: String,

    /// Generic interface every registry container implements
    pub registry_marker: String,

    /// Registry properties containing any of these fragments are ignored
    pub excluded_registries: Vec<String>,

    /// Boundary-safe delegate wrapper used to attach event callbacks
    pub event_proxy: String,

    pub class_suffix: String,
    pub namespace_suffix: String,

    /// Prefix of allocator-issued identifiers
    pub name_prefix: String,

    pub out_params: OutParamPolicy,

    pub singletons: Vec<SingletonBinding>,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            service_root: "SuperMemoAssistant.Services.Svc.SM".to_string(),
            registry_path: "Registry".to_string(),
            registry_property: "Registry".to_string(),
            registry_marker: "SuperMemoAssistant.Interop.SuperMemo.Core.IRegistry".to_string(),
            excluded_registries: vec!["Component".to_string()],
            event_proxy: "SuperMemoAssistant.Sys.Remoting.ActionProxy".to_string(),
            class_suffix: "Svc".to_string(),
            namespace_suffix: "Namespace".to_string(),
            name_prefix: "var".to_string(),
            out_params: OutParamPolicy::Reject,
            singletons: vec![SingletonBinding {
                type_name: "SuperMemoAssistant.Interop.SuperMemo.UI.Element.IElementWdw"
                    .to_string(),
                path: "UI.ElementWdw".to_string(),
            }],
        }
    }
}

impl HostProfile {
    /// Parse a profile from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a profile from a string; missing keys take their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let profile: HostProfile = toml::from_str(content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Write the profile to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("service_root", &self.service_root),
            ("registry_path", &self.registry_path),
            ("registry_property", &self.registry_property),
            ("registry_marker", &self.registry_marker),
            ("event_proxy", &self.event_proxy),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "'{}' cannot be empty",
                    key
                )));
            }
        }

        if !is_identifier(&self.name_prefix) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid name prefix: '{}'. Must start with a letter or underscore",
                self.name_prefix
            )));
        }

        let mut seen = HashSet::new();
        for binding in &self.singletons {
            if binding.type_name.is_empty() || binding.path.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Singleton bindings need both 'type_name' and 'path'".to_string(),
                ));
            }
            if !seen.insert(binding.type_name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Singleton '{}' is bound more than once",
                    binding.type_name
                )));
            }
        }

        Ok(())
    }

    /// Initializer path of a registry container field
    pub fn registry_path_for(&self, registry_name: &str) -> String {
        format!("{}.{}.{}", self.service_root, self.registry_path, registry_name)
    }

    /// Initializer path of a singleton field
    pub fn singleton_path_for(&self, binding_path: &str) -> String {
        format!("{}.{}", self.service_root, binding_path)
    }

    pub fn singleton(&self, type_name: &str) -> Option<&SingletonBinding> {
        self.singletons.iter().find(|b| b.type_name == type_name)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
