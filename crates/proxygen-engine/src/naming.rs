//! Identifier allocation and the lexical name transforms

/// Issues `prefix0`, `prefix1`, ... for one unit
///
/// The counter is private and never rewinds; names are not checked against
/// anything already declared, so hand-chosen names must stay out of the
/// prefix's namespace.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    prefix: String,
    next: usize,
}

impl NameAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn next(&mut self) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        name
    }

    /// Number of names issued so far
    pub fn issued(&self) -> usize {
        self.next
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new("var")
    }
}

/// `get_Name` -> `Name`
pub fn property_name(accessor: &str) -> &str {
    accessor.get(4..).unwrap_or("")
}

/// `get_Name` -> `GetName`, `set_Name` -> `SetName`
pub fn accessor_method_name(accessor: &str) -> String {
    let verb = match accessor.get(..4) {
        Some("get_") => "Get",
        Some("set_") => "Set",
        _ => return accessor.to_string(),
    };
    format!("{}{}", verb, capitalize(property_name(accessor)))
}

/// Letters only: `IElementWdw`1` -> `IElementWdw`
pub fn alphabetic(name: &str) -> String {
    name.chars().filter(|c| c.is_alphabetic()).collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allocator_issues_distinct_names() {
        let mut namer = NameAllocator::default();
        let names: Vec<String> = (0..100).map(|_| namer.next()).collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(namer.issued(), 100);
    }

    #[test]
    fn test_allocator_sequence_is_reproducible() {
        let mut a = NameAllocator::new("var");
        let mut b = NameAllocator::new("var");
        let first: Vec<String> = (0..5).map(|_| a.next()).collect();
        let second: Vec<String> = (0..5).map(|_| b.next()).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["var0", "var1", "var2", "var3", "var4"]);
    }

    #[test]
    fn test_accessor_transforms() {
        assert_eq!(accessor_method_name("get_Title"), "GetTitle");
        assert_eq!(accessor_method_name("set_Title"), "SetTitle");
        assert_eq!(accessor_method_name("get_id"), "GetId");
        assert_eq!(accessor_method_name("Delete"), "Delete");
        assert_eq!(property_name("get_Parent"), "Parent");
        assert_eq!(property_name("get"), "");
    }

    #[test]
    fn test_alphabetic() {
        assert_eq!(alphabetic("IRegistry`1"), "IRegistry");
        assert_eq!(alphabetic("IElement2Wdw"), "IElementWdw");
    }
}
