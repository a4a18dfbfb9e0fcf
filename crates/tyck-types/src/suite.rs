//! Type suites - the name-resolution environment.
//!
//! A suite maps identifiers to type nodes. Suites preserve declaration
//! order, and layering one suite over another lets later entries override
//! earlier ones for the same name.

use indexmap::IndexMap;

use crate::node::TType;

/// A mapping from type name to type node.
#[derive(Debug, Clone, Default)]
pub struct TypeSuite {
    types: IndexMap<String, TType>,
}

impl TypeSuite {
    pub fn new() -> Self {
        TypeSuite {
            types: IndexMap::new(),
        }
    }

    /// Chainable definition, for building suites as one expression.
    pub fn define(mut self, name: impl Into<String>, ttype: impl Into<TType>) -> Self {
        self.insert(name, ttype);
        self
    }

    /// Insert a definition, replacing any previous one for the name.
    pub fn insert(&mut self, name: impl Into<String>, ttype: impl Into<TType>) {
        self.types.insert(name.into(), ttype.into());
    }

    pub fn get(&self, name: &str) -> Option<&TType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Layer another suite on top of this one; its entries win.
    pub fn extend(&mut self, other: &TypeSuite) {
        for (name, ttype) in &other.types {
            self.types.insert(name.clone(), ttype.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TType)> {
        self.types.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Declared names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>, T: Into<TType>> FromIterator<(S, T)> for TypeSuite {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut suite = TypeSuite::new();
        for (name, ttype) in iter {
            suite.insert(name, ttype);
        }
        suite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{array, name};

    #[test]
    fn test_define_and_get() {
        let suite = TypeSuite::new()
            .define("Nums", array("number"))
            .define("Alias", name("Nums"));
        assert!(suite.contains("Nums"));
        assert!(matches!(suite.get("Alias"), Some(TType::Name(n)) if n.name == "Nums"));
        assert!(suite.get("Other").is_none());
    }

    #[test]
    fn test_extend_later_wins() {
        let mut base = TypeSuite::new().define("T", name("number"));
        let layered = TypeSuite::new().define("T", name("string"));
        base.extend(&layered);
        assert_eq!(base.len(), 1);
        assert!(matches!(base.get("T"), Some(TType::Name(n)) if n.name == "string"));
    }

    #[test]
    fn test_names_keep_declaration_order() {
        let suite = TypeSuite::new()
            .define("B", name("number"))
            .define("A", name("string"));
        let names: Vec<&str> = suite.names().collect();
        assert_eq!(names, ["B", "A"]);
    }
}
