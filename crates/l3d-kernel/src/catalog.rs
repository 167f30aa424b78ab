//! Named, reusable definitions and reference resolution.
//!
//! The catalog is owned by the surrounding application. The kernel only
//! reads it: lookup by name and name enumeration.

use crate::definition::Definition;
use crate::error::CompilationError;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Read-only source of named definitions.
pub trait Catalog {
    fn lookup(&self, name: &str) -> Option<&Definition>;

    fn names(&self) -> BTreeSet<String>;
}

/// Look `name` up in `catalog`.
///
/// The returned definition is the catalog's own copy; clone it before
/// transforming.
pub fn resolve<'c, C>(catalog: &'c C, name: &str) -> Result<&'c Definition, CompilationError>
where
    C: Catalog + ?Sized,
{
    catalog
        .lookup(name)
        .ok_or_else(|| CompilationError::UnresolvedReference {
            name: name.to_string(),
        })
}

/// In-memory catalog keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: BTreeMap<String, Definition>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, definition)` pairs. Later duplicates win.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Definition)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, definition)| (name.into(), definition))
                .collect(),
        }
    }

    /// Build from a JSON object mapping names to definition documents.
    pub fn from_value(value: &Value) -> Result<Self, CompilationError> {
        let Value::Object(documents) = value else {
            return Err(CompilationError::NotARecord {
                found: value.to_string(),
            });
        };
        let mut entries = BTreeMap::new();
        for (name, document) in documents {
            let definition =
                Definition::from_value(document).map_err(|err| CompilationError::MalformedField {
                    field: format!("catalog.{name}"),
                    reason: err.to_string(),
                })?;
            entries.insert(name.clone(), definition);
        }
        Ok(Self { entries })
    }

    /// Insert or replace an entry. Returns the previous definition if any.
    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) -> Option<Definition> {
        self.entries.insert(name.into(), definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    fn names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plate_catalog() -> MemoryCatalog {
        MemoryCatalog::from_entries([(
            "plate",
            Definition::primitive("box").with_field("dimensions", json!([5, 5, 5])),
        )])
    }

    #[test]
    fn resolve_returns_stored_definition() {
        let catalog = plate_catalog();
        let plate = resolve(&catalog, "plate").unwrap();
        assert_eq!(plate.type_name(), "box");
        assert_eq!(plate.fields["dimensions"], json!([5, 5, 5]));
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let err = resolve(&MemoryCatalog::new(), "unknown").unwrap_err();
        assert_eq!(
            err,
            CompilationError::UnresolvedReference {
                name: "unknown".into()
            }
        );
        assert!(resolve(&plate_catalog(), "unknown").is_err());
    }

    #[test]
    fn resolve_through_trait_object() {
        let catalog = plate_catalog();
        let dynamic: &dyn Catalog = &catalog;
        assert!(resolve(dynamic, "plate").is_ok());
        assert_eq!(
            dynamic.names().into_iter().collect::<Vec<_>>(),
            ["plate"]
        );
    }

    #[test]
    fn from_value_parses_every_entry() {
        let catalog = MemoryCatalog::from_value(&json!({
            "plate": {"type": "box", "dimensions": [5, 5, 5]},
            "leg": {"type": "cylinder", "radii": [1, 1], "height": 40},
            "table": {"type": "composite", "parts": [{"type": "ref", "name": "plate"}]}
        }))
        .unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.names().into_iter().collect::<Vec<_>>(),
            ["leg", "plate", "table"]
        );
    }

    #[test]
    fn from_value_reports_the_broken_entry() {
        let err = MemoryCatalog::from_value(&json!({"plate": {"dimensions": [5, 5, 5]}}))
            .unwrap_err();
        assert!(matches!(
            err,
            CompilationError::MalformedField { field, .. } if field == "catalog.plate"
        ));
        assert!(MemoryCatalog::from_value(&json!([])).is_err());
    }

    #[test]
    fn insert_replaces_entries() {
        let mut catalog = plate_catalog();
        let previous = catalog.insert("plate", Definition::primitive("cylinder"));
        assert_eq!(previous.map(|d| d.type_name().to_string()), Some("box".into()));
        assert_eq!(catalog.lookup("plate").unwrap().type_name(), "cylinder");
        assert!(!catalog.is_empty());
    }
}
