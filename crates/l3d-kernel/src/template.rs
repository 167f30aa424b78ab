//! Canonical field schemas per definition type.
//!
//! Every type shares the master schema (type, position, rotation, repeat,
//! overflow bag); each type adds its own fields on top. A template only
//! decides which top-level keys are canonical and what default fills a
//! missing one. It never validates value shapes.

use crate::definition::{COMPOSITE_TYPE, REFERENCE_TYPE, TYPE_KEY};
use crate::error::UnknownTypeError;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// The merged canonical schema for one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    type_name: String,
    fields: Map<String, Value>,
}

impl Template {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether `key` is a canonical top-level field for this type.
    pub fn declares(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn default_for(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Immutable registry of type templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    master: Map<String, Value>,
    types: BTreeMap<String, Map<String, Value>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRegistry {
    /// Master schema only; no types registered.
    pub fn empty() -> Self {
        Self {
            master: object(json!({
                "position": [0, 0, 0],
                "rotation": [0, 0, 0],
                "repeat": {
                    "times": 1,
                    "position": [0, 0, 0],
                    "rotation": [0, 0, 0]
                },
                "_dustbin": {}
            })),
            types: BTreeMap::new(),
        }
    }

    /// The five built-in types: box, cylinder, extrude, composite, ref.
    pub fn builtin() -> Self {
        Self::empty()
            .with_type("box", object(json!({ "dimensions": [10, 10, 10] })))
            .with_type(
                "cylinder",
                object(json!({ "radii": [10, 15], "height": 10 })),
            )
            .with_type(
                "extrude",
                object(json!({
                    "points": [[-45, 0], [65, 0], [65, 10], [30, 15], [-45, 15]],
                    "width": 44
                })),
            )
            .with_type(COMPOSITE_TYPE, object(json!({ "parts": [] })))
            .with_type(REFERENCE_TYPE, object(json!({ "name": "plate" })))
    }

    /// Register (or replace) a type with its type-specific field defaults.
    pub fn with_type(mut self, type_name: impl Into<String>, fields: Map<String, Value>) -> Self {
        self.types.insert(type_name.into(), fields);
        self
    }

    pub fn template_names(&self) -> BTreeSet<String> {
        self.types.keys().cloned().collect()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Master schema merged with the schema of `type_name`.
    ///
    /// Type-specific defaults win over master defaults on collision; the
    /// `type` default is the type name itself.
    pub fn template_for(&self, type_name: &str) -> Result<Template, UnknownTypeError> {
        let specific = self
            .types
            .get(type_name)
            .ok_or_else(|| UnknownTypeError::new(type_name))?;
        let mut fields = self.master.clone();
        fields.insert(TYPE_KEY.to_string(), Value::String(type_name.to_string()));
        fields.extend(specific.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Template {
            type_name: type_name.to_string(),
            fields,
        })
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
