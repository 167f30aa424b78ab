//! Typed definition nodes.
//!
//! A definition is one node of a scene document: a primitive part, a
//! composite of ordered child parts, or a reference into a catalog. The
//! structural fields the compiler acts on (`type`, `parts`, `name`,
//! `position`, `rotation`, `repeat`, the overflow bag) are typed; every
//! other field is carried verbatim in `fields`.
//!
//! Documents travel as JSON. `Definition::from_value` parses one and
//! `Definition::to_value` reproduces it exactly.

use crate::error::CompilationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

pub const TYPE_KEY: &str = "type";
pub const POSITION_KEY: &str = "position";
pub const ROTATION_KEY: &str = "rotation";
pub const REPEAT_KEY: &str = "repeat";
pub const PARTS_KEY: &str = "parts";
pub const NAME_KEY: &str = "name";
pub const TIMES_KEY: &str = "times";

/// Key under which fields that are not valid for the current type are kept.
pub const OVERFLOW_KEY: &str = "_dustbin";

pub const COMPOSITE_TYPE: &str = "composite";
pub const REFERENCE_TYPE: &str = "ref";

/// A numeric vector (position, rotation, or a repeat delta).
///
/// Components stay `serde_json::Number` so integral input stays integral.
pub type Vector = Vec<Number>;

/// `[0, 0, 0]`
pub fn zero_vector() -> Vector {
    vec![Number::from(0); 3]
}

/// Instruction to clone a definition `times` times with an incremental offset.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatRule {
    pub times: u64,
    pub position: Option<Vector>,
    pub rotation: Option<Vector>,
}

impl RepeatRule {
    pub fn new(times: u64) -> Self {
        Self {
            times,
            position: None,
            rotation: None,
        }
    }

    pub fn with_position(mut self, delta: Vector) -> Self {
        self.position = Some(delta);
        self
    }

    pub fn with_rotation(mut self, delta: Vector) -> Self {
        self.rotation = Some(delta);
        self
    }

    pub fn from_value(value: &Value) -> Result<Self, CompilationError> {
        let Value::Object(rule) = value else {
            return Err(CompilationError::malformed(
                REPEAT_KEY,
                format!("expected an object, found {value}"),
            ));
        };
        let times = match rule.get(TIMES_KEY) {
            None => 0,
            Some(raw) => raw.as_u64().ok_or_else(|| {
                CompilationError::malformed(
                    "repeat.times",
                    format!("expected a non-negative integer, found {raw}"),
                )
            })?,
        };
        Ok(Self {
            times,
            position: rule
                .get(POSITION_KEY)
                .map(|raw| parse_vector("repeat.position", raw))
                .transpose()?,
            rotation: rule
                .get(ROTATION_KEY)
                .map(|raw| parse_vector("repeat.rotation", raw))
                .transpose()?,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut rule = Map::new();
        rule.insert(TIMES_KEY.to_string(), Value::from(self.times));
        if let Some(delta) = &self.position {
            rule.insert(POSITION_KEY.to_string(), vector_value(delta));
        }
        if let Some(delta) = &self.rotation {
            rule.insert(ROTATION_KEY.to_string(), vector_value(delta));
        }
        Value::Object(rule)
    }
}

/// The structural case of a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionKind {
    /// A leaf part (box, cylinder, extrude, or another registered type).
    /// Its geometry lives in `Definition::fields`.
    Primitive { type_name: String },

    /// An ordered sequence of child parts. `None` when the document has no
    /// `parts` array.
    Composite { parts: Option<Vec<Definition>> },

    /// Stands for the catalog entry called `name`.
    Reference { name: String },
}

/// One node of a scene document.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub position: Option<Vector>,
    pub rotation: Option<Vector>,
    pub repeat: Option<RepeatRule>,
    /// The overflow bag (`_dustbin`).
    pub overflow: Option<Map<String, Value>>,
    /// Type-specific and otherwise unrecognized top-level fields.
    pub fields: Map<String, Value>,
}

impl Definition {
    fn with_kind(kind: DefinitionKind) -> Self {
        Self {
            kind,
            position: None,
            rotation: None,
            repeat: None,
            overflow: None,
            fields: Map::new(),
        }
    }

    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self::with_kind(DefinitionKind::Primitive {
            type_name: type_name.into(),
        })
    }

    pub fn composite(parts: Vec<Definition>) -> Self {
        Self::with_kind(DefinitionKind::Composite { parts: Some(parts) })
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::with_kind(DefinitionKind::Reference { name: name.into() })
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn with_position(mut self, position: Vector) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_repeat(mut self, rule: RepeatRule) -> Self {
        self.repeat = Some(rule);
        self
    }

    /// The `type` tag as it appears in the document.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            DefinitionKind::Primitive { type_name } => type_name,
            DefinitionKind::Composite { .. } => COMPOSITE_TYPE,
            DefinitionKind::Reference { .. } => REFERENCE_TYPE,
        }
    }

    /// The catalog name, for reference nodes.
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            DefinitionKind::Reference { name } => Some(name),
            _ => None,
        }
    }

    /// Child parts, for composites that have a `parts` array.
    pub fn parts(&self) -> Option<&[Definition]> {
        match &self.kind {
            DefinitionKind::Composite { parts } => parts.as_deref(),
            _ => None,
        }
    }

    /// True when no node in this tree is a reference or carries a repeat rule.
    pub fn is_fully_compiled(&self) -> bool {
        if self.repeat.is_some() {
            return false;
        }
        match &self.kind {
            DefinitionKind::Primitive { .. } => true,
            DefinitionKind::Reference { .. } => false,
            DefinitionKind::Composite { parts } => {
                parts.iter().flatten().all(Definition::is_fully_compiled)
            }
        }
    }

    /// Parse a JSON document. Fails when the node is not an object or a
    /// structural field has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, CompilationError> {
        match value {
            Value::Object(map) => Self::from_map(map.clone()),
            other => Err(not_a_record(other)),
        }
    }

    fn from_owned_value(value: Value) -> Result<Self, CompilationError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(not_a_record(&other)),
        }
    }

    /// Parse an already-unwrapped JSON object.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, CompilationError> {
        let type_name = match map.remove(TYPE_KEY) {
            Some(Value::String(type_name)) => type_name,
            _ => return Err(CompilationError::MissingType),
        };
        let position = map
            .remove(POSITION_KEY)
            .map(|raw| parse_vector(POSITION_KEY, &raw))
            .transpose()?;
        let rotation = map
            .remove(ROTATION_KEY)
            .map(|raw| parse_vector(ROTATION_KEY, &raw))
            .transpose()?;
        let repeat = map
            .remove(REPEAT_KEY)
            .map(|raw| RepeatRule::from_value(&raw))
            .transpose()?;
        let overflow = match map.remove(OVERFLOW_KEY) {
            None => None,
            Some(Value::Object(bag)) => Some(bag),
            Some(other) => {
                return Err(CompilationError::malformed(
                    OVERFLOW_KEY,
                    format!("expected an object, found {other}"),
                ));
            }
        };

        let kind = match type_name.as_str() {
            COMPOSITE_TYPE => DefinitionKind::Composite {
                parts: parse_parts(map.remove(PARTS_KEY))?,
            },
            REFERENCE_TYPE => match map.remove(NAME_KEY) {
                Some(Value::String(name)) => DefinitionKind::Reference { name },
                Some(other) => {
                    return Err(CompilationError::malformed(
                        NAME_KEY,
                        format!("expected a string, found {other}"),
                    ));
                }
                None => {
                    return Err(CompilationError::malformed(
                        NAME_KEY,
                        "reference has no name",
                    ));
                }
            },
            _ => DefinitionKind::Primitive { type_name },
        };

        Ok(Self {
            kind,
            position,
            rotation,
            repeat,
            overflow,
            fields: map,
        })
    }

    /// Render back to a JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.fields.clone();
        map.insert(
            TYPE_KEY.to_string(),
            Value::String(self.type_name().to_string()),
        );
        match &self.kind {
            DefinitionKind::Composite { parts: Some(parts) } => {
                map.insert(
                    PARTS_KEY.to_string(),
                    Value::Array(parts.iter().map(Definition::to_value).collect()),
                );
            }
            DefinitionKind::Reference { name } => {
                map.insert(NAME_KEY.to_string(), Value::String(name.clone()));
            }
            _ => {}
        }
        if let Some(position) = &self.position {
            map.insert(POSITION_KEY.to_string(), vector_value(position));
        }
        if let Some(rotation) = &self.rotation {
            map.insert(ROTATION_KEY.to_string(), vector_value(rotation));
        }
        if let Some(rule) = &self.repeat {
            map.insert(REPEAT_KEY.to_string(), rule.to_value());
        }
        if let Some(bag) = &self.overflow {
            map.insert(OVERFLOW_KEY.to_string(), Value::Object(bag.clone()));
        }
        map
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl Serialize for Definition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Definition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Definition::from_owned_value(value).map_err(serde::de::Error::custom)
    }
}

fn not_a_record(value: &Value) -> CompilationError {
    CompilationError::NotARecord {
        found: value.to_string(),
    }
}

fn parse_parts(raw: Option<Value>) -> Result<Option<Vec<Definition>>, CompilationError> {
    match raw {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(Definition::from_owned_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => {
            log::warn!("dropping composite parts that are not an array: {other}");
            Ok(None)
        }
    }
}

pub(crate) fn parse_vector(field: &str, value: &Value) -> Result<Vector, CompilationError> {
    let Value::Array(items) = value else {
        return Err(CompilationError::malformed(
            field,
            format!("expected an array of numbers, found {value}"),
        ));
    };
    items
        .iter()
        .map(|item| match item {
            Value::Number(component) => Ok(component.clone()),
            other => Err(CompilationError::malformed(
                field,
                format!("expected a number, found {other}"),
            )),
        })
        .collect()
}

fn vector_value(vector: &Vector) -> Value {
    Value::Array(vector.iter().cloned().map(Value::Number).collect())
}
