//! Reconciles raw documents with their type's template.
//!
//! Sanitizing works on untyped JSON because its input is whatever the
//! author typed: fields may belong to a previous type, defaults may be
//! missing. Nothing is lost. Fields the current type does not declare move
//! into the overflow bag (`_dustbin`), and come back out when a later type
//! declares them again.
//!
//! ```text
//! complement  ← fill canonical fields from template defaults
//!     │
//! demote      ← move undeclared fields into the overflow bag
//!     │
//! restore     ← copy bag fields the template declares back to the top
//!     │
//! recurse     ← same for every entry of `parts`
//! ```
//!
//! Restoring copies out of the bag without removing the key, so a value
//! survives any number of type flips. The flip side is that a restored
//! key overwrites the top-level value on every pass.

use crate::definition::{OVERFLOW_KEY, PARTS_KEY, TYPE_KEY};
use crate::error::UnknownTypeError;
use crate::template::{Template, TemplateRegistry};
use serde_json::{Map, Value};

/// Sanitizes documents against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'a> {
    templates: &'a TemplateRegistry,
}

impl<'a> Sanitizer<'a> {
    pub fn new(templates: &'a TemplateRegistry) -> Self {
        Self { templates }
    }

    /// Return a sanitized copy of `document` (and of every nested part).
    ///
    /// Fails only when some node has no registered type.
    pub fn sanitize(&self, document: &Value) -> Result<Value, UnknownTypeError> {
        let mut working = document.clone();
        self.sanitize_in_place(&mut working)?;
        Ok(working)
    }

    fn sanitize_in_place(&self, document: &mut Value) -> Result<(), UnknownTypeError> {
        let template = self.template_of(document)?;
        let Value::Object(fields) = document else {
            return Err(UnknownTypeError::missing());
        };
        sanitize_from_template(fields, &template);

        if let Some(Value::Array(parts)) = fields.get_mut(PARTS_KEY) {
            for part in parts {
                self.sanitize_in_place(part)?;
            }
        }
        Ok(())
    }

    fn template_of(&self, document: &Value) -> Result<Template, UnknownTypeError> {
        match document.get(TYPE_KEY).and_then(Value::as_str) {
            Some(type_name) => self.templates.template_for(type_name),
            None => Err(UnknownTypeError::missing()),
        }
    }
}

/// Apply one template to one object (no recursion).
pub fn sanitize_from_template(fields: &mut Map<String, Value>, template: &Template) {
    complement_missing_fields(fields, template);
    demote_excess_fields(fields, template);
    restore_reclaimed_fields(fields, template);
}

fn complement_missing_fields(fields: &mut Map<String, Value>, template: &Template) {
    for (key, default) in template.fields() {
        if key != OVERFLOW_KEY && !fields.contains_key(key) {
            fields.insert(key.clone(), default.clone());
        }
    }
}

fn demote_excess_fields(fields: &mut Map<String, Value>, template: &Template) {
    let excess: Vec<String> = fields
        .keys()
        .filter(|key| key.as_str() != OVERFLOW_KEY && !template.declares(key))
        .cloned()
        .collect();
    if excess.is_empty() {
        return;
    }

    let mut bag = match fields.remove(OVERFLOW_KEY) {
        Some(Value::Object(bag)) => bag,
        Some(other) => {
            log::warn!("replacing overflow bag that is not an object: {other}");
            Map::new()
        }
        None => Map::new(),
    };
    for key in excess {
        if let Some(value) = fields.remove(&key) {
            log::debug!(
                "demoting {key}: {value} (not declared by {})",
                template.type_name()
            );
            bag.insert(key, value);
        }
    }
    fields.insert(OVERFLOW_KEY.to_string(), Value::Object(bag));
}

fn restore_reclaimed_fields(fields: &mut Map<String, Value>, template: &Template) {
    let Some(Value::Object(bag)) = fields.get(OVERFLOW_KEY) else {
        return;
    };
    // `type` selected the template; the bag must not switch it mid-pass.
    let reclaimed: Vec<(String, Value)> = bag
        .iter()
        .filter(|(key, _)| {
            key.as_str() != TYPE_KEY && key.as_str() != OVERFLOW_KEY && template.declares(key)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for (key, value) in reclaimed {
        log::debug!("restoring {key} from overflow bag");
        fields.insert(key, value);
    }
}
