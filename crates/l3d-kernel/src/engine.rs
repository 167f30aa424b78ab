//! One entry point over a template registry and a catalog.

use crate::catalog::{Catalog, resolve};
use crate::compile::Compiler;
use crate::definition::Definition;
use crate::error::{CompilationError, DefinitionError, UnknownTypeError};
use crate::sanitize::Sanitizer;
use crate::template::{Template, TemplateRegistry};
use serde_json::Value;
use std::collections::BTreeSet;

/// Borrows the registry and catalog supplied by the surrounding application.
pub struct Engine<'a, C: Catalog + ?Sized> {
    templates: &'a TemplateRegistry,
    catalog: &'a C,
}

impl<'a, C: Catalog + ?Sized> Engine<'a, C> {
    pub fn new(templates: &'a TemplateRegistry, catalog: &'a C) -> Self {
        Self { templates, catalog }
    }

    pub fn templates(&self) -> &'a TemplateRegistry {
        self.templates
    }

    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    pub fn template_names(&self) -> BTreeSet<String> {
        self.templates.template_names()
    }

    pub fn template_for(&self, type_name: &str) -> Result<Template, UnknownTypeError> {
        self.templates.template_for(type_name)
    }

    pub fn catalog_names(&self) -> BTreeSet<String> {
        self.catalog.names()
    }

    pub fn resolve(&self, name: &str) -> Result<&'a Definition, CompilationError> {
        resolve(self.catalog, name)
    }

    pub fn sanitize(&self, document: &Value) -> Result<Value, UnknownTypeError> {
        Sanitizer::new(self.templates).sanitize(document)
    }

    pub fn compile(&self, document: &Value) -> Result<Definition, CompilationError> {
        Compiler::new(self.catalog).compile(document)
    }

    /// Sanitize `document`, then compile the sanitized copy.
    pub fn prepare(&self, document: &Value) -> Result<Definition, DefinitionError> {
        let sanitized = self.sanitize(document)?;
        Ok(self.compile(&sanitized)?)
    }
}
