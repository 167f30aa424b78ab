//! Compilation of definition trees.
//!
//! Compiling resolves every reference against the catalog and expands
//! every repeat rule, so the output tree holds only primitives and
//! composites. Each reference is expanded from a fresh copy of its catalog
//! entry with the reference's own fields laid over it (everything except
//! `type` and `name`), so a part can reuse a catalog entry at a different
//! position.
//!
//! The names of references currently being expanded form a chain; meeting
//! a name that is already on the chain is a cycle and fails the compile.

use crate::catalog::{Catalog, resolve};
use crate::definition::{Definition, DefinitionKind, NAME_KEY, TYPE_KEY};
use crate::error::CompilationError;
use crate::repeat::expand_repeat;
use serde_json::Value;

/// Compiles documents against one catalog.
pub struct Compiler<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
}

impl<'c, C: Catalog + ?Sized> Compiler<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self { catalog }
    }

    /// Parse and compile a JSON document. The document is not modified.
    pub fn compile(&self, document: &Value) -> Result<Definition, CompilationError> {
        let definition = Definition::from_value(document)?;
        self.compile_root(definition)
    }

    /// Compile an already-parsed definition. The definition is not modified.
    pub fn compile_definition(&self, definition: &Definition) -> Result<Definition, CompilationError> {
        self.compile_root(definition.clone())
    }

    fn compile_root(&self, definition: Definition) -> Result<Definition, CompilationError> {
        let mut chain = Vec::new();
        let compiled = self.compile_node(definition, &mut chain)?;
        // Parts have their rules expanded by their composite; the root has no parent.
        Ok(expand_repeat(compiled))
    }

    fn compile_node(
        &self,
        definition: Definition,
        chain: &mut Vec<String>,
    ) -> Result<Definition, CompilationError> {
        if let Some(name) = definition.reference_name().map(str::to_owned) {
            return self.compile_reference(&name, &definition, chain);
        }
        if matches!(definition.kind, DefinitionKind::Composite { .. }) {
            return self.compile_composite(definition, chain);
        }
        Ok(definition)
    }

    fn compile_reference(
        &self,
        name: &str,
        reference: &Definition,
        chain: &mut Vec<String>,
    ) -> Result<Definition, CompilationError> {
        if chain.iter().any(|visited| visited == name) {
            let mut cycle = chain.clone();
            cycle.push(name.to_string());
            return Err(CompilationError::ReferenceCycle { chain: cycle });
        }

        let resolved = resolve(self.catalog, name)?;
        log::debug!("expanding reference '{name}' to {}", resolved.type_name());
        let merged = overlay(resolved, reference)?;

        chain.push(name.to_string());
        let compiled = self.compile_node(merged, chain);
        chain.pop();
        compiled
    }

    fn compile_composite(
        &self,
        mut definition: Definition,
        chain: &mut Vec<String>,
    ) -> Result<Definition, CompilationError> {
        if let DefinitionKind::Composite { parts: Some(parts) } = &mut definition.kind {
            let authored = std::mem::take(parts);
            let mut compiled = Vec::with_capacity(authored.len());
            for part in authored {
                let part = self.compile_node(part, chain)?;
                compiled.push(expand_repeat(part));
            }
            *parts = compiled;
        }
        Ok(definition)
    }
}

/// A copy of `base` with every field of `overrides` except `type` and
/// `name` laid over it.
fn overlay(base: &Definition, overrides: &Definition) -> Result<Definition, CompilationError> {
    let mut merged = base.to_map();
    for (key, value) in overrides.to_map() {
        if key != TYPE_KEY && key != NAME_KEY {
            merged.insert(key, value);
        }
    }
    Definition::from_map(merged)
}
