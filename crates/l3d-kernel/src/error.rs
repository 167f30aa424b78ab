//! Error types for l3d kernel operations.

/// A requested definition type has no registered template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no template with name \"{type_name}\" defined")]
pub struct UnknownTypeError {
    pub type_name: String,
}

impl UnknownTypeError {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    /// The document carries no string `type` tag at all.
    pub fn missing() -> Self {
        Self::new("<missing>")
    }
}

/// Errors raised while parsing or compiling a definition tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompilationError {
    /// A node (or part of a node) is not a JSON object.
    #[error("definition (or part of a definition) is not an object: {found}")]
    NotARecord { found: String },

    /// A node has no string `type` tag.
    #[error("definition has no string \"type\" field")]
    MissingType,

    /// A structural field has the wrong shape.
    #[error("malformed field \"{field}\": {reason}")]
    MalformedField { field: String, reason: String },

    /// A reference names nothing in the catalog.
    #[error("no object found for reference name '{name}'")]
    UnresolvedReference { name: String },

    /// A reference chain revisits a name that is still being expanded.
    #[error("reference cycle detected: {}", chain.join(" -> "))]
    ReferenceCycle { chain: Vec<String> },
}

impl CompilationError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Either failure of the sanitize-then-compile pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error(transparent)]
    UnknownType(#[from] UnknownTypeError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),
}
