//! # l3d Kernel
//!
//! Compiles declarative, hierarchical 3D part definitions into resolved
//! trees ready for rendering: references are replaced by catalog entries,
//! repeat rules by composites of offset clones.
//!
//! The kernel is pure and synchronous. It reads a `TemplateRegistry` and a
//! `Catalog` handed to it by the caller and never touches the filesystem.
//!
//! ## Architecture
//!
//! ```text
//! TemplateRegistry      ← Canonical fields + defaults per type
//!     │
//! Sanitizer             ← Raw document → canonical document (overflow bag)
//!     │
//! Catalog / resolve     ← Named definitions owned by the application
//!     │
//! expand_repeat         ← Repeat rule → composite of N clones
//!     │
//! Compiler              ← References and repeats eliminated
//! ```
//!
//! `Engine` bundles a registry and a catalog behind one entry point.

pub mod catalog;
pub mod compile;
pub mod definition;
pub mod engine;
pub mod error;
pub mod repeat;
pub mod sanitize;
pub mod template;

pub use catalog::{Catalog, MemoryCatalog, resolve};
pub use compile::Compiler;
pub use definition::{Definition, DefinitionKind, OVERFLOW_KEY, RepeatRule, Vector};
pub use engine::Engine;
pub use error::{CompilationError, DefinitionError, UnknownTypeError};
pub use repeat::expand_repeat;
pub use sanitize::{Sanitizer, sanitize_from_template};
pub use template::{Template, TemplateRegistry};
