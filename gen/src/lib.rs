//! Typed Rust binding generation for Replicate models.
//!
//! A model version carries an OpenAPI-style schema document describing its
//! input and output. This crate turns that document into a self-contained
//! Rust source file: a marker type with model and version constants, a
//! serializable input struct with the schema's defaults, and an output type.
//!
//! The pipeline is a straight line: fetch ([`fetcher`]), parse ([`schema`]),
//! map ([`mapper`]), synthesize ([`binding`]), emit ([`emit`]). The
//! [`generate`] function runs the whole thing.

pub mod binding;
pub mod emit;
pub mod errors;
pub mod fetcher;
pub mod generate;
pub mod mapper;
pub mod schema;

pub use binding::{BindingDeclaration, FieldDescriptor, derive_binding_name, synthesize};
pub use emit::{emit, format_source};
pub use errors::GeneratorError;
pub use fetcher::{ResolvedModel, resolve};
pub use generate::{generate, write_binding};
pub use mapper::{TypeDescriptor, map_node, rust_identifier};
pub use schema::{SchemaKind, SchemaNode, SchemaSet, parse_document};
