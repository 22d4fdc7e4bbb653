//! Error types for the binding generator.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during binding generation.
///
/// Every pipeline stage reports its failure through this type; the CLI
/// decides process termination. The only downgraded condition is an
/// unsupported schema construct, which becomes a placeholder field with a
/// diagnostic instead of an error.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The API client failed (transport, auth, or decode).
    #[error(transparent)]
    Client(#[from] replicate_client::Error),

    /// No version was available to generate from: either the requested
    /// version does not exist, or the model has no latest version.
    #[error("no version found for model '{model}'")]
    VersionNotFound {
        /// The model the version was requested for.
        model: String,
    },

    /// The schema document has no `Input` object to generate from.
    #[error("schema document has no usable 'Input' object")]
    SchemaNotFound,

    /// A `$ref` did not resolve to a schema in the same document.
    #[error("unresolved schema reference '{pointer}'")]
    UnresolvedReference {
        /// The reference pointer as written in the document.
        pointer: String,
    },

    /// Two or more source fields mapped to the same Rust identifier.
    #[error("duplicate field identifiers in generated binding: {0}")]
    NameCollision(CollisionList),

    /// The assembled token stream failed to parse as a Rust file.
    #[error("generated code is invalid: {0}")]
    InvalidCode(String),

    /// The API token environment variable is missing or empty.
    #[error("REPLICATE_API_TOKEN is not set")]
    MissingToken,

    /// The requested output file already exists.
    #[error("refusing to overwrite existing file '{path}'")]
    OutputExists {
        /// The output path.
        path: String,
    },

    /// Failed to write the output file.
    #[error("failed to write output file '{path}': {source}")]
    WriteError {
        /// The output path.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One generated identifier together with every source field name that
/// mapped to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The colliding Rust identifier.
    pub identifier: String,
    /// All wire field names that produced it, in declaration order.
    pub sources: Vec<String>,
}

/// All collisions found in a binding, for a single comprehensive report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionList(pub Vec<Collision>);

impl fmt::Display for CollisionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, collision) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let sources = collision
                .sources
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{} (from {sources})", collision.identifier)?;
        }
        Ok(())
    }
}
