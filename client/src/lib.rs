//! Async client for the [Replicate HTTP API](https://replicate.com/docs/reference/http).
//!
//! The crate provides typed resources (models, versions, predictions,
//! collections), cursor-based pagination, and a single authenticated client
//! built on `reqwest`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use replicate_client::{Client, ModelId};
//!
//! let client = Client::new(std::env::var("REPLICATE_API_TOKEN")?);
//! let id: ModelId = "replicate/hello-world".parse()?;
//! let model = client.get_model(&id).await?;
//! println!("{}: {}", model.id(), model.description);
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod pagination;
pub mod prediction;

mod timestamp;

// Re-exports for convenience
pub use client::Client;
pub use error::Error;
pub use model::{Collection, Model, ModelId, Version, Visibility};
pub use pagination::{Cursor, Page};
pub use prediction::{Predictable, Prediction, PredictionStatus};
