//! Core shared types and errors (renderer-agnostic).

pub mod error;
pub mod material;
pub mod vertex;

pub use error::{AttributeKind, LoadError, LoadResult};
pub use material::{Material, MaterialUniform};
pub use vertex::Vertex;
