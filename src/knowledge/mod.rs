//! Knowledge base: reference-document downloads and semantic query.
//!
//! [`catalogue`] names the documents, [`loader`] downloads them into a
//! category-partitioned directory tree, and [`index`] builds a vector index
//! over their text (Ollama embeddings) for `ask` queries.

pub mod catalogue;
pub mod index;
pub mod loader;
