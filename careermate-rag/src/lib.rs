//! # careermate-rag
//!
//! Hybrid retrieval over a job-postings corpus.
//!
//! ## Overview
//!
//! - [`JobPosting`] / [`read_postings_csv`] - offline corpus preparation
//! - [`RecursiveChunker`] - bounded, overlapping chunks carrying posting metadata
//! - [`EmbeddingProvider`] - [`HashEmbeddingProvider`] locally, OpenAI behind the `openai` feature
//! - [`CorpusIndex`] - one chunk sequence backing an [`InMemoryVectorStore`] and a [`Bm25Index`]
//! - [`CorpusSnapshot`] - persisted build, reloadable without re-embedding
//! - [`HybridRetriever`] - dense-first fusion of dense and BM25 top-k, deduplicated by content
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use careermate_rag::{CorpusIndex, HashEmbeddingProvider, HybridRetriever};
//!
//! let index = Arc::new(
//!     CorpusIndex::builder()
//!         .embedding_provider(Arc::new(HashEmbeddingProvider::default()))
//!         .build_from_documents(&documents)
//!         .await?,
//! );
//! let retriever = HybridRetriever::new(index, 20);
//! let result = retriever.retrieve("Find jobs requiring: SQL.").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod corpus;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hash;
pub mod inmemory;
#[cfg(feature = "openai")]
pub mod openai;
pub mod postings;
pub mod retriever;
pub mod sparse;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{Bm25Params, RagConfig, RagConfigBuilder};
pub use corpus::{CorpusIndex, CorpusIndexBuilder, CorpusSnapshot};
pub use document::{
    Chunk, Document, META_DESIGNATION, META_INVOLVEMENT, META_LOCATION, META_WORK_TYPE,
    RetrievalResult,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use hash::HashEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use postings::{JobPosting, postings_to_documents, read_postings_csv};
pub use retriever::HybridRetriever;
pub use sparse::Bm25Index;
pub use vectorstore::{VectorEntry, VectorHit, VectorStore};
