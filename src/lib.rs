//! rustgrab library
//!
//! Resolves a media page URL into a ranked catalog of downloadable streams,
//! falling back across extraction strategies when a platform blocks automated
//! access.

pub mod api;
pub mod app;
pub mod catalog;
pub mod extractor;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use api::{AnalyzeResponse, ErrorBody};
pub use catalog::{canonicalize, MediaCatalog, StreamVariant};
pub use extractor::{
    BackendAdapter, BackendKind, Orchestrator, Platform, RawMetadataRecord, RawStreamDescriptor,
    RuntimeContext,
};
pub use utils::{ExtractionFailure, FailureKind, ResolveError, Settings};
