//! Stream canonicalization

pub mod canonicalize;
pub mod format;
pub mod models;

pub use canonicalize::{canonicalize, MAX_PER_CLASS};
pub use models::{MediaCatalog, StreamClass, StreamVariant};
