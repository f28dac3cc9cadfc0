//! # citeable
//!
//! Citation entries with stable keys, content-based deduplication, and
//! BibTeX output.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Citation entries (Article, Book, Thesis, ...) and their JSON records
//! - [`utils`]: Surname extraction, key generation, deduplication, and BibTeX writing
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal status output for the CLI

pub mod config;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{
    Article, Book, Citeable, Entry, EntryBuilder, EntryKind, InProceedings, Misc, Software,
    TechReport, Thesis, ThesisType,
};
pub use utils::{assign_unique_keys, generate_key, write_bibtex, KeyError, ValidationError, WriteError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
