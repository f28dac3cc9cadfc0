//! Core data models for citation entries.

mod citeable;
mod entry;
mod record;

pub use citeable::Citeable;
pub use entry::{
    Article, Book, Entry, EntryBuilder, EntryKind, InProceedings, Misc, Software, TechReport,
    Thesis, ThesisType,
};
pub use record::{EntryRecord, EntryType};
