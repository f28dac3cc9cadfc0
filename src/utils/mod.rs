//! Key engine and supporting utilities.
//!
//! - [`extract_surname`]: Pull a clean, title-cased surname out of an author name
//! - [`generate_key`]: Build a `Surname.Year` key from the first author and the year
//! - [`deduplicate`]: Drop content-equal entries, first occurrence wins
//! - [`assign_unique_keys`]: Deduplicate and suffix colliding keys in place
//! - [`format_bibtex`]: Render an entry as a BibTeX block
//! - [`write_bibtex`]: Resolve keys and write a `.bib` file
//!
//! # Writing a bibliography
//!
//! ```rust,no_run
//! use citeable::models::{EntryBuilder, Misc};
//! use citeable::utils::write_bibtex;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let a = EntryBuilder::new(["Smith, A"], "Paper A", 2024).build(Misc::new())?;
//! let b = EntryBuilder::new(["Smith, B"], "Paper B", 2024).build(Misc::new())?;
//!
//! let mut entries = vec![a, b];
//! write_bibtex(entries.iter_mut(), "refs.bib")?;
//! assert_eq!(entries[0].key(), "Smith.2024.a");
//! # Ok(())
//! # }
//! ```

mod bibfile;
mod cite;
mod dedup;
mod keys;
mod validate;

pub use bibfile::{to_bibtex_string, write_bibtex, WriteError, ENTRY_SEPARATOR};
pub use cite::{format_authors_bibtex, format_bibtex};
pub use dedup::deduplicate;
pub use keys::{
    assign_unique_keys, find_key_collisions, generate_key, KeyError, KeyGroup, MAX_COLLISIONS,
};
pub use validate::{extract_surname, require_field, require_non_empty_authors, ValidationError};
