//! The capability the key engine needs from a citation entry.

use std::hash::Hash;

/// Anything that can be keyed, deduplicated, and written to a bibliography.
///
/// `Eq` and `Hash` must describe the entry's *content*: two values are equal
/// iff they would be the same bibliography record. The key must never take
/// part in equality or hashing, since the resolver rewrites it while entries
/// sit in a hash set.
pub trait Citeable: Eq + Hash {
    /// Ordered author names, first author first.
    fn authors(&self) -> &[String];

    /// Publication year.
    fn year(&self) -> i32;

    /// Current citation key.
    fn key(&self) -> &str;

    /// Replace the citation key.
    fn set_key(&mut self, key: String);

    /// Render the entry as a BibTeX block using its current key.
    fn to_bibtex(&self) -> String;
}
