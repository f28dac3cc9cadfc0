//! BibTeX rendering of citation entries.

use crate::models::Entry;

/// Join authors for a BibTeX `author` field: "Last, First and Last, First"
pub fn format_authors_bibtex(authors: &[String]) -> String {
    authors
        .iter()
        .map(|a| a.trim())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Generate a BibTeX entry
/// Format: @article{Key,
///   author = {Last, First and Last, First},
///   title = {Title},
///   year = {Year},
///   journal = {Journal},
///   ...
/// }
///
/// Field values are written verbatim; the entry's current key is used as-is.
pub fn format_bibtex(entry: &Entry) -> String {
    let kind = entry.kind();

    let mut fields = vec![
        ("author", format_authors_bibtex(entry.authors())),
        ("title", entry.title().to_string()),
        ("year", entry.year().to_string()),
    ];
    fields.extend(kind.bibtex_fields());

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}}", name, value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("@{}{{{},\n{}\n}}", kind.bibtex_type(), entry.key(), body)
}
