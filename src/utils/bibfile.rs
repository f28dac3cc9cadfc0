//! Writing resolved entries as a `.bib` file.

use std::path::Path;
use thiserror::Error;

use super::keys::{assign_unique_keys, KeyError};
use crate::models::Citeable;

/// Separator placed between rendered entries
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Errors from [`write_bibtex`]
#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Deduplicate, assign unique keys, and render entries as BibTeX text.
///
/// Blocks are joined by a single blank line with nothing before the first
/// or after the last. No entries gives an empty string.
pub fn to_bibtex_string<'a, C>(entries: impl IntoIterator<Item = &'a mut C>) -> Result<String, KeyError>
where
    C: Citeable + 'a,
{
    let unique = assign_unique_keys(entries)?;
    Ok(render(&unique))
}

/// Deduplicate, assign unique keys, and write a `.bib` file as UTF-8.
///
/// Keys of the surviving entries are updated in place and the number of
/// entries written is returned. The parent directory must already exist;
/// I/O errors are returned unchanged.
pub fn write_bibtex<'a, C>(
    entries: impl IntoIterator<Item = &'a mut C>,
    path: impl AsRef<Path>,
) -> Result<usize, WriteError>
where
    C: Citeable + 'a,
{
    let path = path.as_ref();
    let unique = assign_unique_keys(entries)?;
    let content = render(&unique);
    std::fs::write(path, content.as_bytes())?;
    tracing::info!(
        "Wrote {} entries ({} bytes) to {}",
        unique.len(),
        content.len(),
        path.display()
    );
    Ok(unique.len())
}

fn render<C: Citeable>(entries: &[&mut C]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_bibtex())
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}
