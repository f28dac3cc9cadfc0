//! Citation key generation and collision resolution.
//!
//! Keys have the form `Surname.Year`. When several distinct entries end up
//! with the same key, each one gets a letter suffix in input order:
//! `Smith.2024.a`, `Smith.2024.b`, ...

use std::collections::HashMap;
use thiserror::Error;

use super::dedup::deduplicate;
use super::validate::extract_surname;
use crate::models::Citeable;

/// Number of single-letter suffixes available for one key
pub const MAX_COLLISIONS: usize = 26;

/// Key assignment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("More than {max} collisions for key '{key}' ({count} entries)", max = MAX_COLLISIONS)]
    CollisionOverflow { key: String, count: usize },
}

/// Generate a citation key from the first author's surname and the year.
///
/// The surname is taken from `authors[0]` via [`extract_surname`]. Callers
/// guarantee a non-empty author list; an empty one yields `".{year}"`.
pub fn generate_key<S: AsRef<str>>(authors: &[S], year: i32) -> String {
    let surname = authors
        .first()
        .map(|author| extract_surname(author.as_ref()))
        .unwrap_or_default();
    format!("{}.{}", surname, year)
}

/// Entries sharing one key, by position in the sequence they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
    pub key: String,
    pub members: Vec<usize>,
}

/// Group entries by current key, in order of each key's first appearance.
fn group_by_key<'s, C>(entries: impl IntoIterator<Item = &'s C>) -> Vec<KeyGroup>
where
    C: Citeable + 's,
{
    let mut index: HashMap<&'s str, usize> = HashMap::new();
    let mut groups: Vec<KeyGroup> = Vec::new();

    for (position, entry) in entries.into_iter().enumerate() {
        let key = entry.key();
        match index.get(key) {
            Some(&g) => groups[g].members.push(position),
            None => {
                index.insert(key, groups.len());
                groups.push(KeyGroup {
                    key: key.to_string(),
                    members: vec![position],
                });
            }
        }
    }

    groups
}

/// Find keys shared by more than one entry, without changing anything.
pub fn find_key_collisions<'s, C>(entries: impl IntoIterator<Item = &'s C>) -> Vec<KeyGroup>
where
    C: Citeable + 's,
{
    group_by_key(entries)
        .into_iter()
        .filter(|group| group.members.len() > 1)
        .collect()
}

/// Deduplicate `entries` by content and make the survivors' keys unique.
///
/// Later content-equal entries are dropped in favour of the first one. Keys
/// shared by several survivors get `.a`, `.b`, ... appended in input order;
/// unique keys are left alone. Keys are rewritten in place and the returned
/// references are the surviving input entries, in input order.
///
/// Suffixed keys are not checked again within the pass, so an explicit key
/// such as `Smith.2024.a` can still equal a generated one. Without such keys
/// the result is a fixed point: running it again changes nothing.
///
/// # Errors
///
/// [`KeyError::CollisionOverflow`] if more than [`MAX_COLLISIONS`] distinct
/// entries share a key. No key is modified in that case.
pub fn assign_unique_keys<'a, C>(
    entries: impl IntoIterator<Item = &'a mut C>,
) -> Result<Vec<&'a mut C>, KeyError>
where
    C: Citeable + 'a,
{
    let mut unique = deduplicate(entries);
    let groups = group_by_key(unique.iter().map(|entry| &**entry));

    if let Some(group) = groups.iter().find(|g| g.members.len() > MAX_COLLISIONS) {
        tracing::warn!(
            "Cannot disambiguate key {:?}: {} entries share it",
            group.key,
            group.members.len()
        );
        return Err(KeyError::CollisionOverflow {
            key: group.key.clone(),
            count: group.members.len(),
        });
    }

    let mut renamed = 0;
    for group in groups.iter().filter(|g| g.members.len() > 1) {
        for (&position, suffix) in group.members.iter().zip('a'..='z') {
            unique[position].set_key(format!("{}.{}", group.key, suffix));
            renamed += 1;
        }
    }

    tracing::debug!(
        "Assigned keys to {} entries ({} renamed)",
        unique.len(),
        renamed
    );

    Ok(unique)
}
