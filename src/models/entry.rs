//! Citation entry model: one closed set of bibliographic types sharing a
//! common core of authors, title, year and key.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::citeable::Citeable;
use super::record::{EntryRecord, EntryType};
use crate::utils::{format_bibtex, generate_key, require_non_empty_authors, ValidationError};

/// Kind of thesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThesisType {
    Phd,
    Masters,
}

impl ThesisType {
    /// Returns the identifier used in entry records
    pub fn as_str(&self) -> &'static str {
        match self {
            ThesisType::Phd => "phd",
            ThesisType::Masters => "masters",
        }
    }

    /// Returns the BibTeX entry type
    pub fn bibtex_type(&self) -> &'static str {
        match self {
            ThesisType::Phd => "phdthesis",
            ThesisType::Masters => "mastersthesis",
        }
    }
}

impl FromStr for ThesisType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phd" => Ok(ThesisType::Phd),
            "masters" => Ok(ThesisType::Masters),
            other => Err(ValidationError::InvalidThesisType(other.to_string())),
        }
    }
}

impl fmt::Display for ThesisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journal article. Exactly one of `pages` or `article_number` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Article {
    pub journal: String,
    pub volume: u32,
    pub pages: Option<String>,
    pub article_number: Option<String>,
    pub number: Option<String>,
    pub doi: Option<String>,
}

impl Article {
    pub fn new(journal: impl Into<String>, volume: u32) -> Self {
        Self {
            journal: journal.into(),
            volume,
            pages: None,
            article_number: None,
            number: None,
            doi: None,
        }
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    pub fn article_number(mut self, article_number: impl Into<String>) -> Self {
        self.article_number = Some(article_number.into());
        self
    }

    /// Set the issue number
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Book {
    pub publisher: String,
    pub address: Option<String>,
    pub edition: Option<String>,
    pub doi: Option<String>,
}

impl Book {
    pub fn new(publisher: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            address: None,
            edition: None,
            doi: None,
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }
}

/// Paper in conference proceedings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InProceedings {
    pub booktitle: String,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    pub doi: Option<String>,
}

impl InProceedings {
    pub fn new(booktitle: impl Into<String>) -> Self {
        Self {
            booktitle: booktitle.into(),
            pages: None,
            publisher: None,
            doi: None,
        }
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TechReport {
    pub institution: String,
    pub number: Option<String>,
    pub url: Option<String>,
}

impl TechReport {
    pub fn new(institution: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            number: None,
            url: None,
        }
    }

    /// Set the report number
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thesis {
    pub school: String,
    pub thesis_type: ThesisType,
    pub url: Option<String>,
}

impl Thesis {
    pub fn new(school: impl Into<String>, thesis_type: ThesisType) -> Self {
        Self {
            school: school.into(),
            thesis_type,
            url: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Software release. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Software {
    pub version: Option<String>,
    pub url: Option<String>,
    pub publisher: Option<String>,
    pub doi: Option<String>,
}

impl Software {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }
}

/// Anything that fits no other type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Misc {
    pub note: Option<String>,
    pub howpublished: Option<String>,
    pub url: Option<String>,
}

impl Misc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn howpublished(mut self, howpublished: impl Into<String>) -> Self {
        self.howpublished = Some(howpublished.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Type-specific part of an entry.
///
/// The derived `PartialEq`/`Hash` include the variant, so an `Article` never
/// equals a `Book` even when their shared fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Article(Article),
    Book(Book),
    InProceedings(InProceedings),
    TechReport(TechReport),
    Thesis(Thesis),
    Software(Software),
    Misc(Misc),
}

impl EntryKind {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryKind::Article(_) => EntryType::Article,
            EntryKind::Book(_) => EntryType::Book,
            EntryKind::InProceedings(_) => EntryType::InProceedings,
            EntryKind::TechReport(_) => EntryType::TechReport,
            EntryKind::Thesis(_) => EntryType::Thesis,
            EntryKind::Software(_) => EntryType::Software,
            EntryKind::Misc(_) => EntryType::Misc,
        }
    }

    /// Returns the BibTeX entry type (`article`, `phdthesis`, ...)
    pub fn bibtex_type(&self) -> &'static str {
        match self {
            EntryKind::Article(_) => "article",
            EntryKind::Book(_) => "book",
            EntryKind::InProceedings(_) => "inproceedings",
            EntryKind::TechReport(_) => "techreport",
            EntryKind::Thesis(t) => t.thesis_type.bibtex_type(),
            EntryKind::Software(_) => "software",
            EntryKind::Misc(_) => "misc",
        }
    }

    /// Check constraints the type system cannot express
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            EntryKind::Article(a) if a.pages.is_some() == a.article_number.is_some() => {
                Err(ValidationError::ArticleLocator)
            }
            _ => Ok(()),
        }
    }

    /// Type-specific BibTeX fields, in output order. Absent optional fields
    /// are left out.
    pub fn bibtex_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |name: &'static str, value: Option<&String>| {
            if let Some(v) = value {
                fields.push((name, v.clone()));
            }
        };

        match self {
            EntryKind::Article(a) => {
                push("journal", Some(&a.journal));
                push("volume", Some(&a.volume.to_string()));
                push("number", a.number.as_ref());
                push("pages", a.pages.as_ref());
                push("eid", a.article_number.as_ref());
                push("doi", a.doi.as_ref());
            }
            EntryKind::Book(b) => {
                push("publisher", Some(&b.publisher));
                push("address", b.address.as_ref());
                push("edition", b.edition.as_ref());
                push("doi", b.doi.as_ref());
            }
            EntryKind::InProceedings(p) => {
                push("booktitle", Some(&p.booktitle));
                push("pages", p.pages.as_ref());
                push("publisher", p.publisher.as_ref());
                push("doi", p.doi.as_ref());
            }
            EntryKind::TechReport(r) => {
                push("institution", Some(&r.institution));
                push("number", r.number.as_ref());
                push("url", r.url.as_ref());
            }
            EntryKind::Thesis(t) => {
                push("school", Some(&t.school));
                push("url", t.url.as_ref());
            }
            EntryKind::Software(s) => {
                push("version", s.version.as_ref());
                push("publisher", s.publisher.as_ref());
                push("url", s.url.as_ref());
                push("doi", s.doi.as_ref());
            }
            EntryKind::Misc(m) => {
                push("howpublished", m.howpublished.as_ref());
                push("note", m.note.as_ref());
                push("url", m.url.as_ref());
            }
        }

        fields
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EntryKind {
                fn from(value: $variant) -> Self {
                    EntryKind::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(Article, Book, InProceedings, TechReport, Thesis, Software, Misc);

/// A validated citation entry.
///
/// Content fields are fixed at construction. Only the key may change
/// afterwards, and it never takes part in equality or hashing, nor does the
/// free-form `app` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EntryRecord")]
pub struct Entry {
    authors: Vec<String>,
    title: String,
    year: i32,
    kind: EntryKind,
    key: String,
    app: Option<String>,
}

impl Entry {
    /// Start building an entry from its common fields
    pub fn builder<I, S>(authors: I, title: impl Into<String>, year: i32) -> EntryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EntryBuilder::new(authors, title, year)
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn entry_type(&self) -> EntryType {
        self.kind.entry_type()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    /// Application tag, carried along but ignored for equality
    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.authors == other.authors
            && self.title == other.title
            && self.year == other.year
    }
}

impl Eq for Entry {}

impl Hash for Entry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.authors.hash(state);
        self.title.hash(state);
        self.year.hash(state);
    }
}

impl Citeable for Entry {
    fn authors(&self) -> &[String] {
        &self.authors
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn to_bibtex(&self) -> String {
        format_bibtex(self)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_bibtex(self))
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EntryRecord::from(self).serialize(serializer)
    }
}

/// Builder for constructing validated [`Entry`] values
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    authors: Vec<String>,
    title: String,
    year: i32,
    key: Option<String>,
    app: Option<String>,
}

impl EntryBuilder {
    /// Create a new builder with the fields every entry shares
    pub fn new<I, S>(authors: I, title: impl Into<String>, year: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authors: authors.into_iter().map(Into::into).collect(),
            title: title.into(),
            year,
            key: None,
            app: None,
        }
    }

    /// Use an explicit key instead of the generated one. An empty key is
    /// ignored.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// Validate and build the entry.
    pub fn build(self, kind: impl Into<EntryKind>) -> Result<Entry, ValidationError> {
        let kind = kind.into();
        require_non_empty_authors(&self.authors, kind.entry_type().name())?;
        kind.validate()?;

        let key = match self.key {
            Some(key) if !key.is_empty() => key,
            _ => generate_key(&self.authors, self.year),
        };

        Ok(Entry {
            authors: self.authors,
            title: self.title,
            year: self.year,
            kind,
            key,
            app: self.app,
        })
    }
}
