//! Flat, serde-friendly form of an entry.
//!
//! Records are what the CLI reads and writes. Turning a record into an
//! [`Entry`] runs the same validation as [`EntryBuilder`], so an invalid
//! record never becomes an entry.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::{
    Article, Book, Entry, EntryBuilder, EntryKind, InProceedings, Misc, Software, TechReport,
    Thesis,
};
use crate::utils::{require_field, require_non_empty_authors, ValidationError};

/// Bibliographic type of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Article,
    Book,
    InProceedings,
    TechReport,
    Thesis,
    Software,
    Misc,
}

impl EntryType {
    /// Returns the display name used in validation messages
    pub fn name(&self) -> &'static str {
        match self {
            EntryType::Article => "Article",
            EntryType::Book => "Book",
            EntryType::InProceedings => "InProceedings",
            EntryType::TechReport => "TechReport",
            EntryType::Thesis => "Thesis",
            EntryType::Software => "Software",
            EntryType::Misc => "Misc",
        }
    }
}

impl EntryType {
    /// Variant fields an entry of this type can carry
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntryType::Article => &["journal", "volume", "pages", "article_number", "number", "doi"],
            EntryType::Book => &["publisher", "address", "edition", "doi"],
            EntryType::InProceedings => &["booktitle", "pages", "publisher", "doi"],
            EntryType::TechReport => &["institution", "number", "url"],
            EntryType::Thesis => &["school", "thesis_type", "url"],
            EntryType::Software => &["version", "url", "publisher", "doi"],
            EntryType::Misc => &["note", "howpublished", "url"],
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry as a flat set of optional fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryRecord {
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    #[serde(default)]
    pub author: Vec<String>,

    pub title: String,

    pub year: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booktitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thesis_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub howpublished: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EntryRecord {
    /// Create a record with only the common fields set
    pub fn new(entry_type: EntryType, author: Vec<String>, title: String, year: i32) -> Self {
        Self {
            entry_type,
            author,
            title,
            year,
            key: None,
            app: None,
            journal: None,
            volume: None,
            number: None,
            pages: None,
            article_number: None,
            publisher: None,
            address: None,
            edition: None,
            booktitle: None,
            institution: None,
            school: None,
            thesis_type: None,
            version: None,
            note: None,
            howpublished: None,
            doi: None,
            url: None,
        }
    }
}

impl EntryRecord {
    /// Names of the variant fields set on this record
    fn set_fields(&self) -> impl Iterator<Item = &'static str> {
        [
            ("journal", self.journal.is_some()),
            ("volume", self.volume.is_some()),
            ("number", self.number.is_some()),
            ("pages", self.pages.is_some()),
            ("article_number", self.article_number.is_some()),
            ("publisher", self.publisher.is_some()),
            ("address", self.address.is_some()),
            ("edition", self.edition.is_some()),
            ("booktitle", self.booktitle.is_some()),
            ("institution", self.institution.is_some()),
            ("school", self.school.is_some()),
            ("thesis_type", self.thesis_type.is_some()),
            ("version", self.version.is_some()),
            ("note", self.note.is_some()),
            ("howpublished", self.howpublished.is_some()),
            ("doi", self.doi.is_some()),
            ("url", self.url.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = ValidationError;

    fn try_from(r: EntryRecord) -> Result<Self, Self::Error> {
        let name = r.entry_type.name();
        require_non_empty_authors(&r.author, name)?;

        // Fields of another variant would be dropped on conversion
        let allowed = r.entry_type.fields();
        if let Some(field) = r.set_fields().find(|f| !allowed.contains(f)) {
            return Err(ValidationError::UnexpectedField {
                entry_type: name,
                field,
            });
        }

        let kind: EntryKind = match r.entry_type {
            EntryType::Article => Article {
                journal: require_field(r.journal, "journal", name)?,
                volume: require_field(r.volume, "volume", name)?,
                pages: r.pages,
                article_number: r.article_number,
                number: r.number,
                doi: r.doi,
            }
            .into(),
            EntryType::Book => Book {
                publisher: require_field(r.publisher, "publisher", name)?,
                address: r.address,
                edition: r.edition,
                doi: r.doi,
            }
            .into(),
            EntryType::InProceedings => InProceedings {
                booktitle: require_field(r.booktitle, "booktitle", name)?,
                pages: r.pages,
                publisher: r.publisher,
                doi: r.doi,
            }
            .into(),
            EntryType::TechReport => TechReport {
                institution: require_field(r.institution, "institution", name)?,
                number: r.number,
                url: r.url,
            }
            .into(),
            EntryType::Thesis => Thesis {
                school: require_field(r.school, "school", name)?,
                thesis_type: require_field(r.thesis_type, "thesis_type", name)?.parse()?,
                url: r.url,
            }
            .into(),
            EntryType::Software => Software {
                version: r.version,
                url: r.url,
                publisher: r.publisher,
                doi: r.doi,
            }
            .into(),
            EntryType::Misc => Misc {
                note: r.note,
                howpublished: r.howpublished,
                url: r.url,
            }
            .into(),
        };

        let mut builder = EntryBuilder::new(r.author, r.title, r.year);
        if let Some(key) = r.key {
            builder = builder.key(key);
        }
        if let Some(app) = r.app {
            builder = builder.app(app);
        }
        builder.build(kind)
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        let mut r = EntryRecord::new(
            entry.entry_type(),
            entry.authors().to_vec(),
            entry.title().to_string(),
            entry.year(),
        );
        r.key = Some(entry.key().to_string());
        r.app = entry.app().map(str::to_string);

        match entry.kind().clone() {
            EntryKind::Article(a) => {
                r.journal = Some(a.journal);
                r.volume = Some(a.volume);
                r.pages = a.pages;
                r.article_number = a.article_number;
                r.number = a.number;
                r.doi = a.doi;
            }
            EntryKind::Book(b) => {
                r.publisher = Some(b.publisher);
                r.address = b.address;
                r.edition = b.edition;
                r.doi = b.doi;
            }
            EntryKind::InProceedings(p) => {
                r.booktitle = Some(p.booktitle);
                r.pages = p.pages;
                r.publisher = p.publisher;
                r.doi = p.doi;
            }
            EntryKind::TechReport(t) => {
                r.institution = Some(t.institution);
                r.number = t.number;
                r.url = t.url;
            }
            EntryKind::Thesis(t) => {
                r.school = Some(t.school);
                r.thesis_type = Some(t.thesis_type.as_str().to_string());
                r.url = t.url;
            }
            EntryKind::Software(s) => {
                r.version = s.version;
                r.url = s.url;
                r.publisher = s.publisher;
                r.doi = s.doi;
            }
            EntryKind::Misc(m) => {
                r.note = m.note;
                r.howpublished = m.howpublished;
                r.url = m.url;
            }
        }

        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThesisType;

    fn parse(json: &str) -> Result<Entry, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_record_to_article() {
        let entry = parse(
            r#"{"type": "article", "author": ["Huttley, Gavin"], "title": "A paper",
                "year": 2025, "journal": "JOSS", "volume": 10, "pages": "7765"}"#,
        )
        .unwrap();

        assert_eq!(entry.key(), "Huttley.2025");
        assert_eq!(entry.entry_type(), EntryType::Article);
    }

    #[test]
    fn test_record_missing_required_field() {
        let err = parse(
            r#"{"type": "article", "author": ["Smith, Jane"], "title": "Something",
                "year": 2024, "journal": "Nature", "pages": "1-10"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Article requires 'volume'"));

        let err = parse(
            r#"{"type": "inproceedings", "author": ["Doe, John"], "title": "Paper", "year": 2023}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("InProceedings requires 'booktitle'"));
    }

    #[test]
    fn test_record_missing_authors() {
        let err = parse(r#"{"type": "misc", "title": "Something", "year": 2024}"#).unwrap_err();
        assert!(err.to_string().contains("Misc requires at least one author"));
    }

    #[test]
    fn test_record_thesis_type() {
        let entry = parse(
            r#"{"type": "thesis", "author": ["Student, Alice"], "title": "My Thesis",
                "year": 2022, "school": "MIT", "thesis_type": "masters"}"#,
        )
        .unwrap();
        match entry.kind() {
            EntryKind::Thesis(t) => assert_eq!(t.thesis_type, ThesisType::Masters),
            other => panic!("Expected thesis, got {:?}", other),
        }

        let err = parse(
            r#"{"type": "thesis", "author": ["Student, Alice"], "title": "My Thesis",
                "year": 2022, "school": "MIT", "thesis_type": "bachelor"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'phd' or 'masters'"));
    }

    #[test]
    fn test_record_rejects_unknown_fields() {
        let result = parse(
            r#"{"type": "misc", "author": ["Smith, A"], "title": "T", "year": 2020, "colour": "red"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_rejects_fields_of_other_variants() {
        let err = parse(
            r#"{"type": "misc", "author": ["Smith, A"], "title": "T", "year": 2020,
                "journal": "Nature", "volume": 3}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Misc does not accept 'journal'"));

        let mut record = EntryRecord::new(
            EntryType::Book,
            vec!["Knuth, Donald".to_string()],
            "The Art".to_string(),
            1997,
        );
        record.publisher = Some("Addison-Wesley".to_string());
        record.url = Some("https://example.org".to_string());
        assert_eq!(
            Entry::try_from(record),
            Err(ValidationError::UnexpectedField {
                entry_type: "Book",
                field: "url"
            })
        );
    }

    #[test]
    fn test_entry_fields_survive_record_conversion() {
        for entry_type in [EntryType::Article, EntryType::Thesis, EntryType::Misc] {
            let json = match entry_type {
                EntryType::Article => r#"{"type": "article", "author": ["A, B"], "title": "T", "year": 2020,
                    "journal": "J", "volume": 1, "article_number": "e1", "number": "2", "doi": "10.1/x"}"#,
                EntryType::Thesis => r#"{"type": "thesis", "author": ["A, B"], "title": "T", "year": 2020,
                    "school": "MIT", "thesis_type": "phd", "url": "https://example.org"}"#,
                _ => r#"{"type": "misc", "author": ["A, B"], "title": "T", "year": 2020,
                    "note": "n", "howpublished": "web", "url": "https://example.org"}"#,
            };
            let input: serde_json::Value = serde_json::from_str(json).unwrap();
            let entry: Entry = serde_json::from_value(input.clone()).unwrap();
            let output = serde_json::to_value(&entry).unwrap();

            for field in entry_type.fields() {
                assert_eq!(input.get(*field), output.get(*field), "{} on {}", field, entry_type);
            }
        }
    }

    #[test]
    fn test_entry_serializes_as_record() {
        let entry = EntryBuilder::new(["Dev, Jane"], "my-tool", 2024)
            .app("my-plugin")
            .build(Software::new().version("1.0.0"))
            .unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "software");
        assert_eq!(value["key"], "Dev.2024");
        assert_eq!(value["app"], "my-plugin");
        assert_eq!(value["version"], "1.0.0");
        assert!(value.get("url").is_none());

        let back: Entry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.key(), entry.key());
        assert_eq!(back.app(), Some("my-plugin"));
    }
}
