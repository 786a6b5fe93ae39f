//! Static letter content: prose blocks, passport facts and the legal-argument appendix.
//!
//! The records here are plain data. They are built once (either from the built-in sample in
//! [`sample`] or from a TOML file) and handed unmodified to [`crate::compose`]. Field order in
//! [`PassportFacts`] and [`LegalArgument`] is display order.

mod sample;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The prose blocks of one language variant of the letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterContent {
    /// Addressee line.
    pub recipient: String,
    /// Subject line, rendered after the subject prefix label.
    pub subject: String,
    /// Background paragraph.
    pub background: String,
    /// Justification paragraph.
    pub justification: String,
    /// Request paragraph.
    pub request: String,
    /// Repayment / asset-recovery plan paragraph.
    pub repayment_plan: String,
    /// Closing and signature, may contain explicit line breaks.
    pub signature: String,
}

impl LetterContent {
    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("recipient", &self.recipient),
            ("subject", &self.subject),
            ("background", &self.background),
            ("justification", &self.justification),
            ("request", &self.request),
            ("repayment_plan", &self.repayment_plan),
            ("signature", &self.signature),
        ]
    }
}

/// Identity-document fields that may appear in the passport table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassportField {
    Name,
    Nationality,
    DocumentNumber,
    BirthDate,
    BirthPlace,
    IssueDate,
    ExpiryDate,
}

/// One row of the passport table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportEntry {
    pub field: PassportField,
    /// Label shown in the left column, in the variant's language.
    pub label: String,
    /// Value shown in the right column.
    pub value: String,
}

impl PassportEntry {
    /// Creates a new entry.
    pub fn new(field: PassportField, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Ordered passport facts. Each field appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassportFacts {
    entries: Vec<PassportEntry>,
}

impl PassportFacts {
    /// Creates the table from entries in display order.
    pub fn new(entries: impl Into<Vec<PassportEntry>>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    /// Returns the entries in display order.
    pub fn entries(&self) -> &[PassportEntry] {
        &self.entries
    }

    /// Returns the number of configured fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no field is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self, language: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.field) {
                return Err(Error::content(format!(
                    "passport field {:?} appears more than once in variant '{}'",
                    entry.field, language
                )));
            }
            if entry.label.trim().is_empty() || entry.value.trim().is_empty() {
                return Err(Error::content(format!(
                    "passport field {:?} in variant '{}' needs both a label and a value",
                    entry.field, language
                )));
            }
        }
        Ok(())
    }
}

/// Per-language captions used around the letter content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Heading above the passport table.
    pub table_heading: String,
    /// Prefix placed before the subject line, e.g. `Subject`.
    pub subject_prefix: String,
    pub background: String,
    pub justification: String,
    pub request: String,
    pub repayment_plan: String,
    /// Title rendered before the variant, typically used for translations.
    #[serde(default)]
    pub variant_title: Option<String>,
    /// Caption for the UTC timestamp line.
    pub utc_caption: String,
    /// Caption for the local-time timestamp line.
    pub local_caption: String,
    /// Caption introducing the IANA zone name.
    pub zone_caption: String,
}

/// A complete language variant of the letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageVariant {
    /// BCP 47 style language tag, used in logs and outline titles.
    pub language: String,
    pub labels: Labels,
    pub content: LetterContent,
    pub passport: PassportFacts,
}

impl LanguageVariant {
    fn validate(&self) -> Result<()> {
        for (name, value) in self.content.fields() {
            if value.trim().is_empty() {
                return Err(Error::content(format!(
                    "field '{}' of variant '{}' is empty",
                    name, self.language
                )));
            }
        }
        self.passport.validate(&self.language)
    }
}

/// A titled paragraph of the legal-argument appendix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalSection {
    pub title: String,
    pub body: String,
}

impl LegalSection {
    /// Creates a new section.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Fixed appendix appended after every letter variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalArgument {
    pub heading: String,
    /// Note rendered between the heading and the first section.
    #[serde(default)]
    pub preliminary: Option<String>,
    pub sections: Vec<LegalSection>,
}

/// The whole letter: one or two language variants and an optional appendix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    pub primary: LanguageVariant,
    #[serde(default)]
    pub secondary: Option<LanguageVariant>,
    #[serde(default)]
    pub legal_argument: Option<LegalArgument>,
}

impl Letter {
    /// Returns the built-in bilingual sample letter.
    pub fn builtin() -> Self {
        sample::letter()
    }

    /// Parses a letter from TOML source.
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Reads, parses and validates a letter from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let letter = Self::from_toml_str(&source).map_err(|source| Error::ContentParse {
            path: path.to_path_buf(),
            source,
        })?;
        letter.validate()?;
        Ok(letter)
    }

    /// Returns the configured variants in rendering order.
    pub fn variants(&self) -> impl Iterator<Item = &LanguageVariant> {
        std::iter::once(&self.primary).chain(self.secondary.as_ref())
    }

    /// Checks that every text block is present and that the passport tables are well-formed.
    pub fn validate(&self) -> Result<()> {
        for variant in self.variants() {
            variant.validate()?;
        }

        if let Some(legal) = &self.legal_argument {
            if legal.heading.trim().is_empty() {
                return Err(Error::content("legal argument heading is empty"));
            }
            for (index, section) in legal.sections.iter().enumerate() {
                if section.title.trim().is_empty() || section.body.trim().is_empty() {
                    return Err(Error::content(format!(
                        "legal argument section {} needs both a title and a body",
                        index + 1
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_letter_is_valid() {
        let letter = Letter::builtin();
        letter.validate().expect("built-in content validates");
        assert!(letter.secondary.is_some());
        assert!(letter.legal_argument.is_some());
        assert_eq!(letter.primary.passport.len(), 7);
    }

    #[test]
    fn duplicate_passport_field_is_rejected() {
        let mut letter = Letter::builtin();
        letter.primary.passport = PassportFacts::new(vec![
            PassportEntry::new(PassportField::Name, "Name", "A"),
            PassportEntry::new(PassportField::Name, "Name", "B"),
        ]);
        let err = letter.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn empty_passport_value_is_rejected() {
        let mut letter = Letter::builtin();
        letter.primary.passport = PassportFacts::new(vec![PassportEntry::new(
            PassportField::Nationality,
            "Nationality",
            "  ",
        )]);
        assert!(letter.validate().is_err());
    }

    #[test]
    fn empty_prose_block_is_rejected() {
        let mut letter = Letter::builtin();
        if let Some(secondary) = letter.secondary.as_mut() {
            secondary.content.request.clear();
        }
        let err = letter.validate().unwrap_err();
        assert!(err.to_string().contains("request"));
    }

    #[test]
    fn parses_minimal_toml_letter() {
        let source = r#"
            [primary]
            language = "en"

            [primary.labels]
            table_heading = "Passport"
            subject_prefix = "Subject"
            background = "Background"
            justification = "Justification"
            request = "Request"
            repayment_plan = "Plan"
            utc_caption = "UTC"
            local_caption = "Local time"
            zone_caption = "zone"

            [primary.content]
            recipient = "To: Officer"
            subject = "Asylum"
            background = "b"
            justification = "j"
            request = "r"
            repayment_plan = "p"
            signature = "Sincerely"

            [[primary.passport]]
            field = "document_number"
            label = "Passport No."
            value = "X1"
        "#;

        let letter = Letter::from_toml_str(source).expect("parse");
        letter.validate().expect("valid");
        assert!(letter.secondary.is_none());
        assert!(letter.legal_argument.is_none());
        assert_eq!(
            letter.primary.passport.entries()[0].field,
            PassportField::DocumentNumber
        );
    }

    #[test]
    fn malformed_override_keeps_the_parse_error_as_source() {
        use std::error::Error as _;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("letter.toml");
        fs::write(&path, "[primary\nlanguage = ").expect("write");

        let err = Letter::from_path(&path).unwrap_err();
        assert!(matches!(&err, Error::ContentParse { path: reported, .. } if *reported == path));
        assert!(err.to_string().contains("letter.toml"));
        let source = err.source().expect("parse error source");
        assert!(source.downcast_ref::<toml::de::Error>().is_some());
    }
}
