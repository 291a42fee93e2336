//! Contact card export: a fixed contact record serialized as a vCard 3.0 file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("failed to read contact card {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse contact card {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactCard {
    pub family_name: String,
    pub given_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub url: String,
}

impl Default for ContactCard {
    fn default() -> Self {
        Self {
            family_name: "Rivera".into(),
            given_name: "Sam".into(),
            organization: "Constellation Labs".into(),
            title: "Head of Technology".into(),
            phone: "+15555550100".into(),
            email: "sam@example.com".into(),
            url: "https://example.com".into(),
        }
    }
}

impl ContactCard {
    /// Reads a card from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ContactError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ContactError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }

    /// vCard 3.0 with CRLF line endings.
    pub fn to_vcard(&self) -> String {
        let lines = [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!(
                "N:{};{};;;",
                escape(&self.family_name),
                escape(&self.given_name)
            ),
            format!("FN:{}", escape(&self.full_name())),
            format!("ORG:{}", escape(&self.organization)),
            format!("TITLE:{}", escape(&self.title)),
            format!("TEL;TYPE=cell:{}", self.phone),
            format!("EMAIL;TYPE=work:{}", self.email),
            format!("URL:{}", self.url),
            "END:VCARD".to_string(),
        ];
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    /// `Given_Org.vcf`, using the first word of the organization.
    pub fn file_name(&self) -> String {
        let org = self.organization.split_whitespace().next().unwrap_or("");
        let stem = [sanitize(&self.given_name), sanitize(org)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        if stem.is_empty() {
            "contact.vcf".to_string()
        } else {
            format!("{stem}.vcf")
        }
    }

    /// Writes the card into `dir`, creating it if needed.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, ContactError> {
        let path = dir.join(self.file_name());
        std::fs::create_dir_all(dir).map_err(|source| ContactError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        std::fs::write(&path, self.to_vcard()).map_err(|source| ContactError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Text-value escaping from RFC 2426 §4.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcard_has_every_field_in_order() {
        let card = ContactCard::default();
        let vcard = card.to_vcard();
        let lines: Vec<_> = vcard.split("\r\n").collect();

        assert_eq!(
            lines,
            [
                "BEGIN:VCARD",
                "VERSION:3.0",
                "N:Rivera;Sam;;;",
                "FN:Sam Rivera",
                "ORG:Constellation Labs",
                "TITLE:Head of Technology",
                "TEL;TYPE=cell:+15555550100",
                "EMAIL;TYPE=work:sam@example.com",
                "URL:https://example.com",
                "END:VCARD",
                "",
            ]
        );
    }

    #[test]
    fn text_values_are_escaped() {
        let card = ContactCard {
            organization: "Acme, Inc; Labs\\East".into(),
            title: "Lead\nEngineer".into(),
            ..ContactCard::default()
        };
        let vcard = card.to_vcard();

        assert!(vcard.contains("ORG:Acme\\, Inc\\; Labs\\\\East\r\n"));
        assert!(vcard.contains("TITLE:Lead\\nEngineer\r\n"));
    }

    #[test]
    fn file_name_uses_given_name_and_first_org_word() {
        assert_eq!(ContactCard::default().file_name(), "Sam_Constellation.vcf");

        let odd = ContactCard {
            given_name: "Zoë/..".into(),
            organization: "".into(),
            ..ContactCard::default()
        };
        assert_eq!(odd.file_name(), "Zo.vcf");

        let blank = ContactCard {
            given_name: "   ".into(),
            organization: "".into(),
            ..ContactCard::default()
        };
        assert_eq!(blank.file_name(), "contact.vcf");
    }

    #[test]
    fn export_writes_the_card() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("cards");
        let card = ContactCard::default();

        let path = card.export(&target).unwrap();

        assert_eq!(path, target.join("Sam_Constellation.vcf"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), card.to_vcard());
    }

    #[test]
    fn load_round_trips_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");
        let card = ContactCard {
            given_name: "Ada".into(),
            ..ContactCard::default()
        };
        std::fs::write(&path, serde_json::to_string(&card).unwrap()).unwrap();

        assert_eq!(ContactCard::load(&path).unwrap(), card);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            ContactCard::load(&missing),
            Err(ContactError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"given_name\": 3}").unwrap();
        assert!(matches!(
            ContactCard::load(&broken),
            Err(ContactError::Parse { .. })
        ));
    }
}
