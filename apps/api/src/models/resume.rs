use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::merge::text::{coerce_field, coerce_text_list};

/// Raw JSON fields of one sub-record, read defensively.
pub type Fields = Map<String, Value>;

/// One parsed résumé as produced upstream. Every field is kept as raw JSON and only
/// coerced when the merge reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    fields: Fields,
}

impl SourceRecord {
    /// Wraps a JSON value; anything other than an object is not a record.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn basics(&self) -> Option<&Fields> {
        self.fields.get("basics").and_then(Value::as_object)
    }

    /// Sub-records of a list section. A lone object counts as a one-element list;
    /// non-object elements are skipped.
    pub fn section(&self, name: &str) -> Vec<&Fields> {
        match self.fields.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
            Some(Value::Object(single)) => vec![single],
            _ => vec![],
        }
    }
}

/// Builds a typed entry from merged raw fields, coercing each field to its schema type.
pub trait FromFields {
    fn from_fields(fields: &Fields) -> Self;
}

fn text(fields: &Fields, key: &str) -> String {
    coerce_field(fields.get(key))
}

fn list(fields: &Fields, key: &str) -> Vec<String> {
    fields.get(key).map(coerce_text_list).unwrap_or_default()
}

// ── Master record ───────────────────────────────────────────────────────────

/// The merged composite résumé. Field order matches the schema and is the
/// serialization order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterRecord {
    pub basics: Basics,
    pub work: Vec<WorkEntry>,
    pub volunteer: Vec<VolunteerEntry>,
    pub education: Vec<EducationEntry>,
    pub awards: Vec<AwardEntry>,
    pub certificates: Vec<CertificateEntry>,
    pub publications: Vec<PublicationEntry>,
    pub skills: Vec<SkillEntry>,
    pub languages: Vec<LanguageEntry>,
    pub interests: Vec<InterestEntry>,
    pub references: Vec<ReferenceEntry>,
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Basics {
    pub name: String,
    pub label: String,
    pub image: String,
    pub email: String,
    pub phone: String,
    pub url: String,
    pub summary: String,
    pub location: Location,
    pub profiles: Vec<Profile>,
}

impl FromFields for Basics {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            label: text(fields, "label"),
            image: text(fields, "image"),
            email: text(fields, "email"),
            phone: text(fields, "phone"),
            url: text(fields, "url"),
            summary: text(fields, "summary"),
            location: fields
                .get("location")
                .and_then(Value::as_object)
                .map(Location::from_fields)
                .unwrap_or_default(),
            profiles: vec![],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
    pub region: String,
}

impl FromFields for Location {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            address: text(fields, "address"),
            postal_code: text(fields, "postalCode"),
            city: text(fields, "city"),
            country_code: text(fields, "countryCode"),
            region: text(fields, "region"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub network: String,
    pub username: String,
    pub url: String,
}

impl FromFields for Profile {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            network: text(fields, "network"),
            username: text(fields, "username"),
            url: text(fields, "url"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkEntry {
    pub name: String,
    pub position: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolunteerEntry {
    pub organization: String,
    pub position: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

impl FromFields for VolunteerEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            organization: text(fields, "organization"),
            position: text(fields, "position"),
            url: text(fields, "url"),
            start_date: text(fields, "startDate"),
            end_date: text(fields, "endDate"),
            summary: text(fields, "summary"),
            highlights: list(fields, "highlights"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub url: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    pub score: String,
    pub courses: Vec<String>,
}

impl FromFields for EducationEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            institution: text(fields, "institution"),
            url: text(fields, "url"),
            area: text(fields, "area"),
            study_type: text(fields, "studyType"),
            start_date: text(fields, "startDate"),
            end_date: text(fields, "endDate"),
            score: text(fields, "score"),
            courses: list(fields, "courses"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardEntry {
    pub title: String,
    pub date: String,
    pub awarder: String,
    pub summary: String,
}

impl FromFields for AwardEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            title: text(fields, "title"),
            date: text(fields, "date"),
            awarder: text(fields, "awarder"),
            summary: text(fields, "summary"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateEntry {
    pub name: String,
    pub date: String,
    pub issuer: String,
    pub url: String,
}

impl FromFields for CertificateEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            date: text(fields, "date"),
            issuer: text(fields, "issuer"),
            url: text(fields, "url"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicationEntry {
    pub name: String,
    pub publisher: String,
    pub release_date: String,
    pub url: String,
    pub summary: String,
}

impl FromFields for PublicationEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            publisher: text(fields, "publisher"),
            release_date: text(fields, "releaseDate"),
            url: text(fields, "url"),
            summary: text(fields, "summary"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillEntry {
    pub name: String,
    pub level: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    pub language: String,
    pub fluency: String,
}

impl FromFields for LanguageEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            language: text(fields, "language"),
            fluency: text(fields, "fluency"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

impl FromFields for InterestEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            keywords: list(fields, "keywords"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceEntry {
    pub name: String,
    pub reference: String,
}

impl FromFields for ReferenceEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            reference: text(fields, "reference"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub highlights: Vec<String>,
    pub url: String,
}

impl FromFields for ProjectEntry {
    fn from_fields(fields: &Fields) -> Self {
        Self {
            name: text(fields, "name"),
            start_date: text(fields, "startDate"),
            end_date: text(fields, "endDate"),
            description: text(fields, "description"),
            highlights: list(fields, "highlights"),
            url: text(fields, "url"),
        }
    }
}
