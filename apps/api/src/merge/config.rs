use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::merge::similarity::DEFAULT_DEDUPE_THRESHOLD;

pub const DEFAULT_SUMMARY_THRESHOLD: f64 = 0.98;

/// Sections merged by the generic keyed merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Volunteer,
    Education,
    Awards,
    Certificates,
    Publications,
    Languages,
    Interests,
    References,
    Projects,
    Profiles,
}

impl Section {
    /// Field name of the section in a source record.
    pub fn field_name(&self) -> &'static str {
        match self {
            Section::Volunteer => "volunteer",
            Section::Education => "education",
            Section::Awards => "awards",
            Section::Certificates => "certificates",
            Section::Publications => "publications",
            Section::Languages => "languages",
            Section::Interests => "interests",
            Section::References => "references",
            Section::Projects => "projects",
            Section::Profiles => "profiles",
        }
    }
}

const DEFAULT_SECTION_KEYS: &[(Section, &[&str])] = &[
    (
        Section::Volunteer,
        &["organization", "position", "startDate", "endDate"],
    ),
    (
        Section::Education,
        &["institution", "area", "studyType", "startDate", "endDate"],
    ),
    (Section::Awards, &["title", "awarder", "date"]),
    (Section::Certificates, &["name", "issuer", "date"]),
    (Section::Publications, &["name", "publisher", "releaseDate"]),
    (Section::Languages, &["language", "fluency"]),
    (Section::Interests, &["name"]),
    (Section::References, &["name"]),
    (Section::Projects, &["name", "startDate", "endDate", "url"]),
    (Section::Profiles, &["network", "username"]),
];

/// Tunables for one merge run. Built once and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Similarity at or above which two list items are the same item.
    pub dedupe_threshold: f64,
    /// Similarity at or above which two work summaries are the same summary.
    pub summary_threshold: f64,
    /// Composite key fields per keyed section.
    pub section_keys: IndexMap<Section, Vec<String>>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        let section_keys = DEFAULT_SECTION_KEYS
            .iter()
            .map(|(section, fields)| {
                (*section, fields.iter().map(|f| f.to_string()).collect())
            })
            .collect();
        Self {
            dedupe_threshold: DEFAULT_DEDUPE_THRESHOLD,
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
            section_keys,
        }
    }
}

impl MergeConfig {
    pub fn with_thresholds(dedupe_threshold: f64, summary_threshold: f64) -> Self {
        Self {
            dedupe_threshold,
            summary_threshold,
            ..Self::default()
        }
    }

    /// Key fields for a section; an unconfigured section has no key and merges nothing.
    pub fn key_fields(&self, section: Section) -> &[String] {
        self.section_keys
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.dedupe_threshold, 0.92);
        assert_eq!(config.summary_threshold, 0.98);
        assert_eq!(config.section_keys.len(), 10);
        assert_eq!(
            config.key_fields(Section::Profiles),
            ["network".to_string(), "username".to_string()]
        );
    }

    #[test]
    fn test_missing_section_has_no_keys() {
        let mut config = MergeConfig::default();
        config.section_keys.shift_remove(&Section::Interests);
        assert!(config.key_fields(Section::Interests).is_empty());
    }
}
