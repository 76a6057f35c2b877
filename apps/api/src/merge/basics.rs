use crate::merge::config::{MergeConfig, Section};
use crate::merge::sections::merge_sections;
use crate::merge::text::{coerce_field, is_blank};
use crate::models::resume::{Basics, Fields, FromFields, Profile, SourceRecord};

const SCORED_FIELDS: &[&str] = &["name", "label", "email", "phone", "url", "summary"];

/// Number of populated header fields.
pub fn completeness_score(basics: &Fields) -> usize {
    SCORED_FIELDS
        .iter()
        .filter(|field| !is_blank(&coerce_field(basics.get(**field))))
        .count()
}

/// Picks the most complete header (first one on ties) and attaches the profiles
/// pooled from every record. With no header anywhere the result is empty-valued.
pub fn select_basics(records: &[SourceRecord], config: &MergeConfig) -> Basics {
    let mut best: Option<(&Fields, usize)> = None;
    for basics in records.iter().filter_map(SourceRecord::basics) {
        let score = completeness_score(basics);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((basics, score));
        }
    }

    let mut chosen = best
        .map(|(basics, _)| Basics::from_fields(basics))
        .unwrap_or_default();

    let pooled: Vec<&Fields> = records
        .iter()
        .filter_map(SourceRecord::basics)
        .flat_map(profiles_of)
        .collect();
    chosen.profiles = merge_sections(
        [pooled],
        config.key_fields(Section::Profiles),
        config.dedupe_threshold,
    )
    .iter()
    .map(Profile::from_fields)
    .collect();

    chosen
}

fn profiles_of(basics: &Fields) -> Vec<&Fields> {
    basics
        .get(Section::Profiles.field_name())
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(|p| p.as_object()).collect())
        .unwrap_or_default()
}
