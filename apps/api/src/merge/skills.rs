use indexmap::IndexMap;

use crate::merge::similarity::dedupe;
use crate::merge::text::{coerce_field, coerce_text_list, normalize};
use crate::models::resume::{Fields, SkillEntry};

/// Proficiency labels in ascending order. Anything else ranks with the empty level.
const LEVEL_RANKS: &[(&str, u8)] = &[
    ("", 0),
    ("beginner", 1),
    ("intermediate", 2),
    ("advanced", 3),
    ("expert", 4),
    ("master", 5),
];

pub fn level_rank(level: &str) -> u8 {
    let level = level.trim().to_lowercase();
    LEVEL_RANKS
        .iter()
        .find(|(label, _)| *label == level)
        .map(|(_, rank)| *rank)
        .unwrap_or(0)
}

/// Merges skill entries by name. A skill's level only ever moves up; keywords are
/// unioned. The output is sorted by normalized name.
pub fn merge_skills<'a, L, I>(lists: L, threshold: f64) -> Vec<SkillEntry>
where
    L: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a Fields>,
{
    let mut merged: IndexMap<String, SkillEntry> = IndexMap::new();

    for list in lists {
        for raw in list {
            let name = coerce_field(raw.get("name")).trim().to_string();
            if name.is_empty() {
                continue;
            }
            let entry = merged.entry(normalize(&name)).or_default();

            let level = coerce_field(raw.get("level")).trim().to_lowercase();
            if level_rank(&level) > level_rank(&entry.level) {
                entry.level = level;
            }

            let keywords = dedupe(
                raw.get("keywords").map(coerce_text_list).unwrap_or_default(),
                threshold,
            );
            entry.keywords = dedupe(entry.keywords.iter().chain(keywords.iter()), threshold);
            entry.name = name;
        }
    }

    let mut skills: Vec<SkillEntry> = merged.into_values().collect();
    skills.sort_by_cached_key(|s| normalize(&s.name));
    skills
}
