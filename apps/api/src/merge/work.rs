use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::merge::config::MergeConfig;
use crate::merge::dates::{cmp_desc, merge_date_range, parse_date};
use crate::merge::similarity::dedupe;
use crate::merge::text::{coerce_field, coerce_text_list, is_blank, normalize};
use crate::models::resume::{Fields, WorkEntry};

/// Reads one raw work entry: dates normalized, highlights deduplicated, text coerced.
pub fn prepare_work(raw: &Fields, threshold: f64) -> WorkEntry {
    WorkEntry {
        name: coerce_field(raw.get("name")),
        position: coerce_field(raw.get("position")),
        url: coerce_field(raw.get("url")),
        start_date: parse_date(&coerce_field(raw.get("startDate"))),
        end_date: parse_date(&coerce_field(raw.get("endDate"))),
        summary: coerce_field(raw.get("summary")),
        highlights: dedupe(
            raw.get("highlights").map(coerce_text_list).unwrap_or_default(),
            threshold,
        ),
    }
}

/// Combines two descriptions of the same job.
///
/// The date range widens to cover both, highlights are unioned, and summaries are kept
/// side by side unless they are near-identical. Identity fields come from `a` when set.
pub fn merge_work(a: &WorkEntry, b: &WorkEntry, config: &MergeConfig) -> WorkEntry {
    let (start_date, end_date) =
        merge_date_range(&a.start_date, &a.end_date, &b.start_date, &b.end_date);
    let highlights = dedupe(
        a.highlights.iter().chain(b.highlights.iter()),
        config.dedupe_threshold,
    );
    let summary = dedupe([&a.summary, &b.summary], config.summary_threshold)
        .join(" ")
        .trim()
        .to_string();

    WorkEntry {
        name: first_non_blank(&a.name, &b.name),
        position: first_non_blank(&a.position, &b.position),
        url: first_non_blank(&a.url, &b.url),
        start_date,
        end_date,
        summary,
        highlights,
    }
}

/// Grouping key for "the same job". Entries with neither employer nor position are
/// told apart by their dates instead.
pub fn work_key(entry: &WorkEntry) -> String {
    let company = normalize(&entry.name);
    let position = normalize(&entry.position);
    if company.is_empty() && position.is_empty() {
        return format!("{position}||{}||{}", entry.start_date, entry.end_date);
    }
    format!("{company}||{position}")
}

/// Folds every work entry into one per job, newest first.
pub fn merge_work_history<'a, I>(entries: I, config: &MergeConfig) -> Vec<WorkEntry>
where
    I: IntoIterator<Item = &'a Fields>,
{
    let mut bucket: IndexMap<String, WorkEntry> = IndexMap::new();

    for raw in entries {
        let entry = prepare_work(raw, config.dedupe_threshold);
        match bucket.entry(work_key(&entry)) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut slot) => {
                let merged = merge_work(slot.get(), &entry, config);
                slot.insert(merged);
            }
        }
    }

    let mut merged: Vec<WorkEntry> = bucket.into_values().collect();
    merged.sort_by(|a, b| {
        cmp_desc(&a.end_date, &b.end_date).then_with(|| cmp_desc(&a.start_date, &b.start_date))
    });
    merged
}

fn first_non_blank(a: &str, b: &str) -> String {
    if is_blank(a) {
        b.to_string()
    } else {
        a.to_string()
    }
}
