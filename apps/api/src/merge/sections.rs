use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::merge::dates::parse_date;
use crate::merge::similarity::dedupe;
use crate::merge::text::{coerce_field, coerce_text, coerce_text_list, is_blank, normalize};
use crate::models::resume::Fields;

/// Free-text list fields, deduplicated on read and unioned on merge.
pub const LIST_FIELDS: &[&str] = &["highlights", "courses", "keywords"];
/// Date fields, normalized on read.
pub const DATE_FIELDS: &[&str] = &["date", "startDate", "endDate", "releaseDate"];

const KEY_SEPARATOR: &str = " | ";

/// Merges lists of sub-records of one section into a single list with at most one
/// entry per composite key.
///
/// Records are visited in input order. The first record with a given key seeds the
/// entry; later ones add their list items and fill fields the entry still has blank.
/// Records whose key is blank are dropped, as are all records when `key_fields` is
/// empty. Inputs are cloned, never modified.
pub fn merge_sections<'a, L, I>(lists: L, key_fields: &[String], threshold: f64) -> Vec<Fields>
where
    L: IntoIterator<Item = I>,
    I: IntoIterator<Item = &'a Fields>,
{
    let mut bucket: IndexMap<String, Fields> = IndexMap::new();

    for list in lists {
        for raw in list {
            let entry = prepare(raw, threshold);
            let key = composite_key(&entry, key_fields);
            if is_blank_key(&key) {
                continue;
            }
            match bucket.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(mut slot) => absorb(slot.get_mut(), &entry, threshold),
            }
        }
    }

    bucket.into_values().collect()
}

/// Owned copy of a sub-record with list fields deduplicated and dates normalized.
fn prepare(raw: &Fields, threshold: f64) -> Fields {
    let mut entry = raw.clone();
    for field in LIST_FIELDS {
        if let Some(value) = entry.get_mut(*field) {
            *value = string_array(dedupe(coerce_text_list(value), threshold));
        }
    }
    for field in DATE_FIELDS {
        if let Some(value) = entry.get_mut(*field) {
            *value = Value::String(parse_date(&coerce_text(value)));
        }
    }
    entry
}

fn absorb(existing: &mut Fields, incoming: &Fields, threshold: f64) {
    for field in LIST_FIELDS {
        if let Some(value) = incoming.get(*field) {
            let mut items = existing
                .get(*field)
                .map(coerce_text_list)
                .unwrap_or_default();
            items.extend(coerce_text_list(value));
            existing.insert(field.to_string(), string_array(dedupe(items, threshold)));
        }
    }

    for (field, value) in incoming {
        let Value::String(s) = value else { continue };
        if !s.is_empty() && is_blank(&coerce_field(existing.get(field))) {
            existing.insert(field.clone(), value.clone());
        }
    }
}

pub fn composite_key(entry: &Fields, key_fields: &[String]) -> String {
    key_fields
        .iter()
        .map(|field| normalize(&coerce_field(entry.get(field))))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

fn is_blank_key(key: &str) -> bool {
    key.chars().all(|c| c == ' ' || c == '|')
}

fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
