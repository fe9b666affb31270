//! Field-name resolution across naming conventions
//!
//! Records from different sources name the same field differently
//! (`patient_name`, `Patient Name`, `PATIENT_NAME`). [`resolve_key`] maps a
//! requested tag onto whichever key a record actually uses. The lookup is
//! lossy: when several keys normalize to the same form, the first one in record
//! order wins.

use crate::domain::FlatRecord;

/// Finds the record key that corresponds to `tag`
///
/// Candidates are tried in a fixed order and the first hit wins:
/// 1. the tag itself
/// 2. its title-cased, space-separated form (`patient_name` -> `Patient Name`)
/// 3. any key equal to the tag once both are lower-cased with spaces turned
///    into underscores
///
/// Returns `None` when nothing matches; the caller skips the tag.
pub fn resolve_key(record: &FlatRecord, tag: &str) -> Option<String> {
    if record.contains_key(tag) {
        return Some(tag.to_string());
    }

    let titled = title_case(tag);
    if record.contains_key(&titled) {
        return Some(titled);
    }

    let wanted = normalize(tag);
    record.keys().find(|k| normalize(k) == wanted).cloned()
}

/// `patient_name` -> `Patient Name`
pub fn title_case(tag: &str) -> String {
    tag.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize(key: &str) -> String {
    key.to_lowercase().replace(' ', "_")
}
