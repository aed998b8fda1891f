use std::collections::{HashMap, HashSet};

use crate::models::{ChangeEntry, SectionedRecord};

pub fn diff<'a, I>(before: &HashMap<String, Option<String>>, after: I) -> Vec<ChangeEntry>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen = HashSet::new();

    after
        .into_iter()
        .filter(|(identifier, _)| seen.insert(*identifier))
        .filter_map(|(identifier, new_section)| {
            let previous = before
                .get(identifier)
                .and_then(|section| section.as_deref())
                .map(str::trim)
                .filter(|section| !section.is_empty());

            (previous != Some(new_section)).then(|| ChangeEntry {
                identifier: identifier.to_string(),
                previous_section: previous.map(str::to_string),
                new_section: new_section.to_string(),
            })
        })
        .collect()
}

pub fn changes_for(sectioned: &[SectionedRecord]) -> Vec<ChangeEntry> {
    let before: HashMap<String, Option<String>> = sectioned
        .iter()
        .map(|record| {
            (
                record.identifier().to_string(),
                record.student().previous_section().map(str::to_string),
            )
        })
        .collect();

    diff(
        &before,
        sectioned
            .iter()
            .map(|record| (record.identifier(), record.section.as_str())),
    )
}
