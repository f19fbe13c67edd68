//! Passenger counts per surname, used as a rough proxy for family size.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurnameCountRow {
    pub last_name: String,
    pub count: usize,
}

/// Count passengers sharing each surname, ordered by surname.
pub fn last_names(dataset: &Dataset) -> Vec<SurnameCountRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for p in dataset.passengers() {
        *counts.entry(p.surname()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(last_name, count)| SurnameCountRow {
            last_name: last_name.to_string(),
            count,
        })
        .collect()
}
