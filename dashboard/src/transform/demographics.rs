//! Survival statistics by passenger class, sex and age group.
//!
//! # Grouping
//!
//! ```text
//! Passengers                      →  Survival summary
//! ┌─────────────────────────┐       ┌───────────────────────────────────┐
//! │ 1, male, 54, died       │       │ 1, male, adult   │ 0 / 1 │ 0.0    │
//! │ 1, male, 71, survived   │  →    │ 1, male, senior  │ 1 / 1 │ 100.0  │
//! │ 3, male, 2,  died       │       │ 1, male, child   │ 0 / 0 │ null   │
//! └─────────────────────────┘       └───────────────────────────────────┘
//! ```
//!
//! Every observed class × observed sex × named age group gets a row, even
//! when no passenger falls in it; those rows carry a size of 0 and a null
//! percentage. Passengers without an age group land in an extra bucket with
//! `age_group: null`, emitted only when it has members, so group sizes
//! always add up to the passenger count.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::Dataset;
use crate::models::{AgeGroup, PassengerClass, Sex};

/// One (class, sex, age group) cell.
///
/// Serialized with the historical column names: `survived` holds the survivor
/// count and `n_survivors` the group size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalSummaryRow {
    pub pclass: PassengerClass,
    pub sex: Sex,
    /// `None` for the bucket of passengers whose age is unknown or out of range.
    pub age_group: Option<AgeGroup>,
    #[serde(rename = "survived")]
    pub survivor_count: usize,
    #[serde(rename = "n_survivors")]
    pub group_size: usize,
    /// Rounded to two decimals, `None` when the group is empty.
    pub survival_percentage: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    survivors: usize,
    size: usize,
}

impl Tally {
    fn add(&mut self, survived: bool) {
        self.size += 1;
        if survived {
            self.survivors += 1;
        }
    }

    fn percentage(self) -> Option<f64> {
        if self.size == 0 {
            return None;
        }
        Some(round2(100.0 * self.survivors as f64 / self.size as f64))
    }
}

/// Round half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the survival summary.
///
/// Rows are ordered by class, then sex, then age group in bucket order with
/// the unknown-age bucket last.
pub fn survival_demographics(dataset: &Dataset) -> Vec<SurvivalSummaryRow> {
    let passengers = dataset.passengers();

    let classes: BTreeSet<PassengerClass> = passengers.iter().map(|p| p.pclass).collect();
    let sexes: BTreeSet<Sex> = passengers.iter().map(|p| p.sex).collect();

    let mut named: BTreeMap<(PassengerClass, Sex, AgeGroup), Tally> = BTreeMap::new();
    let mut unknown: BTreeMap<(PassengerClass, Sex), Tally> = BTreeMap::new();

    for p in passengers {
        match p.age_group() {
            Some(group) => named.entry((p.pclass, p.sex, group)).or_default().add(p.survived),
            None => unknown.entry((p.pclass, p.sex)).or_default().add(p.survived),
        }
    }

    let mut rows = Vec::with_capacity(classes.len() * sexes.len() * (AgeGroup::ALL.len() + 1));

    for &pclass in &classes {
        for &sex in &sexes {
            for group in AgeGroup::ALL {
                let tally = named.get(&(pclass, sex, group)).copied().unwrap_or_default();
                rows.push(summary_row(pclass, sex, Some(group), tally));
            }
            if let Some(&tally) = unknown.get(&(pclass, sex)) {
                rows.push(summary_row(pclass, sex, None, tally));
            }
        }
    }

    rows
}

fn summary_row(pclass: PassengerClass, sex: Sex, age_group: Option<AgeGroup>, tally: Tally) -> SurvivalSummaryRow {
    SurvivalSummaryRow {
        pclass,
        sex,
        age_group,
        survivor_count: tally.survivors,
        group_size: tally.size,
        survival_percentage: tally.percentage(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;

    fn find(rows: &[SurvivalSummaryRow], class: u8, sex: Sex, group: Option<AgeGroup>) -> &SurvivalSummaryRow {
        rows.iter()
            .find(|r| r.pclass.number() == class && r.sex == sex && r.age_group == group)
            .expect("row exists")
    }

    #[test]
    fn test_exhaustive_rows_plus_unknown_bucket() {
        let rows = survival_demographics(&fixtures::sample());

        // 3 classes x 2 sexes x 4 buckets, plus one unknown-age bucket (3rd class male)
        assert_eq!(rows.len(), 25);
        assert_eq!(rows.iter().filter(|r| r.age_group.is_none()).count(), 1);
        assert_eq!(find(&rows, 3, Sex::Male, None).group_size, 1);
    }

    #[test]
    fn test_group_sizes_sum_to_passenger_count() {
        let dataset = fixtures::sample();
        let rows = survival_demographics(&dataset);
        let total: usize = rows.iter().map(|r| r.group_size).sum();
        assert_eq!(total, dataset.len());
    }

    #[test]
    fn test_counts_and_percentages() {
        let rows = survival_demographics(&fixtures::sample());

        let first_male_adult = find(&rows, 1, Sex::Male, Some(AgeGroup::Adult));
        assert_eq!(first_male_adult.survivor_count, 0);
        assert_eq!(first_male_adult.group_size, 1);
        assert_eq!(first_male_adult.survival_percentage, Some(0.0));

        let first_male_senior = find(&rows, 1, Sex::Male, Some(AgeGroup::Senior));
        assert_eq!(first_male_senior.survival_percentage, Some(100.0));

        let third_female_adult = find(&rows, 3, Sex::Female, Some(AgeGroup::Adult));
        assert_eq!(third_female_adult.survivor_count, 2);
        assert_eq!(third_female_adult.group_size, 2);
    }

    #[test]
    fn test_empty_group_has_null_percentage() {
        let rows = survival_demographics(&fixtures::sample());
        let empty = find(&rows, 1, Sex::Male, Some(AgeGroup::Child));
        assert_eq!(empty.group_size, 0);
        assert_eq!(empty.survival_percentage, None);
    }

    #[test]
    fn test_percentage_bounds() {
        for row in survival_demographics(&fixtures::sample()) {
            match row.survival_percentage {
                Some(pct) => {
                    assert!(row.group_size > 0);
                    assert!((0.0..=100.0).contains(&pct));
                }
                None => assert_eq!(row.group_size, 0),
            }
        }
    }

    #[test]
    fn test_row_order() {
        let rows = survival_demographics(&fixtures::sample());
        assert_eq!(rows[0].pclass, PassengerClass::First);
        assert_eq!(rows[0].sex, Sex::Female);
        assert_eq!(rows[0].age_group, Some(AgeGroup::Child));
        assert_eq!(rows[3].age_group, Some(AgeGroup::Senior));
        assert_eq!(rows[4].sex, Sex::Male);

        // unknown bucket trails the named buckets of its (class, sex)
        let last = rows.last().unwrap();
        assert_eq!(last.pclass, PassengerClass::Third);
        assert_eq!(last.sex, Sex::Male);
        assert_eq!(last.age_group, None);
    }

    #[test]
    fn test_rounding_two_decimals() {
        let tally = Tally { survivors: 1, size: 3 };
        assert_eq!(tally.percentage(), Some(33.33));
        let tally = Tally { survivors: 2, size: 3 };
        assert_eq!(tally.percentage(), Some(66.67));
    }

    #[test]
    fn test_serialized_column_names() {
        let rows = survival_demographics(&fixtures::sample());
        let json = serde_json::to_value(find(&rows, 3, Sex::Female, Some(AgeGroup::Adult))).unwrap();

        assert_eq!(json["pclass"], 3);
        assert_eq!(json["sex"], "female");
        assert_eq!(json["age_group"], "adult");
        assert_eq!(json["survived"], 2);
        assert_eq!(json["n_survivors"], 2);
        assert_eq!(json["survival_percentage"], 100.0);
    }
}
