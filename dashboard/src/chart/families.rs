//! How do family sizes compare as reported by last names vs. computed from SibSp/Parch?
//!
//! Both estimates are stacked into one tidy table with a `group` column and
//! drawn as a histogram faceted by that column:
//!
//! ```text
//! group        │ family_size
//! ─────────────┼────────────
//! Last_Names   │ 2            ← one row per distinct surname (surname count)
//! ...          │
//! Family_Size  │ 5            ← one row per passenger (SibSp + Parch + 1)
//! ```

use serde_json::{json, Value};

use super::{ChartKind, ChartSpec, HistFunc, TidyTable};
use crate::transform::{FamilySizeRow, SurnameCountRow};

pub const LAST_NAMES_GROUP: &str = "Last_Names";
pub const FAMILY_SIZE_GROUP: &str = "Family_Size";

/// Union of both family-size estimates, surname rows first.
pub fn family_table(surnames: &[SurnameCountRow], passengers: &[FamilySizeRow<'_>]) -> TidyTable {
    let mut table = TidyTable::new(["group", "family_size"]);

    let surname_sizes = surnames.iter().map(|r| (LAST_NAMES_GROUP, r.count as u64));
    let computed_sizes = passengers.iter().map(|r| (FAMILY_SIZE_GROUP, u64::from(r.family_size)));

    for (group, size) in surname_sizes.chain(computed_sizes) {
        if let Value::Object(fields) = json!({ "group": group, "family_size": size }) {
            table.push(fields);
        }
    }

    table
}

/// Histogram of family sizes, colored and row-faceted by estimate.
pub fn family_chart(surnames: &[SurnameCountRow], passengers: &[FamilySizeRow<'_>]) -> ChartSpec {
    ChartSpec::new(
        "Family size: last names vs. SibSp + Parch + 1",
        ChartKind::Histogram,
        family_table(surnames, passengers),
        "family_size",
    )
    .with_color("group")
    .with_facet_row("group")
    .with_histfunc(HistFunc::Count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::transform::{family_size, last_names};

    #[test]
    fn test_union_row_count_and_groups() {
        let dataset = fixtures::sample();
        let surnames = last_names(&dataset);
        let sizes = family_size(&dataset);

        let spec = family_chart(&surnames, &sizes);

        assert_eq!(spec.data.len(), surnames.len() + dataset.len());
        assert_eq!(spec.data.len(), 21);
        assert_eq!(
            spec.data.distinct("group").unwrap(),
            vec![json!(LAST_NAMES_GROUP), json!(FAMILY_SIZE_GROUP)]
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_values_carry_over() {
        let dataset = fixtures::sample();
        let surnames = last_names(&dataset);
        let sizes = family_size(&dataset);
        let table = family_table(&surnames, &sizes);

        // Palsson is the last surname and is shared by two passengers.
        assert_eq!(table.rows()[9]["group"], LAST_NAMES_GROUP);
        assert_eq!(table.rows()[9]["family_size"], 2);

        // First computed row is Braund: 1 sibling/spouse + self.
        assert_eq!(table.rows()[10]["group"], FAMILY_SIZE_GROUP);
        assert_eq!(table.rows()[10]["family_size"], 2);
    }

    #[test]
    fn test_empty_inputs() {
        let table = family_table(&[], &[]);
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["group", "family_size"]);
    }
}
