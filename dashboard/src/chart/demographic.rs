//! Did men in the first class have a higher survival rate than children in the third class?

use serde_json::{json, Value};

use super::{ChartKind, ChartSpec, HistFunc, Palette, TidyTable};
use crate::models::{AgeGroup, PassengerClass, Sex};
use crate::transform::SurvivalSummaryRow;

pub const FIRST_CLASS_MALE: &str = "1st Class Male";
pub const THIRD_CLASS_CHILD: &str = "3rd Class Child";
pub const OTHER: &str = "Other";

/// Label a survival row for the comparison.
pub fn category_of(row: &SurvivalSummaryRow) -> &'static str {
    match (row.pclass, row.sex, row.age_group) {
        (PassengerClass::First, Sex::Male, _) => FIRST_CLASS_MALE,
        (PassengerClass::Third, _, Some(AgeGroup::Child)) => THIRD_CLASS_CHILD,
        _ => OTHER,
    }
}

/// Bar chart of the average survival percentage of the two labelled subgroups.
///
/// Rows labelled "Other", rows from the unknown-age bucket and empty groups
/// are left out.
pub fn demographic_chart(rows: &[SurvivalSummaryRow]) -> ChartSpec {
    let mut data = TidyTable::new(["category", "pclass", "sex", "age_group", "survival_percentage"]);

    for row in rows {
        let category = category_of(row);
        if category == OTHER || row.age_group.is_none() {
            continue;
        }
        let Some(pct) = row.survival_percentage else {
            continue;
        };

        if let Value::Object(fields) = json!({
            "category": category,
            "pclass": row.pclass,
            "sex": row.sex,
            "age_group": row.age_group,
            "survival_percentage": pct,
        }) {
            data.push(fields);
        }
    }

    ChartSpec::new(
        "Survival rate: 1st class men vs. 3rd class children",
        ChartKind::Bar,
        data,
        "category",
    )
    .with_y("survival_percentage")
    .with_histfunc(HistFunc::Avg)
    .with_hover("category")
    .with_palette(Palette::D3)
}
