//! Transformation module.
//!
//! Pure functions from the loaded [`Dataset`](crate::dataset::Dataset) to summary tables:
//! - Demographics: survival by class, sex and age group
//! - Families: fare statistics by class and family size, per-passenger family size
//! - Surnames: passengers per last name
//!
//! Each call recomputes its table from the raw records.

pub mod demographics;
pub mod families;
pub mod surnames;

pub use demographics::{survival_demographics, SurvivalSummaryRow};
pub use families::{family_groups, family_size, FamilySizeRow, FamilySummaryRow};
pub use surnames::{last_names, SurnameCountRow};
