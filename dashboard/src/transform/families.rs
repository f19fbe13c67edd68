//! Family-size transforms.
//!
//! - [`family_groups`] - passenger count and fare statistics per (class, family size)
//! - [`family_size`] - every passenger paired with its computed family size

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::models::{Passenger, PassengerClass};

/// Aggregates for one (class, family size) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummaryRow {
    pub pclass: PassengerClass,
    pub family_size: u32,
    pub n_passengers: usize,
    /// Fare statistics skip missing fares and are `None` when no fare is known.
    pub avg_fare: Option<f64>,
    pub min_fare: Option<f64>,
    pub max_fare: Option<f64>,
}

/// A passenger with its family size attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySizeRow<'a> {
    #[serde(flatten)]
    pub passenger: &'a Passenger,
    pub family_size: u32,
}

/// Accumulates fares while grouping.
#[derive(Debug, Default)]
struct FareStatsBuilder {
    passengers: usize,
    fares: usize,
    total: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl FareStatsBuilder {
    fn add(&mut self, fare: Option<f64>) {
        self.passengers += 1;

        let Some(fare) = fare.filter(|f| !f.is_nan()) else {
            return;
        };
        self.fares += 1;
        self.total += fare;
        self.min = Some(self.min.map_or(fare, |m| m.min(fare)));
        self.max = Some(self.max.map_or(fare, |m| m.max(fare)));
    }

    fn build(self, pclass: PassengerClass, family_size: u32) -> FamilySummaryRow {
        FamilySummaryRow {
            pclass,
            family_size,
            n_passengers: self.passengers,
            avg_fare: (self.fares > 0).then(|| self.total / self.fares as f64),
            min_fare: self.min,
            max_fare: self.max,
        }
    }
}

/// Group passengers by class and family size. Only observed groups are returned,
/// ordered by class then family size.
pub fn family_groups(dataset: &Dataset) -> Vec<FamilySummaryRow> {
    let mut groups: BTreeMap<(PassengerClass, u32), FareStatsBuilder> = BTreeMap::new();

    for p in dataset.passengers() {
        groups
            .entry((p.pclass, p.family_size()))
            .or_default()
            .add(p.fare);
    }

    groups
        .into_iter()
        .map(|((pclass, size), stats)| stats.build(pclass, size))
        .collect()
}

/// One row per passenger, in source order.
pub fn family_size(dataset: &Dataset) -> Vec<FamilySizeRow<'_>> {
    dataset
        .passengers()
        .iter()
        .map(|passenger| FamilySizeRow {
            passenger,
            family_size: passenger.family_size(),
        })
        .collect()
}
