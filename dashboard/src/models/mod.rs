//! Domain models for the passenger manifest.
//!
//! - [`Passenger`] - One row of the manifest, as loaded
//! - [`PassengerClass`] - Ticket class (1st / 2nd / 3rd)
//! - [`Sex`] - Recorded sex
//! - [`AgeGroup`] - Four age buckets derived from numeric age
//!
//! Records are immutable once loaded. Derived attributes (age group,
//! family size, surname) are computed on demand, never stored back.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Passenger Class
// =============================================================================

/// Ticket class, serialized as the bare number used in the source (`1`, `2`, `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    pub fn number(self) -> u8 {
        match self {
            PassengerClass::First => 1,
            PassengerClass::Second => 2,
            PassengerClass::Third => 3,
        }
    }
}

impl TryFrom<u8> for PassengerClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PassengerClass::First),
            2 => Ok(PassengerClass::Second),
            3 => Ok(PassengerClass::Third),
            other => Err(format!("passenger class must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<PassengerClass> for u8 {
    fn from(class: PassengerClass) -> Self {
        class.number()
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// =============================================================================
// Sex
// =============================================================================

/// Recorded sex. `Female` sorts before `Male`, matching lexical order of the source values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

// =============================================================================
// Age Group
// =============================================================================

/// Age bucket with left-open, right-closed edges: (0,12], (12,20], (20,60], (60,120].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    Teen,
    Adult,
    Senior,
}

/// Bucket edges; bucket `i` covers `(EDGES[i], EDGES[i + 1]]`.
const AGE_EDGES: [f64; 5] = [0.0, 12.0, 20.0, 60.0, 120.0];

impl AgeGroup {
    /// All buckets in order.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Child,
        AgeGroup::Teen,
        AgeGroup::Adult,
        AgeGroup::Senior,
    ];

    /// Bucket an age. `None` for ages outside (0, 120] and for NaN.
    pub fn from_age(age: f64) -> Option<Self> {
        Self::ALL
            .iter()
            .zip(AGE_EDGES.windows(2))
            .find(|(_, edge)| age > edge[0] && age <= edge[1])
            .map(|(group, _)| *group)
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Child => "child",
            AgeGroup::Teen => "teen",
            AgeGroup::Adult => "adult",
            AgeGroup::Senior => "senior",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Passenger
// =============================================================================

/// One row of the manifest.
///
/// Field names follow the source CSV headers. Extra source columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(rename = "PassengerId")]
    pub passenger_id: u32,

    #[serde(rename = "Survived", deserialize_with = "deserialize_flag", serialize_with = "serialize_flag")]
    pub survived: bool,

    #[serde(rename = "Pclass")]
    pub pclass: PassengerClass,

    /// Full name, "Surname, Title. Given Names".
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Sex")]
    pub sex: Sex,

    #[serde(rename = "Age")]
    pub age: Option<f64>,

    /// Siblings and spouses aboard.
    #[serde(rename = "SibSp")]
    pub sib_sp: u32,

    /// Parents and children aboard.
    #[serde(rename = "Parch")]
    pub parch: u32,

    #[serde(rename = "Ticket", default)]
    pub ticket: Option<String>,

    #[serde(rename = "Fare")]
    pub fare: Option<f64>,

    #[serde(rename = "Cabin", default)]
    pub cabin: Option<String>,

    #[serde(rename = "Embarked", default)]
    pub embarked: Option<String>,
}

impl Passenger {
    /// Siblings/spouses + parents/children + the passenger themself.
    pub fn family_size(&self) -> u32 {
        self.sib_sp + self.parch + 1
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.age.and_then(AgeGroup::from_age)
    }

    /// Text before the first comma of the name, trimmed.
    pub fn surname(&self) -> &str {
        surname_of(&self.name)
    }
}

/// Extract the surname from a "Surname, Given" name.
///
/// A name without a comma yields the whole trimmed name.
pub fn surname_of(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "survived flag must be 0 or 1, got {}",
            other
        ))),
    }
}

fn serialize_flag<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}
