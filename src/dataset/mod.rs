//! Per-dataset processing: classification, totals, merging, labels, rows.

use strum_macros::{Display, EnumString};

pub mod classify;
pub mod label;
pub mod merge;
pub mod rows;
pub mod totals;

/// Assembly a dataset's results were obtained for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provenance {
    /// Results for the queried assembly.
    Original,
    /// Results for the lifted-over variant on the other assembly.
    Lifted,
}

/// Shape of a dataset's results, inferred from the payload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DatasetShape {
    /// One result with one frequency array covering many populations.
    AggregationStyle,
    /// One result per population or sex, each with a single frequency.
    PerPopulationRecordStyle,
    /// Nothing usable; the dataset is not shown.
    Unrecognized,
}
