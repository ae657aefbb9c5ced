//! Inference of the dataset shape from the raw result set.

use super::DatasetShape;
use crate::beacon::schema::ResultSet;

/// Whether the number of frequencies of any group of any result satisfies
/// `pred`.
fn any_group(result_set: &ResultSet, pred: impl Fn(usize) -> bool) -> bool {
    result_set.results().iter().any(|result| {
        result
            .frequency_groups()
            .iter()
            .any(|group| pred(group.frequencies().len()))
    })
}

/// Classify `result_set`.
///
/// The per-population-record test is applied first and wins when both
/// would match.
pub fn classify(result_set: &ResultSet) -> DatasetShape {
    if result_set.results().is_empty() {
        return DatasetShape::Unrecognized;
    }

    let count = result_set.declared_count();
    let shape = if count > 1 || (count == 1 && any_group(result_set, |n| n == 1)) {
        DatasetShape::PerPopulationRecordStyle
    } else if count == 1 && any_group(result_set, |n| n > 1) {
        DatasetShape::AggregationStyle
    } else {
        DatasetShape::Unrecognized
    };
    tracing::debug!(
        "dataset {:?} (resultsCount = {}) classified as {}",
        &result_set.id,
        count,
        shape
    );
    shape
}
