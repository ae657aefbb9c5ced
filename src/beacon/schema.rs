//! Serde model of the Beacon v2 `g_variants` response payload.
//!
//! Only the parts consumed by the table building are modelled.  Upstream
//! providers disagree on how numbers are encoded, so counts are decoded
//! leniently (see [`de_count`]).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level `g_variants` response.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconResponse {
    #[serde(default)]
    pub response: ResponseBody,
}

/// The `response` member of a [`BeaconResponse`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, deserialize_with = "de_result_sets")]
    pub result_sets: Vec<ResultSet>,
}

/// One dataset's answer.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    /// Dataset identifier, e.g., `EGAD00001007774` or `gnomad_exome_v2.1.1`.
    #[serde(default, deserialize_with = "de_label")]
    pub id: String,
    /// Declared number of results.
    #[serde(default, deserialize_with = "de_count")]
    pub results_count: Option<i64>,
    /// Whether the variant exists in the dataset.
    pub exists: Option<bool>,
    /// The results, absent for datasets without a hit.
    pub results: Option<Vec<VariantResult>>,
}

impl ResultSet {
    /// Declared `resultsCount`, zero when absent.
    pub fn declared_count(&self) -> i64 {
        self.results_count.unwrap_or_default()
    }

    /// The results, empty when absent.
    pub fn results(&self) -> &[VariantResult] {
        self.results.as_deref().unwrap_or_default()
    }
}

/// One result (a variant record) within a [`ResultSet`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantResult {
    pub variation: Option<Variation>,
    pub frequency_in_populations: Option<Vec<FrequencyInPopulations>>,
}

impl VariantResult {
    /// The population frequency groups, empty when absent.
    pub fn frequency_groups(&self) -> &[FrequencyInPopulations] {
        self.frequency_in_populations.as_deref().unwrap_or_default()
    }

    /// The frequencies of the first population frequency group.
    pub fn first_frequencies(&self) -> &[PopulationFrequency] {
        self.frequency_groups()
            .first()
            .map(FrequencyInPopulations::frequencies)
            .unwrap_or_default()
    }

    /// `variation.location.interval.start.value`, if given.
    pub fn start(&self) -> Option<i64> {
        self.variation
            .as_ref()?
            .location
            .as_ref()?
            .interval
            .as_ref()?
            .start
            .as_ref()?
            .value
    }
}

/// The `variation` member of a [`VariantResult`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variation {
    pub location: Option<Location>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub interval: Option<LocationInterval>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LocationInterval {
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    #[serde(default, deserialize_with = "de_count")]
    pub value: Option<i64>,
}

/// A group of population frequencies from one source.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyInPopulations {
    pub source: Option<String>,
    pub source_reference: Option<String>,
    pub frequencies: Option<Vec<PopulationFrequency>>,
}

impl FrequencyInPopulations {
    /// The frequencies, empty when absent.
    pub fn frequencies(&self) -> &[PopulationFrequency] {
        self.frequencies.as_deref().unwrap_or_default()
    }
}

/// Allele statistics of one population, as sent by the provider.
///
/// The `genotype*` fields are synonyms of the `alleleCount*` fields used by
/// some providers; they are kept apart so that the `alleleCount*` value can
/// take precedence.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationFrequency {
    #[serde(default, deserialize_with = "de_label")]
    pub population: String,
    #[serde(default, deserialize_with = "de_count")]
    pub allele_count: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub allele_number: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub allele_count_homozygous: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub allele_count_heterozygous: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub allele_count_hemizygous: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub genotype_homozygous: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub genotype_heterozygous: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub genotype_hemizygous: Option<i64>,
    #[serde(default, deserialize_with = "de_frequency")]
    pub allele_frequency: Option<f64>,
}

/// Decode the result sets one by one, dropping those that do not decode so
/// that their siblings are kept.
fn de_result_sets<'de, D>(deserializer: D) -> Result<Vec<ResultSet>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match ResultSet::deserialize(value) {
            Ok(result_set) => Some(result_set),
            Err(e) => {
                tracing::warn!("dropping malformed result set #{}: {}", i, e);
                None
            }
        })
        .collect())
}

/// Decode a label that may be a string, a number, or null (empty).
pub fn de_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Decode a count that may be an integer, a float, a numeric string, a
/// one-element array, or null.
pub fn de_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

/// Decode a frequency leniently, non-finite values become `None`.
pub fn de_frequency<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(float_from_value))
}

fn float_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Array(values) => values.first().and_then(float_from_value),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Round a float count; `as` saturates at the `i64` bounds.
fn round_count(f: f64) -> i64 {
    if f.fract() != 0.0 {
        tracing::trace!("rounding non-integral count {}", f);
    }
    f.round() as i64
}

fn count_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(round_count)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| float_from_value(value).map(round_count)),
        Value::Array(values) => values.first().and_then(count_from_value),
        _ => None,
    }
}
