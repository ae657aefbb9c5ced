//! Building of the display rows of one dataset.

use crate::{
    beacon::{
        frequency::{format_allele_frequency, FormatOptions},
        schema::ResultSet,
    },
    common::Assembly,
    conf::{Conf, Labels},
    population::{cmp_labels, hierarchy::aggregate, record::PopulationRecord},
    variant::Variant,
};

use super::{
    classify::classify,
    label::{dataset_label, DatasetLabel, Metadata},
    merge::TaggedResultSet,
    totals::{compute_totals, select_basis, Totals},
    DatasetShape, Provenance,
};

/// Note attached to aggregation-style datasets.
pub const HIERARCHY_NOTE: &str = "* Ancestry totals may not match the total because \
    hierarchical subpopulations (e.g., Southern European under European (non-Finnish)) \
    are included.";

/// Category of a row, shown or hidden as a whole.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RowCategory {
    Ancestry,
    Sex,
    Total,
}

/// Kind of a row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowKind {
    /// Population group of the hierarchy.
    Group { expandable: bool },
    /// Subpopulation, shown only with its expanded group.
    SubPopulation { group: String },
    /// Ancestry outside of the hierarchy or of a per-record dataset.
    Population,
    Sex,
    Total,
}

impl RowKind {
    pub fn category(&self) -> RowCategory {
        match self {
            RowKind::Group { .. } | RowKind::SubPopulation { .. } | RowKind::Population => {
                RowCategory::Ancestry
            }
            RowKind::Sex => RowCategory::Sex,
            RowKind::Total => RowCategory::Total,
        }
    }
}

/// One display row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TableRow {
    /// Displayed population label.
    pub label: String,
    pub kind: RowKind,
    pub allele_count: Option<i64>,
    pub allele_number: Option<i64>,
    pub homozygous: i64,
    pub heterozygous: i64,
    pub hemizygous: i64,
    /// Allele frequency, provided or derived.
    pub allele_frequency: Option<f64>,
    /// Formatted allele frequency.
    pub frequency: String,
}

impl TableRow {
    pub fn from_record(
        record: &PopulationRecord,
        label: &str,
        kind: RowKind,
        options: &FormatOptions,
    ) -> Self {
        let allele_frequency = record.frequency();
        Self {
            label: label.to_string(),
            kind,
            allele_count: record.allele_count,
            allele_number: record.allele_number,
            homozygous: record.genotypes.homozygous,
            heterozygous: record.genotypes.heterozygous,
            hemizygous: record.genotypes.hemizygous,
            allele_frequency,
            frequency: format_allele_frequency(allele_frequency, options),
        }
    }

    pub fn from_totals(totals: &Totals, label: &str, options: &FormatOptions) -> Self {
        Self {
            label: label.to_string(),
            kind: RowKind::Total,
            allele_count: totals.allele_count,
            allele_number: totals.allele_number,
            homozygous: totals.genotypes.homozygous,
            heterozygous: totals.genotypes.heterozygous,
            hemizygous: totals.genotypes.hemizygous,
            allele_frequency: totals.allele_frequency,
            frequency: format_allele_frequency(totals.allele_frequency, options),
        }
    }
}

/// Records of a dataset split by their role.
struct Split<'a> {
    female: Option<&'a PopulationRecord>,
    male: Option<&'a PopulationRecord>,
    total: Option<&'a PopulationRecord>,
    ancestries: Vec<PopulationRecord>,
}

impl<'a> Split<'a> {
    fn new(records: &'a [PopulationRecord], labels: &Labels) -> Self {
        Self {
            female: records.iter().find(|r| labels.is_female(&r.population)),
            male: records.iter().find(|r| labels.is_male(&r.population)),
            total: records.iter().find(|r| labels.is_total(&r.population)),
            ancestries: records
                .iter()
                .filter(|r| !labels.is_special(&r.population))
                .cloned()
                .collect(),
        }
    }

    fn sex_rows(&self, labels: &Labels, options: &FormatOptions) -> Vec<TableRow> {
        [
            (self.female, labels.female_display.as_str()),
            (self.male, labels.male_display.as_str()),
        ]
        .into_iter()
        .filter_map(|(record, label)| {
            record.map(|record| TableRow::from_record(record, label, RowKind::Sex, options))
        })
        .collect()
    }
}

/// Rows of a dataset with one result per population or sex.
///
/// Ancestries come first, alphabetically.  Without any ancestry record, a
/// fallback ancestry row combines the sex records.  Sex rows and the total
/// follow.
pub fn per_record_rows(result_set: &ResultSet, conf: &Conf) -> Vec<TableRow> {
    let options = &conf.frequency;
    let labels = &conf.labels;

    let records = result_set
        .results()
        .iter()
        .filter_map(|result| {
            let raw = result.first_frequencies().first();
            if raw.is_none() {
                tracing::trace!("skipping result without frequencies in {:?}", &result_set.id);
            }
            raw.map(|raw| PopulationRecord::from_raw(raw, &conf.aliases))
        })
        .collect::<Vec<_>>();
    let mut split = Split::new(&records, labels);
    split
        .ancestries
        .sort_by(|a, b| cmp_labels(&a.population, &b.population));

    let mut rows = split
        .ancestries
        .iter()
        .map(|record| TableRow::from_record(record, &record.population, RowKind::Population, options))
        .collect::<Vec<_>>();
    if split.ancestries.is_empty() {
        let fallback = match (split.female, split.male) {
            (Some(female), Some(male)) => Some(female.merge(male)),
            (Some(single), None) | (None, Some(single)) => Some(single.clone()),
            (None, None) => None,
        };
        if let Some(fallback) = fallback {
            tracing::trace!(
                "no ancestry records in {:?}, using {:?}",
                &result_set.id,
                &labels.fallback_ancestry
            );
            rows.push(TableRow::from_record(
                &fallback,
                &labels.fallback_ancestry,
                RowKind::Population,
                options,
            ));
        }
    }
    rows.append(&mut split.sex_rows(labels, options));

    let basis = select_basis(split.female, split.male, split.ancestries.iter().collect());
    let totals = compute_totals(&basis, split.total);
    rows.push(TableRow::from_totals(&totals, &labels.total_display, options));

    rows
}

/// Rows of a dataset with one frequency array covering all populations.
///
/// Ancestries are arranged by the population hierarchy, followed by sex
/// rows and the total.
pub fn aggregation_rows(result_set: &ResultSet, conf: &Conf) -> Vec<TableRow> {
    let options = &conf.frequency;
    let labels = &conf.labels;

    let records = result_set
        .results()
        .iter()
        .flat_map(|result| result.first_frequencies())
        .map(|raw| PopulationRecord::from_raw(raw, &conf.aliases))
        .collect::<Vec<_>>();
    let split = Split::new(&records, labels);
    let hierarchy = aggregate(&split.ancestries, &conf.groups);

    let mut rows = Vec::new();
    for group in &hierarchy.groups {
        rows.push(TableRow::from_record(
            &group.group,
            &group.group.population,
            RowKind::Group {
                expandable: group.is_expandable(),
            },
            options,
        ));
        rows.extend(group.sub_populations.iter().map(|sub| {
            TableRow::from_record(
                sub,
                &sub.population,
                RowKind::SubPopulation {
                    group: group.group.population.clone(),
                },
                options,
            )
        }));
    }
    rows.extend(hierarchy.unknown.iter().map(|record| {
        TableRow::from_record(record, &record.population, RowKind::Population, options)
    }));
    rows.append(&mut split.sex_rows(labels, options));

    let basis = select_basis(split.female, split.male, hierarchy.top_level());
    let totals = compute_totals(&basis, split.total);
    rows.push(TableRow::from_totals(
        &totals,
        &format!("{} *", labels.total_display),
        options,
    ));

    rows
}

/// Rows of one dataset, ready for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DatasetBlock {
    /// Dataset identifier.
    pub id: String,
    pub label: DatasetLabel,
    pub provenance: Provenance,
    /// Assembly of the results.
    pub assembly: Assembly,
    pub shape: DatasetShape,
    pub rows: Vec<TableRow>,
    /// Footnote to show below the block.
    pub note: Option<String>,
}

impl DatasetBlock {
    /// Build the block of `tagged`, whose results were obtained for
    /// `variant`.
    ///
    /// Returns `None` for datasets of unrecognized shape.
    pub fn build(
        tagged: &TaggedResultSet,
        variant: &Variant,
        conf: &Conf,
        metadata: &Metadata,
    ) -> Option<Self> {
        let result_set = &tagged.result_set;
        let shape = classify(result_set);
        let (rows, note) = match shape {
            DatasetShape::PerPopulationRecordStyle => (per_record_rows(result_set, conf), None),
            DatasetShape::AggregationStyle => (
                aggregation_rows(result_set, conf),
                Some(HIERARCHY_NOTE.to_string()),
            ),
            DatasetShape::Unrecognized => {
                tracing::debug!(
                    "dropping {} dataset {:?} of unrecognized shape",
                    tagged.provenance,
                    &result_set.id
                );
                return None;
            }
        };
        tracing::debug!(
            "{} dataset {:?}: {} row(s)",
            tagged.provenance,
            &result_set.id,
            rows.len()
        );

        Some(Self {
            id: result_set.id.clone(),
            label: dataset_label(&result_set.id, tagged.assembly, variant, metadata),
            provenance: tagged.provenance,
            assembly: tagged.assembly,
            shape,
            rows,
            note,
        })
    }
}
