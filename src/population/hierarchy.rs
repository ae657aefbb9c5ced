//! Grouping of ancestry records into the population hierarchy.

use indexmap::IndexMap;

use super::{cmp_labels, record::PopulationRecord, taxonomy::Taxonomy};

/// A group record with the records of its subpopulations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupRecords {
    /// Record of the group itself.
    pub group: PopulationRecord,
    /// Records of the subpopulations present, alphabetically.
    pub sub_populations: Vec<PopulationRecord>,
}

impl GroupRecords {
    /// Whether the group row can be expanded to show subpopulations.
    pub fn is_expandable(&self) -> bool {
        !self.sub_populations.is_empty()
    }
}

/// Ancestry records arranged by the population hierarchy.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hierarchy {
    /// Groups present, alphabetically.
    pub groups: Vec<GroupRecords>,
    /// Records of populations outside of the hierarchy, alphabetically.
    pub unknown: Vec<PopulationRecord>,
}

impl Hierarchy {
    /// Group and unknown records, without subpopulations.
    pub fn top_level(&self) -> Vec<&PopulationRecord> {
        self.groups
            .iter()
            .map(|g| &g.group)
            .chain(self.unknown.iter())
            .collect()
    }
}

/// Merge records that share a canonical label by summing their counts.
///
/// The result is keyed by label in order of first appearance.
pub fn merge_by_label<'a, I>(records: I) -> IndexMap<String, PopulationRecord>
where
    I: IntoIterator<Item = &'a PopulationRecord>,
{
    let mut merged: IndexMap<String, PopulationRecord> = IndexMap::new();
    for record in records {
        match merged.get_mut(&record.population) {
            Some(existing) => {
                tracing::trace!("merging duplicate record for {:?}", &record.population);
                *existing = existing.merge(record);
            }
            None => {
                merged.insert(record.population.clone(), record.clone());
            }
        }
    }
    merged
}

/// Arrange the alias-normalized ancestry `records` by `taxonomy`.
///
/// Groups are emitted only if a record for the group itself exists;
/// subpopulations of absent groups are not shown.
pub fn aggregate(records: &[PopulationRecord], taxonomy: &Taxonomy) -> Hierarchy {
    let merged = merge_by_label(records);

    let groups = taxonomy
        .sorted_groups()
        .into_iter()
        .filter_map(|group| {
            let Some(record) = merged.get(&group.name) else {
                let orphans = group
                    .sub_populations
                    .iter()
                    .filter(|s| merged.contains_key(s.as_str()))
                    .count();
                if orphans > 0 {
                    tracing::debug!(
                        "dropping {} subpopulation record(s) of absent group {:?}",
                        orphans,
                        &group.name
                    );
                }
                return None;
            };
            let mut sub_names = group.sub_populations.iter().collect::<Vec<_>>();
            sub_names.sort_by(|a, b| cmp_labels(a, b));
            Some(GroupRecords {
                group: record.clone(),
                sub_populations: sub_names
                    .into_iter()
                    .filter_map(|name| merged.get(name.as_str()).cloned())
                    .collect(),
            })
        })
        .collect();

    let mut unknown = merged
        .values()
        .filter(|record| !taxonomy.is_known(&record.population))
        .cloned()
        .collect::<Vec<_>>();
    unknown.sort_by(|a, b| cmp_labels(&a.population, &b.population));

    Hierarchy { groups, unknown }
}
