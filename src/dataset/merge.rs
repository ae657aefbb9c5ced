//! Merging of the result sets of the queried and the lifted-over assembly.

use indexmap::IndexMap;

use super::{label::display_name, Provenance};
use crate::{beacon::schema::ResultSet, common::Assembly};

/// A result set together with where it came from.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, derive_new::new)]
pub struct TaggedResultSet {
    pub provenance: Provenance,
    /// Assembly the results refer to.
    pub assembly: Assembly,
    pub result_set: ResultSet,
}

impl TaggedResultSet {
    /// Name used for ordering datasets.
    pub fn display_name(&self) -> String {
        display_name(&self.result_set.id)
    }
}

/// Tag and combine result sets.
///
/// The `original` sets were obtained for `assembly`, the `lifted` ones for
/// the other assembly.  The result is sorted by display name; sets of the
/// same dataset are adjacent, the original one first.
pub fn merge_results(
    original: &[ResultSet],
    lifted: &[ResultSet],
    assembly: Assembly,
) -> Vec<TaggedResultSet> {
    let tagged = original
        .iter()
        .map(|rs| TaggedResultSet::new(Provenance::Original, assembly, rs.clone()))
        .chain(
            lifted
                .iter()
                .map(|rs| TaggedResultSet::new(Provenance::Lifted, assembly.other(), rs.clone())),
        );

    let mut by_id: IndexMap<String, Vec<TaggedResultSet>> = IndexMap::new();
    for tagged_set in tagged {
        by_id
            .entry(tagged_set.result_set.id.clone())
            .or_default()
            .push(tagged_set);
    }

    let mut result = by_id.into_values().flatten().collect::<Vec<_>>();
    result.sort_by_key(TaggedResultSet::display_name);
    tracing::debug!(
        "merged {} original and {} lifted result set(s)",
        original.len(),
        lifted.len()
    );
    result
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rs(id: &str) -> ResultSet {
        ResultSet {
            id: id.into(),
            ..Default::default()
        }
    }

    fn summary(merged: &[TaggedResultSet]) -> Vec<(String, Provenance, Assembly)> {
        merged
            .iter()
            .map(|t| (t.result_set.id.clone(), t.provenance, t.assembly))
            .collect()
    }

    #[test]
    fn both_assemblies() {
        let merged = merge_results(
            &[rs("gnomad_exome_v2.1.1"), rs("EGAD00001007774")],
            &[rs("EGAD00001007774"), rs("gnomad_joint_v4.1")],
            Assembly::Grch37,
        );
        assert_eq!(
            vec![
                (String::from("EGAD00001007774"), Provenance::Original, Assembly::Grch37),
                (String::from("EGAD00001007774"), Provenance::Lifted, Assembly::Grch38),
                (String::from("gnomad_exome_v2.1.1"), Provenance::Original, Assembly::Grch37),
                (String::from("gnomad_joint_v4.1"), Provenance::Lifted, Assembly::Grch38),
            ],
            summary(&merged)
        );
    }

    #[test]
    fn only_original() {
        let merged = merge_results(&[rs("EGAD00001000001"), rs("EGAD00001007774")], &[], Assembly::Grch38);
        assert_eq!(
            vec![
                (String::from("EGAD00001000001"), Provenance::Original, Assembly::Grch38),
                (String::from("EGAD00001007774"), Provenance::Original, Assembly::Grch38),
            ],
            summary(&merged)
        );
    }

    #[test]
    fn empty() {
        assert!(merge_results(&[], &[], Assembly::Grch37).is_empty());
    }
}
