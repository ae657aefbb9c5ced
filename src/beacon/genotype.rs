//! Reconciliation of the differently named genotype count fields.

use std::ops::Add;

use super::schema::PopulationFrequency;

/// Number of homozygous, heterozygous, and hemizygous carriers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, derive_new::new,
)]
pub struct GenotypeCounts {
    /// Number of homozygous carriers.
    pub homozygous: i64,
    /// Number of heterozygous carriers.
    pub heterozygous: i64,
    /// Number of hemizygous carriers.
    pub hemizygous: i64,
}

impl Add for GenotypeCounts {
    type Output = GenotypeCounts;

    fn add(self, rhs: Self) -> Self::Output {
        GenotypeCounts {
            homozygous: self.homozygous.saturating_add(rhs.homozygous),
            heterozygous: self.heterozygous.saturating_add(rhs.heterozygous),
            hemizygous: self.hemizygous.saturating_add(rhs.hemizygous),
        }
    }
}

/// Read the genotype counts of `record`.
///
/// The `alleleCount*` field wins over its `genotype*` synonym; a category
/// with neither is zero.
pub fn normalize_genotype_counts(record: &PopulationFrequency) -> GenotypeCounts {
    GenotypeCounts {
        homozygous: record
            .allele_count_homozygous
            .or(record.genotype_homozygous)
            .unwrap_or_default(),
        heterozygous: record
            .allele_count_heterozygous
            .or(record.genotype_heterozygous)
            .unwrap_or_default(),
        hemizygous: record
            .allele_count_hemizygous
            .or(record.genotype_hemizygous)
            .unwrap_or_default(),
    }
}
