//! Normalized allele statistics of one population.

use super::alias::Aliases;
use crate::beacon::{
    frequency::derive_frequency,
    genotype::{normalize_genotype_counts, GenotypeCounts},
    schema::PopulationFrequency,
};

/// A population record after label canonicalization and genotype count
/// normalization.
///
/// Records are not changed after construction; merging creates a new record.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PopulationRecord {
    /// Canonical population label.
    pub population: String,
    /// Number of alternate alleles.
    pub allele_count: Option<i64>,
    /// Number of called alleles.
    pub allele_number: Option<i64>,
    /// Genotype counts, zero where not given.
    pub genotypes: GenotypeCounts,
    /// Allele frequency as given by the provider.
    pub allele_frequency: Option<f64>,
}

impl PopulationRecord {
    /// Normalize the raw `record`.
    pub fn from_raw(record: &PopulationFrequency, aliases: &Aliases) -> Self {
        Self {
            population: aliases.normalize(&record.population).to_string(),
            allele_count: record.allele_count,
            allele_number: record.allele_number,
            genotypes: normalize_genotype_counts(record),
            allele_frequency: record.allele_frequency,
        }
    }

    /// Copy of `self` with `population` as label.
    pub fn relabeled(&self, population: &str) -> Self {
        Self {
            population: population.to_string(),
            ..self.clone()
        }
    }

    /// The provided allele frequency, else `allele_count / allele_number`.
    pub fn frequency(&self) -> Option<f64> {
        self.allele_frequency
            .or_else(|| derive_frequency(self.allele_count, self.allele_number))
    }

    /// Sum the counts of `self` and `other`, keeping the label of `self`.
    ///
    /// The frequency of the result is derived from the summed counts.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            population: self.population.clone(),
            allele_count: add_counts(self.allele_count, other.allele_count),
            allele_number: add_counts(self.allele_number, other.allele_number),
            genotypes: self.genotypes + other.genotypes,
            allele_frequency: None,
        }
    }
}

/// Saturating sum of two optional counts, `None` only if both are.
pub fn add_counts(lhs: Option<i64>, rhs: Option<i64>) -> Option<i64> {
    match (lhs, rhs) {
        (None, None) => None,
        _ => Some(lhs.unwrap_or_default().saturating_add(rhs.unwrap_or_default())),
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::conf::Conf;

    fn record(population: &str, ac: i64, an: i64, hom: i64, het: i64) -> PopulationRecord {
        PopulationRecord {
            population: population.into(),
            allele_count: Some(ac),
            allele_number: Some(an),
            genotypes: GenotypeCounts::new(hom, het, 0),
            allele_frequency: None,
        }
    }

    #[test]
    fn from_raw() -> Result<(), anyhow::Error> {
        let conf = Conf::builtin()?;
        let raw = PopulationFrequency {
            population: "Other".into(),
            allele_count: Some(4),
            allele_number: Some(1000),
            genotype_heterozygous: Some(4),
            allele_frequency: Some(0.004),
            ..Default::default()
        };
        assert_eq!(
            PopulationRecord {
                population: "Remaining Individuals".into(),
                allele_count: Some(4),
                allele_number: Some(1000),
                genotypes: GenotypeCounts::new(0, 4, 0),
                allele_frequency: Some(0.004),
            },
            PopulationRecord::from_raw(&raw, &conf.aliases)
        );
        Ok(())
    }

    #[test]
    fn frequency_prefers_provided() {
        let mut r = record("A", 1, 4, 0, 1);
        assert!(approx_eq!(f64, 0.25, r.frequency().unwrap_or_default(), ulps = 2));
        r.allele_frequency = Some(0.3);
        assert_eq!(Some(0.3), r.frequency());
        r.allele_frequency = None;
        r.allele_number = Some(0);
        assert_eq!(None, r.frequency());
    }

    #[test]
    fn merge_sums() {
        let a = record("Bulgarian", 1, 100, 0, 1);
        let b = record("Bulgarian", 3, 50, 1, 1);
        assert_eq!(record("Bulgarian", 4, 150, 1, 2), a.merge(&b));
    }

    #[test]
    fn merge_is_commutative() {
        let a = PopulationRecord {
            allele_frequency: Some(0.01),
            allele_number: None,
            ..record("Bulgarian", 1, 100, 0, 1)
        };
        let b = PopulationRecord {
            genotypes: GenotypeCounts::new(2, 0, 5),
            ..record("Bulgarian", 3, 50, 1, 1)
        };
        assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn add_counts_none() {
        assert_eq!(None, add_counts(None, None));
        assert_eq!(Some(2), add_counts(None, Some(2)));
        assert_eq!(Some(5), add_counts(Some(3), Some(2)));
    }

    #[test]
    fn merge_saturates() {
        let a = record("Females", i64::MAX, i64::MAX, i64::MAX, 1);
        let b = record("Males", i64::MAX, 10, 1, 1);
        let merged = a.merge(&b);
        assert_eq!(Some(i64::MAX), merged.allele_count);
        assert_eq!(Some(i64::MAX), merged.allele_number);
        assert_eq!(GenotypeCounts::new(i64::MAX, 2, 0), merged.genotypes);
    }
}
