//! Computation of the total row of a dataset.

use crate::{
    beacon::{frequency::derive_frequency, genotype::GenotypeCounts},
    population::record::PopulationRecord,
};

/// Records the computed totals are summed over.
#[derive(Debug, Clone, PartialEq)]
pub enum TotalsBasis<'a> {
    /// The female and the male record.
    Sexes(&'a PopulationRecord, &'a PopulationRecord),
    /// The top-level ancestry records, without subpopulations.
    Ancestries(Vec<&'a PopulationRecord>),
    /// The only sex record present.
    Single(&'a PopulationRecord),
    /// Nothing to sum over.
    Empty,
}

impl<'a> TotalsBasis<'a> {
    pub fn records(&self) -> Vec<&'a PopulationRecord> {
        match self {
            TotalsBasis::Sexes(female, male) => vec![*female, *male],
            TotalsBasis::Ancestries(records) => records.clone(),
            TotalsBasis::Single(record) => vec![*record],
            TotalsBasis::Empty => Vec::new(),
        }
    }
}

/// Choose what to sum over when the dataset does not provide totals.
///
/// Both sexes are preferred, then the top-level ancestries, then whichever
/// sex is present.
pub fn select_basis<'a>(
    female: Option<&'a PopulationRecord>,
    male: Option<&'a PopulationRecord>,
    top_level: Vec<&'a PopulationRecord>,
) -> TotalsBasis<'a> {
    match (female, male) {
        (Some(female), Some(male)) => TotalsBasis::Sexes(female, male),
        _ if !top_level.is_empty() => TotalsBasis::Ancestries(top_level),
        (Some(single), None) | (None, Some(single)) => TotalsBasis::Single(single),
        (None, None) => TotalsBasis::Empty,
    }
}

/// Values of the total row.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Totals {
    pub allele_count: Option<i64>,
    pub allele_number: Option<i64>,
    pub genotypes: GenotypeCounts,
    pub allele_frequency: Option<f64>,
}

/// The provided value unless absent or zero, else the computed one.
fn prefer_provided(provided: Option<i64>, computed: Option<i64>) -> Option<i64> {
    match provided {
        Some(value) if value != 0 => Some(value),
        _ => computed,
    }
}

/// Fill a zero homozygous or heterozygous count as `allele_count - other`.
///
/// The result is not checked for plausibility; negative values are kept
/// and logged.
fn genotype_fallback(value: i64, allele_count: Option<i64>, other: i64, category: &str) -> i64 {
    if value != 0 {
        return value;
    }
    let Some(allele_count) = allele_count else {
        return 0;
    };
    let result = allele_count.saturating_sub(other);
    if result < 0 {
        tracing::warn!(
            "{} total derived as {} - {} is negative: {}",
            category,
            allele_count,
            other,
            result
        );
    } else {
        tracing::trace!("{} total derived as {} - {}", category, allele_count, other);
    }
    result
}

/// Compute the totals from `basis`, preferring the fields of `provided`.
pub fn compute_totals(basis: &TotalsBasis, provided: Option<&PopulationRecord>) -> Totals {
    let sum = basis
        .records()
        .into_iter()
        .fold(PopulationRecord::default(), |acc, record| acc.merge(record));
    let provided = provided.cloned().unwrap_or_default();

    let allele_count = prefer_provided(provided.allele_count, sum.allele_count);
    let allele_number = prefer_provided(provided.allele_number, sum.allele_number);
    let pick = |provided: i64, computed: i64| if provided != 0 { provided } else { computed };
    let homozygous = pick(provided.genotypes.homozygous, sum.genotypes.homozygous);
    let heterozygous = pick(provided.genotypes.heterozygous, sum.genotypes.heterozygous);
    let hemizygous = pick(provided.genotypes.hemizygous, sum.genotypes.hemizygous);

    Totals {
        allele_count,
        allele_number,
        genotypes: GenotypeCounts {
            homozygous: genotype_fallback(homozygous, allele_count, heterozygous, "homozygous"),
            heterozygous: genotype_fallback(heterozygous, allele_count, homozygous, "heterozygous"),
            hemizygous,
        },
        allele_frequency: provided
            .allele_frequency
            .or_else(|| derive_frequency(allele_count, allele_number)),
    }
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;
    use crate::beacon::frequency::{format_allele_frequency, FormatOptions};

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
    fn sum_of_sexes() {
        let female = record("Female", 10, 100, 1, 8);
        let male = record("Male", 6, 80, 0, 6);
        let basis = select_basis(Some(&female), Some(&male), vec![]);
        let totals = compute_totals(&basis, None);

        assert_eq!(Some(16), totals.allele_count);
        assert_eq!(Some(180), totals.allele_number);
        assert_eq!(GenotypeCounts::new(1, 14, 0), totals.genotypes);
        let af = totals.allele_frequency.unwrap_or_default();
        assert!(approx_eq!(f64, 16.0 / 180.0, af, ulps = 2));
        assert_eq!(
            "0.088889",
            format_allele_frequency(totals.allele_frequency, &FormatOptions::default())
        );
    }

    #[test]
    fn provided_fields_take_precedence() {
        let female = record("Females", 10, 100, 1, 8);
        let male = record("Males", 6, 80, 0, 6);
        let total = PopulationRecord {
            allele_number: None,
            allele_frequency: Some(0.1),
            genotypes: GenotypeCounts::new(2, 0, 0),
            ..record("Total", 20, 0, 0, 0)
        };
        let basis = select_basis(Some(&female), Some(&male), vec![]);
        let totals = compute_totals(&basis, Some(&total));

        assert_eq!(
            Totals {
                allele_count: Some(20),
                allele_number: Some(180),
                genotypes: GenotypeCounts::new(2, 14, 0),
                allele_frequency: Some(0.1),
            },
            totals
        );
    }

    #[test]
    fn basis_selection() {
        let female = record("Female", 1, 10, 0, 1);
        let male = record("Male", 1, 10, 0, 1);
        let ancestry = record("Amish", 2, 20, 0, 2);

        assert_eq!(
            TotalsBasis::Sexes(&female, &male),
            select_basis(Some(&female), Some(&male), vec![&ancestry])
        );
        assert_eq!(
            TotalsBasis::Ancestries(vec![&ancestry]),
            select_basis(Some(&female), None, vec![&ancestry])
        );
        assert_eq!(
            TotalsBasis::Single(&male),
            select_basis(None, Some(&male), vec![])
        );
        assert_eq!(TotalsBasis::Empty, select_basis(None, None, vec![]));
    }

    #[test]
    fn sum_of_ancestries() {
        let a = record("East Asian", 3, 100, 1, 1);
        let b = record("Amish", 5, 200, 0, 5);
        let totals = compute_totals(&TotalsBasis::Ancestries(vec![&a, &b]), None);
        assert_eq!(Some(8), totals.allele_count);
        assert_eq!(Some(300), totals.allele_number);
        assert_eq!(GenotypeCounts::new(1, 6, 0), totals.genotypes);
    }

    #[test]
    fn homozygous_from_heterozygous() {
        let only = record("Female", 5, 50, 0, 3);
        let totals = compute_totals(&TotalsBasis::Single(&only), None);
        assert_eq!(GenotypeCounts::new(2, 3, 0), totals.genotypes);
    }

    #[traced_test]
    #[test]
    fn negative_fallback_is_kept() {
        let only = record("Female", 2, 50, 0, 3);
        let totals = compute_totals(&TotalsBasis::Single(&only), None);
        assert_eq!(-1, totals.genotypes.homozygous);
        assert_eq!(3, totals.genotypes.heterozygous);
        assert!(logs_contain("is negative"));
    }

    #[test]
    fn huge_counts_saturate() {
        let female = record("Females", i64::MAX, i64::MAX, 0, 1);
        let male = record("Males", i64::MAX, 10, 0, i64::MAX);
        let totals = compute_totals(&TotalsBasis::Sexes(&female, &male), None);
        assert_eq!(Some(i64::MAX), totals.allele_count);
        assert_eq!(Some(i64::MAX), totals.allele_number);
        assert_eq!(GenotypeCounts::new(0, i64::MAX, 0), totals.genotypes);

        let low = record("Female", i64::MIN, 10, 0, 1);
        let totals = compute_totals(&TotalsBasis::Single(&low), None);
        assert_eq!(i64::MIN, totals.genotypes.homozygous);
    }

    #[test]
    fn empty_basis() {
        let totals = compute_totals(&TotalsBasis::Empty, None);
        assert_eq!(Totals::default(), totals);
    }

    #[test]
    fn zero_allele_number_has_no_frequency() {
        let only = record("Male", 0, 0, 0, 0);
        let totals = compute_totals(&TotalsBasis::Single(&only), None);
        assert_eq!(None, totals.allele_frequency);
        assert_eq!(GenotypeCounts::new(0, 0, 0), totals.genotypes);
    }
}
