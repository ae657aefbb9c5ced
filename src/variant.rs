//! Encoding and decoding of `chrom-pos-ref-alt` variant strings.
//!
//! Positions are 0-based, as typed into the search form and as sent to the
//! Beacon API.

use std::{fmt, str::FromStr};

use crate::err::VariantError;

/// Separator between the four fields of a variant string.
pub const SEPARATOR: char = '-';

/// A small variant as queried by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Chromosome name, as given (e.g., `21` or `X`).
    pub chromosome: String,
    /// 0-based position.
    pub position: i64,
    /// Reference bases.
    pub reference_bases: String,
    /// Alternate bases.
    pub alternate_bases: String,
}

/// Half-open `[start, end)` interval on a chromosome.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, derive_new::new)]
pub struct GenomicInterval {
    pub chromosome: String,
    pub start: i64,
    pub end: i64,
}

/// Start and end of the interval covered by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

/// Parse a `chrom-pos-ref-alt` string.
pub fn parse(s: &str) -> Result<Variant, VariantError> {
    let fields = s.split(SEPARATOR).collect::<Vec<_>>();
    let [chromosome, position, reference_bases, alternate_bases] = fields.as_slice() else {
        return Err(VariantError::Malformed(s.to_string()));
    };
    let position = position
        .parse::<i64>()
        .map_err(|source| VariantError::InvalidPosition {
            variant: s.to_string(),
            source,
        })?;

    Ok(Variant {
        chromosome: chromosome.to_string(),
        position,
        reference_bases: reference_bases.to_string(),
        alternate_bases: alternate_bases.to_string(),
    })
}

/// Build the `chrom-pos-ref-alt` string of `variant`.
pub fn build(variant: &Variant) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
        variant.chromosome, variant.position, variant.reference_bases, variant.alternate_bases
    )
}

/// Compute the interval covered by the reference bases at `position`.
pub fn interval(position: i64, reference_bases: &str) -> Interval {
    let len = reference_bases.chars().count().max(1) as i64;
    Interval {
        start: position,
        end: position.saturating_add(len),
    }
}

impl Variant {
    /// The interval covered by the reference allele.
    pub fn interval(&self) -> GenomicInterval {
        let Interval { start, end } = interval(self.position, &self.reference_bases);
        GenomicInterval::new(self.chromosome.clone(), start, end)
    }

    /// Chromosome name with `chr` prefix, as UCSC-style services expect.
    pub fn chrom_with_prefix(&self) -> String {
        if self.chromosome.starts_with("chr") {
            self.chromosome.clone()
        } else {
            format!("chr{}", self.chromosome)
        }
    }

    /// Copy of `self` moved to `position`.
    pub fn with_position(&self, position: i64) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

impl FromStr for Variant {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", build(self))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("21-19653341-AT-A")]
    #[case("X-100-G-C")]
    #[case("1-0-A-AT")]
    #[case("MT-16000-ACGT-A")]
    fn round_trip(#[case] s: &str) -> Result<(), anyhow::Error> {
        let variant = parse(s)?;
        assert_eq!(s, build(&variant));
        assert_eq!(variant, parse(&build(&variant))?);
        Ok(())
    }

    #[test]
    fn parse_fields() -> Result<(), anyhow::Error> {
        let variant: Variant = "21-19653341-AT-A".parse()?;
        assert_eq!(
            Variant {
                chromosome: "21".into(),
                position: 19653341,
                reference_bases: "AT".into(),
                alternate_bases: "A".into(),
            },
            variant
        );
        assert_eq!("chr21", variant.chrom_with_prefix());
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("21")]
    #[case("21-100-A")]
    #[case("21-100-A-T-G")]
    fn parse_malformed(#[case] s: &str) {
        assert_eq!(Err(VariantError::Malformed(s.to_string())), parse(s));
    }

    #[test]
    fn parse_invalid_position() {
        assert!(matches!(
            parse("21-abc-A-T"),
            Err(VariantError::InvalidPosition { .. })
        ));
    }

    #[rstest]
    #[case(100, "A", 100, 101)]
    #[case(100, "AT", 100, 102)]
    #[case(100, "ACGTA", 100, 105)]
    #[case(100, "", 100, 101)]
    fn interval_length(
        #[case] position: i64,
        #[case] reference: &str,
        #[case] start: i64,
        #[case] end: i64,
    ) {
        let iv = interval(position, reference);
        assert_eq!(Interval { start, end }, iv);
        assert_eq!(reference.len().max(1) as i64, iv.end - iv.start);
    }

    #[test]
    fn interval_at_max_position() -> Result<(), anyhow::Error> {
        let variant = parse("1-9223372036854775807-A-G")?;
        assert_eq!(
            GenomicInterval::new("1".into(), i64::MAX, i64::MAX),
            variant.interval()
        );
        Ok(())
    }

    #[test]
    fn variant_interval() -> Result<(), anyhow::Error> {
        let variant = parse("21-19653341-AT-A")?;
        assert_eq!(
            GenomicInterval::new("21".into(), 19653341, 19653343),
            variant.interval()
        );
        Ok(())
    }
}
