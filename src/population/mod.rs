//! Population labels, records, and the population hierarchy.

use std::cmp::Ordering;

pub mod alias;
pub mod hierarchy;
pub mod record;
pub mod taxonomy;

/// Alphabetical order of population labels, ignoring case first.
pub fn cmp_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use rstest::rstest;

    #[rstest]
    #[case("East Asian", "European (non-Finnish)", Ordering::Less)]
    #[case("European (Finnish)", "European (non-Finnish)", Ordering::Less)]
    #[case("amish", "Ashkenazi Jewish", Ordering::Less)]
    #[case("Korean", "korean", Ordering::Less)]
    #[case("Swedish", "Swedish", Ordering::Equal)]
    fn cmp_labels(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(expected, super::cmp_labels(a, b));
    }
}
