//! Canonicalization of population labels.

use indexmap::IndexMap;

/// Mapping of raw population labels to their canonical label.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Aliases(IndexMap<String, String>);

impl Aliases {
    /// Canonical label for `raw`, `raw` itself when there is no alias.
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        self.0.get(raw).map(String::as_str).unwrap_or(raw)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Aliases {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(raw, canonical)| (raw.into(), canonical.into()))
                .collect(),
        )
    }
}

/// Canonical label for `raw` according to `aliases`.
pub fn normalize_population_label(raw: &str, aliases: &Aliases) -> String {
    aliases.normalize(raw).to_string()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::conf::Conf;

    #[rstest]
    #[case("Other", "Remaining Individuals")]
    #[case("Remaining individuals", "Remaining Individuals")]
    #[case("Reaming individuals", "Remaining Individuals")]
    #[case("Remaining", "Remaining Individuals")]
    #[case("African", "African-American/African")]
    #[case("African/African-American", "African-American/African")]
    #[case("African/African american", "African-American/African")]
    #[case("Bulgarian (Eastern European)", "Bulgarian")]
    #[case("Non-Finnish European", "European (non-Finnish)")]
    #[case("North-western European", "North-Western European")]
    #[case("Other non-Finnish European", "Other Non-Finnish European")]
    #[case("Korean", "Korean")]
    #[case("korean", "korean")]
    #[case("Martian", "Martian")]
    #[case("", "")]
    fn builtin_aliases(#[case] raw: &str, #[case] expected: &str) -> Result<(), anyhow::Error> {
        let conf = Conf::builtin()?;
        assert_eq!(expected, normalize_population_label(raw, &conf.aliases));
        Ok(())
    }

    #[test]
    fn from_iter() {
        let aliases: Aliases = [("a", "A"), ("b", "A")].into_iter().collect();
        assert_eq!(2, aliases.len());
        assert_eq!("A", aliases.normalize("b"));
        assert_eq!("c", aliases.normalize("c"));
    }
}
