//! The two-level population hierarchy (parent group and subpopulations).

use std::collections::{HashMap, HashSet};

use super::cmp_labels;
use crate::err::ConfigError;

/// A parent population group with its subpopulations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, derive_new::new)]
pub struct PopulationGroup {
    /// Canonical label of the group.
    pub name: String,
    /// Canonical labels of the subpopulations.
    #[serde(default)]
    pub sub_populations: Vec<String>,
}

/// The configured population groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    groups: Vec<PopulationGroup>,
}

impl Taxonomy {
    /// Construct and validate.
    pub fn new(groups: Vec<PopulationGroup>) -> Result<Self, ConfigError> {
        let result = Self { groups };
        result.validate()?;
        Ok(result)
    }

    /// Check that every subpopulation belongs to exactly one group and that
    /// group and subpopulation labels do not overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut group_names = HashSet::new();
        for group in &self.groups {
            if !group_names.insert(group.name.as_str()) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        for group in &self.groups {
            for sub in &group.sub_populations {
                if group_names.contains(sub.as_str()) {
                    return Err(ConfigError::GroupIsSubPopulation(sub.clone()));
                }
                if let Some(first) = parents.insert(sub.as_str(), group.name.as_str()) {
                    return Err(ConfigError::DuplicateSubPopulation {
                        name: sub.clone(),
                        first: first.to_string(),
                        second: group.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Groups in alphabetical order.
    pub fn sorted_groups(&self) -> Vec<&PopulationGroup> {
        let mut groups = self.groups.iter().collect::<Vec<_>>();
        groups.sort_by(|a, b| cmp_labels(&a.name, &b.name));
        groups
    }

    /// Whether `label` names a group or a subpopulation.
    pub fn is_known(&self, label: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.name == label || group.sub_populations.iter().any(|s| s == label))
    }

    /// Name of the group that `label` is a subpopulation of.
    pub fn parent_of(&self, label: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.sub_populations.iter().any(|s| s == label))
            .map(|group| group.name.as_str())
    }

    pub fn groups(&self) -> &[PopulationGroup] {
        &self.groups
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::conf::Conf;

    fn group(name: &str, subs: &[&str]) -> PopulationGroup {
        PopulationGroup::new(name.into(), subs.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn builtin_is_valid() -> Result<(), anyhow::Error> {
        let conf = Conf::builtin()?;
        conf.groups.validate()?;
        assert_eq!(11, conf.groups.groups().len());
        Ok(())
    }

    #[test]
    fn sorted_groups() -> Result<(), anyhow::Error> {
        let taxonomy = Taxonomy::new(vec![
            group("South Asian", &[]),
            group("East Asian", &["Korean"]),
            group("Amish", &[]),
            group("ashkenazi", &[]),
        ])?;
        assert_eq!(
            vec!["Amish", "ashkenazi", "East Asian", "South Asian"],
            taxonomy
                .sorted_groups()
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn lookups() -> Result<(), anyhow::Error> {
        let conf = Conf::builtin()?;
        assert!(conf.groups.is_known("East Asian"));
        assert!(conf.groups.is_known("Swedish"));
        assert!(!conf.groups.is_known("Martian"));
        assert_eq!(Some("European (non-Finnish)"), conf.groups.parent_of("Swedish"));
        assert_eq!(None, conf.groups.parent_of("East Asian"));
        Ok(())
    }

    #[test]
    fn duplicate_sub_population() {
        assert_eq!(
            Err(ConfigError::DuplicateSubPopulation {
                name: "Korean".into(),
                first: "East Asian".into(),
                second: "Other".into(),
            }),
            Taxonomy::new(vec![
                group("East Asian", &["Korean"]),
                group("Other", &["Korean"]),
            ])
        );
    }

    #[test]
    fn group_as_sub_population() {
        assert_eq!(
            Err(ConfigError::GroupIsSubPopulation("Amish".into())),
            Taxonomy::new(vec![group("East Asian", &["Amish"]), group("Amish", &[])])
        );
    }

    #[test]
    fn duplicate_group() {
        assert_eq!(
            Err(ConfigError::DuplicateGroup("Amish".into())),
            Taxonomy::new(vec![group("Amish", &[]), group("Amish", &[])])
        );
    }
}
