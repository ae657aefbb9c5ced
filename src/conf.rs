//! Code for supporting the configuration file.
//!
//! The built-in configuration is `conf/default.toml`; a file given on the
//! command line replaces it as a whole.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    beacon::frequency::FormatOptions,
    err::ConfigError,
    population::{alias::Aliases, taxonomy::Taxonomy},
};

/// The built-in configuration, in TOML format.
pub const BUILTIN: &str = include_str!("conf/default.toml");

/// Raw labels with special meaning and the labels displayed for them.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct Labels {
    /// Raw labels of female records.
    pub female: Vec<String>,
    /// Raw labels of male records.
    pub male: Vec<String>,
    /// Raw labels of records holding the dataset total.
    pub total: Vec<String>,
    /// Displayed label of the female row.
    pub female_display: String,
    /// Displayed label of the male row.
    pub male_display: String,
    /// Displayed label of the total row.
    pub total_display: String,
    /// Ancestry displayed for datasets without any ancestry record.
    pub fallback_ancestry: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            female: vec!["Female".into(), "Females".into()],
            male: vec!["Male".into(), "Males".into()],
            total: vec!["Total".into()],
            female_display: "XX".into(),
            male_display: "XY".into(),
            total_display: "Total".into(),
            fallback_ancestry: "European".into(),
        }
    }
}

impl Labels {
    pub fn is_female(&self, label: &str) -> bool {
        self.female.iter().any(|l| l == label)
    }

    pub fn is_male(&self, label: &str) -> bool {
        self.male.iter().any(|l| l == label)
    }

    pub fn is_total(&self, label: &str) -> bool {
        self.total.iter().any(|l| l == label)
    }

    /// Whether `label` denotes a sex or the total rather than an ancestry.
    pub fn is_special(&self, label: &str) -> bool {
        self.is_female(label) || self.is_male(label) || self.is_total(label)
    }
}

/// Top-level configuration.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct Conf {
    /// Allele frequency formatting.
    #[serde(default)]
    pub frequency: FormatOptions,
    /// Special population labels.
    #[serde(default)]
    pub labels: Labels,
    /// Population label aliases.
    #[serde(default)]
    pub aliases: Aliases,
    /// Population hierarchy.
    #[serde(default)]
    pub groups: Taxonomy,
}

impl Conf {
    /// Parse and validate configuration from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let conf: Conf =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        conf.groups.validate()?;
        Ok(conf)
    }

    /// The built-in configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(BUILTIN)
    }

    /// Load configuration from `path`, or the built-in one.
    pub fn load<P>(path: Option<P>) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let conf = if let Some(path) = path {
            tracing::debug!("Loading configuration from {:?}", &path);
            let toml_str = std::fs::read_to_string(path.as_ref())
                .map_err(|e| anyhow::anyhow!("could not read {:?}: {}", &path, e))?;
            Self::from_toml(&toml_str)?
        } else {
            tracing::debug!("Using built-in configuration");
            Self::builtin()?
        };
        tracing::debug!(
            "... {} aliases, {} population groups",
            conf.aliases.len(),
            conf.groups.groups().len()
        );
        Ok(conf)
    }
}
