//! Common functionality.

use std::{fs::File, io::BufReader, path::Path};

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use serde::de::DeserializeOwned;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Select the reference genome assembly to query.
#[derive(
    clap::ValueEnum,
    Clone,
    Copy,
    Debug,
    Default,
    strum::Display,
    strum::EnumString,
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub enum Assembly {
    /// GRCh37 / hg19
    #[default]
    #[strum(to_string = "GRCh37", serialize = "grch37", serialize = "hg19")]
    #[serde(rename = "GRCh37", alias = "grch37", alias = "hg19")]
    #[value(name = "GRCh37", alias = "grch37", alias = "hg19")]
    Grch37,
    /// GRCh38 / hg38
    #[strum(to_string = "GRCh38", serialize = "grch38", serialize = "hg38")]
    #[serde(rename = "GRCh38", alias = "grch38", alias = "hg38")]
    #[value(name = "GRCh38", alias = "grch38", alias = "hg38")]
    Grch38,
}

impl Assembly {
    /// The assembly that a liftover from `self` leads to.
    pub fn other(self) -> Self {
        match self {
            Assembly::Grch37 => Assembly::Grch38,
            Assembly::Grch38 => Assembly::Grch37,
        }
    }

    /// UCSC-style name of the assembly.
    pub fn ucsc_name(self) -> &'static str {
        match self {
            Assembly::Grch37 => "hg19",
            Assembly::Grch38 => "hg38",
        }
    }
}

/// Load a JSON document from `path`.
pub fn read_json<T, P>(path: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
    P: AsRef<Path> + std::fmt::Debug,
{
    tracing::trace!("Reading JSON from {:?}", &path);
    let file = File::open(path.as_ref())
        .map_err(|e| anyhow::anyhow!("could not open {:?}: {}", &path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("could not parse JSON from {:?}: {}", &path, e))
}

/// The version of `beacon-af-worker` package.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
