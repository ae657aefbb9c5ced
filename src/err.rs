use std::num::ParseIntError;

/// Errors raised when decoding a `chrom-pos-ref-alt` variant string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("Malformed variant {0:?}, expected chromosome-position-reference-alternate")]
    Malformed(String),
    #[error("Invalid integer position in variant {variant:?}")]
    InvalidPosition {
        variant: String,
        #[source]
        source: ParseIntError,
    },
}

/// Failure of the Beacon query or of any other upstream service call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("There is a problem connecting to the Beacon Network: {0}")]
    QueryFailure(String),
}

/// Errors raised when lifting a variant over to the other assembly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiftoverError {
    #[error("Liftover to {assembly} is not available for variant {variant}")]
    Unavailable { variant: String, assembly: String },
    #[error("Liftover service failed")]
    Upstream(#[from] UpstreamError),
    #[error("Liftover input is invalid")]
    Variant(#[from] VariantError),
}

/// Errors in the population taxonomy configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Subpopulation {name:?} is declared in both {first:?} and {second:?}")]
    DuplicateSubPopulation {
        name: String,
        first: String,
        second: String,
    },
    #[error("Population {0:?} is declared both as group and as subpopulation")]
    GroupIsSubPopulation(String),
    #[error("Population group {0:?} is declared twice")]
    DuplicateGroup(String),
    #[error("Could not parse configuration: {0}")]
    Parse(String),
}
