//! Lifting variants over between GRCh37 and GRCh38, and the `liftover` sub
//! command.
//!
//! The coordinate conversion itself is done by an external interval
//! service; this module builds its requests and interprets its answers.

use clap::Parser;
use strum_macros::{Display, EnumString};

use crate::{
    beacon::schema::de_count,
    common::{read_json, Assembly},
    err::{LiftoverError, UpstreamError},
    variant::Variant,
};

/// Direction of a liftover.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    Display,
    EnumString,
)]
pub enum LiftoverDirection {
    #[strum(serialize = "hg19-to-hg38")]
    #[serde(rename = "hg19-to-hg38")]
    Hg19ToHg38,
    #[strum(serialize = "hg38-to-hg19")]
    #[serde(rename = "hg38-to-hg19")]
    Hg38ToHg19,
}

impl From<Assembly> for LiftoverDirection {
    fn from(value: Assembly) -> Self {
        match value {
            Assembly::Grch37 => LiftoverDirection::Hg19ToHg38,
            Assembly::Grch38 => LiftoverDirection::Hg38ToHg19,
        }
    }
}

/// Interval to convert.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LiftoverRequest {
    /// Chromosome with `chr` prefix.
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub direction: LiftoverDirection,
}

impl LiftoverRequest {
    /// Request lifting `variant` from assembly `from` to the other one.
    pub fn new(variant: &Variant, from: Assembly) -> Self {
        let interval = variant.interval();
        Self {
            chrom: variant.chrom_with_prefix(),
            start: interval.start,
            end: interval.end,
            direction: from.into(),
        }
    }

    /// Query string for the interval service.
    pub fn query_string(&self) -> String {
        format!(
            "hg={}&format=interval&chrom={}&start={}&end={}",
            self.direction, self.chrom, self.start, self.end
        )
    }
}

/// Answer of the interval service; only `output_start` is required.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LiftoverResponse {
    pub output_chrom: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub output_start: Option<i64>,
    #[serde(default, deserialize_with = "de_count")]
    pub output_end: Option<i64>,
}

/// Move `variant` (on assembly `from`) to the position given in `response`.
///
/// Reference and alternate bases are kept.
pub fn apply(
    variant: &Variant,
    from: Assembly,
    response: &LiftoverResponse,
) -> Result<Variant, LiftoverError> {
    let Some(output_start) = response.output_start else {
        return Err(LiftoverError::Unavailable {
            variant: variant.to_string(),
            assembly: from.other().to_string(),
        });
    };
    Ok(variant.with_position(output_start))
}

/// Access to the interval conversion service.
pub trait LiftoverService {
    fn liftover(&self, request: &LiftoverRequest) -> Result<LiftoverResponse, UpstreamError>;
}

/// Service answering every request with one saved response.
#[derive(Debug, Clone, Default, derive_new::new)]
pub struct ReplayLiftover {
    response: Option<LiftoverResponse>,
}

impl LiftoverService for ReplayLiftover {
    fn liftover(&self, request: &LiftoverRequest) -> Result<LiftoverResponse, UpstreamError> {
        self.response.clone().ok_or_else(|| {
            UpstreamError::QueryFailure(format!(
                "no liftover response available for {}",
                request.query_string()
            ))
        })
    }
}

/// Lift `variant` from assembly `from` to the other assembly using `service`.
pub fn liftover_variant<S: LiftoverService + ?Sized>(
    service: &S,
    variant: &Variant,
    from: Assembly,
) -> Result<Variant, LiftoverError> {
    let request = LiftoverRequest::new(variant, from);
    tracing::debug!("liftover request: {}", request.query_string());
    let response = service.liftover(&request)?;
    let lifted = apply(variant, from, &response)?;
    tracing::debug!("lifted {} ({}) to {} ({})", variant, from, &lifted, from.other());
    Ok(lifted)
}

/// Command line arguments for `liftover` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Lift a variant to the other assembly", long_about = None)]
pub struct Args {
    /// Variant to lift, as `chrom-pos-ref-alt` with 0-based position.
    #[arg(long)]
    pub variant: String,
    /// Assembly of the variant.
    #[arg(long, value_enum, default_value_t = Assembly::Grch37)]
    pub assembly: Assembly,
    /// Saved JSON answer of the interval service; without it, only the
    /// request is printed.
    #[arg(long)]
    pub path_response: Option<String>,
}

/// Main entry point for `liftover` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let variant: Variant = args.variant.parse()?;
    match &args.path_response {
        None => {
            println!("{}", LiftoverRequest::new(&variant, args.assembly).query_string());
        }
        Some(path) => {
            let service = ReplayLiftover::new(Some(read_json(path)?));
            let lifted = liftover_variant(&service, &variant, args.assembly)?;
            println!("{}", lifted);
        }
    }

    Ok(())
}
