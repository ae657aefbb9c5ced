//! Building of Beacon `g_variants` requests, and the `request` sub command.

use std::collections::HashMap;

use clap::Parser;
use itertools::Itertools;
use serde_json::json;

use super::schema::BeaconResponse;
use crate::{common::Assembly, err::UpstreamError, variant::Variant};

/// Number of records requested per page in POST queries.
pub const PAGE_LIMIT: usize = 10;

/// Parameters of one `g_variants` query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconRequest {
    pub reference_name: String,
    pub start: i64,
    pub end: i64,
    pub reference_bases: String,
    pub alternate_bases: String,
    pub assembly_id: Assembly,
}

impl BeaconRequest {
    /// Build request for `variant` on `assembly`.
    pub fn new(variant: &Variant, assembly: Assembly) -> Self {
        let interval = variant.interval();
        Self {
            reference_name: variant.chromosome.clone(),
            start: interval.start,
            end: interval.end,
            reference_bases: variant.reference_bases.clone(),
            alternate_bases: variant.alternate_bases.clone(),
            assembly_id: assembly,
        }
    }

    /// Query parameters of the unauthenticated GET form.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.start.to_string()),
            ("alternateBases", self.alternate_bases.clone()),
            ("referenceBases", self.reference_bases.clone()),
            ("referenceName", self.reference_name.clone()),
            ("assemblyId", self.assembly_id.to_string()),
        ]
    }

    /// Query string of the unauthenticated GET form.
    pub fn query_string(&self) -> String {
        self.query_params()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join("&")
    }

    /// JSON body of the authenticated POST form.
    pub fn post_body(&self) -> serde_json::Value {
        json!({
            "meta": {
                "apiVersion": "2.0",
            },
            "query": {
                "requestParameters": {
                    "alternateBases": self.alternate_bases,
                    "referenceBases": self.reference_bases,
                    "start": self.start.to_string(),
                    "end": self.end.to_string(),
                    "referenceName": self.reference_name,
                    "assemblyId": self.assembly_id,
                },
                "filters": [],
                "includeResultsetResponses": "HIT",
                "pagination": {
                    "skip": 0,
                    "limit": PAGE_LIMIT,
                },
                "testMode": false,
                "requestedGranularity": "record",
            },
        })
    }
}

/// Access to a Beacon `g_variants` endpoint.
pub trait BeaconClient {
    /// Run `request`, returning the decoded payload.
    fn query(&self, request: &BeaconRequest) -> Result<BeaconResponse, UpstreamError>;
}

/// Client answering from previously saved responses, one per assembly.
#[derive(Debug, Clone, Default)]
pub struct ReplayClient {
    responses: HashMap<Assembly, BeaconResponse>,
}

impl ReplayClient {
    /// Register the saved `response` for queries on `assembly`.
    pub fn with_response(mut self, assembly: Assembly, response: BeaconResponse) -> Self {
        self.responses.insert(assembly, response);
        self
    }
}

impl BeaconClient for ReplayClient {
    fn query(&self, request: &BeaconRequest) -> Result<BeaconResponse, UpstreamError> {
        self.responses
            .get(&request.assembly_id)
            .cloned()
            .ok_or_else(|| {
                UpstreamError::QueryFailure(format!(
                    "no response available for {}",
                    request.assembly_id
                ))
            })
    }
}

/// Command line arguments for `request` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Print Beacon query for a variant", long_about = None)]
pub struct Args {
    /// Variant to query, as `chrom-pos-ref-alt` with 0-based position.
    #[arg(long)]
    pub variant: String,
    /// Reference genome assembly of the variant.
    #[arg(long, value_enum, default_value_t = Assembly::Grch37)]
    pub assembly: Assembly,
}

/// Main entry point for `request` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let variant: Variant = args.variant.parse()?;
    let request = BeaconRequest::new(&variant, args.assembly);
    let out = json!({
        "get": request.query_string(),
        "post": request.post_body(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}
