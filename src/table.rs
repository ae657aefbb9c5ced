//! The result table pipeline and the `table` sub command.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufWriter, Write},
};

use clap::Parser;

use crate::{
    beacon::{
        request::{BeaconClient, BeaconRequest, ReplayClient},
        schema::{BeaconResponse, ResultSet},
    },
    common::{read_json, Assembly},
    conf::Conf,
    dataset::{
        label::{Metadata, MetadataResponse},
        merge::merge_results,
        rows::{DatasetBlock, RowCategory, RowKind, TableRow},
        Provenance,
    },
    err::UpstreamError,
    liftover::{liftover_variant, LiftoverService, ReplayLiftover},
    variant::Variant,
};

/// Notice shown when no dataset has results.
pub const NO_RESULTS: &str = "No results found.";

/// Presentation state: which row categories are shown and which population
/// groups are expanded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ViewState {
    pub categories: HashSet<RowCategory>,
    pub expanded: HashSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            categories: [RowCategory::Ancestry, RowCategory::Sex].into_iter().collect(),
            expanded: HashSet::new(),
        }
    }
}

impl ViewState {
    pub fn new<C, E>(categories: C, expanded: E) -> Self
    where
        C: IntoIterator<Item = RowCategory>,
        E: IntoIterator<Item = String>,
    {
        Self {
            categories: categories.into_iter().collect(),
            expanded: expanded.into_iter().collect(),
        }
    }

    /// Expand the group `name` if collapsed, else collapse it.
    pub fn toggle_group(&mut self, name: &str) {
        if !self.expanded.remove(name) {
            self.expanded.insert(name.to_string());
        }
    }

    /// Whether `row` is shown; total rows always are.
    pub fn is_visible(&self, row: &TableRow) -> bool {
        match &row.kind {
            RowKind::Total => true,
            RowKind::SubPopulation { group } => {
                self.categories.contains(&RowCategory::Ancestry) && self.expanded.contains(group)
            }
            kind => self.categories.contains(&kind.category()),
        }
    }
}

/// Rows of `block` shown in `view`.
pub fn visible_rows<'a>(block: &'a DatasetBlock, view: &ViewState) -> Vec<&'a TableRow> {
    block.rows.iter().filter(|row| view.is_visible(row)).collect()
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultTable {
    /// The queried variant.
    pub queried: Variant,
    /// Assembly of the queried variant.
    pub assembly: Assembly,
    /// The variant lifted to the other assembly, if available.
    pub lifted: Option<Variant>,
    pub datasets: Vec<DatasetBlock>,
    /// Messages for the user.
    pub notices: Vec<String>,
}

impl ResultTable {
    /// Copy of `self` with only the rows shown in `view`.
    pub fn visible(&self, view: &ViewState) -> Self {
        Self {
            datasets: self
                .datasets
                .iter()
                .map(|block| DatasetBlock {
                    rows: visible_rows(block, view).into_iter().cloned().collect(),
                    ..block.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// Options of the table building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_new::new)]
pub struct TableOptions {
    /// Ignore results reported for another start position.
    pub strict_position: bool,
}

/// Copy of `result_set` without results reported for a start other than
/// `position`.  Results without a start are kept.
pub fn filter_position(result_set: &ResultSet, position: i64) -> ResultSet {
    let results = result_set.results.as_ref().map(|results| {
        results
            .iter()
            .filter(|result| match result.start() {
                Some(start) if start != position => {
                    tracing::trace!(
                        "ignoring result at {} instead of {} in {:?}",
                        start,
                        position,
                        &result_set.id
                    );
                    false
                }
                _ => true,
            })
            .cloned()
            .collect()
    });
    ResultSet {
        results,
        ..result_set.clone()
    }
}

/// Build the result table from the result sets of `queried` and, if lifted,
/// those of the lifted variant.
pub fn build_table(
    conf: &Conf,
    metadata: &Metadata,
    queried: &Variant,
    assembly: Assembly,
    original: &[ResultSet],
    lifted: Option<(&Variant, &[ResultSet])>,
    options: &TableOptions,
) -> ResultTable {
    let lifted_sets = lifted.map(|(_, sets)| sets).unwrap_or_default();
    let datasets = merge_results(original, lifted_sets, assembly)
        .into_iter()
        .filter_map(|mut tagged| {
            let variant = match (tagged.provenance, lifted) {
                (Provenance::Lifted, Some((lifted, _))) => lifted,
                _ => queried,
            };
            if options.strict_position {
                tagged.result_set = filter_position(&tagged.result_set, variant.position);
            }
            DatasetBlock::build(&tagged, variant, conf, metadata)
        })
        .collect::<Vec<_>>();

    let mut notices = Vec::new();
    if datasets.is_empty() {
        notices.push(NO_RESULTS.to_string());
    }
    tracing::info!("built table with {} dataset(s)", datasets.len());

    ResultTable {
        queried: queried.clone(),
        assembly,
        lifted: lifted.map(|(variant, _)| variant.clone()),
        datasets,
        notices,
    }
}

/// Query `client` for `variant` and, when a liftover `service` is given,
/// for the lifted variant, and build the result table.
///
/// Only a failure of the primary query is an error.  Failures of the
/// liftover or of the lifted query become notices.
pub fn search(
    conf: &Conf,
    metadata: &Metadata,
    client: &dyn BeaconClient,
    service: Option<&dyn LiftoverService>,
    variant: &Variant,
    assembly: Assembly,
    options: &TableOptions,
) -> Result<ResultTable, UpstreamError> {
    let original = client.query(&BeaconRequest::new(variant, assembly))?;

    let mut notices = Vec::new();
    let lifted = match service.map(|service| liftover_variant(service, variant, assembly)) {
        None => None,
        Some(Err(e)) => {
            tracing::warn!("{}", &e);
            notices.push(e.to_string());
            None
        }
        Some(Ok(lifted)) => {
            match client.query(&BeaconRequest::new(&lifted, assembly.other())) {
                Ok(response) => Some((lifted, response)),
                Err(e) => {
                    tracing::warn!("query for lifted variant {} failed: {}", &lifted, &e);
                    notices.push(e.to_string());
                    None
                }
            }
        }
    };

    let mut table = build_table(
        conf,
        metadata,
        variant,
        assembly,
        &original.response.result_sets,
        lifted
            .as_ref()
            .map(|(lifted, response)| (lifted, response.response.result_sets.as_slice())),
        options,
    );
    table.notices.append(&mut notices);
    Ok(table)
}

/// Command line arguments for `table` sub command.
#[derive(Parser, Debug)]
#[command(author, version, about = "Build allele frequency table", long_about = None)]
pub struct Args {
    /// Queried variant, as `chrom-pos-ref-alt` with 0-based position.
    #[arg(long)]
    pub variant: String,
    /// Assembly of the queried variant.
    #[arg(long, value_enum, default_value_t = Assembly::Grch37)]
    pub assembly: Assembly,
    /// Saved Beacon response for the queried variant.
    #[arg(long)]
    pub path_response: String,
    /// Saved Beacon response for the lifted variant.
    #[arg(long)]
    pub path_lifted_response: Option<String>,
    /// Saved answer of the liftover service.
    #[arg(long)]
    pub path_liftover: Option<String>,
    /// Saved Beacon metadata.
    #[arg(long)]
    pub path_metadata: Option<String>,
    /// Configuration file, replacing the built-in one.
    #[arg(long)]
    pub path_conf: Option<String>,
    /// Output file, stdout if not given.
    #[arg(long)]
    pub path_output: Option<String>,
    /// Ignore results reported for another start position.
    #[arg(long, default_value_t = false)]
    pub strict_position: bool,
    /// Write only the rows shown with `--show` and `--expand`.
    #[arg(long, default_value_t = false)]
    pub visible_only: bool,
    /// Row categories to show.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [RowCategory::Ancestry, RowCategory::Sex]
    )]
    pub show: Vec<RowCategory>,
    /// Population groups to expand.
    #[arg(long)]
    pub expand: Vec<String>,
}

/// Main entry point for `table` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let conf = Conf::load(args.path_conf.as_deref())?;
    let variant: Variant = args.variant.parse()?;

    let mut client = ReplayClient::default()
        .with_response(args.assembly, read_json::<BeaconResponse, _>(&args.path_response)?);
    if let Some(path) = &args.path_lifted_response {
        client = client.with_response(args.assembly.other(), read_json(path)?);
    }
    let service = args
        .path_liftover
        .as_ref()
        .map(|path| read_json(path).map(|response| ReplayLiftover::new(Some(response))))
        .transpose()?;
    if service.is_none() && args.path_lifted_response.is_some() {
        tracing::warn!("lifted response given without liftover answer, ignoring it");
    }
    let metadata = match &args.path_metadata {
        Some(path) => Metadata::from(read_json::<MetadataResponse, _>(path)?),
        None => Metadata::default(),
    };
    tracing::debug!("metadata has {} dataset name(s)", metadata.len());

    let table = search(
        &conf,
        &metadata,
        &client,
        service.as_ref().map(|s| s as &dyn LiftoverService),
        &variant,
        args.assembly,
        &TableOptions::new(args.strict_position),
    )?;
    let table = if args.visible_only {
        table.visible(&ViewState::new(args.show.iter().copied(), args.expand.iter().cloned()))
    } else {
        table
    };

    match &args.path_output {
        Some(path) => {
            let mut writer = BufWriter::new(
                File::create(path).map_err(|e| anyhow::anyhow!("could not create {:?}: {}", path, e))?,
            );
            serde_json::to_writer_pretty(&mut writer, &table)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        None => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    for notice in &table.notices {
        tracing::info!("{}", notice);
    }

    Ok(())
}
