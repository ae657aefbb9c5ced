//! Human-readable labels of datasets.

use indexmap::IndexMap;

use crate::{common::Assembly, variant::Variant};

/// Accession of the GCAT dataset at the EGA.
pub const GCAT_ACCESSION: &str = "EGAD00001007774";
/// Prefix of EGA dataset accessions.
pub const EGA_PREFIX: &str = "EGAD";
/// Prefix of gnomAD dataset identifiers.
pub const GNOMAD_PREFIX: &str = "gnomad";

const EGA_DATASET_URL: &str = "https://ega-archive.org/datasets";
const GNOMAD_VARIANT_URL: &str = "https://gnomad.broadinstitute.org/variant";

/// Label of a dataset block, optionally linking to the dataset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DatasetLabel {
    pub text: String,
    pub link: Option<String>,
}

/// Short name of the dataset with identifier `id`, used for sorting.
pub fn display_name(id: &str) -> String {
    if id == GCAT_ACCESSION {
        "GCAT".to_string()
    } else if id.starts_with(GNOMAD_PREFIX) {
        "gnomAD".to_string()
    } else {
        id.to_string()
    }
}

/// `variant` in the 1-based notation of the gnomAD browser.
pub fn gnomad_variant(variant: &Variant) -> String {
    variant.with_position(variant.position.saturating_add(1)).to_string()
}

/// Label of the dataset `id` whose results were obtained for `variant` on
/// `assembly`.
pub fn dataset_label(
    id: &str,
    assembly: Assembly,
    variant: &Variant,
    metadata: &Metadata,
) -> DatasetLabel {
    if id == GCAT_ACCESSION {
        DatasetLabel {
            text: format!("GCAT ({id})"),
            link: Some(format!("{EGA_DATASET_URL}/{id}")),
        }
    } else if id.starts_with(EGA_PREFIX) {
        DatasetLabel {
            text: id.to_string(),
            link: Some(format!("{EGA_DATASET_URL}/{id}")),
        }
    } else if id.starts_with(GNOMAD_PREFIX) {
        let (text, release) = match assembly {
            Assembly::Grch37 => ("gnomAD v2.1.1 (exomes only)", "gnomad_r2_1"),
            Assembly::Grch38 => ("gnomAD v4.1.0 (exomes and genomes)", "gnomad_r4"),
        };
        DatasetLabel {
            text: text.to_string(),
            link: Some(format!(
                "{}/{}?dataset={}",
                GNOMAD_VARIANT_URL,
                gnomad_variant(variant),
                release
            )),
        }
    } else {
        DatasetLabel {
            text: metadata.name(id).unwrap_or(id).to_string(),
            link: None,
        }
    }
}

/// Identifier and name of a dataset in the Beacon metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DatasetInfo {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
}

/// The `response` member of the Beacon metadata payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MetadataBody {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "collections")]
    pub datasets: Vec<DatasetInfo>,
}

/// Beacon metadata payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MetadataResponse {
    pub response: MetadataBody,
}

/// Dataset names known from the Beacon metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    names: IndexMap<String, String>,
}

impl Metadata {
    /// Name of the dataset or beacon with identifier `id`.
    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<MetadataResponse> for Metadata {
    fn from(value: MetadataResponse) -> Self {
        let body = value.response;
        let beacon = match (body.id, body.name) {
            (Some(id), Some(name)) => Some((id, name)),
            _ => None,
        };
        let names = beacon
            .into_iter()
            .chain(
                body.datasets
                    .into_iter()
                    .filter_map(|info| Some((info.id, info.name?))),
            )
            .collect();
        Self { names }
    }
}
