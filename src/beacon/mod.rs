//! Beacon payloads: request building, response model, and record normalization.

pub mod frequency;
pub mod genotype;
pub mod request;
pub mod schema;
