/// Ingestion boundary: raw classifier output to canonical alerts

pub mod normalizer;

pub use normalizer::{parse_timestamp, AlertNormalizer, IngestionOutcome, RawAlert, RejectedAlert};
