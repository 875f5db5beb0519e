//! Read-only tabular datasets served as JSON.
//!
//! Layout:
//! - `loader.rs`: CSV parsing and per-column scalar typing
//!
//! A `Dataset` is loaded once at startup and never mutated. Its JSON body is
//! rendered at load time so every request serves the same bytes.

mod loader;

use axum::body::Bytes;
use serde_json::{Map, Value};
use std::{fs::File, io::Read, path::Path};
use tracing::info;

use crate::error::NexusError;

/// One CSV row: column name to scalar, in header order.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    records: Vec<Record>,
    json: Bytes,
}

impl Dataset {
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, NexusError> {
        let name = name.into();
        let file = File::open(path).map_err(|source| NexusError::DatasetIo {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(name, file)?;
        info!(
            dataset = %dataset.name,
            path = %path.display(),
            rows = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, NexusError> {
        let name = name.into();
        let records = loader::read_records(&name, reader)?;
        Self::from_records(name, records)
    }

    pub fn from_records(name: impl Into<String>, records: Vec<Record>) -> Result<Self, NexusError> {
        let json = Bytes::from(serde_json::to_vec(&records)?);
        Ok(Self {
            name: name.into(),
            records,
            json,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pre-rendered JSON array of all records.
    pub fn json_body(&self) -> Bytes {
        self.json.clone()
    }
}
