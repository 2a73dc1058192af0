//! Per-dataset table cache
//!
//! The flattened table is a pure function of a static source file, so each
//! dataset is parsed at most once per process and the result reused across
//! every filter operation. There is no invalidation: the source files do
//! not change while the process runs.

use crate::dataset::Dataset;
use crate::flatten::{self, FlatRecord, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Memoized base tables, keyed by dataset name.
pub struct TableStore {
    data_dir: PathBuf,
    tables: HashMap<&'static str, Vec<FlatRecord>>,
}

impl TableStore {
    pub fn new(data_dir: PathBuf) -> Self {
        TableStore {
            data_dir,
            tables: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The flattened table for one dataset, loading it on first access.
    /// Load failures are returned every time; nothing partial is cached.
    pub fn table(&mut self, dataset: &Dataset) -> Result<&[FlatRecord]> {
        if !self.tables.contains_key(dataset.name) {
            let table = flatten::load_table(&self.data_dir, dataset)?;
            self.tables.insert(dataset.name, table);
        }
        Ok(self.tables[dataset.name].as_slice())
    }
}
