// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Reference lab-mix table
//
// Historical lab records used to benchmark a prediction. Exports have been
// both semicolon- and comma-delimited, with stray whitespace in the header
// row, so the loader tries each delimiter and trims column names.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BenchmarkError, LoadError};
use crate::science::benchmark::{benchmark, BenchmarkResult};

pub const MIX_ID_COLUMN: &str = "Mix_ID";
pub const STRENGTH_COLUMN: &str = "CS_28";
pub const SUSTAINABILITY_COLUMN: &str = "Sustainability";
pub const CO2_COLUMN: &str = "CO2";

/// Delimiters in trial order.
const DELIMITERS: [u8; 2] = [b';', b','];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMix {
    pub mix_id: String,
    pub measured_strength: f64, // MPa, 28 days
    pub sustainability_label: String,
    pub co2_label: String,
}

/// Read-only, ordered collection of lab records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMixTable {
    records: Vec<ReferenceMix>,
}

struct ColumnMap {
    mix_id: usize,
    strength: usize,
    sustainability: usize,
    co2: usize,
}

/// Strip surrounding whitespace (and a UTF-8 BOM) from a header name.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

impl ReferenceMixTable {
    pub fn new(records: Vec<ReferenceMix>) -> Self {
        ReferenceMixTable { records }
    }

    pub fn records(&self) -> &[ReferenceMix] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `k` lab mixes closest in strength, see [`benchmark`].
    pub fn nearest(&self, strength: f64, k: usize) -> Result<Vec<BenchmarkResult>, BenchmarkError> {
        benchmark(self, strength, k)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_text(&text)?;
        info!(path = %path.display(), rows = table.len(), "loaded reference table");
        Ok(table)
    }

    /// Parse delimited text, detecting `;` or `,` by trial.
    ///
    /// A delimiter is accepted when its header row contains every required
    /// column. If neither does, the error from the attempt that split the
    /// header into more columns is returned.
    pub fn from_text(text: &str) -> Result<Self, LoadError> {
        let mut best_miss: Option<(usize, LoadError)> = None;

        for delimiter in DELIMITERS {
            match Self::parse_with(text, delimiter) {
                Ok(table) => {
                    debug!(delimiter = %(delimiter as char), rows = table.len(), "reference table parsed");
                    return Ok(table);
                }
                Err(err @ LoadError::MissingColumn { .. }) => {
                    let width = match &err {
                        LoadError::MissingColumn { found, .. } => found.len(),
                        _ => 0,
                    };
                    if best_miss.as_ref().map_or(true, |(w, _)| width > *w) {
                        best_miss = Some((width, err));
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(best_miss.map(|(_, err)| err).unwrap_or(LoadError::MissingColumn {
            column: MIX_ID_COLUMN,
            found: Vec::new(),
        }))
    }

    fn parse_with(text: &str, delimiter: u8) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::Fields)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        let columns = ColumnMap::locate(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(columns.read(&row, delimiter)?);
        }
        Ok(ReferenceMixTable { records })
    }
}

impl ColumnMap {
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column,
                    found: headers.to_vec(),
                })
        };
        Ok(ColumnMap {
            mix_id: find(MIX_ID_COLUMN)?,
            strength: find(STRENGTH_COLUMN)?,
            sustainability: find(SUSTAINABILITY_COLUMN)?,
            co2: find(CO2_COLUMN)?,
        })
    }

    fn read(&self, row: &StringRecord, delimiter: u8) -> Result<ReferenceMix, LoadError> {
        let line = row.position().map_or(0, |p| p.line());
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let raw_strength = cell(self.strength);
        // Semicolon exports usually come with decimal commas.
        let numeric = if delimiter == b';' {
            raw_strength.replace(',', ".")
        } else {
            raw_strength.to_string()
        };
        let measured_strength: f64 = numeric.parse().map_err(|_| LoadError::InvalidRecord {
            row: line,
            reason: format!("{} value {:?} is not a number", STRENGTH_COLUMN, raw_strength),
        })?;
        if !measured_strength.is_finite() {
            return Err(LoadError::InvalidRecord {
                row: line,
                reason: format!("{} value {:?} is not finite", STRENGTH_COLUMN, raw_strength),
            });
        }

        Ok(ReferenceMix {
            mix_id: cell(self.mix_id).to_string(),
            measured_strength,
            sustainability_label: cell(self.sustainability).to_string(),
            co2_label: cell(self.co2).to_string(),
        })
    }
}
