// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

use crate::error::BenchmarkError;
use crate::reference::{ReferenceMix, ReferenceMixTable};

/// Default number of nearest lab mixes reported.
pub const DEFAULT_BENCHMARK_K: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    #[serde(flatten)]
    pub record: ReferenceMix,
    /// |measured_strength - predicted strength| (MPa)
    pub distance: f64,
}

/// The `k` lab mixes whose measured strength is closest to `strength`.
///
/// Ordered by ascending absolute difference. The sort is stable, so equal
/// distances keep table order. A table shorter than `k` yields every row.
pub fn benchmark(
    table: &ReferenceMixTable,
    strength: f64,
    k: usize,
) -> Result<Vec<BenchmarkResult>, BenchmarkError> {
    if table.is_empty() {
        return Err(BenchmarkError::EmptyTable);
    }
    if !strength.is_finite() {
        return Err(BenchmarkError::InvalidQuery { strength });
    }

    let mut ranked: Vec<BenchmarkResult> = table
        .records()
        .iter()
        .map(|record| BenchmarkResult {
            distance: (record.measured_strength - strength).abs(),
            record: record.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(k);
    Ok(ranked)
}
