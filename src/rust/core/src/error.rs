// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Error taxonomy for the SmartMix evaluation pipeline.
//!
//! Evaluation and benchmark errors are per-request and recoverable by the
//! caller. Load and config errors belong to the startup phase and are fatal
//! to the process that hits them.

use std::path::PathBuf;

use thiserror::Error;

use crate::mix::MixField;

/// Why a single mix field was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputIssue {
    #[error("value is missing")]
    Missing,
    #[error("value is not a finite number")]
    NonNumeric,
    #[error("value {value} is outside [{min}, {max}]")]
    OutOfBounds { value: f64, min: f64, max: f64 },
    #[error("value {value} does not match the derived value {expected}")]
    Inconsistent { value: f64, expected: f64 },
}

/// Failures of a single mix evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// A required mix field is missing, non-numeric or out of bounds.
    #[error("invalid input for `{field}`: {issue}")]
    InvalidInput { field: MixField, issue: InputIssue },

    /// The mix payload could not be read as an object of named fields.
    #[error("malformed mix payload: {0}")]
    MalformedInput(String),

    /// `total_co2 * total_cost` is zero, so the sustainability index is undefined.
    #[error("sustainability index undefined: total_co2 ({total_co2}) x total_cost ({total_cost}) is zero")]
    DegenerateRatio { total_co2: f64, total_cost: f64 },

    /// The predictor produced a strength below zero.
    #[error("predictor returned a negative strength of {strength} MPa")]
    NegativeStrength { strength: f64 },

    /// The predictor produced NaN or an infinity.
    #[error("predictor returned a non-finite strength ({strength})")]
    NonFinitePrediction { strength: f64 },
}

impl EvaluationError {
    pub fn invalid(field: MixField, issue: InputIssue) -> Self {
        EvaluationError::InvalidInput { field, issue }
    }
}

/// Failures of the nearest-lab-mix lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchmarkError {
    #[error("reference table has no rows")]
    EmptyTable,
    #[error("benchmark query strength {strength} is not finite")]
    InvalidQuery { strength: f64 },
}

/// Configuration values that cannot produce a meaningful evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bound for `{field}` is inverted or non-finite: [{min}, {max}]")]
    InvalidBound { field: MixField, min: f64, max: f64 },
    #[error("{table} factor `{material}` must be finite and non-negative, got {value}")]
    InvalidFactor {
        table: &'static str,
        material: &'static str,
        value: f64,
    },
    #[error("rank thresholds must be finite and strictly descending (A+ > A > B), got {a_plus} / {a} / {b}")]
    InvalidRankThresholds { a_plus: f64, a: f64, b: f64 },
    #[error("benchmark_k must be at least 1")]
    ZeroBenchmarkK,
}

/// Structural problems in a fitted regressor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("tree has no nodes")]
    EmptyTree,
    #[error("node arrays differ in length (children_left has {expected} entries, {array} has {found})")]
    RaggedArrays {
        array: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("node {node} has only one child")]
    OneSidedNode { node: usize },
    #[error("leaf {node} has a non-finite value")]
    NonFiniteLeaf { node: usize },
    #[error("node {node} has out-of-order child {child}")]
    OutOfOrderChild { node: usize, child: i64 },
    #[error("node {node} splits on unknown feature {feature}")]
    UnknownFeature { node: usize, feature: i64 },
    #[error("node {node} has a NaN threshold")]
    NanThreshold { node: usize },
    #[error("tree ensemble has no trees")]
    EmptyEnsemble,
}

/// Startup failures: reading model artifacts, the reference table or config.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what} JSON: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {what} artifact: {reason}")]
    InvalidArtifact { what: &'static str, reason: String },

    #[error("failed to read reference table: {0}")]
    Csv(#[from] csv::Error),

    #[error("reference table is missing column `{column}` (found: {found:?})")]
    MissingColumn { column: &'static str, found: Vec<String> },

    #[error("reference table row {row}: {reason}")]
    InvalidRecord { row: u64, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = EvaluationError> = std::result::Result<T, E>;
