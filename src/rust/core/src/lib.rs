// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Concrete mix evaluation core
// Strength prediction, mechanical estimates, LCA / cost, sustainability rank
// and lab benchmark for one mix design.
//

pub mod config;
pub mod error;
pub mod evaluator;
pub mod formulas;
pub mod mix;
pub mod mix_kernel;
pub mod model;
pub mod reference;
pub mod science;
#[cfg(test)]
pub mod tests_pipeline;

// Re-export core types
pub use config::{AggregateAccounting, EvaluatorConfig, WaterMode};
pub use error::{BenchmarkError, ConfigError, EvaluationError, LoadError};
pub use evaluator::{evaluate, predict_strength, Evaluation, PredictionResult};
pub use mix::{MixDesign, MixField, MixInput};
pub use mix_kernel::{AssetPaths, MixKernel, MixReport, Severity, ValidationEvent, WasmMixKernel};
pub use model::{Predictor, Scaler};
pub use reference::{ReferenceMix, ReferenceMixTable};
pub use science::benchmark::{benchmark, BenchmarkResult};
pub use science::sustainability::{Rank, SustainabilityScore};
