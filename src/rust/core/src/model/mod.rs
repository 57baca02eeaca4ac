// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Predictor / Scaler seam
//
// This file is part of SmartMix.
// For licensing terms, see the LICENSE file in the project root.

//! Model traits for the strength prediction step
//!
//! The trained regressor and its feature scaler are opaque numeric
//! transforms. The evaluator only sees these two traits, so any model
//! family (or a closure in tests) can be plugged in.
//!
//! Architecture:
//! ```text
//! MixDesign::features() --> Scaler::transform --> Predictor::predict --> MPa
//!                              ^                       ^
//!                              |                       |
//!                       StandardScaler      LinearRegressor / TreeEnsembleRegressor
//! ```

pub mod artifact;
pub mod regressor;
pub mod scaler;

pub use artifact::{load_predictor, load_scaler, ModelArtifact, ScalerArtifact};
pub use regressor::{Aggregation, LinearRegressor, RegressionTree, TreeEnsembleRegressor};
pub use scaler::{IdentityScaler, StandardScaler};

use crate::mix::FeatureVector;

/// Normalises a raw feature vector to the model's training distribution.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &FeatureVector) -> FeatureVector;
}

/// Maps a scaled feature vector to a 28-day compressive strength (MPa).
pub trait Predictor: Send + Sync {
    fn predict(&self, scaled: &FeatureVector) -> f64;
}

impl<F> Scaler for F
where
    F: Fn(&FeatureVector) -> FeatureVector + Send + Sync,
{
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        self(features)
    }
}

impl<F> Predictor for F
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    fn predict(&self, scaled: &FeatureVector) -> f64 {
        self(scaled)
    }
}
