// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use serde::Serialize;

use super::Scaler;
use crate::mix::{FeatureVector, FEATURE_COUNT};

/// Standardisation fitted on the training set: `(x - mean) / scale`.
///
/// A zero scale (constant training column) is treated as 1.0, matching how
/// the training pipeline handles it, so the column is only centred.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandardScaler {
    mean: FeatureVector,
    scale: FeatureVector,
}

impl StandardScaler {
    pub fn new(mean: FeatureVector, scale: FeatureVector) -> Self {
        let scale = scale.map(|s| if s == 0.0 { 1.0 } else { s });
        StandardScaler { mean, scale }
    }

    pub fn mean(&self) -> &FeatureVector {
        &self.mean
    }

    pub fn scale(&self) -> &FeatureVector {
        &self.scale
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for j in 0..FEATURE_COUNT {
            out[j] = (features[j] - self.mean[j]) / self.scale[j];
        }
        out
    }
}

/// Pass-through scaler for models trained on raw features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        *features
    }
}
