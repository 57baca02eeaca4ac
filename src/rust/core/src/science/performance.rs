// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

use crate::mix::MixDesign;
use crate::science::sustainability::EnvironmentalMetrics;

/// Strength at which the strength axis saturates (MPa).
pub const STRENGTH_REFERENCE_MPA: f64 = 100.0;
/// CO2 at which the eco axis reaches zero (kg/m3).
pub const CO2_REFERENCE_KG: f64 = 600.0;
/// Cost at which the economy axis reaches zero (currency/m3).
pub const COST_REFERENCE: f64 = 100.0;

/// Normalised radar axes, each in [0, 1] with 1 the best.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub strength: f64,
    pub eco: f64,
    pub economy: f64,
    /// Falls with recycled coarse aggregate replacement.
    pub durability: f64,
}

impl PerformanceProfile {
    pub fn compute(strength: f64, metrics: &EnvironmentalMetrics, mix: &MixDesign) -> Self {
        PerformanceProfile {
            strength: (strength / STRENGTH_REFERENCE_MPA).clamp(0.0, 1.0),
            eco: ((CO2_REFERENCE_KG - metrics.total_co2) / CO2_REFERENCE_KG).clamp(0.0, 1.0),
            economy: ((COST_REFERENCE - metrics.total_cost) / COST_REFERENCE).clamp(0.0, 1.0),
            durability: ((100.0 - mix.rca_replacement) / 100.0).clamp(0.0, 1.0),
        }
    }
}
