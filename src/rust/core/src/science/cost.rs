// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use crate::config::MaterialFactors;
use crate::mix::MixDesign;

pub struct CostEngine;

impl CostEngine {
    /// Material cost of one cubic metre of the mix (currency units / m³).
    ///
    /// Water is free and recycled aggregate replacement is not priced.
    pub fn compute(mix: &MixDesign, unit_costs: &MaterialFactors) -> f64 {
        mix.cement * unit_costs.cement
            + mix.silica_fume * unit_costs.silica_fume
            + mix.fly_ash * unit_costs.fly_ash
            + mix.natural_coarse_aggregate * unit_costs.coarse_aggregate
            + mix.natural_fine_aggregate * unit_costs.fine_aggregate
            + mix.superplasticizer * unit_costs.superplasticizer
            + mix.nylon_fiber * unit_costs.nylon_fiber
    }
}
