// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{AggregateAccounting, EvaluatorConfig, MaterialFactors, RankThresholds};
use crate::error::{EvaluationError, Result};
use crate::formulas;
use crate::mix::MixDesign;
use crate::science::cost::CostEngine;

/// CO2 attributed to one material line of the mix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentEmission {
    pub material: String,
    pub kg_co2: f64, // kg CO2 / m3
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMetrics {
    /// Ordered breakdown; `total_co2` is the sum of these values in this order.
    pub co2_by_component: Vec<ComponentEmission>,
    pub total_co2: f64,  // kg CO2 / m3
    pub total_cost: f64, // currency / m3
}

impl EnvironmentalMetrics {
    pub fn component(&self, material: &str) -> Option<f64> {
        self.co2_by_component
            .iter()
            .find(|c| c.material == material)
            .map(|c| c.kg_co2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rank::APlus => "A+",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
        })
    }
}

/// Colour band of the dashboard gauge (0-6 scale).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Low,      // [0, 2)
    Moderate, // [2, 4)
    High,     // [4, ..)
}

impl GaugeBand {
    pub fn for_index(index: f64) -> Self {
        if index >= 4.0 {
            GaugeBand::High
        } else if index >= 2.0 {
            GaugeBand::Moderate
        } else {
            GaugeBand::Low
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityScore {
    pub index: f64,
    pub rank: Rank,
    pub band: GaugeBand,
    /// False when the index denominator was zero and `index` is the 0.0 sentinel.
    pub defined: bool,
}

pub struct SustainabilityEngine;

impl SustainabilityEngine {
    /// CO2 breakdown of a mix from fixed per-kg emission factors.
    pub fn co2_breakdown(
        mix: &MixDesign,
        factors: &MaterialFactors,
        accounting: AggregateAccounting,
    ) -> Vec<ComponentEmission> {
        let line = |material: &str, kg_co2: f64| ComponentEmission {
            material: material.to_string(),
            kg_co2,
        };

        let coarse = mix.natural_coarse_aggregate * factors.coarse_aggregate;
        let fine = mix.natural_fine_aggregate * factors.fine_aggregate;
        let sp = mix.superplasticizer * factors.superplasticizer;
        let fiber = mix.nylon_fiber * factors.nylon_fiber;

        let mut lines = vec![
            line("Cement", mix.cement * factors.cement),
            line("Silica Fume", mix.silica_fume * factors.silica_fume),
            line("Fly Ash", mix.fly_ash * factors.fly_ash),
        ];
        match accounting {
            AggregateAccounting::Combined => {
                lines.push(line("Aggregates", coarse + fine));
                lines.push(line("Additives", sp + fiber));
            }
            AggregateAccounting::Itemized => {
                lines.push(line("Natural Coarse Aggregate", coarse));
                lines.push(line("Natural Fine Aggregate", fine));
                lines.push(line("Superplasticizer", sp));
                lines.push(line("Nylon Fiber", fiber));
            }
        }
        lines
    }

    /// LCA and cost metrics from the raw (unscaled) mix.
    pub fn compute_metrics(mix: &MixDesign, config: &EvaluatorConfig) -> EnvironmentalMetrics {
        let co2_by_component =
            Self::co2_breakdown(mix, &config.emission_factors, config.aggregate_accounting);
        let total_co2 = co2_by_component.iter().map(|c| c.kg_co2).sum();
        EnvironmentalMetrics {
            co2_by_component,
            total_co2,
            total_cost: CostEngine::compute(mix, &config.unit_costs),
        }
    }

    /// Threshold ladder, strict `>` at every step.
    pub fn classify(index: f64, thresholds: &RankThresholds) -> Rank {
        if index > thresholds.a_plus {
            Rank::APlus
        } else if index > thresholds.a {
            Rank::A
        } else if index > thresholds.b {
            Rank::B
        } else {
            Rank::C
        }
    }

    /// Score a mix. Propagates `DegenerateRatio`.
    pub fn score(
        strength: f64,
        metrics: &EnvironmentalMetrics,
        thresholds: &RankThresholds,
    ) -> Result<SustainabilityScore> {
        let index = formulas::sustainability_index(strength, metrics.total_co2, metrics.total_cost)?;
        Ok(SustainabilityScore {
            index,
            rank: Self::classify(index, thresholds),
            band: GaugeBand::for_index(index),
            defined: true,
        })
    }

    /// Score a mix, replacing an undefined index with the 0.0 sentinel.
    ///
    /// Returns the recovered error alongside so the caller can report it.
    pub fn score_or_sentinel(
        strength: f64,
        metrics: &EnvironmentalMetrics,
        thresholds: &RankThresholds,
    ) -> (SustainabilityScore, Option<EvaluationError>) {
        match Self::score(strength, metrics, thresholds) {
            Ok(score) => (score, None),
            Err(err) => {
                warn!(%err, "sustainability index undefined, reporting sentinel");
                let sentinel = SustainabilityScore {
                    index: 0.0,
                    rank: Self::classify(0.0, thresholds),
                    band: GaugeBand::Low,
                    defined: false,
                };
                (sentinel, Some(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::science::test_support::reference_mix;

    #[test]
    fn test_reference_mix_co2() {
        // 350*0.85 + 1100*0.005 + 700*0.005 + 2.0*0.7 = 297.5 + 5.5 + 3.5 + 1.4
        let metrics = SustainabilityEngine::compute_metrics(&reference_mix(), &EvaluatorConfig::default());
        assert!((metrics.total_co2 - 307.9).abs() < 1e-9, "got {}", metrics.total_co2);
        assert!((metrics.component("Aggregates").unwrap() - 9.0).abs() < 1e-12);
        assert!((metrics.component("Additives").unwrap() - 1.4).abs() < 1e-12);
        assert_eq!(metrics.component("Silica Fume"), Some(0.0));
    }

    #[test]
    fn test_total_is_exact_sum_of_breakdown() {
        let mut mix = reference_mix();
        mix.silica_fume = 37.3;
        mix.fly_ash = 91.7;
        mix.nylon_fiber = 1.3;
        for accounting in [AggregateAccounting::Combined, AggregateAccounting::Itemized] {
            let config = EvaluatorConfig {
                aggregate_accounting: accounting,
                ..EvaluatorConfig::default()
            };
            let metrics = SustainabilityEngine::compute_metrics(&mix, &config);
            let sum: f64 = metrics.co2_by_component.iter().map(|c| c.kg_co2).sum();
            assert_eq!(metrics.total_co2, sum);
        }
    }

    #[test]
    fn test_itemized_breakdown_labels() {
        let lines = SustainabilityEngine::co2_breakdown(
            &reference_mix(),
            &MaterialFactors::default_emissions(),
            AggregateAccounting::Itemized,
        );
        let labels: Vec<&str> = lines.iter().map(|l| l.material.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Cement",
                "Silica Fume",
                "Fly Ash",
                "Natural Coarse Aggregate",
                "Natural Fine Aggregate",
                "Superplasticizer",
                "Nylon Fiber"
            ]
        );
        assert!((lines[3].kg_co2 - 5.5).abs() < 1e-12);
        assert!((lines[4].kg_co2 - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_rank_ladder_boundaries() {
        let t = RankThresholds::default();
        assert_eq!(SustainabilityEngine::classify(4.5, &t), Rank::A);
        assert_eq!(SustainabilityEngine::classify(4.500001, &t), Rank::APlus);
        assert_eq!(SustainabilityEngine::classify(3.5, &t), Rank::B);
        assert_eq!(SustainabilityEngine::classify(3.6, &t), Rank::A);
        assert_eq!(SustainabilityEngine::classify(2.0, &t), Rank::C);
        assert_eq!(SustainabilityEngine::classify(2.1, &t), Rank::B);
        assert_eq!(SustainabilityEngine::classify(0.0, &t), Rank::C);
    }

    #[test]
    fn test_rank_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Rank::APlus).unwrap(), "\"A+\"");
        assert_eq!(Rank::APlus.to_string(), "A+");
    }

    #[test]
    fn test_gauge_bands() {
        assert_eq!(GaugeBand::for_index(1.99), GaugeBand::Low);
        assert_eq!(GaugeBand::for_index(2.0), GaugeBand::Moderate);
        assert_eq!(GaugeBand::for_index(4.0), GaugeBand::High);
        assert_eq!(GaugeBand::for_index(7.5), GaugeBand::High);
    }

    #[test]
    fn test_score_reference_mix() {
        let metrics = SustainabilityEngine::compute_metrics(&reference_mix(), &EvaluatorConfig::default());
        let score = SustainabilityEngine::score(40.0, &metrics, &RankThresholds::default()).unwrap();
        assert!((score.index - 2.0654).abs() < 1e-3);
        assert_eq!(score.rank, Rank::B);
        assert!(score.defined);
    }

    #[test]
    fn test_zero_emission_mix_gets_sentinel() {
        let metrics = EnvironmentalMetrics {
            co2_by_component: vec![],
            total_co2: 0.0,
            total_cost: 10.0,
        };
        let (score, err) =
            SustainabilityEngine::score_or_sentinel(40.0, &metrics, &RankThresholds::default());
        assert_eq!(score.index, 0.0);
        assert_eq!(score.rank, Rank::C);
        assert!(!score.defined);
        assert!(matches!(err, Some(EvaluationError::DegenerateRatio { .. })));
    }
}
