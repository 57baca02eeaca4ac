// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto

//! SmartMix pipeline tests
//!
//! End-to-end checks from raw JSON artifacts and mix payloads to the report.

use crate::mix_kernel::{AssetPaths, MixKernel, Severity};
use crate::science::sustainability::Rank;
use serde_json::json;
use std::io::Write;

/// Standardises on the reference mix, then a linear model in scaled units:
/// strength = 40 + 4·z_cement − 6·z_wc.
fn artifacts() -> (String, String) {
    let mut scale = vec![1.0; 11];
    scale[0] = 50.0; // cement
    scale[9] = 0.05; // w/c
    let scaler = json!({
        "mean": [350.0, 157.5, 1100.0, 700.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.45, 2.0],
        "scale": scale,
    });
    let mut coefficients = vec![0.0; 11];
    coefficients[0] = 4.0;
    coefficients[9] = -6.0;
    let model = json!({"kind": "linear", "coefficients": coefficients, "intercept": 40.0});
    (scaler.to_string(), model.to_string())
}

const TABLE: &str = "Mix_ID ; CS_28 ; Sustainability ; CO2\n\
                     M-10;10;C;410\n\
                     M-20;20;C;380\n\
                     M-30;30;B;330\n\
                     M-40;40;B;305\n\
                     M-50;50;A;290\n";

fn kernel() -> MixKernel {
    let (scaler, model) = artifacts();
    MixKernel::from_artifacts(&scaler, &model, TABLE, None).unwrap()
}

fn reference_mix() -> serde_json::Value {
    json!({
        "cement": 350.0, "sf": 0.0, "fa": 0.0, "wc": 0.45,
        "nca": 1100.0, "nfa": 700.0, "rca_p": 0.0, "mrca_p": 0.0,
        "sp": 2.0, "fiber": 0.0
    })
}

#[test]
fn test_reference_mix_end_to_end() {
    let report = kernel().assess_json(&reference_mix().to_string()).unwrap();

    assert!((report.prediction.strength - 40.0).abs() < 1e-9);
    assert!((report.environment.total_co2 - 307.9).abs() < 1e-9);
    assert!((report.environment.total_cost - 62.9).abs() < 1e-9);
    assert!((report.mechanics.split_tensile_mpa - 3.479).abs() < 1e-3);
    assert!((report.mechanics.elastic_modulus_gpa - 29.72).abs() < 1e-2);

    // 40 / (307.9 * 62.9) * 1000 ≈ 2.065 → B
    assert_eq!(report.sustainability.rank, Rank::B);

    let ids: Vec<&str> = report.benchmark.iter().map(|b| b.record.mix_id.as_str()).collect();
    assert_eq!(ids, vec!["M-40", "M-30", "M-50"]);
    assert_eq!(report.benchmark[0].distance, 0.0);
    assert!(report.events.is_empty());
}

#[test]
fn test_benchmark_example_from_lab_table() {
    // Drive the model to 32 MPa: z_cement = -2 → cement 250, w/c unchanged.
    let mut mix = reference_mix();
    mix["cement"] = json!(250.0);
    let report = kernel().assess_json(&mix.to_string()).unwrap();
    assert!((report.prediction.strength - 32.0).abs() < 1e-9);
    let strengths: Vec<f64> = report
        .benchmark
        .iter()
        .map(|b| b.record.measured_strength)
        .collect();
    assert_eq!(strengths, vec![30.0, 40.0, 20.0]);
}

#[test]
fn test_wetter_mix_is_weaker() {
    let mut mix = reference_mix();
    mix["wc"] = json!(0.60);
    let report = kernel().assess_json(&mix.to_string()).unwrap();
    // 40 − 6·3 = 22 MPa, above the 20 MPa warning line
    assert!((report.prediction.strength - 22.0).abs() < 1e-9);
    assert!((report.prediction.provenance.water - 0.60 * 350.0).abs() < 1e-9);
    assert!(report.events.is_empty());
}

#[test]
fn test_out_of_range_wc_rejected_as_json_error() {
    let mut mix = reference_mix();
    mix["wc"] = json!(0.9);
    let err = kernel().assess_json(&mix.to_string()).unwrap_err();
    assert!(err.to_string().contains("wc_ratio"), "{}", err);
}

#[test]
fn test_direct_water_mode_from_config() {
    let (scaler, model) = artifacts();
    let config = json!({"water_mode": "direct"}).to_string();
    let kernel = MixKernel::from_artifacts(&scaler, &model, TABLE, Some(&config)).unwrap();

    let missing = kernel.assess_json(&reference_mix().to_string());
    assert!(missing.is_err());

    let mut mix = reference_mix();
    mix["water"] = json!(170.0);
    let report = kernel.assess_json(&mix.to_string()).unwrap();
    assert_eq!(report.prediction.provenance.water, 170.0);
}

#[test]
fn test_ignored_water_warns() {
    let mut mix = reference_mix();
    mix["water"] = json!(400.0);
    let report = kernel().assess_json(&mix.to_string()).unwrap();
    assert_eq!(report.events.len(), 1);
    assert_eq!(report.events[0].severity, Severity::Warning);
    assert!((report.prediction.provenance.water - 157.5).abs() < 1e-9);
}

#[test]
fn test_report_json_shape() {
    let report = kernel().assess_json(&reference_mix().to_string()).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["sustainability"]["rank"], "B");
    assert_eq!(value["sustainability"]["band"], "moderate");
    assert_eq!(value["environment"]["co2_by_component"][0]["material"], "Cement");
    assert_eq!(value["benchmark"][0]["mix_id"], "M-40");
    assert!(value["performance"]["eco"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_same_input_same_report() {
    let kernel = kernel();
    let a = kernel.assess_json(&reference_mix().to_string()).unwrap();
    let b = kernel.assess_json(&reference_mix().to_string()).unwrap();
    assert_eq!(a.prediction, b.prediction);
    assert_eq!(a.environment, b.environment);
    assert_eq!(a.sustainability, b.sustainability);
    assert_eq!(a.benchmark, b.benchmark);
    assert_eq!(a.fingerprint, b.fingerprint);
}

#[test]
fn test_load_from_files() {
    let (scaler, model) = artifacts();
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, body: &str| {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    };
    let paths = AssetPaths {
        scaler: write("scaler.json", &scaler),
        model: write("model.json", &model),
        table: write("lab_mixes.csv", TABLE),
        config: Some(write("config.json", r#"{"benchmark_k": 2}"#)),
    };
    let kernel = MixKernel::load(&paths).unwrap();
    assert_eq!(kernel.config().benchmark_k, 2);
    let report = kernel.assess_json(&reference_mix().to_string()).unwrap();
    assert_eq!(report.benchmark.len(), 2);
}

#[test]
fn test_load_reports_bad_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let scaler = dir.path().join("scaler.json");
    std::fs::write(&scaler, r#"{"mean": [0.0], "scale": [1.0]}"#).unwrap();
    let paths = AssetPaths {
        scaler,
        model: dir.path().join("model.json"),
        table: dir.path().join("lab.csv"),
        config: None,
    };
    let err = MixKernel::load(&paths).unwrap_err();
    assert!(err.to_string().contains("scaler"), "{}", err);
}
