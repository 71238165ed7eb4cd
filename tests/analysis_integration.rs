//! End-to-end tests for the full analysis pipeline: dataset construction,
//! standardization, fitting, static forecasting, metrics and serialization.

use kinelag::prelude::*;

/// Dataset where the hip rotation is a lagged linear mix of knee and ankle
/// rotation plus its own history. `phase` shifts the driving signals so a
/// train/test split sees different values from the same process.
fn gait_dataset(name: &str, n: usize, phase: f64) -> MotionDataset {
    let channels = vec![
        "Hips_Xrotation".to_string(),
        "Knee_Xrotation".to_string(),
        "Ankle_Xrotation".to_string(),
    ];
    let knee: Vec<f64> = (0..n)
        .map(|i| (i as f64 * 0.35 + phase).sin() * 40.0)
        .collect();
    let ankle: Vec<f64> = (0..n)
        .map(|i| (i as f64 * 0.6 + phase).cos() * 20.0)
        .collect();
    let mut hips = vec![2.0, 2.5];
    for t in 2..n {
        hips.push(0.5 * hips[t - 1] + 0.1 * hips[t - 2] + 0.15 * knee[t] - 0.08 * ankle[t]);
    }
    let frames: Vec<Vec<f64>> = (0..n).map(|t| vec![hips[t], knee[t], ankle[t]]).collect();
    MotionDataset::new(name, channels, frames, 1.0 / 60.0).unwrap()
}

fn gait_analyzer() -> SarimaxAnalyzer {
    let mut analyzer = SarimaxAnalyzer::new();
    analyzer.set_data(
        gait_dataset("walk_train", 150, 0.0),
        gait_dataset("walk_test", 90, 0.7),
    );
    analyzer
}

#[test]
fn ols_analysis_end_to_end() {
    let analyzer = gait_analyzer();
    let config = AnalysisConfig::new("Hips", Axis::X);
    let outcome = analyzer.analyze(&config);

    assert!(outcome.success, "error: {:?}", outcome.error);
    let results = outcome.results.unwrap();

    assert_eq!(results.target_joint, "Hips");
    assert_eq!(results.target_axis, Axis::X);
    assert_eq!(results.lags, 2);

    let vars = &results.model_summary.variables;
    assert_eq!(vars.len(), 4);
    assert_eq!(vars[0].variable, "Knee_Xrotation");
    assert_eq!(vars[1].variable, "Ankle_Xrotation");
    assert_eq!(vars[2].variable, "AR(1)");
    assert_eq!(vars[3].variable, "AR(2)");

    // Deterministic generating process: tight fit and forecasts.
    assert!(results.model_summary.statistics.r_squared > 0.99);
    assert!(results.metrics.correlation > 0.95);
    assert!(results.metrics.r2 > 0.9);
    assert!(results.metrics.utheil < 0.5);

    // 90 test frames minus 2 warm-up lags.
    assert_eq!(results.predictions.len(), 88);
    assert_eq!(results.actual.len(), 88);
    assert_eq!(results.frames.first(), Some(&2));
    assert_eq!(results.frames.last(), Some(&89));

    // Band encloses the predictions symmetrically.
    assert_eq!(results.confidence_level, 95.0);
    for ((u, l), p) in results
        .confidence_upper
        .iter()
        .zip(results.confidence_lower.iter())
        .zip(results.predictions.iter())
    {
        assert!(l <= p && p <= u);
    }
}

#[test]
fn all_methods_complete_on_the_same_data() {
    let analyzer = gait_analyzer();
    for method in [Method::Ols, Method::Ridge, Method::Mle] {
        let config = AnalysisConfig::new("Hips", Axis::X).with_method(method);
        let outcome = analyzer.analyze(&config);
        assert!(outcome.success, "{method} failed: {:?}", outcome.error);

        let results = outcome.results.unwrap();
        assert_eq!(results.method, method);
        assert!(results.metrics.correlation > 0.9, "{method}");
    }
}

#[test]
fn missing_channel_is_reported_not_thrown() {
    let analyzer = gait_analyzer();
    let config = AnalysisConfig::new("Spine", Axis::Z);
    let outcome = analyzer.analyze(&config);

    assert!(!outcome.success);
    assert!(outcome.results.is_none());
    let message = outcome.error.unwrap();
    assert!(message.contains("Spine_Zrotation"));
    assert!(message.contains("not found"));
}

#[test]
fn self_evaluation_on_a_linear_ramp() {
    // A ramp satisfies y(t) = 2y(t-1) - y(t-2) exactly. The constant channel
    // standardizes to zeros, forcing the singular-matrix fallback, and the
    // near-unit-root AR sum triggers the stability correction. Both must be
    // visible on the statistics block while forecasts stay near-perfect.
    let channels = vec!["Root_Xrotation".to_string(), "Flat_Xrotation".to_string()];
    let frames: Vec<Vec<f64>> = (0..60).map(|t| vec![t as f64, 1.0]).collect();
    let dataset = MotionDataset::new("ramp", channels, frames, 1.0 / 30.0).unwrap();

    let mut analyzer = SarimaxAnalyzer::new();
    analyzer.set_data(dataset.clone(), dataset);

    let outcome = analyzer.analyze(&AnalysisConfig::new("Root", Axis::X));
    assert!(outcome.success, "error: {:?}", outcome.error);
    let results = outcome.results.unwrap();

    let stats = &results.model_summary.statistics;
    assert!(stats.regularization_applied);
    assert!(stats.stability_corrected);
    assert!(stats.r_squared > 0.999);
    assert!(results.metrics.r2 > 0.99);
}

#[test]
fn axis_selects_the_matching_channel() {
    let channels = vec![
        "Hips_Xrotation".to_string(),
        "Hips_Yrotation".to_string(),
        "Hips_Zrotation".to_string(),
    ];
    let frames: Vec<Vec<f64>> = (0..80)
        .map(|t| {
            let x = (t as f64 * 0.3).sin() * 10.0;
            vec![x, 0.5 * x + 1.0, (t as f64 * 0.9).cos()]
        })
        .collect();
    let dataset = MotionDataset::new("axes", channels, frames, 1.0 / 60.0).unwrap();

    let mut analyzer = SarimaxAnalyzer::new();
    analyzer.set_data(dataset.clone(), dataset);

    let outcome = analyzer.analyze(&AnalysisConfig::new("Hips", Axis::Y));
    assert!(outcome.success, "error: {:?}", outcome.error);
    let results = outcome.results.unwrap();
    assert_eq!(results.target_axis, Axis::Y);
    assert_eq!(
        results.model_summary.variables[0].variable,
        "Hips_Xrotation"
    );
    assert_eq!(
        results.model_summary.variables[1].variable,
        "Hips_Zrotation"
    );
}

#[test]
fn result_serializes_with_presentation_field_names() {
    let analyzer = gait_analyzer();
    let outcome = analyzer.analyze(&AnalysisConfig::new("Hips", Axis::X));
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["success"], true);
    let results = &value["results"];
    assert!(results["targetJoint"].is_string());
    assert_eq!(results["method"], "ols");
    assert!(results["metrics"]["utheil"].is_number());
    assert!(results["metrics"]["rmse"].is_number());
    assert!(results["confidenceUpper"].is_array());
    assert!(results["confidenceLower"].is_array());
    assert!(results["confidenceLevel"].is_number());
    assert!(results["frames"].is_array());

    let summary = &results["modelSummary"];
    assert!(summary["statistics"]["rSquared"].is_number());
    assert!(summary["statistics"]["aic"].is_number());
    assert!(summary["statistics"]["regularizationApplied"].is_boolean());
    assert!(summary["statistics"]["stabilityCorrected"].is_boolean());

    let first_var = &summary["variables"][0];
    assert!(first_var["variable"].is_string());
    assert!(first_var["coefficient"].is_number());
    assert!(first_var["stdError"].is_number());
    assert!(first_var["tStat"].is_number());
    assert!(first_var["pValue"].is_number());
    assert!(first_var["significance"].is_string());
}

#[test]
fn config_can_be_driven_from_json() {
    let analyzer = gait_analyzer();
    let config: AnalysisConfig = serde_json::from_str(
        r#"{"targetJoint":"Hips","targetAxis":"X","lags":3,"method":"ridge"}"#,
    )
    .unwrap();

    let outcome = analyzer.analyze(&config);
    assert!(outcome.success, "error: {:?}", outcome.error);
    let results = outcome.results.unwrap();
    assert_eq!(results.lags, 3);
    assert_eq!(results.method, Method::Ridge);
    // 2 exog + 3 AR terms
    assert_eq!(results.model_summary.variables.len(), 5);
}

#[test]
fn forecast_api_composes_with_manual_scaling() {
    // Drive the lower-level pieces directly, the way the analyzer does, and
    // check the forecast lines up with the ground truth series.
    let n = 100;
    let exog: Vec<f64> = (0..n).map(|i| (i as f64 * 0.25).sin()).collect();
    let mut endog = vec![0.0];
    for t in 1..n {
        endog.push(0.6 * endog[t - 1] + 0.5 * exog[t]);
    }

    let mut endog_scaler = StandardScaler::new();
    let endog_std = endog_scaler.fit_transform_series(&endog).unwrap();
    let mut exog_scaler = StandardScaler::new();
    let exog_std = exog_scaler.fit_transform_series(&exog).unwrap();

    let mut model = Sarimax::new(endog_std.clone(), vec![exog_std.clone()], 1, Method::Ols).unwrap();
    model.fit().unwrap();

    let matrix: Vec<Vec<f64>> = endog_std
        .iter()
        .zip(exog_std.iter())
        .map(|(&e, &x)| vec![e, x])
        .collect();
    let forecast = static_forecast(&model, &matrix, 0, &[1], &endog_scaler).unwrap();

    assert_eq!(forecast.predictions.len(), n - 1);
    let accuracy = forecast_accuracy(&forecast.actual, &forecast.predictions).unwrap();
    assert!(accuracy.r2 > 0.99);
    assert!(accuracy.rmse < 0.05);
}
