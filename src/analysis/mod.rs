//! Analysis orchestrator: wires datasets, scaling, estimation, forecasting
//! and metrics into a single `analyze` call.

use crate::core::{Axis, MotionDataset};
use crate::error::{AnalysisError, Result};
use crate::forecast::static_forecast;
use crate::model::{Method, Sarimax};
use crate::transform::StandardScaler;
use crate::utils::metrics::{forecast_accuracy, ForecastAccuracy};
use log::{debug, info};
use serde::{Deserialize, Serialize};

const DEFAULT_LAGS: usize = 2;

fn default_lags() -> usize {
    DEFAULT_LAGS
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Joint whose rotation is explained by the other channels.
    pub target_joint: String,
    pub target_axis: Axis,
    /// Autoregressive lag order.
    #[serde(default = "default_lags")]
    pub lags: usize,
    #[serde(default)]
    pub method: Method,
}

impl AnalysisConfig {
    pub fn new(target_joint: impl Into<String>, target_axis: Axis) -> Self {
        Self {
            target_joint: target_joint.into(),
            target_axis,
            lags: DEFAULT_LAGS,
            method: Method::default(),
        }
    }

    pub fn with_lags(mut self, lags: usize) -> Self {
        self.lags = lags;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Significance marker for a p-value, R-style.
pub fn significance_marker(p_value: f64) -> &'static str {
    if p_value < 0.001 {
        "***"
    } else if p_value < 0.01 {
        "**"
    } else if p_value < 0.05 {
        "*"
    } else if p_value < 0.1 {
        "."
    } else {
        ""
    }
}

/// One row of the coefficient table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSummary {
    pub variable: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_stat: f64,
    pub p_value: f64,
    pub significance: String,
}

/// Model-level fit statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatistics {
    pub r_squared: f64,
    pub mse: f64,
    pub aic: f64,
    pub bic: f64,
    pub regularization_applied: bool,
    pub stability_corrected: bool,
}

/// Coefficient table plus fit statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub variables: Vec<VariableSummary>,
    pub statistics: ModelStatistics,
}

/// Full result of a successful analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub target_joint: String,
    pub target_axis: Axis,
    pub method: Method,
    pub lags: usize,
    pub metrics: ForecastAccuracy,
    pub model_summary: ModelSummary,
    /// Original-scale predictions and ground truth over the test data.
    pub predictions: Vec<f64>,
    pub actual: Vec<f64>,
    /// Test frame indices the predictions correspond to.
    pub frames: Vec<usize>,
    pub confidence_upper: Vec<f64>,
    pub confidence_lower: Vec<f64>,
    pub confidence_level: f64,
}

/// Outcome wrapper: `analyze` reports failures as data, it never panics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub success: bool,
    pub results: Option<AnalysisResult>,
    pub error: Option<String>,
}

impl AnalysisOutcome {
    fn ok(results: AnalysisResult) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
        }
    }

    fn err(error: AnalysisError) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.to_string()),
        }
    }
}

/// Causal-influence analyzer over motion datasets.
///
/// Holds a training and a test dataset (which may be the same recording) and
/// runs independent analyses against them. Each `analyze` call is
/// self-contained; a new call supersedes the previous result.
#[derive(Debug, Default)]
pub struct SarimaxAnalyzer {
    train: Option<MotionDataset>,
    test: Option<MotionDataset>,
}

impl SarimaxAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the training and test datasets for subsequent analyses.
    pub fn set_data(&mut self, train: MotionDataset, test: MotionDataset) {
        self.train = Some(train);
        self.test = Some(test);
    }

    pub fn has_data(&self) -> bool {
        self.train.is_some() && self.test.is_some()
    }

    /// Run an analysis, reporting failures in the outcome value.
    pub fn analyze(&self, config: &AnalysisConfig) -> AnalysisOutcome {
        self.analyze_with_progress(config, |_, _| {})
    }

    /// Run an analysis with a progress callback.
    ///
    /// The callback receives milestone percentages (20/40/60/80/90/100) with
    /// a stage description. It is purely observational and cannot affect the
    /// run.
    pub fn analyze_with_progress(
        &self,
        config: &AnalysisConfig,
        mut progress: impl FnMut(u8, &str),
    ) -> AnalysisOutcome {
        match self.run(config, &mut progress) {
            Ok(results) => AnalysisOutcome::ok(results),
            Err(err) => {
                info!("analysis failed: {err}");
                AnalysisOutcome::err(err)
            }
        }
    }

    fn run(
        &self,
        config: &AnalysisConfig,
        progress: &mut dyn FnMut(u8, &str),
    ) -> Result<AnalysisResult> {
        let train = self
            .train
            .as_ref()
            .ok_or_else(|| AnalysisError::InvalidData("no datasets loaded".to_string()))?;
        let test = self
            .test
            .as_ref()
            .ok_or_else(|| AnalysisError::InvalidData("no datasets loaded".to_string()))?;

        if train.channels() != test.channels() {
            return Err(AnalysisError::InvalidData(
                "train and test datasets have different channel lists".to_string(),
            ));
        }
        if train.frame_count() == 0 || test.frame_count() == 0 {
            return Err(AnalysisError::EmptyData);
        }

        let target_channel =
            MotionDataset::rotation_channel(&config.target_joint, config.target_axis);
        let target_idx = train
            .channel_index(&target_channel)
            .ok_or_else(|| AnalysisError::ChannelNotFound(target_channel.clone()))?;
        debug!(
            "analyzing '{target_channel}' ({} train frames, {} test frames, lags={}, method={})",
            train.frame_count(),
            test.frame_count(),
            config.lags,
            config.method
        );
        progress(20, "Resolved target channel and validated datasets");

        // All channels except the target act as exogenous regressors, in
        // dataset order.
        let exog_channels: Vec<&String> = train
            .channels()
            .iter()
            .filter(|c| c.as_str() != target_channel)
            .collect();

        let train_endog = train.column_at(target_idx);
        let test_endog = test.column_at(target_idx);
        let train_exog_rows = extract_rows(train, &exog_channels)?;
        let test_exog_rows = extract_rows(test, &exog_channels)?;

        // Scalers are fitted on training data only; the test split is
        // transformed with the training statistics.
        let mut endog_scaler = StandardScaler::new();
        let train_endog_std = endog_scaler.fit_transform_series(&train_endog)?;
        let test_endog_std = endog_scaler.transform_series(&test_endog)?;

        let mut exog_scaler = StandardScaler::new();
        let (train_exog_std, test_exog_std) = if exog_channels.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let train_std = exog_scaler.fit_transform(&train_exog_rows)?;
            let test_std = exog_scaler.transform(&test_exog_rows)?;
            (train_std, test_std)
        };
        progress(40, "Standardized endogenous and exogenous channels");

        let exog_columns = transpose(&train_exog_std, exog_channels.len());
        let mut model = Sarimax::new(train_endog_std, exog_columns, config.lags, config.method)?;
        let summary = model.fit()?.clone();
        progress(60, "Fitted lagged regression model");

        // Test matrix layout: standardized endogenous channel in column 0,
        // exogenous channels after it.
        let test_matrix: Vec<Vec<f64>> = test_endog_std
            .iter()
            .enumerate()
            .map(|(t, &e)| {
                let mut row = Vec::with_capacity(1 + exog_channels.len());
                row.push(e);
                if !exog_channels.is_empty() {
                    row.extend_from_slice(&test_exog_std[t]);
                }
                row
            })
            .collect();
        let exog_indices: Vec<usize> = (1..=exog_channels.len()).collect();
        let forecast = static_forecast(&model, &test_matrix, 0, &exog_indices, &endog_scaler)?;
        progress(80, "Completed static one-step forecasting");

        let metrics = forecast_accuracy(&forecast.actual, &forecast.predictions)?;
        progress(90, "Computed accuracy metrics");

        let mut variable_names: Vec<String> =
            exog_channels.iter().map(|c| c.to_string()).collect();
        for lag in 1..=config.lags {
            variable_names.push(format!("AR({lag})"));
        }
        let variables: Vec<VariableSummary> = variable_names
            .into_iter()
            .enumerate()
            .map(|(i, variable)| VariableSummary {
                variable,
                coefficient: summary.coefficients[i],
                std_error: summary.std_errors[i],
                t_stat: summary.t_stats[i],
                p_value: summary.p_values[i],
                significance: significance_marker(summary.p_values[i]).to_string(),
            })
            .collect();

        let result = AnalysisResult {
            target_joint: config.target_joint.clone(),
            target_axis: config.target_axis,
            method: config.method,
            lags: config.lags,
            metrics,
            model_summary: ModelSummary {
                variables,
                statistics: ModelStatistics {
                    r_squared: summary.r_squared,
                    mse: summary.mse,
                    aic: summary.aic,
                    bic: summary.bic,
                    regularization_applied: summary.regularization_applied,
                    stability_corrected: summary.stability_corrected,
                },
            },
            predictions: forecast.predictions,
            actual: forecast.actual,
            frames: forecast.frame_indices,
            confidence_upper: forecast.confidence.upper,
            confidence_lower: forecast.confidence.lower,
            confidence_level: forecast.confidence.level,
        };
        progress(100, "Analysis complete");
        Ok(result)
    }
}

/// Per-frame rows restricted to the given channels, in the given order.
fn extract_rows(dataset: &MotionDataset, channels: &[&String]) -> Result<Vec<Vec<f64>>> {
    let indices: Vec<usize> = channels
        .iter()
        .map(|c| {
            dataset
                .channel_index(c)
                .ok_or_else(|| AnalysisError::ChannelNotFound(c.to_string()))
        })
        .collect::<Result<_>>()?;
    Ok(dataset
        .frames()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i]).collect())
        .collect())
}

/// Rows-of-features to one vector per feature column.
fn transpose(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    (0..width)
        .map(|j| rows.iter().map(|row| row[j]).collect())
        .collect()
}
