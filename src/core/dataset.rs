//! MotionDataset: a named collection of per-frame channel series.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Rotation axis of a joint channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown rotation axis '{other}'"
            ))),
        }
    }
}

/// A named set of motion channels sharing a frame count and frame rate.
///
/// Channel order is significant: it defines the canonical column order used
/// throughout fitting and prediction. The name→column mapping is built and
/// validated once at construction.
#[derive(Debug, Clone)]
pub struct MotionDataset {
    name: String,
    channels: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major: one row per motion frame, one value per channel.
    frames: Vec<Vec<f64>>,
    /// Seconds per frame.
    frame_time: f64,
}

impl MotionDataset {
    /// Create a dataset from a channel list and per-frame rows.
    ///
    /// Fails with `InvalidData` on an empty channel list, duplicate channel
    /// names, or frame rows whose length differs from the channel count.
    pub fn new(
        name: impl Into<String>,
        channels: Vec<String>,
        frames: Vec<Vec<f64>>,
        frame_time: f64,
    ) -> Result<Self> {
        if channels.is_empty() {
            return Err(AnalysisError::InvalidData(
                "dataset has no channels".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(channels.len());
        for (i, channel) in channels.iter().enumerate() {
            if index.insert(channel.clone(), i).is_some() {
                return Err(AnalysisError::InvalidData(format!(
                    "duplicate channel name '{channel}'"
                )));
            }
        }

        for (i, row) in frames.iter().enumerate() {
            if row.len() != channels.len() {
                return Err(AnalysisError::InvalidData(format!(
                    "frame {i} has {} values, expected {}",
                    row.len(),
                    channels.len()
                )));
            }
        }

        Ok(Self {
            name: name.into(),
            channels,
            index,
            frames,
            frame_time,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    /// Column index for a channel name, if present.
    pub fn channel_index(&self, channel: &str) -> Option<usize> {
        self.index.get(channel).copied()
    }

    /// Extract the full series for a named channel.
    pub fn column(&self, channel: &str) -> Result<Vec<f64>> {
        let idx = self
            .channel_index(channel)
            .ok_or_else(|| AnalysisError::ChannelNotFound(channel.to_string()))?;
        Ok(self.column_at(idx))
    }

    /// Extract the full series for a column index.
    pub fn column_at(&self, idx: usize) -> Vec<f64> {
        self.frames.iter().map(|row| row[idx]).collect()
    }

    /// Channel name for a joint and rotation axis, e.g. `Hips_Xrotation`.
    pub fn rotation_channel(joint: &str, axis: Axis) -> String {
        format!("{joint}_{axis}rotation")
    }
}
