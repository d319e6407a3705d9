// the wire model: what the persistence service stores and the device
// executor replays, byte for byte. field names here are the contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a step tells the device to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Shock,
    Vibrate,
    Sound,
    Pause,
}

impl ActionType {
    pub fn next(self) -> Self {
        match self {
            Self::Shock => Self::Vibrate,
            Self::Vibrate => Self::Sound,
            Self::Sound => Self::Pause,
            Self::Pause => Self::Shock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Shock => "shock",
            Self::Vibrate => "vibrate",
            Self::Sound => "sound",
            Self::Pause => "pause",
        }
    }
}

/// One discrete actuator command. `intensity` is present for every action
/// except pause. `delay` is a legacy field: parsed and carried for old
/// patterns, never part of any total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStep {
    #[serde(rename = "type")]
    pub action: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    #[serde(rename = "delay", default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u32>,
}

/// A named, ordered step list. `id` is assigned by the persistence service
/// on first save.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub steps: Vec<PatternStep>,
    pub preset: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("curve has {points} point(s), need at least 2 to quantize")]
    CurveTooShort { points: usize },
    #[error("pattern needs a name")]
    EmptyName,
    #[error("pattern has no steps")]
    NoSteps,
}

impl Pattern {
    /// Swap in a whole new step list. The only way curve output lands here.
    pub fn replace_steps(&mut self, steps: Vec<PatternStep>) {
        self.steps = steps;
    }

    pub fn add_step(&mut self, step: PatternStep) {
        self.steps.push(step);
    }

    /// Remove by index. Out of range means a caller bug in the editor, so
    /// nothing happens rather than panicking mid-session.
    pub fn remove_step(&mut self, index: usize) {
        if index < self.steps.len() {
            self.steps.remove(index);
        }
    }

    /// Replace one step by index. Out of range is a no-op, same as above.
    pub fn update_step(&mut self, index: usize, step: PatternStep) {
        if let Some(slot) = self.steps.get_mut(index) {
            *slot = step;
        }
    }

    /// Insert after `index`; out of range appends nothing.
    pub fn insert_step_after(&mut self, index: usize, step: PatternStep) {
        if index < self.steps.len() {
            self.steps.insert(index + 1, step);
        }
    }

    /// The one gate before a save goes out: a usable name and at least one
    /// step. Step internals are already guaranteed by the sampler.
    pub fn validate_for_save(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(ValidationError::NoSteps);
        }
        Ok(())
    }

    pub fn stats(&self) -> PatternStats {
        compute_stats(&self.steps)
    }
}

/// Derived numbers for the stats pane. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatternStats {
    pub step_count: usize,
    pub total_duration_ms: u64,
    pub avg_intensity: f64,
    pub peak_intensity: u8,
}

/// Recomputed on every change to the step list. Totals are duration-only;
/// legacy delays never count.
pub fn compute_stats(steps: &[PatternStep]) -> PatternStats {
    let total_duration_ms = steps.iter().map(|s| s.duration_ms as u64).sum();
    let intensities: Vec<u8> = steps.iter().filter_map(|s| s.intensity).collect();
    let avg_intensity = if intensities.is_empty() {
        0.0
    } else {
        intensities.iter().map(|&v| v as f64).sum::<f64>() / intensities.len() as f64
    };
    PatternStats {
        step_count: steps.len(),
        total_duration_ms,
        avg_intensity,
        peak_intensity: intensities.iter().copied().max().unwrap_or(0),
    }
}
