use serde::{Deserialize, Serialize};

use super::{CurvePoint, SurfaceSize};
use crate::pipeline::pattern::{ActionType, PatternStep, ValidationError};

/// Operator-facing knobs for the quantizer. The sampler itself never
/// mutates this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of steps the curve collapses into. Must be at least 2.
    pub resolution: usize,
    /// Bottom of the intensity band, 1..=100.
    pub min_intensity: u8,
    /// Top of the intensity band, 1..=100, at least `min_intensity`.
    pub max_intensity: u8,
    /// How long the device holds each step, in ms. Must be positive.
    pub step_duration_ms: u32,
    /// Idle gap after each step, in ms. Carried on the wire only when set.
    pub step_delay_ms: u32,
    /// What every emitted step tells the device to do.
    pub action: ActionType,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            min_intensity: 1,
            max_intensity: 100,
            step_duration_ms: 500,
            step_delay_ms: 0,
            action: ActionType::Shock,
        }
    }
}

/// Collapse a drawn or generated curve into exactly `resolution` steps.
///
/// For each time bucket the nearest recorded point by x wins (first one in
/// capture order on a tie, never interpolated), its height is rescaled into
/// the configured intensity band, and one step is emitted. The result is a
/// pure function of the inputs: same points and config, same steps.
///
/// A curve with fewer than 2 points can't be quantized and comes back as a
/// validation error. A resolution under 2 is a caller bug; we log and
/// return no steps instead of guessing.
pub fn sample_curve(
    points: &[CurvePoint],
    surface: SurfaceSize,
    cfg: &SamplerConfig,
) -> Result<Vec<PatternStep>, ValidationError> {
    if cfg.resolution < 2 {
        tracing::warn!(resolution = cfg.resolution, "sampler called with resolution < 2");
        return Ok(Vec::new());
    }
    if points.len() < 2 {
        return Err(ValidationError::CurveTooShort { points: points.len() });
    }

    let band = (cfg.max_intensity as f64) - (cfg.min_intensity as f64);
    let mut steps = Vec::with_capacity(cfg.resolution);

    for i in 0..cfg.resolution {
        let target_x = (i as f64 / cfg.resolution as f64) * surface.width;

        // exhaustive scan; strictly-closer keeps the earliest point on ties
        let mut nearest = points[0];
        let mut best = (points[0].x - target_x).abs();
        for p in &points[1..] {
            let d = (p.x - target_x).abs();
            if d < best {
                best = d;
                nearest = *p;
            }
        }

        let raw = (1.0 - nearest.y / surface.height).clamp(0.0, 1.0);
        let scaled = cfg.min_intensity as f64 + raw * band;
        let intensity = scaled.clamp(1.0, 100.0).round() as u8;

        steps.push(PatternStep {
            action: cfg.action,
            intensity: (cfg.action != ActionType::Pause).then_some(intensity),
            duration_ms: cfg.step_duration_ms,
            delay_ms: (cfg.step_delay_ms > 0).then_some(cfg.step_delay_ms),
        });
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TemplateShape;

    fn cfg(resolution: usize, min: u8, max: u8) -> SamplerConfig {
        SamplerConfig {
            resolution,
            min_intensity: min,
            max_intensity: max,
            ..SamplerConfig::default()
        }
    }

    fn surface() -> SurfaceSize {
        SurfaceSize::new(100.0, 100.0)
    }

    #[test]
    fn emits_exactly_resolution_steps() {
        let pts = vec![CurvePoint::new(0.0, 50.0), CurvePoint::new(100.0, 50.0)];
        for resolution in [2, 3, 10, 64] {
            let steps = sample_curve(&pts, surface(), &cfg(resolution, 1, 100)).unwrap();
            assert_eq!(steps.len(), resolution);
        }
    }

    #[test]
    fn is_deterministic() {
        let pts: Vec<CurvePoint> = (0..40)
            .map(|i| CurvePoint::new(i as f64 * 2.5, ((i * 37) % 100) as f64))
            .collect();
        let c = cfg(16, 20, 90);
        let a = sample_curve(&pts, surface(), &c).unwrap();
        let b = sample_curve(&pts, surface(), &c).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn intensities_stay_inside_the_band() {
        let pts: Vec<CurvePoint> = (0..50)
            .map(|i| CurvePoint::new(i as f64 * 2.0, ((i * 61) % 101) as f64))
            .collect();
        let steps = sample_curve(&pts, surface(), &cfg(25, 30, 70)).unwrap();
        for s in &steps {
            let v = s.intensity.unwrap();
            assert!((30..=70).contains(&v), "{v} outside band");
        }
    }

    #[test]
    fn too_few_points_is_a_validation_error() {
        let err = sample_curve(&[], surface(), &cfg(5, 1, 100)).unwrap_err();
        assert!(matches!(err, ValidationError::CurveTooShort { points: 0 }));

        let one = vec![CurvePoint::new(10.0, 10.0)];
        let err = sample_curve(&one, surface(), &cfg(5, 1, 100)).unwrap_err();
        assert!(matches!(err, ValidationError::CurveTooShort { points: 1 }));
    }

    #[test]
    fn resolution_under_two_noops() {
        let pts = vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(100.0, 0.0)];
        let steps = sample_curve(&pts, surface(), &cfg(1, 1, 100)).unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn spike_scenario_maps_floor_then_apex() {
        // spike in the middle. targets are 0, 33.3 and 66.7: the apex at
        // x=50 is nearest to both later buckets, and the flat start floors
        // at 1 after the final [1,100] clamp.
        let pts = vec![
            CurvePoint::new(0.0, 100.0),
            CurvePoint::new(50.0, 0.0),
            CurvePoint::new(100.0, 100.0),
        ];
        let steps = sample_curve(&pts, surface(), &cfg(3, 0, 100)).unwrap();
        let intensities: Vec<u8> = steps.iter().map(|s| s.intensity.unwrap()).collect();
        assert_eq!(intensities, vec![1, 100, 100]);
    }

    #[test]
    fn tie_break_keeps_first_point_in_capture_order() {
        // both points are 25 away from target_x = 50; the earlier one wins
        let pts = vec![CurvePoint::new(25.0, 0.0), CurvePoint::new(75.0, 100.0)];
        let steps = sample_curve(&pts, SurfaceSize::new(100.0, 100.0), &cfg(2, 1, 100)).unwrap();
        // bucket 1 targets x=50, equidistant: first point (full height) wins
        assert_eq!(steps[1].intensity, Some(100));
    }

    #[test]
    fn backward_strokes_sample_fine() {
        // x is not monotonic; the scan doesn't care
        let pts = vec![
            CurvePoint::new(80.0, 20.0),
            CurvePoint::new(20.0, 80.0),
            CurvePoint::new(50.0, 50.0),
        ];
        let steps = sample_curve(&pts, surface(), &cfg(4, 1, 100)).unwrap();
        assert_eq!(steps.len(), 4);
    }

    #[test]
    fn sine_template_oscillates_inside_band() {
        let pts = TemplateShape::Sine.generate(surface());
        let steps = sample_curve(&pts, surface(), &cfg(20, 10, 80)).unwrap();
        assert_eq!(steps.len(), 20);
        let intensities: Vec<u8> = steps.iter().map(|s| s.intensity.unwrap()).collect();
        let min = *intensities.iter().min().unwrap();
        let max = *intensities.iter().max().unwrap();
        assert!(min >= 10 && max <= 80);
        // rises past the midline then comes back under it: an oscillation,
        // not a ramp
        assert!(intensities[5] > intensities[0]);
        assert!(intensities[15] < intensities[0]);
    }

    #[test]
    fn pause_steps_carry_no_intensity() {
        let pts = vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(100.0, 0.0)];
        let c = SamplerConfig {
            action: ActionType::Pause,
            ..cfg(4, 1, 100)
        };
        let steps = sample_curve(&pts, surface(), &c).unwrap();
        assert!(steps.iter().all(|s| s.intensity.is_none()));
    }

    #[test]
    fn delay_emitted_only_when_configured() {
        let pts = vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(100.0, 0.0)];
        let steps = sample_curve(&pts, surface(), &cfg(2, 1, 100)).unwrap();
        assert!(steps.iter().all(|s| s.delay_ms.is_none()));

        let c = SamplerConfig {
            step_delay_ms: 250,
            ..cfg(2, 1, 100)
        };
        let steps = sample_curve(&pts, surface(), &c).unwrap();
        assert!(steps.iter().all(|s| s.delay_ms == Some(250)));
    }
}
