use super::{CurvePoint, SurfaceSize};

/// How many points a template stamps across the surface. Enough that the
/// sampler sees the shape at any sane resolution.
pub const TEMPLATE_POINTS: usize = 50;

/// Analytic curve shapes offered next to free-hand drawing. Each one maps a
/// progress value t in [0,1] to a normalized level in [0,1].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateShape {
    LinearUp,
    LinearDown,
    ExponentialUp,
    ExponentialDown,
    Sine,
    Pulse,
    Sawtooth,
    Triangle,
}

pub const ALL_SHAPES: [TemplateShape; 8] = [
    TemplateShape::LinearUp,
    TemplateShape::LinearDown,
    TemplateShape::ExponentialUp,
    TemplateShape::ExponentialDown,
    TemplateShape::Sine,
    TemplateShape::Pulse,
    TemplateShape::Sawtooth,
    TemplateShape::Triangle,
];

impl TemplateShape {
    /// Look a shape up by its id. Unknown names give `None`, which callers
    /// treat as "no curve yet" rather than substituting anything.
    pub fn from_name(name: &str) -> Option<Self> {
        let shape = match name {
            "linear-up" => Self::LinearUp,
            "linear-down" => Self::LinearDown,
            "exponential-up" => Self::ExponentialUp,
            "exponential-down" => Self::ExponentialDown,
            "sine" => Self::Sine,
            "pulse" => Self::Pulse,
            "sawtooth" => Self::Sawtooth,
            "triangle" => Self::Triangle,
            _ => return None,
        };
        Some(shape)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LinearUp => "linear-up",
            Self::LinearDown => "linear-down",
            Self::ExponentialUp => "exponential-up",
            Self::ExponentialDown => "exponential-down",
            Self::Sine => "sine",
            Self::Pulse => "pulse",
            Self::Sawtooth => "sawtooth",
            Self::Triangle => "triangle",
        }
    }

    /// Normalized level at progress t. Both in [0,1].
    fn level(self, t: f64) -> f64 {
        match self {
            Self::LinearUp => t,
            Self::LinearDown => 1.0 - t,
            Self::ExponentialUp => t * t,
            Self::ExponentialDown => (1.0 - t) * (1.0 - t),
            Self::Sine => ((std::f64::consts::TAU * t).sin() + 1.0) / 2.0,
            Self::Pulse => {
                if (10.0 * t).floor() as i64 % 2 == 0 {
                    0.8
                } else {
                    0.2
                }
            }
            Self::Sawtooth => (4.0 * t) % 1.0,
            Self::Triangle => {
                if t < 0.5 {
                    2.0 * t
                } else {
                    2.0 * (1.0 - t)
                }
            }
        }
    }

    /// Stamp this shape across the full surface as a capture-compatible
    /// point list: high level means low y, like a drawn stroke.
    pub fn generate(self, surface: SurfaceSize) -> Vec<CurvePoint> {
        (0..TEMPLATE_POINTS)
            .map(|i| {
                let t = i as f64 / (TEMPLATE_POINTS - 1) as f64;
                CurvePoint {
                    x: t * surface.width,
                    y: surface.height - self.level(t) * surface.height,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(100.0, 100.0)
    }

    #[test]
    fn generates_fixed_point_count_spanning_surface() {
        for shape in ALL_SHAPES {
            let pts = shape.generate(surface());
            assert_eq!(pts.len(), TEMPLATE_POINTS, "{}", shape.name());
            assert_eq!(pts[0].x, 0.0);
            assert_eq!(pts.last().unwrap().x, 100.0);
            for p in &pts {
                assert!(p.y >= 0.0 && p.y <= 100.0, "{}", shape.name());
            }
        }
    }

    #[test]
    fn linear_up_rises() {
        let pts = TemplateShape::LinearUp.generate(surface());
        // level 0 at the start means the stroke sits at the bottom
        assert_eq!(pts[0].y, 100.0);
        assert_eq!(pts.last().unwrap().y, 0.0);
    }

    #[test]
    fn linear_down_falls() {
        let pts = TemplateShape::LinearDown.generate(surface());
        assert_eq!(pts[0].y, 0.0);
        assert_eq!(pts.last().unwrap().y, 100.0);
    }

    #[test]
    fn exponential_up_is_convex() {
        let pts = TemplateShape::ExponentialUp.generate(surface());
        // at t=0.5 the level is 0.25, well under the linear midpoint
        let mid = &pts[TEMPLATE_POINTS / 2];
        assert!(mid.y > 70.0);
    }

    #[test]
    fn pulse_alternates_between_two_levels() {
        let pts = TemplateShape::Pulse.generate(surface());
        for p in &pts {
            let level = 1.0 - p.y / 100.0;
            assert!((level - 0.8).abs() < 1e-9 || (level - 0.2).abs() < 1e-9);
        }
        // first decade is high, second is low
        assert!((1.0 - pts[0].y / 100.0 - 0.8).abs() < 1e-9);
        let in_second = pts.iter().find(|p| p.x > 10.0 && p.x < 20.0).unwrap();
        assert!((1.0 - in_second.y / 100.0 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn sine_starts_at_midline() {
        let pts = TemplateShape::Sine.generate(surface());
        assert!((pts[0].y - 50.0).abs() < 1e-9);
        assert!((pts.last().unwrap().y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn sawtooth_wraps() {
        let pts = TemplateShape::Sawtooth.generate(surface());
        let levels: Vec<f64> = pts.iter().map(|p| 1.0 - p.y / 100.0).collect();
        // four ascending teeth: the level must drop near each quarter mark
        let quarter = levels[TEMPLATE_POINTS / 4 - 1];
        let after = levels[TEMPLATE_POINTS / 4 + 1];
        assert!(quarter > after);
    }

    #[test]
    fn name_round_trips() {
        for shape in ALL_SHAPES {
            assert_eq!(TemplateShape::from_name(shape.name()), Some(shape));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(TemplateShape::from_name("zigzag"), None);
        assert_eq!(TemplateShape::from_name(""), None);
    }
}
