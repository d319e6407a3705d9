use super::{CurvePoint, SurfaceSize};

// Nearest-point sampling scans the whole list, so a long jittery drag would
// make every preview resample slower. Once we hit the cap we halve the list
// instead of growing further.
pub const MAX_CAPTURE_POINTS: usize = 4096;

/// Records one drawing gesture as an ordered point list.
///
/// The recorder doesn't care where points come from: the TUI feeds it mouse
/// positions, tests feed it synthetic sequences. Points live until the next
/// `begin` or until the session is replaced.
#[derive(Clone, Debug)]
pub struct CurveCapture {
    surface: SurfaceSize,
    points: Vec<CurvePoint>,
    drawing: bool,
}

impl CurveCapture {
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            surface,
            points: Vec::new(),
            drawing: false,
        }
    }

    /// Start a new gesture. Discards whatever the previous gesture left.
    pub fn begin(&mut self, p: CurvePoint) {
        self.points.clear();
        self.points.push(self.surface.clamp_point(p));
        self.drawing = true;
    }

    /// Append a point while the gesture is active. Ignored when not drawing.
    pub fn extend(&mut self, p: CurvePoint) {
        if !self.drawing {
            return;
        }
        if self.points.len() >= MAX_CAPTURE_POINTS {
            self.decimate();
        }
        self.points.push(self.surface.clamp_point(p));
    }

    /// Finish the gesture. Points stay around for sampling and preview.
    pub fn end(&mut self) {
        self.drawing = false;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Replace the whole point list, e.g. with template output.
    pub fn set_points(&mut self, points: Vec<CurvePoint>) {
        self.drawing = false;
        self.points = points
            .into_iter()
            .map(|p| self.surface.clamp_point(p))
            .collect();
    }

    /// Drop the most recent `fraction` of points (the only undo there is).
    /// A fraction of 0.1 removes the last tenth of the gesture.
    pub fn truncate_recent(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        let drop = ((self.points.len() as f64) * fraction).ceil() as usize;
        let keep = self.points.len().saturating_sub(drop);
        self.points.truncate(keep);
    }

    /// The terminal was resized: adopt the new surface and re-clamp what we
    /// already recorded so every stored point stays inside it.
    pub fn set_surface(&mut self, surface: SurfaceSize) {
        if surface == self.surface {
            return;
        }
        self.surface = surface;
        for p in &mut self.points {
            *p = surface.clamp_point(*p);
        }
    }

    // Halve the list by keeping even indices. The earlier of each adjacent
    // pair survives, which keeps the sampler's earliest-wins tie rule intact.
    fn decimate(&mut self) {
        let mut keep = 0;
        self.points.retain(|_| {
            let k = keep % 2 == 0;
            keep += 1;
            k
        });
    }
}
