// proportional layout of a step list: the preview bar and the executor
// share this elapsed-time convention.

use super::pattern::PatternStep;

/// One step's slice of the timeline, in percent of the whole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineSegment {
    pub index: usize,
    pub start_percent: f64,
    pub width_percent: f64,
}

/// Sum of step durations. Legacy delays don't count.
pub fn total_duration_ms(steps: &[PatternStep]) -> u64 {
    steps.iter().map(|s| s.duration_ms as u64).sum()
}

/// Time spent before step `i` starts, duration-only.
pub fn elapsed_before_ms(steps: &[PatternStep], i: usize) -> u64 {
    steps
        .iter()
        .take(i)
        .map(|s| s.duration_ms as u64)
        .sum()
}

/// Proportional segments for every step. A degenerate list (empty, or all
/// durations zero) produces no layout at all; the caller shows a
/// placeholder instead of dividing by zero.
pub fn project(steps: &[PatternStep]) -> Vec<TimelineSegment> {
    let total = total_duration_ms(steps);
    if total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    let mut elapsed = 0u64;
    steps
        .iter()
        .enumerate()
        .map(|(index, s)| {
            let seg = TimelineSegment {
                index,
                start_percent: elapsed as f64 / total * 100.0,
                width_percent: s.duration_ms as f64 / total * 100.0,
            };
            elapsed += s.duration_ms as u64;
            seg
        })
        .collect()
}
