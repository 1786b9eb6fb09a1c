use crate::element::PathPoint;

/// Upper bound on the spline tension so high smoothing factors cannot
/// overshoot the raw input.
const MAX_TENSION: f32 = 0.5;

/// Minimum width a pressure-modulated stroke segment may reach.
const MIN_PRESSURE_WIDTH: f32 = 1.0;

/// Smooths a raw freehand point sequence.
///
/// Each interior point is blended toward the midpoint of its neighbors,
/// weighted by `smoothing` in `[0, 1]` (0 leaves the polyline untouched).
/// The first and last points are anchors and are preserved exactly.
/// Inputs shorter than 3 points are returned unchanged; there is nothing
/// to smooth.
pub fn smooth(points: &[PathPoint], smoothing: f32) -> Vec<PathPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let tension = smoothing.clamp(0.0, 1.0) * MAX_TENSION;
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);

    for window in points.windows(3) {
        let (prev, current, next) = (window[0], window[1], window[2]);
        let midpoint = prev.pos + (next.pos - prev.pos) * 0.5;
        let pos = current.pos + (midpoint - current.pos) * tension;
        let pressure = blend_pressure(prev.pressure, current.pressure, next.pressure, tension);
        out.push(PathPoint { pos, pressure });
    }

    out.push(points[points.len() - 1]);
    out
}

/// Pressure follows the same neighbor blend as the position so width
/// modulation survives smoothing. A point with no pressure of its own
/// stays pressure-less.
fn blend_pressure(
    prev: Option<f32>,
    current: Option<f32>,
    next: Option<f32>,
    tension: f32,
) -> Option<f32> {
    let current = current?;
    match (prev, next) {
        (Some(a), Some(b)) => {
            let midpoint = (a + b) * 0.5;
            Some(current + (midpoint - current) * tension)
        }
        _ => Some(current),
    }
}

/// Maps pen pressure onto a stroke width.
///
/// Without pressure the base width is used as-is. With pressure the width
/// scales between 20% and 100% of the base, and never drops below
/// 1 unit regardless of how light the touch was.
pub fn pressure_adjusted_width(base_width: f32, pressure: Option<f32>) -> f32 {
    match pressure {
        None => base_width,
        Some(p) => {
            let p = p.clamp(0.0, 1.0);
            (base_width * (0.2 + p * 0.8)).max(MIN_PRESSURE_WIDTH)
        }
    }
}
