use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// A single sample of a freehand stroke. Pressure is optional; absent
/// means "use the base stroke width".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub pos: Pos2,
    pub pressure: Option<f32>,
}

impl PathPoint {
    pub fn new(pos: Pos2) -> Self {
        Self { pos, pressure: None }
    }

    pub fn with_pressure(pos: Pos2, pressure: f32) -> Self {
        Self { pos, pressure: Some(pressure) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Rendering attributes shared by freehand paths and generated shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color32,
    /// Stored width is kept as-authored (> 0); the renderer clamps to a
    /// minimum visible width at paint time.
    pub width: f32,
    pub fill: Option<Color32>,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dash: Option<Vec<f32>>,
    /// In `[0, 1]`.
    pub opacity: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 2.0,
            fill: None,
            cap: LineCap::default(),
            join: LineJoin::default(),
            dash: None,
            opacity: 1.0,
        }
    }
}

/// Freehand stroke: an ordered point sequence with a stroke style. The
/// point sequence is the source of truth for this element's geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub points: Vec<PathPoint>,
    pub style: StrokeStyle,
}

impl PathElement {
    pub fn new(points: Vec<PathPoint>, style: StrokeStyle) -> Self {
        Self { points, style }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.points.iter().map(|p| p.pos)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            point.pos += delta;
        }
    }

    pub fn scale_about(&mut self, anchor: Pos2, scale_x: f32, scale_y: f32) {
        for point in &mut self.points {
            point.pos.x = anchor.x + (point.pos.x - anchor.x) * scale_x;
            point.pos.y = anchor.y + (point.pos.y - anchor.y) * scale_y;
        }
        self.style.width *= (scale_x + scale_y) / 2.0;
    }

    pub fn rotate_about(&mut self, center: Pos2, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for point in &mut self.points {
            let dx = point.pos.x - center.x;
            let dy = point.pos.y - center.y;
            point.pos.x = center.x + dx * cos - dy * sin;
            point.pos.y = center.y + dx * sin + dy * cos;
        }
    }
}
