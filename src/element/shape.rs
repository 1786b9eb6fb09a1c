use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::StrokeStyle;
use crate::geometry::shapes::ShapeSettings;

/// A committed primitive. The generated outline is the source of truth
/// for geometry; the generating parameters are retained so the shape
/// could be re-edited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub settings: ShapeSettings,
    pub path: Vec<Pos2>,
    pub closed: bool,
    pub style: StrokeStyle,
}

impl ShapeElement {
    pub fn new(settings: ShapeSettings, path: Vec<Pos2>, style: StrokeStyle) -> Self {
        let closed = settings.kind.is_closed();
        Self { settings, path, closed, style }
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.path {
            *point += delta;
        }
    }

    pub fn scale_about(&mut self, anchor: Pos2, scale_x: f32, scale_y: f32) {
        for point in &mut self.path {
            point.x = anchor.x + (point.x - anchor.x) * scale_x;
            point.y = anchor.y + (point.y - anchor.y) * scale_y;
        }
        self.style.width *= (scale_x + scale_y) / 2.0;
    }

    pub fn rotate_about(&mut self, center: Pos2, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        for point in &mut self.path {
            let dx = point.x - center.x;
            let dy = point.y - center.y;
            point.x = center.x + dx * cos - dy * sin;
            point.y = center.y + dx * sin + dy * cos;
        }
    }
}
