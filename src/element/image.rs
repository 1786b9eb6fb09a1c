use egui::{Pos2, Rect, Vec2, pos2};
use serde::{Deserialize, Serialize};

/// Placeholder extent for an image whose decode has not finished yet.
pub const PENDING_IMAGE_SIZE: Vec2 = Vec2::splat(100.0);

/// A dropped/uploaded bitmap, positioned by its center.
///
/// `data` holds the still-encoded bytes; the core never decodes them
/// itself. `loaded` flips once the asynchronous decode completes, and the
/// element is skipped by the renderer until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub position: Pos2,
    pub size: Vec2,
    pub data: Vec<u8>,
    pub loaded: bool,
}

impl ImageElement {
    pub fn new(position: Pos2, data: Vec<u8>) -> Self {
        Self {
            position,
            size: PENDING_IMAGE_SIZE,
            data,
            loaded: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn scale_about(&mut self, anchor: Pos2, scale_x: f32, scale_y: f32) {
        self.position = pos2(
            anchor.x + (self.position.x - anchor.x) * scale_x,
            anchor.y + (self.position.y - anchor.y) * scale_y,
        );
        self.size.x *= scale_x;
        self.size.y *= scale_y;
    }
}
