use egui::{Pos2, Vec2, pos2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;
/// Largest pan magnitude on each axis, in scene units.
pub const MAX_PAN: f32 = 50_000.0;
/// Multiplicative step applied per zoom increment (wheel notch or
/// keyboard +/−). Zooming out divides by the same factor, so equal
/// counts of each compound back to the starting zoom exactly.
pub const ZOOM_STEP: f32 = 1.1;

/// The viewing transform between screen (pointer/pixel) coordinates and
/// scene coordinates.
///
/// Forward transform: translate the scene point by the pan offset, scale
/// by the zoom factor, then translate to the canvas center. The two
/// conversion functions are exact inverses; bounds on zoom and pan are
/// enforced in the mutating methods, not in the transforms themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    canvas_size: Vec2,
    zoom: f32,
    pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::new(800.0, 600.0),
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(canvas_size: Vec2) -> Self {
        Self { canvas_size, ..Self::default() }
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = size;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Maps a pointer position to scene coordinates.
    pub fn screen_to_scene(&self, screen: Pos2) -> Pos2 {
        let center = self.canvas_size / 2.0;
        pos2(
            (screen.x - center.x) / self.zoom - self.pan.x,
            (screen.y - center.y) / self.zoom - self.pan.y,
        )
    }

    /// Maps a scene position to screen coordinates; used by the renderer
    /// and by overlay UI placing readouts next to scene geometry.
    pub fn scene_to_screen(&self, scene: Pos2) -> Pos2 {
        let center = self.canvas_size / 2.0;
        pos2(
            (scene.x + self.pan.x) * self.zoom + center.x,
            (scene.y + self.pan.y) * self.zoom + center.y,
        )
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// One multiplicative zoom-in step about the current zoom.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    /// Exact inverse of [`Viewport::zoom_in`].
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.set_pan(self.pan + delta);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = Vec2::new(pan.x.clamp(-MAX_PAN, MAX_PAN), pan.y.clamp(-MAX_PAN, MAX_PAN));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        let mut viewport = Viewport::new(Vec2::new(1280.0, 720.0));
        for (zoom, pan) in [
            (1.0, Vec2::ZERO),
            (0.1, Vec2::new(300.0, -150.0)),
            (2.5, Vec2::new(-40.0, 900.0)),
            (5.0, Vec2::new(0.5, 0.25)),
        ] {
            viewport.set_zoom(zoom);
            viewport.set_pan(pan);
            let scene = pos2(123.4, -567.8);
            let round_tripped = viewport.screen_to_scene(viewport.scene_to_screen(scene));
            assert!((round_tripped.x - scene.x).abs() < 1e-3);
            assert!((round_tripped.y - scene.y).abs() < 1e-3);
        }
    }

    #[test]
    fn canvas_center_maps_to_negative_pan() {
        let viewport = Viewport::new(Vec2::new(800.0, 600.0));
        let scene = viewport.screen_to_scene(pos2(400.0, 300.0));
        assert_eq!(scene, pos2(0.0, 0.0));
    }

    #[test]
    fn zoom_steps_compound_without_drift() {
        let mut viewport = Viewport::default();
        for _ in 0..10 {
            viewport.zoom_in();
        }
        assert!(viewport.zoom() > 2.5); // 1.1^10 ≈ 2.594, not 1 + 10 * 0.1
        for _ in 0..10 {
            viewport.zoom_out();
        }
        assert!((viewport.zoom() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(100.0);
        assert_eq!(viewport.zoom(), MAX_ZOOM);
        viewport.set_zoom(0.0001);
        assert_eq!(viewport.zoom(), MIN_ZOOM);
    }

    #[test]
    fn pan_is_clamped_per_axis() {
        let mut viewport = Viewport::default();
        viewport.set_pan(Vec2::new(1e9, -1e9));
        assert_eq!(viewport.pan(), Vec2::new(MAX_PAN, -MAX_PAN));
    }
}
