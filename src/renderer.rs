use std::collections::HashMap;

use egui::{
    Align2, Color32, ColorImage, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureHandle,
    TextureOptions, pos2, vec2,
};

use crate::element::{Element, ElementId, ElementKind, PathPoint, StrokeStyle};
use crate::geometry::hit_testing::{self, HANDLE_HIT_RADIUS};
use crate::geometry::smoothing::pressure_adjusted_width;
use crate::scene::Scene;
use crate::tools::ToolPreview;
use crate::viewport::Viewport;

/// Strokes never paint thinner than this, regardless of stored width and
/// zoom. The stored width itself is left untouched.
pub const MIN_VISIBLE_STROKE_WIDTH: f32 = 0.5;

const SELECTION_COLOR: Color32 = Color32::from_rgb(30, 120, 255);
const MARQUEE_FILL: Color32 = Color32::from_rgba_premultiplied(30, 120, 255, 24);

/// Coalesced redraw requests: at most one redraw is ever pending, and a
/// new request while one is pending replaces it. This keeps
/// pointermove-driven redraws from piling up a backlog under fast input.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Maps scene positions into the host window: the viewport transform
/// plus the canvas panel's corner offset.
#[derive(Clone, Copy)]
struct ScreenMapper<'a> {
    viewport: &'a Viewport,
    origin: egui::Vec2,
}

impl ScreenMapper<'_> {
    fn map(&self, pos: Pos2) -> Pos2 {
        self.viewport.scene_to_screen(pos) + self.origin
    }
}

/// Paints scene snapshots onto an `egui::Painter`.
///
/// The renderer only ever reads the scene; decoded image pixels are
/// pushed into its texture cache by the host once the loader finishes.
/// `origin` is the canvas panel's corner in window coordinates, since the
/// viewport itself works canvas-local.
pub struct Renderer {
    textures: HashMap<ElementId, TextureHandle>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { textures: HashMap::new() }
    }

    /// Installs the decoded pixels for an image element.
    pub fn install_image(&mut self, ctx: &egui::Context, id: ElementId, image: ColorImage) {
        let texture = ctx.load_texture(format!("board-image-{id}"), image, TextureOptions::LINEAR);
        self.textures.insert(id, texture);
    }

    pub fn drop_image(&mut self, id: ElementId) {
        self.textures.remove(&id);
    }

    /// Paints the committed scene, bottom to top.
    pub fn paint_scene(
        &self,
        painter: &Painter,
        scene: &Scene,
        viewport: &Viewport,
        origin: egui::Vec2,
    ) {
        let mapper = ScreenMapper { viewport, origin };
        for element in scene.elements() {
            self.paint_element(painter, element, &mapper);
        }
    }

    fn paint_element(&self, painter: &Painter, element: &Element, mapper: &ScreenMapper<'_>) {
        match &element.kind {
            ElementKind::Path(path) => {
                paint_polyline(painter, mapper, &path.points, &path.style, false);
            }
            ElementKind::Shape(shape) => {
                let points: Vec<PathPoint> =
                    shape.path.iter().map(|p| PathPoint::new(*p)).collect();
                paint_polyline(painter, mapper, &points, &shape.style, shape.closed);
            }
            ElementKind::Text(text) => {
                painter.text(
                    mapper.map(text.position),
                    Align2::LEFT_TOP,
                    &text.text,
                    FontId::proportional(text.font_size * mapper.viewport.zoom()),
                    text.color,
                );
            }
            ElementKind::Image(image) => {
                // Not rendered until the decode has landed.
                if !image.loaded {
                    return;
                }
                let rect = Rect::from_min_max(
                    mapper.map(image.bounds().min),
                    mapper.map(image.bounds().max),
                );
                match self.textures.get(&element.id()) {
                    Some(texture) => {
                        painter.image(
                            texture.id(),
                            rect,
                            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                    None => {
                        // Loaded but pixels not installed here (e.g. a
                        // scene opened from disk): show the footprint.
                        painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::GRAY));
                    }
                }
            }
            ElementKind::Group(_) => {} // children paint themselves
        }
    }

    /// Paints the active tool's transient geometry on top of the scene.
    pub fn paint_preview(
        &self,
        painter: &Painter,
        preview: &ToolPreview<'_>,
        viewport: &Viewport,
        origin: egui::Vec2,
    ) {
        let mapper = ScreenMapper { viewport, origin };
        match preview {
            ToolPreview::None => {}
            ToolPreview::Stroke { points, style } => {
                paint_polyline(painter, &mapper, points, style, false);
            }
            ToolPreview::Shape { path, closed, style } => {
                let points: Vec<PathPoint> = path.iter().map(|p| PathPoint::new(*p)).collect();
                paint_polyline(painter, &mapper, &points, style, *closed);
            }
            ToolPreview::Marquee(rect) => {
                let rect = Rect::from_min_max(mapper.map(rect.min), mapper.map(rect.max));
                painter.rect_filled(rect, 0.0, MARQUEE_FILL);
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SELECTION_COLOR));
            }
        }
    }

    /// Selection chrome: bounding box plus the transform handles.
    pub fn paint_selection(
        &self,
        painter: &Painter,
        scene: &Scene,
        viewport: &Viewport,
        origin: egui::Vec2,
    ) {
        let Some(bounds) = scene.selection_bounds() else {
            return;
        };
        let mapper = ScreenMapper { viewport, origin };

        let screen_bounds = Rect::from_min_max(mapper.map(bounds.min), mapper.map(bounds.max));
        painter.rect_stroke(screen_bounds, 0.0, Stroke::new(1.0, SELECTION_COLOR));

        for handle in hit_testing::transform_handles(bounds) {
            let center = mapper.map(handle.center);
            if handle.role.is_rotation() {
                painter.circle_filled(center, HANDLE_HIT_RADIUS, SELECTION_COLOR);
                painter.circle_stroke(center, HANDLE_HIT_RADIUS, Stroke::new(1.0, Color32::WHITE));
            } else {
                let rect = Rect::from_center_size(center, vec2(8.0, 8.0));
                painter.rect_filled(rect, 2.0, SELECTION_COLOR);
                painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::WHITE));
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared polyline painter for paths, shapes and previews.
///
/// Strokes with per-point pressure are drawn segment by segment so the
/// width can vary along the line; uniform strokes go out as one shape.
fn paint_polyline(
    painter: &Painter,
    mapper: &ScreenMapper<'_>,
    points: &[PathPoint],
    style: &StrokeStyle,
    closed: bool,
) {
    if points.is_empty() {
        return;
    }

    let zoom = mapper.viewport.zoom();
    let color = style.color.gamma_multiply(style.opacity.clamp(0.0, 1.0));
    let base_width = (style.width * zoom).max(MIN_VISIBLE_STROKE_WIDTH);
    let screen: Vec<Pos2> = points.iter().map(|p| mapper.map(p.pos)).collect();

    if screen.len() == 1 {
        painter.circle_filled(screen[0], base_width / 2.0, color);
        return;
    }

    if let Some(fill) = style.fill {
        if closed {
            let fill = fill.gamma_multiply(style.opacity.clamp(0.0, 1.0));
            painter.add(Shape::convex_polygon(screen.clone(), fill, Stroke::NONE));
        }
    }

    let has_pressure = points.iter().any(|p| p.pressure.is_some());
    if has_pressure {
        for (pair, screen_pair) in points.windows(2).zip(screen.windows(2)) {
            let pressure = match (pair[0].pressure, pair[1].pressure) {
                (Some(a), Some(b)) => Some((a + b) / 2.0),
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            };
            let width = (pressure_adjusted_width(style.width, pressure) * zoom)
                .max(MIN_VISIBLE_STROKE_WIDTH);
            painter.line_segment([screen_pair[0], screen_pair[1]], Stroke::new(width, color));
        }
        return;
    }

    let stroke = Stroke::new(base_width, color);
    if let Some(dash) = &style.dash {
        let dash_len = dash.first().copied().unwrap_or(4.0) * zoom;
        let gap_len = dash.get(1).copied().unwrap_or(dash_len) * zoom;
        let mut screen = screen;
        if closed {
            screen.push(screen[0]);
        }
        painter.extend(Shape::dashed_line(&screen, stroke, dash_len, gap_len));
    } else if closed {
        painter.add(Shape::closed_line(screen, stroke));
    } else {
        painter.add(Shape::line(screen, stroke));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{StrokeStyle, factory};
    use egui::pos2;

    fn test_painter(ctx: &egui::Context) -> Painter {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn scheduler_coalesces_requests() {
        let mut scheduler = RedrawScheduler::new();
        assert!(!scheduler.take());

        scheduler.request();
        scheduler.request();
        scheduler.request();
        // Many requests collapse into a single pending redraw.
        assert!(scheduler.take());
        assert!(!scheduler.take());
    }

    #[test]
    fn paint_smoke_test() {
        let ctx = egui::Context::default();
        // Fonts are only available after a pass has begun; set one up so
        // text painting does not panic in the headless test context.
        ctx.begin_pass(Default::default());
        let painter = test_painter(&ctx);
        let renderer = Renderer::new();
        let viewport = Viewport::default();

        let mut scene = Scene::new();
        scene.add_element(factory::path(
            vec![
                PathPoint::new(pos2(0.0, 0.0)),
                PathPoint::with_pressure(pos2(10.0, 10.0), 0.5),
            ],
            StrokeStyle::default(),
        ));
        scene.add_element(factory::text(pos2(20.0, 20.0), "note", 16.0, Color32::BLACK));
        // Unloaded image must be skipped without complaint.
        scene.add_element(factory::image(pos2(50.0, 50.0), vec![1, 2, 3]));

        renderer.paint_scene(&painter, &scene, &viewport, egui::Vec2::ZERO);
        renderer.paint_selection(&painter, &scene, &viewport, egui::Vec2::ZERO);
    }
}
