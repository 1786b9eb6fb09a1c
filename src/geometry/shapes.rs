use std::f32::consts::{PI, TAU};

use egui::{Pos2, pos2, vec2};
use serde::{Deserialize, Serialize};

/// Sample count for a full ellipse outline.
const ELLIPSE_SEGMENTS: usize = 64;
/// Sample count for each quarter-circle corner arc.
const CORNER_ARC_SEGMENTS: usize = 8;
/// Ratio of inner to outer radius for star vertices.
const STAR_INNER_RATIO: f32 = 0.4;
/// Arrow head length cap, in scene units.
const ARROW_HEAD_MAX: f32 = 20.0;
/// Arrow head half-angle.
const ARROW_HEAD_HALF_ANGLE: f32 = PI / 6.0;

/// The primitive kinds the shape tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Circle,
    Line,
    Polygon,
    Star,
    Diamond,
    Arrow,
}

impl ShapeKind {
    /// Whether the generated outline forms a closed loop. Lines and
    /// arrows stay open; everything else closes back on its first point.
    pub fn is_closed(self) -> bool {
        !matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }

    /// Whether shift-constraining to a square aspect applies to this kind.
    pub fn supports_aspect_constraint(self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle | ShapeKind::RoundedRectangle | ShapeKind::Ellipse | ShapeKind::Circle
        )
    }
}

/// Generating parameters, retained on committed shapes for re-edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSettings {
    pub kind: ShapeKind,
    /// Corner radius for rounded rectangles.
    pub corner_radius: f32,
    /// Vertex count for polygons. Must be at least 3.
    pub polygon_sides: u32,
    /// Point count for stars. Must be at least 3.
    pub star_points: u32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            corner_radius: 8.0,
            polygon_sides: 6,
            star_points: 5,
        }
    }
}

/// Generates the outline polyline for a primitive dragged from `start` to
/// `end`.
///
/// With `constrain` set (the shift-key equivalent) the rectangle family
/// and ellipse/circle use the larger absolute drag dimension for both
/// axes, preserving the drag direction sign per axis.
///
/// Malformed settings (a two-sided polygon) are a programmer error and
/// panic; they are not reachable from normal input flow.
pub fn generate_shape_path(
    start: Pos2,
    end: Pos2,
    settings: &ShapeSettings,
    constrain: bool,
) -> Vec<Pos2> {
    let end = if constrain && settings.kind.supports_aspect_constraint() {
        constrain_to_square(start, end)
    } else {
        end
    };

    match settings.kind {
        ShapeKind::Rectangle => rectangle(start, end),
        ShapeKind::RoundedRectangle => rounded_rectangle(start, end, settings.corner_radius),
        ShapeKind::Ellipse => ellipse(start, end),
        ShapeKind::Circle => circle(start, end),
        ShapeKind::Line => vec![start, end],
        ShapeKind::Polygon => {
            assert!(settings.polygon_sides >= 3, "polygon needs at least 3 sides");
            radial_vertices(start, end, settings.polygon_sides)
        }
        ShapeKind::Star => {
            assert!(settings.star_points >= 3, "star needs at least 3 points");
            star(start, end, settings.star_points)
        }
        ShapeKind::Diamond => diamond(start, end),
        ShapeKind::Arrow => arrow(start, end),
    }
}

/// Extends the shorter drag axis to match the longer one, keeping the
/// sign of each axis so the shape still grows toward the pointer.
fn constrain_to_square(start: Pos2, end: Pos2) -> Pos2 {
    let delta = end - start;
    let side = delta.x.abs().max(delta.y.abs());
    pos2(
        start.x + side.copysign(delta.x),
        start.y + side.copysign(delta.y),
    )
}

fn corners(start: Pos2, end: Pos2) -> (Pos2, Pos2) {
    (
        pos2(start.x.min(end.x), start.y.min(end.y)),
        pos2(start.x.max(end.x), start.y.max(end.y)),
    )
}

/// Four corners in clockwise winding, starting at the top-left.
fn rectangle(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    vec![
        pos2(min.x, min.y),
        pos2(max.x, min.y),
        pos2(max.x, max.y),
        pos2(min.x, max.y),
    ]
}

fn rounded_rectangle(start: Pos2, end: Pos2, corner_radius: f32) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    let width = max.x - min.x;
    let height = max.y - min.y;
    // The arc radius can never exceed half the shorter dimension.
    let radius = corner_radius.max(0.0).min(width / 2.0).min(height / 2.0);
    if radius <= 0.0 {
        return rectangle(start, end);
    }

    let mut path = Vec::with_capacity(4 * (CORNER_ARC_SEGMENTS + 2));
    // Clockwise, starting on the top edge after the top-left arc. Each
    // corner arc sweeps a quarter turn about its own center.
    let arcs = [
        (pos2(max.x - radius, min.y + radius), -PI / 2.0), // top-right
        (pos2(max.x - radius, max.y - radius), 0.0),       // bottom-right
        (pos2(min.x + radius, max.y - radius), PI / 2.0),  // bottom-left
        (pos2(min.x + radius, min.y + radius), PI),        // top-left
    ];

    path.push(pos2(min.x + radius, min.y));
    for (center, start_angle) in arcs {
        for i in 0..=CORNER_ARC_SEGMENTS {
            let angle = start_angle + (i as f32 / CORNER_ARC_SEGMENTS as f32) * (PI / 2.0);
            path.push(pos2(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    }
    path
}

fn ellipse(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    let center = pos2((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    sampled_ellipse(center, (max.x - min.x) / 2.0, (max.y - min.y) / 2.0)
}

/// Equal radii from the smaller drag dimension, anchored at the drag
/// start so the circle grows toward the pointer.
fn circle(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let delta = end - start;
    let radius = delta.x.abs().min(delta.y.abs()) / 2.0;
    let center = start + vec2(radius.copysign(delta.x), radius.copysign(delta.y));
    sampled_ellipse(center, radius, radius)
}

fn sampled_ellipse(center: Pos2, radius_x: f32, radius_y: f32) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / ELLIPSE_SEGMENTS as f32 * TAU;
            pos2(
                center.x + radius_x * angle.cos(),
                center.y + radius_y * angle.sin(),
            )
        })
        .collect()
}

/// Midpoints of the bounding-box edges: top, right, bottom, left.
fn diamond(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    let center = pos2((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    vec![
        pos2(center.x, min.y),
        pos2(max.x, center.y),
        pos2(center.x, max.y),
        pos2(min.x, center.y),
    ]
}

/// `count` vertices evenly spaced on the circle inscribed in the drag
/// bounding box, first vertex at the top (−90°).
fn radial_vertices(start: Pos2, end: Pos2, count: u32) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    let center = pos2((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let radius = ((max.x - min.x) / 2.0).min((max.y - min.y) / 2.0);

    (0..count)
        .map(|i| {
            let angle = -PI / 2.0 + i as f32 / count as f32 * TAU;
            pos2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Outer/inner vertices alternating on two rings, same angular start as
/// the polygon.
fn star(start: Pos2, end: Pos2, points: u32) -> Vec<Pos2> {
    let (min, max) = corners(start, end);
    let center = pos2((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let outer_radius = ((max.x - min.x) / 2.0).min((max.y - min.y) / 2.0);
    let inner_radius = outer_radius * STAR_INNER_RATIO;

    let mut path = Vec::with_capacity(points as usize * 2);
    for i in 0..points {
        let outer_angle = -PI / 2.0 + i as f32 / points as f32 * TAU;
        path.push(pos2(
            center.x + outer_radius * outer_angle.cos(),
            center.y + outer_radius * outer_angle.sin(),
        ));
        // Inner vertex halfway (in angle) to the next outer vertex.
        let inner_angle = -PI / 2.0 + (i as f32 + 0.5) / points as f32 * TAU;
        path.push(pos2(
            center.x + inner_radius * inner_angle.cos(),
            center.y + inner_radius * inner_angle.sin(),
        ));
    }
    path
}

/// A shaft plus a two-segment head. The polyline doubles back through the
/// tip so the whole arrow stays a single open path.
fn arrow(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let shaft = end - start;
    let length = shaft.length();
    if length == 0.0 {
        return vec![start, end];
    }

    let dir = shaft / length;
    let head_len = (length * 0.2).min(ARROW_HEAD_MAX);
    let (sin, cos) = ARROW_HEAD_HALF_ANGLE.sin_cos();

    // Rotate the reversed direction by ±the half-angle to get the barbs.
    let left = end - vec2(dir.x * cos - dir.y * sin, dir.y * cos + dir.x * sin) * head_len;
    let right = end - vec2(dir.x * cos + dir.y * sin, dir.y * cos - dir.x * sin) * head_len;

    vec![start, end, left, end, right]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(kind: ShapeKind) -> ShapeSettings {
        ShapeSettings { kind, ..ShapeSettings::default() }
    }

    #[test]
    fn rectangle_corners_in_order() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, 50.0),
            &settings(ShapeKind::Rectangle),
            false,
        );
        assert_eq!(
            path,
            vec![pos2(0.0, 0.0), pos2(100.0, 0.0), pos2(100.0, 50.0), pos2(0.0, 50.0)]
        );
        assert!(ShapeKind::Rectangle.is_closed());
    }

    #[test]
    fn rectangle_normalizes_drag_direction() {
        let forward = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(40.0, 30.0),
            &settings(ShapeKind::Rectangle),
            false,
        );
        let backward = generate_shape_path(
            pos2(40.0, 30.0),
            pos2(0.0, 0.0),
            &settings(ShapeKind::Rectangle),
            false,
        );
        assert_eq!(forward, backward);
    }

    #[test]
    fn line_is_exactly_the_two_input_points() {
        let path = generate_shape_path(
            pos2(3.0, 4.0),
            pos2(9.0, 1.0),
            &settings(ShapeKind::Line),
            false,
        );
        assert_eq!(path, vec![pos2(3.0, 4.0), pos2(9.0, 1.0)]);
        assert!(!ShapeKind::Line.is_closed());
    }

    #[test]
    fn rounded_corner_radius_never_exceeds_half_extent() {
        let mut shape = settings(ShapeKind::RoundedRectangle);
        shape.corner_radius = 500.0;
        let path = generate_shape_path(pos2(0.0, 0.0), pos2(100.0, 40.0), &shape, false);
        // Effective radius is clamped to height/2 = 20, so no sample may
        // leave the bounding box.
        for p in &path {
            assert!(p.x >= -1e-4 && p.x <= 100.0 + 1e-4);
            assert!(p.y >= -1e-4 && p.y <= 40.0 + 1e-4);
        }
    }

    #[test]
    fn circle_uses_smaller_dimension() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, 40.0),
            &settings(ShapeKind::Circle),
            false,
        );
        // Radius 20 about (20, 20).
        for p in &path {
            let r = ((p.x - 20.0).powi(2) + (p.y - 20.0).powi(2)).sqrt();
            assert!((r - 20.0).abs() < 1e-3);
        }
    }

    #[test]
    fn ellipse_uses_independent_radii() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, 40.0),
            &settings(ShapeKind::Ellipse),
            false,
        );
        assert_eq!(path.len(), 64);
        let max_x = path.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        let max_y = path.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!((max_x - 100.0).abs() < 1e-3);
        // y peak is at a sample, 64 samples hit the extreme exactly.
        assert!((max_y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn polygon_first_vertex_is_at_top() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, 100.0),
            &settings(ShapeKind::Polygon),
            false,
        );
        assert_eq!(path.len(), 6);
        assert!((path[0].x - 50.0).abs() < 1e-4);
        assert!((path[0].y - 0.0).abs() < 1e-4);
    }

    #[test]
    fn star_alternates_radii() {
        let path = generate_shape_path(
            pos2(-50.0, -50.0),
            pos2(50.0, 50.0),
            &settings(ShapeKind::Star),
            false,
        );
        assert_eq!(path.len(), 10);
        for (i, p) in path.iter().enumerate() {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            let expected = if i % 2 == 0 { 50.0 } else { 20.0 };
            assert!((r - expected).abs() < 1e-3, "vertex {i} radius {r}");
        }
    }

    #[test]
    fn diamond_uses_edge_midpoints() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(60.0, 40.0),
            &settings(ShapeKind::Diamond),
            false,
        );
        assert_eq!(
            path,
            vec![pos2(30.0, 0.0), pos2(60.0, 20.0), pos2(30.0, 40.0), pos2(0.0, 20.0)]
        );
    }

    #[test]
    fn arrow_head_is_capped() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(1000.0, 0.0),
            &settings(ShapeKind::Arrow),
            false,
        );
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], pos2(0.0, 0.0));
        assert_eq!(path[1], pos2(1000.0, 0.0));
        // 20% of the shaft would be 200; the absolute cap keeps barbs
        // within 20 units of the tip.
        for barb in [path[2], path[4]] {
            let d = (barb - path[1]).length();
            assert!((d - ARROW_HEAD_MAX).abs() < 1e-3);
        }
    }

    #[test]
    fn short_arrow_head_scales_with_shaft() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            &settings(ShapeKind::Arrow),
            false,
        );
        let d = (path[2] - path[1]).length();
        assert!((d - 2.0).abs() < 1e-3);
    }

    #[test]
    fn constrain_squares_the_drag() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, -40.0),
            &settings(ShapeKind::Rectangle),
            true,
        );
        // Larger dimension wins on both axes, signs preserved.
        assert_eq!(
            path,
            vec![
                pos2(0.0, -100.0),
                pos2(100.0, -100.0),
                pos2(100.0, 0.0),
                pos2(0.0, 0.0)
            ]
        );
    }

    #[test]
    fn constrain_does_not_apply_to_lines() {
        let path = generate_shape_path(
            pos2(0.0, 0.0),
            pos2(100.0, -40.0),
            &settings(ShapeKind::Line),
            true,
        );
        assert_eq!(path[1], pos2(100.0, -40.0));
    }
}
