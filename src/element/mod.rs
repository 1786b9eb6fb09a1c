use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry;

mod group;
mod image;
mod path;
mod shape;
mod text;

pub use group::GroupElement;
pub use image::{ImageElement, PENDING_IMAGE_SIZE};
pub use path::{LineCap, LineJoin, PathElement, PathPoint, StrokeStyle};
pub use shape::ShapeElement;
pub use text::{TextElement, TextVariant};

/// Stable element identity. V4 ids are unique for the lifetime of the
/// scene and are never reused after deletion.
pub type ElementId = Uuid;

/// Mirror axis for the flip operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror x-coordinates about a vertical axis.
    Horizontal,
    /// Mirror y-coordinates about a horizontal axis.
    Vertical,
}

/// One drawing element: shared attributes plus a kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    id: ElementId,
    /// Locked elements cannot be deleted, duplicated, resized or rotated.
    /// They remain movable and selectable unless the movement axes are
    /// locked separately.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub lock_movement_x: bool,
    #[serde(default)]
    pub lock_movement_y: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default = "default_true")]
    pub evented: bool,
    pub kind: ElementKind,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    Path(PathElement),
    Shape(ShapeElement),
    Text(TextElement),
    Image(ImageElement),
    Group(GroupElement),
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            locked: false,
            lock_movement_x: false,
            lock_movement_y: false,
            selectable: true,
            evented: true,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Copy of this element under a fresh id; ids are never shared or
    /// reused, so a clone must not keep the original's.
    pub fn duplicate(&self) -> Element {
        Element { id: Uuid::new_v4(), ..self.clone() }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Path(_) => "path",
            ElementKind::Shape(_) => "shape",
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Group(_) => "group",
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group(_))
    }

    /// Drag anchor: the element's position, or the first path point for
    /// path-carrying elements. Groups have no geometry of their own.
    pub fn anchor(&self) -> Option<Pos2> {
        match &self.kind {
            ElementKind::Path(path) => path.points.first().map(|p| p.pos),
            ElementKind::Shape(shape) => shape.path.first().copied(),
            ElementKind::Text(text) => Some(text.position),
            ElementKind::Image(image) => Some(image.position),
            ElementKind::Group(_) => None,
        }
    }

    /// Bounding box of this element's own geometry. `None` for groups
    /// (resolved at scene level) and for path elements with no points.
    pub fn own_bounds(&self) -> Option<Rect> {
        match &self.kind {
            ElementKind::Path(path) => {
                geometry::bounding_box(&path.positions().collect::<Vec<_>>())
            }
            ElementKind::Shape(shape) => geometry::bounding_box(&shape.path),
            ElementKind::Text(text) => Some(text.bounds()),
            ElementKind::Image(image) => Some(image.bounds()),
            ElementKind::Group(_) => None,
        }
    }

    /// Moves the element's geometry. Axis locks are enforced by the
    /// mutation engine, not here.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.kind {
            ElementKind::Path(path) => path.translate(delta),
            ElementKind::Shape(shape) => shape.translate(delta),
            ElementKind::Text(text) => text.translate(delta),
            ElementKind::Image(image) => image.translate(delta),
            ElementKind::Group(_) => {}
        }
    }

    /// Scales the element's geometry away from `anchor`.
    pub fn scale_about(&mut self, anchor: Pos2, scale_x: f32, scale_y: f32) {
        match &mut self.kind {
            ElementKind::Path(path) => path.scale_about(anchor, scale_x, scale_y),
            ElementKind::Shape(shape) => shape.scale_about(anchor, scale_x, scale_y),
            ElementKind::Text(text) => text.scale_about(anchor, scale_x, scale_y),
            ElementKind::Image(image) => image.scale_about(anchor, scale_x, scale_y),
            ElementKind::Group(_) => {}
        }
    }

    /// Rotates path geometry about `center`. Elements that carry only a
    /// position (text, image) orbit their anchor; they have no stored
    /// rotation of their own.
    pub fn rotate_about(&mut self, center: Pos2, angle: f32) {
        match &mut self.kind {
            ElementKind::Path(path) => path.rotate_about(center, angle),
            ElementKind::Shape(shape) => shape.rotate_about(center, angle),
            ElementKind::Text(text) => text.position = rotate_point(text.position, center, angle),
            ElementKind::Image(image) => {
                image.position = rotate_point(image.position, center, angle);
            }
            ElementKind::Group(_) => {}
        }
    }

    /// Reflects geometry about the given axis through `center`. Path
    /// elements mirror every point; position-only elements mirror their
    /// anchor point.
    pub fn flip_about(&mut self, axis: FlipAxis, center: Pos2) {
        let mirror = |pos: &mut Pos2| match axis {
            FlipAxis::Horizontal => pos.x = 2.0 * center.x - pos.x,
            FlipAxis::Vertical => pos.y = 2.0 * center.y - pos.y,
        };

        match &mut self.kind {
            ElementKind::Path(path) => {
                for point in &mut path.points {
                    mirror(&mut point.pos);
                }
            }
            ElementKind::Shape(shape) => {
                for point in &mut shape.path {
                    mirror(point);
                }
            }
            ElementKind::Text(text) => mirror(&mut text.position),
            ElementKind::Image(image) => mirror(&mut image.position),
            ElementKind::Group(_) => {}
        }
    }
}

fn rotate_point(pos: Pos2, center: Pos2, angle: f32) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    let dx = pos.x - center.x;
    let dy = pos.y - center.y;
    Pos2::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn path(points: Vec<PathPoint>, style: StrokeStyle) -> Element {
        Element::new(ElementKind::Path(PathElement::new(points, style)))
    }

    pub fn shape(
        settings: crate::geometry::shapes::ShapeSettings,
        path: Vec<Pos2>,
        style: StrokeStyle,
    ) -> Element {
        Element::new(ElementKind::Shape(ShapeElement::new(settings, path, style)))
    }

    pub fn text(position: Pos2, content: impl Into<String>, font_size: f32, color: egui::Color32) -> Element {
        Element::new(ElementKind::Text(TextElement::new(position, content, font_size, color)))
    }

    pub fn image(position: Pos2, data: Vec<u8>) -> Element {
        Element::new(ElementKind::Image(ImageElement::new(position, data)))
    }

    pub fn group(children: Vec<ElementId>) -> Element {
        Element::new(ElementKind::Group(GroupElement::new(children)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn ids_are_unique() {
        let a = factory::text(pos2(0.0, 0.0), "a", 16.0, egui::Color32::BLACK);
        let b = factory::text(pos2(0.0, 0.0), "b", 16.0, egui::Color32::BLACK);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn anchor_is_first_path_point() {
        let el = factory::path(
            vec![PathPoint::new(pos2(3.0, 4.0)), PathPoint::new(pos2(9.0, 9.0))],
            StrokeStyle::default(),
        );
        assert_eq!(el.anchor(), Some(pos2(3.0, 4.0)));
    }

    #[test]
    fn translate_moves_every_path_point() {
        let mut el = factory::path(
            vec![PathPoint::new(pos2(0.0, 0.0)), PathPoint::new(pos2(10.0, 0.0))],
            StrokeStyle::default(),
        );
        el.translate(egui::vec2(5.0, -2.0));
        match &el.kind {
            ElementKind::Path(p) => {
                assert_eq!(p.points[0].pos, pos2(5.0, -2.0));
                assert_eq!(p.points[1].pos, pos2(15.0, -2.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn flip_mirrors_about_center() {
        let mut el = factory::path(
            vec![PathPoint::new(pos2(0.0, 0.0)), PathPoint::new(pos2(10.0, 4.0))],
            StrokeStyle::default(),
        );
        el.flip_about(FlipAxis::Horizontal, pos2(5.0, 0.0));
        match &el.kind {
            ElementKind::Path(p) => {
                assert_eq!(p.points[0].pos, pos2(10.0, 0.0));
                assert_eq!(p.points[1].pos, pos2(0.0, 4.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn image_bounds_are_centered() {
        let el = factory::image(pos2(50.0, 50.0), vec![0u8; 4]);
        let bounds = el.own_bounds().unwrap();
        assert_eq!(bounds.center(), pos2(50.0, 50.0));
        assert_eq!(bounds.size(), PENDING_IMAGE_SIZE);
    }

    #[test]
    fn empty_path_has_no_bounds() {
        let el = factory::path(Vec::new(), StrokeStyle::default());
        assert!(el.own_bounds().is_none());
    }
}
