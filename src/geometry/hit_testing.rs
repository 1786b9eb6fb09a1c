use egui::{CursorIcon, Pos2, Rect, Vec2, pos2};

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::{self, distance, distance_to_segment, normalize_rect};
use crate::scene::Scene;

/// Padding around box-shaped elements so selection is forgiving.
pub const BOX_HIT_PADDING: f32 = 5.0;
/// Extra proximity allowed when hitting a polyline, on top of half the
/// stroke width.
pub const PATH_HIT_TOLERANCE: f32 = 5.0;
/// Half-size of the square hit zone around a transform handle; also the
/// radius of the rotation handle's circular zone.
pub const HANDLE_HIT_RADIUS: f32 = 4.0;
/// Distance of the rotation handle above the selection's top edge.
pub const ROTATION_HANDLE_OFFSET: f32 = 20.0;

/// A successful hit: the element to act on and the offset between the
/// pointer and the element's anchor. The offset is captured once and
/// reused for the whole drag so the element never jumps to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: ElementId,
    pub grab_offset: Vec2,
}

/// Topmost-first hit test across the scene.
///
/// Elements are tested in reverse z-order. Hitting a grouped child
/// promotes the hit to its outermost group. Elements with `evented`
/// cleared are transparent to the pointer.
pub fn hit_test(scene: &Scene, point: Pos2) -> Option<Hit> {
    for element in scene.elements().iter().rev() {
        if !element.evented || element.is_group() {
            continue;
        }
        if !element_contains_point(element, point) {
            continue;
        }

        let target_id = scene.outermost_group_of(element.id()).unwrap_or(element.id());
        let target = scene.find_element(target_id)?;
        let anchor = anchor_of(scene, target)?;
        return Some(Hit { id: target_id, grab_offset: point - anchor });
    }
    None
}

/// Drag anchor for offset bookkeeping: the element's own anchor, or the
/// minimum corner of the union bounds for groups.
pub fn anchor_of(scene: &Scene, element: &Element) -> Option<Pos2> {
    match element.anchor() {
        Some(anchor) => Some(anchor),
        None => scene.element_bounds(element).map(|b| b.min),
    }
}

/// Per-kind point containment.
pub fn element_contains_point(element: &Element, point: Pos2) -> bool {
    match &element.kind {
        ElementKind::Image(image) => image.bounds().contains(point),
        ElementKind::Text(text) => text.bounds().contains(point),
        ElementKind::Shape(shape) => {
            if shape.closed {
                // Closed primitives select by their padded bounding box.
                match geometry::bounding_box(&shape.path) {
                    Some(bounds) => bounds.expand(BOX_HIT_PADDING).contains(point),
                    None => false,
                }
            } else {
                polyline_hit(&shape.path, shape.style.width, point)
            }
        }
        ElementKind::Path(path) => {
            let positions: Vec<Pos2> = path.positions().collect();
            polyline_hit(&positions, path.style.width, point)
        }
        ElementKind::Group(_) => false,
    }
}

/// Cheap padded-box rejection first, then exact segment proximity
/// against half the stroke width plus the tolerance.
fn polyline_hit(points: &[Pos2], stroke_width: f32, point: Pos2) -> bool {
    let threshold = stroke_width / 2.0 + PATH_HIT_TOLERANCE;
    let Some(bounds) = geometry::bounding_box(points) else {
        return false;
    };
    if !bounds.expand(threshold).contains(point) {
        return false;
    }

    if points.len() == 1 {
        return distance(point, points[0]) <= threshold;
    }
    points
        .windows(2)
        .any(|pair| distance_to_segment(point, pair[0], pair[1]) <= threshold)
}

/// Permissive marquee containment: the element counts as inside if any
/// of its representative points falls within the (sign-normalized) rect.
pub fn marquee_contains(scene: &Scene, element: &Element, rect: Rect) -> bool {
    let rect = normalize_rect(rect);
    match &element.kind {
        ElementKind::Path(path) => path.positions().any(|p| rect.contains(p)),
        ElementKind::Shape(shape) => shape.path.iter().any(|p| rect.contains(*p)),
        ElementKind::Text(text) => rect_corners(text.bounds()).iter().any(|p| rect.contains(*p)),
        ElementKind::Image(image) => {
            rect_corners(image.bounds()).iter().any(|p| rect.contains(*p))
        }
        ElementKind::Group(group) => scene
            .resolve_leaves(&group.children)
            .iter()
            .filter_map(|id| scene.find_element(*id))
            .any(|child| marquee_contains(scene, child, rect)),
    }
}

fn rect_corners(rect: Rect) -> [Pos2; 4] {
    [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
}

/// The nine transform handles: four corners, four edges, and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRole {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Rotation,
}

impl HandleRole {
    pub fn is_rotation(self) -> bool {
        matches!(self, HandleRole::Rotation)
    }

    /// Cursor hint matching the handle's resize direction.
    pub fn cursor(self) -> CursorIcon {
        match self {
            HandleRole::TopLeft | HandleRole::BottomRight => CursorIcon::ResizeNwSe,
            HandleRole::TopRight | HandleRole::BottomLeft => CursorIcon::ResizeNeSw,
            HandleRole::Top | HandleRole::Bottom => CursorIcon::ResizeVertical,
            HandleRole::Left | HandleRole::Right => CursorIcon::ResizeHorizontal,
            HandleRole::Rotation => CursorIcon::Grab,
        }
    }

    /// Which axes this handle scales.
    pub fn scales_axes(self) -> (bool, bool) {
        match self {
            HandleRole::TopLeft
            | HandleRole::TopRight
            | HandleRole::BottomRight
            | HandleRole::BottomLeft => (true, true),
            HandleRole::Left | HandleRole::Right => (true, false),
            HandleRole::Top | HandleRole::Bottom => (false, true),
            HandleRole::Rotation => (false, false),
        }
    }

    /// The fixed point a resize scales away from: the opposite corner or
    /// edge of the original bounds.
    pub fn resize_anchor(self, bounds: Rect) -> Pos2 {
        let center = bounds.center();
        match self {
            HandleRole::TopLeft => bounds.right_bottom(),
            HandleRole::TopRight => bounds.left_bottom(),
            HandleRole::BottomRight => bounds.left_top(),
            HandleRole::BottomLeft => bounds.right_top(),
            HandleRole::Top => pos2(center.x, bounds.max.y),
            HandleRole::Bottom => pos2(center.x, bounds.min.y),
            HandleRole::Left => pos2(bounds.max.x, center.y),
            HandleRole::Right => pos2(bounds.min.x, center.y),
            HandleRole::Rotation => center,
        }
    }

    /// Where this handle sits on a selection bounding box.
    pub fn position(self, bounds: Rect) -> Pos2 {
        let center = bounds.center();
        match self {
            HandleRole::TopLeft => bounds.left_top(),
            HandleRole::Top => pos2(center.x, bounds.min.y),
            HandleRole::TopRight => bounds.right_top(),
            HandleRole::Right => pos2(bounds.max.x, center.y),
            HandleRole::BottomRight => bounds.right_bottom(),
            HandleRole::Bottom => pos2(center.x, bounds.max.y),
            HandleRole::BottomLeft => bounds.left_bottom(),
            HandleRole::Left => pos2(bounds.min.x, center.y),
            HandleRole::Rotation => pos2(center.x, bounds.min.y - ROTATION_HANDLE_OFFSET),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub role: HandleRole,
    pub center: Pos2,
}

const ALL_ROLES: [HandleRole; 9] = [
    HandleRole::TopLeft,
    HandleRole::Top,
    HandleRole::TopRight,
    HandleRole::Right,
    HandleRole::BottomRight,
    HandleRole::Bottom,
    HandleRole::BottomLeft,
    HandleRole::Left,
    HandleRole::Rotation,
];

/// Handle layout for a selection bounding box.
pub fn transform_handles(bounds: Rect) -> Vec<Handle> {
    ALL_ROLES
        .iter()
        .map(|role| Handle { role: *role, center: role.position(bounds) })
        .collect()
}

/// The handle under the pointer, if any. Box handles use a square hit
/// zone; the rotation handle a circular one of the same radius.
pub fn hovered_handle(point: Pos2, handles: &[Handle]) -> Option<Handle> {
    handles.iter().copied().find(|handle| {
        if handle.role.is_rotation() {
            distance(point, handle.center) <= HANDLE_HIT_RADIUS
        } else {
            (point.x - handle.center.x).abs() <= HANDLE_HIT_RADIUS
                && (point.y - handle.center.y).abs() <= HANDLE_HIT_RADIUS
        }
    })
}
