use egui::{Pos2, Rect, pos2};

pub mod hit_testing;
pub mod shapes;
pub mod smoothing;

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Returns true if `point` lies inside `rect`.
///
/// The rectangle may have been built from a drag in any direction, so
/// negative extents are normalized here rather than at every call site.
pub fn point_in_rect(point: Pos2, rect: Rect) -> bool {
    normalize_rect(rect).contains(point)
}

/// Rebuilds `rect` so that `min` is the true minimum corner.
pub fn normalize_rect(rect: Rect) -> Rect {
    Rect::from_min_max(
        pos2(rect.min.x.min(rect.max.x), rect.min.y.min(rect.max.y)),
        pos2(rect.min.x.max(rect.max.x), rect.min.y.max(rect.max.y)),
    )
}

/// Distance from `point` to the segment `a`-`b`, clamped to the segment
/// endpoints. A degenerate segment (`a == b`) falls back to point distance.
pub fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_sq();
    if len_sq == 0.0 {
        return (point - a).length();
    }

    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let projection = a + seg * t;
    (point - projection).length()
}

/// Axis-aligned bounding box of a point set.
///
/// `None` is the empty-input sentinel; callers must check it before using
/// the box for hit-testing.
pub fn bounding_box(points: &[Pos2]) -> Option<Rect> {
    let first = *points.first()?;

    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Some(Rect::from_min_max(pos2(min_x, min_y), pos2(max_x, max_y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(pos2(0.0, 0.0), pos2(3.0, 4.0)), 5.0);
        assert_eq!(distance(pos2(1.0, 1.0), pos2(1.0, 1.0)), 0.0);
    }

    #[test]
    fn point_in_rect_normalizes_negative_extents() {
        // Rect dragged from bottom-right to top-left.
        let rect = Rect::from_min_size(pos2(100.0, 100.0), vec2(-50.0, -50.0));
        assert!(point_in_rect(pos2(75.0, 75.0), rect));
        assert!(!point_in_rect(pos2(25.0, 25.0), rect));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);

        // Perpendicular foot inside the segment.
        assert!((distance_to_segment(pos2(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        // Beyond either endpoint the distance is to the endpoint itself.
        assert!((distance_to_segment(pos2(-4.0, 3.0), a, b) - 5.0).abs() < 1e-6);
        assert!((distance_to_segment(pos2(14.0, 3.0), a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_degenerate_segment() {
        let p = pos2(3.0, 4.0);
        let a = pos2(0.0, 0.0);
        assert_eq!(distance_to_segment(p, a, a), 5.0);
    }

    #[test]
    fn bounding_box_of_points() {
        let points = [pos2(10.0, 40.0), pos2(-5.0, 2.0), pos2(7.0, 7.0)];
        let rect = bounding_box(&points).unwrap();
        assert_eq!(rect.min, pos2(-5.0, 2.0));
        assert_eq!(rect.max, pos2(10.0, 40.0));
    }

    #[test]
    fn bounding_box_empty_is_none() {
        assert!(bounding_box(&[]).is_none());
    }
}
