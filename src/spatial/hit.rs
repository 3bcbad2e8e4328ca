use eframe::egui::{Pos2, Rect, Vec2, vec2};

const CURVE_HIT_SEGMENTS: usize = 12;

/// Screen-space geometry of one rendered edge. `control` equals the midpoint
/// for straight edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
    pub edge: usize,
    pub start: Pos2,
    pub control: Pos2,
    pub end: Pos2,
}

impl EdgeCurve {
    pub fn point_at(&self, t: f32) -> Pos2 {
        let u = 1.0 - t;
        let v = self.start.to_vec2() * (u * u)
            + self.control.to_vec2() * (2.0 * u * t)
            + self.end.to_vec2() * (t * t);
        v.to_pos2()
    }

    pub fn distance_to(&self, point: Pos2) -> f32 {
        let mut best = f32::INFINITY;
        let mut previous = self.start;
        for step in 1..=CURVE_HIT_SEGMENTS {
            let next = self.point_at(step as f32 / CURVE_HIT_SEGMENTS as f32);
            best = best.min(point_segment_distance(point, previous, next));
            previous = next;
        }
        best
    }

    pub fn midpoint(&self) -> Pos2 {
        self.point_at(0.5)
    }
}

pub fn point_segment_distance(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(a);
    }

    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Returns the topmost node under `pointer`. `draw_order` lists node indices
/// in paint order, so it is walked back to front.
pub fn hit_test_node(
    pointer: Pos2,
    draw_order: &[usize],
    screen_positions: &[Pos2],
    screen_radii: &[f32],
    padding: f32,
) -> Option<usize> {
    draw_order.iter().rev().copied().find(|&index| {
        match (screen_positions.get(index), screen_radii.get(index)) {
            (Some(position), Some(radius)) => position.distance(pointer) <= radius + padding,
            _ => false,
        }
    })
}

pub fn hit_test_edge(pointer: Pos2, curves: &[EdgeCurve], threshold: f32) -> Option<usize> {
    curves
        .iter()
        .rev()
        .find(|curve| curve.distance_to(pointer) <= threshold)
        .map(|curve| curve.edge)
}

pub fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    (0..4).any(|side| segments_intersect(start, end, corners[side], corners[(side + 1) % 4]))
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

/// Even-odd containment test for the lasso path.
pub fn point_in_polygon(point: Pos2, polygon: &[Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Bounding box around a set of circles, grown by `padding`.
pub fn circles_bounds(circles: impl IntoIterator<Item = (Pos2, f32)>, padding: f32) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for (center, radius) in circles {
        let circle = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
        bounds = Some(match bounds {
            Some(existing) => existing.union(circle),
            None => circle,
        });
    }
    bounds.map(|rect| rect.expand2(vec2(padding, padding)))
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn topmost_node_wins_when_overlapping() {
        let positions = [pos2(100.0, 100.0), pos2(104.0, 100.0)];
        let radii = [12.0, 12.0];
        let hit = hit_test_node(pos2(102.0, 100.0), &[0, 1], &positions, &radii, 4.0);
        assert_eq!(hit, Some(1));

        let hit = hit_test_node(pos2(102.0, 100.0), &[1, 0], &positions, &radii, 4.0);
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn node_hit_includes_padding() {
        let positions = [pos2(0.0, 0.0)];
        let radii = [10.0];
        assert_eq!(hit_test_node(pos2(13.5, 0.0), &[0], &positions, &radii, 4.0), Some(0));
        assert_eq!(hit_test_node(pos2(14.5, 0.0), &[0], &positions, &radii, 4.0), None);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(point_segment_distance(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(point_segment_distance(pos2(2.0, 2.0), a, a), 8.0_f32.sqrt());
    }

    #[test]
    fn curved_edge_hit_follows_the_bulge() {
        let curve = EdgeCurve {
            edge: 7,
            start: pos2(0.0, 0.0),
            control: pos2(50.0, 40.0),
            end: pos2(100.0, 0.0),
        };
        let bulge = curve.midpoint();
        assert_eq!(bulge, pos2(50.0, 20.0));
        assert_eq!(hit_test_edge(pos2(50.0, 21.0), &[curve], 6.0), Some(7));
        assert_eq!(hit_test_edge(pos2(50.0, 0.0), &[curve], 6.0), None);
    }

    #[test]
    fn lasso_containment() {
        let square = [
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        assert!(point_in_polygon(pos2(5.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(15.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn offscreen_edges_are_culled() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, 150.0), 0.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-20.0, 50.0), 10.0));
    }

    #[test]
    fn bounds_cover_all_circles() {
        let bounds = circles_bounds([(pos2(0.0, 0.0), 5.0), (pos2(20.0, 10.0), 2.0)], 1.0)
            .expect("non-empty");
        assert_eq!(bounds, Rect::from_min_max(pos2(-6.0, -6.0), pos2(23.0, 13.0)));
        assert_eq!(circles_bounds(std::iter::empty(), 1.0), None);
    }
}
