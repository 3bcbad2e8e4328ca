mod fuzzy;
mod hit;
mod parallel;
mod transform;

pub use fuzzy::{levenshtein, names_compatible};
pub use hit::{
    EdgeCurve, circle_visible, circles_bounds, edge_visible, hit_test_edge, hit_test_node,
    point_in_polygon, point_segment_distance,
};
pub use parallel::{curve_control, edge_offsets, parallel_offsets};
pub use transform::{MAX_SCALE, MIN_SCALE, Viewport, clamp_scale};

/// Node radius on a square-root scale, so drawn area tracks weight.
pub fn radius_for_weight(weight: f32, max_weight: f32, min_radius: f32, max_radius: f32) -> f32 {
    if max_weight <= 0.0 || !weight.is_finite() {
        return min_radius;
    }

    let t = (weight / max_weight).clamp(0.0, 1.0);
    min_radius + (max_radius - min_radius) * t.sqrt()
}
