/// Tunables shared by the coordinator, the interaction layer and the
/// rendering pipeline.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub layout_iterations: usize,
    pub min_node_radius: f32,
    pub max_node_radius: f32,
    /// Extra pixels around a node's radius that still count as a hit.
    pub hit_padding: f32,
    pub edge_hit_threshold: f32,
    /// Perpendicular gap between parallel edges at zoom 1.
    pub parallel_edge_spacing: f32,
    pub ghost_snap_radius: f32,
    /// Below this zoom no labels are drawn.
    pub label_min_zoom: f32,
    /// At or above this zoom every label, edge labels and role glyphs are drawn.
    pub label_full_zoom: f32,
    pub label_top_k: usize,
    pub bridge_badge_min_zoom: f32,
    pub ripple_duration_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout_iterations: 220,
            min_node_radius: 10.0,
            max_node_radius: 34.0,
            hit_padding: 4.0,
            edge_hit_threshold: 6.0,
            parallel_edge_spacing: 14.0,
            ghost_snap_radius: 48.0,
            label_min_zoom: 0.45,
            label_full_zoom: 1.4,
            label_top_k: 12,
            bridge_badge_min_zoom: 0.6,
            ripple_duration_secs: 0.9,
        }
    }
}

impl EngineConfig {
    pub fn node_radius(&self, weight: f32, max_weight: f32) -> f32 {
        crate::spatial::radius_for_weight(
            weight,
            max_weight,
            self.min_node_radius,
            self.max_node_radius,
        )
    }
}
