use eframe::egui::{Pos2, Rect, vec2};

use crate::graph::{GraphCoordinator, bridge_indicators};
use crate::spatial::{EdgeCurve, Viewport, curve_control, edge_offsets, hit_test_edge, hit_test_node};

const MIN_SCREEN_RADIUS: f32 = 2.5;
pub(in crate::app) const BADGE_RADIUS: f32 = 8.0;

/// Screen-space snapshot of the visible graph for one frame. Indexed by node
/// index; hidden nodes keep a slot so lookups stay O(1).
#[derive(Clone, Debug)]
pub(in crate::app) struct FrameGeometry {
    pub rect: Rect,
    pub screen_positions: Vec<Pos2>,
    pub screen_radii: Vec<f32>,
    /// Visible nodes in paint order, lightest first so heavy nodes sit on top.
    pub draw_order: Vec<usize>,
    /// Visible edges, in paint order.
    pub curves: Vec<EdgeCurve>,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            rect: Rect::NOTHING,
            screen_positions: Vec::new(),
            screen_radii: Vec::new(),
            draw_order: Vec::new(),
            curves: Vec::new(),
        }
    }
}

impl FrameGeometry {
    pub fn compute(coordinator: &GraphCoordinator, viewport: &Viewport, rect: Rect) -> Self {
        let Some(model) = coordinator.model() else {
            return Self {
                rect,
                ..Self::default()
            };
        };
        let config = coordinator.config();
        let visible = coordinator.visible();
        let max_weight = model.max_weight();

        let screen_positions = model
            .nodes
            .iter()
            .map(|node| viewport.world_to_screen(rect, node.position))
            .collect::<Vec<_>>();
        let screen_radii = model
            .nodes
            .iter()
            .map(|node| {
                (config.node_radius(node.weight, max_weight) * viewport.scale).max(MIN_SCREEN_RADIUS)
            })
            .collect::<Vec<_>>();

        let mut draw_order = visible.node_indices().collect::<Vec<_>>();
        draw_order.sort_by(|&a, &b| {
            model.nodes[a]
                .weight
                .total_cmp(&model.nodes[b].weight)
                .then(a.cmp(&b))
        });

        let edges = visible.edge_indices();
        let endpoints = edges
            .iter()
            .map(|&edge| (model.edges[edge].source, model.edges[edge].target))
            .collect::<Vec<_>>();
        let offsets = edge_offsets(&endpoints, config.parallel_edge_spacing, viewport.scale);
        let curves = edges
            .iter()
            .zip(endpoints)
            .zip(offsets)
            .map(|((&edge, (source, target)), offset)| {
                let start = screen_positions[source];
                let end = screen_positions[target];
                EdgeCurve {
                    edge,
                    start,
                    control: curve_control(start, end, source, target, offset),
                    end,
                }
            })
            .collect();

        Self {
            rect,
            screen_positions,
            screen_radii,
            draw_order,
            curves,
        }
    }

    pub fn node_at(&self, pointer: Pos2, padding: f32) -> Option<usize> {
        hit_test_node(
            pointer,
            &self.draw_order,
            &self.screen_positions,
            &self.screen_radii,
            padding,
        )
    }

    pub fn edge_at(&self, pointer: Pos2, threshold: f32) -> Option<usize> {
        hit_test_edge(pointer, &self.curves, threshold)
    }

    pub fn position(&self, node: usize) -> Option<Pos2> {
        self.screen_positions.get(node).copied()
    }

    pub fn radius(&self, node: usize) -> f32 {
        self.screen_radii.get(node).copied().unwrap_or(MIN_SCREEN_RADIUS)
    }

    /// Centre of the off-screen-connections badge on `node`'s upper right.
    pub fn badge_center(&self, node: usize) -> Option<Pos2> {
        let center = self.position(node)?;
        let radius = self.radius(node);
        Some(center + vec2(radius, -radius) * 0.8)
    }

    /// The selection anchor, when `pointer` is on its bridge badge.
    pub fn anchor_badge_at(&self, pointer: Pos2, coordinator: &GraphCoordinator) -> Option<usize> {
        let model = coordinator.model()?;
        let anchor = coordinator.selection().anchor()?;
        if self.badge_center(anchor)?.distance(pointer) > BADGE_RADIUS {
            return None;
        }

        bridge_indicators(
            model,
            coordinator.visible(),
            &self.screen_positions,
            &self.screen_radii,
            self.rect,
        )
        .iter()
        .any(|indicator| indicator.node == anchor)
        .then_some(anchor)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::EdgeKind;
    use crate::graph::testing::{place, ready, relation, star};

    #[test]
    fn heavier_nodes_win_hits_and_parallel_edges_curve() {
        let mut dataset = star();
        dataset
            .relationships
            .push(relation("e1b", "l1", "h", EdgeKind::Communication));
        let (coordinator, _events) = ready(dataset);
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let frame = FrameGeometry::compute(&coordinator, &Viewport::default(), rect);

        let model = coordinator.model().expect("ready");
        let hub = model.node_index("h").expect("hub");
        assert_eq!(frame.draw_order.last(), Some(&hub));
        assert_eq!(frame.node_at(frame.screen_positions[hub], 0.0), Some(hub));

        let parallel = frame
            .curves
            .iter()
            .filter(|curve| {
                let edge = &model.edges[curve.edge];
                edge.id == "e1" || edge.id == "e1b"
            })
            .collect::<Vec<_>>();
        assert_eq!(parallel.len(), 2);
        assert!(parallel[0].control.distance(parallel[1].control) > 1.0);
    }

    #[test]
    fn empty_frame_before_the_graph_is_ready() {
        let frame = FrameGeometry::default();
        assert_eq!(frame.rect, Rect::NOTHING);
        assert!(frame.draw_order.is_empty());
        assert_eq!(frame.position(0), None);
        assert_eq!(frame.badge_center(0), None);
    }

    #[test]
    fn only_the_anchor_badge_is_clickable() {
        let (mut coordinator, _events) = ready(star());
        for (id, position) in [
            ("h", vec2(0.0, 0.0)),
            ("l1", vec2(1000.0, 0.0)),
            ("l2", vec2(0.0, 150.0)),
            ("l3", vec2(-150.0, 0.0)),
            ("l4", vec2(0.0, -150.0)),
        ] {
            place(&mut coordinator, id, position);
        }
        let hub = coordinator.model().and_then(|m| m.node_index("h")).expect("hub");
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));

        let frame = FrameGeometry::compute(&coordinator, &Viewport::default(), rect);
        let badge = frame.badge_center(hub).expect("hub is drawn");
        assert_eq!(frame.anchor_badge_at(badge, &coordinator), None);

        coordinator.select_only(hub);
        assert_eq!(frame.anchor_badge_at(badge, &coordinator), Some(hub));
        assert_eq!(frame.anchor_badge_at(badge + vec2(30.0, 30.0), &coordinator), None);

        place(&mut coordinator, "l1", vec2(150.0, 0.0));
        let all_on_screen = FrameGeometry::compute(&coordinator, &Viewport::default(), rect);
        let badge = all_on_screen.badge_center(hub).expect("hub is drawn");
        assert_eq!(all_on_screen.anchor_badge_at(badge, &coordinator), None);
    }
}
