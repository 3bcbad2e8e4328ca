use eframe::egui::{Rect, Vec2};
use log::debug;

use crate::graph::bridges::pull_target;
use crate::spatial::{Viewport, circle_visible};

use super::GraphCoordinator;

/// A neighbour temporarily drawn near the viewport edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct PulledNode {
    pub original: Vec2,
    pub bridge: usize,
}

const PULL_MARGIN: f32 = 24.0;

impl GraphCoordinator {
    /// Brings the off-screen visible neighbours of `bridge` to the edge of
    /// `rect` along their true direction. Returns how many were pulled.
    pub fn pull_distant_connections(
        &mut self,
        bridge: usize,
        rect: Rect,
        viewport: &Viewport,
        average_edge_length: f32,
    ) -> usize {
        if !self.is_ready() || !self.visible.contains(bridge) {
            return 0;
        }

        let max_weight = self.model.max_weight();
        let radius_of = |weight: f32| self.config.node_radius(weight, max_weight) * viewport.scale;
        let bridge_screen = viewport.world_to_screen(rect, self.model.nodes[bridge].position);
        let preferred = average_edge_length.max(0.0) * viewport.scale;

        let moves = self
            .model
            .neighbors(bridge)
            .filter(|(edge, _)| self.visible.contains_edge(*edge))
            .filter_map(|(_, neighbor)| {
                let node = &self.model.nodes[neighbor];
                let screen = viewport.world_to_screen(rect, node.position);
                let radius = radius_of(node.weight);
                if circle_visible(rect, screen, radius) {
                    return None;
                }
                let target =
                    pull_target(bridge_screen, screen, rect, preferred, radius + PULL_MARGIN);
                Some((neighbor, viewport.screen_to_world(rect, target)))
            })
            .collect::<Vec<_>>();

        for &(neighbor, position) in &moves {
            let node = &mut self.model.nodes[neighbor];
            self.pulls.entry(neighbor).or_insert(PulledNode {
                original: node.position,
                bridge,
            });
            node.position = position;
        }
        if !moves.is_empty() {
            debug!("pulled {} connections toward {}", moves.len(), self.model.nodes[bridge].id);
            self.touch();
        }
        moves.len()
    }

    pub fn release_pulled_connections(&mut self, bridge: usize) {
        if !self.is_ready() {
            return;
        }

        let released = self
            .pulls
            .iter()
            .filter(|(_, pull)| pull.bridge == bridge)
            .map(|(&node, _)| node)
            .collect::<Vec<_>>();
        for node in &released {
            if let Some(pull) = self.pulls.remove(node) {
                self.model.nodes[*node].position = pull.original;
            }
        }
        if !released.is_empty() {
            self.touch();
        }
    }

    pub fn release_all_pulls(&mut self) {
        if !self.is_ready() || self.pulls.is_empty() {
            return;
        }

        for (node, pull) in self.pulls.drain() {
            self.model.nodes[node].position = pull.original;
        }
        self.touch();
    }

    pub fn is_pulled(&self, node: usize) -> bool {
        self.pulls.contains_key(&node)
    }

    pub fn has_pulls_from(&self, bridge: usize) -> bool {
        self.pulls.values().any(|pull| pull.bridge == bridge)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::super::testing::{ready, star};
    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    fn placed() -> GraphCoordinator {
        let (mut coordinator, _events) = ready(star());
        let layout = [
            ("h", vec2(0.0, 0.0)),
            ("l1", vec2(2000.0, 0.0)),
            ("l2", vec2(50.0, 0.0)),
            ("l3", vec2(0.0, 50.0)),
            ("l4", vec2(-50.0, 0.0)),
        ];
        for (id, position) in layout {
            if let Some(node) = coordinator.model.node_index(id) {
                coordinator.model.nodes[node].position = position;
            }
        }
        coordinator
    }

    #[test]
    fn pulls_only_offscreen_neighbours_and_restores_them() {
        let mut coordinator = placed();
        let viewport = Viewport::default();
        let hub = coordinator.model.node_index("h").expect("hub");
        let l1 = coordinator.model.node_index("l1").expect("l1");
        let l2 = coordinator.model.node_index("l2").expect("l2");

        let pulled = coordinator.pull_distant_connections(hub, canvas(), &viewport, 100.0);
        assert_eq!(pulled, 1);
        assert!(coordinator.is_pulled(l1));
        assert!(!coordinator.is_pulled(l2));
        let position = coordinator.model.nodes[l1].position;
        assert!((position - vec2(100.0, 0.0)).length() < 1e-3);

        coordinator.release_pulled_connections(hub);
        assert_eq!(coordinator.model.nodes[l1].position, vec2(2000.0, 0.0));
        assert!(!coordinator.has_pulls_from(hub));
    }

    #[test]
    fn pulling_twice_keeps_first_original() {
        let mut coordinator = placed();
        let viewport = Viewport::default();
        let hub = coordinator.model.node_index("h").expect("hub");
        let l1 = coordinator.model.node_index("l1").expect("l1");

        coordinator.pull_distant_connections(hub, canvas(), &viewport, 100.0);
        coordinator.model.nodes[l1].position = vec2(3000.0, 0.0);
        coordinator.pull_distant_connections(hub, canvas(), &viewport, 100.0);
        coordinator.release_all_pulls();
        assert_eq!(coordinator.model.nodes[l1].position, vec2(2000.0, 0.0));
    }

    #[test]
    fn average_edge_length_uses_visible_edges() {
        let coordinator = placed();
        let average = coordinator.average_edge_length().expect("edges visible");
        assert!((average - (2000.0 + 150.0) / 4.0).abs() < 1e-3);
    }
}
