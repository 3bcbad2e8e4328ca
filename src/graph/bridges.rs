use eframe::egui::{Pos2, Rect, Vec2};

use crate::spatial::circle_visible;

use super::filter::VisibleSet;
use super::model::GraphModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BridgeIndicator {
    pub node: usize,
    /// Visible connections whose other end is off-screen.
    pub distant: usize,
}

/// Counts, for every on-screen visible node, how many of its visible
/// connections end outside `rect`. `screen_positions` is indexed by node.
pub fn bridge_indicators(
    model: &GraphModel,
    visible: &VisibleSet,
    screen_positions: &[Pos2],
    screen_radii: &[f32],
    rect: Rect,
) -> Vec<BridgeIndicator> {
    let on_screen = |node: usize| match (screen_positions.get(node), screen_radii.get(node)) {
        (Some(position), Some(radius)) => circle_visible(rect, *position, *radius),
        _ => false,
    };

    visible
        .node_indices()
        .filter(|&node| on_screen(node))
        .filter_map(|node| {
            let distant = model
                .neighbors(node)
                .filter(|(edge, next)| visible.contains_edge(*edge) && !on_screen(*next))
                .count();
            (distant > 0).then_some(BridgeIndicator { node, distant })
        })
        .collect()
}

/// Where an off-screen neighbour is drawn while pulled: along its true
/// direction from the bridge, `preferred_length` pixels out, but never past
/// `rect` shrunk by `margin`.
pub fn pull_target(bridge: Pos2, neighbor: Pos2, rect: Rect, preferred_length: f32, margin: f32) -> Pos2 {
    let inner = rect.shrink(margin.min(rect.width() * 0.25).min(rect.height() * 0.25));
    let delta = neighbor - bridge;
    let length = delta.length();
    if length <= f32::EPSILON {
        return inner.clamp(bridge);
    }
    let direction = delta / length;
    let origin = inner.clamp(bridge);

    let reach = distance_to_edge(origin, direction, inner);
    let travel = preferred_length.max(0.0).min(reach).min(length);
    origin + direction * travel
}

fn distance_to_edge(origin: Pos2, direction: Vec2, rect: Rect) -> f32 {
    let axis = |position: f32, direction: f32, min: f32, max: f32| {
        if direction > f32::EPSILON {
            (max - position) / direction
        } else if direction < -f32::EPSILON {
            (min - position) / direction
        } else {
            f32::INFINITY
        }
    };

    axis(origin.x, direction.x, rect.left(), rect.right())
        .min(axis(origin.y, direction.y, rect.top(), rect.bottom()))
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::EdgeKind;
    use crate::graph::filter::{FilterInput, FilterState, compute_visible};
    use crate::graph::model::fixtures::{link, person};

    #[test]
    fn counts_offscreen_neighbours() {
        let model = GraphModel::new(
            vec![person("a", "A", 1.0), person("b", "B", 1.0), person("c", "C", 1.0)],
            vec![
                link("ab", 0, 1, EdgeKind::Business),
                link("ac", 0, 2, EdgeKind::Business),
            ],
        );
        let filters = FilterState::default();
        let empty = HashSet::new();
        let visible = compute_visible(
            &model,
            &FilterInput {
                filters: &filters,
                hidden: &empty,
                dismissed_ghosts: &empty,
            },
        );
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 200.0));
        let positions = [pos2(100.0, 100.0), pos2(150.0, 100.0), pos2(900.0, 100.0)];
        let radii = [10.0; 3];

        let bridges = bridge_indicators(&model, &visible, &positions, &radii, rect);
        assert_eq!(
            bridges,
            vec![
                BridgeIndicator { node: 0, distant: 1 },
            ]
        );
    }

    #[test]
    fn pulled_nodes_stop_at_the_viewport_edge() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 200.0));
        let target = pull_target(pos2(100.0, 100.0), pos2(1000.0, 100.0), rect, 500.0, 20.0);
        assert_eq!(target, pos2(180.0, 100.0));

        let near = pull_target(pos2(100.0, 100.0), pos2(1000.0, 100.0), rect, 40.0, 20.0);
        assert_eq!(near, pos2(140.0, 100.0));
    }
}
