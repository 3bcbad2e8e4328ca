mod draw;
mod lod;
mod style;

use std::collections::HashSet;

use eframe::egui::{Painter, Pos2};

use crate::graph::GraphCoordinator;
use crate::spatial::Viewport;

use super::animation::Animations;
use super::frame::FrameGeometry;
use super::interaction::InteractionState;

pub(in crate::app) use lod::LodLevel;
pub(in crate::app) use style::{BACKGROUND, role_color};

/// Paint layers, in the order they are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(in crate::app) enum Layer {
    Background,
    DragGrid,
    Clusters,
    Edges,
    Shadows,
    Nodes,
    BridgeBadges,
    Labels,
    Selection,
    Marquee,
    Lasso,
    Ripple,
}

impl Layer {
    pub const ALL: [Layer; 12] = [
        Layer::Background,
        Layer::DragGrid,
        Layer::Clusters,
        Layer::Edges,
        Layer::Shadows,
        Layer::Nodes,
        Layer::BridgeBadges,
        Layer::Labels,
        Layer::Selection,
        Layer::Marquee,
        Layer::Lasso,
        Layer::Ripple,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::DragGrid => "Drag grid",
            Self::Clusters => "Family clusters",
            Self::Edges => "Edges",
            Self::Shadows => "Shadows",
            Self::Nodes => "Nodes",
            Self::BridgeBadges => "Bridge badges",
            Self::Labels => "Labels",
            Self::Selection => "Selection",
            Self::Marquee => "Marquee",
            Self::Lasso => "Lasso",
            Self::Ripple => "Ripple",
        }
    }
}

/// Frame facts that decide which layers run.
#[derive(Clone, Copy, Debug, Default)]
pub(in crate::app) struct LayerConditions {
    pub dragging: bool,
    pub clustering: bool,
    pub zoom: f32,
    pub bridge_min_zoom: f32,
    pub labels: bool,
    pub marquee: bool,
    pub lasso: bool,
    pub ripple: bool,
}

pub(in crate::app) fn layer_plan(conditions: &LayerConditions, disabled: &HashSet<Layer>) -> Vec<Layer> {
    Layer::ALL
        .into_iter()
        .filter(|layer| !disabled.contains(layer))
        .filter(|layer| match layer {
            Layer::DragGrid => conditions.dragging,
            Layer::Clusters => conditions.clustering,
            Layer::BridgeBadges => conditions.zoom >= conditions.bridge_min_zoom,
            Layer::Labels => conditions.labels,
            Layer::Marquee => conditions.marquee,
            Layer::Lasso => conditions.lasso,
            Layer::Ripple => conditions.ripple,
            _ => true,
        })
        .collect()
}

/// Everything a frame is painted from. Read-only.
pub(in crate::app) struct Scene<'a> {
    pub coordinator: &'a GraphCoordinator,
    pub frame: &'a FrameGeometry,
    pub viewport: &'a Viewport,
    pub interaction: &'a InteractionState,
    pub animations: &'a Animations,
    pub search_hits: &'a HashSet<usize>,
    pub now: f64,
}

impl Scene<'_> {
    pub fn conditions(&self) -> LayerConditions {
        let config = self.coordinator.config();
        LayerConditions {
            dragging: self.interaction.is_dragging(),
            clustering: self.coordinator.filters().family_clustering
                && !self.coordinator.clusters().is_empty(),
            zoom: self.viewport.scale,
            bridge_min_zoom: config.bridge_badge_min_zoom,
            labels: LodLevel::for_zoom(self.viewport.scale, config) != LodLevel::Overview,
            marquee: self.interaction.marquee_rect().is_some(),
            lasso: self.interaction.lasso_path().is_some(),
            ripple: self.animations.ripple(self.now).is_some(),
        }
    }

    /// Where `node` is drawn this frame; a snapped ghost sits on its target.
    pub fn screen_position(&self, node: usize) -> Option<Pos2> {
        match self.interaction.ghost_snap() {
            Some((ghost, target)) if ghost == node => self.frame.position(target),
            _ => self.frame.position(node),
        }
    }
}

pub(in crate::app) fn paint(painter: &Painter, scene: &Scene<'_>, disabled: &HashSet<Layer>) {
    for layer in layer_plan(&scene.conditions(), disabled) {
        match layer {
            Layer::Background => draw::background(painter, scene),
            Layer::DragGrid => draw::drag_grid(painter, scene),
            Layer::Clusters => draw::clusters(painter, scene),
            Layer::Edges => draw::edges(painter, scene),
            Layer::Shadows => draw::shadows(painter, scene),
            Layer::Nodes => draw::nodes(painter, scene),
            Layer::BridgeBadges => draw::bridge_badges(painter, scene),
            Layer::Labels => draw::labels(painter, scene),
            Layer::Selection => draw::selection(painter, scene),
            Layer::Marquee => draw::marquee(painter, scene),
            Layer::Lasso => draw::lasso(painter, scene),
            Layer::Ripple => draw::ripple(painter, scene),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn idle_frame_draws_base_layers_in_order() {
        let conditions = LayerConditions {
            zoom: 0.3,
            bridge_min_zoom: 0.6,
            ..LayerConditions::default()
        };
        assert_eq!(
            layer_plan(&conditions, &HashSet::new()),
            vec![
                Layer::Background,
                Layer::Edges,
                Layer::Shadows,
                Layer::Nodes,
                Layer::Selection
            ]
        );
    }

    #[test]
    fn busy_frame_keeps_strict_order_and_honours_toggles() {
        let conditions = LayerConditions {
            dragging: true,
            clustering: true,
            zoom: 1.0,
            bridge_min_zoom: 0.6,
            labels: true,
            marquee: true,
            lasso: true,
            ripple: true,
        };
        assert_eq!(layer_plan(&conditions, &HashSet::new()), Layer::ALL.to_vec());

        let disabled = HashSet::from([Layer::Shadows, Layer::Labels]);
        let plan = layer_plan(&conditions, &disabled);
        assert_eq!(plan.len(), 10);
        assert!(!plan.contains(&Layer::Shadows));
        assert!(plan.windows(2).all(|pair| {
            let position = |layer| Layer::ALL.iter().position(|candidate| *candidate == layer);
            position(pair[0]) < position(pair[1])
        }));
    }
}
