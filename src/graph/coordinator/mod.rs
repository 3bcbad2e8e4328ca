mod build;
mod mutate;
mod pull;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::{Rect, Vec2};

use crate::config::EngineConfig;
use crate::dataset::{EdgeKind, GraphSource};

use super::clusters::{FamilyCluster, cluster_lookup, derive_clusters};
use super::events::{EventSink, GraphEvent};
use super::filter::{FilterInput, FilterState, VisibleSet, compute_visible};
use super::model::GraphModel;
use super::selection::{SelectionState, expand_from, nearest_in_direction};

use self::build::PendingBuild;
use self::pull::PulledNode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphStatus {
    Idle,
    Computing,
    Ready,
    Failed(String),
}

/// Owns the graph model and is the only place it is mutated.
///
/// Every mutation silently does nothing unless the status is
/// [`GraphStatus::Ready`]; they are called from hover and hit-test paths
/// that may run against an empty or failed graph.
pub struct GraphCoordinator {
    source: Arc<dyn GraphSource>,
    config: EngineConfig,
    events: EventSink,
    status: GraphStatus,
    model: GraphModel,
    filters: FilterState,
    hidden: HashSet<String>,
    dismissed_ghosts: HashSet<String>,
    visible: VisibleSet,
    clusters: Vec<FamilyCluster>,
    cluster_by_node: HashMap<usize, usize>,
    selection: SelectionState,
    pulls: HashMap<usize, PulledNode>,
    pending: Option<PendingBuild>,
    generation: u64,
    revision: u64,
}

impl GraphCoordinator {
    pub fn new(source: Arc<dyn GraphSource>, config: EngineConfig, events: EventSink) -> Self {
        Self {
            source,
            config,
            events,
            status: GraphStatus::Idle,
            model: GraphModel::default(),
            filters: FilterState::default(),
            hidden: HashSet::new(),
            dismissed_ghosts: HashSet::new(),
            visible: VisibleSet::default(),
            clusters: Vec::new(),
            cluster_by_node: HashMap::new(),
            selection: SelectionState::default(),
            pulls: HashMap::new(),
            pending: None,
            generation: 0,
            revision: 0,
        }
    }

    pub fn status(&self) -> &GraphStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == GraphStatus::Ready
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The model, only while it is safe to read.
    pub fn model(&self) -> Option<&GraphModel> {
        self.is_ready().then_some(&self.model)
    }

    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    pub fn clusters(&self) -> &[FamilyCluster] {
        &self.clusters
    }

    pub fn cluster_of(&self, node: usize) -> Option<&FamilyCluster> {
        self.cluster_by_node
            .get(&node)
            .and_then(|&cluster| self.clusters.get(cluster))
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Changes take effect on the next [`GraphCoordinator::apply_filters`].
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn dismissed_names(&self) -> impl Iterator<Item = &str> {
        self.dismissed_ghosts.iter().map(String::as_str)
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Bumped whenever geometry, visibility or selection change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Recomputes visibility, clusters and the hop cache. Node positions are
    /// left alone.
    pub fn apply_filters(&mut self) {
        if !self.is_ready() {
            return;
        }

        self.visible = compute_visible(
            &self.model,
            &FilterInput {
                filters: &self.filters,
                hidden: &self.hidden,
                dismissed_ghosts: &self.dismissed_ghosts,
            },
        );
        self.clusters = if self.filters.family_clustering {
            derive_clusters(&self.model, &self.visible)
        } else {
            Vec::new()
        };
        self.cluster_by_node = cluster_lookup(&self.clusters);

        let visible = &self.visible;
        self.selection.retain(|node| visible.contains(node));
        self.selection.refresh_hops(&self.model, &self.visible);
        self.touch();
    }

    fn selection_changed(&mut self) {
        self.selection.refresh_hops(&self.model, &self.visible);
        self.touch();
    }

    /// Replaces the selection with everything within `hops` of `from`.
    pub fn expand_selection(&mut self, from: usize, hops: usize, kind: Option<EdgeKind>) {
        if !self.is_ready() || !self.visible.contains(from) {
            return;
        }

        let reached = expand_from(&self.model, &self.visible, from, hops, kind);
        self.selection.replace(reached, Some(from));
        self.selection_changed();
    }

    pub fn select_only(&mut self, node: usize) {
        if !self.is_ready() || !self.visible.contains(node) {
            return;
        }
        self.selection.replace(HashSet::from([node]), Some(node));
        self.selection_changed();
    }

    pub fn toggle_selection(&mut self, node: usize) {
        if !self.is_ready() || !self.visible.contains(node) {
            return;
        }
        self.selection.toggle(node);
        self.selection_changed();
    }

    /// Selects `nodes`, either replacing the selection or adding to it.
    pub fn select_many(&mut self, nodes: impl IntoIterator<Item = usize>, additive: bool) {
        if !self.is_ready() {
            return;
        }

        let mut selected = if additive {
            self.selection.iter().collect::<HashSet<_>>()
        } else {
            HashSet::new()
        };
        let mut last = None;
        for node in nodes.into_iter().filter(|&node| self.visible.contains(node)) {
            selected.insert(node);
            last = Some(node);
        }
        let anchor = last.or(self.selection.anchor());
        self.selection.replace(selected, anchor);
        self.selection_changed();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.selection_changed();
    }

    /// First visible node whose name contains `query`, ignoring case.
    pub fn search_first(&self, query: &str) -> Option<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || !self.is_ready() {
            return None;
        }

        self.visible
            .node_indices()
            .find(|&node| self.model.nodes[node].name.to_lowercase().contains(&needle))
    }

    /// Visible non-ghost nodes, heaviest first.
    pub fn tab_order(&self) -> Vec<usize> {
        if !self.is_ready() {
            return Vec::new();
        }

        let mut order = self
            .visible
            .node_indices()
            .filter(|&node| !self.model.nodes[node].is_ghost)
            .collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.model.nodes[a], &self.model.nodes[b]);
            b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name))
        });
        order
    }

    /// Moves the anchor to the connected node best aligned with
    /// `direction`. With no anchor the heaviest node is selected.
    pub fn step_anchor(&mut self, direction: Vec2) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }

        let next = match self.selection.anchor() {
            Some(anchor) => nearest_in_direction(&self.model, &self.visible, anchor, direction)?,
            None => self.tab_order().first().copied()?,
        };
        self.select_only(next);
        Some(next)
    }

    /// Selects the next node in [`GraphCoordinator::tab_order`], wrapping.
    pub fn cycle_tab(&mut self, backwards: bool) -> Option<usize> {
        let order = self.tab_order();
        if order.is_empty() {
            return None;
        }

        let position = self
            .selection
            .anchor()
            .and_then(|anchor| order.iter().position(|&node| node == anchor));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(at), false) => (at + 1) % order.len(),
            (Some(at), true) => (at + order.len() - 1) % order.len(),
        };
        self.select_only(order[next]);
        Some(order[next])
    }

    /// Mean graph-space length of visible edges.
    pub fn average_edge_length(&self) -> Option<f32> {
        if !self.is_ready() || self.visible.edge_count() == 0 {
            return None;
        }

        let total = self
            .visible
            .edge_indices()
            .iter()
            .map(|&edge| {
                let edge = &self.model.edges[edge];
                (self.model.nodes[edge.source].position - self.model.nodes[edge.target].position)
                    .length()
            })
            .sum::<f32>();
        Some(total / self.visible.edge_count() as f32)
    }

    pub fn navigate_to(&self, node: usize) {
        if let Some(node) = self.model().and_then(|model| model.node(node)) {
            self.events.emit(GraphEvent::NavigateTo {
                node_id: node.id.clone(),
            });
        }
    }

    /// Graph-space bounds of visible nodes, for fit-to-view.
    pub fn visible_bounds(&self) -> Option<Rect> {
        if !self.is_ready() {
            return None;
        }

        self.visible.node_indices().fold(None, |bounds: Option<Rect>, node| {
            let position = self.model.nodes[node].position.to_pos2();
            Some(match bounds {
                Some(bounds) => bounds.union(Rect::from_min_max(position, position)),
                None => Rect::from_min_max(position, position),
            })
        })
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::testing::{ready, star};
    use super::*;
    use crate::dataset::Role;

    #[test]
    fn star_graph_end_to_end() {
        let (mut coordinator, _events) = ready(star());
        assert_eq!(coordinator.visible().node_count(), 5);

        let hub = coordinator.model().and_then(|m| m.node_index("h")).expect("hub");
        coordinator.select_only(hub);
        coordinator.expand_selection(hub, 1, None);
        assert_eq!(coordinator.selection().len(), 5);
        assert_eq!(coordinator.selection().anchor(), Some(hub));

        coordinator.dismiss_ghost("Gil Four");
        assert_eq!(coordinator.visible().node_count(), 4);
        assert_eq!(coordinator.dismissed_names().collect::<Vec<_>>(), vec!["Gil Four"]);
        assert_eq!(coordinator.selection().len(), 4);

        coordinator.filters_mut().show_dismissed = true;
        coordinator.apply_filters();
        assert_eq!(coordinator.visible().node_count(), 5);
    }

    #[test]
    fn filtering_by_missing_role_is_empty() {
        let (mut coordinator, _events) = ready(star());
        coordinator.filters_mut().roles = HashSet::from([Role::Vendor]);
        coordinator.apply_filters();
        assert_eq!(coordinator.visible().node_count(), 0);
        assert_eq!(coordinator.search_first("hana"), None);
    }

    #[test]
    fn filters_do_not_move_nodes() {
        let (mut coordinator, _events) = ready(star());
        let before = coordinator
            .model()
            .map(|m| m.nodes.iter().map(|n| n.position).collect::<Vec<_>>());
        coordinator.filters_mut().show_ghosts = false;
        coordinator.apply_filters();
        let after = coordinator
            .model()
            .map(|m| m.nodes.iter().map(|n| n.position).collect::<Vec<_>>());
        assert_eq!(before, after);
    }

    #[test]
    fn search_and_tab_order() {
        let (coordinator, _events) = ready(star());
        let found = coordinator.search_first("  THREE ");
        let three = coordinator.model().and_then(|m| m.node_index("l3"));
        assert_eq!(found, three);

        let order = coordinator
            .tab_order()
            .into_iter()
            .filter_map(|node| coordinator.model().map(|m| m.nodes[node].id.clone()))
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["h", "l3", "l2", "l1"]);
    }

    #[test]
    fn keyboard_navigation() {
        let (mut coordinator, _events) = ready(star());
        let index = |coordinator: &GraphCoordinator, id: &str| {
            coordinator.model().and_then(|m| m.node_index(id))
        };

        assert_eq!(coordinator.cycle_tab(false), index(&coordinator, "h"));
        assert_eq!(coordinator.cycle_tab(false), index(&coordinator, "l3"));
        assert_eq!(coordinator.cycle_tab(true), index(&coordinator, "h"));
        assert_eq!(coordinator.cycle_tab(true), index(&coordinator, "l1"));

        coordinator.clear_selection();
        assert_eq!(coordinator.step_anchor(Vec2::X), index(&coordinator, "h"));
    }

    #[test]
    fn mutations_are_noops_before_a_build() {
        let (events, _rx) = EventSink::channel();
        let mut coordinator = GraphCoordinator::new(
            Arc::new(crate::dataset::StaticSource::new(star())),
            EngineConfig::default(),
            events,
        );
        coordinator.apply_filters();
        coordinator.expand_selection(0, 2, None);
        coordinator.merge_ghost("Gil Four", "h");
        coordinator.confirm_deduced_relation("e1");
        coordinator.release_all_pulls();
        assert_eq!(coordinator.status(), &GraphStatus::Idle);
        assert!(coordinator.model().is_none());
        assert!(coordinator.selection().is_empty());
    }
}
