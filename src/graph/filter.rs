use std::collections::HashSet;

use log::debug;

use crate::dataset::{EdgeKind, Role};

use super::model::GraphModel;

#[derive(Clone, Debug, PartialEq)]
pub struct FilterState {
    pub roles: HashSet<Role>,
    pub edge_kinds: HashSet<EdgeKind>,
    pub show_self: bool,
    pub show_ghosts: bool,
    pub show_orphans: bool,
    /// Brings dismissed ghosts back without forgetting that they were dismissed.
    pub show_dismissed: bool,
    pub family_clustering: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            roles: Role::ALL.into_iter().collect(),
            edge_kinds: EdgeKind::ALL.into_iter().collect(),
            show_self: true,
            show_ghosts: true,
            show_orphans: true,
            show_dismissed: false,
            family_clustering: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
    nodes: Vec<bool>,
    edges: Vec<usize>,
    edge_mask: Vec<bool>,
    node_count: usize,
}

impl VisibleSet {
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.get(node).copied().unwrap_or(false)
    }

    pub fn contains_edge(&self, edge: usize) -> bool {
        self.edge_mask.get(edge).copied().unwrap_or(false)
    }

    pub fn node_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, visible)| visible.then_some(index))
    }

    pub fn edge_indices(&self) -> &[usize] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

pub struct FilterInput<'a> {
    pub filters: &'a FilterState,
    pub hidden: &'a HashSet<String>,
    pub dismissed_ghosts: &'a HashSet<String>,
}

/// Recomputes which nodes and edges are shown. Positions are untouched.
pub fn compute_visible(model: &GraphModel, input: &FilterInput<'_>) -> VisibleSet {
    let filters = input.filters;
    let mut nodes = model
        .nodes
        .iter()
        .map(|node| {
            let dismissed = node.is_ghost
                && !filters.show_dismissed
                && input.dismissed_ghosts.contains(&node.name);

            filters.roles.contains(&node.role)
                && (filters.show_self || !node.is_self)
                && (filters.show_ghosts || !node.is_ghost)
                && !input.hidden.contains(&node.id)
                && !dismissed
        })
        .collect::<Vec<_>>();

    let mut edge_mask = vec![false; model.edges.len()];
    let mut dangling = 0usize;
    for (index, edge) in model.edges.iter().enumerate() {
        if !filters.edge_kinds.contains(&edge.kind) {
            continue;
        }
        let endpoints_visible = nodes.get(edge.source).copied().unwrap_or(false)
            && nodes.get(edge.target).copied().unwrap_or(false);
        if endpoints_visible {
            edge_mask[index] = true;
        } else {
            dangling += 1;
        }
    }
    if dangling > 0 {
        debug!("filtered out {dangling} edges with hidden or missing endpoints");
    }

    if !filters.show_orphans {
        let mut connected = vec![false; nodes.len()];
        for (edge, _) in model.edges.iter().zip(&edge_mask).filter(|(_, shown)| **shown) {
            connected[edge.source] = true;
            connected[edge.target] = true;
        }
        for (visible, connected) in nodes.iter_mut().zip(connected) {
            *visible &= connected;
        }
    }

    let edges = edge_mask
        .iter()
        .enumerate()
        .filter_map(|(index, shown)| shown.then_some(index))
        .collect();
    let node_count = nodes.iter().filter(|visible| **visible).count();

    VisibleSet {
        nodes,
        edges,
        edge_mask,
        node_count,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::model::fixtures::{ghost, link, person};

    fn sample() -> GraphModel {
        let mut agent = person("a", "Ann Agent", 50.0);
        agent.role = Role::Agent;
        agent.is_self = true;
        GraphModel::new(
            vec![
                agent,
                person("b", "Ben Client", 20.0),
                ghost("g", "Gus Ghost"),
                person("o", "Olive Orphan", 1.0),
            ],
            vec![
                link("ab", 0, 1, EdgeKind::Business),
                link("ag", 0, 2, EdgeKind::MentionedTogether),
            ],
        )
    }

    fn run(model: &GraphModel, filters: &FilterState, dismissed: &[&str]) -> VisibleSet {
        let hidden = HashSet::new();
        let dismissed = dismissed.iter().map(|name| name.to_string()).collect();
        compute_visible(
            model,
            &FilterInput {
                filters,
                hidden: &hidden,
                dismissed_ghosts: &dismissed,
            },
        )
    }

    #[test]
    fn default_filters_show_everything() {
        let visible = run(&sample(), &FilterState::default(), &[]);
        assert_eq!(visible.node_count(), 4);
        assert_eq!(visible.edge_indices(), &[0, 1]);
    }

    #[test]
    fn absent_role_filter_yields_empty_set() {
        let filters = FilterState {
            roles: HashSet::from([Role::Vendor]),
            ..FilterState::default()
        };
        let visible = run(&sample(), &filters, &[]);
        assert_eq!(visible.node_count(), 0);
        assert_eq!(visible.edge_count(), 0);
    }

    #[test]
    fn edges_to_hidden_nodes_are_dropped() {
        let filters = FilterState {
            show_ghosts: false,
            ..FilterState::default()
        };
        let visible = run(&sample(), &filters, &[]);
        assert!(!visible.contains(2));
        assert_eq!(visible.edge_indices(), &[0]);
        assert!(!visible.contains_edge(1));
    }

    #[test]
    fn orphans_and_self_can_be_hidden() {
        let filters = FilterState {
            show_orphans: false,
            show_self: false,
            ..FilterState::default()
        };
        let visible = run(&sample(), &filters, &[]);
        assert_eq!(visible.node_indices().collect::<Vec<_>>(), Vec::<usize>::new());
    }

    #[test]
    fn dismissed_ghosts_return_when_requested() {
        let model = sample();
        let hidden = run(&model, &FilterState::default(), &["Gus Ghost"]);
        assert!(!hidden.contains(2));

        let filters = FilterState {
            show_dismissed: true,
            ..FilterState::default()
        };
        assert!(run(&model, &filters, &["Gus Ghost"]).contains(2));
    }

    #[test]
    fn edge_kind_filter() {
        let filters = FilterState {
            edge_kinds: HashSet::from([EdgeKind::MentionedTogether]),
            ..FilterState::default()
        };
        let visible = run(&sample(), &filters, &[]);
        assert_eq!(visible.edge_indices(), &[1]);
        assert_eq!(visible.node_count(), 4);
    }
}
