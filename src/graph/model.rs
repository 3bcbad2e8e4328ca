use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::dataset::{EdgeDirection, EdgeKind, Health, Role};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub position: Vec2,
    /// Position is user-fixed and survives re-layout.
    pub pinned: bool,
    pub weight: f32,
    pub role: Role,
    pub health: Health,
    pub is_ghost: bool,
    pub is_self: bool,
    pub thumbnail: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    pub weight: f32,
    pub label: Option<String>,
    pub confirmed: Option<bool>,
    pub direction: Option<EdgeDirection>,
}

impl GraphEdge {
    pub fn other(&self, index: usize) -> Option<usize> {
        if self.source == index {
            Some(self.target)
        } else if self.target == index {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }

    /// Unconfirmed links, plus deduced family links nobody has confirmed.
    pub fn is_tentative(&self) -> bool {
        match self.confirmed {
            Some(confirmed) => !confirmed,
            None => self.kind.is_family(),
        }
    }
}

/// Node/edge arena with id lookups and adjacency kept in step.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    index_by_id: HashMap<String, usize>,
    edge_index_by_id: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
    centrality: Vec<f32>,
    max_weight: f32,
}

impl GraphModel {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut model = Self {
            nodes,
            edges,
            ..Self::default()
        };
        model.reindex();
        model
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn edge_index(&self, id: &str) -> Option<usize> {
        self.edge_index_by_id.get(id).copied()
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn edges_of(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(edge index, neighbour index)` for every edge touching `index`.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges_of(index).iter().filter_map(move |&edge| {
            self.edges
                .get(edge)
                .and_then(|e| e.other(index))
                .map(|other| (edge, other))
        })
    }

    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    /// Degree centrality normalised to `[0, 1]`.
    pub fn centrality(&self, index: usize) -> f32 {
        self.centrality.get(index).copied().unwrap_or(0.0)
    }

    /// Indices of every ghost called `name`, ascending.
    pub fn ghosts_named(&self, name: &str) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_ghost && node.name == name)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn push_node(&mut self, node: GraphNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.reindex();
        index
    }

    /// Removes a node and every edge still touching it. Indices above
    /// `index` shift down by one.
    pub fn remove_node(&mut self, index: usize) -> Option<GraphNode> {
        if index >= self.nodes.len() {
            return None;
        }

        let removed = self.nodes.remove(index);
        self.edges.retain(|edge| !edge.touches(index));
        for edge in &mut self.edges {
            edge.source = shift_after_removal(edge.source, index).unwrap_or(edge.source);
            edge.target = shift_after_removal(edge.target, index).unwrap_or(edge.target);
        }
        self.reindex();
        Some(removed)
    }

    pub fn reindex(&mut self) {
        self.index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        self.edge_index_by_id = self
            .edges
            .iter()
            .enumerate()
            .map(|(index, edge)| (edge.id.clone(), index))
            .collect();

        self.adjacency = vec![Vec::new(); self.nodes.len()];
        for (edge_index, edge) in self.edges.iter().enumerate() {
            if let Some(list) = self.adjacency.get_mut(edge.source) {
                list.push(edge_index);
            }
            if edge.target != edge.source
                && let Some(list) = self.adjacency.get_mut(edge.target)
            {
                list.push(edge_index);
            }
        }

        let max_degree = self.adjacency.iter().map(Vec::len).max().unwrap_or(0).max(1);
        self.centrality = self
            .adjacency
            .iter()
            .map(|edges| edges.len() as f32 / max_degree as f32)
            .collect();

        self.max_weight = self
            .nodes
            .iter()
            .map(|node| node.weight)
            .fold(0.0, f32::max);
    }
}

/// Index of `index` after the element at `removed` was taken out of a `Vec`.
pub fn shift_after_removal(index: usize, removed: usize) -> Option<usize> {
    match index.cmp(&removed) {
        std::cmp::Ordering::Less => Some(index),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(index - 1),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use eframe::egui::vec2;

    use super::*;

    pub fn person(id: &str, name: &str, weight: f32) -> GraphNode {
        GraphNode {
            id: id.to_owned(),
            name: name.to_owned(),
            position: vec2(0.0, 0.0),
            pinned: false,
            weight,
            role: Role::Client,
            health: Health::Steady,
            is_ghost: false,
            is_self: false,
            thumbnail: None,
        }
    }

    pub fn ghost(id: &str, name: &str) -> GraphNode {
        GraphNode {
            is_ghost: true,
            role: Role::Other,
            ..person(id, name, 0.0)
        }
    }

    pub fn link(id: &str, source: usize, target: usize, kind: EdgeKind) -> GraphEdge {
        GraphEdge {
            id: id.to_owned(),
            source,
            target,
            kind,
            weight: 1.0,
            label: None,
            confirmed: None,
            direction: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::fixtures::{link, person};
    use super::*;

    fn chain() -> GraphModel {
        GraphModel::new(
            vec![person("a", "A", 10.0), person("b", "B", 40.0), person("c", "C", 5.0)],
            vec![
                link("ab", 0, 1, EdgeKind::Business),
                link("bc", 1, 2, EdgeKind::Referral),
            ],
        )
    }

    #[test]
    fn indices_and_adjacency_are_built() {
        let model = chain();
        assert_eq!(model.node_index("c"), Some(2));
        assert_eq!(model.edge_index("bc"), Some(1));
        assert_eq!(model.neighbors(1).collect::<Vec<_>>(), vec![(0, 0), (1, 2)]);
        assert_eq!(model.max_weight(), 40.0);
        assert_eq!(model.centrality(1), 1.0);
        assert_eq!(model.centrality(0), 0.5);
    }

    #[test]
    fn removing_a_node_drops_its_edges_and_shifts_indices() {
        let mut model = chain();
        let removed = model.remove_node(0).expect("node exists");
        assert_eq!(removed.id, "a");
        assert_eq!(model.edges.len(), 1);
        assert_eq!((model.edges[0].source, model.edges[0].target), (0, 1));
        assert_eq!(model.node_index("b"), Some(0));
        assert_eq!(model.remove_node(9), None);
    }

    #[test]
    fn tentative_edges() {
        let mut edge = link("f", 0, 1, EdgeKind::DeducedFamily);
        assert!(edge.is_tentative());
        edge.confirmed = Some(true);
        assert!(!edge.is_tentative());

        let mut edge = link("b", 0, 1, EdgeKind::Business);
        assert!(!edge.is_tentative());
        edge.confirmed = Some(false);
        assert!(edge.is_tentative());
    }

    #[test]
    fn shift_after_removal_handles_all_sides() {
        assert_eq!(shift_after_removal(1, 3), Some(1));
        assert_eq!(shift_after_removal(3, 3), None);
        assert_eq!(shift_after_removal(5, 3), Some(4));
    }
}
