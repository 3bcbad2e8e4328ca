use std::collections::{HashSet, VecDeque};

use eframe::egui::Vec2;

use crate::dataset::EdgeKind;

use super::filter::VisibleSet;
use super::model::{GraphModel, shift_after_removal};

pub const HOP_UNREACHED: u8 = u8::MAX;
const HOP_CACHE_DEPTH: u8 = 2;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    selected: HashSet<usize>,
    anchor: Option<usize>,
    hop_distance: Vec<u8>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.selected.contains(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// 0 for selected nodes, 1 or 2 for their neighbourhood,
    /// [`HOP_UNREACHED`] otherwise.
    pub fn hop(&self, node: usize) -> u8 {
        self.hop_distance.get(node).copied().unwrap_or(HOP_UNREACHED)
    }

    pub(super) fn replace(&mut self, selected: HashSet<usize>, anchor: Option<usize>) {
        self.selected = selected;
        self.anchor = anchor.filter(|node| self.selected.contains(node));
    }

    pub(super) fn toggle(&mut self, node: usize) {
        if self.selected.remove(&node) {
            if self.anchor == Some(node) {
                self.anchor = self.selected.iter().copied().min();
            }
        } else {
            self.selected.insert(node);
            self.anchor = Some(node);
        }
    }

    pub(super) fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub(super) fn retain(&mut self, keep: impl Fn(usize) -> bool) {
        self.selected.retain(|&node| keep(node));
        if self.anchor.is_some_and(|anchor| !self.selected.contains(&anchor)) {
            self.anchor = None;
        }
    }

    pub(super) fn shift_after_removal(&mut self, removed: usize) {
        self.selected = self
            .selected
            .iter()
            .filter_map(|&node| shift_after_removal(node, removed))
            .collect();
        self.anchor = self.anchor.and_then(|anchor| shift_after_removal(anchor, removed));
    }

    /// Multi-source BFS from the selection over visible edges.
    pub(super) fn refresh_hops(&mut self, model: &GraphModel, visible: &VisibleSet) {
        self.hop_distance.clear();
        self.hop_distance.resize(model.nodes.len(), HOP_UNREACHED);

        let mut queue = VecDeque::new();
        for &node in &self.selected {
            if let Some(slot) = self.hop_distance.get_mut(node) {
                *slot = 0;
                queue.push_back(node);
            }
        }

        while let Some(node) = queue.pop_front() {
            let depth = self.hop_distance[node];
            if depth >= HOP_CACHE_DEPTH {
                continue;
            }
            for (edge, next) in model.neighbors(node) {
                if !visible.contains_edge(edge) || self.hop_distance[next] != HOP_UNREACHED {
                    continue;
                }
                self.hop_distance[next] = depth + 1;
                queue.push_back(next);
            }
        }
    }
}

/// Nodes within `hops` visible steps of `seed`, optionally walking only
/// edges of one kind. The seed is always included.
pub fn expand_from(
    model: &GraphModel,
    visible: &VisibleSet,
    seed: usize,
    hops: usize,
    kind: Option<EdgeKind>,
) -> HashSet<usize> {
    let mut reached = HashSet::from([seed]);
    let mut queue = VecDeque::from([(seed, 0usize)]);

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= hops {
            continue;
        }
        for (edge_index, next) in model.neighbors(node) {
            if !visible.contains_edge(edge_index) {
                continue;
            }
            if kind.is_some_and(|kind| model.edges[edge_index].kind != kind) {
                continue;
            }
            if reached.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }

    reached
}

/// The visible neighbour of `from` lying most nearly along `direction`.
/// Candidates more than 60 degrees off-axis are ignored.
pub fn nearest_in_direction(
    model: &GraphModel,
    visible: &VisibleSet,
    from: usize,
    direction: Vec2,
) -> Option<usize> {
    let origin = model.node(from)?.position;
    let axis = direction.normalized();

    model
        .neighbors(from)
        .filter(|(edge, _)| visible.contains_edge(*edge))
        .filter_map(|(_, next)| {
            let delta = model.node(next)?.position - origin;
            let distance = delta.length();
            if distance <= f32::EPSILON {
                return None;
            }
            let alignment = delta.dot(axis) / distance;
            (alignment >= 0.5).then_some((next, distance / alignment))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(next, _)| next)
}
