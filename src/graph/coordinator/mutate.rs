use std::collections::HashSet;

use eframe::egui::Vec2;
use log::{debug, info};

use crate::dataset::PersonRecord;
use crate::graph::build::node_from_record;
use crate::graph::events::GraphEvent;
use crate::graph::model::shift_after_removal;
use crate::util::stable_pair;

use super::GraphCoordinator;

impl GraphCoordinator {
    /// Moves the relationships of every ghost called `ghost_name` onto
    /// `into_id` and removes those ghosts. Calling it again once they are gone
    /// does nothing.
    pub fn merge_ghost(&mut self, ghost_name: &str, into_id: &str) {
        if !self.is_ready() {
            return;
        }
        let ghosts = self.model.ghosts_named(ghost_name);
        if ghosts.is_empty() {
            debug!("no ghost named {ghost_name:?} left to merge");
            return;
        }
        let Some(target) = self.model.node_index(into_id) else {
            debug!("merge target {into_id:?} does not exist");
            return;
        };
        if self.model.nodes[target].is_ghost {
            debug!("refusing to merge {ghost_name:?} into another ghost");
            return;
        }

        // Highest index first so the remaining ghost indices stay valid.
        for &ghost in ghosts.iter().rev() {
            let Some(target) = self.model.node_index(into_id) else {
                break;
            };
            self.model
                .edges
                .retain(|edge| !(edge.touches(ghost) && edge.touches(target)));
            for edge in &mut self.model.edges {
                if edge.source == ghost {
                    edge.source = target;
                }
                if edge.target == ghost {
                    edge.target = target;
                }
            }

            self.forget_node(ghost);
            self.model.remove_node(ghost);
        }
        self.dismissed_ghosts.remove(ghost_name);
        self.apply_filters();

        info!("merged {} ghost(s) named {ghost_name:?} into {into_id}", ghosts.len());
        self.events.emit(GraphEvent::ContactRequest {
            ghost_name: ghost_name.to_owned(),
            link_to: Some(into_id.to_owned()),
        });
    }

    /// Turns every ghost called `ghost_name` into a first-class node and asks
    /// the host to create a contact for it.
    pub fn promote_ghost(&mut self, ghost_name: &str) {
        if !self.is_ready() {
            return;
        }
        let ghosts = self.model.ghosts_named(ghost_name);
        if ghosts.is_empty() {
            return;
        }

        for ghost in ghosts {
            self.model.nodes[ghost].is_ghost = false;
        }
        self.dismissed_ghosts.remove(ghost_name);
        self.apply_filters();

        info!("promoted ghost {ghost_name:?}");
        self.events.emit(GraphEvent::ContactRequest {
            ghost_name: ghost_name.to_owned(),
            link_to: None,
        });
    }

    pub fn confirm_deduced_relation(&mut self, edge_id: &str) {
        if !self.is_ready() {
            return;
        }
        let Some(edge) = self.model.edge_index(edge_id) else {
            return;
        };
        let edge = &mut self.model.edges[edge];
        if edge.confirmed == Some(true) {
            debug!("relationship {edge_id} already confirmed");
            return;
        }

        edge.confirmed = Some(true);
        self.touch();
        info!("confirmed relationship {edge_id}");
        self.events.emit(GraphEvent::RelationshipConfirmed {
            edge_id: edge_id.to_owned(),
        });
    }

    pub fn hide_node(&mut self, id: &str) {
        if !self.is_ready() || self.model.node_index(id).is_none() {
            return;
        }
        if self.hidden.insert(id.to_owned()) {
            self.apply_filters();
        }
    }

    pub fn unhide_all(&mut self) {
        if !self.is_ready() || self.hidden.is_empty() {
            return;
        }
        self.hidden.clear();
        self.apply_filters();
    }

    /// Hides every ghost called `name`. The underlying records are kept.
    pub fn dismiss_ghost(&mut self, name: &str) {
        if !self.is_ready() {
            return;
        }
        if self.dismissed_ghosts.insert(name.to_owned()) {
            debug!("dismissed ghost {name:?}");
            self.apply_filters();
        }
    }

    /// Dismisses the selected ghosts; other selected nodes are untouched.
    /// Returns how many names were dismissed.
    pub fn dismiss_selected_ghosts(&mut self) -> usize {
        if !self.is_ready() {
            return 0;
        }

        let names = self
            .selection
            .iter()
            .filter_map(|node| self.model.node(node))
            .filter(|node| node.is_ghost)
            .map(|node| node.name.clone())
            .collect::<HashSet<_>>();
        let added = names
            .into_iter()
            .filter(|name| self.dismissed_ghosts.insert(name.clone()))
            .count();
        if added > 0 {
            self.apply_filters();
        }
        added
    }

    pub fn pin_node(&mut self, id: &str) {
        self.set_pinned(id, true);
    }

    pub fn unpin_node(&mut self, id: &str) {
        self.set_pinned(id, false);
    }

    fn set_pinned(&mut self, id: &str, pinned: bool) {
        if !self.is_ready() {
            return;
        }
        if let Some(node) = self.model.node_index(id) {
            self.model.nodes[node].pinned = pinned;
            self.touch();
        }
    }

    /// Adds a person without a rebuild. The node is placed at `near`, or
    /// around the centre of the visible graph, on a free spot.
    pub fn add_node(&mut self, person: PersonRecord, near: Option<Vec2>) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }
        if self.model.node_index(&person.id).is_some() {
            debug!("person {} already in graph", person.id);
            return None;
        }

        let (jx, jy) = stable_pair(&person.id);
        let anchor = near.unwrap_or_else(|| {
            self.visible_bounds()
                .map_or(Vec2::ZERO, |bounds| bounds.center().to_vec2())
        });
        let mut position = anchor + Vec2::new(jx, jy) * 40.0;
        while self.model.nodes.iter().any(|node| node.position == position) {
            position += Vec2::new(jx.abs() + 1.0, jy.abs() + 1.0);
        }

        let mut node = node_from_record(person, false);
        node.position = position;
        let index = self.model.push_node(node);
        self.apply_filters();
        Some(index)
    }

    /// Applies one delta to `primary` and every dependent. Nothing moves if
    /// any index is out of range.
    pub fn move_group(&mut self, primary: usize, delta: Vec2, dependents: &[usize]) {
        if !self.is_ready() || !delta.is_finite() {
            return;
        }
        let count = self.model.nodes.len();
        if primary >= count || dependents.iter().any(|&node| node >= count) {
            return;
        }

        let moving = std::iter::once(primary)
            .chain(dependents.iter().copied())
            .collect::<HashSet<_>>();
        for node in moving {
            self.model.nodes[node].position += delta;
            self.pulls.remove(&node);
        }
        self.touch();
    }

    /// Drops per-index state for a node about to be removed and shifts the
    /// rest down.
    fn forget_node(&mut self, removed: usize) {
        self.selection.shift_after_removal(removed);

        let pulls = std::mem::take(&mut self.pulls);
        for (node, mut pull) in pulls {
            if node == removed {
                continue;
            }
            if pull.bridge == removed {
                self.model.nodes[node].position = pull.original;
                continue;
            }
            let (Some(node), Some(bridge)) = (
                shift_after_removal(node, removed),
                shift_after_removal(pull.bridge, removed),
            ) else {
                continue;
            };
            pull.bridge = bridge;
            self.pulls.insert(node, pull);
        }
    }
}
