use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

use eframe::egui::Vec2;
use log::{debug, warn};

use crate::config::EngineConfig;
use crate::dataset::{Dataset, PersonRecord};
use crate::layout::{LayoutInput, force_layout};

use super::model::{GraphEdge, GraphModel, GraphNode};

/// Constructs and lays out a model. `pinned` carries positions of nodes the
/// user pinned in a previous build. Returns `None` when cancelled.
pub fn build_model(
    dataset: Dataset,
    pinned: &HashMap<String, Vec2>,
    bounds: Vec2,
    config: &EngineConfig,
    cancel: &AtomicBool,
) -> Option<GraphModel> {
    let self_id = dataset.self_id.clone();
    let nodes = dataset
        .people
        .into_iter()
        .map(|person| {
            let is_self = self_id.as_deref() == Some(person.id.as_str());
            node_from_record(person, is_self)
        })
        .collect::<Vec<_>>();

    let mut model = GraphModel::new(nodes, Vec::new());

    let mut unknown_endpoints = 0usize;
    let mut self_loops = 0usize;
    for record in dataset.relationships {
        let (Some(source), Some(target)) =
            (model.node_index(&record.source), model.node_index(&record.target))
        else {
            unknown_endpoints += 1;
            continue;
        };
        if source == target {
            self_loops += 1;
            continue;
        }

        model.edges.push(GraphEdge {
            id: record.id,
            source,
            target,
            kind: record.kind,
            weight: record.confidence.clamp(0.0, 1.0),
            label: record.label,
            confirmed: record.confirmed,
            direction: record.direction,
        });
    }
    if unknown_endpoints > 0 {
        warn!("dropped {unknown_endpoints} relationships referencing unknown people");
    }
    if self_loops > 0 {
        debug!("dropped {self_loops} self-referencing relationships");
    }
    model.reindex();

    let ids = model.nodes.iter().map(|node| node.id.clone()).collect::<Vec<_>>();
    let endpoints = model
        .edges
        .iter()
        .map(|edge| (edge.source, edge.target))
        .collect::<Vec<_>>();
    let max_weight = model.max_weight();
    let radii = model
        .nodes
        .iter()
        .map(|node| config.node_radius(node.weight, max_weight))
        .collect::<Vec<_>>();
    let pinned_positions = ids.iter().map(|id| pinned.get(id).copied()).collect::<Vec<_>>();

    let positions = force_layout(
        &LayoutInput {
            node_ids: &ids,
            edges: &endpoints,
            node_radii: &radii,
            pinned: &pinned_positions,
            spread: bounds.min_elem().max(200.0) * 0.45,
        },
        config.layout_iterations,
        cancel,
    )?;

    for ((node, position), carried) in model
        .nodes
        .iter_mut()
        .zip(positions)
        .zip(pinned_positions)
    {
        node.position = position;
        node.pinned = carried.is_some();
    }

    Some(model)
}

pub fn node_from_record(person: PersonRecord, is_self: bool) -> GraphNode {
    let weight = if person.production.is_finite() {
        person.production.max(0.0)
    } else {
        0.0
    };

    GraphNode {
        id: person.id,
        name: person.name,
        position: Vec2::ZERO,
        pinned: false,
        weight,
        role: person.role,
        health: person.health,
        is_ghost: person.is_ghost,
        is_self,
        thumbnail: person.thumbnail,
    }
}
