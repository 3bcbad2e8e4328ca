use std::collections::{BTreeMap, HashMap};

use crate::dataset::Role;
use crate::util::last_token;

use super::filter::VisibleSet;
use super::model::GraphModel;

#[derive(Clone, Debug, PartialEq)]
pub struct FamilyCluster {
    pub id: String,
    pub members: Vec<usize>,
    pub dominant_role: Role,
    pub name: String,
}

/// Groups visible nodes joined by visible family edges. Only groups of two
/// or more are returned.
pub fn derive_clusters(model: &GraphModel, visible: &VisibleSet) -> Vec<FamilyCluster> {
    let mut parent = (0..model.nodes.len()).collect::<Vec<_>>();

    fn find(parent: &mut [usize], mut index: usize) -> usize {
        while parent[index] != index {
            parent[index] = parent[parent[index]];
            index = parent[index];
        }
        index
    }

    for &edge_index in visible.edge_indices() {
        let Some(edge) = model.edges.get(edge_index) else {
            continue;
        };
        if !edge.kind.is_family() {
            continue;
        }
        let a = find(&mut parent, edge.source);
        let b = find(&mut parent, edge.target);
        if a != b {
            parent[a.max(b)] = a.min(b);
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in visible.node_indices() {
        let root = find(&mut parent, index);
        groups.entry(root).or_default().push(index);
    }

    groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|members| describe(model, members))
        .collect()
}

fn describe(model: &GraphModel, members: Vec<usize>) -> FamilyCluster {
    let mut roles: BTreeMap<Role, usize> = BTreeMap::new();
    let mut surnames: BTreeMap<String, usize> = BTreeMap::new();
    for node in members.iter().filter_map(|&index| model.node(index)) {
        *roles.entry(node.role).or_default() += 1;
        if let Some(surname) = last_token(&node.name) {
            *surnames.entry(surname).or_default() += 1;
        }
    }

    let dominant_role = most_common(roles).unwrap_or_default();
    let name = most_common(surnames)
        .map(|surname| format!("{} family", capitalize(&surname)))
        .unwrap_or_else(|| "Family".to_owned());
    let id = members
        .iter()
        .filter_map(|&index| model.node(index))
        .map(|node| node.id.as_str())
        .min()
        .map(|first| format!("family-{first}"))
        .unwrap_or_default();

    FamilyCluster {
        id,
        members,
        dominant_role,
        name,
    }
}

/// Highest count wins; ties go to the smallest key.
fn most_common<K: Ord>(counts: BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, count) in counts {
        if best.as_ref().is_none_or(|(_, best_count)| count > *best_count) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn cluster_lookup(clusters: &[FamilyCluster]) -> HashMap<usize, usize> {
    clusters
        .iter()
        .enumerate()
        .flat_map(|(cluster, family)| family.members.iter().map(move |&node| (node, cluster)))
        .collect()
}
