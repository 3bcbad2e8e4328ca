use std::collections::HashSet;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

pub struct LayoutInput<'a> {
    pub node_ids: &'a [String],
    pub edges: &'a [(usize, usize)],
    pub node_radii: &'a [f32],
    /// Positions carried over for pinned nodes; those nodes never move.
    pub pinned: &'a [Option<Vec2>],
    /// Rough radius of the initial ring, in graph units.
    pub spread: f32,
}

/// Deterministic spring layout. Returns `None` if `cancel` is raised while
/// iterating.
pub fn force_layout(input: &LayoutInput<'_>, iterations: usize, cancel: &AtomicBool) -> Option<Vec<Vec2>> {
    let n = input.node_ids.len();
    if n == 0 {
        return Some(Vec::new());
    }

    let pinned_at = |index: usize| input.pinned.get(index).copied().flatten();
    let radius_of = |index: usize| input.node_radii.get(index).copied().unwrap_or(12.0);

    let base_radius = input.spread.max((n as f32).sqrt() * 60.0);
    let mut positions = input
        .node_ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            if let Some(pinned) = pinned_at(index) {
                return pinned;
            }
            let angle = (index as f32 / n as f32) * TAU;
            let (jx, jy) = stable_pair(id);
            let jitter = vec2(jx, jy) * (base_radius * 0.2);
            vec2(angle.cos(), angle.sin()) * base_radius + jitter
        })
        .collect::<Vec<_>>();

    let area = (base_radius * 2.2).powi(2);
    let k = (area / n as f32).sqrt().max(40.0);
    let mut temperature = (k * 2.5).max(80.0);

    for _ in 0..iterations {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }

        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(0.5);
                let direction = delta / distance;

                let min_distance = (radius_of(i) + radius_of(j)) * 2.2;
                let mut force = (k * k) / distance;
                if distance < min_distance {
                    force += (min_distance - distance) * 2.0;
                }
                disp[i] += direction * force;
                disp[j] -= direction * force;
            }
        }

        for &(from, to) in input.edges {
            if from >= n || to >= n || from == to {
                continue;
            }

            let delta = positions[from] - positions[to];
            let distance = delta.length().max(0.5);
            let direction = delta / distance;
            let force = (distance * distance) / k;

            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        for (index, position) in positions.iter_mut().enumerate() {
            if pinned_at(index).is_some() {
                continue;
            }

            let d = disp[index] - *position * 0.002;
            let length = d.length();
            if length > 0.0 {
                *position += d / length * length.min(temperature);
            }
        }

        temperature *= 0.96;
        if temperature < 0.5 {
            break;
        }
    }

    separate_coincident(&mut positions, input.pinned);
    Some(positions)
}

/// Nudges free nodes off any position already taken, so no two free nodes
/// start on top of each other.
fn separate_coincident(positions: &mut [Vec2], pinned: &[Option<Vec2>]) {
    let mut taken = HashSet::with_capacity(positions.len());
    for (index, position) in positions.iter_mut().enumerate() {
        let is_pinned = pinned.get(index).copied().flatten().is_some();
        let mut attempt = 0u32;
        while !is_pinned && taken.contains(&key(*position)) {
            attempt += 1;
            let angle = (attempt as f32) * 0.618_034 * TAU;
            *position += vec2(angle.cos(), angle.sin()) * (attempt as f32);
        }
        taken.insert(key(*position));
    }
}

fn key(position: Vec2) -> (u32, u32) {
    (position.x.to_bits(), position.y.to_bits())
}
