use std::collections::HashMap;

use eframe::egui::{Pos2, vec2};

/// Perpendicular offsets for `count` edges sharing one node pair, centred on
/// the straight line between them.
pub fn parallel_offsets(count: usize, spacing: f32, zoom: f32) -> Vec<f32> {
    let middle = (count as f32 - 1.0) * 0.5;
    (0..count)
        .map(|slot| (slot as f32 - middle) * spacing * zoom)
        .collect()
}

/// Offset per edge, measured against the canonical (lower index to higher
/// index) direction of its node pair so reversed siblings fan out too.
pub fn edge_offsets(endpoints: &[(usize, usize)], spacing: f32, zoom: f32) -> Vec<f32> {
    let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (slot, &(source, target)) in endpoints.iter().enumerate() {
        groups
            .entry((source.min(target), source.max(target)))
            .or_default()
            .push(slot);
    }

    let mut offsets = vec![0.0; endpoints.len()];
    for members in groups.values() {
        if members.len() < 2 {
            continue;
        }
        for (&slot, offset) in members
            .iter()
            .zip(parallel_offsets(members.len(), spacing, zoom))
        {
            offsets[slot] = offset;
        }
    }
    offsets
}

/// Quadratic control point whose curve peaks `offset` pixels away from the
/// straight segment. `source_index`/`target_index` pick the canonical normal.
pub fn curve_control(
    start: Pos2,
    end: Pos2,
    source_index: usize,
    target_index: usize,
    offset: f32,
) -> Pos2 {
    let midpoint = start + (end - start) * 0.5;
    if offset == 0.0 {
        return midpoint;
    }

    let (from, to) = if source_index <= target_index {
        (start, end)
    } else {
        (end, start)
    };
    let direction = to - from;
    let length = direction.length();
    if length <= f32::EPSILON {
        return midpoint;
    }

    let normal = vec2(-direction.y, direction.x) / length;
    midpoint + normal * (offset * 2.0)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn three_siblings_are_symmetric() {
        let offsets = parallel_offsets(3, 14.0, 1.0);
        assert_eq!(offsets, vec![-14.0, 0.0, 14.0]);
        assert_eq!(offsets.iter().sum::<f32>(), 0.0);
    }

    #[test]
    fn spacing_scales_with_zoom() {
        assert_eq!(parallel_offsets(2, 10.0, 2.0), vec![-10.0, 10.0]);
    }

    #[test]
    fn only_shared_pairs_are_offset() {
        let offsets = edge_offsets(&[(0, 1), (1, 0), (1, 2)], 10.0, 1.0);
        assert_eq!(offsets[2], 0.0);
        assert_eq!(offsets[0] + offsets[1], 0.0);
        assert!(offsets[0] != offsets[1]);
    }

    #[test]
    fn reversed_siblings_bend_to_opposite_sides() {
        let a = pos2(0.0, 0.0);
        let b = pos2(100.0, 0.0);
        let forward = curve_control(a, b, 0, 1, -10.0);
        let reverse = curve_control(b, a, 1, 0, 10.0);
        assert!(forward.y * reverse.y < 0.0);
        assert_eq!(curve_control(a, b, 0, 1, 0.0), pos2(50.0, 0.0));
    }
}
