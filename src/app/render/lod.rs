use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::config::EngineConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum LodLevel {
    /// No labels at all.
    Overview,
    /// Labels for the heaviest nodes and the selection.
    Partial,
    /// Every label, edge labels near the selection, role glyphs.
    Full,
}

impl LodLevel {
    pub fn for_zoom(zoom: f32, config: &EngineConfig) -> Self {
        if zoom < config.label_min_zoom {
            Self::Overview
        } else if zoom < config.label_full_zoom {
            Self::Partial
        } else {
            Self::Full
        }
    }
}

/// Nodes that get a label at `lod`. `by_weight` is visible nodes heaviest
/// first; `forced` are always labelled (selection, hover, search hits).
pub(in crate::app) fn labelled_nodes(
    lod: LodLevel,
    by_weight: &[usize],
    forced: impl IntoIterator<Item = usize>,
    top_k: usize,
) -> Vec<usize> {
    let mut nodes = match lod {
        LodLevel::Overview => return Vec::new(),
        LodLevel::Partial => by_weight.iter().copied().take(top_k).collect::<Vec<_>>(),
        LodLevel::Full => by_weight.to_vec(),
    };
    for node in forced {
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }
    nodes
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LabelRequest {
    pub node: usize,
    pub center: Pos2,
    pub radius: f32,
    pub size: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct PlacedLabel {
    pub node: usize,
    pub rect: Rect,
}

const LABEL_GAP: f32 = 4.0;

/// Greedy placement: each label, in request order, takes the candidate spot
/// around its node that overlaps already placed labels the least. Ties keep
/// the earlier candidate, so the right-hand spot wins when free.
pub(in crate::app) fn place_labels(requests: &[LabelRequest]) -> Vec<PlacedLabel> {
    let mut placed: Vec<PlacedLabel> = Vec::with_capacity(requests.len());

    for request in requests {
        let best = candidate_rects(request)
            .into_iter()
            .map(|rect| {
                let overlap = placed
                    .iter()
                    .map(|other| overlap_area(rect, other.rect))
                    .sum::<f32>();
                (rect, overlap)
            })
            .fold(None::<(Rect, f32)>, |best, candidate| match best {
                Some(best) if best.1 <= candidate.1 => Some(best),
                _ => Some(candidate),
            });

        if let Some((rect, _)) = best {
            placed.push(PlacedLabel {
                node: request.node,
                rect,
            });
        }
    }
    placed
}

fn candidate_rects(request: &LabelRequest) -> [Rect; 6] {
    let LabelRequest {
        center,
        radius,
        size,
        ..
    } = *request;
    let reach = radius + LABEL_GAP;
    let half = size * 0.5;

    [
        Rect::from_min_size(pos2(center.x + reach, center.y - half.y), size),
        Rect::from_min_size(pos2(center.x - reach - size.x, center.y - half.y), size),
        Rect::from_min_size(pos2(center.x - half.x, center.y + reach), size),
        Rect::from_min_size(pos2(center.x - half.x, center.y - reach - size.y), size),
        Rect::from_min_size(center + vec2(reach, reach) * 0.7, size),
        Rect::from_min_size(pos2(center.x - reach * 0.7 - size.x, center.y - reach * 0.7 - size.y), size),
    ]
}

fn overlap_area(a: Rect, b: Rect) -> f32 {
    let overlap = a.intersect(b);
    if overlap.is_positive() {
        overlap.area()
    } else {
        0.0
    }
}

/// Rough text box for a label, used before any glyphs are laid out.
pub(in crate::app) fn estimate_label_size(text: &str, font_size: f32) -> Vec2 {
    vec2(text.chars().count() as f32 * font_size * 0.55 + 4.0, font_size + 4.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn zoom_bands() {
        let config = EngineConfig::default();
        assert_eq!(LodLevel::for_zoom(0.2, &config), LodLevel::Overview);
        assert_eq!(LodLevel::for_zoom(0.45, &config), LodLevel::Partial);
        assert_eq!(LodLevel::for_zoom(1.39, &config), LodLevel::Partial);
        assert_eq!(LodLevel::for_zoom(1.4, &config), LodLevel::Full);
    }

    #[test]
    fn partial_band_keeps_top_k_plus_forced() {
        let by_weight = [7, 3, 9, 1];
        assert_eq!(labelled_nodes(LodLevel::Partial, &by_weight, [1, 3], 2), vec![7, 3, 1]);
        assert_eq!(labelled_nodes(LodLevel::Overview, &by_weight, [1], 2), Vec::<usize>::new());
        assert_eq!(labelled_nodes(LodLevel::Full, &by_weight, [], 2), vec![7, 3, 9, 1]);
    }

    #[test]
    fn crowded_labels_move_to_free_sides() {
        let size = vec2(60.0, 14.0);
        let requests = [
            LabelRequest {
                node: 0,
                center: pos2(100.0, 100.0),
                radius: 10.0,
                size,
            },
            LabelRequest {
                node: 1,
                center: pos2(100.0, 100.0),
                radius: 10.0,
                size,
            },
        ];

        let placed = place_labels(&requests);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].rect.min, pos2(114.0, 93.0));
        assert_eq!(overlap_area(placed[0].rect, placed[1].rect), 0.0);
        assert!(placed[1].rect.max.x <= 100.0);
    }
}
