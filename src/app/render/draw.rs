use std::f32::consts::TAU;

use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2, vec2};

use crate::app::frame::BADGE_RADIUS;
use crate::dataset::EdgeDirection;
use crate::graph::bridge_indicators;
use crate::spatial::{EdgeCurve, circle_visible, circles_bounds, edge_visible};

use super::Scene;
use super::lod::{LabelRequest, LodLevel, estimate_label_size, labelled_nodes, place_labels};
use super::style::{
    BACKGROUND, HOVER, LABEL, SEARCH_HIT, SELECTED, blend_color, edge_color, focus_context,
    health_stroke, role_color, with_opacity,
};

const CURVE_SAMPLES: usize = 16;
const GHOST_OUTLINE_SEGMENTS: usize = 28;
const LABEL_FONT_SIZE: f32 = 12.0;

fn grid(painter: &Painter, rect: Rect, origin: Pos2, step: f32, stroke: Stroke) {
    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn background(painter: &Painter, scene: &Scene<'_>) {
    let rect = scene.frame.rect;
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (56.0 * scene.viewport.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = scene.viewport.world_to_screen(rect, Vec2::ZERO);
    grid(
        painter,
        rect,
        origin,
        step,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
    );
}

pub(super) fn drag_grid(painter: &Painter, scene: &Scene<'_>) {
    let rect = scene.frame.rect;
    let step = (28.0 * scene.viewport.scale).clamp(10.0, 80.0);
    let origin = scene.viewport.world_to_screen(rect, Vec2::ZERO);
    grid(
        painter,
        rect,
        origin,
        step,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(103, 196, 255, 38)),
    );
}

pub(super) fn clusters(painter: &Painter, scene: &Scene<'_>) {
    let frame = scene.frame;
    for cluster in scene.coordinator.clusters() {
        let circles = cluster
            .members
            .iter()
            .filter_map(|&node| Some((scene.screen_position(node)?, frame.radius(node))));
        let Some(bounds) = circles_bounds(circles, 14.0 * scene.viewport.scale.sqrt()) else {
            continue;
        };
        if !bounds.intersects(frame.rect) {
            continue;
        }

        let color = role_color(cluster.dominant_role);
        painter.rect_filled(bounds, 18.0, with_opacity(color, 0.08));
        painter.rect_stroke(
            bounds,
            18.0,
            Stroke::new(1.2, with_opacity(color, 0.55)),
            StrokeKind::Outside,
        );
        painter.text(
            bounds.left_top() + vec2(10.0, -4.0),
            Align2::LEFT_BOTTOM,
            &cluster.name,
            FontId::proportional(11.0),
            with_opacity(color, 0.9),
        );
    }
}

fn curve_points(curve: &EdgeCurve) -> Vec<Pos2> {
    (0..=CURVE_SAMPLES)
        .map(|step| curve.point_at(step as f32 / CURVE_SAMPLES as f32))
        .collect()
}

fn arrow_head(painter: &Painter, curve: &EdgeCurve, towards_end: bool, stroke: Stroke) {
    let (tip, behind) = if towards_end {
        (curve.point_at(0.82), curve.point_at(0.76))
    } else {
        (curve.point_at(0.18), curve.point_at(0.24))
    };
    let direction = (tip - behind).normalized();
    if !direction.is_finite() {
        return;
    }

    let size = 4.0 + stroke.width * 2.0;
    let back = tip - direction * size;
    let side = direction.rot90() * (size * 0.5);
    painter.add(Shape::convex_polygon(
        vec![tip, back + side, back - side],
        stroke.color,
        Stroke::NONE,
    ));
}

pub(super) fn edges(painter: &Painter, scene: &Scene<'_>) {
    let Some(model) = scene.coordinator.model() else {
        return;
    };
    let rect = scene.frame.rect;
    let selection = scene.coordinator.selection();
    let has_selection = !selection.is_empty();
    let width_scale = scene.viewport.scale.sqrt().clamp(0.5, 2.0);

    for curve in &scene.frame.curves {
        let Some(edge) = model.edges.get(curve.edge) else {
            continue;
        };
        let bulge = (curve.control - curve.midpoint()).length();
        if !edge_visible(rect, curve.start, curve.end, bulge + 2.0) {
            continue;
        }

        let hop = selection.hop(edge.source).min(selection.hop(edge.target));
        let (opacity, _) = focus_context(hop, has_selection);
        let hovered = scene.interaction.hovered_edge == Some(curve.edge)
            || scene
                .interaction
                .hovered
                .is_some_and(|node| edge.touches(node));

        let mut width = (0.8 + edge.weight * 1.6) * width_scale;
        let mut color = with_opacity(edge_color(edge.kind), opacity * (0.45 + edge.weight * 0.45));
        if hovered {
            width += 1.2;
            color = blend_color(color, HOVER, 0.5);
        }
        let stroke = Stroke::new(width, color);
        let straight = bulge < 0.5;

        if edge.is_tentative() {
            let points = if straight {
                vec![curve.start, curve.end]
            } else {
                curve_points(curve)
            };
            painter.extend(Shape::dashed_line(&points, stroke, 6.0, 4.0));
        } else if straight {
            painter.line_segment([curve.start, curve.end], stroke);
        } else {
            painter.add(QuadraticBezierShape::from_points_stroke(
                [curve.start, curve.control, curve.end],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }

        match edge.direction {
            Some(EdgeDirection::Forward) => arrow_head(painter, curve, true, stroke),
            Some(EdgeDirection::Backward) => arrow_head(painter, curve, false, stroke),
            Some(EdgeDirection::Mutual) => {
                arrow_head(painter, curve, true, stroke);
                arrow_head(painter, curve, false, stroke);
            }
            None => {}
        }
    }
}

pub(super) fn shadows(painter: &Painter, scene: &Scene<'_>) {
    let Some(model) = scene.coordinator.model() else {
        return;
    };
    let selection = scene.coordinator.selection();
    let has_selection = !selection.is_empty();
    let offset = vec2(1.5, 2.5) * scene.viewport.scale.sqrt().clamp(0.6, 2.0);

    for &node in &scene.frame.draw_order {
        if model.nodes[node].is_ghost {
            continue;
        }
        let Some(center) = scene.screen_position(node) else {
            continue;
        };
        let (opacity, scale) = focus_context(selection.hop(node), has_selection);
        let radius = scene.frame.radius(node) * scale;
        if !circle_visible(scene.frame.rect, center + offset, radius) {
            continue;
        }
        painter.circle_filled(
            center + offset,
            radius,
            Color32::from_rgba_unmultiplied(0, 0, 0, (70.0 * opacity) as u8),
        );
    }
}

fn ghost_outline(painter: &Painter, center: Pos2, radius: f32, stroke: Stroke, phase: f32) {
    let points = (0..=GHOST_OUTLINE_SEGMENTS)
        .map(|step| {
            let angle = step as f32 / GHOST_OUTLINE_SEGMENTS as f32 * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect::<Vec<_>>();
    painter.extend(Shape::dashed_line_with_offset(
        &points,
        stroke,
        &[6.0],
        &[4.0],
        phase,
    ));
}

pub(super) fn nodes(painter: &Painter, scene: &Scene<'_>) {
    let Some(model) = scene.coordinator.model() else {
        return;
    };
    let config = scene.coordinator.config();
    let rect = scene.frame.rect;
    let selection = scene.coordinator.selection();
    let has_selection = !selection.is_empty();
    let lod = LodLevel::for_zoom(scene.viewport.scale, config);

    for &node in &scene.frame.draw_order {
        let data = &model.nodes[node];
        let Some(center) = scene.screen_position(node) else {
            continue;
        };
        let (opacity, scale) = focus_context(selection.hop(node), has_selection);
        let radius = scene.frame.radius(node) * scale;
        if !circle_visible(rect, center, radius + 4.0) {
            continue;
        }

        let mut fill = role_color(data.role);
        if scene.interaction.hovered == Some(node) {
            fill = blend_color(fill, HOVER, 0.35);
        }
        if scene.search_hits.contains(&node) {
            fill = blend_color(fill, SEARCH_HIT, 0.5);
        }

        if data.is_ghost {
            painter.circle_filled(center, radius, with_opacity(fill, opacity * 0.22));
            ghost_outline(
                painter,
                center,
                radius,
                Stroke::new(1.4, with_opacity(fill, opacity)),
                scene.animations.ant_phase(),
            );
        } else {
            painter.circle_filled(center, radius, with_opacity(fill, opacity));
            let health = health_stroke(data.health);
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(health.width, with_opacity(health.color, opacity)),
            );
        }

        if data.is_self {
            painter.circle_stroke(
                center,
                radius + 3.0,
                Stroke::new(1.0, with_opacity(Color32::WHITE, opacity * 0.8)),
            );
        }
        if scene.search_hits.contains(&node) {
            painter.circle_stroke(center, radius + 5.0, Stroke::new(1.5, SEARCH_HIT));
        }
        if data.pinned {
            let corner = center + vec2(radius, -radius) * 0.72;
            painter.circle_filled(corner, 3.0, with_opacity(Color32::WHITE, opacity));
        }
        if lod == LodLevel::Full && radius >= 8.0 {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                data.role.glyph(),
                FontId::monospace((radius * 0.9).clamp(8.0, 18.0)),
                with_opacity(Color32::from_gray(20), opacity),
            );
        }
    }
}

pub(super) fn bridge_badges(painter: &Painter, scene: &Scene<'_>) {
    let Some(model) = scene.coordinator.model() else {
        return;
    };
    let frame = scene.frame;
    let indicators = bridge_indicators(
        model,
        scene.coordinator.visible(),
        &frame.screen_positions,
        &frame.screen_radii,
        frame.rect,
    );

    for indicator in indicators {
        let Some(badge) = frame.badge_center(indicator.node) else {
            continue;
        };
        let color = if scene.coordinator.has_pulls_from(indicator.node) {
            SELECTED
        } else {
            Color32::from_rgb(72, 84, 100)
        };
        painter.circle_filled(badge, BADGE_RADIUS, color);
        painter.text(
            badge,
            Align2::CENTER_CENTER,
            indicator.distant.to_string(),
            FontId::proportional(10.0),
            Color32::WHITE,
        );
    }
}

pub(super) fn labels(painter: &Painter, scene: &Scene<'_>) {
    let Some(model) = scene.coordinator.model() else {
        return;
    };
    let config = scene.coordinator.config();
    let frame = scene.frame;
    let selection = scene.coordinator.selection();
    let has_selection = !selection.is_empty();
    let lod = LodLevel::for_zoom(scene.viewport.scale, config);

    let on_screen = |node: usize| {
        frame
            .position(node)
            .is_some_and(|at| circle_visible(frame.rect, at, frame.radius(node)))
    };
    let by_weight = frame
        .draw_order
        .iter()
        .rev()
        .copied()
        .filter(|&node| on_screen(node))
        .collect::<Vec<_>>();
    let forced = selection
        .iter()
        .chain(scene.interaction.hovered)
        .chain(scene.search_hits.iter().copied())
        .filter(|&node| on_screen(node));

    let requests = labelled_nodes(lod, &by_weight, forced, config.label_top_k)
        .into_iter()
        .filter_map(|node| {
            let data = model.node(node)?;
            Some(LabelRequest {
                node,
                center: scene.screen_position(node)?,
                radius: frame.radius(node),
                size: estimate_label_size(&data.name, LABEL_FONT_SIZE),
            })
        })
        .collect::<Vec<_>>();

    for label in place_labels(&requests) {
        let (opacity, _) = focus_context(selection.hop(label.node), has_selection);
        painter.rect_filled(label.rect, 3.0, with_opacity(BACKGROUND, 0.65 * opacity));
        painter.text(
            label.rect.left_center() + vec2(2.0, 0.0),
            Align2::LEFT_CENTER,
            &model.nodes[label.node].name,
            FontId::proportional(LABEL_FONT_SIZE),
            with_opacity(LABEL, opacity),
        );
    }

    if lod != LodLevel::Full {
        return;
    }
    for curve in &frame.curves {
        let Some(edge) = model.edges.get(curve.edge) else {
            continue;
        };
        let Some(text) = edge.label.as_deref() else {
            continue;
        };
        let focused = selection.contains(edge.source)
            || selection.contains(edge.target)
            || scene.interaction.hovered_edge == Some(curve.edge)
            || scene
                .interaction
                .hovered
                .is_some_and(|node| edge.touches(node));
        if focused && frame.rect.contains(curve.midpoint()) {
            painter.text(
                curve.midpoint(),
                Align2::CENTER_BOTTOM,
                text,
                FontId::proportional(10.5),
                with_opacity(LABEL, 0.85),
            );
        }
    }
}

pub(super) fn selection(painter: &Painter, scene: &Scene<'_>) {
    let selection = scene.coordinator.selection();
    for node in selection.iter() {
        let Some(center) = scene.screen_position(node) else {
            continue;
        };
        let radius = scene.frame.radius(node) * focus_context(0, true).1;
        painter.circle_stroke(center, radius + 4.0, Stroke::new(2.0, SELECTED));
        if selection.anchor() == Some(node) {
            painter.circle_stroke(center, radius + 8.0, Stroke::new(1.0, with_opacity(SELECTED, 0.7)));
        }
    }

    for &candidate in scene.interaction.ghost_candidates() {
        if let Some(center) = scene.frame.position(candidate) {
            painter.circle_stroke(
                center,
                scene.frame.radius(candidate) + 5.0,
                Stroke::new(1.0, with_opacity(HOVER, 0.6)),
            );
        }
    }
    if let Some((_, target)) = scene.interaction.ghost_snap()
        && let Some(center) = scene.frame.position(target)
    {
        painter.circle_stroke(
            center,
            scene.frame.radius(target) + 7.0,
            Stroke::new(2.0, HOVER),
        );
    }
}

pub(super) fn marquee(painter: &Painter, scene: &Scene<'_>) {
    let Some(rect) = scene.interaction.marquee_rect() else {
        return;
    };
    painter.rect_filled(rect, 0.0, with_opacity(SEARCH_HIT, 0.12));
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SEARCH_HIT), StrokeKind::Inside);
}

pub(super) fn lasso(painter: &Painter, scene: &Scene<'_>) {
    let Some(path) = scene.interaction.lasso_path() else {
        return;
    };
    if path.len() < 2 {
        return;
    }
    let stroke = Stroke::new(1.2, SEARCH_HIT);
    painter.add(Shape::line(path.to_vec(), stroke));
    if let (Some(&first), Some(&last)) = (path.first(), path.last()) {
        painter.extend(Shape::dashed_line(&[last, first], stroke, 4.0, 4.0));
    }
}

pub(super) fn ripple(painter: &Painter, scene: &Scene<'_>) {
    let Some((node, progress)) = scene.animations.ripple(scene.now) else {
        return;
    };
    let Some(center) = scene.screen_position(node) else {
        return;
    };
    let radius = scene.frame.radius(node);
    let fade = 1.0 - progress;

    for ring in 0..2 {
        let spread = progress * 140.0 * scene.viewport.scale.sqrt() + ring as f32 * 18.0 * progress;
        painter.circle_stroke(
            center,
            radius + spread,
            Stroke::new(2.0 * fade + 0.5, with_opacity(SELECTED, fade * (0.8 - ring as f32 * 0.3))),
        );
    }
}
