use eframe::egui::{Modifiers, Pos2};

use crate::app::frame::FrameGeometry;
use crate::dataset::EdgeKind;
use crate::graph::GraphCoordinator;
use crate::spatial::{Viewport, names_compatible, point_in_polygon};

use super::{DragKind, Effects, GhostDrag, InteractionState, NodeDrag, PendingMerge, PointerInput, Press};

/// Pointer travel, in pixels, below which a press still counts as a click.
const CLICK_SLOP: f32 = 4.0;
const LASSO_MIN_STEP: f32 = 2.0;

impl InteractionState {
    pub fn handle_pointer(
        &mut self,
        input: PointerInput,
        coordinator: &mut GraphCoordinator,
        viewport: &mut Viewport,
        frame: &FrameGeometry,
    ) -> Effects {
        match input {
            PointerInput::Down {
                pos,
                modifiers,
                time: _,
            } => self.pointer_down(pos, modifiers, coordinator, frame),
            PointerInput::Move { pos } => self.pointer_move(pos, coordinator, viewport, frame),
            PointerInput::Up { pos, time } => self.pointer_up(pos, time, coordinator, viewport, frame),
            PointerInput::Zoom { pos, factor } => {
                let before = viewport.scale;
                viewport.zoom_around(frame.rect, pos, factor);
                Effects {
                    changed: viewport.scale != before,
                    ..Effects::default()
                }
            }
        }
    }

    fn pointer_down(
        &mut self,
        pos: Pos2,
        modifiers: Modifiers,
        coordinator: &GraphCoordinator,
        frame: &FrameGeometry,
    ) -> Effects {
        self.reset_gesture();

        let badge = frame.anchor_badge_at(pos, coordinator);
        let node = frame.node_at(pos, coordinator.config().hit_padding);
        self.press = Some(Press {
            origin: pos,
            applied: pos,
            node,
            badge,
            modifiers,
            moved: false,
        });

        match node {
            _ if badge.is_some() => {}
            Some(node) => self.drag = Self::begin_drag(node, coordinator),
            None if modifiers.alt => self.lasso = Some(vec![pos]),
            None if modifiers.shift => self.marquee = Some((pos, pos)),
            None => self.pan = true,
        }
        Effects::default()
    }

    fn begin_drag(node: usize, coordinator: &GraphCoordinator) -> Option<NodeDrag> {
        let model = coordinator.model()?;
        let selection = coordinator.selection();

        let (kind, dependents) = if let Some(cluster) = coordinator.cluster_of(node) {
            let members = cluster.members.iter().copied().filter(|&member| member != node);
            (DragKind::Cluster, members.collect::<Vec<_>>())
        } else if selection.contains(node) && selection.len() > 1 {
            let others = selection.iter().filter(|&selected| selected != node);
            (DragKind::Group, others.collect::<Vec<_>>())
        } else {
            (DragKind::Node, Vec::new())
        };

        let target = model.node(node)?;
        let ghost = (kind == DragKind::Node && target.is_ghost).then(|| GhostDrag {
            name: target.name.clone(),
            candidates: None,
            snapped: None,
        });

        Some(NodeDrag {
            kind,
            primary: node,
            dependents,
            ghost,
        })
    }

    fn pointer_move(
        &mut self,
        pos: Pos2,
        coordinator: &mut GraphCoordinator,
        viewport: &mut Viewport,
        frame: &FrameGeometry,
    ) -> Effects {
        let Some(press) = self.press.as_mut() else {
            return self.hover(pos, coordinator, frame);
        };

        if !press.moved && press.origin.distance(pos) <= CLICK_SLOP {
            return Effects::default();
        }
        press.moved = true;
        let delta = pos - press.applied;
        press.applied = pos;

        if let Some(drag) = self.drag.as_mut() {
            coordinator.move_group(drag.primary, delta / viewport.scale, &drag.dependents);
            if let Some(ghost) = drag.ghost.as_mut() {
                Self::track_ghost_snap(ghost, pos, coordinator, frame);
            }
        } else if self.pan {
            viewport.pan_by(delta);
        } else if let Some((_, current)) = self.marquee.as_mut() {
            *current = pos;
        } else if let Some(path) = self.lasso.as_mut()
            && path.last().is_none_or(|last| last.distance(pos) >= LASSO_MIN_STEP)
        {
            path.push(pos);
        }

        Effects {
            changed: true,
            ..Effects::default()
        }
    }

    fn track_ghost_snap(
        ghost: &mut GhostDrag,
        pointer: Pos2,
        coordinator: &GraphCoordinator,
        frame: &FrameGeometry,
    ) {
        let Some(model) = coordinator.model() else {
            return;
        };
        let candidates = ghost.candidates.get_or_insert_with(|| {
            coordinator
                .visible()
                .node_indices()
                .filter(|&node| {
                    let candidate = &model.nodes[node];
                    !candidate.is_ghost && names_compatible(&ghost.name, &candidate.name)
                })
                .collect()
        });

        let snap_radius = coordinator.config().ghost_snap_radius;
        ghost.snapped = candidates
            .iter()
            .filter_map(|&node| {
                let distance = frame.position(node)?.distance(pointer);
                (distance <= snap_radius).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _)| node);
    }

    fn hover(&mut self, pos: Pos2, coordinator: &GraphCoordinator, frame: &FrameGeometry) -> Effects {
        let config = coordinator.config();
        let hovered = frame.node_at(pos, config.hit_padding);
        let hovered_edge = match hovered {
            Some(_) => None,
            None => frame.edge_at(pos, config.edge_hit_threshold),
        };

        let changed = hovered != self.hovered || hovered_edge != self.hovered_edge;
        self.hovered = hovered;
        self.hovered_edge = hovered_edge;
        Effects {
            changed,
            ..Effects::default()
        }
    }

    fn pointer_up(
        &mut self,
        pos: Pos2,
        time: f64,
        coordinator: &mut GraphCoordinator,
        viewport: &Viewport,
        frame: &FrameGeometry,
    ) -> Effects {
        let Some(press) = self.press else {
            self.reset_gesture();
            return Effects::default();
        };
        let mut effects = Effects {
            changed: true,
            ..Effects::default()
        };

        if let Some(bridge) = press.badge.filter(|_| !press.moved) {
            let average = coordinator.average_edge_length().unwrap_or(120.0);
            coordinator.pull_distant_connections(bridge, frame.rect, viewport, average);
        } else if let Some(rect) = self.marquee_rect().filter(|_| press.moved) {
            let inside = frame
                .draw_order
                .iter()
                .copied()
                .filter(|&node| frame.position(node).is_some_and(|at| rect.contains(at)));
            coordinator.select_many(inside, press.modifiers.command);
        } else if let Some(path) = self.lasso.as_deref().filter(|_| press.moved) {
            let inside = frame
                .draw_order
                .iter()
                .copied()
                .filter(|&node| frame.position(node).is_some_and(|at| point_in_polygon(at, path)))
                .collect::<Vec<_>>();
            coordinator.select_many(inside, press.modifiers.command);
        } else if let Some((ghost, target)) = self.ghost_snap() {
            self.pending_merge = Self::merge_prompt(ghost, target, coordinator);
        } else if !press.moved && (press.node.is_some() || self.pan) {
            let count = self.clicks.register(time, pos, press.node);
            match press.node {
                Some(node) => {
                    effects.ripple_at = Self::click_node(node, count, press.modifiers, coordinator)
                }
                None => Self::click_canvas(pos, coordinator, frame),
            }
        }

        self.reset_gesture();
        effects
    }

    fn merge_prompt(ghost: usize, target: usize, coordinator: &GraphCoordinator) -> Option<PendingMerge> {
        let model = coordinator.model()?;
        let ghost = model.node(ghost)?;
        let target = model.node(target)?;
        Some(PendingMerge {
            ghost_name: ghost.name.clone(),
            target_id: target.id.clone(),
            target_name: target.name.clone(),
        })
    }

    /// Returns the node a ripple should start from, for multi-clicks.
    fn click_node(
        node: usize,
        count: u8,
        modifiers: Modifiers,
        coordinator: &mut GraphCoordinator,
    ) -> Option<usize> {
        let kind = if modifiers.shift {
            Some(EdgeKind::DeducedFamily)
        } else if modifiers.alt {
            Some(EdgeKind::RecruitingTree)
        } else {
            None
        };

        match count {
            1 if modifiers.command || modifiers.shift => {
                coordinator.toggle_selection(node);
                None
            }
            1 => {
                coordinator.select_only(node);
                None
            }
            2 => {
                coordinator.expand_selection(node, 1, kind);
                Some(node)
            }
            _ => {
                coordinator.expand_selection(node, 2, kind);
                Some(node)
            }
        }
    }

    fn click_canvas(pos: Pos2, coordinator: &mut GraphCoordinator, frame: &FrameGeometry) {
        let threshold = coordinator.config().edge_hit_threshold;
        let endpoints = frame.edge_at(pos, threshold).and_then(|edge| {
            let edge = coordinator.model()?.edges.get(edge)?;
            Some([edge.source, edge.target])
        });

        match endpoints {
            Some(endpoints) => coordinator.select_many(endpoints, false),
            None => coordinator.clear_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::super::testing::{frame, index, scene, star_layout, world};
    use super::*;
    use crate::graph::testing::{person, relation, star};

    fn press(
        state: &mut InteractionState,
        coordinator: &mut GraphCoordinator,
        viewport: &mut Viewport,
        path: &[Pos2],
        modifiers: Modifiers,
        time: f64,
    ) -> Effects {
        let frame = frame(coordinator, viewport);
        state.handle_pointer(
            PointerInput::Down {
                pos: path[0],
                modifiers,
                time,
            },
            coordinator,
            viewport,
            &frame,
        );
        for &pos in &path[1..] {
            state.handle_pointer(PointerInput::Move { pos }, coordinator, viewport, &frame);
        }
        let end = path[path.len() - 1];
        state.handle_pointer(
            PointerInput::Up {
                pos: end,
                time: time + 0.05,
            },
            coordinator,
            viewport,
            &frame,
        )
    }

    fn selected_ids(coordinator: &GraphCoordinator) -> Vec<String> {
        let Some(model) = coordinator.model() else {
            return Vec::new();
        };
        let mut ids = coordinator
            .selection()
            .iter()
            .map(|node| model.nodes[node].id.clone())
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    #[test]
    fn modifiers_pick_the_canvas_gesture() {
        let mut coordinator = scene(star(), &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let empty = pos2(475.0, 375.0);
        let frame = frame(&coordinator, &viewport);

        let down = |modifiers| PointerInput::Down {
            pos: empty,
            modifiers,
            time: 0.0,
        };
        let up = PointerInput::Up { pos: empty, time: 0.1 };

        state.handle_pointer(down(Modifiers::ALT), &mut coordinator, &mut viewport, &frame);
        assert!(state.lasso_path().is_some());
        state.handle_pointer(up, &mut coordinator, &mut viewport, &frame);
        assert!(state.lasso_path().is_none());

        state.handle_pointer(down(Modifiers::SHIFT), &mut coordinator, &mut viewport, &frame);
        assert!(state.marquee_rect().is_some());
        assert!(state.lasso_path().is_none());
        state.handle_pointer(up, &mut coordinator, &mut viewport, &frame);
        assert!(state.marquee_rect().is_none());

        state.handle_pointer(down(Modifiers::NONE), &mut coordinator, &mut viewport, &frame);
        assert!(state.is_panning());
        state.handle_pointer(
            PointerInput::Move {
                pos: empty + vec2(30.0, -10.0),
            },
            &mut coordinator,
            &mut viewport,
            &frame,
        );
        assert_eq!(viewport.offset, vec2(30.0, -10.0));
        state.handle_pointer(up, &mut coordinator, &mut viewport, &frame);
        assert!(!state.is_panning());
        assert_eq!(state.drag_kind(), None);
    }

    #[test]
    fn marquee_and_lasso_select_enclosed_nodes() {
        let mut coordinator = scene(star(), &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();

        press(
            &mut state,
            &mut coordinator,
            &mut viewport,
            &[pos2(500.0, 200.0), pos2(600.0, 400.0)],
            Modifiers::SHIFT,
            0.0,
        );
        assert_eq!(selected_ids(&coordinator), vec!["l1"]);

        press(
            &mut state,
            &mut coordinator,
            &mut viewport,
            &[
                pos2(200.0, 250.0),
                pos2(300.0, 250.0),
                pos2(300.0, 350.0),
                pos2(200.0, 350.0),
            ],
            Modifiers::ALT,
            1.0,
        );
        assert_eq!(selected_ids(&coordinator), vec!["l3"]);
    }

    #[test]
    fn dragging_moves_node_group_or_cluster() {
        let mut dataset = star();
        dataset
            .relationships
            .push(relation("fam", "h", "l2", EdgeKind::DeducedFamily));
        let mut coordinator = scene(dataset, &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let l1 = pos2(550.0, 300.0);
        let l2 = pos2(400.0, 450.0);

        press(&mut state, &mut coordinator, &mut viewport, &[l1, l1 + vec2(10.0, 0.0)], Modifiers::NONE, 0.0);
        assert_eq!(world(&coordinator, "l1"), vec2(160.0, 0.0));
        assert_eq!(world(&coordinator, "h"), Vec2::ZERO);

        let (a, b) = (index(&coordinator, "l1"), index(&coordinator, "l2"));
        coordinator.select_many([a, b], false);
        press(&mut state, &mut coordinator, &mut viewport, &[l2, l2 + vec2(0.0, 20.0)], Modifiers::NONE, 1.0);
        assert_eq!(world(&coordinator, "l1"), vec2(160.0, 20.0));
        assert_eq!(world(&coordinator, "l2"), vec2(0.0, 170.0));
        assert_eq!(world(&coordinator, "h"), Vec2::ZERO);

        coordinator.filters_mut().family_clustering = true;
        coordinator.apply_filters();
        let l2 = pos2(400.0, 470.0);
        press(&mut state, &mut coordinator, &mut viewport, &[l2, l2 + vec2(-10.0, 0.0)], Modifiers::NONE, 2.0);
        assert_eq!(world(&coordinator, "l2"), vec2(-10.0, 170.0));
        assert_eq!(world(&coordinator, "h"), vec2(-10.0, 0.0));
        assert_eq!(world(&coordinator, "l1"), vec2(160.0, 20.0));
    }

    #[test]
    fn click_counts_select_and_expand() {
        let mut dataset = star();
        dataset
            .relationships
            .push(relation("fam", "h", "l2", EdgeKind::DeducedFamily));
        let mut coordinator = scene(dataset, &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let hub = pos2(400.0, 300.0);
        let h = index(&coordinator, "h");

        let single = press(&mut state, &mut coordinator, &mut viewport, &[hub], Modifiers::NONE, 0.0);
        assert_eq!(selected_ids(&coordinator), vec!["h"]);
        assert_eq!(single.ripple_at, None);

        let double = press(&mut state, &mut coordinator, &mut viewport, &[hub], Modifiers::NONE, 0.2);
        assert_eq!(coordinator.selection().len(), 5);
        assert_eq!(double.ripple_at, Some(h));

        press(&mut state, &mut coordinator, &mut viewport, &[hub], Modifiers::NONE, 0.4);
        assert_eq!(coordinator.selection().len(), 5);

        press(&mut state, &mut coordinator, &mut viewport, &[hub], Modifiers::SHIFT, 5.0);
        press(&mut state, &mut coordinator, &mut viewport, &[hub], Modifiers::SHIFT, 5.2);
        assert_eq!(selected_ids(&coordinator), vec!["h", "l2"]);

        press(&mut state, &mut coordinator, &mut viewport, &[pos2(700.0, 550.0)], Modifiers::NONE, 9.0);
        assert!(coordinator.selection().is_empty());
    }

    #[test]
    fn badge_click_pulls_distant_connections() {
        let mut layout = star_layout();
        layout[1] = ("l1", vec2(1000.0, 0.0));
        let mut coordinator = scene(star(), &layout);
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let h = index(&coordinator, "h");
        let l1 = index(&coordinator, "l1");

        press(&mut state, &mut coordinator, &mut viewport, &[pos2(400.0, 300.0)], Modifiers::NONE, 0.0);
        let badge = frame(&coordinator, &viewport).badge_center(h).expect("hub is drawn");
        press(&mut state, &mut coordinator, &mut viewport, &[badge], Modifiers::NONE, 5.0);

        assert!(coordinator.is_pulled(l1));
        assert!(coordinator.has_pulls_from(h));
        assert!(world(&coordinator, "l1").x < 400.0);
        assert_eq!(world(&coordinator, "h"), Vec2::ZERO);
        assert_eq!(selected_ids(&coordinator), vec!["h"]);
    }

    #[test]
    fn ghost_drag_snaps_and_asks_before_merging() {
        let mut dataset = star();
        dataset.people.push(person("p5", "Gill Four", 50.0));
        let mut layout = star_layout();
        layout.push(("p5", vec2(300.0, 0.0)));
        let mut coordinator = scene(dataset, &layout);
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let ghost = pos2(400.0, 150.0);

        let frame = frame(&coordinator, &viewport);
        state.handle_pointer(
            PointerInput::Down {
                pos: ghost,
                modifiers: Modifiers::NONE,
                time: 0.0,
            },
            &mut coordinator,
            &mut viewport,
            &frame,
        );
        state.handle_pointer(
            PointerInput::Move { pos: pos2(690.0, 300.0) },
            &mut coordinator,
            &mut viewport,
            &frame,
        );
        let p5 = index(&coordinator, "p5");
        assert_eq!(state.ghost_candidates(), &[p5]);
        assert_eq!(state.ghost_snap(), Some((index(&coordinator, "l4"), p5)));

        state.handle_pointer(
            PointerInput::Up {
                pos: pos2(690.0, 300.0),
                time: 0.3,
            },
            &mut coordinator,
            &mut viewport,
            &frame,
        );
        assert_eq!(
            state.pending_merge,
            Some(PendingMerge {
                ghost_name: "Gil Four".to_owned(),
                target_id: "p5".to_owned(),
                target_name: "Gill Four".to_owned(),
            })
        );
        assert!(coordinator.model().is_some_and(|m| !m.ghosts_named("Gil Four").is_empty()));
        assert_eq!(state.ghost_snap(), None);
    }

    #[test]
    fn ghost_drop_far_from_candidates_does_not_prompt() {
        let mut coordinator = scene(star(), &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();

        press(
            &mut state,
            &mut coordinator,
            &mut viewport,
            &[pos2(400.0, 150.0), pos2(100.0, 500.0)],
            Modifiers::NONE,
            0.0,
        );
        assert_eq!(state.pending_merge, None);
        assert_eq!(world(&coordinator, "l4"), vec2(-300.0, 200.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut coordinator = scene(star(), &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let frame = frame(&coordinator, &viewport);

        let zoom = |factor| PointerInput::Zoom {
            pos: pos2(100.0, 100.0),
            factor,
        };
        state.handle_pointer(zoom(100.0), &mut coordinator, &mut viewport, &frame);
        assert_eq!(viewport.scale, 5.0);
        state.handle_pointer(zoom(1e-6), &mut coordinator, &mut viewport, &frame);
        assert_eq!(viewport.scale, 0.1);
    }

    #[test]
    fn hover_tracks_nodes() {
        let mut coordinator = scene(star(), &star_layout());
        let mut viewport = Viewport::default();
        let mut state = InteractionState::default();
        let frame = frame(&coordinator, &viewport);

        let effects = state.handle_pointer(
            PointerInput::Move { pos: pos2(551.0, 301.0) },
            &mut coordinator,
            &mut viewport,
            &frame,
        );
        assert!(effects.changed);
        assert_eq!(state.hovered, Some(index(&coordinator, "l1")));
        assert_eq!(state.hovered_edge, None);
    }
}
