use eframe::egui::{self, CursorIcon, Key, Modifiers, Rect, Sense, Ui, Vec2, vec2};

use crate::graph::GraphStatus;

use super::RelGraphApp;
use super::frame::FrameGeometry;
use super::interaction::{DragKind, Effects, KeyInput, PointerInput};
use super::render::{self, Scene};

const SCROLL_ZOOM_SPEED: f32 = 0.0015;

impl RelGraphApp {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_rect = Some(rect);
        if !self.coordinator.is_ready() {
            self.draw_status(ui, rect);
            return;
        }
        if self.fit_pending {
            self.fit_to_view();
            self.fit_pending = false;
        }

        let now = self.now;
        let mut frame = FrameGeometry::compute(&self.coordinator, &self.viewport, rect);
        let mut changed = false;

        for input in self.pointer_inputs(ui, rect, response.hovered()) {
            let effects = self
                .interaction
                .handle_pointer(input, &mut self.coordinator, &mut self.viewport, &frame);
            changed |= self.apply_effects(effects, now);
            if effects.changed {
                frame = FrameGeometry::compute(&self.coordinator, &self.viewport, rect);
            }
        }

        let text_focused = ui.ctx().memory(|memory| memory.focused().is_some());
        if !text_focused {
            for key in key_inputs(ui) {
                let effects = self
                    .interaction
                    .handle_key(key, &mut self.coordinator, &mut self.viewport, &frame);
                changed |= self.apply_effects(effects, now);
            }
        }
        if changed {
            frame = FrameGeometry::compute(&self.coordinator, &self.viewport, rect);
        }

        let cursor = match self.interaction.drag_kind() {
            Some(DragKind::Node) if self.interaction.is_dragging() => Some(CursorIcon::Grabbing),
            Some(DragKind::Group | DragKind::Cluster) if self.interaction.is_dragging() => {
                Some(CursorIcon::Move)
            }
            _ if self.interaction.is_panning() => Some(CursorIcon::Grabbing),
            _ if self.interaction.hovered.is_some() || self.interaction.hovered_edge.is_some() => {
                Some(CursorIcon::PointingHand)
            }
            _ => None,
        };
        if let Some(cursor) = cursor {
            ui.ctx().set_cursor_icon(cursor);
        }

        let search_hits = self.search.matches(&self.coordinator, &self.interaction.search);
        let painter = ui.painter_at(rect);
        render::paint(
            &painter,
            &Scene {
                coordinator: &self.coordinator,
                frame: &frame,
                viewport: &self.viewport,
                interaction: &self.interaction,
                animations: &self.animations,
                search_hits: &search_hits,
                now,
            },
            &self.disabled_layers,
        );

        let ghosts_visible = self.coordinator.model().is_some_and(|model| {
            self.coordinator
                .visible()
                .node_indices()
                .any(|node| model.nodes[node].is_ghost)
        });
        if self.animations.tick(now, ghosts_visible) || self.interaction.gesture_active() {
            ui.ctx().request_repaint();
        }
    }

    fn draw_status(&mut self, ui: &mut Ui, rect: Rect) {
        ui.painter_at(rect).rect_filled(rect, 0.0, render::BACKGROUND);
        let retry = match self.coordinator.status() {
            GraphStatus::Computing => {
                status_overlay(ui, rect, "Building relationship graph...", None);
                false
            }
            GraphStatus::Failed(reason) => {
                let reason = reason.clone();
                status_overlay(ui, rect, "Failed to build the graph", Some(&reason))
            }
            GraphStatus::Idle => status_overlay(
                ui,
                rect,
                "No graph loaded",
                Some(&self.coordinator.source_description()),
            ),
            GraphStatus::Ready => false,
        };
        if retry {
            self.rebuild();
        }
    }

    fn apply_effects(&mut self, effects: Effects, now: f64) -> bool {
        if let Some(node) = effects.ripple_at {
            self.animations.start_ripple(node, now);
        }
        effects.changed
    }

    fn pointer_inputs(&self, ui: &Ui, rect: Rect, hovered: bool) -> Vec<PointerInput> {
        let active = self.interaction.gesture_active();
        ui.input(|input| {
            let mut inputs = Vec::new();
            let Some(pos) = input.pointer.latest_pos() else {
                return inputs;
            };

            if hovered && rect.contains(pos) {
                let scroll = input.raw_scroll_delta.y;
                let factor = if input.zoom_delta() != 1.0 {
                    input.zoom_delta()
                } else {
                    (scroll * SCROLL_ZOOM_SPEED).exp()
                };
                if factor != 1.0 {
                    inputs.push(PointerInput::Zoom { pos, factor });
                }
            }

            if input.pointer.primary_pressed() && hovered && !active {
                inputs.push(PointerInput::Down {
                    pos: input.pointer.press_origin().unwrap_or(pos),
                    modifiers: input.modifiers,
                    time: input.time,
                });
            }
            if input.pointer.delta() != Vec2::ZERO && (active || hovered || input.pointer.primary_pressed()) {
                inputs.push(PointerInput::Move { pos });
            }
            if input.pointer.primary_released()
                && (active || inputs.iter().any(|i| matches!(i, PointerInput::Down { .. })))
            {
                inputs.push(PointerInput::Up {
                    pos,
                    time: input.time,
                });
            }
            inputs
        })
    }
}

fn key_inputs(ui: &Ui) -> Vec<KeyInput> {
    ui.ctx().input_mut(|input| {
        let mut keys = Vec::new();
        if input.consume_key(Modifiers::SHIFT, Key::Tab) {
            keys.push(KeyInput::Tab { backwards: true });
        }
        if input.consume_key(Modifiers::NONE, Key::Tab) {
            keys.push(KeyInput::Tab { backwards: false });
        }

        let arrows = [
            (Key::ArrowLeft, vec2(-1.0, 0.0)),
            (Key::ArrowRight, vec2(1.0, 0.0)),
            (Key::ArrowUp, vec2(0.0, -1.0)),
            (Key::ArrowDown, vec2(0.0, 1.0)),
        ];
        for (key, direction) in arrows {
            if input.consume_key(Modifiers::NONE, key) {
                keys.push(KeyInput::Arrow(direction));
            }
        }

        if input.consume_key(Modifiers::NONE, Key::Delete)
            || input.consume_key(Modifiers::NONE, Key::Backspace)
        {
            keys.push(KeyInput::Delete);
        }
        if input.consume_key(Modifiers::NONE, Key::Escape) {
            keys.push(KeyInput::Escape);
        }
        keys
    })
}

fn status_overlay(ui: &mut Ui, rect: Rect, heading: &str, detail: Option<&str>) -> bool {
    let mut retry = false;
    let area = Rect::from_center_size(rect.center(), vec2(rect.width().min(420.0), 160.0));
    ui.scope_builder(egui::UiBuilder::new().max_rect(area), |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(heading);
            ui.add_space(8.0);
            match detail {
                Some(detail) => {
                    ui.label(detail);
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                }
                None => {
                    ui.spinner();
                }
            }
        });
    });
    retry
}
