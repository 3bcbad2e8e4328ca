use eframe::egui::{Button, Key, RichText, Ui};

use crate::dataset::{EdgeKind, Health, PersonRecord, Role};
use crate::graph::FilterState;

use super::super::RelGraphApp;
use super::super::render::{Layer, role_color};

fn flag(ui: &mut Ui, value: &mut bool, label: &str, hover: &str) -> bool {
    ui.checkbox(value, label).on_hover_text(hover).changed()
}

impl RelGraphApp {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search people")
            .on_hover_text("Highlights fuzzy matches. Enter jumps to the first name containing the text.");
        let search_response = ui.text_edit_singleline(&mut self.interaction.search);
        if search_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            self.jump_to_search();
        }

        ui.separator();
        let ready = self.coordinator.is_ready();
        let mut changed = false;
        ui.add_enabled_ui(ready, |ui| {
            let filters = self.coordinator.filters_mut();
            changed |= draw_visibility(ui, filters);
            ui.separator();
            changed |= draw_role_filter(ui, filters);
            ui.separator();
            changed |= draw_edge_filter(ui, filters);
        });
        if changed {
            self.coordinator.apply_filters();
        }

        ui.separator();
        ui.add_enabled_ui(ready, |ui| {
            let hidden = self.coordinator.hidden_count();
            if ui
                .add_enabled(hidden > 0, Button::new(format!("Unhide {hidden} hidden")))
                .on_hover_text("Show every node hidden from the details panel.")
                .clicked()
            {
                self.coordinator.unhide_all();
            }
            if ui
                .button("Release pulled nodes")
                .on_hover_text("Send every pulled connection back to where it was.")
                .clicked()
            {
                self.coordinator.release_all_pulls();
            }

            ui.collapsing("Add person", |ui| {
                ui.text_edit_singleline(&mut self.new_person)
                    .on_hover_text("Adds a local contact near the centre of the view.");
                if ui
                    .add_enabled(!self.new_person.trim().is_empty(), Button::new("Add"))
                    .clicked()
                {
                    self.add_person();
                }
            });

            let dismissed = self.coordinator.dismissed_names().map(str::to_owned).collect::<Vec<_>>();
            ui.collapsing(format!("Dismissed ghosts ({})", dismissed.len()), |ui| {
                if dismissed.is_empty() {
                    ui.small("Select ghosts and press Delete to dismiss them.");
                }
                for name in &dismissed {
                    ui.label(name);
                }
            });
        });

        ui.collapsing("Layers", |ui| {
            for layer in Layer::ALL {
                let mut enabled = !self.disabled_layers.contains(&layer);
                if ui.checkbox(&mut enabled, layer.label()).changed() {
                    if enabled {
                        self.disabled_layers.remove(&layer);
                    } else {
                        self.disabled_layers.insert(layer);
                    }
                }
            }
        });

        ui.collapsing("Gestures", |ui| {
            ui.small("Drag a node to move it, or the whole selection or family with it.");
            ui.small("Shift-drag draws a marquee, Alt-drag a lasso, plain drag pans.");
            ui.small("Double click selects neighbours, triple click two hops. Shift limits to family, Alt to the recruiting tree.");
            ui.small("Drop a ghost on a similarly named person to merge it.");
            ui.small("Arrows move between connections, Tab cycles people, Delete dismisses ghosts, Escape clears.");
        });
    }

    fn add_person(&mut self) {
        let name = self.new_person.trim().to_owned();
        let person = PersonRecord {
            id: format!("local-{}", name.to_lowercase().replace(char::is_whitespace, "-")),
            name,
            production: 0.0,
            role: Role::Prospect,
            health: Health::Unknown,
            is_ghost: false,
            thumbnail: None,
        };
        if let Some(node) = self.coordinator.add_node(person, Some(self.viewport.center)) {
            self.coordinator.select_only(node);
            self.new_person.clear();
        }
    }

    fn jump_to_search(&mut self) {
        let Some(node) = self.coordinator.search_first(&self.interaction.search) else {
            return;
        };
        let Some(position) = self.coordinator.model().and_then(|model| model.node(node)).map(|data| data.position) else {
            return;
        };

        self.coordinator.select_only(node);
        let scale = self.viewport.scale.max(self.coordinator.config().label_full_zoom);
        self.viewport.focus_on(position, scale);
        self.animations.start_ripple(node, self.now);
    }
}

fn draw_visibility(ui: &mut Ui, filters: &mut FilterState) -> bool {
    let mut changed = false;
    changed |= flag(ui, &mut filters.show_self, "Show me", "Show your own node.");
    changed |= flag(
        ui,
        &mut filters.show_ghosts,
        "Show ghosts",
        "Show people mentioned in notes who are not contacts yet.",
    );
    changed |= flag(
        ui,
        &mut filters.show_orphans,
        "Show unconnected",
        "Show people without any visible relationship.",
    );
    changed |= flag(
        ui,
        &mut filters.show_dismissed,
        "Show dismissed ghosts",
        "Bring dismissed ghosts back without forgetting the dismissal.",
    );
    changed |= flag(
        ui,
        &mut filters.family_clustering,
        "Family clusters",
        "Group people joined by deduced family links.",
    );
    changed
}

fn draw_role_filter(ui: &mut Ui, filters: &mut FilterState) -> bool {
    let mut changed = false;
    ui.label(RichText::new("Roles").strong());
    ui.horizontal_wrapped(|ui| {
        for role in Role::ALL {
            let mut on = filters.roles.contains(&role);
            ui.label(RichText::new("●").color(role_color(role)));
            if ui.checkbox(&mut on, role.label()).changed() {
                changed = true;
                if on {
                    filters.roles.insert(role);
                } else {
                    filters.roles.remove(&role);
                }
            }
        }
    });
    changed
}

fn draw_edge_filter(ui: &mut Ui, filters: &mut FilterState) -> bool {
    let mut changed = false;
    ui.label(RichText::new("Relationships").strong());
    for kind in EdgeKind::ALL {
        let mut on = filters.edge_kinds.contains(&kind);
        if ui.checkbox(&mut on, kind.label()).changed() {
            changed = true;
            if on {
                filters.edge_kinds.insert(kind);
            } else {
                filters.edge_kinds.remove(&kind);
            }
        }
    }
    changed
}
