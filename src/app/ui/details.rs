use eframe::egui::{self, RichText, Ui};

use crate::dataset::EdgeKind;
use crate::util::{format_weight, initials};

use super::super::RelGraphApp;
use super::super::render::role_color;

/// Something the details panel asked for; applied after the panel is drawn
/// so the coordinator is not borrowed while widgets read from it.
enum DetailsAction {
    Select(usize),
    Expand { hops: usize, kind: Option<EdgeKind> },
    OpenRecord,
    CreateContact(String),
    Dismiss(String),
    Confirm(String),
    Pin(String, bool),
    Hide(String),
    Pull,
    Release,
}

struct RelationRow {
    other: usize,
    other_name: String,
    edge_id: String,
    kind: EdgeKind,
    weight: f32,
    label: Option<String>,
    tentative: bool,
}

impl RelGraphApp {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(model) = self.coordinator.model() else {
            ui.label("No graph loaded.");
            return;
        };
        let selection = self.coordinator.selection();
        let Some(anchor) = selection.anchor() else {
            ui.label("Select a person on the canvas, or press Tab.");
            return;
        };
        let Some(node) = model.node(anchor) else {
            ui.label("Selected person no longer exists in the graph.");
            return;
        };

        let mut action = None;
        let visible = self.coordinator.visible();

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(initials(&node.name))
                    .monospace()
                    .strong()
                    .color(role_color(node.role)),
            );
            ui.label(RichText::new(&node.name).strong());
        });
        ui.small(node.id.as_str());
        if selection.len() > 1 {
            ui.small(format!("{} people selected", selection.len()));
        }
        ui.add_space(6.0);

        ui.label(format!("Role: {}", node.role.label()));
        ui.label(format!("Health: {}", node.health.label()));
        ui.label(format!("Production: {}", format_weight(node.weight)));
        ui.label(format!("Connectedness: {:.0}%", model.centrality(anchor) * 100.0));
        if let Some(cluster) = self.coordinator.cluster_of(anchor) {
            ui.label(format!("Family: {}", cluster.name));
        }
        if let Some(thumbnail) = &node.thumbnail {
            ui.small(format!("Photo: {thumbnail}"));
        }
        if node.pinned {
            ui.small("Pinned in place");
        }
        if self.coordinator.is_pulled(anchor) {
            ui.small("Pulled into view");
        }

        ui.separator();
        ui.horizontal_wrapped(|ui| {
            if node.is_ghost {
                if ui
                    .button("Create contact")
                    .on_hover_text("Turn this mention into a real contact.")
                    .clicked()
                {
                    action = Some(DetailsAction::CreateContact(node.name.clone()));
                }
                if ui.button("Dismiss").clicked() {
                    action = Some(DetailsAction::Dismiss(node.name.clone()));
                }
            } else if ui.button("Open record").clicked() {
                action = Some(DetailsAction::OpenRecord);
            }

            let pin_label = if node.pinned { "Unpin" } else { "Pin" };
            if ui.button(pin_label).clicked() {
                action = Some(DetailsAction::Pin(node.id.clone(), !node.pinned));
            }
            if ui.button("Hide").clicked() {
                action = Some(DetailsAction::Hide(node.id.clone()));
            }
        });
        ui.horizontal_wrapped(|ui| {
            if ui.button("Select neighbours").clicked() {
                action = Some(DetailsAction::Expand { hops: 1, kind: None });
            }
            if ui.button("Two hops").clicked() {
                action = Some(DetailsAction::Expand { hops: 2, kind: None });
            }
            if ui.button("Family").clicked() {
                action = Some(DetailsAction::Expand {
                    hops: 2,
                    kind: Some(EdgeKind::DeducedFamily),
                });
            }
        });
        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Pull distant connections")
                .on_hover_text("Bring off-screen connections to the edge of the view.")
                .clicked()
            {
                action = Some(DetailsAction::Pull);
            }
            if self.coordinator.has_pulls_from(anchor) && ui.button("Release").clicked() {
                action = Some(DetailsAction::Release);
            }
        });

        let mut rows = model
            .edges_of(anchor)
            .iter()
            .filter(|&&edge| visible.contains_edge(edge))
            .filter_map(|&edge| {
                let edge = &model.edges[edge];
                let other = edge.other(anchor)?;
                Some(RelationRow {
                    other,
                    other_name: model.node(other)?.name.clone(),
                    edge_id: edge.id.clone(),
                    kind: edge.kind,
                    weight: edge.weight,
                    label: edge.label.clone(),
                    tentative: edge.is_tentative(),
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.other_name.cmp(&b.other_name)));

        ui.separator();
        ui.label(RichText::new(format!("Relationships ({})", rows.len())).strong());
        if rows.is_empty() {
            ui.label("No visible relationships.");
        }
        egui::ScrollArea::vertical()
            .id_salt("relationships_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in &rows {
                    ui.horizontal_wrapped(|ui| {
                        if ui.link(&row.other_name).clicked() {
                            action = Some(DetailsAction::Select(row.other));
                        }
                        ui.small(format!("{} · {:.0}%", row.kind.label(), row.weight * 100.0));
                        if let Some(label) = &row.label {
                            ui.small(format!("\"{label}\""));
                        }
                        if row.tentative
                            && ui
                                .small_button("Confirm")
                                .on_hover_text("Mark this relationship as real.")
                                .clicked()
                        {
                            action = Some(DetailsAction::Confirm(row.edge_id.clone()));
                        }
                    });
                }
            });

        if let Some(action) = action {
            self.apply_details_action(anchor, action);
        }
    }

    fn apply_details_action(&mut self, anchor: usize, action: DetailsAction) {
        match action {
            DetailsAction::Select(node) => self.coordinator.select_only(node),
            DetailsAction::Expand { hops, kind } => {
                self.coordinator.expand_selection(anchor, hops, kind);
                self.animations.start_ripple(anchor, self.now);
            }
            DetailsAction::OpenRecord => self.coordinator.navigate_to(anchor),
            DetailsAction::CreateContact(name) => self.coordinator.promote_ghost(&name),
            DetailsAction::Dismiss(name) => self.coordinator.dismiss_ghost(&name),
            DetailsAction::Confirm(edge_id) => self.coordinator.confirm_deduced_relation(&edge_id),
            DetailsAction::Pin(id, true) => self.coordinator.pin_node(&id),
            DetailsAction::Pin(id, false) => self.coordinator.unpin_node(&id),
            DetailsAction::Hide(id) => self.coordinator.hide_node(&id),
            DetailsAction::Pull => {
                let Some(rect) = self.canvas_rect else {
                    return;
                };
                let average = self.coordinator.average_edge_length().unwrap_or(120.0);
                self.coordinator
                    .pull_distant_connections(anchor, rect, &self.viewport, average);
            }
            DetailsAction::Release => self.coordinator.release_pulled_connections(anchor),
        }
    }
}
