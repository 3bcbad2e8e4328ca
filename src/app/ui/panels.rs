use eframe::egui::{self, Align, Align2, Context, Layout, RichText};

use crate::graph::GraphStatus;

use super::super::RelGraphApp;

const ZOOM_STEP: f32 = 1.25;

impl RelGraphApp {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relgraph");
                    ui.separator();
                    ui.label(format!("source: {}", self.coordinator.source_description()));
                    ui.label(self.status_text());

                    if ui
                        .button("Rebuild graph")
                        .on_hover_text("Reload the dataset and lay it out again. Pinned nodes stay put.")
                        .clicked()
                    {
                        self.rebuild();
                    }
                    if self.coordinator.is_building()
                        && ui.button("Cancel").on_hover_text("Stop the build in flight.").clicked()
                    {
                        self.coordinator.cancel_build();
                    }

                    ui.separator();
                    let ready = self.coordinator.is_ready();
                    if ui.add_enabled(ready, egui::Button::new("−")).on_hover_text("Zoom out").clicked() {
                        self.zoom_canvas(1.0 / ZOOM_STEP);
                    }
                    if ui.add_enabled(ready, egui::Button::new("+")).on_hover_text("Zoom in").clicked() {
                        self.zoom_canvas(ZOOM_STEP);
                    }
                    if ui
                        .add_enabled(ready, egui::Button::new("Fit"))
                        .on_hover_text("Fit every visible node into view.")
                        .clicked()
                    {
                        self.fit_to_view();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps.display_text() {
                            ui.label(fps_text);
                        }
                        if let Some(visible_text) = self.visible_graph_text() {
                            ui.label(visible_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| self.draw_controls(ui));
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));

        self.draw_merge_dialog(ctx);
    }

    fn status_text(&self) -> String {
        match self.coordinator.status() {
            GraphStatus::Idle => "idle".to_owned(),
            GraphStatus::Computing => "building...".to_owned(),
            GraphStatus::Ready => "ready".to_owned(),
            GraphStatus::Failed(reason) => format!("failed: {reason}"),
        }
    }

    fn visible_graph_text(&self) -> Option<String> {
        self.coordinator.model().map(|model| {
            let visible = self.coordinator.visible();
            format!(
                "visible graph: {} / {} nodes, {} / {} edges",
                visible.node_count(),
                model.nodes.len(),
                visible.edge_count(),
                model.edges.len()
            )
        })
    }

    fn zoom_canvas(&mut self, factor: f32) {
        if let Some(rect) = self.canvas_rect {
            self.viewport.zoom_by(rect, factor);
        }
    }

    fn draw_merge_dialog(&mut self, ctx: &Context) {
        let Some(pending) = self.interaction.pending_merge.clone() else {
            return;
        };

        let mut decision = None;
        egui::Window::new("Merge ghost")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&pending.ghost_name).strong());
                ui.label(format!("will be merged into {}.", pending.target_name));
                ui.small("Its relationships move to that person and the ghost is removed.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Merge").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                self.coordinator
                    .merge_ghost(&pending.ghost_name, &pending.target_id);
                self.interaction.forget_graph();
            }
            Some(false) => self.interaction.pending_merge = None,
            None => {}
        }
    }
}
