use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use eframe::egui::{Context, Rect, Vec2, vec2};
use log::info;

use crate::config::EngineConfig;
use crate::dataset::GraphSource;
use crate::graph::{EventSink, GraphCoordinator, GraphEvent};
use crate::spatial::Viewport;

mod animation;
mod canvas;
mod frame;
mod interaction;
mod render;
mod search;
mod ui;

use self::animation::Animations;
use self::interaction::InteractionState;
use self::render::Layer;
use self::search::SearchHighlights;
use self::ui::FpsCounter;

const DEFAULT_BUILD_BOUNDS: Vec2 = vec2(1200.0, 800.0);
const FIT_PADDING: f32 = 48.0;

pub struct RelGraphApp {
    coordinator: GraphCoordinator,
    events: Receiver<GraphEvent>,
    viewport: Viewport,
    interaction: InteractionState,
    animations: Animations,
    search: SearchHighlights,
    disabled_layers: HashSet<Layer>,
    fps: FpsCounter,
    /// Last allocated canvas; `None` until the first frame.
    canvas_rect: Option<Rect>,
    fit_pending: bool,
    new_person: String,
    /// egui clock at the start of the current frame.
    now: f64,
}

impl RelGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: Arc<dyn GraphSource>,
        config: EngineConfig,
    ) -> Self {
        let (sink, events) = EventSink::channel();
        let animations = Animations::new(config.ripple_duration_secs);
        let mut coordinator = GraphCoordinator::new(source, config, sink);
        coordinator.build_graph(DEFAULT_BUILD_BOUNDS);

        Self {
            coordinator,
            events,
            viewport: Viewport::default(),
            interaction: InteractionState::default(),
            animations,
            search: SearchHighlights::default(),
            disabled_layers: HashSet::new(),
            fps: FpsCounter::default(),
            canvas_rect: None,
            fit_pending: true,
            new_person: String::new(),
            now: 0.0,
        }
    }

    fn rebuild(&mut self) {
        let bounds = self.canvas_rect.map_or(DEFAULT_BUILD_BOUNDS, |rect| rect.size());
        self.coordinator.build_graph(bounds);
    }

    fn fit_to_view(&mut self) {
        let (Some(rect), Some(bounds)) = (self.canvas_rect, self.coordinator.visible_bounds()) else {
            return;
        };
        self.viewport.fit_to_bounds(rect, bounds, FIT_PADDING);
    }

    /// Host-side consumer of engine notifications.
    fn drain_events(&self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GraphEvent::NavigateTo { node_id } => info!("open record {node_id}"),
                GraphEvent::ContactRequest {
                    ghost_name,
                    link_to: Some(target),
                } => info!("link {ghost_name:?} to contact {target}"),
                GraphEvent::ContactRequest {
                    ghost_name,
                    link_to: None,
                } => info!("create contact for {ghost_name:?}"),
                GraphEvent::RelationshipConfirmed { edge_id } => {
                    info!("relationship {edge_id} confirmed")
                }
            }
        }
    }
}

impl eframe::App for RelGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.coordinator.poll() {
            self.interaction.forget_graph();
            self.animations.clear_targets();
            self.fit_pending = self.coordinator.is_ready();
        }
        if self.coordinator.is_building() {
            ctx.request_repaint();
        }

        self.now = ctx.input(|input| input.time);
        self.fps.update(ctx);
        self.show(ctx);
        self.drain_events();
    }
}
