use crate::app::frame::FrameGeometry;
use crate::graph::GraphCoordinator;
use crate::spatial::{Viewport, circle_visible};

use super::{Effects, InteractionState, KeyInput};

impl InteractionState {
    pub fn handle_key(
        &mut self,
        key: KeyInput,
        coordinator: &mut GraphCoordinator,
        viewport: &mut Viewport,
        frame: &FrameGeometry,
    ) -> Effects {
        let focused = match key {
            KeyInput::Arrow(direction) => coordinator.step_anchor(direction),
            KeyInput::Tab { backwards } => coordinator.cycle_tab(backwards),
            KeyInput::Delete => {
                let dismissed = coordinator.dismiss_selected_ghosts();
                return Effects {
                    changed: dismissed > 0,
                    ..Effects::default()
                };
            }
            KeyInput::Escape => {
                if !self.search.is_empty() {
                    self.search.clear();
                } else {
                    coordinator.clear_selection();
                }
                return Effects {
                    changed: true,
                    ..Effects::default()
                };
            }
        };

        let Some(node) = focused else {
            return Effects::default();
        };
        let on_screen = frame
            .position(node)
            .is_some_and(|at| circle_visible(frame.rect, at, frame.radius(node)));
        if !on_screen
            && let Some(position) = coordinator.model().and_then(|model| model.node(node)).map(|node| node.position)
        {
            viewport.focus_on(position, viewport.scale);
        }

        Effects {
            changed: true,
            ..Effects::default()
        }
    }
}
