mod clicks;
mod gesture;
mod keys;

use eframe::egui::{Modifiers, Pos2, Rect, Vec2};

use self::clicks::ClickTracker;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum PointerInput {
    Down {
        pos: Pos2,
        modifiers: Modifiers,
        time: f64,
    },
    Move {
        pos: Pos2,
    },
    Up {
        pos: Pos2,
        time: f64,
    },
    /// Multiplicative zoom around `pos`, from scroll or pinch.
    Zoom {
        pos: Pos2,
        factor: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum KeyInput {
    Arrow(Vec2),
    Tab { backwards: bool },
    Delete,
    Escape,
}

/// What the host should do after an input was handled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct Effects {
    pub changed: bool,
    pub ripple_at: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum DragKind {
    Node,
    Group,
    Cluster,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct PendingMerge {
    pub ghost_name: String,
    pub target_id: String,
    pub target_name: String,
}

#[derive(Clone, Debug)]
struct NodeDrag {
    kind: DragKind,
    primary: usize,
    dependents: Vec<usize>,
    ghost: Option<GhostDrag>,
}

#[derive(Clone, Debug)]
struct GhostDrag {
    name: String,
    /// Filled on the first moving frame of the drag.
    candidates: Option<Vec<usize>>,
    snapped: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Pos2,
    /// Last pointer position whose movement has been applied.
    applied: Pos2,
    node: Option<usize>,
    /// Bridge whose badge was pressed; takes precedence over `node`.
    badge: Option<usize>,
    modifiers: Modifiers,
    moved: bool,
}

/// Pointer and keyboard state for the graph canvas.
///
/// Drag, marquee, lasso and pan are independent optional axes rather than
/// one enum; [`InteractionState::reset_gesture`] clears all of them at the
/// end of every gesture.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct InteractionState {
    pub search: String,
    pub hovered: Option<usize>,
    pub hovered_edge: Option<usize>,
    pub pending_merge: Option<PendingMerge>,
    drag: Option<NodeDrag>,
    marquee: Option<(Pos2, Pos2)>,
    lasso: Option<Vec<Pos2>>,
    pan: bool,
    press: Option<Press>,
    clicks: ClickTracker,
}

impl InteractionState {
    pub fn reset_gesture(&mut self) {
        self.drag = None;
        self.marquee = None;
        self.lasso = None;
        self.pan = false;
        self.press = None;
    }

    /// Drops everything that refers to node indices of a replaced model.
    pub fn forget_graph(&mut self) {
        self.reset_gesture();
        self.hovered = None;
        self.hovered_edge = None;
        self.pending_merge = None;
        self.clicks.reset();
    }

    pub fn drag_kind(&self) -> Option<DragKind> {
        self.drag.as_ref().map(|drag| drag.kind)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some() && self.press.is_some_and(|press| press.moved)
    }

    /// A button went down on the canvas and has not been released yet.
    pub fn gesture_active(&self) -> bool {
        self.press.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan
    }

    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee
            .map(|(origin, current)| Rect::from_two_pos(origin, current))
    }

    pub fn lasso_path(&self) -> Option<&[Pos2]> {
        self.lasso.as_deref()
    }

    /// `(ghost, snap target)` while a ghost drag is snapped.
    pub fn ghost_snap(&self) -> Option<(usize, usize)> {
        let drag = self.drag.as_ref()?;
        let target = drag.ghost.as_ref()?.snapped?;
        Some((drag.primary, target))
    }

    pub fn ghost_candidates(&self) -> &[usize] {
        self.drag
            .as_ref()
            .and_then(|drag| drag.ghost.as_ref())
            .and_then(|ghost| ghost.candidates.as_deref())
            .unwrap_or(&[])
    }
}
