use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;

/// Maps graph space onto the canvas.
///
/// `offset` is a screen-space pan layered on top of `center`; every
/// programmatic change of `center`/`scale` goes through [`Viewport::set_view`]
/// and resets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Vec2,
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.offset + (world - self.center) * self.scale
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.offset) / self.scale + self.center
    }

    pub fn set_view(&mut self, center: Vec2, scale: f32) {
        self.center = center;
        self.scale = clamp_scale(scale);
        self.offset = Vec2::ZERO;
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiplies the scale by `factor`, keeping the graph point under
    /// `focal` fixed on screen.
    pub fn zoom_around(&mut self, rect: Rect, focal: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let world_before = self.screen_to_world(rect, focal);
        self.scale = clamp_scale(self.scale * factor);
        self.offset = focal - rect.center() - (world_before - self.center) * self.scale;
    }

    pub fn zoom_by(&mut self, rect: Rect, factor: f32) {
        self.zoom_around(rect, rect.center(), factor);
    }

    pub fn focus_on(&mut self, world: Vec2, scale: f32) {
        self.set_view(world, scale);
    }

    pub fn fit_to_bounds(&mut self, rect: Rect, bounds: Rect, padding: f32) {
        if !bounds.is_finite() || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let usable_w = (rect.width() - padding * 2.0).max(1.0);
        let usable_h = (rect.height() - padding * 2.0).max(1.0);
        let scale_x = usable_w / bounds.width().max(1.0);
        let scale_y = usable_h / bounds.height().max(1.0);
        self.set_view(bounds.center().to_vec2(), scale_x.min(scale_y));
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}
