/// Screen pixels the ghost outline dash pattern travels per second.
const ANT_SPEED: f32 = 18.0;
const ANT_PERIOD: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Ripple {
    pub node: usize,
    pub started: f64,
}

/// Phase values for the few time-driven effects. Nothing here runs unless
/// [`Animations::tick`] is called, and `tick` reports when it can stop.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Animations {
    ant_phase: f32,
    ripple: Option<Ripple>,
    last_tick: Option<f64>,
    ripple_duration: f64,
}

impl Animations {
    pub fn new(ripple_duration_secs: f32) -> Self {
        Self {
            ripple_duration: f64::from(ripple_duration_secs.max(0.05)),
            ..Self::default()
        }
    }

    pub fn start_ripple(&mut self, node: usize, now: f64) {
        self.ripple = Some(Ripple { node, started: now });
    }

    pub fn ant_phase(&self) -> f32 {
        self.ant_phase
    }

    /// `(node, progress in [0, 1))` while a ripple is running.
    pub fn ripple(&self, now: f64) -> Option<(usize, f32)> {
        let ripple = self.ripple?;
        let progress = (now - ripple.started) / self.ripple_duration;
        (0.0..1.0)
            .contains(&progress)
            .then_some((ripple.node, progress as f32))
    }

    /// Advances phases to `now`. Returns `true` while another frame is
    /// needed.
    pub fn tick(&mut self, now: f64, ghosts_visible: bool) -> bool {
        let elapsed = self
            .last_tick
            .map_or(0.0, |last| (now - last).clamp(0.0, 0.25)) as f32;

        if ghosts_visible {
            self.ant_phase = (self.ant_phase + elapsed * ANT_SPEED) % ANT_PERIOD;
        }
        if self.ripple.is_some() && self.ripple(now).is_none() {
            self.ripple = None;
        }

        let active = ghosts_visible || self.ripple.is_some();
        self.last_tick = active.then_some(now);
        active
    }

    /// Forgets node-indexed state after the model was replaced.
    pub fn clear_targets(&mut self) {
        self.ripple = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ripple_runs_for_its_duration_then_stops_ticking() {
        let mut animations = Animations::new(0.5);
        animations.start_ripple(3, 10.0);
        assert!(animations.tick(10.0, false));
        assert_eq!(animations.ripple(10.25), Some((3, 0.5)));
        assert!(animations.tick(10.4, false));
        assert!(!animations.tick(10.6, false));
        assert_eq!(animations.ripple(10.6), None);
    }

    #[test]
    fn idle_without_ghosts() {
        let mut animations = Animations::new(0.9);
        assert!(!animations.tick(1.0, false));
        assert_eq!(animations.ant_phase(), 0.0);
    }

    #[test]
    fn marching_ants_advance_while_ghosts_show() {
        let mut animations = Animations::new(0.9);
        assert!(animations.tick(1.0, true));
        assert!(animations.tick(1.1, true));
        assert!(animations.ant_phase() > 0.0);
        assert!(animations.ant_phase() < ANT_PERIOD);
    }
}
