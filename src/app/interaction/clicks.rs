use eframe::egui::Pos2;

const MULTI_CLICK_WINDOW_SECS: f64 = 0.35;
const MULTI_CLICK_SLOP: f32 = 6.0;
const MAX_CLICK_COUNT: u8 = 3;

/// Counts consecutive clicks on the same target.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct ClickTracker {
    last: Option<(f64, Pos2, Option<usize>)>,
    count: u8,
}

impl ClickTracker {
    /// Records a click and returns its count: 1, 2 or 3. A fourth quick
    /// click starts over at 1.
    pub fn register(&mut self, time: f64, position: Pos2, target: Option<usize>) -> u8 {
        let continues = self.last.is_some_and(|(last_time, last_position, last_target)| {
            time - last_time <= MULTI_CLICK_WINDOW_SECS
                && last_position.distance(position) <= MULTI_CLICK_SLOP
                && last_target == target
        });

        self.count = if continues && self.count < MAX_CLICK_COUNT {
            self.count + 1
        } else {
            1
        };
        self.last = Some((time, position, target));
        self.count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
