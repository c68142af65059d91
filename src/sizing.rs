use itertools::Itertools;
use std::fmt;
use std::ops::Index;

use crate::config::ExperimentConfig;
use crate::slot::{Slot, SlotLabel, NUM_SLOTS};

/// Width per slot, keyed by slot label rather than computation order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotWidths([f64; NUM_SLOTS]);

impl SlotWidths {
    pub fn uniform(width: f64) -> Self {
        Self([width; NUM_SLOTS])
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> &[f64; NUM_SLOTS] {
        &self.0
    }

    /// Widths paired with their labels, in slot order A..E
    pub fn iter(&self) -> impl Iterator<Item = (SlotLabel, f64)> + '_ {
        SlotLabel::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<SlotLabel> for SlotWidths {
    type Output = f64;

    fn index(&self, label: SlotLabel) -> &f64 {
        &self.0[label.index()]
    }
}

impl fmt::Display for SlotWidths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|(label, width)| format!("{label}={width:.1}"))
            .join(" ");
        f.write_str(&joined)
    }
}

/// Redistribute `total_space` across the slots by click frequency.
///
/// Never-clicked slots keep `min_button_width`; whatever remains is split
/// between clicked slots in proportion to their click counts. A clicked slot
/// whose proportional share would fall under the minimum is pinned to the
/// minimum and the rest is re-split among the others, so the row always sums
/// to `total_space`. Widths are exact floats, no rounding happens here.
///
/// Returns `None` when adaptive sizing is disabled, meaning widths stay
/// where they are.
pub fn compute_widths(slots: &[Slot; NUM_SLOTS], config: &ExperimentConfig) -> Option<SlotWidths> {
    if !config.adaptive {
        return None;
    }

    let min = config.min_button_width;
    let (mut clicked, never_clicked): (Vec<&Slot>, Vec<&Slot>) =
        slots.iter().partition(|s| s.was_clicked());

    let mut widths = SlotWidths::uniform(min);
    let mut distributable = config.total_space - never_clicked.len() as f64 * min;

    while !clicked.is_empty() {
        let total_clicks: u32 = clicked.iter().map(|s| s.click_count).sum();
        let share = |s: &Slot| distributable * s.click_count as f64 / total_clicks as f64;

        let (starved, fed): (Vec<&Slot>, Vec<&Slot>) =
            clicked.into_iter().partition(|s| share(*s) < min);
        if starved.is_empty() {
            for slot in fed {
                widths.0[slot.label.index()] = share(slot);
            }
            break;
        }

        // starved slots already sit at the minimum
        distributable -= starved.len() as f64 * min;
        clicked = fed;
    }

    Some(widths)
}
