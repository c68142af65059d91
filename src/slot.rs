use serde::{Deserialize, Serialize};

/// Number of fixed slots presented to the user
pub const NUM_SLOTS: usize = 5;

/// Label of a slot, ordered A through E
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
pub enum SlotLabel {
    A,
    B,
    C,
    D,
    E,
}

impl SlotLabel {
    pub const ALL: [SlotLabel; NUM_SLOTS] = [
        SlotLabel::A,
        SlotLabel::B,
        SlotLabel::C,
        SlotLabel::D,
        SlotLabel::E,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A clickable target and its running click count and width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub label: SlotLabel,
    pub click_count: u32,
    pub width: f64,
}

impl Slot {
    pub fn new(label: SlotLabel, width: f64) -> Self {
        Self {
            label,
            click_count: 0,
            width,
        }
    }

    pub fn was_clicked(&self) -> bool {
        self.click_count > 0
    }
}

/// Build the fixed slot row with every slot at `width`
pub fn initial_slots(width: f64) -> [Slot; NUM_SLOTS] {
    SlotLabel::ALL.map(|label| Slot::new(label, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_display_as_letters() {
        let letters: Vec<String> = SlotLabel::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(letters, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn from_index_round_trips_and_rejects_out_of_range() {
        for (i, label) in SlotLabel::ALL.iter().enumerate() {
            assert_eq!(SlotLabel::from_index(i), Some(*label));
            assert_eq!(label.index(), i);
        }
        assert_eq!(SlotLabel::from_index(NUM_SLOTS), None);
    }

    #[test]
    fn initial_slots_are_unclicked_at_given_width() {
        let slots = initial_slots(30.0);
        assert!(slots.iter().all(|s| s.click_count == 0 && s.width == 30.0));
        assert!(!slots[0].was_clicked());
        assert_eq!(slots[4].label, SlotLabel::E);
    }
}
