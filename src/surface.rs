use crate::session::Summary;
use crate::slot::{SlotLabel, NUM_SLOTS};

/// Presentation boundary commanded by the trial controller.
///
/// Implementations only mirror state; they never feed back into sizing or
/// target selection. Slot activations travel the other way, through
/// [`crate::TrialController::on_slot_activated`].
pub trait DisplaySurface {
    /// Show the label the user must click next.
    fn render_target(&mut self, label: SlotLabel);

    /// Adjust a slot's width, in the same units as `total_space`.
    fn set_slot_width(&mut self, slot: usize, width: f64);

    /// Present end-of-session results.
    fn notify_summary(&mut self, summary: &Summary);
}

/// One command received by a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    RenderTarget(SlotLabel),
    SetSlotWidth(usize, f64),
    NotifySummary(Summary),
}

/// In-memory surface for headless drivers and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub target: Option<SlotLabel>,
    pub widths: [f64; NUM_SLOTS],
    pub summary: Option<Summary>,
    pub commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width commands in the order they arrived
    pub fn width_commands(&self) -> Vec<(usize, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::SetSlotWidth(slot, width) => Some((*slot, *width)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn render_target(&mut self, label: SlotLabel) {
        self.target = Some(label);
        self.commands.push(SurfaceCommand::RenderTarget(label));
    }

    fn set_slot_width(&mut self, slot: usize, width: f64) {
        self.widths[slot] = width;
        self.commands.push(SurfaceCommand::SetSlotWidth(slot, width));
    }

    fn notify_summary(&mut self, summary: &Summary) {
        self.summary = Some(*summary);
        self.commands.push(SurfaceCommand::NotifySummary(*summary));
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn render_target(&mut self, label: SlotLabel) {
        (**self).render_target(label)
    }

    fn set_slot_width(&mut self, slot: usize, width: f64) {
        (**self).set_slot_width(slot, width)
    }

    fn notify_summary(&mut self, summary: &Summary) {
        (**self).notify_summary(summary)
    }
}
