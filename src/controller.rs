use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ExperimentConfig;
use crate::selection::draw_target;
use crate::session::{SessionPhase, SessionState, Summary};
use crate::sizing::{compute_widths, SlotWidths};
use crate::slot::{initial_slots, Slot, SlotLabel, NUM_SLOTS};
use crate::surface::DisplaySurface;
use crate::{Error, Result};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Correct,
    Incorrect,
}

/// Drives one experiment session: picks targets, logs clicks, resizes slots.
///
/// All mutation goes through [`TrialController::log_click`]; once the trial
/// budget is spent the session is Ended and further clicks are rejected.
#[derive(Debug)]
pub struct TrialController<S: DisplaySurface> {
    config: ExperimentConfig,
    slots: [Slot; NUM_SLOTS],
    state: SessionState,
    surface: S,
    rng: StdRng,
    last_click_at: Instant,
}

impl<S: DisplaySurface> TrialController<S> {
    pub fn new(config: ExperimentConfig, surface: S) -> Result<Self> {
        Self::with_rng(config, surface, StdRng::from_entropy(), Instant::now())
    }

    /// Deterministic target sequence, used for reproducible runs and tests
    pub fn with_seed(config: ExperimentConfig, surface: S, seed: u64) -> Result<Self> {
        Self::with_rng(
            config,
            surface,
            StdRng::seed_from_u64(seed),
            Instant::now(),
        )
    }

    pub fn with_rng(
        config: ExperimentConfig,
        mut surface: S,
        mut rng: StdRng,
        started_at: Instant,
    ) -> Result<Self> {
        config.validate()?;

        let slots = initial_slots(config.min_button_width);
        for slot in &slots {
            surface.set_slot_width(slot.label.index(), slot.width);
        }

        let target = draw_target(&config.target_distribution, &mut rng);
        surface.render_target(SlotLabel::ALL[target]);

        info!(
            num_trials = config.num_trials,
            adaptive = config.adaptive,
            first_target = %SlotLabel::ALL[target],
            "session started"
        );

        Ok(Self {
            config,
            slots,
            state: SessionState::new(target),
            surface,
            rng,
            last_click_at: started_at,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn slots(&self) -> &[Slot; NUM_SLOTS] {
        &self.slots
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    pub fn current_target_label(&self) -> SlotLabel {
        SlotLabel::ALL[self.state.current_target]
    }

    pub fn summary(&self) -> Option<Summary> {
        self.is_ended()
            .then(|| Summary::from_state(&self.state, self.config.num_trials))
    }

    /// Draw the next target from the configured distribution
    pub fn choose_next_target(&mut self) -> usize {
        draw_target(&self.config.target_distribution, &mut self.rng)
    }

    /// Recompute slot widths from click history and push them to the surface.
    /// Does nothing when adaptive sizing is off.
    pub fn recompute_widths(&mut self) -> Option<SlotWidths> {
        let widths = compute_widths(&self.slots, &self.config)?;
        for (slot, (_, width)) in self.slots.iter_mut().zip(widths.iter()) {
            slot.width = width;
            self.surface.set_slot_width(slot.label.index(), width);
        }
        debug!(%widths, "slots resized");
        Some(widths)
    }

    /// Entry point for the display surface when a slot is activated
    pub fn on_slot_activated(&mut self, slot_index: usize) -> Result<ClickOutcome> {
        self.log_click(slot_index)
    }

    pub fn log_click(&mut self, slot_index: usize) -> Result<ClickOutcome> {
        self.log_click_at(slot_index, Instant::now())
    }

    /// Log a click that happened at `at`.
    pub fn log_click_at(&mut self, slot_index: usize, at: Instant) -> Result<ClickOutcome> {
        if self.state.is_ended() {
            warn!(slot_index, "click after session ended");
            return Err(Error::TerminalStateViolation {
                trials: self.state.trials_completed,
            });
        }
        let Some(label) = SlotLabel::from_index(slot_index) else {
            warn!(slot_index, "click on unknown slot");
            return Err(Error::InvalidSlotIndex { index: slot_index });
        };

        self.state.trials_completed += 1;
        let outcome = if label == self.current_target_label() {
            ClickOutcome::Correct
        } else {
            self.state.error_count += 1;
            ClickOutcome::Incorrect
        };
        self.slots[slot_index].click_count += 1;

        let latency_ms = at.saturating_duration_since(self.last_click_at).as_millis() as u64;
        self.state.latencies_ms.push(latency_ms);
        self.last_click_at = at;

        debug!(
            trial = self.state.trials_completed,
            clicked = %label,
            target = %self.current_target_label(),
            ?outcome,
            latency_ms,
            "click logged"
        );

        self.recompute_widths();

        if self.state.trials_completed < self.config.num_trials {
            self.state.current_target = self.choose_next_target();
            self.surface.render_target(self.current_target_label());
        } else {
            self.state.phase = SessionPhase::Ended;
            let summary = Summary::from_state(&self.state, self.config.num_trials);
            info!(
                mean_latency_secs = summary.mean_latency_secs,
                error_rate = summary.error_rate,
                "session ended"
            );
            self.surface.notify_summary(&summary);
        }

        Ok(outcome)
    }
}
