use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use fitts::surface::SurfaceCommand;
use fitts::{
    ClickOutcome, Error, ExperimentConfig, RecordingSurface, SessionPhase, TrialController,
    NUM_SLOTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Session-level invariants checked after every click of many random sessions.
#[test]
fn invariants_hold_across_random_sessions() {
    let mut clicker = StdRng::seed_from_u64(2024);

    for seed in 0..25u64 {
        let cfg = ExperimentConfig {
            num_trials: 30,
            target_distribution: [0.4, 0.3, 0.15, 0.1, 0.05],
            ..Default::default()
        };
        let mut ctl = TrialController::with_seed(cfg.clone(), RecordingSurface::new(), seed).unwrap();

        for trial in 1..=cfg.num_trials {
            let target = ctl.state().current_target;
            let errors_before = ctl.state().error_count;
            let slot = clicker.gen_range(0..NUM_SLOTS);

            let outcome = ctl.log_click(slot).unwrap();

            let state = ctl.state();
            let clicks: u32 = ctl.slots().iter().map(|s| s.click_count).sum();
            assert_eq!(clicks, state.trials_completed);
            assert_eq!(state.trials_completed, trial);
            assert_eq!(state.latencies_ms.len(), trial as usize);
            assert!(state.error_count <= state.trials_completed);

            if slot == target {
                assert_eq!(outcome, ClickOutcome::Correct);
                assert_eq!(state.error_count, errors_before);
            } else {
                assert_eq!(outcome, ClickOutcome::Incorrect);
                assert_eq!(state.error_count, errors_before + 1);
            }

            let widths = ctl.surface().widths;
            assert!(widths.iter().all(|&w| w >= cfg.min_button_width));
            let total: f64 = widths.iter().sum();
            assert!((total - cfg.total_space).abs() < 1e-9, "row sums to {total}");
        }

        assert_eq!(ctl.state().phase, SessionPhase::Ended);
    }
}

#[test]
fn summary_reports_mean_latency_in_seconds_and_error_rate() {
    let start = Instant::now();
    let cfg = ExperimentConfig {
        num_trials: 5,
        target_distribution: [0.0, 0.0, 1.0, 0.0, 0.0],
        ..Default::default()
    };
    let mut ctl = TrialController::with_rng(
        cfg,
        RecordingSurface::new(),
        StdRng::seed_from_u64(0),
        start,
    )
    .unwrap();

    let clicks = [(2, 250), (2, 750), (0, 1500), (2, 2000), (4, 2500)];
    for (slot, at_ms) in clicks {
        ctl.log_click_at(slot, start + Duration::from_millis(at_ms))
            .unwrap();
    }

    let latencies = &ctl.state().latencies_ms;
    assert_eq!(latencies, &vec![250, 500, 750, 500, 500]);

    let summary = ctl.surface().summary.unwrap();
    let mean_ms = latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
    assert_eq!(summary.mean_latency_secs, mean_ms / 1000.0);
    assert_eq!(summary.error_rate, 2.0 / 5.0);
    assert_eq!(summary.errors, 2);
    assert_eq!(
        ctl.surface().commands.last(),
        Some(&SurfaceCommand::NotifySummary(summary))
    );
}

#[test]
fn static_session_keeps_minimum_widths_to_the_end() {
    let cfg = ExperimentConfig {
        adaptive: false,
        num_trials: 10,
        ..Default::default()
    };
    let mut ctl = TrialController::with_seed(cfg, RecordingSurface::new(), 77).unwrap();
    ctl.surface_mut().clear_commands();

    for i in 0..10 {
        ctl.log_click(i % 3).unwrap();
    }

    assert!(ctl.is_ended());
    assert!(ctl.surface().width_commands().is_empty());
    assert_eq!(ctl.surface().widths, [30.0; NUM_SLOTS]);
}

#[test]
fn degenerate_distribution_always_targets_first_slot() {
    let cfg = ExperimentConfig {
        num_trials: 200,
        target_distribution: [1.0, 0.0, 0.0, 0.0, 0.0],
        ..Default::default()
    };
    let mut ctl = TrialController::new(cfg, RecordingSurface::new()).unwrap();

    while !ctl.is_ended() {
        assert_eq!(ctl.state().current_target, 0);
        assert_eq!(ctl.log_click(0).unwrap(), ClickOutcome::Correct);
    }
    assert_eq!(ctl.summary().unwrap().error_rate, 0.0);
}

#[test]
fn ended_session_rejects_clicks_and_keeps_counters() {
    let cfg = ExperimentConfig {
        num_trials: 2,
        ..Default::default()
    };
    let mut ctl = TrialController::with_seed(cfg, RecordingSurface::new(), 3).unwrap();
    ctl.log_click(0).unwrap();
    ctl.log_click(4).unwrap();

    let state = ctl.state().clone();
    let counts: Vec<u32> = ctl.slots().iter().map(|s| s.click_count).collect();

    for slot in 0..NUM_SLOTS {
        assert_matches!(
            ctl.log_click(slot),
            Err(Error::TerminalStateViolation { trials: 2 })
        );
    }
    assert_matches!(
        ctl.log_click(99),
        Err(Error::TerminalStateViolation { .. })
    );

    assert_eq!(ctl.state(), &state);
    let after: Vec<u32> = ctl.slots().iter().map(|s| s.click_count).collect();
    assert_eq!(after, counts);
}
