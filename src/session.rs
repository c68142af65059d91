use serde::Serialize;

/// Lifecycle of a session; Ended is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Running,
    Ended,
}

/// Mutable trial bookkeeping owned by the controller
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_target: usize,
    pub trials_completed: u32,
    pub error_count: u32,
    /// Milliseconds since the previous click (or session start), one per trial
    pub latencies_ms: Vec<u64>,
    pub phase: SessionPhase,
}

impl SessionState {
    pub fn new(initial_target: usize) -> Self {
        Self {
            current_target: initial_target,
            trials_completed: 0,
            error_count: 0,
            latencies_ms: Vec::new(),
            phase: SessionPhase::Running,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }
}

/// End-of-session results handed to the display surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean_latency_secs: f64,
    pub latency_std_dev_secs: f64,
    pub error_rate: f64,
    pub trials: u32,
    pub errors: u32,
}

impl Summary {
    pub fn from_state(state: &SessionState, num_trials: u32) -> Self {
        let secs: Vec<f64> = state
            .latencies_ms
            .iter()
            .map(|&ms| ms as f64 / 1000.0)
            .collect();

        Self {
            mean_latency_secs: mean(&secs).unwrap_or(0.0),
            latency_std_dev_secs: std_dev(&secs).unwrap_or(0.0),
            error_rate: state.error_count as f64 / num_trials as f64,
            trials: state.trials_completed,
            errors: state.error_count,
        }
    }

    pub fn error_percent(&self) -> f64 {
        self.error_rate * 100.0
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;

            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
