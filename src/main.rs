use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use fitts::{
    app_dirs::AppDirs,
    config::{distribution_from_slice, ConfigError, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner, SessionEvent},
    ui::{slot_for_key, TerminalSurface},
    ClickOutcome, Error as SessionError, ExperimentConfig, TrialController,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// adaptive-width target clicking experiment
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click the highlighted target letter as fast as you can. Slot widths adapt to how often each slot gets clicked; mean click time and error rate are reported at the end."
)]
pub struct Cli {
    /// minimum width of a slot, in layout units
    #[clap(short = 'm', long)]
    min_button_width: Option<f64>,

    /// total width shared by all slots, in layout units
    #[clap(short = 't', long)]
    total_space: Option<f64>,

    /// probability of each slot A..E being the target, comma separated
    #[clap(short = 'd', long, value_delimiter = ',', allow_negative_numbers = true)]
    distribution: Option<Vec<f64>>,

    /// number of clicks in the session
    #[clap(short = 'n', long)]
    trials: Option<u32>,

    /// keep every slot at the minimum width for the whole session
    #[clap(long = "static", conflicts_with = "adaptive")]
    static_widths: bool,

    /// resize slots by click frequency (overrides a config file that disables it)
    #[clap(long)]
    adaptive: bool,

    /// seed for a reproducible target sequence
    #[clap(long)]
    seed: Option<u64>,

    /// read defaults from this config file instead of the user config
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective configuration back to the config file
    #[clap(long)]
    save_config: bool,

    /// debug-level logging
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Layer command line values over `base`
    fn to_experiment_config(&self, base: ExperimentConfig) -> Result<ExperimentConfig, ConfigError> {
        let mut cfg = base;
        if let Some(min) = self.min_button_width {
            cfg.min_button_width = min;
        }
        if let Some(total) = self.total_space {
            cfg.total_space = total;
        }
        if let Some(weights) = &self.distribution {
            cfg.target_distribution = distribution_from_slice(weights)?;
        }
        if let Some(trials) = self.trials {
            cfg.num_trials = trials;
        }
        if self.static_widths {
            cfg.adaptive = false;
        } else if self.adaptive {
            cfg.adaptive = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug)]
pub struct App {
    pub controller: TrialController<TerminalSurface>,
}

impl App {
    pub fn new(config: ExperimentConfig, seed: Option<u64>) -> fitts::Result<Self> {
        let surface = TerminalSurface::new(config.total_space, config.num_trials);
        let controller = match seed {
            Some(seed) => TrialController::with_seed(config, surface, seed)?,
            None => TrialController::new(config, surface)?,
        };
        Ok(Self { controller })
    }

    /// Forward a slot activation to the controller
    fn activate(&mut self, slot: usize) {
        match self.controller.on_slot_activated(slot) {
            Ok(outcome) => {
                let trials = self.controller.state().trials_completed;
                self.controller.surface_mut().record_click(trials, outcome);
                if outcome == ClickOutcome::Incorrect {
                    debug!(slot, "wrong slot");
                }
            }
            Err(SessionError::TerminalStateViolation { .. }) => {
                debug!(slot, "ignoring click on finished session");
            }
            Err(e) => warn!("click rejected: {e}"),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the TUI, so logs go to a file or nowhere
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli.config_store();
    let config = match cli.to_experiment_config(store.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, e).exit();
        }
    };
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "configuration saved");
    }

    let mut app = App::new(config, cli.seed)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;
    result?;

    if let Some(summary) = app.controller.summary() {
        println!("end of trial!");
        println!("mean click time = {}", summary.mean_latency_secs);
        println!("percent errors = {}", summary.error_rate);
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(app.controller.surface(), f.area()))?;

    loop {
        match runner.step() {
            SessionEvent::Tick => continue,
            SessionEvent::Resize => {}
            SessionEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    code => {
                        if let Some(slot) = slot_for_key(code) {
                            app.activate(slot);
                        }
                    }
                }
            }
            SessionEvent::Click { column, row } => {
                let size = terminal.size()?;
                let area = Rect::new(0, 0, size.width, size.height);
                if let Some(slot) = app.controller.surface().slot_at(area, column, row) {
                    app.activate(slot);
                }
            }
        }
        terminal.draw(|f| f.render_widget(app.controller.surface(), f.area()))?;
    }

    Ok(())
}
