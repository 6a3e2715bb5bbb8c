pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use overdue::{
    app_dirs::AppDirs,
    autoplay::{simulate, BatchSummary, PlayStyle},
    config::{ConfigStore, FileConfigStore, GameConfig},
    runtime::{GameEvent, Runner, Step, TerminalEvents},
    session::{Input, Session},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME_MS: u64 = 50;

/// click through a workday without forgetting to eat, take a break and sleep
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click through a workday in your terminal. Now and then a prompt offers food, a break or sleep: take it, or burn out before the work is due."
)]
pub struct Cli {
    /// read settings from this file instead of the default config location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seconds until the work is due
    #[clap(short = 'd', long)]
    due_secs: Option<f64>,

    /// missed prompts per part of the day before burning out
    #[clap(short = 'm', long)]
    missed_threshold: Option<u32>,

    /// clicks needed to finish eating, a break or sleeping
    #[clap(short = 'a', long)]
    activity_clicks: Option<u32>,

    /// starting odds (1 in n) of the prompt showing up
    #[clap(long)]
    prompt_chance: Option<u32>,

    /// idle seconds before something else happens
    #[clap(long)]
    secret_secs: Option<f64>,

    /// seconds the end screen stays up
    #[clap(long)]
    reset_secs: Option<f64>,

    /// number of work items to click through
    #[clap(short = 'w', long)]
    work_items: Option<usize>,

    /// seed for the random prompt, for repeatable games
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// play this many games headless and print one JSON report per game
    #[clap(long)]
    simulate: Option<usize>,

    /// chance per step that the headless player takes a visible prompt
    #[clap(long, default_value_t = 0.3, value_parser = parse_probability)]
    diligence: f64,

    /// clicks per second of the headless player
    #[clap(long, default_value_t = 5.0)]
    clicks_per_second: f64,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not between 0 and 1"))
    }
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Applies command line overrides on top of the stored config
    fn game_config(&self, mut cfg: GameConfig) -> GameConfig {
        if let Some(v) = self.due_secs {
            cfg.due_duration = v;
        }
        if let Some(v) = self.missed_threshold {
            cfg.missed_threshold = v;
        }
        if let Some(v) = self.activity_clicks {
            cfg.max_activity_clicks = v;
        }
        if let Some(v) = self.prompt_chance {
            cfg.initial_prompt_chance = v;
        }
        if let Some(v) = self.secret_secs {
            cfg.secret_time_threshold = v;
        }
        if let Some(v) = self.reset_secs {
            cfg.reset_delay_after_game_over = v;
        }
        if let Some(v) = self.work_items {
            cfg.work_item_count = v;
        }
        cfg
    }

    fn play_style(&self) -> PlayStyle {
        PlayStyle {
            diligence: self.diligence,
            clicks_per_second: self.clicks_per_second,
            ..PlayStyle::default()
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// terminal area of the last drawn frame, used to hit-test the prompt
    pub area: Rect,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            area: Rect::new(0, 0, 80, 24),
        }
    }

    fn over_prompt(&self, column: u16, row: u16) -> bool {
        ui::prompt_rect(self.area, &self.session.snapshot())
            .is_some_and(|r| r.contains(Position::new(column, row)))
    }
}

#[derive(Debug, PartialEq)]
enum Control {
    Continue,
    Quit,
}

fn handle_key(app: &mut App, key: KeyEvent, dt: f64) -> Control {
    if key.kind == KeyEventKind::Release {
        app.session.advance(dt, &[]);
        return Control::Continue;
    }

    match key.code {
        KeyCode::Esc => return Control::Quit,
        // ctrl+c to quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Control::Quit
        }
        KeyCode::Char('r') => {
            app.session.reset();
            app.session.advance(dt, &[]);
        }
        KeyCode::Char(' ') => app.session.advance(dt, &[Input::Primary]),
        KeyCode::Enter => {
            app.session.accept_prompt();
            app.session.advance(dt, &[]);
        }
        _ => app.session.advance(dt, &[]),
    }
    Control::Continue
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, dt: f64) {
    let over = app.over_prompt(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.session.set_over_prompt(over);
            app.session.advance(dt, &[]);
        }
        MouseEventKind::Down(MouseButton::Middle) => {
            app.session.reset();
            app.session.advance(dt, &[]);
        }
        MouseEventKind::Down(_) if over => {
            app.session.accept_prompt();
            app.session.advance(dt, &[]);
        }
        MouseEventKind::Down(MouseButton::Left) => app.session.advance(dt, &[Input::Primary]),
        MouseEventKind::Down(MouseButton::Right) => {
            app.session.advance(dt, &[Input::Secondary])
        }
        _ => app.session.advance(dt, &[]),
    }
}

fn handle_event(app: &mut App, ev: GameEvent, dt: f64) -> Control {
    match ev {
        GameEvent::Key(key) => return handle_key(app, key, dt),
        GameEvent::Mouse(mouse) => handle_mouse(app, mouse, dt),
        GameEvent::Resize => app.session.advance(dt, &[]),
    }
    Control::Continue
}

fn init_logging(headless: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("overdue=info"));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return;
    }

    // stdout belongs to the alternate screen, so the TUI logs to a file
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

fn run_simulation(cli: &Cli, config: &GameConfig, runs: usize) -> Result<(), Box<dyn Error>> {
    let seed = cli.seed.unwrap_or(0);
    info!(runs, seed, "simulating");

    let reports = simulate(config, cli.play_style(), runs, seed)?;

    let mut out = io::stdout().lock();
    for report in &reports {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
    }
    writeln!(out, "{}", serde_json::to_string(&BatchSummary::of(&reports))?)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = cli.config_store();
    let config = cli.game_config(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }

    if cli.save_config {
        store.save(&config)?;
    }

    if let Some(runs) = cli.simulate {
        init_logging(true);
        return run_simulation(&cli, &config, runs);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(false);

    let session = match cli.seed {
        Some(seed) => Session::seeded(config, seed)?,
        None => Session::new(config)?,
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(TerminalEvents, Duration::from_millis(FRAME_MS));

    loop {
        terminal.draw(|f| ui(app, f))?;

        if handle_step(app, runner.step()?) == Control::Quit {
            break;
        }
    }

    Ok(())
}

/// Time passes once per frame; later events in the same frame see no extra time.
fn handle_step(app: &mut App, step: Step) -> Control {
    if step.events.is_empty() {
        app.session.advance(step.dt, &[]);
        return Control::Continue;
    }

    let mut dt = step.dt;
    for ev in step.events {
        if handle_event(app, ev, dt) == Control::Quit {
            return Control::Quit;
        }
        dt = 0.0;
    }
    Control::Continue
}

fn ui(app: &mut App, f: &mut Frame) {
    app.area = f.area();
    let snapshot = app.session.snapshot();
    ui::screen::current_screen(&snapshot).render(app, &snapshot, f);
}
