pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use cubik::{
    app::{Notification, Stopwatch},
    config::{Config, ConfigStore, FileConfigStore},
    export::write_csv,
    logging,
    record::{Annotation, PenaltyPolicy},
    runtime::{CrosstermInputSource, Runner, TimerInput},
    scramble::RandomScrambler,
    session::SessionRegistry,
    store::{KvStore, SqliteStore},
    timer::Phase,
};
use log::{warn, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// hold-to-start puzzle timer with named practice sessions
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal stopwatch for puzzle practice: hold space, release to start, press again to stop. Solves are recorded against their scramble in named sessions with +2/DNF annotations and rolling averages."
)]
pub struct Cli {
    /// minimum hold in milliseconds before a release starts the timer
    #[clap(short = 't', long)]
    threshold_ms: Option<u64>,

    /// number of moves in each scramble
    #[clap(long)]
    scramble_length: Option<usize>,

    /// whether a second +2 on the same solve adds another two seconds
    #[clap(long, value_enum)]
    penalty_policy: Option<PenaltyPolicy>,

    /// session to open; an unknown name starts empty
    #[clap(short = 's', long, global = true)]
    session: Option<String>,

    /// path of the session database
    #[clap(long)]
    db: Option<PathBuf>,

    /// path of the config file
    #[clap(long)]
    config: Option<PathBuf>,

    /// log verbosity (off, error, warn, info, debug, trace)
    #[clap(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// one press starts, the next press stops; for terminals without key release events
    #[clap(long)]
    tap: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// list sessions and their solve counts
    Sessions,
    /// write the solves of a session as CSV
    Export {
        /// output file; stdout when omitted
        #[clap(short, long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    /// Command line flags win over the config file
    fn resolve_config(&self, mut config: Config) -> Config {
        if let Some(ms) = self.threshold_ms {
            config.hold_threshold_ms = ms;
        }
        if let Some(len) = self.scramble_length {
            config.scramble_length = len;
        }
        if let Some(policy) = self.penalty_policy {
            config.penalty_policy = policy;
        }
        config
    }

    fn open_store(&self) -> Result<SqliteStore, cubik::error::StoreError> {
        match &self.db {
            Some(path) => SqliteStore::open(path),
            None => SqliteStore::open_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Timing,
    NewSession(String),
    ConfirmDeleteRecord(usize),
    ConfirmDeleteSession(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App<S: KvStore> {
    pub stopwatch: Stopwatch<S, RandomScrambler>,
    pub mode: Mode,
    pub selected: Option<usize>,
    pub last_result: Option<String>,
    pub message: Option<String>,
}

impl<S: KvStore> App<S> {
    pub fn new(config: &Config, store: S, tap: bool) -> Self {
        let mut stopwatch =
            Stopwatch::new(config, store, RandomScrambler::new(config.scramble_length));
        stopwatch.set_tap_mode(tap);
        let selected = stopwatch.records().len().checked_sub(1);

        Self {
            stopwatch,
            mode: Mode::Timing,
            selected,
            last_result: None,
            message: None,
        }
    }

    fn absorb(&mut self, notifications: Vec<Notification>) {
        for notification in notifications {
            match notification {
                Notification::Armed | Notification::AttemptStarted => self.message = None,
                Notification::AttemptFinished(record) => {
                    self.last_result = Some(record.time);
                    self.selected = self.stopwatch.records().len().checked_sub(1);
                }
                Notification::RecordListChanged => {
                    let len = self.stopwatch.records().len();
                    self.selected = match self.selected {
                        _ if len == 0 => None,
                        Some(idx) => Some(idx.min(len - 1)),
                        None => Some(len - 1),
                    };
                }
                Notification::Disarmed
                | Notification::DisplayStopped
                | Notification::ScrambleChanged
                | Notification::SessionListChanged => {}
            }
        }
    }

    fn switch_to(&mut self, name: &str) {
        let notifications = self.stopwatch.switch_session(name);
        self.absorb(notifications);
        self.selected = self.stopwatch.records().len().checked_sub(1);
    }

    fn cycle_session(&mut self, forward: bool) {
        let sessions = self.stopwatch.sessions();
        let current = sessions
            .iter()
            .position(|name| name == self.stopwatch.active_session())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % sessions.len()
        } else {
            (current + sessions.len() - 1) % sessions.len()
        };
        let name = sessions[next].clone();
        self.switch_to(&name);
    }

    fn annotate_selected(&mut self, annotation: Annotation) {
        if let Some(idx) = self.selected {
            let notifications = self.stopwatch.annotate(idx, annotation);
            self.absorb(notifications);
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.mode == Mode::Timing {
            let notifications = self.stopwatch.on_mouse_event(&mouse, now);
            self.absorb(notifications);
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.mode == Mode::Timing {
            return self.on_timing_key(key, now);
        }

        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        // auto-repeat only feeds the text prompt
        if key.kind == KeyEventKind::Repeat && !matches!(self.mode, Mode::NewSession(_)) {
            return Flow::Continue;
        }

        match self.mode.clone() {
            Mode::Timing => {}
            Mode::NewSession(mut input) => match key.code {
                KeyCode::Enter => {
                    let name = input.trim().to_string();
                    let notifications = self.stopwatch.create_session(&name);
                    if notifications.is_empty() {
                        self.message = Some(format!("Session \"{name}\" was not created"));
                    } else {
                        self.absorb(notifications);
                        self.switch_to(&name);
                    }
                    self.mode = Mode::Timing;
                }
                KeyCode::Esc => self.mode = Mode::Timing,
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::NewSession(input);
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.mode = Mode::NewSession(input);
                }
                _ => {}
            },
            Mode::ConfirmDeleteRecord(idx) => {
                if key.code == KeyCode::Char('y') {
                    let notifications = self.stopwatch.annotate(idx, Annotation::Delete);
                    self.absorb(notifications);
                }
                self.mode = Mode::Timing;
            }
            Mode::ConfirmDeleteSession(name) => {
                if key.code == KeyCode::Char('y') {
                    let notifications = self.stopwatch.delete_session(&name);
                    self.absorb(notifications);
                    self.selected = self.stopwatch.records().len().checked_sub(1);
                    self.message = Some(format!("Deleted session \"{name}\""));
                }
                self.mode = Mode::Timing;
            }
        }

        Flow::Continue
    }

    fn on_timing_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        if key.code == KeyCode::Char(' ') {
            let notifications = self.stopwatch.on_key_event(&key, now);
            self.absorb(notifications);
            return Flow::Continue;
        }

        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        // a held command key acts once; the cursor keys may scroll
        if key.kind == KeyEventKind::Repeat && !matches!(key.code, KeyCode::Up | KeyCode::Down) {
            return Flow::Continue;
        }

        // only quitting is allowed mid-attempt
        if self.stopwatch.phase() != Phase::Idle {
            return if key.code == KeyCode::Esc {
                Flow::Quit
            } else {
                Flow::Continue
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Up => {
                self.selected = self.selected.map(|idx| idx.saturating_sub(1));
            }
            KeyCode::Down => {
                let len = self.stopwatch.records().len();
                self.selected = self
                    .selected
                    .map(|idx| (idx + 1).min(len.saturating_sub(1)))
                    .or(len.checked_sub(1));
            }
            KeyCode::Char('p') => self.annotate_selected(Annotation::AddPenalty),
            KeyCode::Char('d') => self.annotate_selected(Annotation::MarkDnf),
            KeyCode::Char('x') => {
                if let Some(idx) = self.selected {
                    self.mode = Mode::ConfirmDeleteRecord(idx);
                }
            }
            KeyCode::Char('n') => self.mode = Mode::NewSession(String::new()),
            KeyCode::Tab | KeyCode::Char(']') => self.cycle_session(true),
            KeyCode::BackTab | KeyCode::Char('[') => self.cycle_session(false),
            KeyCode::Char('D') => {
                self.mode = Mode::ConfirmDeleteSession(self.stopwatch.active_session().to_string());
            }
            _ => {}
        }

        Flow::Continue
    }
}

fn print_sessions<S: KvStore, W: Write>(
    registry: &SessionRegistry<S>,
    out: &mut W,
) -> io::Result<()> {
    for name in registry.list() {
        let marker = if name == registry.active() { "*" } else { " " };
        writeln!(out, "{marker} {name}\t{}", registry.records_of(&name).len())?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.resolve_config(config_store.load());

    if let Some(command) = &cli.command {
        logging::init_stderr(cli.log_level);
        let registry = SessionRegistry::new(cli.open_store()?, config.penalty_policy);

        match command {
            Command::Sessions => print_sessions(&registry, &mut io::stdout())?,
            Command::Export { out } => {
                let name = cli
                    .session
                    .clone()
                    .unwrap_or_else(|| registry.active().to_string());
                let records = registry.records_of(&name);
                match out {
                    Some(path) => write_csv(&records, File::create(path)?)?,
                    None => write_csv(&records, io::stdout())?,
                }
            }
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cubik::app_dirs::AppDirs::log_path() {
        if let Err(e) = logging::init_file(&path, cli.log_level) {
            eprintln!("Could not open log file {}: {e}", path.display());
        }
    }

    let mut app = App::new(&config, cli.open_store()?, false);
    if let Some(session) = &cli.session {
        app.switch_to(session);
    }

    let tap = cli.tap || !supports_keyboard_enhancement().unwrap_or(false);
    app.stopwatch.set_tap_mode(tap);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if !tap {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    if !tap {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&config) {
        warn!("Could not save config: {e}");
    }

    result
}

fn start_tui<B: Backend, S: KvStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermInputSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        // the display schedule only exists while an attempt is running
        let input = runner.step_for(app.stopwatch.display_interval());
        let now = Instant::now();

        match input {
            TimerInput::Tick => {
                if app.stopwatch.display_interval().is_none() {
                    continue;
                }
            }
            TimerInput::Resize => {}
            TimerInput::Key(key) => {
                if app.on_key(key, now) == Flow::Quit {
                    break;
                }
            }
            TimerInput::Mouse(mouse) => app.on_mouse(mouse, now),
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui<S: KvStore>(app: &App<S>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubik::record::Status;
    use cubik::session::DEFAULT_SESSION;
    use cubik::store::MemoryStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStore> {
        App::new(&Config::default(), MemoryStore::new(), false)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// hold space for `hold`, release, then press again after `solve`
    fn solve_with_space(app: &mut App<MemoryStore>, t0: Instant, hold: u64, solve: u64) {
        app.on_key(press(KeyCode::Char(' ')), t0);
        app.on_key(release(KeyCode::Char(' ')), t0 + ms(hold));
        app.on_key(press(KeyCode::Char(' ')), t0 + ms(hold + solve));
        app.on_key(release(KeyCode::Char(' ')), t0 + ms(hold + solve + 50));
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            app.on_key(press(KeyCode::Char(c)), Instant::now());
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["cubik"]);

        assert_eq!(cli.threshold_ms, None);
        assert_eq!(cli.scramble_length, None);
        assert_eq!(cli.penalty_policy, None);
        assert_eq!(cli.session, None);
        assert_eq!(cli.log_level, LevelFilter::Warn);
        assert!(!cli.tap);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "cubik",
            "-t",
            "300",
            "--scramble-length",
            "25",
            "--penalty-policy",
            "once",
        ]);
        let config = cli.resolve_config(Config::default());

        assert_eq!(config.hold_threshold_ms, 300);
        assert_eq!(config.scramble_length, 25);
        assert_eq!(config.penalty_policy, PenaltyPolicy::Once);
        assert_eq!(config.display_interval_ms, 10);
    }

    #[test]
    fn test_cli_subcommands() {
        let cli = Cli::parse_from(["cubik", "sessions"]);
        assert_eq!(cli.command, Some(Command::Sessions));

        let cli = Cli::parse_from(["cubik", "-s", "OH", "export", "--out", "oh.csv"]);
        assert_eq!(cli.session, Some("OH".to_string()));
        assert_eq!(
            cli.command,
            Some(Command::Export {
                out: Some(PathBuf::from("oh.csv"))
            })
        );

        let cli = Cli::parse_from(["cubik", "export", "--session", "Blind"]);
        assert_eq!(cli.session, Some("Blind".to_string()));
        assert_eq!(cli.command, Some(Command::Export { out: None }));
    }

    #[test]
    fn test_space_hold_records_solve() {
        let mut app = app();
        let scramble = app.stopwatch.scramble().to_string();
        solve_with_space(&mut app, Instant::now(), 200, 5_000);

        let records = app.stopwatch.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, "5.00");
        assert_eq!(records[0].scramble, scramble);
        assert_eq!(app.last_result.as_deref(), Some("5.00"));
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.stopwatch.phase(), Phase::Idle);
    }

    #[test]
    fn test_short_space_hold_is_ignored() {
        let mut app = app();
        let t0 = Instant::now();
        app.on_key(press(KeyCode::Char(' ')), t0);
        assert!(app.stopwatch.is_ready());
        app.on_key(release(KeyCode::Char(' ')), t0 + ms(80));

        assert_eq!(app.stopwatch.phase(), Phase::Idle);
        assert!(app.stopwatch.records().is_empty());
    }

    #[test]
    fn test_commands_disabled_while_running() {
        let mut app = app();
        let t0 = Instant::now();
        app.on_key(press(KeyCode::Char(' ')), t0);
        app.on_key(release(KeyCode::Char(' ')), t0 + ms(200));

        assert_eq!(app.on_key(press(KeyCode::Char('q')), t0 + ms(300)), Flow::Continue);
        assert_eq!(app.on_key(press(KeyCode::Char('n')), t0 + ms(300)), Flow::Continue);
        assert_eq!(app.mode, Mode::Timing);
        assert_eq!(app.stopwatch.phase(), Phase::Running);
        assert_eq!(app.on_key(press(KeyCode::Esc), t0 + ms(400)), Flow::Quit);
    }

    #[test]
    fn test_penalty_dnf_and_delete_keys() {
        let mut app = app();
        let t0 = Instant::now();
        solve_with_space(&mut app, t0, 200, 10_000);
        solve_with_space(&mut app, t0 + ms(20_000), 200, 9_000);

        app.on_key(press(KeyCode::Up), Instant::now());
        assert_eq!(app.selected, Some(0));
        app.on_key(press(KeyCode::Char('p')), Instant::now());
        assert_eq!(app.stopwatch.records()[0].time, "12.00");
        assert_eq!(app.stopwatch.records()[0].status, Status::Penalty);

        app.on_key(press(KeyCode::Down), Instant::now());
        app.on_key(press(KeyCode::Char('d')), Instant::now());
        assert_eq!(app.stopwatch.records()[1].status, Status::DidNotFinish);

        app.on_key(press(KeyCode::Char('x')), Instant::now());
        assert_eq!(app.mode, Mode::ConfirmDeleteRecord(1));
        app.on_key(press(KeyCode::Char('n')), Instant::now());
        assert_eq!(app.mode, Mode::Timing);
        assert_eq!(app.stopwatch.records().len(), 2);

        app.on_key(press(KeyCode::Char('x')), Instant::now());
        app.on_key(press(KeyCode::Char('y')), Instant::now());
        assert_eq!(app.stopwatch.records().len(), 1);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_held_command_keys_act_once() {
        let repeat = |code| KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat);
        let mut app = app();
        solve_with_space(&mut app, Instant::now(), 200, 10_000);
        app.stopwatch.create_session("OH");

        app.on_key(press(KeyCode::Char('p')), Instant::now());
        app.on_key(repeat(KeyCode::Char('p')), Instant::now());
        app.on_key(repeat(KeyCode::Char('p')), Instant::now());
        app.on_key(release(KeyCode::Char('p')), Instant::now());
        assert_eq!(app.stopwatch.records()[0].time, "12.00");

        app.on_key(press(KeyCode::Char(']')), Instant::now());
        app.on_key(repeat(KeyCode::Char(']')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), "OH");
        app.on_key(press(KeyCode::Char('[')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), DEFAULT_SESSION);

        // a held `x` must not answer its own confirmation
        app.on_key(press(KeyCode::Char('x')), Instant::now());
        app.on_key(repeat(KeyCode::Char('x')), Instant::now());
        assert_eq!(app.mode, Mode::ConfirmDeleteRecord(0));
        app.on_key(press(KeyCode::Esc), Instant::now());
        assert_eq!(app.mode, Mode::Timing);
    }

    #[test]
    fn test_prompt_accepts_repeated_characters() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('n')), Instant::now());
        app.on_key(press(KeyCode::Char('z')), Instant::now());
        app.on_key(
            KeyEvent::new_with_kind(KeyCode::Char('z'), KeyModifiers::NONE, KeyEventKind::Repeat),
            Instant::now(),
        );
        assert_eq!(app.mode, Mode::NewSession("zz".to_string()));
    }

    #[test]
    fn test_new_session_prompt_creates_and_switches() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('n')), Instant::now());
        type_text(&mut app, "Speedx");
        app.on_key(press(KeyCode::Backspace), Instant::now());
        assert_eq!(app.mode, Mode::NewSession("Speed".to_string()));
        app.on_key(press(KeyCode::Enter), Instant::now());

        assert_eq!(app.mode, Mode::Timing);
        assert_eq!(app.stopwatch.active_session(), "Speed");
        assert_eq!(app.stopwatch.sessions(), vec![DEFAULT_SESSION, "Speed"]);

        // duplicate names are refused
        app.on_key(press(KeyCode::Char('n')), Instant::now());
        type_text(&mut app, "Speed");
        app.on_key(press(KeyCode::Enter), Instant::now());
        assert!(app.message.is_some());
        assert_eq!(app.stopwatch.sessions().len(), 2);
    }

    #[test]
    fn test_cycle_and_delete_session() {
        let mut app = app();
        let t0 = Instant::now();
        solve_with_space(&mut app, t0, 200, 4_000);
        app.stopwatch.create_session("Foo");

        app.on_key(press(KeyCode::Char(']')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), "Foo");
        assert_eq!(app.selected, None);
        app.on_key(press(KeyCode::Char(']')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), DEFAULT_SESSION);
        app.on_key(press(KeyCode::Char('[')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), "Foo");

        app.on_key(press(KeyCode::Char('D')), Instant::now());
        assert_eq!(app.mode, Mode::ConfirmDeleteSession("Foo".to_string()));
        app.on_key(press(KeyCode::Char('y')), Instant::now());
        assert_eq!(app.stopwatch.active_session(), DEFAULT_SESSION);
        assert_eq!(app.stopwatch.records().len(), 1);
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_pointer_channel_drives_timer() {
        use crossterm::event::{MouseButton, MouseEventKind};

        let mouse = |kind| MouseEvent {
            kind,
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        let mut app = app();
        let t0 = Instant::now();
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left)), t0);
        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left)), t0 + ms(250));
        assert_eq!(app.stopwatch.phase(), Phase::Running);
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left)), t0 + ms(3_250));

        assert_eq!(app.stopwatch.records()[0].time, "3.00");
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(key, Instant::now()), Flow::Quit);
    }

    #[test]
    fn test_print_sessions() {
        let mut registry = SessionRegistry::new(MemoryStore::new(), PenaltyPolicy::Cumulative);
        registry.append(cubik::record::AttemptRecord::new("5.00", "R"));
        registry.create("OH");

        let mut out = Vec::new();
        print_sessions(&registry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "* Default\t1\n  OH\t0\n");
    }

    #[test]
    fn test_ui_renders_each_mode() {
        let mut app = app();
        solve_with_space(&mut app, Instant::now(), 200, 1_500);

        for mode in [
            Mode::Timing,
            Mode::NewSession("Blind".to_string()),
            Mode::ConfirmDeleteRecord(0),
            Mode::ConfirmDeleteSession(DEFAULT_SESSION.to_string()),
        ] {
            app.mode = mode;
            let backend = TestBackend::new(100, 30);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal.draw(|f| ui(&app, f)).unwrap();

            let buffer = terminal.backend().buffer();
            let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
            assert!(content.contains("Scramble"));
            assert!(content.contains("1.50"));
        }
    }

    #[test]
    fn test_ui_renders_in_small_terminal() {
        let app = app();
        let backend = TestBackend::new(20, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
    }

    #[test]
    fn test_tick_rate_constant() {
        assert_eq!(TICK_RATE_MS, 100);
    }
}
