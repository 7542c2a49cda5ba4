use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use typehub::{
    app::{App, Flow},
    config::{ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    sample::sample_paragraph,
};

/// typing speed test: type the sample paragraph and get your score
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// file holding the paragraph to type (line breaks are dropped)
    #[clap(short = 'f', long = "file")]
    sample_path: Option<PathBuf>,

    /// how often, in milliseconds, completion is re-checked while idle
    #[clap(long)]
    tick_ms: Option<u64>,

    /// write logs to this file (the terminal is taken by the UI)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// debug level logging
    #[clap(short, long)]
    verbose: bool,

    /// remember --file and --tick-ms in the config file for later runs
    #[clap(long)]
    save_config: bool,
}

fn setup_logging(log_file: Option<&Path>, verbose: bool) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    setup_logging(cli.log_file.as_deref(), cli.verbose)?;

    let store = FileConfigStore::new();
    let config = store
        .load()
        .with_overrides(cli.sample_path.clone(), cli.tick_ms);
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }
    info!(
        config = %store.path().display(),
        sample = %config.sample_path.display(),
        tick_ms = config.tick_rate_ms,
        "starting"
    );

    let mut app = App::new(sample_paragraph(&config.sample_path));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(config.tick_rate_ms),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match app.on_event(runner.step()) {
            Flow::Quit => break,
            Flow::Redraw => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            Flow::Continue => {}
        }
    }

    info!(state = %app.state, "exiting");
    Ok(())
}
