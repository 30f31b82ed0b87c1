use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
};

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
use tracing::{info, warn};

use quizr::{
    app::{App, AppState},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, Theme},
    history::AttemptStore,
    logging,
    quiz::{bundled, Catalog, Quiz},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
};

/// timed multiple-choice quizzes in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Take timed multiple-choice quizzes in the terminal. Answers lock once picked, the clock submits for you when it runs out, and every finished attempt earns a badge and lands in your history."
)]
pub struct Cli {
    /// quiz file (json) to start right away
    quiz: Option<PathBuf>,

    /// start one of the bundled quizzes by name
    #[clap(short = 'b', long, conflicts_with = "quiz")]
    bundled: Option<String>,

    /// list the bundled quizzes and exit
    #[clap(long)]
    list: bool,

    /// directory of quiz files to offer on the course screen (remembered)
    #[clap(short = 'd', long)]
    quiz_dir: Option<PathBuf>,

    /// color theme (remembered)
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,

    /// keep answers hidden until the results screen
    #[clap(long)]
    no_reveal: bool,

    /// print attempt history and exit
    #[clap(long)]
    history: bool,

    /// write attempt history as csv to FILE and exit
    #[clap(long, value_name = "FILE")]
    export_history: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI flags over the stored config. Returns true when a
    /// remembered setting changed.
    fn apply_to(&self, cfg: &mut Config) -> bool {
        let mut changed = false;
        if let Some(theme) = self.theme {
            changed |= cfg.theme != theme;
            cfg.theme = theme;
        }
        if let Some(dir) = &self.quiz_dir {
            changed |= cfg.quiz_dir.as_ref() != Some(dir);
            cfg.quiz_dir = Some(dir.clone());
        }
        if self.no_reveal {
            cfg.reveal_answers = false;
        }
        changed
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        // logging is best effort; the quiz still runs without it
        let _ = logging::init(&log_path);
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if cli.apply_to(&mut config) {
        // --no-reveal applies to this run only
        let remembered = Config {
            reveal_answers: store.load().reveal_answers,
            ..config.clone()
        };
        if let Err(e) = store.save(&remembered) {
            warn!(error = %e, "could not save config");
        }
    }

    if cli.list {
        for name in bundled::names() {
            match bundled::load(name) {
                Ok(quiz) => println!("{name:<16} {} ({} questions)", quiz.title, quiz.len()),
                Err(e) => println!("{name:<16} unavailable: {e}"),
            }
        }
        return Ok(());
    }

    let history = open_history();

    if cli.history || cli.export_history.is_some() {
        let Some(history) = history else {
            return Err("attempt history is unavailable".into());
        };
        if let Some(path) = &cli.export_history {
            let rows = history.export_csv(File::create(path)?)?;
            println!("exported {rows} attempts to {}", path.display());
        }
        if cli.history {
            print_history(&history)?;
        }
        return Ok(());
    }

    let (catalog, start_id) = build_catalog(&cli, &config);

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config, catalog, history);
    if let Some(id) = start_id {
        app.start_quiz_by_id(&id);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn open_history() -> Option<AttemptStore> {
    let path = AppDirs::history_db_path()?;
    match AttemptStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "attempt history unavailable");
            None
        }
    }
}

/// The quizzes to offer, plus the id of one to start immediately. Exits with
/// a usage error when an explicitly requested quiz cannot be loaded.
fn build_catalog(cli: &Cli, config: &Config) -> (Catalog, Option<String>) {
    let requested: Option<Result<Quiz, _>> = match (&cli.quiz, &cli.bundled) {
        (Some(path), _) => Some(Quiz::load(path)),
        (None, Some(name)) => Some(bundled::load(name)),
        (None, None) => None,
    };

    let (mut catalog, start_id) = match requested {
        Some(Ok(quiz)) => {
            let id = quiz.id.clone();
            (Catalog::new(vec![quiz]), Some(id))
        }
        Some(Err(e)) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("quiz unavailable: {e}"))
                .exit();
        }
        None => (Catalog::default(), None),
    };

    catalog.merge(Catalog::bundled());

    if let Some(dir) = &config.quiz_dir {
        match Catalog::from_dir(dir) {
            Ok(extra) => catalog.merge(extra),
            Err(e) => warn!(dir = %dir.display(), error = %e, "could not read quiz directory"),
        }
    }

    info!(quizzes = catalog.len(), "catalog ready");
    (catalog, start_id)
}

fn print_history(history: &AttemptStore) -> Result<(), Box<dyn Error>> {
    let attempts = history.all()?;
    if attempts.is_empty() {
        println!("no attempts recorded yet");
        return Ok(());
    }
    for a in attempts {
        println!(
            "{}  {:<28} {:>3}/{:<3} {:>3}%  {:<12} {}",
            a.completed_at.format("%Y-%m-%d %H:%M"),
            a.quiz_title,
            a.correct,
            a.total,
            a.percent,
            a.badge.label(),
            a.ending
        );
    }
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    while !app.should_quit() {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let was_in_quiz = app.state == AppState::Quiz;
        match runner.step() {
            QuizEvent::Tick => {
                app.on_tick();
            }
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => app.on_key(key),
        }

        // a freshly mounted session gets a full first second
        if !was_in_quiz && app.state == AppState::Quiz {
            runner.reset_schedule();
        }
    }

    Ok(())
}
