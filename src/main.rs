use chimptype::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::FileConfigStore,
    runtime::{ChimpEvent, CrosstermEventSource, FixedTicker, Runner},
    words::{Corpus, RandomSelector, WordSource, DEFAULT_CORPUS, MAX_WORD_COUNT},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// minimal terminal typing test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing test for the terminal. Pick a number of words, type them, and get net/raw wpm and accuracy."
)]
pub struct Cli {
    /// number of words to use in test (defaults to the last used value)
    #[clap(short = 'w', long, value_parser = parse_word_count)]
    number_of_words: Option<usize>,

    /// custom prompt to type instead of random words
    #[clap(short = 'p', long, conflicts_with = "corpus", value_parser = parse_prompt)]
    prompt: Option<String>,

    /// json word list ({"name": ..., "words": [...]}) to draw words from
    #[clap(short = 'c', long)]
    corpus: Option<PathBuf>,

    /// seed for word selection, for reproducible tests
    #[clap(long)]
    seed: Option<u64>,

    /// file to write logs to when RUST_LOG is set
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_word_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("number of words must be positive".to_string()),
        Ok(n) if n > MAX_WORD_COUNT => {
            Err(format!("number of words must be at most {MAX_WORD_COUNT}"))
        }
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_prompt(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("prompt must contain at least one word".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn init_logging(path: Option<PathBuf>) -> io::Result<()> {
    // Stderr would draw over the alternate screen, so logs only go to a file
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let path = path.unwrap_or_else(AppDirs::log_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}

fn word_source(cli: &Cli) -> Result<WordSource, Box<dyn Error>> {
    if let Some(prompt) = &cli.prompt {
        return WordSource::fixed_from_prompt(prompt)
            .ok_or_else(|| "prompt must contain at least one word".into());
    }

    let corpus = match &cli.corpus {
        Some(path) => Corpus::from_path(path)?,
        None => Corpus::embedded(DEFAULT_CORPUS)?,
    };
    log::info!("using corpus {} ({} words)", corpus.name, corpus.size);
    Ok(WordSource::Corpus(corpus))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(err) = init_logging(cli.log_file.clone()) {
        eprintln!("chimptype: could not open log file: {err}");
    }

    let config_store = FileConfigStore::new();
    let source = match word_source(&cli) {
        Ok(source) => source,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new(
        source,
        Box::new(RandomSelector::new(rng)),
        Box::new(config_store),
    );
    if let Some(n) = cli.number_of_words {
        app = app.with_number_of_words(n);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            ChimpEvent::Tick => app.on_tick(Instant::now()),
            ChimpEvent::Resize => {}
            ChimpEvent::Key(key) => {
                if app.handle_key(&key, Instant::now()) == Flow::Quit {
                    break;
                }
            }
            ChimpEvent::Closed => return Err("terminal input closed".into()),
        }
    }

    Ok(())
}
