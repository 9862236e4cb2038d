mod console;

use std::fmt;
use std::sync::Arc;

use services::catalog::CatalogConfig;
use services::{AppServices, Clock, QuizConfig, QuizHandle, SourceKind};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::console::ConsolePresenter;

const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSource { raw: String },
    InvalidQuestionCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSource { raw } => write!(f, "invalid --source value: {raw}"),
            ArgsError::InvalidQuestionCount { raw } => {
                write!(f, "invalid --questions value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play  [--db <sqlite_url>] [--source fixed|remote] [--questions <n>]");
    eprintln!("  cargo run -p app -- stats [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --source remote");
    eprintln!("  --questions 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SOURCE, QUIZ_QUESTIONS,");
    eprintln!("  QUIZ_CATALOG_URL, QUIZ_HTTP_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Stats,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    source: SourceKind,
    questions: Option<usize>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quiz.sqlite3".into(), normalize_sqlite_url);
        let mut source = match std::env::var("QUIZ_SOURCE") {
            Ok(raw) => parse_source(raw)?,
            Err(_) => SourceKind::default(),
        };
        let mut questions = match std::env::var("QUIZ_QUESTIONS") {
            Ok(raw) => Some(parse_question_count(raw)?),
            Err(_) => None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--source" => source = parse_source(require_value(args, "--source")?)?,
                "--questions" => {
                    questions = Some(parse_question_count(require_value(args, "--questions")?)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            source,
            questions,
        })
    }

    fn quiz_config(&self) -> QuizConfig {
        match self.questions {
            Some(n) => QuizConfig::default().with_total_questions(n),
            None => QuizConfig::default(),
        }
    }
}

fn parse_source(raw: String) -> Result<SourceKind, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidSource { raw })
}

fn parse_question_count(raw: String) -> Result<usize, ArgsError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ArgsError::InvalidQuestionCount { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_DB_URL || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == MEMORY_DB_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn build_services(
    db_url: &str,
    source: SourceKind,
) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default_clock();
    let catalog = CatalogConfig::from_env();
    // a pooled in-memory sqlite database is not shared between connections
    if db_url == MEMORY_DB_URL {
        return Ok(AppServices::in_memory(clock, source, catalog)?);
    }
    prepare_sqlite_file(db_url)?;
    Ok(AppServices::new_sqlite(db_url, clock, source, catalog).await?)
}

enum Input {
    Answer(bool),
    Retry,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Input::Answer(true)),
        "n" | "no" => Some(Input::Answer(false)),
        "r" | "retry" => Some(Input::Retry),
        "q" | "quit" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

async fn forward_stdin(handle: QuizHandle) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Some(Input::Answer(true)) => handle.on_yes_tapped(),
            Some(Input::Answer(false)) => handle.on_no_tapped(),
            Some(Input::Retry) => handle.on_retry_tapped(),
            Some(Input::Quit) => break,
            None => eprintln!("type y, n, r or q"),
        }
    }
    handle.shutdown();
    Ok(())
}

async fn play(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let services = build_services(&args.db_url, args.source).await?;
    let presenter = Arc::new(ConsolePresenter::default());
    let controller = services.quiz_controller(presenter, args.quiz_config());
    let handle = controller.handle();

    tracing::info!(source = %args.source, db = %args.db_url, "starting quiz");
    let running = tokio::spawn(controller.run());
    forward_stdin(handle).await?;
    running.await?;
    Ok(())
}

async fn stats(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let services = build_services(&args.db_url, SourceKind::Fixed).await?;
    let snapshot = services.statistics().snapshot().await?;
    let best = snapshot.best_game();

    println!("Quizzes played: {}", snapshot.games_count());
    if best.is_placeholder() {
        println!("Record: none yet");
    } else {
        println!(
            "Record: {}/{} ({})",
            best.correct(),
            best.total(),
            best.date().format("%d.%m.%y %H:%M")
        );
    }
    println!("Average accuracy: {:.2}%", snapshot.total_accuracy());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Play => play(&parsed).await,
        Command::Stats => stats(&parsed).await,
    }
}

fn init_tracing() {
    // stdout belongs to the quiz screen
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(ToString::to_string);
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["--db", MEMORY_DB_URL, "--source", "fixed", "--questions", "4"]).unwrap();
        assert_eq!(args.db_url, MEMORY_DB_URL);
        assert_eq!(args.source, SourceKind::Fixed);
        assert_eq!(args.quiz_config().total_questions, 4);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--questions", "0"]),
            Err(ArgsError::InvalidQuestionCount { .. })
        ));
        assert!(matches!(
            parse(&["--source", "imdb"]),
            Err(ArgsError::InvalidSource { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--frobnicate"]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/quiz.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.sqlite3"));
        assert_eq!(normalize_sqlite_url(MEMORY_DB_URL.into()), MEMORY_DB_URL);
    }

    #[test]
    fn console_input_maps_to_actions() {
        assert!(matches!(parse_input(" Y "), Some(Input::Answer(true))));
        assert!(matches!(parse_input("no"), Some(Input::Answer(false))));
        assert!(matches!(parse_input("r"), Some(Input::Retry)));
        assert!(matches!(parse_input("quit"), Some(Input::Quit)));
        assert!(parse_input("maybe").is_none());
    }
}
