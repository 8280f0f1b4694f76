use std::fmt;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use lingo_core::model::{Language, LessonId, UserId};
use services::quiz::DEFAULT_QUIZ_SIZE;

pub const DEFAULT_REMOTE_DB: &str = "sqlite:lingo-remote.sqlite3";
pub const DEFAULT_CACHE_DB: &str = "sqlite:lingo-cache.sqlite3";
pub const DEFAULT_USER: &str = "local";
pub const DEFAULT_LANGUAGE: &str = "spanish";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidUser { raw: String },
    InvalidLanguage { raw: String },
    InvalidLessonId { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidOffset { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid database url: {raw}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw:?}"),
            ArgsError::InvalidLanguage { raw } => write!(f, "invalid --language value: {raw:?}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid lesson id: {raw:?}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidOffset { raw } => {
                write!(f, "invalid --utc-offset-minutes value (expected -1439..=1439): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Progress,
    Lessons,
    Complete(LessonId),
    Study(u32),
    Quiz,
    Flashcards,
}

/// Resolved runtime configuration: environment first, flags override.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub command: Command,
    pub remote_db_url: String,
    pub cache_db_url: String,
    pub catalog_path: Option<PathBuf>,
    pub user: UserId,
    pub language: Language,
    pub day_offset: FixedOffset,
    pub quiz_size: usize,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  lingo [progress] [options]");
    eprintln!("  lingo lessons    [options]");
    eprintln!("  lingo complete <lesson-id> [options]");
    eprintln!("  lingo study <minutes> [options]");
    eprintln!("  lingo quiz       [options] [--size <n>]");
    eprintln!("  lingo flashcards [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --remote-db <sqlite_url>     progress documents (default: {DEFAULT_REMOTE_DB})");
    eprintln!("  --cache-db <sqlite_url>      local cache (default: {DEFAULT_CACHE_DB})");
    eprintln!("  --catalog <path>             lesson catalog JSON (default: bundled)");
    eprintln!("  --user <id>                  learner id (default: {DEFAULT_USER})");
    eprintln!("  --language <name>            catalog language (default: {DEFAULT_LANGUAGE})");
    eprintln!("  --utc-offset-minutes <n>     calendar day offset for streaks (default: 0)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_REMOTE_DB_URL, LINGO_CACHE_DB_URL, LINGO_CATALOG, LINGO_USER,");
    eprintln!("  LINGO_LANGUAGE, LINGO_UTC_OFFSET_MINUTES, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_user(raw: String) -> Result<UserId, ArgsError> {
    UserId::new(raw.clone()).map_err(|_| ArgsError::InvalidUser { raw })
}

fn parse_language(raw: String) -> Result<Language, ArgsError> {
    Language::new(&raw).map_err(|_| ArgsError::InvalidLanguage { raw })
}

fn parse_offset(raw: String) -> Result<FixedOffset, ArgsError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .and_then(|minutes| minutes.checked_mul(60))
        .and_then(FixedOffset::east_opt)
        .ok_or(ArgsError::InvalidOffset { raw })
}

fn parse_db_url(raw: String) -> Result<String, ArgsError> {
    if raw.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw });
    }
    Ok(normalize_sqlite_url(raw))
}

impl AppConfig {
    /// Parse command-line arguments (without the program name), reading
    /// defaults through `env`.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut remote_db_url = normalize_sqlite_url(
            env("LINGO_REMOTE_DB_URL").unwrap_or_else(|| DEFAULT_REMOTE_DB.into()),
        );
        let mut cache_db_url = normalize_sqlite_url(
            env("LINGO_CACHE_DB_URL").unwrap_or_else(|| DEFAULT_CACHE_DB.into()),
        );
        let mut catalog_path = env("LINGO_CATALOG").map(PathBuf::from);
        let mut user = parse_user(env("LINGO_USER").unwrap_or_else(|| DEFAULT_USER.into()))?;
        let mut language =
            parse_language(env("LINGO_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.into()))?;
        let mut day_offset = parse_offset(
            env("LINGO_UTC_OFFSET_MINUTES").unwrap_or_else(|| "0".into()),
        )?;
        let mut quiz_size = DEFAULT_QUIZ_SIZE;

        let mut args = argv.into_iter().peekable();
        let command = match args.peek().map(String::as_str) {
            None => Command::Progress,
            Some(first) if first.starts_with("--") => Command::Progress,
            Some(_) => {
                let name = args.next().unwrap_or_default();
                match name.as_str() {
                    "progress" => Command::Progress,
                    "lessons" => Command::Lessons,
                    "quiz" => Command::Quiz,
                    "flashcards" => Command::Flashcards,
                    "complete" => {
                        let raw = args.next().ok_or(ArgsError::MissingArgument {
                            what: "lesson id",
                        })?;
                        let id = LessonId::new(raw.clone())
                            .map_err(|_| ArgsError::InvalidLessonId { raw })?;
                        Command::Complete(id)
                    }
                    "study" => {
                        let raw = args.next().ok_or(ArgsError::MissingArgument {
                            what: "minutes",
                        })?;
                        let minutes = raw
                            .parse::<u32>()
                            .ok()
                            .filter(|m| *m > 0)
                            .ok_or(ArgsError::InvalidNumber {
                                flag: "minutes",
                                raw,
                            })?;
                        Command::Study(minutes)
                    }
                    _ => return Err(ArgsError::UnknownCommand(name)),
                }
            }
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--remote-db" => remote_db_url = parse_db_url(require_value(&mut args, "--remote-db")?)?,
                "--cache-db" => cache_db_url = parse_db_url(require_value(&mut args, "--cache-db")?)?,
                "--catalog" => {
                    catalog_path = Some(PathBuf::from(require_value(&mut args, "--catalog")?));
                }
                "--user" => user = parse_user(require_value(&mut args, "--user")?)?,
                "--language" => language = parse_language(require_value(&mut args, "--language")?)?,
                "--utc-offset-minutes" => {
                    day_offset = parse_offset(require_value(&mut args, "--utc-offset-minutes")?)?;
                }
                "--size" => {
                    let raw = require_value(&mut args, "--size")?;
                    quiz_size = raw
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidNumber { flag: "--size", raw })?;
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command,
            remote_db_url,
            cache_db_url,
            catalog_path,
            user,
            language,
            day_offset,
            quiz_size,
        })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist before connecting.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
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

    let path = Path::new(path);
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
