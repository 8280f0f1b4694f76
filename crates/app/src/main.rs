mod config;

use std::io::{BufRead, Write};
use std::sync::Arc;

use lingo_core::model::{Language, LessonId, UserId};
use services::{
    AppServices, Clock, FlashcardDeck, LESSON_STUDY_MINUTES, ProgressOverview, ProgressUpdate,
    ServiceSettings,
};
use storage::catalog::{ContentCatalog, InMemoryCatalog};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, Command, prepare_sqlite_file, print_usage};

const BUNDLED_CATALOG: &str = include_str!("../assets/catalog.json");

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_catalog(config: &AppConfig) -> Result<Arc<dyn ContentCatalog>, Box<dyn std::error::Error>> {
    let raw = match &config.catalog_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => BUNDLED_CATALOG.to_string(),
    };
    Ok(Arc::new(InMemoryCatalog::from_json(&raw)?))
}

fn print_overview(user: &UserId, overview: &ProgressOverview) {
    println!("Progress for {user}");
    println!("  level:            {}", overview.level.label());
    println!("  streak:           {} day(s)", overview.streak);
    println!("  lessons done:     {}", overview.lessons_completed);
    println!(
        "  study time:       {} min (~{} h)",
        overview.study_minutes, overview.study_hours
    );
    println!("  daily goal:       {:.0}%", overview.daily_goal_percent);
    println!("  overall:          {:.0}%", overview.overall_percent);
    println!("  quizzes taken:    {}", overview.quizzes_taken);
    for quiz in &overview.recent_quizzes {
        println!(
            "    {} {}: {}/{} ({:.0}%)",
            quiz.date.format("%Y-%m-%d"),
            quiz.language,
            quiz.result.score(),
            quiz.result.total(),
            quiz.result.percentage()
        );
    }
}

fn report_update(update: &ProgressUpdate) {
    match update.persisted {
        Some(outcome) if !outcome.is_persisted() => {
            eprintln!("warning: progress could not be saved ({outcome:?})");
        }
        _ => {}
    }
}

async fn list_lessons(
    services: &AppServices,
    user: &UserId,
    language: &Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let lessons = services.lessons().lessons(language).await?;
    if lessons.is_empty() {
        println!("no lessons for {language}");
        return Ok(());
    }

    let progress = services.progress().get_progress(user).await;
    for lesson in &lessons {
        let mark = if progress.has_completed(lesson.id()) { "x" } else { " " };
        println!(
            "[{mark}] {:>4}  {} ({}, {}, {} items)",
            lesson.id().as_str(),
            lesson.title(),
            lesson.category(),
            lesson.difficulty(),
            lesson.content().len()
        );
    }
    Ok(())
}

async fn complete_lesson(
    services: &AppServices,
    user: &UserId,
    language: &Language,
    lesson_id: &LessonId,
) -> Result<(), Box<dyn std::error::Error>> {
    if services.lessons().lesson(language, lesson_id).await?.is_none() {
        eprintln!("note: lesson {lesson_id} is not in the {language} catalog");
    }

    let finish = services.progress().finish_lesson(user, lesson_id).await?;
    report_update(&finish.update);
    if finish.newly_completed {
        println!(
            "completed lesson {lesson_id}; streak is {} day(s)",
            finish.update.progress.streak()
        );
    } else {
        println!("lesson {lesson_id} was already completed");
    }
    println!(
        "logged {LESSON_STUDY_MINUTES} min; total study time is {} min",
        finish.update.progress.total_study_time()
    );
    Ok(())
}

fn read_choice(
    input: &mut impl BufRead,
    choices: usize,
) -> Result<Option<usize>, Box<dyn std::error::Error>> {
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices).contains(&n) => return Ok(Some(n - 1)),
            _ => println!("enter a number from 1 to {choices}"),
        }
    }
}

async fn run_quiz(
    services: &AppServices,
    user: &UserId,
    language: &Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let quizzes = services.quizzes();
    let mut session = quizzes.start_quiz(language).await?;
    if session.is_empty() {
        println!("no quiz content for {language}");
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    while let Some(question) = session.current().cloned() {
        println!();
        println!(
            "Question {}/{}: What does \"{}\" mean?",
            session.position() + 1,
            session.len(),
            question.prompt
        );
        for (i, choice) in question.choices.iter().enumerate() {
            println!("  {}. {choice}", i + 1);
        }

        let Some(index) = read_choice(&mut input, question.choices.len())? else {
            println!("quiz abandoned");
            return Ok(());
        };
        let answer = session.answer(&question.choices[index])?;
        if answer.correct {
            println!("correct");
        } else {
            println!("wrong, the answer is {}", answer.correct_answer);
        }
    }

    let outcome = quizzes.finish_quiz(user, &session).await?;
    if let Some(update) = &outcome.recorded {
        report_update(update);
    }
    println!();
    println!(
        "Score: {}/{} ({:.0}%) {}",
        outcome.result.score(),
        outcome.result.total(),
        outcome.result.percentage(),
        outcome.result.feedback().message()
    );
    Ok(())
}

/// One keystroke of the flashcard viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardAction {
    Flip,
    Next,
    Previous,
    Quit,
}

impl CardAction {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "f" | "flip" => Some(Self::Flip),
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    /// Apply to `deck`; `false` ends the session.
    fn apply(self, deck: &mut FlashcardDeck) -> bool {
        match self {
            Self::Flip => deck.flip(),
            Self::Next => deck.next(),
            Self::Previous => deck.previous(),
            Self::Quit => return false,
        }
        true
    }
}

fn render_card(deck: &FlashcardDeck) -> Option<String> {
    let card = deck.current()?;
    let face = if deck.is_flipped() {
        format!("{} [{}]", card.back(), card.pronunciation())
    } else {
        card.front().to_owned()
    };
    Some(format!(
        "({}/{}) {}: {face}",
        deck.position() + 1,
        deck.len(),
        card.category
    ))
}

async fn browse_flashcards(
    services: &AppServices,
    language: &Language,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut deck = services.lessons().flashcards(language).await?;
    if deck.is_empty() {
        println!("no flashcards for {language}");
        return Ok(());
    }

    println!("enter: flip, n: next, p: previous, q: quit");
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    while let Some(view) = render_card(&deck) {
        println!("{view}");
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match CardAction::parse(&line) {
            Some(action) => {
                if !action.apply(&mut deck) {
                    break;
                }
            }
            None => println!("unknown key: {}", line.trim()),
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }

    let config = AppConfig::parse(argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    debug!(
        remote = %config.remote_db_url,
        cache = %config.cache_db_url,
        user = %config.user,
        "resolved configuration"
    );

    // Storage setup stays in the binary so services never touch the filesystem.
    prepare_sqlite_file(&config.remote_db_url)?;
    prepare_sqlite_file(&config.cache_db_url)?;
    let catalog = load_catalog(&config)?;
    let settings = ServiceSettings {
        day_offset: config.day_offset,
        quiz_size: config.quiz_size,
    };
    let services = AppServices::new_sqlite(
        &config.remote_db_url,
        &config.cache_db_url,
        catalog,
        Clock::default_clock(),
        settings,
    )
    .await?;

    let user = &config.user;
    let language = &config.language;
    match &config.command {
        Command::Progress => {
            let progress = services.progress().get_progress(user).await;
            print_overview(user, &ProgressOverview::from_progress(&progress));
        }
        Command::Lessons => list_lessons(&services, user, language).await?,
        Command::Complete(lesson_id) => {
            complete_lesson(&services, user, language, lesson_id).await?;
        }
        Command::Study(minutes) => {
            let update = services.progress().add_study_time(user, *minutes).await?;
            report_update(&update);
            println!(
                "logged {minutes} min; total study time is {} min",
                update.progress.total_study_time()
            );
        }
        Command::Quiz => run_quiz(&services, user, language).await?,
        Command::Flashcards => browse_flashcards(&services, language).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
