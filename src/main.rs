use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use hello_ios::catalog::{self, Topic};
use hello_ios::quiz::{random_tip, PracticeSession, QuizOutcome};
use hello_ios::{Catalog, Config, Preferences, ProgressReport, SkillLevel};
use log::{debug, info};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "hello-ios")]
#[command(about = "Browse iOS development lessons and track your progress")]
struct Cli {
    /// Catalog document to use instead of the built-in lessons
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Where completed topics, bookmarks and the skill level are kept
    #[arg(long)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List topics, optionally narrowed by a search text and a skill level
    Topics {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        level: Option<SkillLevel>,
    },
    /// Show the lessons, code samples, tips and quizzes of a topic
    Show { topic: String },
    /// Answer the quiz of a lesson (lesson and answer are numbered from 1)
    Quiz {
        topic: String,
        lesson: usize,
        answer: usize,
    },
    /// Mark a topic as completed
    Complete { topic: String },
    /// Add or remove a bookmark on a topic
    Bookmark { topic: String },
    /// Change the selected skill level
    Level { level: SkillLevel },
    /// First-run setup: pick a skill level
    Onboard { level: SkillLevel },
    /// Summarise completed topics per skill level
    Progress,
    /// Answer a few random quizzes in a row
    Practice {
        #[arg(short, long, default_value_t = 5)]
        count: usize,
        /// Defaults to the selected skill level
        #[arg(short, long)]
        level: Option<SkillLevel>,
    },
    /// Print a random tip from the lessons
    Tip,
}

fn main() {
    let dotenv_loaded = dotenv().is_ok();
    pretty_env_logger::init();
    if !dotenv_loaded {
        debug!("No .env file found");
    }

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> HandlerResult {
    let mut config = Config::from_env()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(path) = cli.preferences {
        config.preferences_path = path;
    }

    let catalog = config.load_catalog()?;
    let mut preferences = config.open_preferences(&catalog)?;
    info!(
        "Loaded {} topics, preferences at {}",
        catalog.len(),
        config.preferences_path.display()
    );

    if !preferences.has_completed_onboarding() && !matches!(cli.command, Command::Onboard { .. }) {
        println!("Tip: run `hello-ios onboard <beginner|intermediate|advanced>` to pick your level.\n");
    }

    match cli.command {
        Command::Topics { query, level } => list_topics(&catalog, &preferences, &query, level),
        Command::Show { topic } => show_topic(find_topic(&catalog, &topic)?, &preferences),
        Command::Quiz {
            topic,
            lesson,
            answer,
        } => answer_quiz(&catalog, &topic, lesson, answer),
        Command::Complete { topic } => {
            let topic = find_topic(&catalog, &topic)?;
            preferences.mark_completed(topic.id.as_str());
            println!("Marked \"{}\" as completed.", topic.title);
            Ok(())
        }
        Command::Bookmark { topic } => {
            let topic = find_topic(&catalog, &topic)?;
            if preferences.toggle_bookmark(topic.id.as_str()) {
                println!("Bookmarked \"{}\".", topic.title);
            } else {
                println!("Removed bookmark from \"{}\".", topic.title);
            }
            Ok(())
        }
        Command::Level { level } => {
            preferences.set_skill_level(level);
            println!("Skill level set to {}.", level);
            Ok(())
        }
        Command::Onboard { level } => {
            preferences.complete_onboarding(level);
            println!("Welcome! Your skill level is {}. Let's begin your path to becoming an iOS developer!", level);
            Ok(())
        }
        Command::Progress => {
            print_progress(&ProgressReport::new(&catalog, &preferences));
            Ok(())
        }
        Command::Practice { count, level } => {
            let level = level.unwrap_or_else(|| preferences.skill_level());
            practice(&catalog, level, count)
        }
        Command::Tip => {
            match random_tip(&catalog, &mut rand::thread_rng()) {
                Some(tip) => println!("💡 Daily Tip\n{}", tip),
                None => println!("Practice makes perfect! Try to complete at least one lesson each day."),
            }
            Ok(())
        }
    }
}

fn find_topic<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Topic, String> {
    catalog
        .topic(id)
        .ok_or_else(|| format!("unknown topic `{}` (see `hello-ios topics`)", id))
}

fn list_topics(catalog: &Catalog, preferences: &Preferences, query: &str, level: Option<SkillLevel>) -> HandlerResult {
    let topics = catalog::filter(catalog.topics(), query.trim(), level);
    if topics.is_empty() {
        println!("No topics matched the request.");
        return Ok(());
    }
    for topic in topics {
        let done = if preferences.is_completed(topic.id.as_str()) { "✓" } else { " " };
        let mark = if preferences.is_bookmarked(topic.id.as_str()) { "★" } else { " " };
        println!(
            "[{}]{} {} ({} · {} · {} lessons)",
            done,
            mark,
            topic.id,
            topic.skill_level,
            topic.category,
            topic.lessons.len()
        );
        println!("      {}", topic.title);
        println!("      {}", topic.description);
    }
    Ok(())
}

fn show_topic(topic: &Topic, preferences: &Preferences) -> HandlerResult {
    println!("== {} ({} · {} · {}) ==", topic.title, topic.id, topic.category, topic.skill_level);
    println!("{}", topic.description);
    if preferences.is_completed(topic.id.as_str()) {
        println!("Completed ✓");
    }
    if preferences.is_bookmarked(topic.id.as_str()) {
        println!("Bookmarked ★");
    }

    for (number, lesson) in topic.lessons.iter().enumerate().map(|(i, l)| (i + 1, l)) {
        println!("\n-- Lesson {}: {} --\n{}\n", number, lesson.title, lesson.content);
        for sample in &lesson.code_samples {
            println!("{}:", sample.title);
            println!("```swift\n{}\n```", sample.code.trim_end());
            println!("{}\n", sample.explanation);
        }
        if !lesson.tips.is_empty() {
            println!("💡 Tips");
            for tip in &lesson.tips {
                println!("  - {}", tip);
            }
        }
        println!("\n❓ Quiz: {}", lesson.quiz.question);
        for (i, option) in lesson.quiz.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        println!(
            "Answer with `hello-ios quiz {} {} <option>`",
            topic.id, number
        );
    }

    if !topic.external_links.is_empty() {
        println!("\nLinks:");
        for (label, url) in &topic.external_links {
            println!("  {}: {}", label, url);
        }
    }
    Ok(())
}

fn answer_quiz(catalog: &Catalog, topic_id: &str, lesson: usize, answer: usize) -> HandlerResult {
    let topic = find_topic(catalog, topic_id)?;
    let lesson = lesson
        .checked_sub(1)
        .and_then(|index| topic.lessons.get(index))
        .ok_or_else(|| format!("topic `{}` has {} lesson(s)", topic.id, topic.lessons.len()))?;
    let selected = answer.checked_sub(1).unwrap_or(usize::MAX);

    print_outcome(&lesson.quiz.grade(selected));
    Ok(())
}

fn print_outcome(outcome: &QuizOutcome) {
    match outcome {
        QuizOutcome::Correct { explanation } => println!("✅ Correct!\n{}", explanation),
        QuizOutcome::Incorrect {
            correct_answer,
            explanation,
        } => println!(
            "❌ Incorrect. The right answer is {}.\n{}",
            correct_answer, explanation
        ),
    }
}

fn print_progress(report: &ProgressReport) {
    println!(
        "Completed {} of {} topics ({}%), {} bookmarked",
        report.completed_topics,
        report.total_topics,
        report.percent_complete(),
        report.bookmarked_topics
    );
    for (level, progress) in &report.by_level {
        println!("  {:<12} {}/{}", level.to_string(), progress.completed, progress.total);
    }
}

fn practice(catalog: &Catalog, level: SkillLevel, count: usize) -> HandlerResult {
    if count == 0 {
        return Err("the number of questions can't be 0".into());
    }
    let mut session = PracticeSession::new(catalog, Some(level), count, &mut rand::thread_rng());
    if session.is_empty() {
        println!("No quizzes available for {}.", level);
        return Ok(());
    }
    println!("Great! Let's start: {} {} question(s).", session.len(), level);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(question) = session.current() {
        println!(
            "\nQuestion #{}: {}",
            session.current_number(),
            question.text
        );
        for (i, answer) in question.answers.iter().enumerate() {
            println!("  {}. {}", i + 1, answer.text);
        }

        let selected = loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                println!("\nStopped after {} of {} questions.", session.answered(), session.len());
                return Ok(());
            };
            match line?.trim().parse::<usize>() {
                Ok(n) if (1..=question.answers.len()).contains(&n) => break n - 1,
                _ => println!("Please enter a number from 1 to {}", question.answers.len()),
            }
        };

        if let Some(outcome) = session.answer(selected) {
            print_outcome(&outcome);
        }
    }

    println!(
        "\nQuiz finished! You answered {} of {} questions correctly.",
        session.score(),
        session.len()
    );
    Ok(())
}
