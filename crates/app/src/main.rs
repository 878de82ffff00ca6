use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::ScoredResult;
use services::{
    AppServices, Clock, CountdownEnd, QuizError, QuizLoopService, QuizOrigin, QuizRequest,
    QuizStatus, SharedSession, SubmitError,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};

mod command;
mod screen;

use command::{Command, IntroAction};

type Input = Lines<BufReader<Stdin>>;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidClass { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidClass { raw } => write!(f, "invalid --class value: {raw:?}"),
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

struct Args {
    origin: QuizOrigin,
    request: QuizRequest,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--quiz <file.json>] [--class <level>] [--stream <name>]");
    eprintln!();
    eprintln!("Without --quiz the question set is fetched from QUIZ_API_BASE_URL.");
    eprintln!("Defaults: --class 12");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_FILE, QUIZ_CLASS, QUIZ_STREAM");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_API_TOKEN, QUIZ_HTTP_TIMEOUT_SECS, QUIZ_TIME_LIMIT_UNIT");
    eprintln!("  RUST_LOG (log filter, written to stderr)");
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut quiz_file = non_blank_env("QUIZ_FILE").map(PathBuf::from);
        let mut class_level = non_blank_env("QUIZ_CLASS").unwrap_or_else(|| "12".into());
        let mut stream = non_blank_env("QUIZ_STREAM");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz" => quiz_file = Some(PathBuf::from(require_value(args, "--quiz")?)),
                "--class" => {
                    let value = require_value(args, "--class")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidClass { raw: value });
                    }
                    class_level = value.trim().to_string();
                }
                "--stream" => {
                    let value = require_value(args, "--stream")?;
                    stream = Some(value.trim().to_string()).filter(|s| !s.is_empty());
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let origin = quiz_file.map_or(QuizOrigin::Api, QuizOrigin::File);
        Ok(Self {
            origin,
            request: QuizRequest::new(class_level).with_stream(stream),
        })
    }
}

/// What the player asked for when an attempt screen is left.
enum Flow {
    NewQuiz,
    Quit,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    log_fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let services = AppServices::from_env(Clock::default(), args.origin.clone());
    if !services.submissions_enabled() {
        println!("Note: QUIZ_API_BASE_URL is not set, so submissions cannot be graded.");
    }
    let quiz_loop = services.quiz_loop();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let session = match quiz_loop.load_quiz(&args.request).await {
        Ok(session) => session,
        Err(QuizError::Empty) => {
            println!("No questions available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    info!(origin = ?args.origin, "quiz loaded");
    let session: SharedSession = Arc::new(Mutex::new(session));

    loop {
        {
            let guard = session.lock().await;
            if let Some(config) = guard.config() {
                print!("{}", screen::intro(config));
            }
        }
        if !wait_for_start(&mut input).await? {
            return Ok(());
        }
        session.lock().await.start();

        match play(&quiz_loop, &session, &mut input).await? {
            Flow::Quit => return Ok(()),
            Flow::NewQuiz => {
                let mut guard = session.lock().await;
                match quiz_loop.take_new_quiz(&mut guard, &args.request).await {
                    Ok(()) => {}
                    Err(QuizError::Empty) => {
                        println!("No questions available.");
                        return Ok(());
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

/// Read intro-screen input until the player starts (`true`) or leaves (`false`).
async fn wait_for_start(input: &mut Input) -> std::io::Result<bool> {
    while let Some(line) = input.next_line().await? {
        match IntroAction::parse(&line) {
            IntroAction::Begin => return Ok(true),
            IntroAction::Leave => return Ok(false),
            IntroAction::Hint => println!("{}", screen::intro_help()),
        }
    }
    Ok(false)
}

/// Drive one attempt until the player quits or asks for a new quiz.
///
/// The countdown is dropped, and so disarmed, when this returns.
async fn play(
    quiz_loop: &QuizLoopService,
    session: &SharedSession,
    input: &mut Input,
) -> Result<Flow, Box<dyn std::error::Error>> {
    let mut countdown = quiz_loop.spawn_countdown(Arc::clone(session));
    let mut countdown_running = true;

    redraw(session).await;
    loop {
        tokio::select! {
            end = countdown.join(), if countdown_running => {
                countdown_running = false;
                if let CountdownEnd::Submitted(outcome) = end {
                    show_outcome(session, outcome).await;
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(Flow::Quit);
                };
                match Command::parse(&line) {
                    Ok(command) => {
                        if let Some(flow) = handle(quiz_loop, session, command).await {
                            return Ok(flow);
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
        }
    }
}

async fn handle(
    quiz_loop: &QuizLoopService,
    session: &SharedSession,
    command: Command,
) -> Option<Flow> {
    match command {
        Command::Quit => return Some(Flow::Quit),
        Command::NewQuiz => {
            if session.lock().await.status() == QuizStatus::Submitting {
                println!("Please wait for the submission to finish.");
                return None;
            }
            return Some(Flow::NewQuiz);
        }
        Command::Help => println!("{}", screen::help()),
        Command::Review => print!("{}", screen::review(&*session.lock().await)),
        Command::Submit => {
            let mut guard = session.lock().await;
            match guard.status() {
                QuizStatus::InProgress if !guard.can_submit() => {
                    println!("Answer every question before submitting.");
                    print!("{}", screen::review(&guard));
                }
                QuizStatus::InProgress | QuizStatus::Failed => {
                    println!("Submitting...");
                    let outcome = quiz_loop.submit(&mut guard).await;
                    drop(guard);
                    show_outcome(session, outcome).await;
                }
                _ => {
                    drop(guard);
                    redraw(session).await;
                }
            }
        }
        Command::Retry => {
            let mut guard = session.lock().await;
            let outcome = quiz_loop.retry_submit(&mut guard).await;
            drop(guard);
            show_outcome(session, outcome).await;
        }
        Command::Dismiss => {
            session.lock().await.dismiss_error();
            redraw(session).await;
        }
        Command::Choose(position) => {
            let mut guard = session.lock().await;
            let option_id = guard
                .current_question()
                .and_then(|question| question.option_at(position))
                .map(|option| option.id().clone());
            match option_id {
                Some(option_id) => guard.select_answer(option_id),
                None => println!("No option {}.", position + 1),
            }
            drop(guard);
            redraw(session).await;
        }
        Command::Clear => {
            session.lock().await.clear_answer();
            redraw(session).await;
        }
        Command::Next => {
            session.lock().await.next();
            redraw(session).await;
        }
        Command::Previous => {
            session.lock().await.previous();
            redraw(session).await;
        }
        Command::GoTo(index) => {
            session.lock().await.go_to(index);
            redraw(session).await;
        }
        Command::Refresh | Command::Start => redraw(session).await,
    }
    None
}

async fn redraw(session: &SharedSession) {
    let guard = session.lock().await;
    match guard.status() {
        QuizStatus::InProgress => print!("{}", screen::question(&guard)),
        QuizStatus::Completed => {
            if let Some(result) = guard.result() {
                print!("{}", screen::result(&guard, result));
            }
        }
        QuizStatus::NotStarted => println!("No quiz in progress. Type new or q."),
        QuizStatus::Submitting | QuizStatus::Failed => {
            if let Some(line) = screen::status_line(&guard) {
                println!("{line}");
            }
        }
    }
}

async fn show_outcome(session: &SharedSession, outcome: Result<ScoredResult, SubmitError>) {
    let guard = session.lock().await;
    match outcome {
        Ok(result) => print!("{}", screen::result(&guard, &result)),
        Err(err @ SubmitError::NotSubmittable { .. }) => println!("{}", err.user_message()),
        Err(err) => {
            if guard.is_auto_submit() {
                println!("\nTime is up! Submitting your answers failed.");
            }
            let line = screen::status_line(&guard).unwrap_or_else(|| err.user_message());
            println!("{line}");
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
