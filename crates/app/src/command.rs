use std::fmt;

/// A line typed by the user while a quiz is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Choose the option at a 0-based position.
    Choose(usize),
    Clear,
    Next,
    Previous,
    /// Jump to a 0-based question position.
    GoTo(usize),
    Review,
    Submit,
    Retry,
    Dismiss,
    NewQuiz,
    Help,
    Quit,
    /// Begin the attempt from the intro screen.
    Start,
    /// Empty line: redraw, or start from the intro screen.
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingNumber,
    InvalidNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (type h for help)"),
            CommandError::MissingNumber => write!(f, "g needs a question number, e.g. g 3"),
            CommandError::InvalidNumber(raw) => write!(f, "not a question number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse one input line. Option and question numbers are 1-based.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Refresh);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "c" | "clear" => Self::Clear,
            "v" | "review" => Self::Review,
            "s" | "submit" => Self::Submit,
            "r" | "retry" => Self::Retry,
            "d" | "dismiss" => Self::Dismiss,
            "new" => Self::NewQuiz,
            "start" => Self::Start,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "back" => Self::Quit,
            "g" | "go" | "goto" => {
                let raw = words.next().ok_or(CommandError::MissingNumber)?;
                Self::GoTo(parse_position(raw)?)
            }
            other => return parse_choice(other),
        };
        Ok(command)
    }
}

/// What a line typed on the intro screen asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntroAction {
    Begin,
    Leave,
    /// Anything else; the prompt is shown again.
    Hint,
}

impl IntroAction {
    /// Only an empty line or `start` begins the attempt.
    pub fn parse(line: &str) -> Self {
        match Command::parse(line) {
            Ok(Command::Refresh | Command::Start) => Self::Begin,
            Ok(Command::Quit) => Self::Leave,
            _ => Self::Hint,
        }
    }
}

fn parse_position(raw: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_string()))
}

fn parse_choice(raw: &str) -> Result<Command, CommandError> {
    match raw.parse::<usize>() {
        Ok(number) => number
            .checked_sub(1)
            .map(Command::Choose)
            .ok_or_else(|| CommandError::InvalidNumber(raw.to_string())),
        Err(_) => Err(CommandError::Unknown(raw.to_string())),
    }
}
