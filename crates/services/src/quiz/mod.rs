mod progress;
mod session;
mod timer;
mod workflow;

// Public API of the quiz subsystem.
pub use progress::{NavigatorCell, ProgressKind, QuizProgress};
pub use session::{QuizSession, QuizStatus, TickOutcome};
pub use timer::{Countdown, CountdownEnd, SharedSession};
pub use workflow::QuizLoopService;
