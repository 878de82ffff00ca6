#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod gateway;
pub mod quiz;

pub use quiz_core::Clock;

pub use app_services::{AppServices, QuizOrigin};
pub use error::{QuizError, SourceError, SubmitError};
pub use gateway::{
    GatewayConfig, HttpQuizGateway, QuizRequest, QuizSource, QuizSubmitter, StaticQuizSource,
};
pub use quiz::{
    Countdown, CountdownEnd, NavigatorCell, ProgressKind, QuizLoopService, QuizProgress,
    QuizSession, QuizStatus, SharedSession, TickOutcome,
};
