#![forbid(unsafe_code)]

//! Domain model for a single quiz attempt: question sets, answer sheets,
//! submission payloads and scored results. No I/O lives here.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::{Clock, TimeLimit, TimeUnit};
