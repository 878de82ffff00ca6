use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Identifiers are opaque strings issued by the quiz backend (document ids).
// An id is never empty or padded with whitespace once constructed.

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new id, rejecting blank input.
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if the trimmed value is empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                if trimmed.len() == id.len() {
                    Ok(Self(id))
                } else {
                    Ok(Self(trimmed.to_owned()))
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Identifier of a quiz (question set).
    QuizId
);
string_id!(
    /// Identifier of the exam a quiz belongs to, when it is exam practice.
    ExamId
);
string_id!(
    /// Identifier of a single question.
    QuestionId
);
string_id!(
    /// Identifier of an option within a question.
    OptionId
);

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be blank", self.kind)
    }
}

impl std::error::Error for ParseIdError {}
