//! Summarization service seam.
//!
//! # Responsibility
//! - Define the one-shot prompt-in, text-out contract.
//! - Keep provider transport details behind the `Summarizer` trait.
//!
//! # Invariants
//! - Calls are blocking and single-turn; no state survives between calls.
//! - Prompt text is never logged, only its size.

pub mod gemini;

pub use gemini::GeminiClient;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Summarization call failure, shown to the user inline.
#[derive(Debug)]
pub enum SummarizeError {
    Http(reqwest::Error),
    Status { status: u16, message: String },
    /// The service answered but returned no text.
    EmptyResponse(String),
    Decode(String),
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "summarization request failed: {err}"),
            Self::Status { status, message } => {
                write!(f, "summarization service returned HTTP {status}: {message}")
            }
            Self::EmptyResponse(reason) => {
                write!(f, "summarization service returned no text: {reason}")
            }
            Self::Decode(message) => write!(f, "unexpected summarization response: {message}"),
        }
    }
}

impl Error for SummarizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SummarizeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Text-generation service used for refreshers and briefings.
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> SummarizeResult<String>;
}

impl<S: Summarizer + ?Sized> Summarizer for &S {
    fn summarize(&self, prompt: &str) -> SummarizeResult<String> {
        (**self).summarize(prompt)
    }
}

impl<S: Summarizer + ?Sized> Summarizer for Box<S> {
    fn summarize(&self, prompt: &str) -> SummarizeResult<String> {
        (**self).summarize(prompt)
    }
}
