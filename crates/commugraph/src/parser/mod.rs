//! Framework log parsers.
//!
//! Each supported multi-agent framework implements [`LogParser`]; callers pick
//! one by name through [`ParserRegistry`].

pub mod autogen;

use std::path::Path;

pub use autogen::AutoGenParser;

use crate::types::Message;

/// Errors raised while turning raw log bytes into messages.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unsupported framework: {name}. Available: {available}")]
    UnsupportedFramework { name: String, available: String },

    #[error("Invalid JSON on line {line}: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid entry on line {line}: {reason}")]
    InvalidEntry { line: usize, reason: String },

    #[error("Log is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Log file is empty: {0}")]
    EmptyFile(String),

    #[error("No valid messages found in log")]
    NoMessages,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type ParseResult<T> = Result<T, ParseError>;

/// Turns one framework's log format into canonical messages.
pub trait LogParser: Send + Sync {
    /// Registry name, e.g. `"autogen"`.
    fn framework(&self) -> &'static str;

    /// Parse a complete log held in memory.
    fn parse(&self, bytes: &[u8]) -> ParseResult<Vec<Message>>;

    /// Read and parse a log file.
    fn parse_file(&self, path: &Path) -> ParseResult<Vec<Message>> {
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(ParseError::EmptyFile(path.display().to_string()));
        }
        self.parse(&bytes)
    }
}

static PARSERS: &[&dyn LogParser] = &[&AutoGenParser];

/// Static table of the available parsers.
pub struct ParserRegistry;

impl ParserRegistry {
    /// Names of all registered frameworks.
    pub fn available() -> Vec<&'static str> {
        PARSERS.iter().map(|p| p.framework()).collect()
    }

    /// Look up a parser by framework name (case-insensitive).
    pub fn get(name: &str) -> ParseResult<&'static dyn LogParser> {
        PARSERS
            .iter()
            .copied()
            .find(|p| p.framework().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ParseError::UnsupportedFramework {
                name: name.to_string(),
                available: Self::available().join(", "),
            })
    }

    /// Parse `bytes` with the parser registered under `framework`.
    pub fn parse(framework: &str, bytes: &[u8]) -> ParseResult<Vec<Message>> {
        let parser = Self::get(framework)?;
        let messages = parser.parse(bytes)?;
        tracing::debug!(
            "Parsed {} messages with the {} parser",
            messages.len(),
            parser.framework()
        );
        Ok(messages)
    }
}
