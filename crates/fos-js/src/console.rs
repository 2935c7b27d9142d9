//! Console API
//!
//! Implements console.log, console.warn, console.error, etc. Messages are
//! captured per window and forwarded to `tracing`.

use std::fmt;

/// Console message level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleLevel::Log => "LOG",
            ConsoleLevel::Info => "INFO",
            ConsoleLevel::Warn => "WARN",
            ConsoleLevel::Error => "ERROR",
            ConsoleLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured console call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
}

/// Per-window console buffer
#[derive(Debug, Clone, Default)]
pub struct Console {
    messages: Vec<ConsoleMessage>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, text: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Log, text.into());
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Info, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Warn, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Error, text.into());
    }

    pub fn debug(&mut self, text: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Debug, text.into());
    }

    /// Log values joined by spaces, like `console.log(a, b, c)`
    pub fn log_values<I, T>(&mut self, level: ConsoleLevel, values: I)
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        let text = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.log_with_level(level, text);
    }

    fn log_with_level(&mut self, level: ConsoleLevel, text: String) {
        match level {
            ConsoleLevel::Error => tracing::error!("[JS] {}", text),
            ConsoleLevel::Warn => tracing::warn!("[JS] {}", text),
            ConsoleLevel::Debug => tracing::debug!("[JS] {}", text),
            ConsoleLevel::Log | ConsoleLevel::Info => tracing::info!("[JS] {}", text),
        }
        self.messages.push(ConsoleMessage { level, text });
    }

    pub fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }

    /// Every message text concatenated, in call order
    pub fn output(&self) -> String {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
