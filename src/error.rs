//! Application error type.
//!
//! Only structural problems surface as errors (unreadable file, missing
//! column, invalid flags, failed export). Numeric edge cases never do: they
//! degrade to NaN or zero inside the statistics layer.
//!
//! Exit codes:
//! - `2` bad input (file, header, flag values)
//! - `3` nothing to analyse (no dataset loaded)
//! - `4` internal or output failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Structural input error (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
