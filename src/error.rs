use std::path::PathBuf;

use chrono::NaiveDate;

/// Exit code for fatal input errors (unreadable files, bad records, invalid config).
pub const EXIT_INPUT: u8 = 2;
/// Exit code for output I/O failures.
pub const EXIT_OUTPUT: u8 = 4;

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

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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

/// Fatal errors raised while loading the parameter file and baseline table.
///
/// Every variant is detected before any output file is touched.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Missing reference acquisition: {0}")]
    MissingReference(String),

    #[error("Duplicate acquisition date {date} (lines {first_line} and {second_line})")]
    DuplicateAcquisition {
        date: NaiveDate,
        first_line: usize,
        second_line: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LoadError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_map_to_input_exit_code() {
        let err: AppError = LoadError::parse("table.dat", 7, "expected 5 fields, found 4").into();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert_eq!(err.to_string(), "table.dat:7: expected 5 fields, found 4");
    }
}
