use colored::*;
use ntuple_merge_core::Error as CoreError;
use ntuple_merge_core::error::IoErrorKind;
use std::error::Error as StdError;
use std::fmt;
use std::io;

/// CLI-specific error type with semantic exit codes
#[derive(Debug)]
pub struct CliError {
    /// The main error message
    message: String,

    /// Error category for exit code determination
    category: ErrorCategory,

    /// Additional context information
    context: Vec<(String, String)>,

    /// Suggestions for recovery
    pub suggestions: Vec<String>,

    /// Source error if any
    source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Error categories that map to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCategory {
    General,
    Misuse,
    MergeFailed,
    Filesystem,
}

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    MergeFailed = 3,
    FilesystemError = 4,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Extension trait for adding context to errors
pub trait ErrorContext {
    fn with_context(self, key: &str, value: &str) -> Self;
    fn with_suggestion(self, suggestion: &str) -> Self;
}

impl CliError {
    fn new(message: &str, category: ErrorCategory) -> Self {
        Self {
            message: message.to_string(),
            category,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Create a general error
    pub fn general(message: &str) -> Self {
        Self::new(message, ErrorCategory::General)
    }

    /// Create a command misuse error
    pub fn misuse(message: &str) -> Self {
        Self::new(message, ErrorCategory::Misuse)
            .with_suggestion("Run 'ntuple-merge --help' for usage information")
    }

    /// Create an error for a merge the engine reported as failed
    pub fn merge_failed(message: &str) -> Self {
        Self::new(message, ErrorCategory::MergeFailed)
            .with_suggestion("Check the merge log above for the engine's own output")
    }

    /// Create a filesystem error, with suggestions chosen from the IO error kind
    pub fn filesystem(message: &str, kind: &IoErrorKind) -> Self {
        let error = Self::new(message, ErrorCategory::Filesystem);

        match kind {
            IoErrorKind::FileNotFound => error
                .with_suggestion("Check if the file or directory exists")
                .with_suggestion("Verify you have the correct path"),
            IoErrorKind::PermissionDenied => error.with_suggestion("Check file permissions"),
            IoErrorKind::NotADirectory => {
                error.with_suggestion("Pass a directory, not a file, as the merge root")
            }
            IoErrorKind::Other => error,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category {
            ErrorCategory::General => ExitCode::GeneralError,
            ErrorCategory::Misuse => ExitCode::Misuse,
            ErrorCategory::MergeFailed => ExitCode::MergeFailed,
            ErrorCategory::Filesystem => ExitCode::FilesystemError,
        }
    }

    fn label(&self) -> &'static str {
        match self.category {
            ErrorCategory::General => "Error",
            ErrorCategory::Misuse => "Usage Error",
            ErrorCategory::MergeFailed => "Merge Failed",
            ErrorCategory::Filesystem => "File Error",
        }
    }

    /// Format the error for user display
    pub fn format_for_user(&self, debug: bool) -> String {
        let mut output = String::new();

        let prefix = match self.category {
            ErrorCategory::Misuse => self.label().yellow(),
            _ => self.label().red(),
        };
        output.push_str(&format!("{}: {}\n", prefix, self.message));

        if !self.context.is_empty() {
            output.push_str("\nContext:\n");
            for (key, value) in &self.context {
                output.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
        }

        // Error chain in debug mode
        if debug && let Some(source) = &self.source {
            output.push_str("\nCaused by:\n");
            let mut current: Option<&dyn StdError> = Some(source.as_ref());
            let mut level = 1;

            while let Some(err) = current {
                output.push_str(&format!("  {level}: {err}\n"));
                current = err.source();
                level += 1;
            }
        }

        if !self.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.message)?;

        for (key, value) in &self.context {
            write!(f, " ({key}: {value})")?;
        }

        Ok(())
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl ErrorContext for CliError {
    fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestions.push(suggestion.to_string());
        self
    }
}

/// Convert anyhow errors to CLI errors, keeping the category of core errors
impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        let message = format!("{error:#}");

        let mut cli_error = if let Some(core) = error.downcast_ref::<CoreError>() {
            match core {
                CoreError::Io(io_err) => {
                    let mut e = match io_err.kind {
                        IoErrorKind::Other => Self::general(&message),
                        ref kind => Self::filesystem(&message, kind),
                    };
                    if let Some(path) = &io_err.path {
                        e = e.with_context("path", &path.display().to_string());
                    }
                    e
                }
                CoreError::Validation(_) => Self::misuse(&message),
                CoreError::Merge(_) => Self::merge_failed(&message),
            }
        } else if let Some(io_err) = error.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::NotFound => Self::filesystem(&message, &IoErrorKind::FileNotFound),
                io::ErrorKind::PermissionDenied => {
                    Self::filesystem(&message, &IoErrorKind::PermissionDenied)
                }
                _ => Self::general(&message),
            }
        } else {
            Self::general(&message)
        };

        cli_error.source = Some(error.into());
        cli_error
    }
}
