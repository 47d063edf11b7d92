use std::fmt;
use std::path::PathBuf;

/// Label for a failure, so callers can branch on the kind without matching prose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    MalformedMetadata,
    InvalidInput,
    Io,
}

/// Errors surfaced by the repository and the operation handlers
#[derive(Debug, Clone)]
pub enum ZamError {
    /// Target alias or backup file does not exist
    NotFound {
        what: String,
        name: String,
        suggestions: Vec<String>,
    },

    /// Rename target already exists
    Conflict {
        name: String,
        existing_command: String,
    },

    /// Metadata file exists but is not valid JSON
    MalformedMetadata {
        file_path: PathBuf,
        underlying_error: String,
    },

    /// Name or command cannot be represented in the alias file
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Underlying read/write capability failed
    Io {
        file_path: PathBuf,
        operation: String,
        underlying_error: String,
    },
}

impl ZamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZamError::NotFound { .. } => ErrorKind::NotFound,
            ZamError::Conflict { .. } => ErrorKind::Conflict,
            ZamError::MalformedMetadata { .. } => ErrorKind::MalformedMetadata,
            ZamError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ZamError::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn alias_not_found(name: &str) -> Self {
        ZamError::NotFound {
            what: "alias".to_string(),
            name: name.to_string(),
            suggestions: Vec::new(),
        }
    }

    pub fn io<P: Into<PathBuf>>(path: P, operation: &str, error: std::io::Error) -> Self {
        ZamError::Io {
            file_path: path.into(),
            operation: operation.to_string(),
            underlying_error: error.to_string(),
        }
    }

    pub fn invalid(field: &str, value: &str, reason: &str) -> Self {
        ZamError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn with_suggestions(mut self, candidates: Vec<String>) -> Self {
        if let ZamError::NotFound { suggestions, .. } = &mut self {
            *suggestions = candidates;
        }
        self
    }
}

impl fmt::Display for ZamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZamError::NotFound { what, name, suggestions } => {
                write!(f, "{} '{}' not found", what, name)?;
                if !suggestions.is_empty() {
                    write!(f, "\n  Did you mean:")?;
                    for suggestion in suggestions {
                        write!(f, "\n    - {}", suggestion)?;
                    }
                }
                Ok(())
            }

            ZamError::Conflict { name, existing_command } => {
                write!(f, "alias '{}' already exists\n", name)?;
                write!(f, "  Current command: {}\n", existing_command)?;
                write!(f, "  Remove or rename it first.")
            }

            ZamError::MalformedMetadata { file_path, underlying_error } => {
                write!(f, "metadata file is not valid JSON: {}\n", file_path.display())?;
                write!(f, "  Error: {}\n", underlying_error)?;
                write!(f, "  Continuing with empty metadata.")
            }

            ZamError::InvalidInput { field, value, reason } => {
                write!(f, "invalid {} {:?}: {}", field, value, reason)
            }

            ZamError::Io { file_path, operation, underlying_error } => {
                write!(f, "file operation failed\n")?;
                write!(f, "  File: {}\n", file_path.display())?;
                write!(f, "  Operation: {}\n", operation)?;
                write!(f, "  Error: {}\n", underlying_error)?;
                write!(f, "  Check file permissions and disk space.")
            }
        }
    }
}

impl std::error::Error for ZamError {}

/// Alias names that share a prefix with `name`, for NotFound hints
pub fn similar_names<'a>(name: &str, candidates: impl Iterator<Item = &'a String>) -> Vec<String> {
    let needle = name.to_lowercase();
    candidates
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            !needle.is_empty() && (candidate.starts_with(&needle) || needle.starts_with(&candidate))
        })
        .take(3)
        .cloned()
        .collect()
}
