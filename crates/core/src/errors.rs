use std::path::PathBuf;

/// Result type alias for kata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for kata operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote API rejected the call with a typed error envelope that was
    /// not allow-listed by the caller
    #[error("remote error '{error_type}': {message}")]
    Api { error_type: String, message: String },

    /// Network-level failures (connect, TLS, exhausted rate-limit retries)
    #[error("network error for '{endpoint}': {message}")]
    Network { endpoint: String, message: String },

    /// A remote entity disappeared between listing and lookup
    #[error("{kind} '{identifier}' not found")]
    NotFound { kind: String, identifier: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// External toolchain or diff-tool invocation failures
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors (missing token, bad endpoint, ...)
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    match exit_code {
        Some(code) => {
            if args_str.is_empty() {
                format!("command '{command}' failed with exit code {code}: {message}")
            } else {
                format!("command '{command} {args_str}' failed with exit code {code}: {message}")
            }
        }
        None => {
            if args_str.is_empty() {
                format!("command '{command}' failed: {message}")
            } else {
                format!("command '{command} {args_str}' failed: {message}")
            }
        }
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a remote API error from a decoded error envelope
    #[must_use]
    pub fn api(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    #[must_use]
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error for a remote entity
    #[must_use]
    pub fn not_found(kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
