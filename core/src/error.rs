use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ClientError {
    /// The operation requires a bearer token and none could be resolved.
    Unauthenticated(String),
    /// The backend returned a failure envelope or non-success status.
    Api { status: u16, message: String },
    /// Transport-level failure (connection, TLS, timeout).
    Http(reqwest::Error),
    /// A success response body did not match the expected envelope.
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Unauthenticated(msg) => write!(f, "{}", msg),
            ClientError::Api { status, message } => {
                write!(f, "backend error ({}): {}", status, message)
            }
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Decode(msg) => write!(f, "unexpected response shape: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e)
    }
}


// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be parsed.
    Parse { path: PathBuf, message: String },
    /// Filesystem I/O error while reading or bootstrapping config.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse {}: {}", path.display(), message)
            }
            ConfigError::Io(e) => write!(f, "config I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_message() {
        let err = ClientError::Api {
            status: 400,
            message: "control number may not be blank".into(),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("control number may not be blank"));
    }

    #[test]
    fn unauthenticated_display_is_the_message() {
        let err = ClientError::Unauthenticated("Only authenticated users can add devices.".into());
        assert_eq!(
            err.to_string(),
            "Only authenticated users can add devices."
        );
    }

    #[test]
    fn config_parse_error_names_the_file() {
        let err = ConfigError::Parse {
            path: PathBuf::from("/tmp/config.yaml"),
            message: "bad yaml".into(),
        };
        assert!(err.to_string().contains("/tmp/config.yaml"));
    }
}
