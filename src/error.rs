/// Error types for each step of the alert pipeline.
///
/// Every fallible step returns its own error enum so the driver can
/// decide what is fatal: loading errors stop the run, query errors skip
/// one station, delivery errors skip one user.

use std::path::PathBuf;

/// Configuration problems detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A credential pair is absent from the environment.
    #[error("Missing {0} credentials")]
    MissingCredentials(&'static str),

    /// The settings file exists but could not be read or parsed.
    #[error("Invalid settings file {path}: {reason}")]
    Settings { path: PathBuf, reason: String },
}

/// Failures while reading the river data file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {}", .path.display(), .reason)]
    Parse { path: PathBuf, reason: String },

    /// Every snapshot in the file has an empty station mapping.
    #[error("No station data found")]
    NoData,
}

/// Registration store lookup failed for one station.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Registration store returned HTTP {0}")]
    Http(u16),

    #[error("Registration store request failed: {0}")]
    Transport(String),

    #[error("Unexpected registration store response: {0}")]
    Decode(String),
}

/// A single message could not be delivered.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Missing Telerivet credentials")]
    MissingCredentials,

    #[error("Gateway returned HTTP {0}")]
    Status(u16),

    #[error("Gateway request failed: {0}")]
    Transport(String),
}

/// Sign-up insert failures.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid registration: {0}")]
    Invalid(String),

    #[error("This phone number is already registered")]
    AlreadyRegistered,

    #[error("Registration store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Registration store request failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_messages_name_the_file() {
        let err = LoadError::NotFound(PathBuf::from("river_data.json"));
        assert_eq!(err.to_string(), "river_data.json not found");

        let err = LoadError::Parse {
            path: PathBuf::from("river_data.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("river_data.json"));
    }

    #[test]
    fn test_missing_credentials_message() {
        let err = ConfigError::MissingCredentials("Supabase");
        assert_eq!(err.to_string(), "Missing Supabase credentials");
    }
}
