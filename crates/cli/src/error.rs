//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: engine error (bad count, bad params, bad trigger, bad dimensions)
//! - 11: I/O error (script/seed file read, snapshot write)
//! - 12: input error (malformed JSON in --params, script or seed file)
//! - 13: serialization error

use starfield_core::StarFieldError;
use std::fmt;
use std::io;
use std::path::Path;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Rejected by the engine (zero count, bad params, bad trigger, bad dt).
    Engine(StarFieldError),
    /// A file could not be read or a snapshot could not be written.
    Io(String),
    /// Malformed user input (params JSON, trigger script, seed file, color).
    Input(String),
    /// JSON output failed.
    Serialization(String),
}

impl CliError {
    /// An I/O failure on `path`, with the path in the message.
    pub fn io_at(path: &Path, e: io::Error) -> Self {
        CliError::Io(format!("{}: {e}", path.display()))
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<StarFieldError> for CliError {
    fn from(e: StarFieldError) -> Self {
        match e {
            StarFieldError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_exit_code_is_10() {
        let err = CliError::Engine(StarFieldError::InvalidConfiguration("count".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        assert_eq!(CliError::Io("read failed".into()).exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        assert_eq!(CliError::Input("bad script".into()).exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        assert_eq!(CliError::Serialization("json fail".into()).exit_code(), 13);
    }

    #[test]
    fn from_star_field_io_routes_to_cli_io() {
        let cli_err = CliError::from(StarFieldError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_star_field_trigger_routes_to_cli_engine() {
        let cli_err = CliError::from(StarFieldError::InvalidTrigger("origin NaN".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("origin NaN"));
    }

    #[test]
    fn io_at_names_the_path() {
        let e = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let cli_err = CliError::io_at(Path::new("scripts/burst.json"), e);
        assert_eq!(cli_err.exit_code(), 11);
        assert_eq!(cli_err.to_string(), "scripts/burst.json: no such file");
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
