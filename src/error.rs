//! Error types for the agent runtime.
//!
//! Every send and receive in this crate returns [`Result`], and every error
//! carries a [`Severity`] so callers can tell a broken simulator link apart
//! from a best-effort failure that the agent can shrug off.
//!
//! ## Error Categories
//!
//! - **Fatal**: I/O failures on the primary agent connection, a negative
//!   length header (server shut down), an expired receive bound, an
//!   unresolvable handshake. The agent is expected to stop.
//! - **Degraded**: trainer channel sends that were dropped, keyframe files
//!   that could not be read or parsed. The agent keeps running.
//!
//! ```rust
//! use simlink::{AgentError, Severity};
//!
//! let error = AgentError::connection_failed("Error writing to socket");
//! assert_eq!(error.severity(), Severity::Fatal);
//!
//! let dropped = AgentError::trainer_send_failed(
//!     std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe"),
//! );
//! assert!(!dropped.is_fatal());
//! ```

use std::path::PathBuf;
use std::string::FromUtf8Error;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for agent operations.
pub type Result<T, E = AgentError> = std::result::Result<T, E>;

/// How bad an error is for the running agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The session is desynchronized or gone; stop the agent.
    Fatal,
    /// The operation was dropped; the session is still usable.
    Degraded,
}

/// Main error type for agent operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AgentError {
    #[error("Connection failure: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Could not connect to {endpoint}")]
    Establishment {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server is down (length header {header})")]
    ServerDown { header: i32 },

    #[error("No server message within {duration:?}")]
    Timeout { duration: Duration },

    #[error("Server message is not valid UTF-8")]
    InvalidPayload {
        #[source]
        source: FromUtf8Error,
    },

    #[error("Robot initialization failed: {reason}")]
    Handshake { reason: String },

    #[error("Trainer command dropped: {reason}")]
    TrainerSend {
        reason: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Keyframe file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },
}

impl AgentError {
    /// Classifies the error for the cycle loop.
    pub fn severity(&self) -> Severity {
        match self {
            AgentError::Connection { .. } => Severity::Fatal,
            AgentError::Establishment { .. } => Severity::Fatal,
            AgentError::ServerDown { .. } => Severity::Fatal,
            AgentError::Timeout { .. } => Severity::Fatal,
            AgentError::InvalidPayload { .. } => Severity::Fatal,
            AgentError::Handshake { .. } => Severity::Fatal,
            AgentError::TrainerSend { .. } => Severity::Degraded,
            AgentError::File { .. } => Severity::Degraded,
            AgentError::Parse { .. } => Severity::Degraded,
        }
    }

    /// Shorthand for `severity() == Severity::Fatal`.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AgentError::Connection { .. } | AgentError::ServerDown { .. } => vec![
                "Check whether rcssserver3d is still running",
                "Restart the agent once the simulator is back",
            ],
            AgentError::Establishment { .. } => vec![
                "Start rcssserver3d before the agent",
                "Check host and port of the simulator",
                "On IPv6-enabled systems make sure the host name resolves to IPv4",
            ],
            AgentError::Timeout { .. } => vec![
                "Increase or disable the receive timeout",
                "Check whether the simulator is paused or overloaded",
            ],
            AgentError::InvalidPayload { .. } => vec![
                "Verify the simulator version speaks the SimSpark network protocol",
            ],
            AgentError::Handshake { .. } => vec![
                "Use a player number between 1 and 11, or 0 to let the server assign one",
                "Check that at most two team names are used on the field",
            ],
            AgentError::TrainerSend { .. } => vec![
                "Check that the monitor port of the simulator is open",
                "Resend the command in a later cycle",
            ],
            AgentError::File { .. } => vec![
                "Check that the keyframes directory exists in the working directory",
                "Check file permissions",
            ],
            AgentError::Parse { .. } => vec![
                "Check that each keyframe line starts with an integer transition time",
                "Separate angles with spaces",
            ],
        }
    }

    /// Helper constructor for connection errors without an I/O cause.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        AgentError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with an I/O cause.
    pub fn connection_io(reason: impl Into<String>, source: std::io::Error) -> Self {
        AgentError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for handshake errors.
    pub fn handshake(reason: impl Into<String>) -> Self {
        AgentError::Handshake { reason: reason.into() }
    }

    /// Helper constructor for dropped trainer commands.
    pub fn trainer_send_failed(source: std::io::Error) -> Self {
        AgentError::TrainerSend {
            reason: "Error writing to socket. Has the server been shut down?".to_string(),
            source,
        }
    }

    /// Helper constructor for keyframe file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        AgentError::File { path, source }
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::connection_io("Socket I/O failed", err)
    }
}
