//! Connection targets and timing constants.
//!
//! The simulator endpoints are fixed at compile time. [`ConnectionConfig`]
//! bundles them with the receive bound so tests and tools can point a
//! connection somewhere else without a runtime configuration layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host the simulator runs on.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Agent port of rcssserver3d.
pub const AGENT_PORT: u16 = 3100;

/// Monitor port of rcssserver3d, used for trainer commands.
pub const TRAINER_PORT: u16 = 3200;

/// Receive/sync round trips after the initial beam, while the gyro and
/// accelerometer even out.
pub const SETTLE_CYCLES: u32 = 100;

/// Length of one simulator cycle.
pub const CYCLE_DURATION: Duration = Duration::from_millis(20);

/// Simulator cycles per wall-clock second.
pub const CYCLES_PER_SECOND: u64 = 50;

/// Directory keyframe files are read from, relative to the working directory.
pub const KEYFRAME_DIR: &str = "keyframes";

/// Endpoint and timing settings for a simulator connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single blocking receive. `None` waits forever.
    pub receive_timeout: Option<Duration>,
    pub settle_cycles: u32,
}

impl ConnectionConfig {
    /// Defaults for the agent port.
    pub fn agent() -> Self {
        Self::default()
    }

    /// Defaults for the trainer (monitor) port.
    pub fn trainer() -> Self {
        Self { port: TRAINER_PORT, ..Self::default() }
    }

    /// `host:port` as used for socket addressing and diagnostics.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: AGENT_PORT,
            receive_timeout: None,
            settle_cycles: SETTLE_CYCLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_simulator() {
        let agent = ConnectionConfig::agent();
        assert_eq!(agent.endpoint(), "127.0.0.1:3100");
        assert_eq!(agent.receive_timeout, None);
        assert_eq!(agent.settle_cycles, 100);

        let trainer = ConnectionConfig::trainer();
        assert_eq!(trainer.endpoint(), "127.0.0.1:3200");
    }

    #[test]
    fn cycle_constants_agree() {
        assert_eq!(CYCLE_DURATION * CYCLES_PER_SECOND as u32, Duration::from_secs(1));
    }
}
