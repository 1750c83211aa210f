//! Connections to the simulator.
//!
//! - [`AgentConnection`]: the primary, bidirectional agent port. Owns the
//!   handshake and the per-cycle receive/send. Failures are fatal.
//! - [`TrainerConnection`]: the send-only monitor port used by test and
//!   training tools. Failures are degraded; the command is dropped.
//!
//! Both apply the same framing from [`crate::protocol::framing`] and open
//! their sockets with Nagle's algorithm disabled.

pub mod agent;
pub mod trainer;

#[cfg(test)]
mod tests;

pub use agent::{AgentConnection, IdentityRecord};
pub use trainer::{TrainerCommands, TrainerConnection};

use tokio::net::TcpStream;
use tracing::{error, info};

use crate::{AgentError, Result};

/// Opens a no-delay TCP stream to `endpoint`.
///
/// Refused connections and unknown hosts are logged with a hint before the
/// error is returned, so a missing simulator is obvious from the log alone.
pub(crate) async fn open_stream(endpoint: &str) -> Result<TcpStream> {
    let stream = match TcpStream::connect(endpoint).await {
        Ok(stream) => stream,
        Err(source) => {
            if source.kind() == std::io::ErrorKind::ConnectionRefused {
                error!(
                    "{} refused the connection. Is rcssserver3d running? Are you using an \
                     IPv6-enabled system and the host name translates to an IPv6 address?",
                    endpoint
                );
            } else {
                error!("Could not connect to {}: {}", endpoint, source);
            }
            return Err(AgentError::Establishment { endpoint: endpoint.to_string(), source });
        }
    };

    stream
        .set_nodelay(true)
        .map_err(|source| AgentError::Establishment { endpoint: endpoint.to_string(), source })?;

    info!("Connection to: {}", endpoint);
    Ok(stream)
}
