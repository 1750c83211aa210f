//! Primary agent connection and the robot handshake.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::beam::{BeamPose, beam_pose};
use crate::config::ConnectionConfig;
use crate::protocol::commands::{self, SYNC};
use crate::protocol::{GameState, TeamSide, framing};
use crate::{AgentError, Result};

/// Requested id that asks the server to assign the player number.
pub const ASSIGN_ID: &str = "0";

/// Who the robot is after the handshake. Built once, never changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Id passed to `init_robot`, `"0"` when the server assigned one.
    pub requested_id: String,
    pub team_name: String,
    /// Resolved player number, 1..=11.
    pub player_id: u8,
    pub team_side: TeamSide,
    pub beam: BeamPose,
}

impl IdentityRecord {
    /// Resolves the identity from the handshake inputs and the first game
    /// state after init.
    ///
    /// With [`ASSIGN_ID`] the player number comes from the server and the
    /// pose from the beam table; otherwise both are taken as supplied.
    pub fn resolve(
        requested_id: &str,
        team_name: &str,
        supplied: BeamPose,
        game_state: &GameState,
    ) -> Result<Self> {
        let team_side = game_state
            .team_side
            .ok_or_else(|| AgentError::handshake("first game state carries no team side"))?;

        let (player_id, beam) = if requested_id == ASSIGN_ID {
            let unum = game_state
                .unum
                .ok_or_else(|| AgentError::handshake("server did not assign a player number"))?;
            let pose = beam_pose(unum).ok_or_else(|| {
                AgentError::handshake(format!("no beam pose for assigned player number {unum}"))
            })?;
            (unum, pose)
        } else {
            let id = requested_id
                .parse::<u8>()
                .map_err(|_| AgentError::handshake(format!("invalid player id '{requested_id}'")))?;
            (id, supplied)
        };

        Ok(Self {
            requested_id: requested_id.to_string(),
            team_name: team_name.to_string(),
            player_id,
            team_side,
            beam,
        })
    }
}

/// Framed connection on the agent port.
///
/// Every receive advances simulated time by one cycle, so a caller must
/// pair each [`get_server_message`](Self::get_server_message) with exactly
/// one [`send_agent_message`](Self::send_agent_message) ending in `(syn)`.
pub struct AgentConnection<S = TcpStream> {
    stream: S,
    endpoint: String,
    receive_timeout: Option<Duration>,
    settle_cycles: u32,
    identity: Option<IdentityRecord>,
    /// Set once a receive was cut off; the stream may sit inside a frame.
    broken: Option<Duration>,
}

impl AgentConnection<TcpStream> {
    /// Connect to the agent port at `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let config = ConnectionConfig { host: host.to_string(), port, ..ConnectionConfig::agent() };
        Self::connect_with(&config).await
    }

    /// Connect using a full [`ConnectionConfig`].
    pub async fn connect_with(config: &ConnectionConfig) -> Result<Self> {
        let endpoint = config.endpoint();
        let stream = super::open_stream(&endpoint).await?;
        Ok(Self::from_stream(stream, config))
    }
}

impl<S> AgentConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already open stream.
    pub fn from_stream(stream: S, config: &ConnectionConfig) -> Self {
        Self {
            stream,
            endpoint: config.endpoint(),
            receive_timeout: config.receive_timeout,
            settle_cycles: config.settle_cycles,
            identity: None,
            broken: None,
        }
    }

    /// Create the robot on the field and settle it at its start pose.
    ///
    /// Runs the full handshake: scene, init, one game state read to learn
    /// team side (and the assigned number for `"0"`), beam, then
    /// `settle_cycles` receive/sync round trips. On return the connection
    /// sits at a cycle boundary: the next call must be a receive.
    pub async fn init_robot(
        &mut self,
        requested_id: &str,
        team: &str,
        beam_x: f64,
        beam_y: f64,
        beam_rot: f64,
    ) -> Result<IdentityRecord> {
        if let Some(identity) = &self.identity {
            return Err(AgentError::handshake(format!(
                "robot already initialized as player {} of {}",
                identity.player_id, identity.team_name
            )));
        }

        info!("Initializing robot {} of team {} at {}", requested_id, team, self.endpoint);

        self.send_agent_message(&commands::scene()).await?;
        self.get_server_message().await?;
        debug!("Scene created");

        self.send_agent_message(&commands::init(requested_id, team)).await?;
        self.get_server_message().await?;
        debug!("Init acknowledged");

        // Only the message answering this sync carries unum and team side.
        self.send_agent_message(SYNC).await?;
        let first = self.get_server_message().await?;
        let game_state = GameState::from_message(&first)
            .ok_or_else(|| AgentError::handshake("first message after init has no game state"))?;

        let supplied = BeamPose::new(beam_x, beam_y, beam_rot);
        let identity = IdentityRecord::resolve(requested_id, team, supplied, &game_state)?;
        info!(
            "Robot is player {} on the {} side, beaming to ({}, {}, {})",
            identity.player_id, identity.team_side, identity.beam.x, identity.beam.y, identity.beam.rot
        );
        self.identity = Some(identity.clone());

        self.send_beam_message().await?;

        for _ in 0..self.settle_cycles {
            self.get_server_message().await?;
            self.send_agent_message(SYNC).await?;
        }
        debug!("Sensors settled after {} cycles", self.settle_cycles);

        Ok(identity)
    }

    /// Beam command at the resolved pose, without the sync marker.
    pub fn beam_command(&self) -> Result<String> {
        let identity = self.identity.as_ref().ok_or_else(|| AgentError::handshake("robot not initialized"))?;
        Ok(commands::beam(&identity.beam))
    }

    /// Beam the robot back to its resolved start pose, e.g. after a goal.
    pub async fn send_beam_message(&mut self) -> Result<()> {
        let message = format!("{}{SYNC}", self.beam_command()?);
        self.send_agent_message(&message).await
    }

    /// Frame and send effector text. The content is not validated.
    pub async fn send_agent_message(&mut self, text: &str) -> Result<()> {
        self.ensure_usable()?;
        framing::write_frame(&mut self.stream, text).await.map_err(|e| {
            AgentError::connection_io("Error writing to socket. Has the server been shut down?", e)
        })
    }

    /// Receive the oldest pending server message.
    ///
    /// Waits for a complete frame, bounded by the receive timeout when one
    /// is set. A receive that times out may have consumed part of a frame,
    /// so the connection is unusable afterwards: every later send or
    /// receive fails with a fatal [`AgentError::Connection`].
    pub async fn get_server_message(&mut self) -> Result<String> {
        self.ensure_usable()?;
        let read = framing::read_frame(&mut self.stream);
        match self.receive_timeout {
            Some(duration) => match tokio::time::timeout(duration, read).await {
                Ok(message) => message,
                Err(_) => {
                    warn!("No server message within {:?} from {}, dropping the connection", duration, self.endpoint);
                    self.broken = Some(duration);
                    Err(AgentError::Timeout { duration })
                }
            },
            None => read.await,
        }
    }

    /// Whether an earlier receive timed out and left the stream unaligned.
    pub fn is_broken(&self) -> bool {
        self.broken.is_some()
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.broken {
            Some(duration) => Err(AgentError::connection_failed(format!(
                "connection to {} lost frame alignment after a {:?} receive timeout",
                self.endpoint, duration
            ))),
            None => Ok(()),
        }
    }

    /// Identity resolved by [`init_robot`](Self::init_robot).
    pub fn identity(&self) -> Option<&IdentityRecord> {
        self.identity.as_ref()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn receive_timeout(&self) -> Option<Duration> {
        self.receive_timeout
    }

    /// Bound (or unbound, with `None`) every following receive.
    pub fn set_receive_timeout(&mut self, timeout: Option<Duration>) {
        self.receive_timeout = timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayMode;

    fn first_state(unum: u8) -> GameState {
        GameState {
            unum: Some(unum),
            team_side: Some(TeamSide::Left),
            play_time: Some(0.0),
            play_mode: Some(PlayMode::BeforeKickOff),
        }
    }

    #[test]
    fn assigned_id_uses_beam_table() {
        let identity =
            IdentityRecord::resolve("0", "T", BeamPose::new(1.0, 2.0, 3.0), &first_state(2)).unwrap();
        assert_eq!(identity.player_id, 2);
        assert_eq!(identity.beam, beam_pose(2).unwrap());
        assert_eq!(identity.requested_id, "0");
        assert_eq!(identity.team_side, TeamSide::Left);
    }

    #[test]
    fn explicit_id_uses_supplied_pose() {
        let identity =
            IdentityRecord::resolve("5", "T", BeamPose::new(1.0, 2.0, 3.0), &first_state(9)).unwrap();
        assert_eq!(identity.player_id, 5);
        assert_eq!(identity.beam, BeamPose::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn unresolvable_identities() {
        let supplied = BeamPose::new(0.0, 0.0, 0.0);

        let no_side = GameState { team_side: None, ..first_state(3) };
        assert!(IdentityRecord::resolve("3", "T", supplied, &no_side).is_err());

        let no_unum = GameState { unum: None, ..first_state(3) };
        assert!(IdentityRecord::resolve("0", "T", supplied, &no_unum).is_err());

        assert!(IdentityRecord::resolve("0", "T", supplied, &first_state(12)).is_err());
        assert!(IdentityRecord::resolve("goalie", "T", supplied, &first_state(1)).is_err());
    }
}
