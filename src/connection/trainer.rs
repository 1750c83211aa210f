//! Send-only connection to the monitor port, for trainer tooling.
//!
//! A trainer can place the ball and players, drop the ball and change the
//! play mode. Commands take effect one cycle later than they are sent, like
//! effector commands. A failed send is logged and reported as a degraded
//! error; it never brings down the caller.

use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tracing::warn;

use crate::config::ConnectionConfig;
use crate::protocol::commands::{Team, trainer};
use crate::protocol::{PlayMode, framing};
use crate::{AgentError, Result};

/// Ball height when resting on the ground.
pub const BALL_GROUND_Z: f32 = 0.042;

/// Torso height of an upright robot standing on the ground.
pub const ROBOT_GROUND_Z: f32 = 0.375;

/// Framed, send-only connection on the monitor port.
pub struct TrainerConnection<S = TcpStream> {
    stream: S,
    endpoint: String,
}

impl TrainerConnection<TcpStream> {
    /// Connect to the monitor port at `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let config = ConnectionConfig { host: host.to_string(), port, ..ConnectionConfig::trainer() };
        let endpoint = config.endpoint();
        let stream = super::open_stream(&endpoint).await?;
        Ok(Self { stream, endpoint })
    }
}

impl<S> TrainerConnection<S>
where
    S: AsyncWrite + Unpin,
{
    /// Wrap an already open stream.
    pub fn from_stream(stream: S, endpoint: impl Into<String>) -> Self {
        Self { stream, endpoint: endpoint.into() }
    }

    /// Frame and send a trainer command. The content is not validated.
    ///
    /// On failure the command is dropped and a [`AgentError::TrainerSend`]
    /// (severity degraded) is returned.
    pub async fn send_trainer_message(&mut self, text: &str) -> Result<()> {
        framing::write_frame(&mut self.stream, text).await.map_err(|e| {
            warn!("Trainer command {} to {} dropped: {}", text, self.endpoint, e);
            AgentError::trainer_send_failed(e)
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

/// What a referee can do through the monitor.
pub struct TrainerCommands<S = TcpStream> {
    connection: TrainerConnection<S>,
}

impl TrainerCommands<TcpStream> {
    /// Connect to the default monitor port.
    pub async fn connect() -> Result<Self> {
        let config = ConnectionConfig::trainer();
        Ok(Self::new(TrainerConnection::connect(&config.host, config.port).await?))
    }
}

impl<S> TrainerCommands<S>
where
    S: AsyncWrite + Unpin,
{
    pub fn new(connection: TrainerConnection<S>) -> Self {
        Self { connection }
    }

    /// Set the ball to a position with a velocity.
    pub async fn beam_ball(&mut self, x: f32, y: f32, z: f32, vx: f32, vy: f32, vz: f32) -> Result<()> {
        self.connection.send_trainer_message(&trainer::ball([x, y, z], [vx, vy, vz])).await
    }

    /// Put the ball at rest on the ground.
    pub async fn beam_ball_on_ground(&mut self, x: f32, y: f32) -> Result<()> {
        self.beam_ball(x, y, BALL_GROUND_Z, 0.0, 0.0, 0.0).await
    }

    /// Drop the ball at its position and move players away by the free kick
    /// radius; sets the play mode to play-on.
    pub async fn drop_ball(&mut self) -> Result<()> {
        self.connection.send_trainer_message(&trainer::drop_ball()).await
    }

    pub async fn kick_off(&mut self, team: Team) -> Result<()> {
        self.connection.send_trainer_message(&trainer::kick_off(team)).await
    }

    /// Kick off without picking a side; the server chooses.
    pub async fn kick_off_any(&mut self) -> Result<()> {
        self.kick_off(Team::DontCare).await
    }

    /// Move a player's torso upright to a position. Ongoing motions continue.
    pub async fn move_player(&mut self, team: Team, unum: u8, x: f32, y: f32, z: f32) -> Result<()> {
        self.connection.send_trainer_message(&trainer::agent_pos(team, unum, [x, y, z])).await
    }

    /// Move a player and set its heading, `rot` in degrees.
    pub async fn move_rotate_player(
        &mut self,
        team: Team,
        unum: u8,
        x: f32,
        y: f32,
        z: f32,
        rot: f32,
    ) -> Result<()> {
        self.connection.send_trainer_message(&trainer::agent_move(team, unum, [x, y, z], rot)).await
    }

    pub async fn set_play_mode(&mut self, mode: PlayMode) -> Result<()> {
        self.connection.send_trainer_message(&trainer::play_mode(mode)).await
    }

    pub fn connection(&self) -> &TrainerConnection<S> {
        &self.connection
    }

    pub fn into_inner(self) -> TrainerConnection<S> {
        self.connection
    }
}
