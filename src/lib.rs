//! Agent-side network and timing core for SimSpark soccer clients.
//!
//! Simlink talks to rcssserver3d in sync mode, where the simulator only
//! advances when every agent has answered. It provides:
//!
//! - **Framing**: length-prefixed messages over TCP, shared by both ports
//! - **Handshake**: scene, init, identity resolution, initial beam, settle
//! - **Trainer commands**: ball and player placement through the monitor port
//! - **Keyframes**: looping joint-pose buffers and their text file format
//! - **Cycle loop**: one receive, one decision, one send per simulator cycle
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use simlink::{AgentContext, CycleBudget, CycleScheduler, Role, Simlink};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> simlink::Result<()> {
//!     let mut agent = Simlink::connect_agent().await?;
//!     let identity = agent.init_robot("0", "Newbies", -1.0, 0.0, 0.0).await?;
//!
//!     let mut role = Role::for_slot(identity.player_id);
//!     let mut context = AgentContext::new(identity);
//!     CycleScheduler::new(CycleBudget::from_secs(10))
//!         .run(&mut agent, &mut role, &mut context)
//!         .await?;
//!     Ok(())
//! }
//! ```

mod error;

pub mod beam;
pub mod config;
pub mod connection;
pub mod cycle;
pub mod keyframe;
pub mod protocol;

pub use error::*;

pub use beam::{BeamPose, beam_pose};
pub use config::ConnectionConfig;
pub use connection::{AgentConnection, IdentityRecord, TrainerCommands, TrainerConnection};
pub use cycle::{AgentContext, Behavior, CycleBudget, CycleScheduler, Decision, Perception, Role, RunSummary};
pub use keyframe::{Joint, Keyframe, KeyframeSequence, NextFrame};
pub use protocol::{GameState, PlayMode, Team, TeamSide};

/// Entry point for simulator connections on the default endpoints.
///
/// Both connections are independent sockets. Use them from one task, one
/// after the other; neither is meant to be shared across tasks.
///
/// ```rust,no_run
/// use simlink::{Simlink, Team};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> simlink::Result<()> {
/// let mut trainer = Simlink::connect_trainer().await?;
/// trainer.kick_off(Team::Left).await?;
/// # Ok(())
/// # }
/// ```
pub struct Simlink;

impl Simlink {
    /// Connect to the agent port on the default host.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Establishment`] if the simulator is not
    /// listening. The failure is logged with a hint before returning.
    pub async fn connect_agent() -> Result<AgentConnection> {
        AgentConnection::connect_with(&ConnectionConfig::agent()).await
    }

    /// Connect to the monitor port for trainer commands.
    pub async fn connect_trainer() -> Result<TrainerCommands> {
        TrainerCommands::connect().await
    }
}
