//! Command text sent to the simulator.
//!
//! The grammar belongs to rcssserver3d; these helpers only assemble the
//! handful of expressions the agent and trainer issue themselves.

use std::fmt;

use super::game_state::PlayMode;
use crate::beam::BeamPose;

/// Sync marker required at the end of every agent message in sync mode.
pub const SYNC: &str = "(syn)";

/// Scene description loaded for every agent.
pub const NAO_SCENE: &str = "rsg/agent/nao/nao.rsg";

/// `(scene rsg/agent/nao/nao.rsg)(syn)`
pub fn scene() -> String {
    format!("(scene {NAO_SCENE}){SYNC}")
}

/// `(init (unum X)(teamname Y))(syn)`
pub fn init(player_id: &str, team: &str) -> String {
    format!("(init (unum {player_id})(teamname {team})){SYNC}")
}

/// `(beam X Y ROT)` without the sync marker.
pub fn beam(pose: &BeamPose) -> String {
    format!("(beam {} {} {})", pose.x, pose.y, pose.rot)
}

/// Team selector understood by trainer commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Left,
    Right,
    DontCare,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Team::Left => "Left",
            Team::Right => "Right",
            Team::DontCare => "None",
        })
    }
}

/// Builders for monitor-port commands.
pub mod trainer {
    use super::*;

    pub fn drop_ball() -> String {
        "(dropBall)".to_string()
    }

    pub fn kick_off(team: Team) -> String {
        format!("(kickOff {team})")
    }

    pub fn ball(pos: [f32; 3], vel: [f32; 3]) -> String {
        format!(
            "(ball (pos {} {} {}) (vel {} {} {}))",
            pos[0], pos[1], pos[2], vel[0], vel[1], vel[2]
        )
    }

    pub fn agent_pos(team: Team, unum: u8, pos: [f32; 3]) -> String {
        format!("(agent (unum {unum}) (team {team}) (pos {} {} {}))", pos[0], pos[1], pos[2])
    }

    pub fn agent_move(team: Team, unum: u8, pos: [f32; 3], rot: f32) -> String {
        format!(
            "(agent (unum {unum}) (team {team}) (move {} {} {} {rot}))",
            pos[0], pos[1], pos[2]
        )
    }

    pub fn play_mode(mode: PlayMode) -> String {
        format!("(playMode {mode})")
    }
}
