//! Default initial poses for server-assigned player numbers.
//!
//! The x coordinate is negative for every slot because players start in
//! their own half. Rotation is in degrees, counterclockwise from the x axis.

use serde::{Deserialize, Serialize};

/// Position and heading a robot is beamed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamPose {
    pub x: f64,
    pub y: f64,
    pub rot: f64,
}

impl BeamPose {
    pub const fn new(x: f64, y: f64, rot: f64) -> Self {
        Self { x, y, rot }
    }
}

/// Number of player slots per team.
pub const PLAYER_SLOTS: u8 = 11;

const BEAM_POSES: [BeamPose; PLAYER_SLOTS as usize] = [
    BeamPose::new(-4.5, 0.0, 0.0), // goalie
    BeamPose::new(-0.5, 0.0, 0.0),
    BeamPose::new(-1.0, 2.0, 0.0),
    BeamPose::new(-1.0, -2.0, 0.0),
    BeamPose::new(-3.0, 0.0, 0.0),
    BeamPose::new(-3.0, -1.5, 0.0),
    BeamPose::new(-3.0, 1.5, 0.0),
    BeamPose::new(-4.0, -2.0, 0.0),
    BeamPose::new(-4.0, 0.0, 0.0),
    BeamPose::new(-4.0, 2.0, 0.0),
    BeamPose::new(-5.0, 0.0, 0.0),
];

/// Default pose for player `slot` (1..=11), `None` outside that range.
pub fn beam_pose(slot: u8) -> Option<BeamPose> {
    let index = usize::from(slot).checked_sub(1)?;
    BEAM_POSES.get(index).copied()
}
