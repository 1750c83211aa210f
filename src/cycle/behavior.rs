//! Per-agent context and the decision step run once per cycle.

use crate::connection::IdentityRecord;
use crate::protocol::{GameState, PlayMode};

/// Cycles a look-around sweep holds one direction.
const LOOK_CYCLES: u32 = 100;
/// Head yaw speed of a look-around sweep.
const LOOK_SPEED: f64 = 1.5;

/// What the current cycle's server message says.
#[derive(Debug, Clone)]
pub struct Perception<'a> {
    pub message: &'a str,
    pub game_state: Option<GameState>,
}

impl<'a> Perception<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message, game_state: GameState::from_message(message) }
    }
}

/// Steps after a goal until the robot is back at its start pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterGoal {
    #[default]
    StopMotion,
    Beam,
    Finished,
}

/// State that lives across cycles, whichever behavior decides.
///
/// Owned by the caller of the scheduler and handed to every decision by
/// `&mut`; behaviors keep nothing of their own that other roles need.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub identity: IdentityRecord,
    /// Cycles completed since the loop started.
    pub cycle: u64,
    /// Last play mode the server reported.
    pub play_mode: Option<PlayMode>,
    pub play_time: Option<f64>,
    pub robot_is_walking: bool,
    pub counter: u32,
    pub after_goal: AfterGoal,
}

impl AgentContext {
    pub fn new(identity: IdentityRecord) -> Self {
        Self {
            identity,
            cycle: 0,
            play_mode: None,
            play_time: None,
            robot_is_walking: false,
            counter: 0,
            after_goal: AfterGoal::default(),
        }
    }

    /// Fold this cycle's game state into the context. Fields missing from
    /// the message keep their last value.
    pub fn observe(&mut self, perception: &Perception<'_>) {
        if let Some(gs) = &perception.game_state {
            if gs.play_mode.is_some() {
                self.play_mode = gs.play_mode;
            }
            if gs.play_time.is_some() {
                self.play_time = gs.play_time;
            }
        }
    }

    /// One step of the after-goal sequence. Emits the beam exactly once per
    /// goal.
    pub fn prepare_kick_off(&mut self) -> Decision {
        match self.after_goal {
            AfterGoal::StopMotion => {
                self.robot_is_walking = false;
                self.after_goal = AfterGoal::Beam;
                Decision::idle()
            }
            AfterGoal::Beam => {
                self.after_goal = AfterGoal::Finished;
                Decision::beam()
            }
            AfterGoal::Finished => Decision::idle(),
        }
    }
}

/// Output of one decision: effector text for this cycle, and whether to
/// beam back to the start pose first. The scheduler appends `(syn)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub effectors: String,
    pub beam: bool,
}

impl Decision {
    /// Nothing but the sync marker.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn beam() -> Self {
        Self { effectors: String::new(), beam: true }
    }

    pub fn effectors(text: impl Into<String>) -> Self {
        Self { effectors: text.into(), beam: false }
    }
}

/// A decision policy, called exactly once per cycle. No I/O.
pub trait Behavior {
    fn decide(&mut self, context: &mut AgentContext, perception: &Perception<'_>) -> Decision;
}

/// Behaviors keyed by player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Goalie,
    Attacker,
    FieldPlayer,
}

impl Role {
    /// 1 keeps goal, 2 attacks, everyone else plays the field.
    pub fn for_slot(slot: u8) -> Self {
        match slot {
            1 => Role::Goalie,
            2 => Role::Attacker,
            _ => Role::FieldPlayer,
        }
    }

    fn look_around(context: &mut AgentContext, period: u32) -> Decision {
        let sweep = context.counter / period;
        context.counter = context.counter.wrapping_add(1);
        let speed = if sweep % 2 == 0 { LOOK_SPEED } else { -LOOK_SPEED };
        Decision::effectors(format!("(he1 {speed})"))
    }
}

impl Behavior for Role {
    fn decide(&mut self, context: &mut AgentContext, _perception: &Perception<'_>) -> Decision {
        match self {
            Role::Goalie => Decision::idle(),
            Role::Attacker => Role::look_around(context, LOOK_CYCLES / 2),
            Role::FieldPlayer => Role::look_around(context, LOOK_CYCLES),
        }
    }
}
