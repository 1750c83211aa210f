//! Minimal reader for the game state perceptor.
//!
//! A server message is a flat run of parenthesized perceptor expressions.
//! Only the `(GS ...)` expression is looked at here, e.g.
//! `(GS (unum 3) (team left) (t 0.00) (pm BeforeKickOff))`. The player
//! number and team side are only present in the first message after init.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of the field a team defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    Left,
    Right,
}

impl FromStr for TeamSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TeamSide::Left),
            "right" => Ok(TeamSide::Right),
            other => Err(format!("unknown team side '{other}'")),
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeamSide::Left => "left",
            TeamSide::Right => "right",
        })
    }
}

macro_rules! play_modes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Play modes of the soccer simulation, named as on the wire.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[allow(non_camel_case_types)]
        pub enum PlayMode {
            $($variant),+
        }

        impl PlayMode {
            /// Wire name, as used in `(pm ...)` and `(playMode ...)`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(PlayMode::$variant => $name),+
                }
            }
        }

        impl FromStr for PlayMode {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(PlayMode::$variant),)+
                    other => Err(format!("unknown play mode '{other}'")),
                }
            }
        }
    };
}

play_modes! {
    BeforeKickOff => "BeforeKickOff",
    KickOff_Left => "KickOff_Left",
    KickOff_Right => "KickOff_Right",
    PlayOn => "PlayOn",
    KickIn_Left => "KickIn_Left",
    KickIn_Right => "KickIn_Right",
    CornerKick_Left => "corner_kick_left",
    CornerKick_Right => "corner_kick_right",
    GoalKick_Left => "goal_kick_left",
    GoalKick_Right => "goal_kick_right",
    Offside_Left => "offside_left",
    Offside_Right => "offside_right",
    GameOver => "GameOver",
    Goal_Left => "Goal_Left",
    Goal_Right => "Goal_Right",
    FreeKick_Left => "free_kick_left",
    FreeKick_Right => "free_kick_right",
    DirectFreeKick_Left => "direct_free_kick_left",
    DirectFreeKick_Right => "direct_free_kick_right",
    Pass_Left => "pass_left",
    Pass_Right => "pass_right",
}

impl PlayMode {
    pub fn is_goal(self) -> bool {
        matches!(self, PlayMode::Goal_Left | PlayMode::Goal_Right)
    }

    pub fn is_kick_off(self) -> bool {
        matches!(self, PlayMode::KickOff_Left | PlayMode::KickOff_Right)
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of one `(GS ...)` expression. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub unum: Option<u8>,
    pub team_side: Option<TeamSide>,
    pub play_time: Option<f64>,
    pub play_mode: Option<PlayMode>,
}

impl GameState {
    /// Extracts the game state from a raw server message.
    ///
    /// Returns `None` when the message has no `(GS ...)` expression.
    /// Unparseable field values are left out rather than failing.
    pub fn from_message(message: &str) -> Option<Self> {
        let body = gs_body(message)?;
        let mut state = GameState::default();

        for (key, value) in fields(body) {
            match key {
                "unum" => state.unum = value.parse().ok(),
                "team" => state.team_side = value.parse().ok(),
                "t" => state.play_time = value.parse().ok(),
                "pm" => state.play_mode = value.parse().ok(),
                _ => {}
            }
        }

        Some(state)
    }
}

/// Text between `(GS` and its matching close paren.
fn gs_body(message: &str) -> Option<&str> {
    let start = message.find("(GS")? + "(GS".len();
    let mut depth = 1usize;
    for (offset, ch) in message[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&message[start..start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// `(key value)` pairs directly inside a GS body.
fn fields(body: &str) -> impl Iterator<Item = (&str, &str)> {
    body.split('(').filter_map(|chunk| {
        let inner = chunk.split(')').next()?;
        let mut tokens = inner.split_whitespace();
        let key = tokens.next()?;
        let value = tokens.next()?;
        Some((key, value))
    })
}
