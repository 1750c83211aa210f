//! SimSpark wire protocol: framing, command text and the game state fields
//! the connection layer needs.

pub mod commands;
pub mod framing;
pub mod game_state;

pub use commands::{SYNC, Team};
pub use framing::{encode, read_frame, write_frame};
pub use game_state::{GameState, PlayMode, TeamSide};
