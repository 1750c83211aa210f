//! Keyframe motions: timed joint poses, the looping buffer that replays
//! them once per cycle, and the text format they are stored in.
//!
//! ```rust
//! use simlink::keyframe::{self, NextFrame};
//!
//! let mut wave = keyframe::parse("// wave\n200 0 0 -90\n200 0 0 -45\n");
//! assert!(matches!(wave.next_frame(), NextFrame::Frame(_)));
//! assert!(matches!(wave.next_frame(), NextFrame::Frame(_)));
//! assert_eq!(wave.next_frame(), NextFrame::Sentinel);
//! ```

pub mod file;
pub mod joints;
pub mod sequence;

pub use file::{load, load_from_path, parse, render, store, store_to_path};
pub use joints::{JOINT_COUNT, Joint};
pub use sequence::{Keyframe, KeyframeSequence, NextFrame, SequenceState};
