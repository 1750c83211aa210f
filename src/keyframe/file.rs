//! Keyframe file format.
//!
//! Plain text, one keyframe per line: an integer transition time followed by
//! space separated angles in [`Joint`](super::Joint) order. Blank lines and
//! lines starting with `//` are skipped.
//!
//! ```text
//! // stand up
//! 500 0 0 -90 0 0 0 0 0 25 -50 25 0 0 0 25 -50 25 0 -90 0 0 0
//! 300 0 0
//! ```
//!
//! Loading is lenient: the first line with a malformed number ends the load
//! with a warning, and the frames read before it are kept.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::joints::JOINT_COUNT;
use super::sequence::{Keyframe, KeyframeSequence};
use crate::config::KEYFRAME_DIR;
use crate::{AgentError, Result};

const COMMENT: &str = "//";

/// Load `keyframes/<name>` relative to the working directory.
pub fn load(name: &str) -> Result<KeyframeSequence> {
    load_from_path(Path::new(KEYFRAME_DIR).join(name))
}

/// Load a keyframe file from an explicit path.
///
/// Only an unreadable file is an error; malformed lines are handled as
/// described in the module docs.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<KeyframeSequence> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| AgentError::file_error(path.to_path_buf(), e))?;
    let sequence = parse(&text);
    debug!("Loaded {} keyframes from {}", sequence.len(), path.display());
    Ok(sequence)
}

/// Parse keyframe text.
pub fn parse(text: &str) -> KeyframeSequence {
    let mut sequence = KeyframeSequence::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        match parse_line(line) {
            Ok(frame) => sequence.push(frame),
            Err(details) => {
                let err = AgentError::Parse { context: format!("keyframe line {}", number + 1), details };
                warn!("{}; keeping the {} frames read so far", err, sequence.len());
                break;
            }
        }
    }

    sequence
}

fn parse_line(line: &str) -> std::result::Result<Keyframe, String> {
    let mut tokens = line.split_whitespace();

    let time_token = tokens.next().unwrap_or_default();
    let transition_time = time_token
        .parse::<i32>()
        .map_err(|e| format!("transition time '{time_token}': {e}"))?;

    let mut angles = Vec::with_capacity(JOINT_COUNT);
    for token in tokens.take(JOINT_COUNT) {
        let angle = token.parse::<f64>().map_err(|e| format!("angle '{token}': {e}"))?;
        angles.push(angle);
    }

    Ok(Keyframe::new(transition_time, angles))
}

/// Render a sequence in file format, every frame with all joint angles.
pub fn render(sequence: &KeyframeSequence) -> String {
    let mut out = String::new();
    for frame in sequence.frames() {
        out.push_str(&frame.transition_time().to_string());
        for angle in frame.angles() {
            out.push(' ');
            out.push_str(&angle.to_string());
        }
        out.push('\n');
    }
    out
}

/// Write `keyframes/<name>`. Offline tooling only; the read cursor is not
/// touched.
pub fn store(sequence: &KeyframeSequence, name: &str) -> Result<PathBuf> {
    let path = Path::new(KEYFRAME_DIR).join(name);
    store_to_path(sequence, &path)?;
    Ok(path)
}

/// Write a sequence to an explicit path.
pub fn store_to_path<P: AsRef<Path>>(sequence: &KeyframeSequence, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render(sequence)).map_err(|e| AgentError::file_error(path.to_path_buf(), e))
}
