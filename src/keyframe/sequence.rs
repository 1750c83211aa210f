//! Keyframes and the looping sequence buffer.

use serde::{Deserialize, Serialize};

use super::joints::{JOINT_COUNT, Joint};

/// One timed pose: how long the transition into it takes, and the target
/// angle of every joint in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    transition_time: i32,
    angles: [f64; JOINT_COUNT],
}

impl Keyframe {
    /// Builds a keyframe from angles in [`Joint`] order.
    ///
    /// Missing trailing angles are 0.0; angles beyond [`JOINT_COUNT`] are
    /// ignored.
    pub fn new(transition_time: i32, angles: impl IntoIterator<Item = f64>) -> Self {
        let mut buf = [0.0; JOINT_COUNT];
        for (slot, angle) in buf.iter_mut().zip(angles) {
            *slot = angle;
        }
        Self { transition_time, angles: buf }
    }

    pub fn transition_time(&self) -> i32 {
        self.transition_time
    }

    pub fn angle(&self, joint: Joint) -> f64 {
        self.angles[joint.index()]
    }

    pub fn angles(&self) -> &[f64; JOINT_COUNT] {
        &self.angles
    }
}

/// Result of [`KeyframeSequence::next_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextFrame<'a> {
    Frame(&'a Keyframe),
    /// A full pass finished; the next call starts again at the first frame.
    Sentinel,
}

impl<'a> NextFrame<'a> {
    pub fn frame(self) -> Option<&'a Keyframe> {
        match self {
            NextFrame::Frame(frame) => Some(frame),
            NextFrame::Sentinel => None,
        }
    }
}

/// Where the read cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    AtStart,
    MidSequence,
    /// The next call yields the sentinel.
    AtEnd,
}

/// Ordered keyframes read one per call, looping forever.
///
/// After the last frame one call yields [`NextFrame::Sentinel`], so a caller
/// stepping once per cycle sees the end of each lap exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeSequence {
    frames: Vec<Keyframe>,
    cursor: usize,
}

impl KeyframeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame at the end. `None` is ignored.
    pub fn push(&mut self, frame: impl Into<Option<Keyframe>>) {
        if let Some(frame) = frame.into() {
            self.frames.push(frame);
        }
    }

    /// Frame at the cursor, advancing it; the sentinel once per lap.
    pub fn next_frame(&mut self) -> NextFrame<'_> {
        if self.cursor == self.frames.len() {
            self.cursor = 0;
            return NextFrame::Sentinel;
        }
        let frame = &self.frames[self.cursor];
        self.cursor += 1;
        NextFrame::Frame(frame)
    }

    pub fn state(&self) -> SequenceState {
        if self.cursor == self.frames.len() {
            SequenceState::AtEnd
        } else if self.cursor == 0 {
            SequenceState::AtStart
        } else {
            SequenceState::MidSequence
        }
    }

    /// Move the cursor back to the first frame.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<Keyframe> for KeyframeSequence {
    fn from_iter<I: IntoIterator<Item = Keyframe>>(iter: I) -> Self {
        Self { frames: iter.into_iter().collect(), cursor: 0 }
    }
}
