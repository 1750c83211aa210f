//! Hinge joints of the Nao model in keyframe order.

use serde::{Deserialize, Serialize};

/// Number of joints a keyframe sets.
pub const JOINT_COUNT: usize = 22;

/// Joints in the order angles appear in a keyframe line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    HeadYaw,
    HeadPitch,
    LShoulderPitch,
    LShoulderYaw,
    LArmRoll,
    LArmYaw,
    LHipYawPitch,
    LHipRoll,
    LHipPitch,
    LKneePitch,
    LFootPitch,
    LFootRoll,
    RHipYawPitch,
    RHipRoll,
    RHipPitch,
    RKneePitch,
    RFootPitch,
    RFootRoll,
    RShoulderPitch,
    RShoulderYaw,
    RArmRoll,
    RArmYaw,
}

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::HeadYaw,
        Joint::HeadPitch,
        Joint::LShoulderPitch,
        Joint::LShoulderYaw,
        Joint::LArmRoll,
        Joint::LArmYaw,
        Joint::LHipYawPitch,
        Joint::LHipRoll,
        Joint::LHipPitch,
        Joint::LKneePitch,
        Joint::LFootPitch,
        Joint::LFootRoll,
        Joint::RHipYawPitch,
        Joint::RHipRoll,
        Joint::RHipPitch,
        Joint::RKneePitch,
        Joint::RFootPitch,
        Joint::RFootRoll,
        Joint::RShoulderPitch,
        Joint::RShoulderYaw,
        Joint::RArmRoll,
        Joint::RArmYaw,
    ];

    /// Position of the joint's angle in a keyframe.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Effector name the simulator expects in motor commands.
    pub fn effector(self) -> &'static str {
        match self {
            Joint::HeadYaw => "he1",
            Joint::HeadPitch => "he2",
            Joint::LShoulderPitch => "lae1",
            Joint::LShoulderYaw => "lae2",
            Joint::LArmRoll => "lae3",
            Joint::LArmYaw => "lae4",
            Joint::LHipYawPitch => "lle1",
            Joint::LHipRoll => "lle2",
            Joint::LHipPitch => "lle3",
            Joint::LKneePitch => "lle4",
            Joint::LFootPitch => "lle5",
            Joint::LFootRoll => "lle6",
            Joint::RHipYawPitch => "rle1",
            Joint::RHipRoll => "rle2",
            Joint::RHipPitch => "rle3",
            Joint::RKneePitch => "rle4",
            Joint::RFootPitch => "rle5",
            Joint::RFootRoll => "rle6",
            Joint::RShoulderPitch => "rae1",
            Joint::RShoulderYaw => "rae2",
            Joint::RArmRoll => "rae3",
            Joint::RArmYaw => "rae4",
        }
    }
}
