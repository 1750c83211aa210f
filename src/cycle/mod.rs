//! Cycle-locked agent loop.
//!
//! In sync mode the simulator advances one 20 ms cycle per agent round
//! trip, so the agent's time base *is* the message exchange. Every
//! iteration must do exactly:
//!
//! 1. one blocking receive (this is what advances simulated time),
//! 2. one local decision step, with no I/O,
//! 3. one send, ending in the `(syn)` marker.
//!
//! Receiving or sending twice in a cycle, or skipping either, shifts the
//! agent against the simulator clock. [`CycleScheduler`] runs this loop for
//! a [`CycleBudget`]; callers with their own loop use [`run_cycle`] for a
//! single iteration.
//!
//! State that must survive between cycles lives in one [`AgentContext`],
//! passed by `&mut` to whichever [`Behavior`] decides. The behavior is
//! picked once per session from the player slot via [`Role::for_slot`].

pub mod behavior;
pub mod scheduler;

pub use behavior::{AfterGoal, AgentContext, Behavior, Decision, Perception, Role};
pub use scheduler::{CycleBudget, CycleScheduler, RunSummary, run_cycle};
