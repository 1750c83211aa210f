//! The synchronized agent loop.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::behavior::{AgentContext, Behavior, Decision, Perception};
use crate::Result;
use crate::config::{CYCLE_DURATION, CYCLES_PER_SECOND};
use crate::connection::AgentConnection;
use crate::protocol::{PlayMode, SYNC, commands};

/// How many cycles a run lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleBudget {
    cycles: u64,
}

impl CycleBudget {
    pub fn cycles(cycles: u64) -> Self {
        Self { cycles }
    }

    /// Cycles covering `duration` at the simulator's 20 ms cycle.
    pub fn from_duration(duration: Duration) -> Self {
        Self { cycles: (duration.as_millis() / CYCLE_DURATION.as_millis()) as u64 }
    }

    /// Saturates at `u64::MAX` cycles.
    pub fn from_secs(secs: u64) -> Self {
        Self { cycles: secs.saturating_mul(CYCLES_PER_SECOND) }
    }

    pub fn count(&self) -> u64 {
        self.cycles
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub cancelled: bool,
}

/// Drives receive, decide, send once per simulator cycle.
///
/// Cancellation is checked between cycles only; a cycle that has started
/// always completes its send.
pub struct CycleScheduler {
    budget: CycleBudget,
    cancel: CancellationToken,
}

impl CycleScheduler {
    pub fn new(budget: CycleBudget) -> Self {
        Self { budget, cancel: CancellationToken::new() }
    }

    pub fn with_cancellation(budget: CycleBudget, cancel: CancellationToken) -> Self {
        Self { budget, cancel }
    }

    /// Token that stops the loop before its next cycle.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn budget(&self) -> CycleBudget {
        self.budget
    }

    /// Run until the budget is spent or the token is cancelled.
    ///
    /// Any connection error ends the run and is returned as is.
    pub async fn run<S, B>(
        &self,
        connection: &mut AgentConnection<S>,
        behavior: &mut B,
        context: &mut AgentContext,
    ) -> Result<RunSummary>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        B: Behavior + ?Sized,
    {
        info!("Running {} cycles as player {}", self.budget.count(), context.identity.player_id);
        let mut completed = 0;

        while completed < self.budget.count() {
            if self.cancel.is_cancelled() {
                info!("Cycle loop cancelled after {} cycles", completed);
                return Ok(RunSummary { cycles: completed, cancelled: true });
            }
            run_cycle(connection, behavior, context).await?;
            completed += 1;
        }

        debug!("Cycle budget of {} spent", completed);
        Ok(RunSummary { cycles: completed, cancelled: false })
    }
}

/// Exactly one receive, one decision and one send.
pub async fn run_cycle<S, B>(
    connection: &mut AgentConnection<S>,
    behavior: &mut B,
    context: &mut AgentContext,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    B: Behavior + ?Sized,
{
    let message = connection.get_server_message().await?;
    let perception = Perception::new(&message);
    context.observe(&perception);

    let decision = decide(behavior, context, &perception);

    let mut outgoing = String::new();
    if decision.beam {
        outgoing.push_str(&commands::beam(&context.identity.beam));
    }
    outgoing.push_str(&decision.effectors);
    outgoing.push_str(SYNC);
    trace!("Cycle {}: {}", context.cycle, outgoing);

    connection.send_agent_message(&outgoing).await?;
    context.cycle += 1;
    Ok(())
}

/// Play-mode gate in front of the behavior: hold still before kick-off,
/// walk back to the start pose after a goal, let the behavior decide
/// otherwise.
fn decide<B>(behavior: &mut B, context: &mut AgentContext, perception: &Perception<'_>) -> Decision
where
    B: Behavior + ?Sized,
{
    match context.play_mode {
        Some(PlayMode::BeforeKickOff) => Decision::idle(),
        Some(mode) if mode.is_kick_off() => {
            context.after_goal = Default::default();
            Decision::idle()
        }
        Some(mode) if mode.is_goal() => context.prepare_kick_off(),
        _ => behavior.decide(context, perception),
    }
}
