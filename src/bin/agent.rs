//! Runs one agent against a local rcssserver3d.
//!
//! Usage: `simlink-agent [player-id] [team-name] [seconds]`
//!
//! A player id of `0` lets the server pick the number. Ctrl-C stops the
//! loop at the next cycle boundary.

use anyhow::Context;
use simlink::config::{AGENT_PORT, DEFAULT_HOST};
use simlink::{AgentConnection, AgentContext, CycleBudget, CycleScheduler, Role};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_TEAM: &str = "Newbies";
const DEFAULT_SECONDS: u64 = 600;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("simlink=info")))
        .init();

    let mut args = std::env::args().skip(1);
    let player_id = args.next().unwrap_or_else(|| "0".to_string());
    let team = args.next().unwrap_or_else(|| DEFAULT_TEAM.to_string());
    let seconds = match args.next() {
        Some(value) => value.parse().with_context(|| format!("invalid run time '{value}'"))?,
        None => DEFAULT_SECONDS,
    };

    let mut agent = AgentConnection::connect(DEFAULT_HOST, AGENT_PORT).await?;
    let identity = agent.init_robot(&player_id, &team, -1.0, 0.0, 0.0).await?;
    info!("Player {} of {} on the {} side", identity.player_id, identity.team_name, identity.team_side);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, stopping after this cycle");
                on_signal.cancel();
            }
            Err(e) => error!("Cannot listen for Ctrl-C: {}", e),
        }
    });

    let mut role = Role::for_slot(identity.player_id);
    let mut context = AgentContext::new(identity);
    let scheduler = CycleScheduler::with_cancellation(CycleBudget::from_secs(seconds), cancel);

    match scheduler.run(&mut agent, &mut role, &mut context).await {
        Ok(summary) => {
            info!("Ran {} cycles{}", summary.cycles, if summary.cancelled { " (cancelled)" } else { "" });
            Ok(())
        }
        Err(e) => {
            error!("Agent stopped: {}", e);
            for hint in e.recovery_suggestions() {
                info!("  {}", hint);
            }
            Err(e.into())
        }
    }
}
