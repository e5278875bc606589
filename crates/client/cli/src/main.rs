//! Headless battle client: loads content, builds the demo roster and lets
//! the autopilot play both sides to an outcome.
mod battle_log;
mod config;
mod roster;

use std::collections::HashMap;

use anyhow::Result;
use combat_content::ContentFactory;
use combat_core::config::BattleConfig;
use combat_runtime::{AutopilotProvider, BattleSession, Event, RuntimeConfig, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use battle_log::BattleLog;
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = CliConfig::from_env();
    let runtime = RuntimeConfig::from_env();

    let factory = match &cli.content_dir {
        Some(dir) => ContentFactory::new(dir.clone()),
        None => ContentFactory::embedded(),
    };
    let content = factory.load()?;
    for diagnostic in &content.diagnostics {
        warn!(%diagnostic, "content entry skipped");
    }

    let roster = roster::demo_roster(&content.catalogs)?;
    let log = BattleLog::new(&roster);

    let mut session = BattleSession::create(
        roster,
        content.catalogs.elements.clone(),
        BattleConfig::with_rules(content.rules),
        &runtime,
    )?;
    let collectors = spawn_collectors(session.bus().subscribe_multiple(&Topic::ALL));

    let mut autopilot = AutopilotProvider::new(
        content.catalogs.elements.clone(),
        content.rules,
        runtime.seed.wrapping_add(1),
    )
    .with_config(runtime.ai_config());
    let outcome = session.run(&mut autopilot).await?;

    let rounds = session.engine().round();
    let digest = hex::encode(session.engine().digest()?);
    drop(session);

    if cli.verbose {
        let mut events = Vec::new();
        for handle in collectors {
            events.extend(handle.await?);
        }
        events.sort_by_key(|e| e.seq);
        if cli.json {
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        } else {
            for line in events.iter().filter_map(|e| log.line(e)) {
                println!("{line}");
            }
        }
    }

    info!(%outcome, rounds, "battle finished");
    println!("outcome: {outcome}");
    println!("rounds:  {rounds}");
    println!("digest:  {digest}");
    Ok(())
}

/// Drains each topic until the session's bus closes.
fn spawn_collectors(
    receivers: HashMap<Topic, broadcast::Receiver<Event>>,
) -> Vec<JoinHandle<Vec<Event>>> {
    receivers
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                let mut events = Vec::new();
                loop {
                    match rx.recv().await {
                        Ok(event) => events.push(event),
                        Err(RecvError::Lagged(missed)) => {
                            warn!(?topic, missed, "battle log lagged behind");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                events
            })
        })
        .collect()
}

/// Logs go to stderr so the battle log on stdout stays readable.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
