//! Host-side battle session: tick driver, event fan-out and stall watchdog.

use std::env;
use std::sync::Arc;

use combat_core::action::ActionChoice;
use combat_core::ai::AiConfig;
use combat_core::combat::VarianceMode;
use combat_core::config::BattleConfig;
use combat_core::engine::{BattleEngine, BattleOutcome, SubmitError};
use combat_core::env::{BattleRng, ElementMatrix, PcgRng};
use combat_core::events::BattleEvent;
use combat_core::state::{Combatant, Side};
use tracing::{debug, info, warn};

use crate::api::{ActionProvider, ActionRequest, Result, RuntimeError};
use crate::events::{Event, EventBus};

/// Runtime configuration shared by the session and its providers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Seed for the engine RNG.
    pub seed: u64,
    /// Ticks a battle may wait for player input before missing actions
    /// become stalls.
    pub stall_ticks: u32,
    /// Per-topic capacity of the event bus.
    pub event_capacity: usize,
    /// Variance mode of the enemy AI.
    pub ai_variance: VarianceMode,
    /// Hard stop for [`BattleSession::run`].
    pub max_ticks: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            stall_ticks: 3,
            event_capacity: 256,
            ai_variance: VarianceMode::Median,
            max_ticks: 100_000,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_SEED` - Engine RNG seed
    /// - `COMBAT_STALL_TICKS` - Idle ticks before missing input stalls (min 1)
    /// - `COMBAT_EVENT_CAPACITY` - Event bus capacity per topic (min 1)
    /// - `COMBAT_AI_VARIANCE` - `minimum`, `median`, `maximum` or `random`
    /// - `COMBAT_MAX_TICKS` - Tick limit for a full run
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.seed = seed;
        }
        if let Some(ticks) = read_env::<u32>("COMBAT_STALL_TICKS") {
            config.stall_ticks = ticks.max(1);
        }
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }
        if let Some(variance) = read_env::<VarianceMode>("COMBAT_AI_VARIANCE") {
            config.ai_variance = variance;
        }
        if let Some(ticks) = read_env::<u64>("COMBAT_MAX_TICKS") {
            config.max_ticks = ticks;
        }

        config
    }

    pub fn ai_config(&self) -> AiConfig {
        AiConfig::default().with_variance(self.ai_variance)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Drives one battle engine from a host loop.
///
/// Each [`tick`](Self::tick) advances the engine by one step and publishes
/// the resulting notifications on the [`EventBus`]. While the engine waits
/// for player input, a watchdog counts idle ticks and force-advances once
/// the configured limit is reached.
pub struct BattleSession<R: BattleRng = PcgRng> {
    engine: BattleEngine<R>,
    bus: EventBus,
    stall_ticks: u32,
    idle_ticks: u32,
    max_ticks: u64,
    ticks: u64,
    published: u64,
}

impl BattleSession<PcgRng> {
    /// Builds a seeded engine for `combatants` and wraps it in a session.
    pub fn create(
        combatants: Vec<Combatant>,
        elements: Arc<ElementMatrix>,
        battle: BattleConfig,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let engine = BattleEngine::new(
            combatants,
            elements,
            battle,
            PcgRng::seed_from_u64(config.seed),
        )?
        .with_ai(config.ai_config());
        Ok(Self::new(engine, config))
    }
}

impl<R: BattleRng> BattleSession<R> {
    pub fn new(engine: BattleEngine<R>, config: &RuntimeConfig) -> Self {
        Self {
            engine,
            bus: EventBus::with_capacity(config.event_capacity),
            stall_ticks: config.stall_ticks.max(1),
            idle_ticks: 0,
            max_ticks: config.max_ticks,
            ticks: 0,
            published: 0,
        }
    }

    pub fn engine(&self) -> &BattleEngine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut BattleEngine<R> {
        &mut self.engine
    }

    /// The bus this session publishes on. Clones share the same channels.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn submit(&mut self, slot: u8, choice: ActionChoice) -> std::result::Result<(), SubmitError> {
        self.engine.submit_player_action(slot, choice)
    }

    /// Advances the engine by one step and publishes its events.
    pub fn tick(&mut self) -> Vec<BattleEvent> {
        self.ticks += 1;
        let waiting = !self.engine.awaiting_input().is_empty();
        let events = if waiting {
            self.idle_ticks += 1;
            if self.idle_ticks >= self.stall_ticks {
                warn!(
                    idle_ticks = self.idle_ticks,
                    round = self.engine.round(),
                    "player input timed out; forcing the round"
                );
                self.idle_ticks = 0;
                self.engine.force_advance()
            } else {
                self.engine.advance()
            }
        } else {
            self.idle_ticks = 0;
            self.engine.advance()
        };

        let round = self.engine.round();
        for event in &events {
            self.bus
                .publish(Event::new(self.published, round, event.clone()));
            self.published += 1;
        }
        events
    }

    /// Runs the battle to completion, asking `provider` for every player
    /// action.
    pub async fn run<P>(&mut self, provider: &mut P) -> Result<BattleOutcome>
    where
        P: ActionProvider + ?Sized,
    {
        loop {
            if let Some(outcome) = self.engine.outcome() {
                info!(%outcome, ticks = self.ticks, "session finished");
                return Ok(outcome);
            }
            if self.ticks >= self.max_ticks {
                return Err(RuntimeError::TickLimit { ticks: self.ticks });
            }

            for slot in self.engine.awaiting_input() {
                let Some(actor) = self.engine.state().at_slot(Side::Player, slot).map(|c| c.id)
                else {
                    continue;
                };
                let request = ActionRequest {
                    slot,
                    actor,
                    round: self.engine.round(),
                    state: self.engine.state().clone(),
                };
                match provider.provide_action(&request).await {
                    Ok(choice) => {
                        if let Err(err) = self.engine.submit_player_action(slot, choice) {
                            debug!(slot, error = %err, "provider action rejected");
                        }
                    }
                    Err(err) => warn!(slot, error = %err, "no action from provider"),
                }
            }
            self.tick();
            tokio::task::yield_now().await;
        }
    }
}
