//! AI-driven provider that plays a player slot with the enemy evaluator.

use std::sync::Arc;

use async_trait::async_trait;
use combat_core::action::ActionChoice;
use combat_core::ai::{self, AiConfig};
use combat_core::combat::DamageContext;
use combat_core::config::CombatRules;
use combat_core::env::{ElementMatrix, PcgRng};
use tracing::debug;

use crate::api::{ActionProvider, ActionRequest, Result};

/// Picks player actions with the same scoring the engine uses for enemies.
///
/// The provider owns its RNG so its choices never disturb the engine's
/// random sequence.
pub struct AutopilotProvider {
    elements: Arc<ElementMatrix>,
    rules: CombatRules,
    config: AiConfig,
    rng: PcgRng,
}

impl AutopilotProvider {
    pub fn new(elements: Arc<ElementMatrix>, rules: CombatRules, seed: u64) -> Self {
        Self {
            elements,
            rules,
            config: AiConfig::default(),
            rng: PcgRng::seed_from_u64(seed),
        }
    }

    pub fn with_config(mut self, config: AiConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl ActionProvider for AutopilotProvider {
    async fn provide_action(&mut self, request: &ActionRequest) -> Result<ActionChoice> {
        let ctx = DamageContext {
            view: request.state.view(),
            elements: &self.elements,
            rules: &self.rules,
        };
        let choice = ai::choose_action(ctx, &self.config, request.actor, &mut self.rng);
        debug!(slot = request.slot, actor = %request.actor, ?choice, "autopilot chose");
        Ok(choice)
    }
}
