//! Demo roster assembled from the loaded catalogs.
use std::sync::Arc;

use anyhow::{Context, Result};
use combat_core::abilities::AbilityInstance;
use combat_core::action::MoveDef;
use combat_core::env::Catalogs;
use combat_core::state::{Combatant, CombatantId, Side};
use combat_core::stats::CombatantStats;

struct Template {
    name: &'static str,
    side: Side,
    slot: Option<u8>,
    element: &'static str,
    stats: (u32, u32, u32),
    attributes: (i32, i32, i32, i32),
    moves: &'static [&'static str],
    abilities: &'static [&'static str],
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "Warden",
        side: Side::Player,
        slot: Some(0),
        element: "stone",
        stats: (30, 190, 30),
        attributes: (70, 30, 65, 45),
        moves: &["strike", "shield_breaker", "guard", "war_cry"],
        abilities: &["thick_hide", "vigilance"],
    },
    Template {
        name: "Pyra",
        side: Side::Player,
        slot: None,
        element: "fire",
        stats: (30, 150, 60),
        attributes: (35, 75, 40, 60),
        moves: &["ember", "inferno", "mend", "hex"],
        abilities: &["blaze", "clear_mind"],
    },
    Template {
        name: "Marsh Brute",
        side: Side::Enemy,
        slot: Some(0),
        element: "flora",
        stats: (30, 210, 20),
        attributes: (75, 20, 55, 35),
        moves: &["heavy_blow", "toxic_fang", "concussion"],
        abilities: &["brawn", "anger_point"],
    },
    Template {
        name: "Storm Wisp",
        side: Side::Enemy,
        slot: None,
        element: "storm",
        stats: (30, 140, 50),
        attributes: (30, 70, 35, 70),
        moves: &["thunderclap", "frost_lance", "blinding_flash"],
        abilities: &["quick_strike"],
    },
];

/// Builds the two-per-side demo roster. Player-side combatants are
/// player-controlled and get their actions from the session's provider.
pub fn demo_roster(catalogs: &Catalogs) -> Result<Vec<Combatant>> {
    TEMPLATES
        .iter()
        .zip(1u16..)
        .map(|(template, id)| build(catalogs, template, CombatantId(id)))
        .collect()
}

fn build(catalogs: &Catalogs, template: &Template, id: CombatantId) -> Result<Combatant> {
    let (level, max_hp, max_mana) = template.stats;
    let (strength, intelligence, tenacity, agility) = template.attributes;

    let mut combatant = Combatant::new(id, template.name, template.side)
        .with_stats(
            CombatantStats::new(level, max_hp, max_mana).with_attributes(
                strength,
                intelligence,
                tenacity,
                agility,
            ),
        )
        .with_element(template.element);
    if template.side == Side::Player {
        combatant = combatant.player_controlled();
    }
    if let Some(slot) = template.slot {
        combatant = combatant.at_slot(slot);
    }

    combatant.moves = template
        .moves
        .iter()
        .map(|key| lookup_move(catalogs, key))
        .collect::<Result<_>>()?;
    combatant.abilities = template
        .abilities
        .iter()
        .map(|key| {
            catalogs
                .abilities
                .get(key)
                .map(AbilityInstance::new)
                .with_context(|| format!("ability `{key}` is not in the catalog"))
        })
        .collect::<Result<_>>()?;

    Ok(combatant)
}

fn lookup_move(catalogs: &Catalogs, key: &str) -> Result<Arc<MoveDef>> {
    catalogs
        .moves
        .get(key)
        .with_context(|| format!("move `{key}` is not in the catalog"))
}

#[cfg(test)]
mod tests {
    use combat_content::ContentFactory;

    use super::*;

    #[test]
    fn embedded_content_covers_the_demo_roster() {
        let content = ContentFactory::embedded().load().expect("embedded content");
        let roster = demo_roster(&content.catalogs).expect("roster builds");
        assert_eq!(roster.len(), 4);
        assert!(roster.iter().any(|c| c.player_controlled && c.slot == Some(0)));
    }

    #[test]
    fn missing_moves_are_reported() {
        let err = demo_roster(&Catalogs::default()).expect_err("empty catalogs");
        assert!(err.to_string().contains("strike"));
    }
}
