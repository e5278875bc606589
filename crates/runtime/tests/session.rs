use std::sync::Arc;

use combat_content::ContentFactory;
use combat_core::action::{ActionChoice, MoveDef};
use combat_core::config::BattleConfig;
use combat_core::engine::{BattleOutcome, BattlePhase};
use combat_core::env::ElementMatrix;
use combat_core::events::BattleEvent;
use combat_core::state::{Combatant, CombatantId, Side};
use combat_core::stats::CombatantStats;
use combat_runtime::{
    AutopilotProvider, BattleSession, RuntimeConfig, RuntimeError, ScriptedActionProvider,
    StallActionProvider, Topic,
};
use tokio::sync::broadcast::error::TryRecvError;

const HERO: CombatantId = CombatantId(1);
const FOE: CombatantId = CombatantId(2);

fn duel(hero_move: MoveDef, foe_move: MoveDef) -> Vec<Combatant> {
    vec![
        Combatant::new(HERO, "Hero", Side::Player)
            .player_controlled()
            .at_slot(0)
            .with_stats(CombatantStats::new(50, 200, 20).with_attributes(100, 100, 100, 100))
            .with_move(Arc::new(hero_move)),
        Combatant::new(FOE, "Foe", Side::Enemy)
            .at_slot(0)
            .with_stats(CombatantStats::new(50, 200, 20).with_attributes(100, 100, 100, 50))
            .with_move(Arc::new(foe_move)),
    ]
}

fn session(combatants: Vec<Combatant>, config: &RuntimeConfig) -> BattleSession {
    BattleSession::create(
        combatants,
        Arc::new(ElementMatrix::new()),
        BattleConfig::default(),
        config,
    )
    .expect("valid roster")
}

fn idle() -> MoveDef {
    MoveDef::new("idle", "Idle")
}

fn tackle() -> MoveDef {
    MoveDef::new("tackle", "Tackle").with_power(40)
}

#[test]
fn watchdog_forces_the_round_after_idle_ticks() {
    let config = RuntimeConfig {
        stall_ticks: 3,
        ..RuntimeConfig::default()
    };
    let mut session = session(duel(idle(), idle()), &config);
    while session.engine().phase() != BattlePhase::ActionSelection {
        session.tick();
    }

    assert!(session.tick().is_empty());
    assert!(session.tick().is_empty());
    assert_eq!(session.engine().phase(), BattlePhase::ActionSelection);

    session.tick();
    assert_eq!(session.engine().phase(), BattlePhase::ActionResolution);

    let mut events = Vec::new();
    while session.engine().phase() == BattlePhase::ActionResolution {
        events.extend(session.tick());
    }
    assert!(events.contains(&BattleEvent::ActionDeclared {
        actor: HERO,
        choice: ActionChoice::Stall,
    }));
}

#[test]
fn submitted_input_resets_the_watchdog() {
    let config = RuntimeConfig {
        stall_ticks: 2,
        ..RuntimeConfig::default()
    };
    let mut session = session(duel(idle(), idle()), &config);
    while session.engine().phase() != BattlePhase::ActionSelection {
        session.tick();
    }
    session.tick();
    session.submit(0, ActionChoice::Stall).expect("valid submission");
    session.tick();
    assert_eq!(session.engine().phase(), BattlePhase::ActionResolution);
}

#[test]
fn events_are_published_by_topic() {
    let mut session = session(duel(idle(), idle()), &RuntimeConfig::default());
    let mut flow = session.bus().subscribe(Topic::Flow).expect("flow topic");
    session.tick();
    let first = flow.try_recv().expect("battle started published");
    assert_eq!(first.event, BattleEvent::BattleStarted);
    assert_eq!(first.round, 1);
    assert_eq!(first.seq, 0);
}

#[tokio::test]
async fn exhausted_script_falls_back_to_stalls() {
    let config = RuntimeConfig {
        stall_ticks: 1,
        ..RuntimeConfig::default()
    };
    let mut session = session(duel(idle(), tackle()), &config);
    let mut provider = ScriptedActionProvider::new([ActionChoice::UseMove {
        move_index: 0,
        target: None,
    }]);

    let outcome = session.run(&mut provider).await.expect("battle finishes");
    assert_eq!(outcome, BattleOutcome::Defeat);
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test]
async fn tick_limit_stops_an_endless_battle() {
    let config = RuntimeConfig {
        max_ticks: 50,
        ..RuntimeConfig::default()
    };
    let mut session = session(duel(idle(), idle()), &config);
    let err = session
        .run(&mut StallActionProvider)
        .await
        .expect_err("zero-power duel never ends");
    assert!(matches!(err, RuntimeError::TickLimit { ticks: 50 }));
}

#[tokio::test]
async fn autopilot_plays_embedded_content_to_completion() {
    let content = ContentFactory::embedded().load().expect("embedded content");
    let catalogs = &content.catalogs;
    let moves = |ids: &[&str]| -> Vec<Arc<MoveDef>> {
        ids.iter()
            .map(|id| catalogs.moves.get(id).expect("move exists"))
            .collect()
    };

    let mut hero = Combatant::new(HERO, "Hero", Side::Player)
        .player_controlled()
        .at_slot(0)
        .with_stats(CombatantStats::new(30, 180, 30).with_attributes(60, 40, 50, 55));
    hero.moves = moves(&["strike", "ember", "war_cry"]);
    let mut foe = Combatant::new(FOE, "Brute", Side::Enemy)
        .at_slot(0)
        .with_stats(CombatantStats::new(30, 160, 10).with_attributes(55, 20, 45, 40));
    foe.moves = moves(&["heavy_blow", "strike"]);

    let config = RuntimeConfig::default();
    let mut session = BattleSession::create(
        vec![hero, foe],
        Arc::clone(&catalogs.elements),
        BattleConfig::with_rules(content.rules),
        &config,
    )
    .expect("valid roster");
    let mut outcomes = session.bus().subscribe(Topic::Flow).expect("flow topic");

    let mut autopilot =
        AutopilotProvider::new(Arc::clone(&catalogs.elements), content.rules, config.seed);
    let outcome = session.run(&mut autopilot).await.expect("battle finishes");
    assert_ne!(outcome, BattleOutcome::Draw);

    let mut last = None;
    loop {
        match outcomes.try_recv() {
            Ok(event) => last = Some(event.event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    assert_eq!(last, Some(BattleEvent::BattleOver { outcome }));
}
