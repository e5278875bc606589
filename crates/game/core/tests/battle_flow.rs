use std::sync::Arc;

use combat_core::action::{Accuracy, ActionChoice, EffectTarget, Impact, MoveDef, MoveEffect, TargetKind};
use combat_core::config::{BattleConfig, CombatRules};
use combat_core::engine::{BattleEngine, BattleOutcome, BattlePhase};
use combat_core::env::{ElementMatrix, PcgRng};
use combat_core::events::{BattleEvent, FailReason, SkipReason};
use combat_core::state::{Combatant, CombatantId, Side, StatusKind};
use combat_core::stats::CombatantStats;

const HERO: CombatantId = CombatantId(1);
const FOE: CombatantId = CombatantId(2);
const RESERVE: CombatantId = CombatantId(3);

fn idle() -> Arc<MoveDef> {
    Arc::new(MoveDef::new("idle", "Idle"))
}

fn tackle() -> Arc<MoveDef> {
    Arc::new(MoveDef::new("tackle", "Tackle").with_power(40))
}

fn stats(hp: u32, agility: i32) -> CombatantStats {
    CombatantStats::new(50, hp, 20).with_attributes(100, 100, 100, agility)
}

fn hero(hp: u32) -> Combatant {
    Combatant::new(HERO, "Hero", Side::Player)
        .player_controlled()
        .at_slot(0)
        .with_stats(stats(hp, 100))
}

fn foe(hp: u32) -> Combatant {
    Combatant::new(FOE, "Foe", Side::Enemy)
        .at_slot(0)
        .with_stats(stats(hp, 50))
}

fn engine(combatants: Vec<Combatant>, seed: u64) -> BattleEngine {
    BattleEngine::new(
        combatants,
        Arc::new(ElementMatrix::new()),
        BattleConfig::default(),
        PcgRng::seed_from_u64(seed),
    )
    .expect("valid roster")
}

/// Advances until the engine waits for player input or the battle ends.
fn to_selection(engine: &mut BattleEngine) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    for _ in 0..100 {
        if engine.is_over() || engine.phase() == BattlePhase::ActionSelection {
            break;
        }
        events.extend(engine.advance());
    }
    events
}

/// Submits `choice` for slot 0 (if any) and runs the round to completion.
fn play_round(engine: &mut BattleEngine, choice: Option<ActionChoice>) -> Vec<BattleEvent> {
    assert_eq!(engine.phase(), BattlePhase::ActionSelection);
    if let Some(choice) = choice {
        engine.submit_player_action(0, choice).expect("valid submission");
    }
    let mut events = engine.force_advance();
    events.extend(to_selection(engine));
    events
}

fn use_move(index: usize) -> Option<ActionChoice> {
    Some(ActionChoice::UseMove {
        move_index: index,
        target: None,
    })
}

#[test]
fn zero_power_duel_ends_once_enemy_hp_is_zeroed() {
    let mut engine = engine(
        vec![hero(100).with_move(idle()), foe(100).with_move(idle())],
        1,
    );
    let opening = to_selection(&mut engine);
    assert_eq!(opening.first(), Some(&BattleEvent::BattleStarted));
    assert!(opening.contains(&BattleEvent::TurnStarted { round: 1 }));

    play_round(&mut engine, use_move(0));
    assert_eq!(engine.round(), 2);
    assert!(!engine.is_over());

    engine
        .state_mut()
        .get_mut(FOE)
        .expect("foe exists")
        .stats
        .set_current_hp(0);
    let events = play_round(&mut engine, use_move(0));

    assert_eq!(engine.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(
        events.last(),
        Some(&BattleEvent::BattleOver {
            outcome: BattleOutcome::Victory
        })
    );
    assert!(engine.advance().is_empty());
}

#[test]
fn selection_waits_for_player_input() {
    let mut engine = engine(vec![hero(100).with_move(idle()), foe(100).with_move(idle())], 2);
    to_selection(&mut engine);
    assert_eq!(engine.awaiting_input(), vec![0]);

    for _ in 0..5 {
        assert!(engine.advance().is_empty());
        assert_eq!(engine.phase(), BattlePhase::ActionSelection);
    }

    engine
        .submit_player_action(0, ActionChoice::Stall)
        .expect("valid submission");
    assert!(engine.awaiting_input().is_empty());
    engine.advance();
    assert_eq!(engine.phase(), BattlePhase::ActionResolution);
}

#[test]
fn force_advance_stalls_missing_players() {
    let mut engine = engine(vec![hero(100).with_move(idle()), foe(100).with_move(idle())], 3);
    to_selection(&mut engine);
    let events = play_round(&mut engine, None);
    assert!(events.contains(&BattleEvent::ActionDeclared {
        actor: HERO,
        choice: ActionChoice::Stall,
    }));
    assert_eq!(engine.round(), 2);
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    fn run(seed: u64) -> (Vec<BattleEvent>, [u8; 32]) {
        let ember = Arc::new(
            MoveDef::new("ember", "Ember")
                .with_power(40)
                .with_accuracy(Accuracy::Percent(90))
                .with_impact(Impact::Magical)
                .with_element("fire")
                .with_effect(MoveEffect::ApplyStatus {
                    status: StatusKind::Burned,
                    duration: 0,
                    chance_pct: 30,
                    target: EffectTarget::Target,
                }),
        );
        let mut engine = BattleEngine::new(
            vec![
                hero(300).with_move(tackle()).with_move(ember.clone()),
                foe(300).with_move(tackle()).with_move(ember),
            ],
            Arc::new(ElementMatrix::new().with("fire", "flora", 2.0)),
            BattleConfig::default(),
            PcgRng::seed_from_u64(seed),
        )
        .expect("valid roster");

        let mut events = Vec::new();
        for tick in 0..2_000 {
            if engine.is_over() {
                break;
            }
            if !engine.awaiting_input().is_empty() {
                let choice = ActionChoice::UseMove {
                    move_index: tick % 2,
                    target: None,
                };
                engine.submit_player_action(0, choice).expect("valid submission");
            }
            events.extend(engine.advance());
        }
        assert!(engine.is_over(), "battle did not finish");
        (events, engine.digest().expect("final state encodes"))
    }

    let (first_events, first_digest) = run(99);
    let (second_events, second_digest) = run(99);
    assert_eq!(first_events, second_events);
    assert_eq!(first_digest, second_digest);
}

#[test]
fn defeated_combatant_is_replaced_from_reserve() {
    let reserve = Combatant::new(RESERVE, "Reserve", Side::Enemy)
        .with_stats(stats(100, 50))
        .with_move(idle());
    let mut engine = engine(
        vec![
            hero(100).with_move(tackle()),
            foe(1).with_move(idle()),
            reserve,
        ],
        4,
    );
    to_selection(&mut engine);
    let events = play_round(&mut engine, use_move(0));

    assert!(events.contains(&BattleEvent::Defeated { target: FOE }));
    assert!(events.contains(&BattleEvent::SwitchedIn {
        incoming: RESERVE,
        outgoing: Some(FOE),
        slot: 0,
    }));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionDeclared { actor, .. } if *actor == FOE)),
        "a defeated combatant must not act"
    );
    assert_eq!(
        engine.state().at_slot(Side::Enemy, 0).map(|c| c.id),
        Some(RESERVE)
    );
    assert!(!engine.is_over());
}

#[test]
fn stun_lasts_the_current_round_plus_its_duration() {
    let stun = Arc::new(
        MoveDef::new("stun", "Stun")
            .with_impact(Impact::Support)
            .with_effect(MoveEffect::ApplyStatus {
                status: StatusKind::Stunned,
                duration: 1,
                chance_pct: 100,
                target: EffectTarget::Target,
            }),
    );
    let mut engine = engine(
        vec![hero(1_000).with_move(stun), foe(1_000).with_move(tackle())],
        5,
    );
    to_selection(&mut engine);

    let skipped = |events: &[BattleEvent]| {
        events.contains(&BattleEvent::ActionSkipped {
            actor: FOE,
            reason: SkipReason::Stunned,
        })
    };

    let round1 = play_round(&mut engine, use_move(0));
    assert!(
        round1
            .iter()
            .any(|e| matches!(e, BattleEvent::StatusApplied { target, kind: StatusKind::Stunned, .. } if *target == FOE))
    );
    assert!(skipped(&round1));

    let round2 = play_round(&mut engine, Some(ActionChoice::Stall));
    assert!(skipped(&round2));

    let round3 = play_round(&mut engine, Some(ActionChoice::Stall));
    assert!(round3.contains(&BattleEvent::StatusRemoved {
        target: FOE,
        kind: StatusKind::Stunned,
    }));
    assert!(!skipped(&round3));
    assert!(
        round3
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionDeclared { actor, .. } if *actor == FOE))
    );
}

#[test]
fn poison_damage_doubles_each_turn_up_to_the_cap() {
    let mut poisoned = foe(16_000).with_move(idle());
    poisoned.statuses.apply(StatusKind::Poisoned, 0);
    let mut engine = engine(vec![hero(100).with_move(idle()), poisoned], 6);
    to_selection(&mut engine);

    let mut ticks = Vec::new();
    for _ in 0..5 {
        if engine.is_over() {
            break;
        }
        for event in play_round(&mut engine, use_move(0)) {
            if let BattleEvent::StatusTriggered {
                target,
                kind: StatusKind::Poisoned,
                amount,
            } = event
            {
                assert_eq!(target, FOE);
                ticks.push(amount);
            }
        }
    }

    assert_eq!(ticks, vec![1_000, 2_000, 4_000, 8_000, 8_000]);
    assert_eq!(engine.outcome(), Some(BattleOutcome::Victory));
}

#[test]
fn protection_blocks_damage_for_the_turn() {
    let guard = Arc::new(
        MoveDef::new("guard", "Guard")
            .with_priority(4)
            .with_impact(Impact::Support)
            .with_target(TargetKind::User)
            .with_effect(MoveEffect::Protect),
    );
    let mut engine = engine(
        vec![hero(500).with_move(guard), foe(500).with_move(tackle())],
        7,
    );
    to_selection(&mut engine);
    let events = play_round(&mut engine, use_move(0));

    let blocked = events.iter().any(|e| match e {
        BattleEvent::ActionExecuted { actor, results, .. } if *actor == FOE => results
            .iter()
            .all(|r| r.target == HERO && r.blocked && r.result.damage == 0),
        _ => false,
    });
    assert!(blocked, "enemy hit should be blocked: {events:?}");
    assert_eq!(
        engine.state().get(HERO).map(|c| c.stats.current_hp()),
        Some(500)
    );
}

#[test]
fn unaffordable_move_fails_without_spending_mana() {
    let nova = Arc::new(
        MoveDef::new("nova", "Nova")
            .with_power(90)
            .with_impact(Impact::Magical)
            .with_mana_cost(50),
    );
    let mut engine = engine(vec![hero(100).with_move(nova), foe(100).with_move(idle())], 8);
    to_selection(&mut engine);
    let events = play_round(&mut engine, use_move(0));

    assert!(events.contains(&BattleEvent::MoveFailed {
        actor: HERO,
        reason: FailReason::NotEnoughMana,
    }));
    assert_eq!(
        engine.state().get(HERO).map(|c| c.stats.current_mana()),
        Some(20)
    );
    assert_eq!(
        engine.state().get(FOE).map(|c| c.stats.current_hp()),
        Some(100)
    );
}

#[test]
fn regeneration_tick_uses_the_configured_divisor() {
    let mut regenerating = foe(1_600).with_move(idle());
    regenerating.statuses.apply(StatusKind::Regenerating, 5);
    regenerating.stats.set_current_hp(800);
    let rules = CombatRules {
        regeneration_divisor: 8,
        ..CombatRules::default()
    };
    let mut engine = BattleEngine::new(
        vec![hero(100).with_move(idle()), regenerating],
        Arc::new(ElementMatrix::new()),
        BattleConfig::with_rules(rules),
        PcgRng::seed_from_u64(9),
    )
    .expect("valid roster");
    to_selection(&mut engine);

    let events = play_round(&mut engine, use_move(0));

    assert!(events.contains(&BattleEvent::StatusTriggered {
        target: FOE,
        kind: StatusKind::Regenerating,
        amount: 200,
    }));
    assert_eq!(
        engine.state().get(FOE).map(|c| c.stats.current_hp()),
        Some(1_000)
    );
}

#[test]
fn stunned_combatant_that_stalls_is_reported_as_skipped() {
    let mut engine = engine(vec![hero(100).with_move(idle()), foe(100).with_move(idle())], 10);
    to_selection(&mut engine);
    engine
        .state_mut()
        .get_mut(HERO)
        .expect("hero exists")
        .statuses
        .apply(StatusKind::Stunned, 1);

    let events = play_round(&mut engine, Some(ActionChoice::Stall));

    assert!(events.contains(&BattleEvent::ActionSkipped {
        actor: HERO,
        reason: SkipReason::Stunned,
    }));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BattleEvent::ActionDeclared { actor, .. } if *actor == HERO))
    );
}
