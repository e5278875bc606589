use std::fs;

use combat_content::ContentFactory;
use combat_core::abilities::AbilityKind;
use combat_core::env::ElementId;

#[test]
fn embedded_content_loads_without_diagnostics() {
    let content = ContentFactory::embedded().load().expect("embedded content");
    assert!(content.diagnostics.is_empty(), "{:?}", content.diagnostics);

    let catalogs = &content.catalogs;
    assert!(catalogs.moves.len() >= 15);
    assert!(catalogs.abilities.len() >= 19);

    let precise = catalogs.moves.get("Precise_Cut").expect("precise cut");
    assert_eq!(precise.abilities.len(), 1);
    assert_eq!(
        precise.abilities[0].kind,
        AbilityKind::KeenEye { multiplier_pct: 100 }
    );

    let fire = ElementId::new("fire");
    let flora = ElementId::new("flora");
    assert_eq!(catalogs.elements.factor(&fire, &flora), 2.0);
    assert_eq!(
        catalogs
            .elements
            .factor(&ElementId::new("storm"), &ElementId::new("stone")),
        0.0
    );
}

#[test]
fn directory_content_collects_diagnostics_and_keeps_loading() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("abilities.ron"),
        r#"[
            (id: "thorns", kind: "thorns", params: {"percent": 10}),
            (id: "broken", kind: "thorns"),
        ]"#,
    )
    .expect("write abilities");
    fs::write(
        dir.path().join("moves.ron"),
        r#"[
            (id: "spiked_punch", power: 40, abilities: ["thorns", "broken"]),
            (id: "bad", power: 40, accuracy: Some(150)),
        ]"#,
    )
    .expect("write moves");

    let content = ContentFactory::new(dir.path()).load().expect("content");
    assert_eq!(content.catalogs.moves.keys(), ["spiked_punch"]);
    assert_eq!(content.catalogs.abilities.len(), 1);
    assert!(content.catalogs.elements.is_empty());
    assert_eq!(content.rules, combat_core::config::CombatRules::default());

    let entries: Vec<&str> = content
        .diagnostics
        .iter()
        .map(|d| d.entry.as_str())
        .collect();
    assert_eq!(entries, ["broken", "spiked_punch", "bad"]);
    assert!(content.diagnostics[1].message.contains("broken"));
}

#[test]
fn mistyped_entries_are_skipped_and_neighbours_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("abilities.ron"),
        r#"[
            (id: "thorns", kind: "thorns", params: {"percent": "ten"}),
            (id: "leech", kind: "lifesteal", params: {"percent": 50}),
        ]"#,
    )
    .expect("write abilities");
    fs::write(
        dir.path().join("moves.ron"),
        r#"[
            (id: "smash", power: "strong"),
            (id: "bite", power: 60, abilities: ["leech"]),
        ]"#,
    )
    .expect("write moves");

    let content = ContentFactory::new(dir.path()).load().expect("content");
    assert_eq!(content.catalogs.abilities.keys(), ["leech"]);
    assert_eq!(content.catalogs.moves.keys(), ["bite"]);
    let bite = content.catalogs.moves.get("bite").expect("bite loaded");
    assert_eq!(bite.abilities.len(), 1);

    let entries: Vec<&str> = content
        .diagnostics
        .iter()
        .map(|d| d.entry.as_str())
        .collect();
    assert_eq!(entries, ["thorns", "smash"]);
}

#[test]
fn missing_move_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("abilities.ron"), "[]").expect("write abilities");
    assert!(ContentFactory::new(dir.path()).load().is_err());
}

#[test]
fn rules_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("abilities.ron"), "[]").expect("write abilities");
    fs::write(dir.path().join("moves.ron"), "[]").expect("write moves");
    fs::write(dir.path().join("rules.toml"), "crit_multiplier = 2.0\n").expect("write rules");

    let content = ContentFactory::new(dir.path()).load().expect("content");
    assert_eq!(content.rules.crit_multiplier, 2.0);
    assert!(content.catalogs.moves.is_empty());
}
